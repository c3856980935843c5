//! Parameterized SELECT construction for the price store.
//!
//! Values are always bound through DuckDB `?` placeholders; only column and
//! table names are spliced into the SQL text. Methods return `&mut Self` so
//! calls chain.
//!
//! # Example
//!
//! ```rust
//! use price_rank::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("product_data")
//!     .where_eq("product_title", "Widget")
//!     .where_gte("date", "2024-01-01")
//!     .order_by(&["date ASC", "id ASC"])
//!     .build();
//! assert_eq!(params, vec!["Widget", "2024-01-01"]);
//! assert!(sql.ends_with("ORDER BY date ASC, id ASC"));
//! ```

/// Accumulates the clauses of one SELECT statement and its bound values.
pub struct SqlBuilder {
    columns: Vec<String>,
    table: String,
    conditions: Vec<String>,
    params: Vec<String>,
    group_by: Vec<String>,
    order_by: Vec<String>,
}

impl SqlBuilder {
    /// Start a `SELECT * FROM {table}` query.
    pub fn new(table: &str) -> Self {
        Self {
            columns: vec!["*".to_string()],
            table: table.to_string(),
            conditions: Vec::new(),
            params: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// Replace the selected columns. Expressions such as `MIN(id) AS first_id` are allowed.
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.columns = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a raw condition; each `?` in it consumes one of `params`, in order.
    pub fn where_clause(&mut self, condition: &str, params: &[&str]) -> &mut Self {
        self.conditions.push(condition.to_string());
        self.params.extend(params.iter().map(|p| p.to_string()));
        self
    }

    /// `{column} = ?`
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clause(&format!("{} = ?", column), &[value])
    }

    /// `{column} >= ?`
    pub fn where_gte(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clause(&format!("{} >= ?", column), &[value])
    }

    /// `{column} <= ?`
    pub fn where_lte(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clause(&format!("{} <= ?", column), &[value])
    }

    /// `{column} IS NOT NULL`
    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.conditions.push(format!("{} IS NOT NULL", column));
        self
    }

    /// Exclude a set of values: `{column} NOT IN (?, ...)`.
    ///
    /// An empty list adds no condition.
    pub fn where_not_in(&mut self, column: &str, values: &[&str]) -> &mut Self {
        if values.is_empty() {
            return self;
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        self.where_clause(&format!("{} NOT IN ({})", column, placeholders), values)
    }

    pub fn group_by(&mut self, cols: &[&str]) -> &mut Self {
        self.group_by.extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// Append ORDER BY terms such as `"date ASC"`.
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by.extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Render the statement. Clauses are newline-separated.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut sql = format!("SELECT {}\nFROM {}", self.columns.join(", "), self.table);

        if !self.conditions.is_empty() {
            sql.push_str(&format!("\nWHERE {}", self.conditions.join(" AND ")));
        }
        if !self.group_by.is_empty() {
            sql.push_str(&format!("\nGROUP BY {}", self.group_by.join(", ")));
        }
        if !self.order_by.is_empty() {
            sql.push_str(&format!("\nORDER BY {}", self.order_by.join(", ")));
        }

        (sql, self.params.clone())
    }
}
