//! Unit tests for the SqlBuilder query construction.

use price_rank::SqlBuilder;

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("product_data").build();
    assert_eq!(sql, "SELECT *\nFROM product_data");
    assert!(params.is_empty());
}

#[test]
fn select_replaces_default_star() {
    let (sql, _) = SqlBuilder::new("product_data")
        .select(&["product_title", "seller"])
        .build();
    assert!(sql.starts_with("SELECT product_title, seller\n"));
}

// ---------------------------------------------------------------------------
// WHERE conditions
// ---------------------------------------------------------------------------

#[test]
fn where_eq_adds_equality_with_param() {
    let (sql, params) = SqlBuilder::new("product_data")
        .where_eq("seller", "OTTO")
        .build();
    assert!(sql.contains("WHERE seller = ?"));
    assert_eq!(params, vec!["OTTO"]);
}

#[test]
fn date_bounds_are_inclusive_comparisons() {
    let (sql, params) = SqlBuilder::new("product_data")
        .where_gte("date", "2024-01-01")
        .where_lte("date", "2024-01-31")
        .build();
    assert!(sql.contains("WHERE date >= ? AND date <= ?"));
    assert_eq!(params, vec!["2024-01-01", "2024-01-31"]);
}

#[test]
fn where_not_null_has_no_params() {
    let (sql, params) = SqlBuilder::new("product_data")
        .where_not_null("price")
        .build();
    assert!(sql.contains("WHERE price IS NOT NULL"));
    assert!(params.is_empty());
}

#[test]
fn where_not_in_binds_each_value() {
    let (sql, params) = SqlBuilder::new("product_data")
        .where_not_in("product_title", &["N/A", "TBD"])
        .build();
    assert!(sql.contains("product_title NOT IN (?, ?)"));
    assert_eq!(params, vec!["N/A", "TBD"]);
}

#[test]
fn where_not_in_empty_is_noop() {
    let (sql, params) = SqlBuilder::new("product_data")
        .where_not_in("product_title", &[])
        .build();
    assert!(!sql.contains("WHERE"));
    assert!(params.is_empty());
}

#[test]
fn where_clause_appends_params_in_order() {
    let (sql, params) = SqlBuilder::new("product_data")
        .where_eq("product_title", "Widget")
        .where_clause("seller <> ?", &["Our Company"])
        .build();
    assert!(sql.contains("product_title = ? AND seller <> ?"));
    assert_eq!(params, vec!["Widget", "Our Company"]);
}

// ---------------------------------------------------------------------------
// GROUP BY / ORDER BY
// ---------------------------------------------------------------------------

#[test]
fn group_by_adds_clause() {
    let (sql, _) = SqlBuilder::new("product_data")
        .select(&["product_title", "COUNT(*) AS row_count"])
        .group_by(&["product_title"])
        .build();
    assert!(sql.contains("GROUP BY product_title"));
}

#[test]
fn order_by_adds_clause() {
    let (sql, _) = SqlBuilder::new("product_data")
        .order_by(&["date ASC", "seller ASC"])
        .build();
    assert!(sql.contains("ORDER BY date ASC, seller ASC"));
}

#[test]
fn clauses_render_in_sql_order() {
    let (sql, _) = SqlBuilder::new("product_data")
        .select(&["product_title", "MIN(id) AS first_id"])
        .order_by(&["first_id ASC"])
        .group_by(&["product_title"])
        .where_not_null("product_title")
        .build();
    let where_pos = sql.find("WHERE").unwrap();
    let group_pos = sql.find("GROUP BY").unwrap();
    let order_pos = sql.find("ORDER BY").unwrap();
    assert!(where_pos < group_pos);
    assert!(group_pos < order_pos);
}
