//! Queries against the `product_data` observation table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PRICE_TABLE;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::PriceRecord;
use crate::sql_builder::SqlBuilder;

const RECORD_COLUMNS: &[&str] = &[
    "id",
    "product_id",
    "product_title",
    "seller",
    "price",
    "date",
    "source",
];

/// Row counts and date span for one product title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStats {
    pub product_title: String,
    pub row_count: i64,
    pub seller_count: i64,
    pub first_date: String,
    pub last_date: String,
}

impl fmt::Display for ProductStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{} rows\t{} sellers\t{}..{}",
            self.product_title, self.row_count, self.seller_count, self.first_date, self.last_date
        )
    }
}

/// Query interface for stored price observations.
pub struct ObservationQuery<'a> {
    conn: &'a Connection,
}

impl<'a> ObservationQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All rows whose price is not NULL, oldest write first.
    pub fn priced_records(&self) -> Result<Vec<PriceRecord>> {
        let (sql, params) = SqlBuilder::new(PRICE_TABLE)
            .select(RECORD_COLUMNS)
            .where_not_null("price")
            .order_by(&["id ASC"])
            .build();
        self.conn.execute_into(&sql, &params)
    }

    /// Rows for one product title, optionally bounded by `YYYY-MM-DD` dates (inclusive).
    pub fn history(
        &self,
        product_title: &str,
        date_from: Option<&str>,
        date_to: Option<&str>,
    ) -> Result<Vec<PriceRecord>> {
        let mut qb = SqlBuilder::new(PRICE_TABLE);
        qb.select(RECORD_COLUMNS);
        qb.where_eq("product_title", product_title);

        if let Some(from) = date_from {
            qb.where_gte("date", from);
        }
        if let Some(to) = date_to {
            qb.where_lte("date", to);
        }

        qb.order_by(&["date ASC", "seller ASC", "id ASC"]);
        let (sql, params) = qb.build();
        self.conn.execute_into(&sql, &params)
    }

    /// Distinct product titles in order of first appearance, skipping `excluded` titles.
    pub fn products(&self, excluded: &[&str]) -> Result<Vec<String>> {
        let (sql, params) = SqlBuilder::new(PRICE_TABLE)
            .select(&["product_title", "MIN(id) AS first_id"])
            .where_not_null("product_title")
            .where_not_in("product_title", excluded)
            .group_by(&["product_title"])
            .order_by(&["first_id ASC"])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.get("product_title").and_then(|v| v.as_str()).map(str::to_string))
            .collect())
    }

    /// Per-product row count, seller count and date span.
    pub fn product_stats(&self, product_title: &str) -> Result<Option<ProductStats>> {
        let (sql, params) = SqlBuilder::new(PRICE_TABLE)
            .select(&[
                "product_title",
                "COUNT(*) AS row_count",
                "COUNT(DISTINCT seller) AS seller_count",
                "MIN(date) AS first_date",
                "MAX(date) AS last_date",
            ])
            .where_eq("product_title", product_title)
            .group_by(&["product_title"])
            .build();

        Ok(self.conn.execute_into(&sql, &params)?.into_iter().next())
    }

    /// [`product_stats`](Self::product_stats) for every product, in first-appearance order.
    pub fn product_overview(&self, excluded: &[&str]) -> Result<Vec<ProductStats>> {
        let mut overview = Vec::new();
        for product in self.products(excluded)? {
            if let Some(stats) = self.product_stats(&product)? {
                overview.push(stats);
            }
        }
        Ok(overview)
    }

    /// Total number of stored rows.
    pub fn count(&self) -> Result<i64> {
        let (sql, params) = SqlBuilder::new(PRICE_TABLE).select(&["COUNT(*)"]).build();
        Ok(self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0))
    }
}
