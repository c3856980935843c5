//! Shared test fixtures for the price-rank integration tests.
//!
//! Provides `setup_store()` which creates an in-memory DuckDB store seeded
//! with two products observed over three days, and small helpers for
//! building observations by hand.

#![allow(dead_code)]

use chrono::NaiveDate;
use price_rank::models::{NewObservation, Observation};
use price_rank::{Connection, PriceStore};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn obs(product: &str, seller: &str, price: f64, day: &str) -> Observation {
    Observation::new(product, seller, price, date(day))
}

pub fn new_obs(product_id: i64, title: &str, seller: &str, price: Option<&str>, day: &str) -> NewObservation {
    NewObservation {
        product_id,
        product_title: title.to_string(),
        seller: seller.to_string(),
        price: price.map(str::to_string),
        date: date(day),
        source: "Amazon".to_string(),
    }
}

/// Create an in-memory store with sample rows.
///
/// Widget (product 1):
/// - 2024-01-01: Our Company 20, A 18, B 25
/// - 2024-01-02: Our Company 22, A 16, B 15
///
/// Gadget (product 2):
/// - 2024-01-01: Our Company 10, C 12
/// - 2024-01-03: Our Company €9,50, C "Sold Out"
///
/// Plus one unresolved "N/A" row and one row with a NULL price.
pub fn setup_store() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    seed(&conn, &sample_rows());
    conn
}

pub fn sample_rows() -> Vec<NewObservation> {
    vec![
        new_obs(1, "Widget", "Our Company", Some("20.00"), "2024-01-01"),
        new_obs(1, "Widget", "A", Some("18.00"), "2024-01-01"),
        new_obs(1, "Widget", "B", Some("25.00"), "2024-01-01"),
        new_obs(2, "Gadget", "Our Company", Some("10"), "2024-01-01"),
        new_obs(2, "Gadget", "C", Some("12"), "2024-01-01"),
        new_obs(1, "Widget", "Our Company", Some("22.00"), "2024-01-02"),
        new_obs(1, "Widget", "A", Some("16.00"), "2024-01-02"),
        new_obs(1, "Widget", "B", Some("15.00"), "2024-01-02"),
        new_obs(3, "N/A", "N/A", Some("Sold Out"), "2024-01-02"),
        new_obs(2, "Gadget", "Our Company", Some("€9,50"), "2024-01-03"),
        new_obs(2, "Gadget", "C", Some("Sold Out"), "2024-01-03"),
        new_obs(2, "Gadget", "D", None, "2024-01-03"),
    ]
}

pub fn seed(store: &dyn PriceStore, rows: &[NewObservation]) {
    for row in rows {
        store.upsert(row).unwrap();
    }
}
