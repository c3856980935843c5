use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceRecord: One raw row of the price store
// ---------------------------------------------------------------------------

/// A stored row exactly as written by ingestion.
///
/// `price` is free text: scraped prices such as `"€29.99"` and sentinels such
/// as `"Sold Out"` are kept verbatim and only coerced when loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PriceRecord {
    pub id: i64,
    pub product_id: i64,
    pub product_title: Option<String>,
    pub seller: String,
    pub price: Option<String>,
    pub date: String,
    pub source: Option<String>,
}

// ---------------------------------------------------------------------------
// NewObservation: Upsert payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewObservation {
    pub product_id: i64,
    pub product_title: String,
    pub seller: String,
    pub price: Option<String>,
    pub date: NaiveDate,
    pub source: String,
}

/// Whether an upsert created a row or overwrote the same-day row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

// ---------------------------------------------------------------------------
// Observation: Coerced price point consumed by the rank processor
// ---------------------------------------------------------------------------

/// One seller's numeric price for one product on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub product: String,
    pub seller: String,
    pub price: f64,
    pub date: NaiveDate,
}

impl Observation {
    pub fn new(product: &str, seller: &str, price: f64, date: NaiveDate) -> Self {
        Self {
            product: product.to_string(),
            seller: seller.to_string(),
            price,
            date,
        }
    }
}
