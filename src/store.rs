//! Repository seam between the pipeline and the price table.

use duckdb::params;
use tracing::debug;

use crate::config::PRICE_TABLE;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{NewObservation, PriceRecord, UpsertOutcome};
use crate::queries::ObservationQuery;

/// Read and write access to stored price observations.
pub trait PriceStore {
    /// Write one observation, replacing the same product/seller/day row if present.
    fn upsert(&self, observation: &NewObservation) -> Result<UpsertOutcome>;

    /// Every row with a non-null price, in insertion order.
    fn price_records(&self) -> Result<Vec<PriceRecord>>;
}

impl PriceStore for Connection {
    fn upsert(&self, obs: &NewObservation) -> Result<UpsertOutcome> {
        let date = obs.date.format("%Y-%m-%d").to_string();

        let existing = self.execute_scalar(
            &format!(
                "SELECT id FROM {} WHERE product_id = ? AND seller = ? AND date = ?",
                PRICE_TABLE
            ),
            &[obs.product_id.to_string(), obs.seller.clone(), date.clone()],
        )?;

        self.raw().execute(
            &format!(
                "INSERT INTO {} (product_id, product_title, seller, price, date, source) \
                 VALUES (?, ?, ?, ?, ?, ?) \
                 ON CONFLICT (product_id, seller, date) \
                 DO UPDATE SET price = excluded.price, product_title = excluded.product_title",
                PRICE_TABLE
            ),
            params![
                obs.product_id,
                obs.product_title,
                obs.seller,
                obs.price,
                date,
                obs.source
            ],
        )?;

        let outcome = if existing.is_some() {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Inserted
        };
        debug!(
            product = %obs.product_title,
            seller = %obs.seller,
            %date,
            ?outcome,
            "stored price"
        );
        Ok(outcome)
    }

    fn price_records(&self) -> Result<Vec<PriceRecord>> {
        ObservationQuery::new(self).priced_records()
    }
}
