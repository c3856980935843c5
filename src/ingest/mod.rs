//! Writing today's prices into the store.
//!
//! Scraped listings get product ids `1..=urls`; fallback products continue
//! the numbering and are recorded for three sellers at their reference price.

pub mod feeds;
pub mod scrape;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::OUR_SELLER;
use crate::error::Result;
use crate::models::{FallbackProduct, NewObservation, ScrapedListing, UpsertOutcome};
use crate::store::PriceStore;

pub use scrape::ProductScraper;

pub const SCRAPED_SOURCE: &str = "Amazon";

/// Sellers (and their source tags) recorded for each fallback product.
pub const FALLBACK_SELLERS: &[(&str, &str)] = &[
    ("OTTO", "Otto Fallback"),
    ("eBay", "eBay Fallback"),
    (OUR_SELLER, OUR_SELLER),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub inserted: usize,
    pub updated: usize,
}

impl IngestSummary {
    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Store scraped listings; the listing at index `i` becomes product `i + 1`.
pub fn store_listings(store: &dyn PriceStore, listings: &[ScrapedListing], date: NaiveDate) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();
    for (idx, listing) in listings.iter().enumerate() {
        let obs = NewObservation {
            product_id: idx as i64 + 1,
            product_title: listing.title.clone(),
            seller: listing.seller.clone(),
            price: Some(listing.price.clone()),
            date,
            source: SCRAPED_SOURCE.to_string(),
        };
        let outcome = store.upsert(&obs)?;
        log_outcome(&obs, outcome);
        summary.record(outcome);
    }
    Ok(summary)
}

/// Store fallback products, numbering them after the `first_id - 1` scraped ones.
pub fn store_fallbacks(
    store: &dyn PriceStore,
    products: &[FallbackProduct],
    first_id: i64,
    date: NaiveDate,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();
    for (idx, product) in products.iter().enumerate() {
        for (seller, source) in FALLBACK_SELLERS {
            let obs = NewObservation {
                product_id: first_id + idx as i64,
                product_title: product.name.clone(),
                seller: seller.to_string(),
                price: Some(product.reference_price.clone()),
                date,
                source: source.to_string(),
            };
            let outcome = store.upsert(&obs)?;
            log_outcome(&obs, outcome);
            summary.record(outcome);
        }
    }
    Ok(summary)
}

/// Scrape every URL, then store listings and fallback products for `date`.
pub fn ingest(
    store: &dyn PriceStore,
    scraper: &ProductScraper,
    urls: &[String],
    fallbacks: &[FallbackProduct],
    date: NaiveDate,
) -> Result<IngestSummary> {
    let listings: Vec<ScrapedListing> = urls.iter().map(|u| scraper.fetch_or_unavailable(u)).collect();

    let mut summary = store_listings(store, &listings, date)?;
    let fallback = store_fallbacks(store, fallbacks, urls.len() as i64 + 1, date)?;
    summary.inserted += fallback.inserted;
    summary.updated += fallback.updated;

    info!(
        inserted = summary.inserted,
        updated = summary.updated,
        "data scraping and insertion completed"
    );
    Ok(summary)
}

fn log_outcome(obs: &NewObservation, outcome: UpsertOutcome) {
    let verb = match outcome {
        UpsertOutcome::Inserted => "inserted new entry",
        UpsertOutcome::Updated => "updated price",
    };
    info!(
        product = %obs.product_title,
        seller = %obs.seller,
        date = %obs.date,
        "{}",
        verb
    );
}
