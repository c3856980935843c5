//! Competitor price tracking with daily rank reports.
//!
//! Prices are scraped into a local DuckDB store. Each report run compares the
//! company's own (discounted) price against competitors per product and day,
//! renders a PDF with three charts per product, and e-mails it together with a
//! list of rank changes.
//!
//! # Quick start
//!
//! ```no_run
//! use price_rank::notify::LogNotifier;
//! use price_rank::PriceMonitor;
//!
//! let monitor = PriceMonitor::builder()
//!     .db_path("prices.duckdb")
//!     .report_dir("reports")
//!     .build()
//!     .unwrap();
//!
//! let today = chrono::Local::now().date_naive();
//! let outcome = monitor.generate_report(&LogNotifier, today).unwrap();
//! println!("{:?}", outcome);
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod ingest;
pub mod loader;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod queries;
pub mod ranking;
pub mod report;
pub mod sql_builder;
pub mod store;

pub use connection::Connection;
pub use error::{PriceRankError, Result};
pub use pipeline::{ReportOptions, RunOutcome};
pub use ranking::RankPolicy;
pub use sql_builder::SqlBuilder;
pub use store::PriceStore;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;

use crate::ingest::{IngestSummary, ProductScraper};
use crate::models::{FallbackProduct, Observation, ProductAnalysis};
use crate::notify::Notifier;

// ---------------------------------------------------------------------------
// PriceMonitorBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`PriceMonitor`].
///
/// Use [`PriceMonitor::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](PriceMonitorBuilder::build).
pub struct PriceMonitorBuilder {
    db_path: Option<PathBuf>,
    in_memory: bool,
    options: ReportOptions,
    timeout: Duration,
}

impl Default for PriceMonitorBuilder {
    fn default() -> Self {
        Self {
            db_path: None,
            in_memory: false,
            options: ReportOptions::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl PriceMonitorBuilder {
    /// Set the database file.
    ///
    /// Defaults to `prices.duckdb` under the platform data directory
    /// (e.g. `~/.local/share/price-rank` on Linux).
    pub fn db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep the store in memory. Mostly useful for tests.
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// Directory the PDF report is written to. Defaults to the working directory.
    pub fn report_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.options.report_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Seller name identifying the company's own prices.
    pub fn our_seller(mut self, seller: &str) -> Self {
        self.options.policy.our_seller = seller.to_string();
        self
    }

    /// Amount subtracted from the company's price before ranking.
    ///
    /// Defaults to [`config::DEFAULT_DISCOUNT`].
    pub fn discount(mut self, discount: f64) -> Self {
        self.options.policy.discount = discount;
        self
    }

    /// Replace the list of product titles excluded from reports.
    pub fn placeholders(mut self, names: &[&str]) -> Self {
        self.options.placeholders = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// HTTP timeout for scraping and e-mail delivery. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Open the store and make sure its schema exists.
    pub fn build(self) -> Result<PriceMonitor> {
        let discount = self.options.policy.discount;
        if !discount.is_finite() || discount < 0.0 {
            return Err(PriceRankError::InvalidArgument(format!(
                "discount must be a non-negative number, got {}",
                discount
            )));
        }

        let conn = if self.in_memory {
            Connection::open_in_memory()?
        } else {
            Connection::open(self.db_path.unwrap_or_else(config::default_db_path))?
        };

        Ok(PriceMonitor {
            conn,
            options: self.options,
            timeout: self.timeout,
        })
    }
}

// ---------------------------------------------------------------------------
// PriceMonitor
// ---------------------------------------------------------------------------

/// Entry point tying the store, ingestion and report pipeline together.
pub struct PriceMonitor {
    conn: Connection,
    options: ReportOptions,
    timeout: Duration,
}

impl PriceMonitor {
    pub fn builder() -> PriceMonitorBuilder {
        PriceMonitorBuilder::default()
    }

    /// Query interface over stored observations.
    pub fn observations(&self) -> queries::ObservationQuery<'_> {
        queries::ObservationQuery::new(&self.conn)
    }

    /// The store as its repository trait.
    pub fn store(&self) -> &dyn PriceStore {
        &self.conn
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Scrape `urls`, then record them and the fallback products for `date`.
    pub fn ingest(&self, urls: &[String], fallbacks: &[FallbackProduct], date: NaiveDate) -> Result<IngestSummary> {
        let scraper = ProductScraper::new(self.timeout)?;
        ingest::ingest(&self.conn, &scraper, urls, fallbacks, date)
    }

    /// Coerced observations with placeholder products removed.
    pub fn load(&self) -> Result<Vec<Observation>> {
        let placeholders: Vec<&str> = self.options.placeholders.iter().map(String::as_str).collect();
        loader::load_observations(&self.conn, &placeholders)
    }

    /// Rank analysis of every product without rendering anything.
    pub fn analyze(&self) -> Result<Vec<ProductAnalysis>> {
        Ok(pipeline::analyze_all(&self.load()?, &self.options.policy))
    }

    /// Run the report pipeline for `date` and deliver through `notifier`.
    pub fn generate_report(&self, notifier: &dyn Notifier, date: NaiveDate) -> Result<RunOutcome> {
        pipeline::generate_report(&self.conn, notifier, &self.options, date)
    }

    /// HTTP timeout configured on the builder.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl fmt::Display for PriceMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let db = self
            .conn
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        write!(
            f,
            "PriceMonitor(db={}, report_dir={}, seller={}, discount={})",
            db,
            self.options.report_dir.display(),
            self.options.policy.our_seller,
            self.options.policy.discount
        )
    }
}
