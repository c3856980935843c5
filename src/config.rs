use std::env;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use crate::error::{PriceRankError, Result};

/// Seller name under which the company's own prices are stored.
pub const OUR_SELLER: &str = "Our Company";

/// Amount subtracted from the company's raw price before ranking.
///
/// The promotion is described as €10 off, but 5 is what reports have always
/// applied. Override it through [`crate::RankPolicy`] or `PRICE_RANK_DISCOUNT`
/// instead of editing this value.
pub const DEFAULT_DISCOUNT: f64 = 5.0;

/// Product titles written when scraping could not resolve a product.
pub const PLACEHOLDER_PRODUCTS: &[&str] = &["N/A"];

/// Sentinel stored when a page has no title or seller.
pub const NOT_AVAILABLE: &str = "N/A";

/// Sentinel stored when a page shows no price.
pub const SOLD_OUT: &str = "Sold Out";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
pub const ACCEPT_LANGUAGE: &str = "en-GB,en-US;q=0.9,en;q=0.8,ml;q=0.7";

pub const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub const ENV_EMAIL_SENDER: &str = "EMAIL_SENDER";
pub const ENV_SENDGRID_API_KEY: &str = "SENDGRID_API_KEY";
pub const ENV_EMAIL_RECIPIENTS: &str = "EMAIL_RECIPIENTS";

/// Log directives used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info,price_rank=debug";

/// Name of the store table holding every price observation.
pub const PRICE_TABLE: &str = "product_data";

pub fn default_db_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("price-rank").join("prices.duckdb")
    } else {
        PathBuf::from(".price-rank").join("prices.duckdb")
    }
}

/// Load `path`, or `.env` found from the working directory upwards, into the
/// process environment. Variables already set are kept.
///
/// Call before [`log_filter`] so a `RUST_LOG` from the file takes effect.
pub fn load_env(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

/// Log filter from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

pub fn report_filename(date: chrono::NaiveDate) -> String {
    format!("PriceReport_{}.pdf", date.format("%Y-%m-%d"))
}

// ---------------------------------------------------------------------------
// EmailSettings
// ---------------------------------------------------------------------------

/// Sender, credential and recipients for the outbound report e-mail.
#[derive(Clone)]
pub struct EmailSettings {
    pub sender: String,
    pub api_key: String,
    pub recipients: Vec<String>,
}

impl EmailSettings {
    /// Read the settings from the process environment.
    ///
    /// `EMAIL_RECIPIENTS` is a comma-separated list and falls back to the
    /// sender address when unset.
    pub fn from_env() -> Result<Self> {
        let sender = required_var(ENV_EMAIL_SENDER)?;
        let api_key = required_var(ENV_SENDGRID_API_KEY)?;
        let recipients = match env::var(ENV_EMAIL_RECIPIENTS) {
            Ok(list) => parse_recipients(&list),
            Err(_) => vec![sender.clone()],
        };
        if recipients.is_empty() {
            return Err(PriceRankError::Config(format!(
                "{} contains no addresses",
                ENV_EMAIL_RECIPIENTS
            )));
        }
        Ok(Self {
            sender,
            api_key,
            recipients,
        })
    }
}

impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("sender", &self.sender)
            .field("api_key", &"<redacted>")
            .field("recipients", &self.recipients)
            .finish()
    }
}

pub fn parse_recipients(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).map_err(|source| PriceRankError::Env {
        name: name.to_string(),
        source,
    })
}
