//! Turns raw store rows into numeric [`Observation`]s.
//!
//! Rows whose price or date cannot be coerced are dropped here, so the rank
//! processor only ever sees finite, non-negative prices.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::Result;
use crate::models::{Observation, PriceRecord};
use crate::store::PriceStore;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y"];
const CURRENCY_SYMBOLS: &[char] = &['€', '$', '£'];

/// Load every observation with a usable price, excluding placeholder titles.
///
/// Order follows the store's insertion order.
pub fn load_observations(store: &dyn PriceStore, placeholders: &[&str]) -> Result<Vec<Observation>> {
    let records = store.price_records()?;
    let total = records.len();
    let observations = observations_from_records(records, placeholders);
    debug!(
        total,
        kept = observations.len(),
        dropped = total - observations.len(),
        "loaded observations"
    );
    Ok(observations)
}

pub fn observations_from_records(records: Vec<PriceRecord>, placeholders: &[&str]) -> Vec<Observation> {
    records
        .into_iter()
        .filter_map(|r| {
            let product = r.product_title?.trim().to_string();
            if product.is_empty() || placeholders.contains(&product.as_str()) {
                return None;
            }
            let price = coerce_price(r.price.as_deref()?)?;
            let date = parse_date(&r.date)?;
            Some(Observation {
                product,
                seller: r.seller,
                price,
                date,
            })
        })
        .collect()
}

/// Parse a stored price into a finite, non-negative number.
///
/// Accepts surrounding currency symbols and whitespace, a decimal comma
/// (`12,99`) and comma thousands separators (`1,299`, `1,299.00`). A comma
/// followed by exactly three digits is always read as a thousands separator.
/// Anything else returns `None`.
pub fn coerce_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_matches(|c: char| c.is_whitespace() || CURRENCY_SYMBOLS.contains(&c));
    if trimmed.is_empty() {
        return None;
    }

    let normalized = match (trimmed.rfind(','), trimmed.find('.')) {
        // 1,299.00
        (Some(comma), Some(dot)) if comma < dot && is_grouped(&trimmed[..dot]) => trimmed.replace(',', ""),
        (Some(_), Some(_)) => return None,
        // 1,299 or 1,299,000
        (Some(_), None) if is_grouped(trimmed) => trimmed.replace(',', ""),
        // 12,99
        (Some(_), None) if trimmed.matches(',').count() == 1 => trimmed.replacen(',', ".", 1),
        (Some(_), None) => return None,
        _ => trimmed.to_string(),
    };

    let value: f64 = normalized.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// `1,299` style integer part: every group after the first comma has three digits.
fn is_grouped(integer: &str) -> bool {
    let mut groups = integer.split(',');
    let lead_ok = groups.next().map_or(false, |g| !g.is_empty() && g.len() <= 3);
    let mut rest = groups.peekable();
    lead_ok && rest.peek().is_some() && rest.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse `YYYY-MM-DD` or `dd-mm-YYYY`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
