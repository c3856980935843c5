//! Daily price standing of the company against its competitors.
//!
//! For one product the observations are grouped by date (ascending). Each
//! date yields a [`DailySummary`]; consecutive ranked dates whose ranks differ
//! yield a [`RankChangeEvent`].

use std::collections::BTreeMap;

use crate::config::{DEFAULT_DISCOUNT, OUR_SELLER};
use crate::models::{DailySummary, Observation, ProductAnalysis, RankChangeEvent};

/// Which seller is "us" and how its price is adjusted before ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankPolicy {
    pub our_seller: String,
    pub discount: f64,
}

impl Default for RankPolicy {
    fn default() -> Self {
        Self {
            our_seller: OUR_SELLER.to_string(),
            discount: DEFAULT_DISCOUNT,
        }
    }
}

impl RankPolicy {
    /// Company price after the discount, never below zero.
    pub fn adjusted_price(&self, raw: f64) -> f64 {
        (raw - self.discount).max(0.0)
    }
}

/// Summaries and rank changes for `product`.
///
/// Within one date a seller seen more than once keeps its last observation.
/// Ranking places the company at its adjusted price; equal prices are ordered
/// by seller name. A date without a company price has no rank and resets
/// change detection, so the next ranked date is not compared with anything.
pub fn process_product(observations: &[Observation], product: &str, policy: &RankPolicy) -> ProductAnalysis {
    let mut by_date: BTreeMap<_, Vec<&Observation>> = BTreeMap::new();
    for obs in observations.iter().filter(|o| o.product == product) {
        let day = by_date.entry(obs.date).or_default();
        match day.iter_mut().find(|o| o.seller == obs.seller) {
            Some(slot) => *slot = obs,
            None => day.push(obs),
        }
    }

    let mut summaries = Vec::with_capacity(by_date.len());
    let mut changes = Vec::new();
    let mut previous_rank: Option<u32> = None;

    for (date, day) in by_date {
        let summary = summarize_day(date, &day, policy);

        if let (Some(previous), Some(current)) = (previous_rank, summary.rank) {
            if previous != current {
                changes.push(RankChangeEvent {
                    product: product.to_string(),
                    date,
                    previous_rank: previous,
                    current_rank: current,
                });
            }
        }

        previous_rank = summary.rank;
        summaries.push(summary);
    }

    ProductAnalysis {
        product: product.to_string(),
        summaries,
        changes,
    }
}

fn summarize_day(date: chrono::NaiveDate, day: &[&Observation], policy: &RankPolicy) -> DailySummary {
    let min_price = day.iter().map(|o| o.price).fold(f64::INFINITY, f64::min);
    let avg_price = day.iter().map(|o| o.price).sum::<f64>() / day.len() as f64;

    let ours = day.iter().find(|o| o.seller == policy.our_seller);
    let our_price = ours.map(|o| policy.adjusted_price(o.price));
    let rank = our_price.map(|price| rank_of(&policy.our_seller, price, day));

    DailySummary {
        date,
        min_price,
        avg_price,
        our_price,
        rank,
        sellers: day.len(),
    }
}

/// 1-based position of `seller` at `price` among the day's competitors.
///
/// Competitors that are cheaper, or equally priced with a name that sorts
/// first, are ahead.
pub fn rank_of(seller: &str, price: f64, day: &[&Observation]) -> u32 {
    let ahead = day
        .iter()
        .filter(|o| o.seller != seller)
        .filter(|o| o.price < price || (o.price == price && o.seller.as_str() < seller))
        .count();
    ahead as u32 + 1
}

/// Distinct product names in order of first appearance.
pub fn products_in(observations: &[Observation]) -> Vec<String> {
    let mut products: Vec<String> = Vec::new();
    for obs in observations {
        if !products.iter().any(|p| p == &obs.product) {
            products.push(obs.product.clone());
        }
    }
    products
}
