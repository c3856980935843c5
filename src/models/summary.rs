use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DailySummary: Per product, per date aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub min_price: f64,
    pub avg_price: f64,
    /// Company price after the discount, floored at zero.
    pub our_price: Option<f64>,
    /// 1 = cheapest. `None` when the company has no price that day.
    pub rank: Option<u32>,
    /// Distinct sellers observed that day.
    pub sellers: usize,
}

// ---------------------------------------------------------------------------
// RankChangeEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RankChangeEvent {
    pub product: String,
    /// Date on which `current_rank` was observed.
    pub date: NaiveDate,
    pub previous_rank: u32,
    pub current_rank: u32,
}

// ---------------------------------------------------------------------------
// ProductAnalysis: Rank processor output for one product
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub product: String,
    pub summaries: Vec<DailySummary>,
    pub changes: Vec<RankChangeEvent>,
}

impl ProductAnalysis {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Number of dates on which the company had a rank.
    pub fn ranked_days(&self) -> usize {
        self.summaries.iter().filter(|s| s.rank.is_some()).count()
    }
}
