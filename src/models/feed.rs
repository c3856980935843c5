use serde::{Deserialize, Serialize};

use crate::config::{NOT_AVAILABLE, SOLD_OUT};

/// What a product page yielded. Missing fields carry sentinel text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedListing {
    pub title: String,
    pub seller: String,
    pub price: String,
}

impl ScrapedListing {
    /// The listing recorded when a page could not be fetched at all.
    pub fn unavailable() -> Self {
        Self {
            title: NOT_AVAILABLE.to_string(),
            seller: NOT_AVAILABLE.to_string(),
            price: SOLD_OUT.to_string(),
        }
    }
}

/// A row of the URL feed (`urls` column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlFeedRow {
    pub urls: String,
}

/// A row of the fallback product feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackProduct {
    #[serde(rename = "Product Name")]
    pub name: String,
    #[serde(rename = "G7 Price")]
    pub reference_price: String,
}
