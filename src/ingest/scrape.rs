//! Product page scraping.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::{self, NOT_AVAILABLE, SOLD_OUT};
use crate::error::Result;
use crate::models::ScrapedListing;

const TITLE_SELECTOR: &str = "span#productTitle";
const SELLER_SELECTOR: &str = "a#sellerProfileTriggerId";
const PRICE_SELECTOR: &str = "span.aok-offscreen";

/// Fetches marketplace product pages and extracts title, seller and price.
pub struct ProductScraper {
    client: Client,
}

impl ProductScraper {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(config::USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(config::ACCEPT_LANGUAGE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch and parse one page.
    pub fn fetch(&self, url: &str) -> Result<ScrapedListing> {
        debug!(url, "fetching product page");
        let resp = self.client.get(url).send()?;
        let html = resp.text()?;
        Ok(parse_listing(&html))
    }

    /// Like [`fetch`](Self::fetch), but a failed request yields the sentinel listing.
    pub fn fetch_or_unavailable(&self, url: &str) -> ScrapedListing {
        match self.fetch(url) {
            Ok(listing) => listing,
            Err(e) => {
                warn!(url, error = %e, "failed to fetch product page");
                ScrapedListing::unavailable()
            }
        }
    }
}

/// Extract the listing from a product page. Missing fields become sentinels.
pub fn parse_listing(html: &str) -> ScrapedListing {
    let document = Html::parse_document(html);
    ScrapedListing {
        title: first_text(&document, TITLE_SELECTOR).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        seller: first_text(&document, SELLER_SELECTOR).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        price: first_text(&document, PRICE_SELECTOR).unwrap_or_else(|| SOLD_OUT.to_string()),
    }
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = document.select(&selector).next()?;
    let text = element.text().collect::<String>().trim().to_string();
    Some(text)
}
