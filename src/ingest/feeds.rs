//! CSV input feeds: the product URL list and the fallback price list.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::Result;
use crate::models::{FallbackProduct, UrlFeedRow};

/// URLs from a CSV with a `urls` column. Blank cells are skipped.
pub fn read_url_feed<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut urls = Vec::new();
    for row in rdr.deserialize::<UrlFeedRow>() {
        let row = row?;
        if !row.urls.is_empty() {
            urls.push(row.urls);
        }
    }
    Ok(urls)
}

/// Rows from a CSV with `Product Name` and `G7 Price` columns.
pub fn read_fallback_feed<R: Read>(reader: R) -> Result<Vec<FallbackProduct>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut products = Vec::new();
    for row in rdr.deserialize::<FallbackProduct>() {
        products.push(row?);
    }
    Ok(products)
}

pub fn read_url_feed_file(path: &Path) -> Result<Vec<String>> {
    read_url_feed(std::fs::File::open(path)?)
}

pub fn read_fallback_feed_file(path: &Path) -> Result<Vec<FallbackProduct>> {
    read_fallback_feed(std::fs::File::open(path)?)
}
