//! Ingestion tests: page parsing, CSV feeds and storing today's prices.

mod common;

use common::date;
use price_rank::ingest::feeds::{read_fallback_feed, read_url_feed};
use price_rank::ingest::scrape::parse_listing;
use price_rank::ingest::{store_fallbacks, store_listings, FALLBACK_SELLERS, SCRAPED_SOURCE};
use price_rank::models::{FallbackProduct, ScrapedListing};
use price_rank::queries::ObservationQuery;
use price_rank::{Connection, PriceStore};

const PRODUCT_PAGE: &str = r#"
<html><body>
  <span id="productTitle">   Widget Pro 3000  </span>
  <div class="price">
    <span class="aok-offscreen"> €29,99 </span>
    <span class="aok-offscreen">€35,00</span>
  </div>
  <a id="sellerProfileTriggerId" href="/seller">Acme GmbH</a>
</body></html>
"#;

// ---------------------------------------------------------------------------
// parse_listing
// ---------------------------------------------------------------------------

#[test]
fn parse_listing_extracts_fields() {
    let listing = parse_listing(PRODUCT_PAGE);
    assert_eq!(listing.title, "Widget Pro 3000");
    assert_eq!(listing.seller, "Acme GmbH");
    assert_eq!(listing.price, "€29,99");
}

#[test]
fn parse_listing_missing_fields_use_sentinels() {
    let listing = parse_listing("<html><body><p>Captcha</p></body></html>");
    assert_eq!(listing, ScrapedListing::unavailable());
    assert_eq!(listing.title, "N/A");
    assert_eq!(listing.seller, "N/A");
    assert_eq!(listing.price, "Sold Out");
}

// ---------------------------------------------------------------------------
// CSV feeds
// ---------------------------------------------------------------------------

#[test]
fn url_feed_skips_blank_rows() {
    let csv = "urls\nhttps://example.com/dp/1\n\n  https://example.com/dp/2  \n\"\"\n";
    let urls = read_url_feed(csv.as_bytes()).unwrap();
    assert_eq!(urls, vec!["https://example.com/dp/1", "https://example.com/dp/2"]);
}

#[test]
fn url_feed_requires_urls_column() {
    assert!(read_url_feed("link\nhttps://example.com\n".as_bytes()).is_err());
}

#[test]
fn fallback_feed_reads_named_columns() {
    let csv = "Product Name,G7 Price\nGadget Mini,19.99\n\"Gadget, Large\", 24.50 \n";
    let products = read_fallback_feed(csv.as_bytes()).unwrap();
    assert_eq!(
        products,
        vec![
            FallbackProduct {
                name: "Gadget Mini".to_string(),
                reference_price: "19.99".to_string(),
            },
            FallbackProduct {
                name: "Gadget, Large".to_string(),
                reference_price: "24.50".to_string(),
            },
        ]
    );
}

// ---------------------------------------------------------------------------
// Storing
// ---------------------------------------------------------------------------

#[test]
fn listings_are_numbered_from_one() {
    let conn = Connection::open_in_memory().unwrap();
    let listings = vec![parse_listing(PRODUCT_PAGE), ScrapedListing::unavailable()];

    let summary = store_listings(&conn, &listings, date("2024-01-01")).unwrap();
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.updated, 0);

    let records = conn.price_records().unwrap();
    assert_eq!(records[0].product_id, 1);
    assert_eq!(records[0].seller, "Acme GmbH");
    assert_eq!(records[0].source.as_deref(), Some(SCRAPED_SOURCE));
    assert_eq!(records[1].product_id, 2);
    assert_eq!(records[1].price.as_deref(), Some("Sold Out"));
}

#[test]
fn rescraping_same_day_updates() {
    let conn = Connection::open_in_memory().unwrap();
    let listings = vec![parse_listing(PRODUCT_PAGE)];
    store_listings(&conn, &listings, date("2024-01-01")).unwrap();

    let summary = store_listings(&conn, &listings, date("2024-01-01")).unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.total(), 1);
    assert_eq!(ObservationQuery::new(&conn).count().unwrap(), 1);
}

#[test]
fn fallbacks_are_recorded_for_every_fallback_seller() {
    let conn = Connection::open_in_memory().unwrap();
    let products = vec![
        FallbackProduct {
            name: "Gadget Mini".to_string(),
            reference_price: "19.99".to_string(),
        },
        FallbackProduct {
            name: "Gadget Max".to_string(),
            reference_price: "39.99".to_string(),
        },
    ];

    let summary = store_fallbacks(&conn, &products, 4, date("2024-01-01")).unwrap();
    assert_eq!(summary.inserted, products.len() * FALLBACK_SELLERS.len());

    let rows = ObservationQuery::new(&conn).history("Gadget Max", None, None).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.product_id == 5));
    assert!(rows.iter().all(|r| r.price.as_deref() == Some("39.99")));

    let sellers: Vec<&str> = rows.iter().map(|r| r.seller.as_str()).collect();
    assert_eq!(sellers, vec!["OTTO", "Our Company", "eBay"]);

    let otto = rows.iter().find(|r| r.seller == "OTTO").unwrap();
    assert_eq!(otto.source.as_deref(), Some("Otto Fallback"));
}
