//! Loader tests: price and date coercion, placeholder filtering.

mod common;

use price_rank::config::PLACEHOLDER_PRODUCTS;
use price_rank::loader::{coerce_price, load_observations, observations_from_records, parse_date};
use price_rank::models::PriceRecord;

fn record(id: i64, title: Option<&str>, price: Option<&str>, date: &str) -> PriceRecord {
    PriceRecord {
        id,
        product_id: 1,
        product_title: title.map(str::to_string),
        seller: "A".to_string(),
        price: price.map(str::to_string),
        date: date.to_string(),
        source: None,
    }
}

// ---------------------------------------------------------------------------
// coerce_price
// ---------------------------------------------------------------------------

#[test]
fn coerce_plain_numbers() {
    assert_eq!(coerce_price("19.99"), Some(19.99));
    assert_eq!(coerce_price("20"), Some(20.0));
    assert_eq!(coerce_price("  7.5 "), Some(7.5));
    assert_eq!(coerce_price("0"), Some(0.0));
}

#[test]
fn coerce_strips_currency_symbols() {
    assert_eq!(coerce_price("€29.99"), Some(29.99));
    assert_eq!(coerce_price("$5"), Some(5.0));
    assert_eq!(coerce_price("12.00 £"), Some(12.0));
}

#[test]
fn coerce_decimal_comma_and_thousands() {
    assert_eq!(coerce_price("12,99"), Some(12.99));
    assert_eq!(coerce_price("€9,50"), Some(9.5));
    assert_eq!(coerce_price("1,299.00"), Some(1299.0));
}

#[test]
fn coerce_comma_before_three_digits_is_thousands() {
    assert_eq!(coerce_price("1,299"), Some(1299.0));
    assert_eq!(coerce_price("£1,299"), Some(1299.0));
    assert_eq!(coerce_price("1,299,000"), Some(1_299_000.0));
    assert_eq!(coerce_price("1,5"), Some(1.5));
}

#[test]
fn coerce_rejects_ambiguous_separators() {
    assert_eq!(coerce_price("1.299,00"), None);
    assert_eq!(coerce_price("12,3,4"), None);
    assert_eq!(coerce_price("1,2345.00"), None);
}

#[test]
fn coerce_rejects_non_numeric() {
    assert_eq!(coerce_price("Sold Out"), None);
    assert_eq!(coerce_price("N/A"), None);
    assert_eq!(coerce_price(""), None);
    assert_eq!(coerce_price("€"), None);
}

#[test]
fn coerce_rejects_negative_and_non_finite() {
    assert_eq!(coerce_price("-3.00"), None);
    assert_eq!(coerce_price("NaN"), None);
    assert_eq!(coerce_price("inf"), None);
}

// ---------------------------------------------------------------------------
// parse_date
// ---------------------------------------------------------------------------

#[test]
fn parse_iso_and_day_first_dates() {
    assert_eq!(parse_date("2024-01-02"), Some(common::date("2024-01-02")));
    assert_eq!(parse_date("02-01-2024"), Some(common::date("2024-01-02")));
    assert_eq!(parse_date(" 2024-03-15 "), Some(common::date("2024-03-15")));
}

#[test]
fn parse_date_rejects_garbage() {
    assert_eq!(parse_date("yesterday"), None);
    assert_eq!(parse_date("2024-13-01"), None);
    assert_eq!(parse_date(""), None);
}

// ---------------------------------------------------------------------------
// observations_from_records
// ---------------------------------------------------------------------------

#[test]
fn drops_placeholder_and_blank_titles() {
    let records = vec![
        record(1, Some("Widget"), Some("10"), "2024-01-01"),
        record(2, Some("N/A"), Some("10"), "2024-01-01"),
        record(3, Some("   "), Some("10"), "2024-01-01"),
        record(4, None, Some("10"), "2024-01-01"),
    ];
    let observations = observations_from_records(records, PLACEHOLDER_PRODUCTS);
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].product, "Widget");
}

#[test]
fn drops_unparseable_prices_and_dates() {
    let records = vec![
        record(1, Some("Widget"), Some("Sold Out"), "2024-01-01"),
        record(2, Some("Widget"), None, "2024-01-01"),
        record(3, Some("Widget"), Some("10"), "not a date"),
        record(4, Some("Widget"), Some("11"), "2024-01-02"),
    ];
    let observations = observations_from_records(records, PLACEHOLDER_PRODUCTS);
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].price, 11.0);
    assert_eq!(observations[0].date, common::date("2024-01-02"));
}

#[test]
fn trims_product_titles() {
    let records = vec![record(1, Some("  Widget "), Some("10"), "2024-01-01")];
    let observations = observations_from_records(records, &[]);
    assert_eq!(observations[0].product, "Widget");
}

// ---------------------------------------------------------------------------
// load_observations
// ---------------------------------------------------------------------------

#[test]
fn load_from_store_filters_everything_unusable() {
    let conn = common::setup_store();
    let observations = load_observations(&conn, PLACEHOLDER_PRODUCTS).unwrap();

    // 12 rows: one NULL price, one "N/A" product, one "Sold Out" competitor
    assert_eq!(observations.len(), 9);
    assert!(observations.iter().all(|o| o.product != "N/A"));

    let gadget_ours = observations
        .iter()
        .find(|o| o.product == "Gadget" && o.date == common::date("2024-01-03"))
        .unwrap();
    assert_eq!(gadget_ours.seller, "Our Company");
    assert_eq!(gadget_ours.price, 9.5);
}

#[test]
fn load_from_empty_store_is_empty() {
    let conn = price_rank::Connection::open_in_memory().unwrap();
    assert!(load_observations(&conn, PLACEHOLDER_PRODUCTS).unwrap().is_empty());
}
