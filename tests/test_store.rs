//! Store integration tests: schema, upsert semantics and observation queries.

mod common;

use price_rank::models::UpsertOutcome;
use price_rank::queries::ObservationQuery;
use price_rank::{Connection, PriceStore};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[test]
fn open_creates_file_and_parent_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("prices.duckdb");

    let conn = Connection::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(conn.path(), Some(path.as_path()));
}

#[test]
fn ensure_schema_is_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    conn.ensure_schema().unwrap();
    assert_eq!(ObservationQuery::new(&conn).count().unwrap(), 0);
}

#[test]
fn rows_survive_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("prices.duckdb");
    {
        let conn = Connection::open(&path).unwrap();
        common::seed(&conn, &common::sample_rows());
    }
    let conn = Connection::open(&path).unwrap();
    assert_eq!(ObservationQuery::new(&conn).count().unwrap(), 12);
}

// ---------------------------------------------------------------------------
// upsert
// ---------------------------------------------------------------------------

#[test]
fn upsert_inserts_then_updates_same_day_row() {
    let conn = Connection::open_in_memory().unwrap();
    let first = common::new_obs(1, "Widget", "A", Some("18.00"), "2024-01-01");
    let second = common::new_obs(1, "Widget Deluxe", "A", Some("17.50"), "2024-01-01");

    assert_eq!(conn.upsert(&first).unwrap(), UpsertOutcome::Inserted);
    assert_eq!(conn.upsert(&second).unwrap(), UpsertOutcome::Updated);

    let records = conn.price_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].price.as_deref(), Some("17.50"));
    assert_eq!(records[0].product_title.as_deref(), Some("Widget Deluxe"));
    assert_eq!(records[0].date, "2024-01-01");
}

#[test]
fn upsert_keeps_separate_rows_per_day_and_seller() {
    let conn = Connection::open_in_memory().unwrap();
    common::seed(
        &conn,
        &[
            common::new_obs(1, "Widget", "A", Some("18"), "2024-01-01"),
            common::new_obs(1, "Widget", "A", Some("19"), "2024-01-02"),
            common::new_obs(1, "Widget", "B", Some("20"), "2024-01-01"),
        ],
    );
    assert_eq!(ObservationQuery::new(&conn).count().unwrap(), 3);
}

#[test]
fn upsert_keeps_original_id_on_update() {
    let conn = Connection::open_in_memory().unwrap();
    common::seed(
        &conn,
        &[
            common::new_obs(1, "Widget", "A", Some("18"), "2024-01-01"),
            common::new_obs(1, "Widget", "B", Some("20"), "2024-01-01"),
            common::new_obs(1, "Widget", "A", Some("15"), "2024-01-01"),
        ],
    );
    let records = conn.price_records().unwrap();
    assert_eq!(records[0].seller, "A");
    assert_eq!(records[0].price.as_deref(), Some("15"));
    assert!(records[0].id < records[1].id);
}

// ---------------------------------------------------------------------------
// priced_records
// ---------------------------------------------------------------------------

#[test]
fn price_records_skip_null_prices() {
    let conn = common::setup_store();
    let records = conn.price_records().unwrap();
    assert_eq!(records.len(), 11);
    assert!(records.iter().all(|r| r.price.is_some()));
    assert!(!records.iter().any(|r| r.seller == "D"));
}

#[test]
fn price_records_follow_insertion_order() {
    let conn = common::setup_store();
    let records = conn.price_records().unwrap();
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(records[0].seller, "Our Company");
    assert_eq!(records[0].source.as_deref(), Some("Amazon"));
}

// ---------------------------------------------------------------------------
// ObservationQuery
// ---------------------------------------------------------------------------

#[test]
fn products_in_first_appearance_order() {
    let conn = common::setup_store();
    let products = ObservationQuery::new(&conn).products(&[]).unwrap();
    assert_eq!(products, vec!["Widget", "Gadget", "N/A"]);
}

#[test]
fn products_skip_excluded_titles() {
    let conn = common::setup_store();
    let products = ObservationQuery::new(&conn).products(&["N/A"]).unwrap();
    assert_eq!(products, vec!["Widget", "Gadget"]);
}

#[test]
fn history_returns_rows_for_product() {
    let conn = common::setup_store();
    let rows = ObservationQuery::new(&conn).history("Widget", None, None).unwrap();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|r| r.product_title.as_deref() == Some("Widget")));
    assert_eq!(rows[0].date, "2024-01-01");
    assert_eq!(rows[5].date, "2024-01-02");
}

#[test]
fn history_respects_date_bounds() {
    let conn = common::setup_store();
    let q = ObservationQuery::new(&conn);

    let rows = q.history("Gadget", Some("2024-01-02"), None).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.date == "2024-01-03"));

    let rows = q.history("Gadget", None, Some("2024-01-01")).unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn history_unknown_product_is_empty() {
    let conn = common::setup_store();
    let rows = ObservationQuery::new(&conn).history("Nothing", None, None).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn product_stats_summarizes_rows() {
    let conn = common::setup_store();
    let stats = ObservationQuery::new(&conn).product_stats("Gadget").unwrap().unwrap();
    assert_eq!(stats.row_count, 5);
    assert_eq!(stats.seller_count, 3);
    assert_eq!(stats.first_date, "2024-01-01");
    assert_eq!(stats.last_date, "2024-01-03");
}

#[test]
fn product_overview_lists_stats_in_first_appearance_order() {
    let conn = common::setup_store();
    let overview = ObservationQuery::new(&conn).product_overview(&["N/A"]).unwrap();

    let titles: Vec<&str> = overview.iter().map(|s| s.product_title.as_str()).collect();
    assert_eq!(titles, vec!["Widget", "Gadget"]);
    assert_eq!(overview[0].row_count, 6);
    assert_eq!(overview[0].seller_count, 3);
    assert_eq!(
        overview[1].to_string(),
        "Gadget\t5 rows\t3 sellers\t2024-01-01..2024-01-03"
    );
}

#[test]
fn product_stats_unknown_product_is_none() {
    let conn = common::setup_store();
    assert!(ObservationQuery::new(&conn).product_stats("Nothing").unwrap().is_none());
}

#[test]
fn execute_scalar_returns_none_for_empty_result() {
    let conn = common::setup_store();
    let result = conn
        .execute_scalar(
            "SELECT id FROM product_data WHERE seller = ?",
            &["nobody".to_string()],
        )
        .unwrap();
    assert!(result.is_none());
}
