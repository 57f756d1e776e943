//! Integration tests for canonize.

use std::io::Write;

use chrono::NaiveDate;
use tempfile::{NamedTempFile, tempdir};

use canonize::input::{Cell, RawTable};
use canonize::pipeline::{
    clean_card_data, clean_date_times_data, clean_orders_data, clean_products_data,
    clean_user_data,
};
use canonize::{
    CanonizeError, Canonizer, CanonizerConfig, EntityKind, OutputFormat, ParserConfig, Value,
};

const UUID_A: &str = "93caf182-e4e9-4c6e-bebb-60a1a9dcf9b8";
const UUID_B: &str = "8fe96c3a-d62d-4eb5-b313-cf12d9126a49";

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// Helper to create a temporary file with a specific extension.
fn create_test_file_with_suffix(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

// =============================================================================
// Card Details
// =============================================================================

#[test]
fn test_clean_card_csv() {
    let content = "card_number,expiry_date,card_provider,date_payment_confirmed\n\
                   4971858637664481,09/26,VISA 16 digit,2015-11-25\n\
                   NULL,NULL,NULL,NULL\n\
                   3554954842403145,May-23,JCB 16 digit,December 2021 17\n\
                   4971858637664481,09/26,VISA 16 digit,2015-11-25\n\
                   12345678901234567,01/27,VISA 19 digit,2001 March 12\n\
                   GP8A8UQ5Q8,10/23,Maestro,2017/01/05\n";
    let file = create_test_file(content);

    let outcome = Canonizer::new()
        .clean_file(EntityKind::Card, file.path())
        .expect("Cleaning failed");

    assert_eq!(outcome.source.format, "csv");
    assert_eq!(outcome.source.row_count, 6);
    assert!(outcome.source.hash.starts_with("sha256:"));

    let table = &outcome.table;
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.value(0, "card_number"), Some(&text("4971858637664481")));
    assert_eq!(table.value(0, "date_payment_confirmed"), Some(&date(2015, 11, 25)));
    assert_eq!(table.value(1, "card_number"), Some(&text("3554954842403145")));
    assert_eq!(table.value(1, "expiry_date"), Some(&Value::Null));
    assert_eq!(table.value(1, "date_payment_confirmed"), Some(&date(2021, 12, 17)));

    let report = &outcome.report;
    assert_eq!(report.rows_in, 6);
    assert_eq!(report.rows_out, 2);
    assert_eq!(report.dropped_missing_required, 3);
    assert_eq!(report.dropped_duplicates, 1);
    assert_eq!(report.columns["card_number"].values_nulled, 2);
    assert_eq!(report.columns["expiry_date"].values_nulled, 1);

    let keys = report.distinct_keys.as_ref().expect("card key counts");
    assert_eq!(keys.before, 4);
    assert_eq!(keys.after, 2);
}

#[test]
fn test_card_numbers_from_numeric_cells() {
    let raw = RawTable::new(
        vec!["card_number".into(), "expiry_date".into()],
        vec![
            vec![Cell::Integer(2314734659486501), "11/25".into()],
            vec![Cell::Float(30060773296197.0), "02/24".into()],
            vec![Cell::Float(4.5), "02/24".into()],
            vec![Cell::Integer(-4971858637664481), "02/24".into()],
        ],
    );
    let result = clean_card_data(&raw);

    assert_eq!(result.table.row_count(), 2);
    assert_eq!(result.table.value(0, "card_number"), Some(&text("2314734659486501")));
    assert_eq!(result.table.value(1, "card_number"), Some(&text("30060773296197")));
}

// =============================================================================
// Store Details
// =============================================================================

#[test]
fn test_clean_store_json_columns() {
    let content = r#"{
        "index": {"0": 0, "1": 1, "2": 2},
        "store_code": {"0": "WEB-1388012W", "1": "BL-8387506C", "2": "HI-9B97EE4E"},
        "longitude": {"0": "91.2", "1": "N/A", "2": "-0.5"},
        "latitude": {"0": "bad", "1": "12", "2": null},
        "lat": {"0": "45.0", "1": null, "2": "51.6"},
        "staff_numbers": {"0": "34", "1": "J78", "2": "3n9"},
        "opening_date": {"0": "2006-10-04", "1": "1994 November 24", "2": "October 2012 08"}
    }"#;
    let file = create_test_file_with_suffix(content, ".json");

    let outcome = Canonizer::new()
        .clean_file(EntityKind::Store, file.path())
        .expect("Cleaning failed");
    let table = &outcome.table;

    assert_eq!(outcome.source.format, "json");
    assert_eq!(
        table.headers,
        vec!["index", "store_code", "longitude", "latitude", "lat", "staff_numbers", "opening_date"]
    );
    assert_eq!(table.row_count(), 2);

    assert_eq!(table.value(0, "longitude"), Some(&Value::Float(91.2)));
    assert_eq!(table.value(0, "latitude"), Some(&Value::Null));
    assert_eq!(table.value(0, "lat"), Some(&Value::Float(45.0)));
    assert_eq!(table.value(0, "staff_numbers"), Some(&Value::Int(34)));
    assert_eq!(table.value(0, "opening_date"), Some(&date(2006, 10, 4)));
    assert_eq!(table.value(0, "index"), Some(&Value::Int(0)));

    assert_eq!(table.value(1, "store_code"), Some(&text("HI-9B97EE4E")));
    assert_eq!(table.value(1, "staff_numbers"), Some(&Value::Null));
    assert_eq!(table.value(1, "opening_date"), Some(&date(2012, 10, 8)));

    assert_eq!(outcome.report.dropped_missing_required, 1);
}

#[test]
fn test_store_custom_null_token() {
    let content = "store_code,longitude,lat\nBL-8387506C,N/A,12\nWEB-1388012W,1.5,2.5\n";
    let file = create_test_file(content);

    let config = CanonizerConfig::default()
        .with_parser(ParserConfig::default().with_null_token("N/A"));
    let outcome = Canonizer::with_config(config)
        .clean_file(EntityKind::Store, file.path())
        .expect("Cleaning failed");

    assert_eq!(outcome.table.row_count(), 1);
    assert_eq!(outcome.report.columns["longitude"].values_nulled, 0);
    assert_eq!(outcome.report.columns["longitude"].null_count, 1);
}

// =============================================================================
// Products
// =============================================================================

#[test]
fn test_clean_products_json_records() {
    let content = format!(
        r#"[
        {{"product_name": "FurReal Dazzlin' Dimples", "product_price": "£39.99", "weight": "12 x 100g",
          "category": "toys-and-games", "date_added": "2005-12-02", "uuid": "{a}",
          "removed": "Still_avaliable", "product_code": "R7-3126933h"}},
        {{"product_name": "Tea Tree Oil", "product_price": "£9.99", "weight": "1.6kg",
          "category": "health-and-beauty", "date_added": "2006 October 22", "uuid": "{b}",
          "removed": "Removed", "product_code": "C2-7287916l"}},
        {{"product_name": "Orphan", "product_price": "£1.00", "weight": "77g .",
          "category": "pets", "date_added": "2010-01-01", "uuid": "{a}",
          "removed": "Still_available", "product_code": null}},
        {{"product_name": "Bottled water", "product_price": "£0.50", "weight": "500ml",
          "category": "food", "date_added": "2018-05-09", "uuid": "not-a-uuid",
          "removed": "still_available", "product_code": "A1-0000001x"}}
    ]"#,
        a = UUID_A,
        b = UUID_B
    );
    let file = create_test_file_with_suffix(&content, ".json");

    let outcome = Canonizer::new()
        .clean_file(EntityKind::Product, file.path())
        .expect("Cleaning failed");
    let table = &outcome.table;

    assert_eq!(
        table.headers,
        vec![
            "product_name",
            "product_price",
            "weight",
            "category",
            "date_added",
            "uuid",
            "still_available",
            "product_code"
        ]
    );
    assert_eq!(table.row_count(), 3);

    assert_eq!(table.value(0, "product_price"), Some(&Value::Float(39.99)));
    // The pack separator is dropped, leaving 12100 grams.
    assert_eq!(table.value(0, "weight"), Some(&Value::Float(12.1)));
    // Misspelled availability flags are not guessed at.
    assert_eq!(table.value(0, "still_available"), Some(&Value::Null));

    assert_eq!(table.value(1, "weight"), Some(&Value::Float(1.6)));
    assert_eq!(table.value(1, "still_available"), Some(&Value::Bool(false)));
    assert_eq!(table.value(1, "date_added"), Some(&date(2006, 10, 22)));

    assert_eq!(table.value(2, "weight"), Some(&Value::Float(0.5)));
    assert_eq!(table.value(2, "uuid"), Some(&Value::Null));
    assert_eq!(table.value(2, "still_available"), Some(&Value::Bool(true)));

    assert_eq!(outcome.report.dropped_columns, vec!["removed"]);
}

#[test]
fn test_products_without_removed_column_reparse_availability() {
    let raw = RawTable::from_strings(
        &["product_code", "still_available"],
        &[&["R7-3126933h", "true"], &["C2-7287916l", "FALSE"], &["A1-0000001x", "maybe"]],
    );
    let result = clean_products_data(&raw);

    assert_eq!(result.table.headers, vec!["product_code", "still_available"]);
    assert_eq!(result.table.value(0, "still_available"), Some(&Value::Bool(true)));
    assert_eq!(result.table.value(1, "still_available"), Some(&Value::Bool(false)));
    assert_eq!(result.table.value(2, "still_available"), Some(&Value::Null));
}

// =============================================================================
// Users, Orders and Date Times
// =============================================================================

#[test]
fn test_clean_users() {
    let raw = RawTable::new(
        vec![
            "first_name".into(),
            "date_of_birth".into(),
            "join_date".into(),
            "user_uuid".into(),
        ],
        vec![
            vec!["Sigfried".into(), "1944 October 01".into(), "GFSD8H1PLD".into(), UUID_A.into()],
            vec!["Guy".into(), "15-Mar-2022".into(), "2001/03/02".into(), Cell::Integer(1234)],
            vec!["Harry".into(), "03/04/2021".into(), "2015-03-05".into(), UUID_B.into()],
        ],
    );
    let result = clean_user_data(&raw);
    let table = &result.table;

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.value(0, "date_of_birth"), Some(&date(1944, 10, 1)));
    assert_eq!(table.value(0, "join_date"), Some(&Value::Null));
    // Ambiguous slashed dates read day first.
    assert_eq!(table.value(1, "date_of_birth"), Some(&date(2021, 4, 3)));
    assert_eq!(table.value(1, "user_uuid"), Some(&text(UUID_B)));
}

#[test]
fn test_clean_orders() {
    let raw = RawTable::new(
        vec![
            "level_0".into(),
            "index".into(),
            "date_uuid".into(),
            "first_name".into(),
            "last_name".into(),
            "user_uuid".into(),
            "card_number".into(),
            "store_code".into(),
            "product_code".into(),
            "1".into(),
            "product_quantity".into(),
        ],
        vec![
            vec![
                Cell::Integer(0),
                Cell::Integer(0),
                UUID_A.into(),
                "Ann".into(),
                "Lee".into(),
                UUID_B.into(),
                Cell::Integer(4971858637664481),
                "BL-8387506C".into(),
                "R7-3126933h".into(),
                Cell::Missing,
                "3".into(),
            ],
            vec![
                Cell::Integer(1),
                Cell::Integer(1),
                "short".into(),
                "Bo".into(),
                "Ray".into(),
                UUID_A.into(),
                Cell::Integer(12345678901234567),
                "BL-8387506C".into(),
                "C2-7287916l".into(),
                Cell::Missing,
                "1".into(),
            ],
        ],
    );
    let result = clean_orders_data(&raw);
    let table = &result.table;

    assert_eq!(
        table.headers,
        vec![
            "index",
            "date_uuid",
            "user_uuid",
            "card_number",
            "store_code",
            "product_code",
            "product_quantity"
        ]
    );
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.value(0, "card_number"), Some(&text("4971858637664481")));
    assert_eq!(table.value(0, "product_quantity"), Some(&Value::Int(3)));
    assert_eq!(
        result.report.dropped_columns,
        vec!["level_0", "first_name", "last_name", "1"]
    );
}

#[test]
fn test_clean_date_times() {
    let raw = RawTable::from_strings(
        &["timestamp", "month", "year", "day", "time_period", "date_uuid"],
        &[
            &["22:00:06", "9", "2012", "19", "Evening", UUID_A],
            &["17:29:45", "2", "1997", "10", "NULL", UUID_B],
            &["22:00:06", "9", "2012", "19", "Evening", UUID_A],
            &["7:02", "1", "2003", "1", "Morning", UUID_B],
        ],
    );
    let result = clean_date_times_data(&raw);

    // The short timestamp is not validated, so that row survives.
    assert_eq!(result.table.row_count(), 2);
    assert_eq!(result.table.value(0, "year"), Some(&text("2012")));
    assert_eq!(result.table.value(1, "timestamp"), Some(&text("7:02")));
    assert_eq!(result.report.dropped_missing_required, 1);
    assert_eq!(result.report.dropped_duplicates, 1);
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_cleaning_clean_output_changes_nothing() {
    let store = RawTable::from_strings(
        &["store_code", "longitude", "latitude", "lat", "staff_numbers", "opening_date"],
        &[
            &["WEB-1388012W", "91.2", "bad", "45.0", "34", "1994 November 24"],
            &["BL-8387506C", "-0.5", "51.5", "NULL", "x", "2006-10-04"],
        ],
    );
    let product = RawTable::from_strings(
        &["product_code", "product_price", "weight", "removed", "uuid", "date_added"],
        &[
            &["R7-3126933h", "£39.99", "12 x 100g", "Still_available", UUID_A, "2005-12-02"],
            &["C2-7287916l", "£9.99", "2l", "Removed", "x", "October 2012 08"],
        ],
    );
    let card = RawTable::from_strings(
        &["card_number", "expiry_date", "date_payment_confirmed"],
        &[&["4971858637664481", "09/26", "2015-11-25"], &["0044", "1/2", "junk"]],
    );

    for (kind, raw) in [
        (EntityKind::Store, store),
        (EntityKind::Product, product),
        (EntityKind::Card, card),
    ] {
        let first = canonize::pipeline::clean(kind, &raw);
        let second = canonize::pipeline::clean(kind, &first.table.to_raw());
        assert_eq!(first.table, second.table, "{} is not idempotent", kind);
        assert_eq!(second.report.rows_dropped(), 0);
    }
}

// =============================================================================
// Output
// =============================================================================

#[test]
fn test_clean_file_to_json_and_back() {
    let content = "store_code,longitude,latitude,lat,opening_date\n\
                   WEB-1388012W,91.2,bad,45.0,2006-10-04\n\
                   BL-8387506C,1.5,2.5,,NULL\n";
    let input = create_test_file(content);
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("clean").join("dim_store_details.json");

    let canonizer = Canonizer::new();
    let first = canonizer
        .clean_file_to(EntityKind::Store, input.path(), &output)
        .expect("Cleaning failed");
    assert!(output.exists());

    let second = canonizer
        .clean_file(EntityKind::Store, &output)
        .expect("Re-cleaning failed");
    assert_eq!(first.table, second.table);
}

#[test]
fn test_clean_file_to_replaces_existing_output() {
    let input = create_test_file("card_number\n4971858637664481\n");
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("dim_card_details.csv");
    std::fs::write(&output, "stale,content\n1,2\n3,4\n5,6\n").unwrap();

    let config = CanonizerConfig::default().with_output_format(OutputFormat::Csv);
    Canonizer::with_config(config)
        .clean_file_to(EntityKind::Card, input.path(), &output)
        .expect("Cleaning failed");

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, "card_number\n4971858637664481\n");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_missing_file_is_io_error() {
    let err = Canonizer::new()
        .clean_file(EntityKind::User, "/nonexistent/users.csv")
        .unwrap_err();
    assert!(matches!(err, CanonizeError::Io { .. }));
}

#[test]
fn test_empty_file_is_rejected() {
    let file = create_test_file("");
    let err = Canonizer::new()
        .clean_file(EntityKind::User, file.path())
        .unwrap_err();
    assert!(matches!(err, CanonizeError::EmptyData(_)));
}

#[test]
fn test_refuses_to_overwrite_input() {
    let file = create_test_file("card_number\n1\n");
    let err = Canonizer::new()
        .clean_file_to(EntityKind::Card, file.path(), file.path())
        .unwrap_err();
    assert!(matches!(err, CanonizeError::Config(_)));
}

#[test]
fn test_refuses_to_overwrite_input_through_another_spelling() {
    let file = create_test_file("card_number\n1\n");
    let parent = file.path().parent().unwrap();
    let alias = parent
        .join("..")
        .join(parent.file_name().unwrap())
        .join(file.path().file_name().unwrap());
    assert_ne!(alias.as_path(), file.path());

    let err = Canonizer::new()
        .clean_file_to(EntityKind::Card, file.path(), &alias)
        .unwrap_err();
    assert!(matches!(err, CanonizeError::Config(_)));
    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "card_number\n1\n");
}

#[test]
fn test_unknown_entity() {
    let err = "invoices".parse::<EntityKind>().unwrap_err();
    assert!(err.to_string().contains("invoices"));
}

#[test]
fn test_header_only_file_gives_empty_table() {
    let file = create_test_file("user_uuid,first_name\n");
    let outcome = Canonizer::new()
        .clean_file(EntityKind::User, file.path())
        .expect("Cleaning failed");
    assert!(outcome.table.is_empty());
    assert_eq!(outcome.table.headers, vec!["user_uuid", "first_name"]);
}
