use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use preparse_db::{ContentStore, StorageError};
use preparse_field::{FieldPlugin, HostServices, PreparseField, PreparseService};
use preparse_model::{ColumnType, Element, FieldConfiguration, StorageType};
use preparse_types::{ElementId, FieldValue};
use serde_json::json;

fn store_with(fields: &[(&str, ColumnType)]) -> ContentStore {
    let store = ContentStore::open_in_memory().unwrap();
    for (handle, column) in fields {
        store
            .ensure_field_column(&FieldConfiguration::new(*handle), *column)
            .unwrap();
    }
    store
}

// ── Columns ──────────────────────────────────────────────────────

#[test]
fn ensure_column_is_idempotent() {
    let store = ContentStore::open_in_memory().unwrap();
    let config = FieldConfiguration::new("summary");
    assert!(store.ensure_field_column(&config, ColumnType::Text).unwrap());
    assert!(!store.ensure_field_column(&config, ColumnType::Text).unwrap());
    assert_eq!(store.field_handles().unwrap(), vec!["summary".to_string()]);
    assert_eq!(store.column_type("summary").unwrap().as_deref(), Some("text"));
}

#[test]
fn existing_column_type_is_kept() {
    let store = store_with(&[("price", ColumnType::Decimal { precision: 21, scale: 2 })]);
    let changed = store
        .ensure_field_column(&FieldConfiguration::new("price"), ColumnType::Integer)
        .unwrap();
    assert!(!changed);
    assert_eq!(store.column_type("price").unwrap().as_deref(), Some("decimal(21,2)"));
}

#[test]
fn invalid_handle_is_rejected() {
    let store = ContentStore::open_in_memory().unwrap();
    let err = store
        .ensure_field_column(&FieldConfiguration::new("x\"; DROP TABLE content; --"), ColumnType::Text)
        .unwrap_err();
    assert!(matches!(err, StorageError::Config(_)));
    assert!(store.field_handles().unwrap().is_empty());
}

#[test]
fn handles_are_sorted() {
    let store = store_with(&[("zeta", ColumnType::Text), ("alpha", ColumnType::Integer)]);
    assert_eq!(store.field_handles().unwrap(), vec!["alpha", "zeta"]);
}

// ── Values ───────────────────────────────────────────────────────

#[test]
fn save_and_load_value() {
    let store = store_with(&[("summary", ColumnType::Text)]);
    let id = ElementId::new();
    store.save_value(id, "summary", &json!("Dune (1965)")).unwrap();
    assert_eq!(store.load_value(id, "summary").unwrap(), Some(json!("Dune (1965)")));

    store.save_value(id, "summary", &json!(null)).unwrap();
    assert_eq!(store.load_value(id, "summary").unwrap(), Some(json!(null)));
}

#[test]
fn missing_row_loads_none() {
    let store = store_with(&[("summary", ColumnType::Text)]);
    assert_eq!(store.load_value(ElementId::new(), "summary").unwrap(), None);
    assert_eq!(store.load_values(ElementId::new()).unwrap(), None);
}

#[test]
fn unknown_field_is_an_error() {
    let store = store_with(&[("summary", ColumnType::Text)]);
    let err = store.save_value(ElementId::new(), "nope", &json!(1)).unwrap_err();
    assert!(matches!(err, StorageError::UnknownField(ref h) if h == "nope"));
    assert!(matches!(
        store.load_value(ElementId::new(), "nope"),
        Err(StorageError::UnknownField(_))
    ));
}

#[test]
fn column_types_coerce_stored_text() {
    let store = store_with(&[
        ("count", ColumnType::Integer),
        ("price", ColumnType::Decimal { precision: 21, scale: 2 }),
        ("label", ColumnType::MediumText),
        ("published", ColumnType::DateTime),
    ]);
    let id = ElementId::new();
    store.save_value(id, "count", &json!("42")).unwrap();
    store.save_value(id, "price", &json!("19.50")).unwrap();
    store.save_value(id, "label", &json!(42)).unwrap();
    store.save_value(id, "published", &json!("2024-01-02 03:04:05")).unwrap();

    let values = store.load_values(id).unwrap().unwrap();
    assert_eq!(values["count"], json!(42));
    assert_eq!(values["price"], json!(19.5));
    assert_eq!(values["label"], json!("42"));
    assert_eq!(values["published"], json!("2024-01-02 03:04:05"));
}

#[test]
fn non_numeric_text_survives_numeric_columns() {
    let store = store_with(&[("count", ColumnType::Integer)]);
    let id = ElementId::new();
    store.save_value(id, "count", &json!("not a number")).unwrap();
    assert_eq!(store.load_value(id, "count").unwrap(), Some(json!("not a number")));
}

#[test]
fn structured_values_are_stored_as_json_text() {
    let store = store_with(&[("tags", ColumnType::Text), ("flag", ColumnType::Integer)]);
    let id = ElementId::new();
    store.save_value(id, "tags", &json!(["a", "b"])).unwrap();
    store.save_value(id, "flag", &json!(true)).unwrap();
    assert_eq!(store.load_value(id, "tags").unwrap(), Some(json!(r#"["a","b"]"#)));
    assert_eq!(store.load_value(id, "flag").unwrap(), Some(json!(1)));
}

#[test]
fn load_values_includes_unset_columns_as_null() {
    let store = store_with(&[("a", ColumnType::Text), ("b", ColumnType::Text)]);
    let id = ElementId::new();
    store.save_value(id, "a", &json!("x")).unwrap();
    let values = store.load_values(id).unwrap().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values["a"], json!("x"));
    assert_eq!(values["b"], json!(null));
}

#[test]
fn delete_element_removes_row() {
    let store = store_with(&[("a", ColumnType::Text)]);
    let id = ElementId::new();
    store.save_value(id, "a", &json!("x")).unwrap();
    assert!(store.delete_element(id).unwrap());
    assert!(!store.delete_element(id).unwrap());
    assert_eq!(store.load_value(id, "a").unwrap(), None);
}

#[test]
fn save_element_writes_only_known_columns() {
    let store = store_with(&[("summary", ColumnType::Text)]);
    let element = Element::new("entry").with_data(json!({"summary": "hi", "other": 3}));
    let written = store.save_element(&element).unwrap();
    assert_eq!(written, vec!["summary".to_string()]);
    assert_eq!(
        store.load_values(element.id).unwrap().unwrap(),
        json!({"summary": "hi"}).as_object().unwrap().clone()
    );
}

#[test]
fn values_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("content.db");
    let id = ElementId::new();
    {
        let store = ContentStore::open(&path).unwrap();
        store
            .ensure_field_column(&FieldConfiguration::new("summary"), ColumnType::Text)
            .unwrap();
        store.save_value(id, "summary", &json!("kept")).unwrap();
    }
    let store = ContentStore::open(&path).unwrap();
    assert_eq!(store.field_handles().unwrap(), vec!["summary"]);
    assert_eq!(store.load_value(id, "summary").unwrap(), Some(json!("kept")));
}

// ── Typed reads ──────────────────────────────────────────────────

#[test]
fn datetime_columns_read_back_as_datetimes() {
    let store = store_with(&[("published", ColumnType::DateTime)]);
    let id = ElementId::new();
    store.save_value(id, "published", &json!("2024-01-02 03:04:05")).unwrap();

    let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(
        store.load_datetime(id, "published").unwrap(),
        Some(FieldValue::DateTime(expected))
    );

    store.save_value(id, "published", &json!(null)).unwrap();
    assert_eq!(store.load_datetime(id, "published").unwrap(), Some(FieldValue::Null));
    assert_eq!(store.load_datetime(ElementId::new(), "published").unwrap(), None);
}

#[test]
fn malformed_stored_datetime_is_an_error() {
    let store = store_with(&[("published", ColumnType::DateTime), ("count", ColumnType::Integer)]);
    let id = ElementId::new();
    store.save_value(id, "published", &json!("yesterday")).unwrap();
    store.save_value(id, "count", &json!(3)).unwrap();

    assert!(matches!(
        store.load_datetime(id, "published"),
        Err(StorageError::Value(preparse_types::Error::InvalidDateTime(_)))
    ));
    assert!(matches!(
        store.load_datetime(id, "count"),
        Err(StorageError::InvalidData(_))
    ));
}

#[test]
fn element_ids_lists_rows_in_creation_order() {
    let store = store_with(&[("a", ColumnType::Text)]);
    let first = ElementId::new();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = ElementId::new();
    store.save_value(second, "a", &json!("2")).unwrap();
    store.save_value(first, "a", &json!("1")).unwrap();
    assert_eq!(store.element_ids().unwrap(), vec![first, second]);
}

#[test]
fn corrupt_element_id_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("content.db");
    let store = ContentStore::open(&path).unwrap();
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute("INSERT INTO content (element_id) VALUES ('not-an-id')", [])
        .unwrap();

    assert!(matches!(
        store.element_ids(),
        Err(StorageError::Value(preparse_types::Error::InvalidId { .. }))
    ));
}

// ── With the field type ──────────────────────────────────────────

#[test]
fn parsed_values_round_trip_through_the_content_table() {
    let services = HostServices::with_default_renderer().unwrap();
    let mut summary = FieldConfiguration::new("summary")
        .with_expression("{{ element.title }} ({{ element.year }})");
    summary.parse_before_save = true;
    let mut released = FieldConfiguration::new("released")
        .with_expression("{{ element.year }}-08-01 09:00")
        .with_storage(StorageType::DateTime);
    released.parse_before_save = true;
    let configs = vec![summary, released];

    let store = ContentStore::open_in_memory().unwrap();
    let fields: Vec<PreparseField> = configs
        .iter()
        .map(|c| PreparseField::new(c.clone(), services.clone()))
        .collect();
    for field in &fields {
        store
            .ensure_field_column(field.config(), field.content_column_type())
            .unwrap();
    }
    assert_eq!(store.column_type("released").unwrap().as_deref(), Some("datetime"));

    let mut element = Element::new("entry")
        .with_title("Dune")
        .with_data(json!({"year": 1965}));
    let outcome = PreparseService::new(services).before_save(&mut element, &configs);
    assert!(outcome.is_clean());
    store.save_element(&element).unwrap();

    let stored = store.load_values(element.id).unwrap().unwrap();
    assert_eq!(stored["summary"], json!("Dune (1965)"));
    assert_eq!(stored["released"], json!("1965-08-01 09:00:00"));

    let released = fields[1].normalize_value(stored["released"].clone(), Some(&element));
    assert!(matches!(released, FieldValue::DateTime(_)));
    assert_eq!(store.load_datetime(element.id, "released").unwrap(), Some(released));
}
