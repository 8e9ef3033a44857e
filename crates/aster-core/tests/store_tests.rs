use aster_core::{AsterError, DataStore, Filter, Row, Value};
use tempfile::TempDir;

const PEOPLE: [(&str, &str); 3] = [
    ("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
    ("name", "TEXT NOT NULL UNIQUE"),
    ("age", "INTEGER"),
];

fn people_store() -> DataStore {
    let store = DataStore::open_in_memory().unwrap();
    store.create_table("people", PEOPLE).unwrap();
    store
}

fn person(name: &str, age: i64) -> Row {
    Row::new().with("name", name).with("age", age)
}

// ========================================================================
// Opening and schema
// ========================================================================

#[test]
fn test_open_rejects_empty_path() {
    assert!(matches!(DataStore::open(""), Err(AsterError::Configuration(_))));
    assert!(matches!(DataStore::open("   "), Err(AsterError::Configuration(_))));
}

#[test]
fn test_open_creates_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.db");

    let store = DataStore::open(&path).unwrap();
    store.create_table("people", PEOPLE).unwrap();

    assert!(path.exists());
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn test_create_table_twice_is_noop() {
    let store = people_store();
    store.insert("people", &person("ada", 36)).unwrap();

    store.create_table("people", PEOPLE).unwrap();

    assert_eq!(store.select("people", None, None).unwrap().len(), 1);
}

#[test]
fn test_create_table_with_different_schema_keeps_existing() {
    let store = people_store();
    store
        .create_table("people", [("other", "TEXT")])
        .unwrap();

    // Original columns still work, the new one was never added.
    store.insert("people", &person("ada", 36)).unwrap();
    let err = store
        .insert("people", &Row::new().with("other", "x"))
        .unwrap_err();
    assert!(matches!(err, AsterError::Database(_)));
}

#[test]
fn test_create_table_without_columns_fails() {
    let store = DataStore::open_in_memory().unwrap();
    let columns: Vec<(&str, &str)> = Vec::new();
    assert!(matches!(
        store.create_table("empty", columns),
        Err(AsterError::Configuration(_))
    ));
}

#[test]
fn test_drop_table() {
    let store = people_store();
    store.drop_table("people").unwrap();
    store.drop_table("people").unwrap();

    assert!(matches!(
        store.select("people", None, None),
        Err(AsterError::Database(_))
    ));
}

#[test]
fn test_odd_identifiers_are_quoted() {
    let store = DataStore::open_in_memory().unwrap();
    store
        .create_table("my \"odd\" table", [("select", "TEXT"), ("two words", "INTEGER")])
        .unwrap();
    store
        .insert(
            "my \"odd\" table",
            &Row::new().with("select", "x").with("two words", 2),
        )
        .unwrap();

    let rows = store
        .select("my \"odd\" table", None, Some(&Filter::eq("two words", 2)))
        .unwrap();
    assert_eq!(rows[0].get_str("select"), Some("x"));
}

// ========================================================================
// CRUD
// ========================================================================

#[test]
fn test_insert_then_select_round_trip() {
    let store = people_store();
    let id = store.insert("people", &person("ada", 36)).unwrap();

    let rows = store.select("people", None, None).unwrap();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row.get_i64("id"), Some(id));
    assert_eq!(row.get_str("name"), Some("ada"));
    assert_eq!(row.get_i64("age"), Some(36));
    assert_eq!(row.columns().collect::<Vec<_>>(), ["id", "name", "age"]);
}

#[test]
fn test_select_projection_and_filter() {
    let store = people_store();
    for (name, age) in [("ada", 36), ("bob", 17), ("cy", 52)] {
        store.insert("people", &person(name, age)).unwrap();
    }

    let adults = store
        .select("people", Some(&["name"][..]), Some(&Filter::ge("age", 18)))
        .unwrap();
    let names: Vec<_> = adults.iter().filter_map(|r| r.get_str("name")).collect();
    assert_eq!(names, ["ada", "cy"]);
    assert_eq!(adults[0].len(), 1);

    let either = Filter::eq("name", "bob").or(Filter::gt("age", 50));
    assert_eq!(store.select("people", None, Some(&either)).unwrap().len(), 2);
}

#[test]
fn test_null_values_round_trip() {
    let store = people_store();
    store
        .insert("people", &Row::new().with("name", "nobody").with("age", Value::Null))
        .unwrap();

    let rows = store
        .select("people", None, Some(&Filter::is_null("age")))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].get("age").unwrap().is_null());
}

#[test]
fn test_update_and_delete_counts() {
    let store = people_store();
    for (name, age) in [("ada", 36), ("bob", 17), ("cy", 52)] {
        store.insert("people", &person(name, age)).unwrap();
    }

    let changed = store
        .update("people", &Row::new().with("age", 0), &Filter::lt("age", 40))
        .unwrap();
    assert_eq!(changed, 2);

    let zeroed = store
        .select("people", None, Some(&Filter::eq("age", 0)))
        .unwrap();
    assert_eq!(zeroed.len(), 2);

    assert_eq!(store.delete("people", &Filter::eq("name", "nobody")).unwrap(), 0);
    assert_eq!(store.delete("people", &Filter::eq("age", 0)).unwrap(), 2);
    assert_eq!(store.select("people", None, None).unwrap().len(), 1);
}

#[test]
fn test_in_list_filter() {
    let store = people_store();
    for (name, age) in [("ada", 36), ("bob", 17), ("cy", 52)] {
        store.insert("people", &person(name, age)).unwrap();
    }

    let picked = store
        .select("people", None, Some(&Filter::in_list("name", ["ada", "cy", "zed"])))
        .unwrap();
    assert_eq!(picked.len(), 2);

    let none = store
        .select("people", None, Some(&Filter::in_list("name", Vec::<String>::new())))
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_trusted_sql_filter() {
    let store = people_store();
    for (name, age) in [("ada", 36), ("bob", 17)] {
        store.insert("people", &person(name, age)).unwrap();
    }

    let filter = Filter::trusted_sql("length(\"name\") = ?", vec![Value::from(3)]);
    let rows = store.select("people", None, Some(&filter)).unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_real_and_blob_values_round_trip() {
    let store = DataStore::open_in_memory().unwrap();
    store
        .create_table("samples", [("weight", "REAL"), ("raw", "BLOB")])
        .unwrap();
    store
        .insert(
            "samples",
            &Row::new().with("weight", 2.5).with("raw", vec![0u8, 159, 255]),
        )
        .unwrap();

    let rows = store.select("samples", None, None).unwrap();
    assert_eq!(rows[0].get("weight").and_then(Value::as_f64), Some(2.5));
    assert_eq!(
        rows[0].get("raw").and_then(Value::as_blob),
        Some(&[0u8, 159, 255][..])
    );
}

// ========================================================================
// Errors
// ========================================================================

#[test]
fn test_unique_violation_is_constraint_error() {
    let store = people_store();
    store.insert("people", &person("ada", 36)).unwrap();

    let err = store.insert("people", &person("ada", 99)).unwrap_err();
    assert!(err.is_constraint(), "got {err:?}");
    assert_eq!(store.select("people", None, None).unwrap().len(), 1);
}

#[test]
fn test_not_null_violation_is_constraint_error() {
    let store = people_store();
    let err = store
        .insert("people", &Row::new().with("age", 3))
        .unwrap_err();
    assert!(matches!(err, AsterError::Constraint(_)));
}

#[test]
fn test_misspelled_columns_are_database_errors() {
    let store = people_store();
    store.insert("people", &person("ada", 3)).unwrap();

    let err = store
        .select("people", None, Some(&Filter::eq("nme", "nme")))
        .unwrap_err();
    assert!(matches!(err, AsterError::Database(_)), "got {err:?}");

    let err = store
        .select("people", Some(&["nme"][..]), None)
        .unwrap_err();
    assert!(matches!(err, AsterError::Database(_)), "got {err:?}");

    let err = store
        .update("people", &Row::new().with("age", 9), &Filter::ne("nme", "x"))
        .unwrap_err();
    assert!(matches!(err, AsterError::Database(_)), "got {err:?}");

    let err = store.delete("people", &Filter::ne("nme", "x")).unwrap_err();
    assert!(matches!(err, AsterError::Database(_)), "got {err:?}");

    let rows = store.select("people", None, None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_i64("age"), Some(3));
}

#[test]
fn test_missing_table_is_database_error() {
    let store = DataStore::open_in_memory().unwrap();
    let err = store.insert("ghosts", &person("boo", 1)).unwrap_err();
    assert!(matches!(err, AsterError::Database(_)));
}

#[test]
fn test_empty_insert_is_configuration_error() {
    let store = people_store();
    assert!(matches!(
        store.insert("people", &Row::new()),
        Err(AsterError::Configuration(_))
    ));
}

#[test]
fn test_operations_after_close_are_state_errors() {
    let mut store = people_store();
    store.close().unwrap();
    assert!(!store.is_open());

    assert!(matches!(store.select("people", None, None), Err(AsterError::State(_))));
    assert!(matches!(
        store.insert("people", &person("ada", 1)),
        Err(AsterError::State(_))
    ));
    assert!(matches!(
        store.delete("people", &Filter::eq("name", "ada")),
        Err(AsterError::State(_))
    ));
    assert!(matches!(store.close(), Err(AsterError::State(_))));
}

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.db");

    let mut store = DataStore::open(&path).unwrap();
    store.create_table("people", PEOPLE).unwrap();
    store.insert("people", &person("ada", 36)).unwrap();
    store.close().unwrap();

    let store = DataStore::open(&path).unwrap();
    let rows = store.select("people", None, None).unwrap();
    assert_eq!(rows[0].get_str("name"), Some("ada"));
}

// ========================================================================
// Injection
// ========================================================================

#[test]
fn test_injection_text_is_stored_and_matched_literally() {
    let store = people_store();
    let nasty = "x'); DROP TABLE people; --";
    store.insert("people", &person(nasty, 1)).unwrap();
    store.insert("people", &person("ada", 2)).unwrap();

    let rows = store
        .select("people", None, Some(&Filter::eq("name", nasty)))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_str("name"), Some(nasty));

    let none = store
        .select("people", None, Some(&Filter::eq("name", "' OR '1'='1")))
        .unwrap();
    assert!(none.is_empty());
    assert_eq!(store.select("people", None, None).unwrap().len(), 2);
}
