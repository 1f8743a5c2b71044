//! Persistence round-trip tests for tabula-storage.

use tabula_core::schema::{Column, Schema};
use tabula_core::{DataType, Error, Row, Value};
use tabula_storage::{Storage, StorageConfig};

fn accounts_schema() -> Schema {
    Schema::builder("accounts")
        .unwrap()
        .add_column(Column::new("id", DataType::Integer).primary_key(true))
        .unwrap()
        .add_column(Column::new("owner", DataType::Text(Some(20))).not_null(true))
        .unwrap()
        .add_column(Column::new("balance", DataType::Float))
        .unwrap()
        .add_column(Column::new("active", DataType::Boolean))
        .unwrap()
        .add_column(Column::new("iban", DataType::Text(None)).unique(true))
        .unwrap()
        .build()
        .unwrap()
}

fn account(id: i64, owner: &str, balance: f64, active: bool, iban: Option<&str>) -> Row {
    Row::new(vec![
        Value::Integer(id),
        Value::Text(owner.into()),
        Value::Float(balance),
        Value::Boolean(active),
        Value::from(iban),
    ])
}

#[test]
fn test_round_trip_after_mixed_writes() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::new(dir.path());

    let expected = {
        let storage = Storage::open(config.clone()).unwrap();
        let accounts = storage.create_table(accounts_schema()).unwrap();
        accounts
            .insert_rows(vec![
                account(1, "ana", 10.5, true, Some("DE01")),
                account(2, "ben", -3.25, false, None),
                account(3, "cai", 0.0, true, Some("FR77")),
            ])
            .unwrap();
        accounts
            .update_rows(
                |r| Ok(r.get(0) == Some(&Value::Integer(2))),
                &[("balance".to_string(), Value::Float(99.0))],
            )
            .unwrap();
        accounts
            .delete_rows(|r| Ok(r.get(0) == Some(&Value::Integer(1))))
            .unwrap();
        accounts.select_rows()
    };

    let storage = Storage::open(config).unwrap();
    assert_eq!(storage.list_tables(), vec!["accounts"]);
    let accounts = storage.table("accounts").unwrap();
    assert_eq!(accounts.schema(), &accounts_schema());
    assert_eq!(accounts.select_rows(), expected);
    assert_eq!(expected.len(), 2);

    // Reloaded indexes point at the compacted positions.
    assert_eq!(
        storage
            .indexes()
            .search("accounts", "iban", &Value::Text("FR77".into()))
            .unwrap(),
        Some(1)
    );
    let err = accounts
        .insert_row(account(3, "dup", 1.0, true, None))
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateKey { .. }));
}

#[test]
fn test_failed_write_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::new(dir.path());
    {
        let storage = Storage::open(config.clone()).unwrap();
        let accounts = storage.create_table(accounts_schema()).unwrap();
        accounts.insert_row(account(1, "ana", 1.0, true, Some("X"))).unwrap();
        assert!(accounts
            .insert_rows(vec![
                account(2, "ben", 1.0, true, None),
                account(3, "cai", 1.0, true, Some("X")),
            ])
            .is_err());
    }

    let storage = Storage::open(config).unwrap();
    assert_eq!(storage.table("accounts").unwrap().len(), 1);
}

#[test]
fn test_dropped_table_stays_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::new(dir.path());
    {
        let storage = Storage::open(config.clone()).unwrap();
        storage.create_table(accounts_schema()).unwrap();
        storage.drop_table("accounts").unwrap();
    }

    let storage = Storage::open(config).unwrap();
    assert!(!storage.table_exists("accounts"));
}

#[test]
fn test_custom_extension_and_sync() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = StorageConfig::new(dir.path()).with_sync_on_write(true);
    config.file_extension = "dat".into();
    {
        let storage = Storage::open(config.clone()).unwrap();
        let accounts = storage.create_table(accounts_schema()).unwrap();
        accounts.insert_row(account(1, "ana", 1.0, true, None)).unwrap();
    }
    assert!(dir.path().join("accounts.dat").exists());

    // A storage with the default extension ignores the file.
    let other = Storage::open(StorageConfig::new(dir.path())).unwrap();
    assert!(other.list_tables().is_empty());

    let storage = Storage::open(config).unwrap();
    assert_eq!(storage.table("accounts").unwrap().len(), 1);
}
