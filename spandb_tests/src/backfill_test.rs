use std::sync::Arc;

use chrono::{TimeZone, Utc};
use spandb_core::error::{ErrorClass, SchemaError};
use spandb_core::schema::index::INDEX_DATA_TABLE_PREFIX;
use spandb_core::schema::{ColumnIdGenerator, Schema, TableIdGenerator};
use spandb_core::storage::{MemStorage, StorageEngine};
use spandb_core::types::datatype::TypeFactory;
use spandb_core::types::value::Value;
use spandb_core::updater::{SchemaChangeContext, SchemaChangeResult, SchemaUpdater};

struct TestEnv {
    type_factory: TypeFactory,
    table_ids: TableIdGenerator,
    column_ids: ColumnIdGenerator,
    storage: MemStorage,
}

impl TestEnv {
    fn new() -> Self {
        TestEnv {
            type_factory: TypeFactory::new(),
            table_ids: TableIdGenerator::new(),
            column_ids: ColumnIdGenerator::new(),
            storage: MemStorage::new(),
        }
    }

    fn update(&mut self, existing: Arc<Schema>, statements: &[&str]) -> SchemaChangeResult {
        let statements: Vec<String> = statements.iter().map(|s| s.to_string()).collect();
        let mut context = SchemaChangeContext {
            type_factory: &self.type_factory,
            table_id_generator: &self.table_ids,
            column_id_generator: &self.column_ids,
            storage: &mut self.storage,
            schema_change_timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        SchemaUpdater::update_schema_from_ddl(existing, &statements, &mut context).unwrap()
    }

    fn apply(&mut self, existing: Arc<Schema>, statements: &[&str]) -> Arc<Schema> {
        let result = self.update(existing, statements);
        result.backfill_status.unwrap();
        result.updated_schema.unwrap()
    }
}

/// Table T(Id, V) with three seeded rows.
fn seeded_env() -> (TestEnv, Arc<Schema>) {
    let mut env = TestEnv::new();
    let schema = env.apply(
        SchemaUpdater::empty_schema(),
        &["CREATE TABLE T (Id INT64 NOT NULL, V STRING(MAX)) PRIMARY KEY (Id)"],
    );
    env.storage
        .insert_row("T", vec![Value::Int64(1), Value::String("a".to_string())])
        .unwrap();
    env.storage
        .insert_row("T", vec![Value::Int64(2), Value::String("b".to_string())])
        .unwrap();
    env.storage
        .insert_row("T", vec![Value::Int64(3), Value::Null])
        .unwrap();
    (env, schema)
}

#[test]
fn test_backfill_projects_rows_into_data_table() {
    let (mut env, schema) = seeded_env();
    let schema = env.apply(schema, &["CREATE INDEX IdxV ON T (V)"]);

    let data_table = format!("{INDEX_DATA_TABLE_PREFIX}IdxV");
    let rows = env.storage.scan(&data_table).unwrap();
    // Data table columns are (V, Id): declared key first, then the table key.
    assert_eq!(
        rows.to_vec(),
        vec![
            vec![Value::String("a".to_string()), Value::Int64(1)],
            vec![Value::String("b".to_string()), Value::Int64(2)],
            vec![Value::Null, Value::Int64(3)],
        ]
    );
    assert!(schema.find_index("IdxV").is_some());
}

#[test]
fn test_null_filtered_backfill_skips_null_keys() {
    let (mut env, schema) = seeded_env();
    env.apply(schema, &["CREATE NULL_FILTERED INDEX IdxV ON T (V)"]);

    let data_table = format!("{INDEX_DATA_TABLE_PREFIX}IdxV");
    let rows = env.storage.scan(&data_table).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| !row[0].is_null()));
}

#[test]
fn test_unique_backfill_rejects_duplicates() {
    let (mut env, schema) = seeded_env();
    env.storage
        .insert_row("T", vec![Value::Int64(4), Value::String("a".to_string())])
        .unwrap();

    let result = env.update(schema, &["CREATE UNIQUE INDEX IdxV ON T (V)"]);
    assert_eq!(result.num_successful_statements, 0);
    assert!(result.updated_schema.is_none());
    let err = result.backfill_status.unwrap_err();
    assert_eq!(
        err,
        SchemaError::UniqueIndexViolation {
            index: "IdxV".to_string(),
            key: "(a)".to_string(),
        }
    );
    assert_eq!(err.class(), ErrorClass::Data);
}

#[test]
fn test_first_action_failure_stops_the_queue() {
    let (mut env, schema) = seeded_env();
    env.storage
        .insert_row("T", vec![Value::Int64(4), Value::String("a".to_string())])
        .unwrap();

    let result = env.update(
        schema,
        &[
            "CREATE INDEX Ok ON T (Id)",
            "CREATE UNIQUE INDEX Bad ON T (V)",
            "CREATE INDEX Never ON T (V)",
        ],
    );
    // The first statement's backfill succeeded, the second failed, the
    // third never ran.
    assert_eq!(result.num_successful_statements, 1);
    assert!(result.backfill_status.is_err());

    let updated = result.updated_schema.unwrap();
    assert!(updated.find_index("Ok").is_some());
    assert!(updated.find_index("Bad").is_none());
    assert!(updated.find_index("Never").is_none());

    let never_data = format!("{INDEX_DATA_TABLE_PREFIX}Never");
    assert!(env.storage.scan(&never_data).unwrap().is_empty());
}

#[test]
fn test_unique_check_covers_declared_keys_only() {
    let mut env = TestEnv::new();
    let schema = env.apply(
        SchemaUpdater::empty_schema(),
        &["CREATE TABLE T (Id INT64 NOT NULL, V STRING(MAX), N INT64) PRIMARY KEY (Id)"],
    );
    env.storage
        .insert_row(
            "T",
            vec![Value::Int64(1), Value::String("1".to_string()), Value::Int64(7)],
        )
        .unwrap();
    env.storage
        .insert_row("T", vec![Value::Int64(2), Value::Null, Value::Int64(7)])
        .unwrap();

    // "1" (string) in one row, nothing conflicting elsewhere: the unique
    // check is over the declared key tuple only.
    let result = env.update(schema, &["CREATE UNIQUE INDEX IdxV ON T (V)"]);
    assert!(result.backfill_status.is_ok());
    assert_eq!(result.num_successful_statements, 1);
}

#[test]
fn test_unique_null_filtered_ignores_duplicate_nulls() {
    let mut env = TestEnv::new();
    let schema = env.apply(
        SchemaUpdater::empty_schema(),
        &["CREATE TABLE T (Id INT64 NOT NULL, V STRING(MAX)) PRIMARY KEY (Id)"],
    );
    env.storage
        .insert_row("T", vec![Value::Int64(1), Value::Null])
        .unwrap();
    env.storage
        .insert_row("T", vec![Value::Int64(2), Value::Null])
        .unwrap();

    let result = env.update(
        schema,
        &["CREATE UNIQUE NULL_FILTERED INDEX IdxV ON T (V)"],
    );
    assert!(result.backfill_status.is_ok());
    let data_table = format!("{INDEX_DATA_TABLE_PREFIX}IdxV");
    assert!(env.storage.scan(&data_table).unwrap().is_empty());
}

#[test]
fn test_backfill_of_empty_table_creates_empty_storage() {
    let mut env = TestEnv::new();
    let schema = env.apply(
        SchemaUpdater::empty_schema(),
        &["CREATE TABLE T (Id INT64 NOT NULL, V STRING(MAX)) PRIMARY KEY (Id)"],
    );
    env.apply(schema, &["CREATE INDEX IdxV ON T (V)"]);

    let data_table = format!("{INDEX_DATA_TABLE_PREFIX}IdxV");
    assert!(env.storage.table_names().contains(&data_table.as_str()));
    assert!(env.storage.scan(&data_table).unwrap().is_empty());
}
