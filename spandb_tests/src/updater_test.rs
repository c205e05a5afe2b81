mod alter;
mod create;
mod drop;
mod facade;
mod indexes;
mod properties;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use spandb_core::error::{SchemaError, SchemaResult};
use spandb_core::schema::column::Column;
use spandb_core::schema::index::Index;
use spandb_core::schema::table::Table;
use spandb_core::schema::{ColumnIdGenerator, Schema, TableIdGenerator};
use spandb_core::storage::MemStorage;
use spandb_core::types::datatype::TypeFactory;
use spandb_core::updater::{SchemaChangeContext, SchemaChangeResult, SchemaUpdater};

fn change_ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Owns the collaborators a schema change needs, so tests can drive the
/// updater directly.
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

    fn update(
        &mut self,
        existing: Arc<Schema>,
        statements: &[&str],
    ) -> SchemaResult<SchemaChangeResult> {
        let statements: Vec<String> = statements.iter().map(|s| s.to_string()).collect();
        let mut context = SchemaChangeContext {
            type_factory: &self.type_factory,
            table_id_generator: &self.table_ids,
            column_id_generator: &self.column_ids,
            storage: &mut self.storage,
            schema_change_timestamp: change_ts(),
        };
        SchemaUpdater::update_schema_from_ddl(existing, &statements, &mut context)
    }

    /// Applies a batch expecting full success, returning the new snapshot.
    fn apply(&mut self, existing: Arc<Schema>, statements: &[&str]) -> SchemaResult<Arc<Schema>> {
        let result = self.update(existing, statements)?;
        result.backfill_status?;
        Ok(result
            .updated_schema
            .unwrap_or_else(SchemaUpdater::empty_schema))
    }

    fn validate(
        &mut self,
        existing: Option<Arc<Schema>>,
        statements: &[&str],
    ) -> SchemaResult<Option<Arc<Schema>>> {
        let statements: Vec<String> = statements.iter().map(|s| s.to_string()).collect();
        let mut context = SchemaChangeContext {
            type_factory: &self.type_factory,
            table_id_generator: &self.table_ids,
            column_id_generator: &self.column_ids,
            storage: &mut self.storage,
            schema_change_timestamp: change_ts(),
        };
        SchemaUpdater::validate_schema_from_ddl(&statements, &mut context, existing)
    }
}

fn empty() -> Arc<Schema> {
    SchemaUpdater::empty_schema()
}

fn table<'s>(schema: &'s Schema, name: &str) -> &'s Table {
    let id = schema
        .find_table(name)
        .unwrap_or_else(|| panic!("table '{name}' not found"));
    schema.table(id).unwrap()
}

fn column<'s>(schema: &'s Schema, table_name: &str, name: &str) -> &'s Column {
    let tid = schema.find_table(table_name).unwrap();
    let cid = schema
        .find_column(tid, name)
        .unwrap_or_else(|| panic!("column '{table_name}.{name}' not found"));
    schema.column(cid).unwrap()
}

fn index<'s>(schema: &'s Schema, name: &str) -> &'s Index {
    let id = schema
        .find_index(name)
        .unwrap_or_else(|| panic!("index '{name}' not found"));
    schema.index(id).unwrap()
}

/// Names of a table's primary-key parts, with a trailing marker on
/// descending parts.
fn pk_names(schema: &Schema, t: &Table) -> Vec<String> {
    t.primary_key
        .iter()
        .map(|&kid| {
            let k = schema.key_column(kid).unwrap();
            let name = schema.column(k.column).unwrap().name.clone();
            if k.descending {
                format!("{name} DESC")
            } else {
                name
            }
        })
        .collect()
}
