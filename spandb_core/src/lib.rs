pub mod error;
pub mod limits;
pub mod parser;
pub mod schema;
pub mod storage;
pub mod types;
pub mod updater;

use std::sync::Arc;

use chrono::Utc;

use error::SchemaResult;
use schema::{ColumnIdGenerator, Schema, TableIdGenerator};
use storage::MemStorage;
use types::datatype::TypeFactory;
use updater::{SchemaChangeContext, SchemaUpdater};

/// An in-memory database shell around the schema updater: it owns the row
/// storage, the ID generators and the current snapshot, and applies DDL
/// batches against them.
#[derive(Debug)]
pub struct Database {
    type_factory: TypeFactory,
    table_id_generator: TableIdGenerator,
    column_id_generator: ColumnIdGenerator,
    storage: MemStorage,
    schema: Arc<Schema>,
}

impl Database {
    pub fn new() -> Self {
        Database {
            type_factory: TypeFactory::new(),
            table_id_generator: TableIdGenerator::new(),
            column_id_generator: ColumnIdGenerator::new(),
            storage: MemStorage::new(),
            schema: SchemaUpdater::empty_schema(),
        }
    }

    /// Applies a semicolon-separated batch of DDL statements. On success
    /// the final snapshot is installed. If a deferred action fails, the
    /// snapshot after the last fully successful statement is installed and
    /// the failure is returned.
    pub fn execute(&mut self, input: &str) -> SchemaResult<String> {
        let statements: Vec<String> = input
            .split(';')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let mut context = SchemaChangeContext {
            type_factory: &self.type_factory,
            table_id_generator: &self.table_id_generator,
            column_id_generator: &self.column_id_generator,
            storage: &mut self.storage,
            schema_change_timestamp: Utc::now(),
        };
        let result =
            SchemaUpdater::update_schema_from_ddl(self.schema.clone(), &statements, &mut context)?;
        if let Some(schema) = result.updated_schema {
            self.schema = schema;
        }
        result.backfill_status?;
        Ok(format!(
            "applied {} statement(s)",
            result.num_successful_statements
        ))
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn describe(&self) -> String {
        self.schema.describe()
    }

    pub fn storage(&self) -> &MemStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut MemStorage {
        &mut self.storage
    }
}

impl Default for Database {
    fn default() -> Self {
        Database::new()
    }
}
