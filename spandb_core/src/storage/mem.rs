use std::collections::HashMap;

use crate::error::SchemaResult;
use crate::storage::engine::StorageEngine;
use crate::types::Row;

/// In-memory storage engine.
#[derive(Debug, Default)]
pub struct MemStorage {
    tables: HashMap<String, Vec<Row>>,
}

impl MemStorage {
    pub fn new() -> Self {
        MemStorage::default()
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }
}

impl StorageEngine for MemStorage {
    fn create_table(&mut self, table: &str) -> SchemaResult<()> {
        self.tables.entry(table.to_string()).or_default();
        Ok(())
    }

    fn drop_table(&mut self, table: &str) -> SchemaResult<()> {
        self.tables.remove(table);
        Ok(())
    }

    fn insert_row(&mut self, table: &str, row: Row) -> SchemaResult<()> {
        self.tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    fn scan(&self, table: &str) -> SchemaResult<&[Row]> {
        Ok(self
            .tables
            .get(table)
            .map(|rows| rows.as_slice())
            .unwrap_or(&[]))
    }
}
