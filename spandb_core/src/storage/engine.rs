use crate::error::SchemaResult;
use crate::types::Row;

/// Storage engine trait - abstraction for the row store that deferred
/// schema actions (index backfills, data validators) run against. The
/// structural phase of a schema change never touches it.
pub trait StorageEngine {
    /// Allocates row storage for a table. Idempotent.
    fn create_table(&mut self, table: &str) -> SchemaResult<()>;

    /// Releases row storage for a table. Unknown tables are ignored.
    fn drop_table(&mut self, table: &str) -> SchemaResult<()>;

    /// Appends a row to the specified table.
    fn insert_row(&mut self, table: &str, row: Row) -> SchemaResult<()>;

    /// Scans all rows of the specified table. A table without storage
    /// scans as empty.
    fn scan(&self, table: &str) -> SchemaResult<&[Row]>;
}
