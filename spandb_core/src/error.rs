use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

/// How an error should be treated by callers: `User` errors are bad DDL,
/// `Data` errors come from deferred actions running against row data,
/// `Internal` errors indicate a bug in the updater itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    User,
    Data,
    Internal,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("Empty DDL statement")]
    EmptyDdlStatement,

    #[error("{0}")]
    InvalidDdl(String),

    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    #[error("Index '{0}' does not exist")]
    IndexNotFound(String),

    #[error("Column '{column}' does not exist in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("{object_kind} '{object_name}' references nonexistent key column '{column}'")]
    NonExistentKeyColumn {
        object_kind: &'static str,
        object_name: String,
        column: String,
    },

    #[error("Index '{index}' is interleaved in nonexistent table '{parent}'")]
    IndexInterleaveTableNotFound { index: String, parent: String },

    #[error("Index '{index}' references nonexistent column '{column}'")]
    IndexRefsNonExistentColumn { index: String, column: String },

    #[error("Column '{column}' does not exist in table '{table}' referenced by foreign key '{foreign_key}'")]
    ForeignKeyColumnNotFound {
        column: String,
        table: String,
        foreign_key: String,
    },

    #[error("Duplicate name: {kind} '{name}' already exists")]
    DuplicateName { kind: String, name: String },

    #[error("Invalid {kind} name '{name}'")]
    InvalidSchemaName { kind: String, name: String },

    #[error("Cannot create table '{table}': too many tables (limit {limit})")]
    TooManyTablesPerDatabase { table: String, limit: usize },

    #[error("Cannot create index '{index}': too many indexes (limit {limit})")]
    TooManyIndicesPerDatabase { index: String, limit: usize },

    #[error("Constraint '{constraint}' does not exist on table '{table}'")]
    ConstraintNotFound { constraint: String, table: String },

    #[error("Cannot drop table '{table}': still referenced by {referrer}")]
    CannotDropReferencedTable { table: String, referrer: String },

    #[error("Cannot drop column '{column}': still referenced by {referrer}")]
    CannotDropReferencedColumn { column: String, referrer: String },

    #[error("Cannot drop key column '{column}' of table '{table}'")]
    CannotDropKeyColumn { column: String, table: String },

    #[error("Cannot build incomplete {kind} node: missing {missing}")]
    IncompleteNode {
        kind: &'static str,
        missing: &'static str,
    },

    #[error("Unique index '{index}' has duplicate key {key}")]
    UniqueIndexViolation { index: String, key: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SchemaError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SchemaError::UniqueIndexViolation { .. } => ErrorClass::Data,
            SchemaError::IncompleteNode { .. } | SchemaError::Internal(_) => ErrorClass::Internal,
            _ => ErrorClass::User,
        }
    }
}

pub(crate) fn internal(detail: impl Into<String>) -> SchemaError {
    SchemaError::Internal(detail.into())
}
