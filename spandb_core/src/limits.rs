//! Hard limits enforced during schema changes.

pub const MAX_TABLES_PER_DATABASE: usize = 2560;
pub const MAX_INDEXES_PER_DATABASE: usize = 4096;

/// Longest accepted schema object name.
pub const MAX_SCHEMA_NAME_LENGTH: usize = 128;
