use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque table identifier, stable within a snapshot chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub u64);

/// Opaque column identifier, stable within a snapshot chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(pub u64);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Mints table IDs for one updater instance. Every call consumes the next
/// counter value, so two different natural keys can never collide.
#[derive(Debug, Default)]
pub struct TableIdGenerator {
    next: AtomicU64,
}

impl TableIdGenerator {
    pub fn new() -> Self {
        TableIdGenerator::default()
    }

    pub fn next_id(&self, natural_key: &str) -> TableId {
        let id = TableId(self.next.fetch_add(1, Ordering::SeqCst));
        log::trace!("table id {id} minted for '{natural_key}'");
        id
    }
}

/// Mints column IDs, seeded by `<table>.<column>` natural keys.
#[derive(Debug, Default)]
pub struct ColumnIdGenerator {
    next: AtomicU64,
}

impl ColumnIdGenerator {
    pub fn new() -> Self {
        ColumnIdGenerator::default()
    }

    pub fn next_id(&self, natural_key: &str) -> ColumnId {
        let id = ColumnId(self.next.fetch_add(1, Ordering::SeqCst));
        log::trace!("column id {id} minted for '{natural_key}'");
        id
    }
}
