pub mod column;
pub mod editor;
pub mod foreign_key;
pub mod graph;
pub mod ids;
pub mod index;
pub mod names;
pub mod node;
pub mod snapshot;
pub mod table;

// Re-export main types for convenience
pub use self::editor::GraphEditor;
pub use self::graph::SchemaGraph;
pub use self::ids::{ColumnId, ColumnIdGenerator, TableId, TableIdGenerator};
pub use self::names::GlobalNames;
pub use self::node::{NodeId, OnDeleteAction, SchemaNameInfo, SchemaNode};
pub use self::snapshot::Schema;
