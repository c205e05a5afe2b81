use std::fmt;

use crate::schema::column::{Column, KeyColumn};
use crate::schema::foreign_key::ForeignKey;
use crate::schema::index::Index;
use crate::schema::table::Table;

/// Stable handle of a node within a schema graph. Handles survive
/// canonicalization for untouched nodes; edited nodes get fresh handles and
/// every reference to them is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDeleteAction {
    NoAction,
    Cascade,
}

impl fmt::Display for OnDeleteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnDeleteAction::NoAction => write!(f, "NO ACTION"),
            OnDeleteAction::Cascade => write!(f, "CASCADE"),
        }
    }
}

/// Name record fed to the global name registry.
#[derive(Debug, Clone)]
pub struct SchemaNameInfo {
    pub kind: &'static str,
    pub name: String,
    pub global: bool,
}

#[derive(Debug, Clone)]
pub enum SchemaNode {
    Table(Table),
    Column(Column),
    KeyColumn(KeyColumn),
    Index(Index),
    ForeignKey(ForeignKey),
}

impl SchemaNode {
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaNode::Table(_) => "Table",
            SchemaNode::Column(_) => "Column",
            SchemaNode::KeyColumn(_) => "KeyColumn",
            SchemaNode::Index(_) => "Index",
            SchemaNode::ForeignKey(_) => "Foreign Key",
        }
    }

    /// The registry entry for this node, if it carries a name at all.
    /// Index data tables and generated foreign-key names are registered as
    /// non-global: they never clash with user-visible names.
    pub fn schema_name_info(&self) -> Option<SchemaNameInfo> {
        match self {
            SchemaNode::Table(t) => Some(SchemaNameInfo {
                kind: "Table",
                name: t.name.clone(),
                global: t.owner_index.is_none(),
            }),
            SchemaNode::Index(i) => Some(SchemaNameInfo {
                kind: "Index",
                name: i.name.clone(),
                global: true,
            }),
            SchemaNode::ForeignKey(f) => Some(SchemaNameInfo {
                kind: "Foreign Key",
                name: f.name().to_string(),
                global: f.constraint_name.is_some(),
            }),
            SchemaNode::Column(_) | SchemaNode::KeyColumn(_) => None,
        }
    }

    /// Every handle this node refers to, in no particular order. Used by the
    /// editor to compute the canonicalization closure.
    pub fn references(&self) -> Vec<NodeId> {
        let mut refs = Vec::new();
        match self {
            SchemaNode::Table(t) => {
                refs.extend_from_slice(&t.columns);
                refs.extend_from_slice(&t.primary_key);
                refs.extend(t.parent);
                refs.extend_from_slice(&t.children);
                refs.extend_from_slice(&t.indexes);
                refs.extend_from_slice(&t.foreign_keys);
                refs.extend_from_slice(&t.referencing_foreign_keys);
                refs.extend(t.owner_index);
            }
            SchemaNode::Column(c) => {
                refs.push(c.table);
                refs.extend(c.source_column);
            }
            SchemaNode::KeyColumn(k) => {
                refs.push(k.column);
            }
            SchemaNode::Index(i) => {
                refs.push(i.indexed_table);
                refs.push(i.index_data_table);
                refs.extend_from_slice(&i.key_columns);
                refs.extend_from_slice(&i.stored_columns);
            }
            SchemaNode::ForeignKey(f) => {
                refs.push(f.referencing_table);
                refs.push(f.referenced_table);
                refs.extend_from_slice(&f.referencing_columns);
                refs.extend_from_slice(&f.referenced_columns);
            }
        }
        refs
    }
}

/// Typed access into a `SchemaNode`, used by the editor's `edit_node`.
pub trait SchemaNodeKind: Sized {
    const KIND: &'static str;
    fn cast(node: &SchemaNode) -> Option<&Self>;
    fn cast_mut(node: &mut SchemaNode) -> Option<&mut Self>;
}

macro_rules! impl_schema_node_kind {
    ($ty:ty, $variant:ident, $kind:expr) => {
        impl SchemaNodeKind for $ty {
            const KIND: &'static str = $kind;
            fn cast(node: &SchemaNode) -> Option<&Self> {
                match node {
                    SchemaNode::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
            fn cast_mut(node: &mut SchemaNode) -> Option<&mut Self> {
                match node {
                    SchemaNode::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_schema_node_kind!(Table, Table, "Table");
impl_schema_node_kind!(Column, Column, "Column");
impl_schema_node_kind!(KeyColumn, KeyColumn, "KeyColumn");
impl_schema_node_kind!(Index, Index, "Index");
impl_schema_node_kind!(ForeignKey, ForeignKey, "Foreign Key");
