use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{internal, SchemaResult};
use crate::schema::column::{Column, KeyColumn};
use crate::schema::foreign_key::ForeignKey;
use crate::schema::index::Index;
use crate::schema::node::{NodeId, SchemaNode, SchemaNodeKind};
use crate::schema::table::Table;

/// An immutable arena of schema nodes. Nodes are stored in creation order;
/// unchanged nodes are shared between successive graphs through their `Arc`.
#[derive(Debug, Clone)]
pub struct SchemaGraph {
    nodes: Vec<(NodeId, Arc<SchemaNode>)>,
    by_id: HashMap<NodeId, usize>,
    next_id: u32,
}

impl SchemaGraph {
    pub fn empty() -> Self {
        SchemaGraph {
            nodes: Vec::new(),
            by_id: HashMap::new(),
            next_id: 0,
        }
    }

    pub(crate) fn from_parts(nodes: Vec<(NodeId, Arc<SchemaNode>)>, next_id: u32) -> Self {
        let by_id = nodes
            .iter()
            .enumerate()
            .map(|(pos, (id, _))| (*id, pos))
            .collect();
        SchemaGraph {
            nodes,
            by_id,
            next_id,
        }
    }

    pub(crate) fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Arc<SchemaNode>> {
        self.by_id.get(&id).map(|pos| &self.nodes[*pos].1)
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Arc<SchemaNode>)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    fn typed<T: SchemaNodeKind>(&self, id: NodeId) -> SchemaResult<&T> {
        let node = self
            .node(id)
            .ok_or_else(|| internal(format!("no node {id} in schema graph")))?;
        T::cast(node).ok_or_else(|| {
            internal(format!(
                "node {id} is a {}, expected {}",
                node.kind(),
                T::KIND
            ))
        })
    }

    pub fn table(&self, id: NodeId) -> SchemaResult<&Table> {
        self.typed(id)
    }

    pub fn column(&self, id: NodeId) -> SchemaResult<&Column> {
        self.typed(id)
    }

    pub fn key_column(&self, id: NodeId) -> SchemaResult<&KeyColumn> {
        self.typed(id)
    }

    pub fn index(&self, id: NodeId) -> SchemaResult<&Index> {
        self.typed(id)
    }

    pub fn foreign_key(&self, id: NodeId) -> SchemaResult<&ForeignKey> {
        self.typed(id)
    }
}
