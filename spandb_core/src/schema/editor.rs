use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{internal, SchemaError, SchemaResult};
use crate::schema::graph::SchemaGraph;
use crate::schema::node::{NodeId, SchemaNode, SchemaNodeKind};
use crate::schema::table::Table;

/// Functional editor over an immutable base graph. A statement's edits are
/// batched into pending drafts; `canonicalize` then rewrites the closure of
/// affected references and emits a fresh, fully consistent graph. The base
/// graph is never touched, so a failed statement leaves nothing behind.
pub struct GraphEditor {
    base: Arc<SchemaGraph>,
    next_id: u32,
    /// Drafts keyed by their (new) handle: edited clones and added nodes.
    pending: HashMap<NodeId, SchemaNode>,
    /// Handles of added nodes, in add order.
    added: Vec<NodeId>,
    /// Base handle -> replacement handle for nodes edited this statement.
    edits: HashMap<NodeId, NodeId>,
    /// Base handles marked deleted, including cascade deletions.
    deleted: HashSet<NodeId>,
}

impl GraphEditor {
    pub fn new(base: Arc<SchemaGraph>) -> Self {
        let next_id = base.next_id();
        GraphEditor {
            base,
            next_id,
            pending: HashMap::new(),
            added: Vec::new(),
            edits: HashMap::new(),
            deleted: HashSet::new(),
        }
    }

    /// Mints the handle a builder will occupy once built and added. The
    /// handle is usable as a forward reference immediately.
    pub fn reserve_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn has_modifications(&self) -> bool {
        !self.added.is_empty() || !self.edits.is_empty() || !self.deleted.is_empty()
    }

    /// Adds a freshly built node under its reserved handle.
    pub fn add_node(&mut self, id: NodeId, node: SchemaNode) -> SchemaResult<()> {
        if self.base.contains(id) || self.pending.contains_key(&id) {
            return Err(internal(format!("node {id} already exists in the graph")));
        }
        self.pending.insert(id, node);
        self.added.push(id);
        Ok(())
    }

    /// Produces a modified copy of a node under a fresh handle and hands the
    /// typed draft to `edit`. Editing the same base node again in the same
    /// statement mutates the existing draft in place. Returns the handle the
    /// edited node will carry in the canonicalized graph.
    pub fn edit_node<T: SchemaNodeKind>(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut T) -> SchemaResult<()>,
    ) -> SchemaResult<NodeId> {
        let target = if let Some(new_id) = self.edits.get(&id) {
            *new_id
        } else if self.pending.contains_key(&id) {
            id
        } else if let Some(node) = self.base.node(id) {
            if self.deleted.contains(&id) {
                return Err(internal(format!("edit of deleted node {id}")));
            }
            let clone = (**node).clone();
            let new_id = self.reserve_id();
            self.pending.insert(new_id, clone);
            self.edits.insert(id, new_id);
            new_id
        } else {
            return Err(internal(format!("edit of unknown node {id}")));
        };
        let node = self
            .pending
            .get_mut(&target)
            .ok_or_else(|| internal(format!("missing draft for node {target}")))?;
        let typed = T::cast_mut(node)
            .ok_or_else(|| internal(format!("node {target} is not a {}", T::KIND)))?;
        edit(typed)?;
        Ok(target)
    }

    /// Marks an existing node deleted. Deleting a table also deletes its
    /// columns, key columns and outgoing foreign keys; deleting an index
    /// also deletes its data table, which nothing else can reference.
    pub fn delete_node(&mut self, id: NodeId) -> SchemaResult<()> {
        if self.edits.contains_key(&id) || self.pending.contains_key(&id) {
            return Err(internal(format!(
                "delete of node {id} already modified in this statement"
            )));
        }
        let node = self
            .base
            .node(id)
            .ok_or_else(|| internal(format!("delete of unknown node {id}")))?
            .clone();
        match &*node {
            SchemaNode::Table(table) => self.delete_table_cascade(id, table),
            SchemaNode::Index(index) => {
                self.deleted.insert(id);
                let data_table = self.base.table(index.index_data_table)?.clone();
                self.delete_table_cascade(index.index_data_table, &data_table);
            }
            _ => {
                self.deleted.insert(id);
            }
        }
        Ok(())
    }

    fn delete_table_cascade(&mut self, id: NodeId, table: &Table) {
        self.deleted.insert(id);
        self.deleted.extend(table.columns.iter().copied());
        self.deleted.extend(table.primary_key.iter().copied());
        self.deleted.extend(table.foreign_keys.iter().copied());
    }
}

include!("editor/canonicalize.inc.rs");
