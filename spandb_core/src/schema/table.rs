use crate::error::{SchemaError, SchemaResult};
use crate::schema::ids::TableId;
use crate::schema::node::{NodeId, OnDeleteAction, SchemaNode};

/// A table node. User tables have `owner_index == None`; index data tables
/// point back at the index that owns them.
#[derive(Debug, Clone)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub columns: Vec<NodeId>,
    pub primary_key: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub indexes: Vec<NodeId>,
    pub foreign_keys: Vec<NodeId>,
    pub referencing_foreign_keys: Vec<NodeId>,
    pub on_delete: OnDeleteAction,
    pub owner_index: Option<NodeId>,
}

impl Table {
    pub fn add_column(&mut self, column: NodeId) {
        self.columns.push(column);
    }

    pub fn add_child_table(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub fn add_index(&mut self, index: NodeId) {
        self.indexes.push(index);
    }

    pub fn add_foreign_key(&mut self, foreign_key: NodeId) {
        self.foreign_keys.push(foreign_key);
    }

    pub fn add_referencing_foreign_key(&mut self, foreign_key: NodeId) {
        self.referencing_foreign_keys.push(foreign_key);
    }

    pub fn set_on_delete(&mut self, action: OnDeleteAction) {
        self.on_delete = action;
    }
}

/// Accumulates a table while its columns, key columns and constraints are
/// created around it. The reserved handle from `id()` lets other builders
/// reference the table before it is built.
pub struct TableBuilder {
    node_id: NodeId,
    id: Option<TableId>,
    name: Option<String>,
    columns: Vec<NodeId>,
    column_names: Vec<String>,
    primary_key: Vec<NodeId>,
    parent: Option<NodeId>,
    on_delete: OnDeleteAction,
    owner_index: Option<NodeId>,
    owner_index_name: Option<String>,
    foreign_keys: Vec<NodeId>,
    referencing_foreign_keys: Vec<NodeId>,
}

impl TableBuilder {
    pub fn new(node_id: NodeId) -> Self {
        TableBuilder {
            node_id,
            id: None,
            name: None,
            columns: Vec::new(),
            column_names: Vec::new(),
            primary_key: Vec::new(),
            parent: None,
            on_delete: OnDeleteAction::NoAction,
            owner_index: None,
            owner_index_name: None,
            foreign_keys: Vec::new(),
            referencing_foreign_keys: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.node_id
    }

    pub fn set_id(&mut self, id: TableId) -> &mut Self {
        self.id = Some(id);
        self
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn add_column(&mut self, column: NodeId, name: String) {
        self.columns.push(column);
        self.column_names.push(name);
    }

    /// Case-insensitive presence check, used when merging the indexed
    /// table's primary key into an index data table.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_names
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Key-column references are resolved case-sensitively.
    pub fn find_column_case_sensitive(&self, name: &str) -> Option<NodeId> {
        self.column_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i])
    }

    pub fn add_key_column(&mut self, key_column: NodeId) {
        self.primary_key.push(key_column);
    }

    pub fn primary_key(&self) -> &[NodeId] {
        &self.primary_key
    }

    pub fn set_parent_table(&mut self, parent: NodeId) -> &mut Self {
        self.parent = Some(parent);
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn set_on_delete(&mut self, action: OnDeleteAction) -> &mut Self {
        self.on_delete = action;
        self
    }

    pub fn set_owner_index(&mut self, index: NodeId, index_name: String) -> &mut Self {
        self.owner_index = Some(index);
        self.owner_index_name = Some(index_name);
        self
    }

    pub fn owner_index_name(&self) -> Option<&str> {
        self.owner_index_name.as_deref()
    }

    pub fn add_foreign_key(&mut self, foreign_key: NodeId) {
        self.foreign_keys.push(foreign_key);
    }

    pub fn add_referencing_foreign_key(&mut self, foreign_key: NodeId) {
        self.referencing_foreign_keys.push(foreign_key);
    }

    pub fn build(self) -> SchemaResult<(NodeId, SchemaNode)> {
        let id = self.id.ok_or(SchemaError::IncompleteNode {
            kind: "Table",
            missing: "id",
        })?;
        let name = self.name.ok_or(SchemaError::IncompleteNode {
            kind: "Table",
            missing: "name",
        })?;
        Ok((
            self.node_id,
            SchemaNode::Table(Table {
                id,
                name,
                columns: self.columns,
                primary_key: self.primary_key,
                parent: self.parent,
                children: Vec::new(),
                indexes: Vec::new(),
                foreign_keys: self.foreign_keys,
                referencing_foreign_keys: self.referencing_foreign_keys,
                on_delete: self.on_delete,
                owner_index: self.owner_index,
            }),
        ))
    }
}
