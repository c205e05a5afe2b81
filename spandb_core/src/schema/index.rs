use crate::error::{SchemaError, SchemaResult};
use crate::schema::node::{NodeId, SchemaNode};

/// Name prefix of the synthetic tables that materialize index contents.
/// User table names cannot start with an underscore, so these never clash.
pub const INDEX_DATA_TABLE_PREFIX: &str = "_index_data_";

#[derive(Debug, Clone)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    pub null_filtered: bool,
    pub indexed_table: NodeId,
    pub index_data_table: NodeId,
    /// Prefix of the data table's primary key covering the declared keys.
    pub key_columns: Vec<NodeId>,
    /// Data-table columns carried for STORING clauses.
    pub stored_columns: Vec<NodeId>,
}

pub struct IndexBuilder {
    node_id: NodeId,
    name: Option<String>,
    unique: bool,
    null_filtered: bool,
    indexed_table: Option<NodeId>,
    index_data_table: Option<NodeId>,
    key_columns: Vec<NodeId>,
    stored_columns: Vec<NodeId>,
}

impl IndexBuilder {
    pub fn new(node_id: NodeId) -> Self {
        IndexBuilder {
            node_id,
            name: None,
            unique: false,
            null_filtered: false,
            indexed_table: None,
            index_data_table: None,
            key_columns: Vec::new(),
            stored_columns: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.node_id
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn set_unique(&mut self, unique: bool) -> &mut Self {
        self.unique = unique;
        self
    }

    pub fn set_null_filtered(&mut self, null_filtered: bool) -> &mut Self {
        self.null_filtered = null_filtered;
        self
    }

    pub fn is_null_filtered(&self) -> bool {
        self.null_filtered
    }

    pub fn set_indexed_table(&mut self, table: NodeId) -> &mut Self {
        self.indexed_table = Some(table);
        self
    }

    pub fn set_index_data_table(&mut self, table: NodeId) -> &mut Self {
        self.index_data_table = Some(table);
        self
    }

    pub fn add_key_column(&mut self, key_column: NodeId) {
        self.key_columns.push(key_column);
    }

    pub fn add_stored_column(&mut self, column: NodeId) {
        self.stored_columns.push(column);
    }

    pub fn build(self) -> SchemaResult<(NodeId, SchemaNode)> {
        let name = self.name.ok_or(SchemaError::IncompleteNode {
            kind: "Index",
            missing: "name",
        })?;
        let indexed_table = self.indexed_table.ok_or(SchemaError::IncompleteNode {
            kind: "Index",
            missing: "indexed table",
        })?;
        let index_data_table = self.index_data_table.ok_or(SchemaError::IncompleteNode {
            kind: "Index",
            missing: "index data table",
        })?;
        Ok((
            self.node_id,
            SchemaNode::Index(Index {
                name,
                unique: self.unique,
                null_filtered: self.null_filtered,
                indexed_table,
                index_data_table,
                key_columns: self.key_columns,
                stored_columns: self.stored_columns,
            }),
        ))
    }
}
