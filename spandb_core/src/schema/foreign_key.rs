use crate::error::{SchemaError, SchemaResult};
use crate::schema::node::{NodeId, SchemaNode};

/// A foreign-key constraint. The edge is bidirectional: the node is listed
/// in the referencing table's `foreign_keys` and in the referenced table's
/// `referencing_foreign_keys`. Self-references are allowed.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    /// User-declared constraint name, registered globally.
    pub constraint_name: Option<String>,
    /// Synthesized name when none was declared; not global.
    pub generated_name: Option<String>,
    pub referencing_table: NodeId,
    pub referenced_table: NodeId,
    pub referencing_columns: Vec<NodeId>,
    pub referenced_columns: Vec<NodeId>,
}

impl ForeignKey {
    pub fn name(&self) -> &str {
        self.constraint_name
            .as_deref()
            .or(self.generated_name.as_deref())
            .unwrap_or("")
    }
}

pub struct ForeignKeyBuilder {
    node_id: NodeId,
    constraint_name: Option<String>,
    generated_name: Option<String>,
    referencing_table: Option<NodeId>,
    referenced_table: Option<NodeId>,
    referencing_columns: Vec<NodeId>,
    referenced_columns: Vec<NodeId>,
}

impl ForeignKeyBuilder {
    pub fn new(node_id: NodeId) -> Self {
        ForeignKeyBuilder {
            node_id,
            constraint_name: None,
            generated_name: None,
            referencing_table: None,
            referenced_table: None,
            referencing_columns: Vec::new(),
            referenced_columns: Vec::new(),
        }
    }

    /// The handle registered with both endpoint tables before `build()`.
    pub fn id(&self) -> NodeId {
        self.node_id
    }

    pub fn set_constraint_name(&mut self, name: &str) -> &mut Self {
        self.constraint_name = Some(name.to_string());
        self
    }

    pub fn set_generated_name(&mut self, name: &str) -> &mut Self {
        self.generated_name = Some(name.to_string());
        self
    }

    pub fn set_referencing_table(&mut self, table: NodeId) -> &mut Self {
        self.referencing_table = Some(table);
        self
    }

    pub fn set_referenced_table(&mut self, table: NodeId) -> &mut Self {
        self.referenced_table = Some(table);
        self
    }

    pub fn add_referencing_column(&mut self, column: NodeId) {
        self.referencing_columns.push(column);
    }

    pub fn add_referenced_column(&mut self, column: NodeId) {
        self.referenced_columns.push(column);
    }

    pub fn build(self) -> SchemaResult<(NodeId, SchemaNode)> {
        if self.constraint_name.is_none() && self.generated_name.is_none() {
            return Err(SchemaError::IncompleteNode {
                kind: "Foreign Key",
                missing: "name",
            });
        }
        let referencing_table = self.referencing_table.ok_or(SchemaError::IncompleteNode {
            kind: "Foreign Key",
            missing: "referencing table",
        })?;
        let referenced_table = self.referenced_table.ok_or(SchemaError::IncompleteNode {
            kind: "Foreign Key",
            missing: "referenced table",
        })?;
        Ok((
            self.node_id,
            SchemaNode::ForeignKey(ForeignKey {
                constraint_name: self.constraint_name,
                generated_name: self.generated_name,
                referencing_table,
                referenced_table,
                referencing_columns: self.referencing_columns,
                referenced_columns: self.referenced_columns,
            }),
        ))
    }
}
