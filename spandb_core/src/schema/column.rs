use crate::error::{SchemaError, SchemaResult};
use crate::schema::ids::ColumnId;
use crate::schema::node::{NodeId, SchemaNode};
use crate::types::datatype::DataType;

/// A column of a table. `source_column` is set only on index data-table
/// columns and points back at the indexed table's column they shadow.
#[derive(Debug, Clone)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub table: NodeId,
    pub dtype: DataType,
    pub nullable: bool,
    pub declared_max_length: Option<i64>,
    pub allow_commit_timestamp: Option<bool>,
    pub source_column: Option<NodeId>,
}

impl Column {
    /// `STRING` and `BYTES` render with their declared length; `MAX` when
    /// none was declared.
    pub fn type_display(&self) -> String {
        match self.dtype {
            DataType::String | DataType::Bytes => match self.declared_max_length {
                Some(n) => format!("{}({n})", self.dtype),
                None => format!("{}(MAX)", self.dtype),
            },
            _ => self.dtype.to_string(),
        }
    }
}

/// One part of a primary key: a column plus its sort order.
#[derive(Debug, Clone)]
pub struct KeyColumn {
    pub column: NodeId,
    pub descending: bool,
}

/// Shared surface for applying a DDL column definition, implemented both by
/// the builder (CREATE paths) and by the node itself (ALTER COLUMN edits).
pub trait ColumnDefTarget {
    fn set_type(&mut self, dtype: DataType);
    fn set_nullable(&mut self, nullable: bool);
    fn set_declared_max_length(&mut self, max_length: Option<i64>);
    fn set_allow_commit_timestamp(&mut self, allow: Option<bool>);
}

impl ColumnDefTarget for Column {
    fn set_type(&mut self, dtype: DataType) {
        self.dtype = dtype;
    }
    fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }
    fn set_declared_max_length(&mut self, max_length: Option<i64>) {
        self.declared_max_length = max_length;
    }
    fn set_allow_commit_timestamp(&mut self, allow: Option<bool>) {
        self.allow_commit_timestamp = allow;
    }
}

pub struct ColumnBuilder {
    node_id: NodeId,
    id: Option<ColumnId>,
    name: Option<String>,
    table: Option<NodeId>,
    dtype: Option<DataType>,
    nullable: bool,
    declared_max_length: Option<i64>,
    allow_commit_timestamp: Option<bool>,
    source_column: Option<NodeId>,
}

impl ColumnBuilder {
    pub fn new(node_id: NodeId) -> Self {
        ColumnBuilder {
            node_id,
            id: None,
            name: None,
            table: None,
            dtype: None,
            nullable: true,
            declared_max_length: None,
            allow_commit_timestamp: None,
            source_column: None,
        }
    }

    /// The handle the built node will occupy; usable as a forward reference.
    pub fn id(&self) -> NodeId {
        self.node_id
    }

    pub fn set_id(&mut self, id: ColumnId) -> &mut Self {
        self.id = Some(id);
        self
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn set_table(&mut self, table: NodeId) -> &mut Self {
        self.table = Some(table);
        self
    }

    pub fn set_source_column(&mut self, source: NodeId) -> &mut Self {
        self.source_column = Some(source);
        self
    }

    pub fn build(self) -> SchemaResult<(NodeId, SchemaNode)> {
        let id = self.id.ok_or(SchemaError::IncompleteNode {
            kind: "Column",
            missing: "id",
        })?;
        let name = self.name.ok_or(SchemaError::IncompleteNode {
            kind: "Column",
            missing: "name",
        })?;
        let table = self.table.ok_or(SchemaError::IncompleteNode {
            kind: "Column",
            missing: "table",
        })?;
        let dtype = self.dtype.ok_or(SchemaError::IncompleteNode {
            kind: "Column",
            missing: "type",
        })?;
        Ok((
            self.node_id,
            SchemaNode::Column(Column {
                id,
                name,
                table,
                dtype,
                nullable: self.nullable,
                declared_max_length: self.declared_max_length,
                allow_commit_timestamp: self.allow_commit_timestamp,
                source_column: self.source_column,
            }),
        ))
    }
}

impl ColumnDefTarget for ColumnBuilder {
    fn set_type(&mut self, dtype: DataType) {
        self.dtype = Some(dtype);
    }
    fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }
    fn set_declared_max_length(&mut self, max_length: Option<i64>) {
        self.declared_max_length = max_length;
    }
    fn set_allow_commit_timestamp(&mut self, allow: Option<bool>) {
        self.allow_commit_timestamp = allow;
    }
}

pub struct KeyColumnBuilder {
    node_id: NodeId,
    column: Option<NodeId>,
    descending: bool,
}

impl KeyColumnBuilder {
    pub fn new(node_id: NodeId) -> Self {
        KeyColumnBuilder {
            node_id,
            column: None,
            descending: false,
        }
    }

    pub fn set_column(&mut self, column: NodeId) -> &mut Self {
        self.column = Some(column);
        self
    }

    pub fn set_descending(&mut self, descending: bool) -> &mut Self {
        self.descending = descending;
        self
    }

    pub fn build(self) -> SchemaResult<(NodeId, SchemaNode)> {
        let column = self.column.ok_or(SchemaError::IncompleteNode {
            kind: "KeyColumn",
            missing: "column",
        })?;
        Ok((
            self.node_id,
            SchemaNode::KeyColumn(KeyColumn {
                column,
                descending: self.descending,
            }),
        ))
    }
}
