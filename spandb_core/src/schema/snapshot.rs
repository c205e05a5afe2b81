use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::error::{internal, SchemaError, SchemaResult};
use crate::schema::column::{Column, KeyColumn};
use crate::schema::foreign_key::ForeignKey;
use crate::schema::graph::SchemaGraph;
use crate::schema::index::Index;
use crate::schema::node::{NodeId, OnDeleteAction, SchemaNode};
use crate::schema::table::Table;

lazy_static! {
    static ref EMPTY_SCHEMA: Arc<Schema> = Arc::new(Schema {
        graph: Arc::new(SchemaGraph::empty()),
        tables: Vec::new(),
        indexes: Vec::new(),
        tables_by_name: HashMap::new(),
        indexes_by_name: HashMap::new(),
    });
}

/// An immutable schema snapshot: a canonicalized graph plus lookup views.
/// Snapshots are shared freely; readers holding an old snapshot are
/// unaffected by later schema changes.
#[derive(Debug)]
pub struct Schema {
    graph: Arc<SchemaGraph>,
    /// User tables (index data tables excluded), creation order.
    tables: Vec<NodeId>,
    indexes: Vec<NodeId>,
    tables_by_name: HashMap<String, NodeId>,
    indexes_by_name: HashMap<String, NodeId>,
}

impl Schema {
    /// The process-wide zero-node schema.
    pub fn empty() -> Arc<Schema> {
        EMPTY_SCHEMA.clone()
    }

    /// Wraps a canonicalized graph, checking the structural invariants a
    /// snapshot must uphold.
    pub fn new(graph: SchemaGraph) -> SchemaResult<Schema> {
        validate_graph(&graph)?;

        let mut tables = Vec::new();
        let mut indexes = Vec::new();
        let mut tables_by_name = HashMap::new();
        let mut indexes_by_name = HashMap::new();
        for (id, node) in graph.nodes() {
            match &**node {
                SchemaNode::Table(t) if t.owner_index.is_none() => {
                    tables.push(id);
                    tables_by_name.insert(t.name.to_lowercase(), id);
                }
                SchemaNode::Index(i) => {
                    indexes.push(id);
                    indexes_by_name.insert(i.name.to_lowercase(), id);
                }
                _ => {}
            }
        }

        Ok(Schema {
            graph: Arc::new(graph),
            tables,
            indexes,
            tables_by_name,
            indexes_by_name,
        })
    }

    pub fn graph(&self) -> &Arc<SchemaGraph> {
        &self.graph
    }

    /// User tables in creation order.
    pub fn tables(&self) -> &[NodeId] {
        &self.tables
    }

    pub fn indexes(&self) -> &[NodeId] {
        &self.indexes
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.len()
    }

    pub fn table(&self, id: NodeId) -> SchemaResult<&Table> {
        self.graph.table(id)
    }

    pub fn column(&self, id: NodeId) -> SchemaResult<&Column> {
        self.graph.column(id)
    }

    pub fn key_column(&self, id: NodeId) -> SchemaResult<&KeyColumn> {
        self.graph.key_column(id)
    }

    pub fn index(&self, id: NodeId) -> SchemaResult<&Index> {
        self.graph.index(id)
    }

    pub fn foreign_key(&self, id: NodeId) -> SchemaResult<&ForeignKey> {
        self.graph.foreign_key(id)
    }

    /// Case-insensitive table lookup (user tables only).
    pub fn find_table(&self, name: &str) -> Option<NodeId> {
        self.tables_by_name.get(&name.to_lowercase()).copied()
    }

    pub fn find_table_case_sensitive(&self, name: &str) -> Option<NodeId> {
        let id = self.find_table(name)?;
        match self.graph.table(id) {
            Ok(t) if t.name == name => Some(id),
            _ => None,
        }
    }

    pub fn find_index(&self, name: &str) -> Option<NodeId> {
        self.indexes_by_name.get(&name.to_lowercase()).copied()
    }

    /// Case-insensitive column lookup within a table.
    pub fn find_column(&self, table: NodeId, name: &str) -> Option<NodeId> {
        let t = self.graph.table(table).ok()?;
        t.columns.iter().copied().find(|&cid| {
            self.graph
                .column(cid)
                .map(|c| c.name.eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
    }

    pub fn find_column_case_sensitive(&self, table: NodeId, name: &str) -> Option<NodeId> {
        let t = self.graph.table(table).ok()?;
        t.columns.iter().copied().find(|&cid| {
            self.graph
                .column(cid)
                .map(|c| c.name == name)
                .unwrap_or(false)
        })
    }

    /// Finds a constraint on a table by name (case-insensitive). Only
    /// foreign keys carry constraint names today.
    pub fn find_foreign_key(&self, table: NodeId, name: &str) -> Option<NodeId> {
        let t = self.graph.table(table).ok()?;
        t.foreign_keys.iter().copied().find(|&fid| {
            self.graph
                .foreign_key(fid)
                .map(|f| f.name().eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
    }

    /// Deterministic structural dump, IDs excluded. Two snapshots with the
    /// same dump are structurally equal.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for &tid in &self.tables {
            if let Ok(t) = self.graph.table(tid) {
                self.describe_table(&mut out, t, "");
            }
        }
        for &iid in &self.indexes {
            if let Ok(i) = self.graph.index(iid) {
                self.describe_index(&mut out, i);
            }
        }
        out
    }

    fn describe_table(&self, out: &mut String, t: &Table, indent: &str) {
        let _ = writeln!(out, "{indent}table {}", t.name);
        for &cid in &t.columns {
            if let Ok(c) = self.graph.column(cid) {
                let _ = write!(out, "{indent}  column {} {}", c.name, c.type_display());
                if !c.nullable {
                    let _ = write!(out, " NOT NULL");
                }
                if let Some(allow) = c.allow_commit_timestamp {
                    let _ = write!(out, " options (allow_commit_timestamp={allow})");
                }
                let _ = writeln!(out);
            }
        }
        let _ = writeln!(out, "{indent}  primary key ({})", self.key_list(&t.primary_key));
        if let Some(parent) = t.parent {
            if let Ok(p) = self.graph.table(parent) {
                let _ = writeln!(
                    out,
                    "{indent}  interleave in parent {} on delete {}",
                    p.name, t.on_delete
                );
            }
        }
        for &fid in &t.foreign_keys {
            if let Ok(f) = self.graph.foreign_key(fid) {
                let _ = writeln!(
                    out,
                    "{indent}  foreign key {} ({}) references {} ({})",
                    f.name(),
                    self.column_list(&f.referencing_columns),
                    self.graph
                        .table(f.referenced_table)
                        .map(|rt| rt.name.clone())
                        .unwrap_or_default(),
                    self.column_list(&f.referenced_columns),
                );
            }
        }
    }

    fn describe_index(&self, out: &mut String, i: &Index) {
        let indexed = self
            .graph
            .table(i.indexed_table)
            .map(|t| t.name.clone())
            .unwrap_or_default();
        let _ = write!(out, "index {} on {} ({})", i.name, indexed, self.key_list(&i.key_columns));
        if i.unique {
            let _ = write!(out, " unique");
        }
        if i.null_filtered {
            let _ = write!(out, " null_filtered");
        }
        let _ = writeln!(out);
        if !i.stored_columns.is_empty() {
            let _ = writeln!(out, "  storing ({})", self.column_list(&i.stored_columns));
        }
        if let Ok(data) = self.graph.table(i.index_data_table) {
            self.describe_table(out, data, "  ");
        }
    }

    fn key_list(&self, key_columns: &[NodeId]) -> String {
        let mut parts = Vec::new();
        for &kid in key_columns {
            if let Ok(k) = self.graph.key_column(kid) {
                let name = self
                    .graph
                    .column(k.column)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                parts.push(if k.descending {
                    format!("{name} DESC")
                } else {
                    name
                });
            }
        }
        parts.join(", ")
    }

    fn column_list(&self, columns: &[NodeId]) -> String {
        let names: Vec<String> = columns
            .iter()
            .filter_map(|&cid| self.graph.column(cid).ok().map(|c| c.name.clone()))
            .collect();
        names.join(", ")
    }
}

fn validate_graph(graph: &SchemaGraph) -> SchemaResult<()> {
    for (id, node) in graph.nodes() {
        for r in node.references() {
            if !graph.contains(r) {
                return Err(internal(format!(
                    "node {id} references node {r} outside the snapshot"
                )));
            }
        }
        match &**node {
            SchemaNode::Table(t) => validate_table(graph, id, t)?,
            SchemaNode::Index(i) => validate_index(graph, id, i)?,
            SchemaNode::ForeignKey(f) => validate_foreign_key(graph, id, f)?,
            SchemaNode::Column(_) | SchemaNode::KeyColumn(_) => {}
        }
    }
    Ok(())
}

fn validate_table(graph: &SchemaGraph, id: NodeId, t: &Table) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    for &cid in &t.columns {
        let c = graph.column(cid)?;
        if c.table != id {
            return Err(internal(format!(
                "column '{}' of table '{}' has a stale table reference",
                c.name, t.name
            )));
        }
        if !seen.insert(c.name.to_lowercase()) {
            return Err(SchemaError::DuplicateName {
                kind: "Column".to_string(),
                name: c.name.clone(),
            });
        }
    }
    for &kid in &t.primary_key {
        let k = graph.key_column(kid)?;
        if !t.columns.contains(&k.column) {
            return Err(internal(format!(
                "primary key of table '{}' names a column outside the table",
                t.name
            )));
        }
    }
    if let Some(parent) = t.parent {
        let p = graph.table(parent)?;
        if !p.children.contains(&id) {
            return Err(internal(format!(
                "parent '{}' does not list child table '{}'",
                p.name, t.name
            )));
        }
    }
    for &child in &t.children {
        if graph.table(child)?.parent != Some(id) {
            return Err(internal(format!(
                "child of table '{}' has a stale parent reference",
                t.name
            )));
        }
    }
    for &fid in &t.foreign_keys {
        if graph.foreign_key(fid)?.referencing_table != id {
            return Err(internal(format!(
                "foreign key list of table '{}' is inconsistent",
                t.name
            )));
        }
    }
    for &fid in &t.referencing_foreign_keys {
        if graph.foreign_key(fid)?.referenced_table != id {
            return Err(internal(format!(
                "referencing foreign key list of table '{}' is inconsistent",
                t.name
            )));
        }
    }
    if let Some(owner) = t.owner_index {
        if graph.index(owner)?.index_data_table != id {
            return Err(internal(format!(
                "owner index of data table '{}' does not own it",
                t.name
            )));
        }
    }
    Ok(())
}

fn validate_index(graph: &SchemaGraph, id: NodeId, i: &Index) -> SchemaResult<()> {
    let data = graph.table(i.index_data_table)?;
    if data.owner_index != Some(id) {
        return Err(internal(format!(
            "data table of index '{}' does not point back at it",
            i.name
        )));
    }
    if i.key_columns.len() > data.primary_key.len()
        || i.key_columns[..] != data.primary_key[..i.key_columns.len()]
    {
        return Err(internal(format!(
            "key columns of index '{}' are not a prefix of its data table primary key",
            i.name
        )));
    }
    if i.null_filtered {
        for &kid in &i.key_columns {
            let k = graph.key_column(kid)?;
            if graph.column(k.column)?.nullable {
                return Err(internal(format!(
                    "null-filtered index '{}' has a nullable key column",
                    i.name
                )));
            }
        }
    }
    for &cid in &i.stored_columns {
        let c = graph.column(cid)?;
        if c.table != i.index_data_table {
            return Err(internal(format!(
                "stored column of index '{}' lives outside its data table",
                i.name
            )));
        }
        let source = c.source_column.ok_or_else(|| {
            internal(format!("stored column of index '{}' has no source", i.name))
        })?;
        if graph.column(source)?.table != i.indexed_table {
            return Err(internal(format!(
                "stored column of index '{}' does not come from the indexed table",
                i.name
            )));
        }
    }
    if data.parent.is_none() || data.on_delete != OnDeleteAction::Cascade {
        return Err(internal(format!(
            "data table of index '{}' must be interleaved with ON DELETE CASCADE",
            i.name
        )));
    }
    let indexed = graph.table(i.indexed_table)?;
    if !indexed.indexes.contains(&id) {
        return Err(internal(format!(
            "indexed table '{}' does not list index '{}'",
            indexed.name, i.name
        )));
    }
    Ok(())
}

fn validate_foreign_key(graph: &SchemaGraph, id: NodeId, f: &ForeignKey) -> SchemaResult<()> {
    if f.referencing_columns.is_empty() {
        return Err(SchemaError::InvalidDdl(
            "FOREIGN KEY column list cannot be empty".to_string(),
        ));
    }
    if f.referencing_columns.len() != f.referenced_columns.len() {
        return Err(SchemaError::InvalidDdl(
            "FOREIGN KEY column count must match referenced column count".to_string(),
        ));
    }
    let referencing = graph.table(f.referencing_table)?;
    if !referencing.foreign_keys.contains(&id) {
        return Err(internal(format!(
            "foreign key '{}' is missing from its referencing table",
            f.name()
        )));
    }
    for c in &f.referencing_columns {
        if !referencing.columns.contains(c) {
            return Err(internal(format!(
                "foreign key '{}' references a column outside table '{}'",
                f.name(),
                referencing.name
            )));
        }
    }
    let referenced = graph.table(f.referenced_table)?;
    if !referenced.referencing_foreign_keys.contains(&id) {
        return Err(internal(format!(
            "foreign key '{}' is missing from its referenced table",
            f.name()
        )));
    }
    for c in &f.referenced_columns {
        if !referenced.columns.contains(c) {
            return Err(internal(format!(
                "foreign key '{}' references a column outside table '{}'",
                f.name(),
                referenced.name
            )));
        }
    }
    Ok(())
}
