impl GraphEditor {
    /// Turns the batched edits into a new consistent graph.
    ///
    /// 1. Compute the closure of the rewrite map: any live base node that
    ///    refers to a rewritten or deleted handle is cloned under a fresh
    ///    handle, repeatedly, until a fixed point.
    /// 2. Rewrite every draft's references through the rewrite map.
    ///    Membership lists drop deleted entries; scalar and constraint
    ///    references to deleted nodes are dangling and error out.
    /// 3. Emit: base order with clones replacing their originals in place,
    ///    deleted nodes dropped, added nodes appended in add order.
    pub fn canonicalize(self) -> SchemaResult<SchemaGraph> {
        let GraphEditor {
            base,
            mut next_id,
            mut pending,
            added,
            edits,
            deleted,
        } = self;

        let mut rewrites = edits;
        // Pure additions leave the base untouched and need no closure pass.
        while !rewrites.is_empty() || !deleted.is_empty() {
            let mut to_clone: Vec<NodeId> = Vec::new();
            for (id, node) in base.nodes() {
                if deleted.contains(&id) || rewrites.contains_key(&id) {
                    continue;
                }
                if node
                    .references()
                    .iter()
                    .any(|r| rewrites.contains_key(r) || deleted.contains(r))
                {
                    to_clone.push(id);
                }
            }
            if to_clone.is_empty() {
                break;
            }
            for id in to_clone {
                let node = base
                    .node(id)
                    .ok_or_else(|| internal(format!("no node {id} in base graph")))?;
                let new_id = NodeId(next_id);
                next_id += 1;
                pending.insert(new_id, (**node).clone());
                rewrites.insert(id, new_id);
            }
        }

        // Rewrite drafts in base order (additions after), so that when a
        // drop leaves several dangling references the reported failure is
        // stable. Object-level failures outrank column-level ones.
        let mut order: Vec<NodeId> = Vec::with_capacity(pending.len());
        for (id, _) in base.nodes() {
            if let Some(new_id) = rewrites.get(&id) {
                order.push(*new_id);
            }
        }
        order.extend(added.iter().copied());

        let mut failure: Option<(usize, SchemaError)> = None;
        for id in &order {
            let node = pending
                .get_mut(id)
                .ok_or_else(|| internal(format!("missing draft for node {id}")))?;
            if let Err(error) = rewrite_node(node, &rewrites, &deleted, &base) {
                let rank = dangling_error_rank(&error);
                if failure.as_ref().map(|(best, _)| rank < *best).unwrap_or(true) {
                    failure = Some((rank, error));
                }
            }
        }
        if let Some((_, error)) = failure {
            return Err(error);
        }

        let mut nodes: Vec<(NodeId, Arc<SchemaNode>)> =
            Vec::with_capacity(base.len() + added.len());
        for (id, node) in base.nodes() {
            if deleted.contains(&id) {
                continue;
            }
            match rewrites.get(&id) {
                Some(new_id) => {
                    let rebuilt = pending
                        .remove(new_id)
                        .ok_or_else(|| internal(format!("missing draft for node {new_id}")))?;
                    nodes.push((*new_id, Arc::new(rebuilt)));
                }
                None => nodes.push((id, node.clone())),
            }
        }
        for id in &added {
            let node = pending
                .remove(id)
                .ok_or_else(|| internal(format!("missing draft for added node {id}")))?;
            nodes.push((*id, Arc::new(node)));
        }
        if !pending.is_empty() {
            return Err(internal(format!(
                "{} draft node(s) left over after canonicalization",
                pending.len()
            )));
        }

        Ok(SchemaGraph::from_parts(nodes, next_id))
    }
}

fn dangling_error_rank(error: &SchemaError) -> usize {
    match error {
        SchemaError::CannotDropReferencedTable { .. } => 0,
        SchemaError::CannotDropKeyColumn { .. } => 1,
        SchemaError::CannotDropReferencedColumn { .. } => 2,
        _ => 3,
    }
}

fn map_ref(id: &mut NodeId, rewrites: &HashMap<NodeId, NodeId>) {
    if let Some(new_id) = rewrites.get(id) {
        *id = *new_id;
    }
}

/// Membership lists silently drop deleted entries before remapping.
fn map_member_list(
    list: &mut Vec<NodeId>,
    rewrites: &HashMap<NodeId, NodeId>,
    deleted: &HashSet<NodeId>,
) {
    list.retain(|id| !deleted.contains(id));
    for id in list.iter_mut() {
        map_ref(id, rewrites);
    }
}

/// Scalar references report the deleted handle they still point at.
fn map_required(
    id: &mut NodeId,
    rewrites: &HashMap<NodeId, NodeId>,
    deleted: &HashSet<NodeId>,
) -> Result<(), NodeId> {
    if deleted.contains(id) {
        return Err(*id);
    }
    map_ref(id, rewrites);
    Ok(())
}

fn map_optional(
    opt: &mut Option<NodeId>,
    rewrites: &HashMap<NodeId, NodeId>,
    deleted: &HashSet<NodeId>,
) -> Result<(), NodeId> {
    if let Some(id) = opt {
        if deleted.contains(id) {
            return Err(*id);
        }
        map_ref(id, rewrites);
    }
    Ok(())
}

/// Constraint lists must not lose members; a deleted entry is dangling.
fn map_strict_list(
    list: &mut Vec<NodeId>,
    rewrites: &HashMap<NodeId, NodeId>,
    deleted: &HashSet<NodeId>,
) -> Result<(), NodeId> {
    for id in list.iter_mut() {
        if deleted.contains(id) {
            return Err(*id);
        }
        map_ref(id, rewrites);
    }
    Ok(())
}

fn rewrite_node(
    node: &mut SchemaNode,
    rewrites: &HashMap<NodeId, NodeId>,
    deleted: &HashSet<NodeId>,
    base: &SchemaGraph,
) -> SchemaResult<()> {
    match node {
        SchemaNode::Table(t) => {
            map_member_list(&mut t.columns, rewrites, deleted);
            map_member_list(&mut t.primary_key, rewrites, deleted);
            map_member_list(&mut t.children, rewrites, deleted);
            map_member_list(&mut t.indexes, rewrites, deleted);
            map_member_list(&mut t.foreign_keys, rewrites, deleted);
            map_member_list(&mut t.referencing_foreign_keys, rewrites, deleted);
            if let Err(parent) = map_optional(&mut t.parent, rewrites, deleted) {
                return Err(SchemaError::CannotDropReferencedTable {
                    table: node_display_name(base, parent),
                    referrer: format!("interleaved table '{}'", t.name),
                });
            }
            if let Err(owner) = map_optional(&mut t.owner_index, rewrites, deleted) {
                return Err(internal(format!(
                    "data table '{}' survived the drop of its index {owner}",
                    t.name
                )));
            }
        }
        SchemaNode::Column(c) => {
            let original_table = c.table;
            if let Err(table) = map_required(&mut c.table, rewrites, deleted) {
                return Err(internal(format!(
                    "column '{}' survived the drop of its table {table}",
                    c.name
                )));
            }
            if let Err(source) = map_optional(&mut c.source_column, rewrites, deleted) {
                return Err(SchemaError::CannotDropReferencedColumn {
                    column: node_display_name(base, source),
                    referrer: owning_index_description(base, original_table),
                });
            }
        }
        SchemaNode::KeyColumn(k) => {
            if let Err(column) = map_required(&mut k.column, rewrites, deleted) {
                let (column, table) = column_and_table_names(base, column);
                return Err(SchemaError::CannotDropKeyColumn { column, table });
            }
        }
        SchemaNode::Index(i) => {
            if let Err(table) = map_required(&mut i.indexed_table, rewrites, deleted) {
                return Err(SchemaError::CannotDropReferencedTable {
                    table: node_display_name(base, table),
                    referrer: format!("index '{}'", i.name),
                });
            }
            if let Err(data) = map_required(&mut i.index_data_table, rewrites, deleted) {
                return Err(internal(format!(
                    "index '{}' survived the drop of its data table {data}",
                    i.name
                )));
            }
            if let Err(key) = map_strict_list(&mut i.key_columns, rewrites, deleted) {
                return Err(internal(format!(
                    "index '{}' key column {key} was deleted",
                    i.name
                )));
            }
            if let Err(col) = map_strict_list(&mut i.stored_columns, rewrites, deleted) {
                return Err(internal(format!(
                    "index '{}' stored column {col} was deleted",
                    i.name
                )));
            }
        }
        SchemaNode::ForeignKey(f) => {
            let fk_name = f.name().to_string();
            if let Err(table) = map_required(&mut f.referencing_table, rewrites, deleted) {
                return Err(internal(format!(
                    "foreign key '{fk_name}' survived the drop of its table {table}"
                )));
            }
            if let Err(table) = map_required(&mut f.referenced_table, rewrites, deleted) {
                return Err(SchemaError::CannotDropReferencedTable {
                    table: node_display_name(base, table),
                    referrer: format!("foreign key '{fk_name}'"),
                });
            }
            if let Err(col) = map_strict_list(&mut f.referencing_columns, rewrites, deleted) {
                return Err(SchemaError::CannotDropReferencedColumn {
                    column: node_display_name(base, col),
                    referrer: format!("foreign key '{fk_name}'"),
                });
            }
            if let Err(col) = map_strict_list(&mut f.referenced_columns, rewrites, deleted) {
                return Err(SchemaError::CannotDropReferencedColumn {
                    column: node_display_name(base, col),
                    referrer: format!("foreign key '{fk_name}'"),
                });
            }
        }
    }
    Ok(())
}

fn node_display_name(base: &SchemaGraph, id: NodeId) -> String {
    match base.node(id) {
        Some(node) => match &**node {
            SchemaNode::Table(t) => t.name.clone(),
            SchemaNode::Column(c) => c.name.clone(),
            SchemaNode::Index(i) => i.name.clone(),
            SchemaNode::ForeignKey(f) => f.name().to_string(),
            SchemaNode::KeyColumn(_) => id.to_string(),
        },
        None => id.to_string(),
    }
}

/// Names the index owning a data-table column, for drop errors.
fn owning_index_description(base: &SchemaGraph, data_table: NodeId) -> String {
    base.table(data_table)
        .ok()
        .and_then(|t| t.owner_index)
        .and_then(|id| base.index(id).ok())
        .map(|i| format!("index '{}'", i.name))
        .unwrap_or_else(|| "an index".to_string())
}

fn column_and_table_names(base: &SchemaGraph, column: NodeId) -> (String, String) {
    match base.column(column) {
        Ok(c) => {
            let table = base
                .table(c.table)
                .map(|t| t.name.clone())
                .unwrap_or_else(|_| c.table.to_string());
            (c.name.clone(), table)
        }
        Err(_) => (column.to_string(), String::from("?")),
    }
}
