use std::collections::{HashMap, HashSet};

use crate::error::{internal, SchemaError, SchemaResult};
use crate::schema::NodeId;
use crate::storage::StorageEngine;
use crate::types::value::{value_to_string, Value};
use crate::types::Row;
use crate::updater::context::{SchemaChangeAction, SchemaValidationContext};

/// Runs one statement's deferred actions against the storage engine.
pub(crate) fn run_schema_change_actions(
    context: &SchemaValidationContext,
    storage: &mut dyn StorageEngine,
) -> SchemaResult<()> {
    for action in context.actions() {
        match action {
            SchemaChangeAction::BackfillIndex { index } => {
                backfill_index(context, storage, *index)?;
            }
        }
    }
    Ok(())
}

/// Populates an index data table from the indexed table's rows: projects
/// each row through the data-table columns' `source_column` links, skips
/// null-keyed rows for null-filtered indexes, and rejects duplicate
/// declared-key tuples for unique indexes.
fn backfill_index(
    context: &SchemaValidationContext,
    storage: &mut dyn StorageEngine,
    index_id: NodeId,
) -> SchemaResult<()> {
    let schema = context.new_schema()?;
    let graph = schema.graph();
    let index = graph.index(index_id)?;
    let indexed = graph.table(index.indexed_table)?;
    let data = graph.table(index.index_data_table)?;
    log::debug!("backfilling index '{}' into '{}'", index.name, data.name);

    storage.create_table(&data.name)?;
    let source_rows: Vec<Row> = storage.scan(&indexed.name)?.to_vec();

    let mut source_ordinals: HashMap<NodeId, usize> = HashMap::new();
    for (pos, column) in indexed.columns.iter().enumerate() {
        source_ordinals.insert(*column, pos);
    }
    let mut data_ordinals: HashMap<NodeId, usize> = HashMap::new();
    for (pos, column) in data.columns.iter().enumerate() {
        data_ordinals.insert(*column, pos);
    }

    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut out_rows: Vec<Row> = Vec::with_capacity(source_rows.len());
    'rows: for row in &source_rows {
        let mut out: Row = Vec::with_capacity(data.columns.len());
        for column_id in &data.columns {
            let column = graph.column(*column_id)?;
            let source = column.source_column.ok_or_else(|| {
                internal(format!(
                    "data table column '{}' of index '{}' has no source",
                    column.name, index.name
                ))
            })?;
            let pos = source_ordinals.get(&source).ok_or_else(|| {
                internal(format!(
                    "source column of '{}' is not a column of '{}'",
                    column.name, indexed.name
                ))
            })?;
            out.push(row.get(*pos).cloned().unwrap_or(Value::Null));
        }

        let mut key: Vec<&Value> = Vec::with_capacity(index.key_columns.len());
        for key_column_id in &index.key_columns {
            let key_column = graph.key_column(*key_column_id)?;
            let pos = data_ordinals.get(&key_column.column).ok_or_else(|| {
                internal(format!(
                    "key column of index '{}' is not a data table column",
                    index.name
                ))
            })?;
            key.push(&out[*pos]);
        }

        if index.null_filtered && key.iter().any(|v| v.is_null()) {
            continue 'rows;
        }
        if index.unique && !seen_keys.insert(encode_key(&key)) {
            return Err(SchemaError::UniqueIndexViolation {
                index: index.name.clone(),
                key: display_key(&key),
            });
        }
        drop(key);
        out_rows.push(out);
    }

    for row in out_rows {
        storage.insert_row(&data.name, row)?;
    }
    Ok(())
}

/// Type-tagged encoding so values of different types never compare equal.
fn encode_key(values: &[&Value]) -> String {
    let parts: Vec<String> = values
        .iter()
        .copied()
        .map(|v| {
            let tag = match v {
                Value::Null => 'n',
                Value::Bool(_) => 'b',
                Value::Int64(_) => 'i',
                Value::Float64(_) => 'f',
                Value::String(_) => 's',
                Value::Bytes(_) => 'y',
                Value::Date(_) => 'd',
                Value::Timestamp(_) => 't',
            };
            format!("{tag}:{}", value_to_string(v))
        })
        .collect();
    parts.join("\u{1}")
}

fn display_key(values: &[&Value]) -> String {
    let parts: Vec<String> = values.iter().copied().map(value_to_string).collect();
    format!("({})", parts.join(", "))
}
