use std::sync::Arc;

use spandb_core::error::SchemaError;
use spandb_core::schema::column::{ColumnBuilder, ColumnDefTarget};
use spandb_core::schema::table::{Table, TableBuilder};
use spandb_core::schema::{ColumnId, GraphEditor, Schema, SchemaGraph, TableId};
use spandb_core::types::datatype::DataType;

/// Builds a one-table graph (table T with column C1) through the editor,
/// the way the statement applier does.
fn small_schema() -> Arc<Schema> {
    let mut editor = GraphEditor::new(Arc::new(SchemaGraph::empty()));
    assert!(!editor.has_modifications());

    let table_id = editor.reserve_id();
    let mut table = TableBuilder::new(table_id);
    table.set_id(TableId(1)).set_name("T");

    let mut column = ColumnBuilder::new(editor.reserve_id());
    column
        .set_id(ColumnId(1))
        .set_name("C1")
        .set_table(table_id);
    column.set_type(DataType::Int64);
    let (column_id, column_node) = column.build().unwrap();
    editor.add_node(column_id, column_node).unwrap();
    table.add_column(column_id, "C1".to_string());

    let (id, node) = table.build().unwrap();
    editor.add_node(id, node).unwrap();
    assert!(editor.has_modifications());

    let graph = editor.canonicalize().unwrap();
    Arc::new(Schema::new(graph).unwrap())
}

#[test]
fn test_add_nodes_and_canonicalize() {
    let schema = small_schema();
    assert_eq!(schema.num_nodes(), 2);
    let table_id = schema.find_table("T").unwrap();
    let table = schema.table(table_id).unwrap();
    assert_eq!(table.columns.len(), 1);
    assert_eq!(schema.column(table.columns[0]).unwrap().table, table_id);
}

#[test]
fn test_builder_with_missing_fields_fails() {
    let mut editor = GraphEditor::new(Arc::new(SchemaGraph::empty()));
    let builder = TableBuilder::new(editor.reserve_id());
    let err = builder.build().unwrap_err();
    assert!(matches!(err, SchemaError::IncompleteNode { kind: "Table", .. }));
}

#[test]
fn test_edit_mints_new_handle_and_rewrites_references() {
    let schema = small_schema();
    let old_table_id = schema.find_table("T").unwrap();
    let old_column_id = schema.table(old_table_id).unwrap().columns[0];

    let mut editor = GraphEditor::new(schema.graph().clone());
    let new_table_id = editor
        .edit_node::<Table>(old_table_id, |t| {
            t.set_on_delete(spandb_core::schema::OnDeleteAction::Cascade);
            Ok(())
        })
        .unwrap();
    assert_ne!(new_table_id, old_table_id);

    let graph = editor.canonicalize().unwrap();
    let new_schema = Schema::new(graph).unwrap();

    // The edited table carries the new handle; its column was cloned too
    // and rewritten to point at it.
    let table_id = new_schema.find_table("T").unwrap();
    assert_eq!(table_id, new_table_id);
    let table = new_schema.table(table_id).unwrap();
    let column = new_schema.column(table.columns[0]).unwrap();
    assert_ne!(table.columns[0], old_column_id);
    assert_eq!(column.table, table_id);

    // The original snapshot is unaffected.
    assert_eq!(schema.find_table("T"), Some(old_table_id));
    assert_eq!(
        schema.table(old_table_id).unwrap().on_delete,
        spandb_core::schema::OnDeleteAction::NoAction
    );
}

#[test]
fn test_editing_same_node_twice_reuses_the_draft() {
    let schema = small_schema();
    let table_id = schema.find_table("T").unwrap();

    let mut editor = GraphEditor::new(schema.graph().clone());
    let first = editor
        .edit_node::<Table>(table_id, |_| Ok(()))
        .unwrap();
    let second = editor
        .edit_node::<Table>(table_id, |_| Ok(()))
        .unwrap();
    let third = editor.edit_node::<Table>(first, |_| Ok(())).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, third);
}

#[test]
fn test_edit_with_wrong_kind_fails() {
    let schema = small_schema();
    let table_id = schema.find_table("T").unwrap();
    let mut editor = GraphEditor::new(schema.graph().clone());
    let err = editor
        .edit_node::<spandb_core::schema::column::Column>(table_id, |_| Ok(()))
        .unwrap_err();
    assert!(matches!(err, SchemaError::Internal(_)));
}

#[test]
fn test_delete_table_cascades_to_owned_nodes() {
    let schema = small_schema();
    let table_id = schema.find_table("T").unwrap();
    let mut editor = GraphEditor::new(schema.graph().clone());
    editor.delete_node(table_id).unwrap();
    let graph = editor.canonicalize().unwrap();
    assert!(graph.is_empty());
}

#[test]
fn test_fresh_editor_reports_no_modifications() {
    let schema = small_schema();
    let mut editor = GraphEditor::new(schema.graph().clone());
    assert!(!editor.has_modifications());
    editor
        .edit_node::<Table>(schema.find_table("T").unwrap(), |_| Ok(()))
        .unwrap();
    assert!(editor.has_modifications());
}

#[test]
fn test_handles_stay_stable_for_untouched_nodes() {
    let schema = small_schema();
    let mut editor = GraphEditor::new(schema.graph().clone());
    let extra_id = editor.reserve_id();
    let mut extra = TableBuilder::new(extra_id);
    extra.set_id(TableId(2)).set_name("U");
    let (id, node) = extra.build().unwrap();
    editor.add_node(id, node).unwrap();
    let graph = editor.canonicalize().unwrap();

    // T and its column kept their handles; U appended after them.
    let old_ids: Vec<_> = schema.graph().nodes().map(|(id, _)| id).collect();
    let new_ids: Vec<_> = graph.nodes().map(|(id, _)| id).collect();
    assert_eq!(&new_ids[..old_ids.len()], &old_ids[..]);
    assert_eq!(*new_ids.last().unwrap(), extra_id);
}
