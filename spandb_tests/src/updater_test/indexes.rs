use super::*;

use spandb_core::schema::index::INDEX_DATA_TABLE_PREFIX;
use spandb_core::schema::OnDeleteAction;

fn base_schema(env: &mut TestEnv) -> Arc<Schema> {
    env.apply(
        empty(),
        &["CREATE TABLE T1 (C1 INT64 NOT NULL, C2 STRING(MAX), C3 BYTES(16)) PRIMARY KEY (C1)"],
    )
    .unwrap()
}

#[test]
fn test_create_null_filtered_index() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env
        .apply(schema, &["CREATE NULL_FILTERED INDEX Idx1 ON T1 (C2)"])
        .unwrap();

    let idx = index(&schema, "Idx1");
    assert!(idx.null_filtered);
    assert!(!idx.unique);
    assert!(idx.stored_columns.is_empty());
    assert_eq!(idx.indexed_table, schema.find_table("T1").unwrap());

    let data = schema.table(idx.index_data_table).unwrap();
    assert_eq!(data.name, format!("{INDEX_DATA_TABLE_PREFIX}Idx1"));
    assert_eq!(
        data.owner_index,
        Some(schema.find_index("Idx1").unwrap())
    );
    // Declared keys first, then the indexed table's remaining key columns.
    assert_eq!(pk_names(&schema, data), vec!["C2", "C1"]);
    // Null-filtered key columns come out non-nullable; C1 was already
    // NOT NULL at the source.
    for &cid in &data.columns {
        assert!(!schema.column(cid).unwrap().nullable);
    }
    // The declared-key prefix of the data table key is the index key.
    assert_eq!(idx.key_columns.len(), 1);
    assert_eq!(idx.key_columns[0], data.primary_key[0]);

    // The data table is interleaved in the indexed table with cascade.
    let t1_id = schema.find_table("T1").unwrap();
    assert_eq!(data.parent, Some(t1_id));
    assert_eq!(data.on_delete, OnDeleteAction::Cascade);
    let t1 = table(&schema, "T1");
    assert!(t1.children.contains(&idx.index_data_table));
    assert!(t1.indexes.contains(&schema.find_index("Idx1").unwrap()));
}

#[test]
fn test_index_clones_inherit_nullability_when_not_filtered() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env.apply(schema, &["CREATE INDEX Idx ON T1 (C2)"]).unwrap();

    let idx = index(&schema, "Idx");
    let data = schema.table(idx.index_data_table).unwrap();
    let c2 = schema
        .find_column(idx.index_data_table, "C2")
        .map(|cid| schema.column(cid).unwrap())
        .unwrap();
    assert!(c2.nullable);
    let c1 = schema
        .find_column(idx.index_data_table, "C1")
        .map(|cid| schema.column(cid).unwrap())
        .unwrap();
    assert!(!c1.nullable);
    assert_eq!(data.columns.len(), 2);
}

#[test]
fn test_index_data_table_columns_point_at_sources() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env.apply(schema, &["CREATE INDEX Idx ON T1 (C2)"]).unwrap();

    let idx = index(&schema, "Idx");
    let t1_id = schema.find_table("T1").unwrap();
    let data = schema.table(idx.index_data_table).unwrap();
    for &cid in &data.columns {
        let clone = schema.column(cid).unwrap();
        let source = schema.column(clone.source_column.unwrap()).unwrap();
        assert_eq!(source.table, t1_id);
        assert_eq!(source.name, clone.name);
        assert_eq!(source.dtype, clone.dtype);
    }
}

#[test]
fn test_create_index_with_stored_columns() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env
        .apply(schema, &["CREATE UNIQUE INDEX Idx ON T1 (C2) STORING (C3)"])
        .unwrap();

    let idx = index(&schema, "Idx");
    assert!(idx.unique);
    assert_eq!(idx.stored_columns.len(), 1);
    let stored = schema.column(idx.stored_columns[0]).unwrap();
    assert_eq!(stored.name, "C3");
    assert_eq!(stored.table, idx.index_data_table);
    assert_eq!(stored.declared_max_length, Some(16));
    // Stored columns are not key parts.
    let data = schema.table(idx.index_data_table).unwrap();
    assert_eq!(pk_names(&schema, data), vec!["C2", "C1"]);
    assert_eq!(data.columns.len(), 3);
}

#[test]
fn test_empty_storing_clause_is_allowed() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env
        .apply(schema, &["CREATE NULL_FILTERED INDEX Idx1 ON T1 (C2) STORING ()"])
        .unwrap();
    assert!(index(&schema, "Idx1").stored_columns.is_empty());
}

#[test]
fn test_index_preserves_descending_key_flags() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &["CREATE TABLE T (A INT64 NOT NULL, B INT64 NOT NULL, V STRING(MAX)) PRIMARY KEY (A, B DESC)"],
        )
        .unwrap();
    let schema = env.apply(schema, &["CREATE INDEX Idx ON T (V DESC)"]).unwrap();

    let idx = index(&schema, "Idx");
    let data = schema.table(idx.index_data_table).unwrap();
    assert_eq!(pk_names(&schema, data), vec!["V DESC", "A", "B DESC"]);
}

#[test]
fn test_index_skips_key_columns_already_declared() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env.apply(schema, &["CREATE INDEX Idx ON T1 (C1)"]).unwrap();

    let idx = index(&schema, "Idx");
    let data = schema.table(idx.index_data_table).unwrap();
    assert_eq!(data.columns.len(), 1);
    assert_eq!(pk_names(&schema, data), vec!["C1"]);
}

#[test]
fn test_index_on_interleaved_child_can_interleave_in_parent() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE P (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE C (Id INT64 NOT NULL, V INT64) PRIMARY KEY (Id), \
                 INTERLEAVE IN PARENT P ON DELETE CASCADE",
            ],
        )
        .unwrap();
    let schema = env
        .apply(schema, &["CREATE INDEX Idx ON C (V), INTERLEAVE IN P"])
        .unwrap();

    let idx = index(&schema, "Idx");
    let data = schema.table(idx.index_data_table).unwrap();
    assert_eq!(data.parent, Some(schema.find_table("P").unwrap()));
    assert_eq!(data.on_delete, OnDeleteAction::Cascade);
}

#[test]
fn test_index_on_missing_table() {
    let mut env = TestEnv::new();
    let err = env
        .apply(empty(), &["CREATE INDEX Idx ON Nope (C1)"])
        .unwrap_err();
    assert_eq!(err, SchemaError::TableNotFound("Nope".to_string()));
}

#[test]
fn test_index_on_missing_column() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let err = env
        .apply(schema, &["CREATE INDEX Idx ON T1 (Nope)"])
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::IndexRefsNonExistentColumn {
            index: "Idx".to_string(),
            column: "Nope".to_string(),
        }
    );
}

#[test]
fn test_index_interleave_in_missing_table() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let err = env
        .apply(schema, &["CREATE INDEX Idx ON T1 (C2), INTERLEAVE IN Ghost"])
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::IndexInterleaveTableNotFound {
            index: "Idx".to_string(),
            parent: "Ghost".to_string(),
        }
    );
}

#[test]
fn test_index_appears_before_its_data_table_in_creation_order() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env.apply(schema, &["CREATE INDEX Idx ON T1 (C2)"]).unwrap();

    let idx_id = schema.find_index("Idx").unwrap();
    let data_id = index(&schema, "Idx").index_data_table;
    let order: Vec<_> = schema.graph().nodes().map(|(id, _)| id).collect();
    let idx_pos = order.iter().position(|&id| id == idx_id).unwrap();
    let data_pos = order.iter().position(|&id| id == data_id).unwrap();
    assert!(idx_pos < data_pos);
}
