use super::*;

use spandb_core::limits::MAX_TABLES_PER_DATABASE;
use spandb_core::schema::{GraphEditor, SchemaNode};

/// A batch exercising every statement kind, used by the invariant checks.
fn rich_schema(env: &mut TestEnv) -> Arc<Schema> {
    env.apply(
        empty(),
        &[
            "CREATE TABLE Albums (AlbumId INT64 NOT NULL, Title STRING(MAX), \
             Rating FLOAT64) PRIMARY KEY (AlbumId)",
            "CREATE TABLE Songs (AlbumId INT64 NOT NULL, SongId INT64 NOT NULL, \
             Name STRING(200)) PRIMARY KEY (AlbumId, SongId DESC), \
             INTERLEAVE IN PARENT Albums ON DELETE CASCADE",
            "CREATE TABLE Artists (ArtistId INT64 NOT NULL, AlbumId INT64, \
             CONSTRAINT FkArtistAlbum FOREIGN KEY (AlbumId) REFERENCES Albums (AlbumId)) \
             PRIMARY KEY (ArtistId)",
            "CREATE NULL_FILTERED INDEX SongsByName ON Songs (Name) STORING ()",
            "CREATE UNIQUE INDEX AlbumsByTitle ON Albums (Title DESC) STORING (Rating)",
            "ALTER TABLE Albums ADD COLUMN ReleaseYear INT64",
            "ALTER TABLE Artists ADD FOREIGN KEY (ArtistId) REFERENCES Artists (ArtistId)",
        ],
    )
    .unwrap()
}

#[test]
fn test_every_reference_resolves() {
    let mut env = TestEnv::new();
    let schema = rich_schema(&mut env);
    let graph = schema.graph();
    for (id, node) in graph.nodes() {
        for reference in node.references() {
            assert!(
                graph.contains(reference),
                "node {id} holds a dangling reference {reference}"
            );
        }
    }
}

#[test]
fn test_column_table_back_references() {
    let mut env = TestEnv::new();
    let schema = rich_schema(&mut env);
    for (id, node) in schema.graph().nodes() {
        if let SchemaNode::Table(t) = &**node {
            for &cid in &t.columns {
                assert_eq!(schema.column(cid).unwrap().table, id);
            }
        }
    }
}

#[test]
fn test_index_key_columns_prefix_data_table_key() {
    let mut env = TestEnv::new();
    let schema = rich_schema(&mut env);
    for &iid in schema.indexes() {
        let idx = schema.index(iid).unwrap();
        let data = schema.table(idx.index_data_table).unwrap();
        assert_eq!(data.owner_index, Some(iid));
        assert_eq!(idx.key_columns[..], data.primary_key[..idx.key_columns.len()]);
    }
}

#[test]
fn test_foreign_keys_listed_on_both_endpoints() {
    let mut env = TestEnv::new();
    let schema = rich_schema(&mut env);
    for (id, node) in schema.graph().nodes() {
        if let SchemaNode::ForeignKey(fk) = &**node {
            let referencing = schema.table(fk.referencing_table).unwrap();
            assert!(referencing.foreign_keys.contains(&id));
            let referenced = schema.table(fk.referenced_table).unwrap();
            assert!(referenced.referencing_foreign_keys.contains(&id));
        }
    }
}

#[test]
fn test_global_names_unique_case_insensitively() {
    let mut env = TestEnv::new();
    let schema = rich_schema(&mut env);
    let mut names: Vec<String> = Vec::new();
    for (_, node) in schema.graph().nodes() {
        if let Some(info) = node.schema_name_info() {
            if info.global {
                names.push(info.name.to_lowercase());
            }
        }
    }
    let total = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), total);
}

#[test]
fn test_canonicalization_is_idempotent() {
    let mut env = TestEnv::new();
    let schema = rich_schema(&mut env);

    let editor = GraphEditor::new(schema.graph().clone());
    assert!(!editor.has_modifications());
    let recanonicalized = editor.canonicalize().unwrap();

    let ids_before: Vec<_> = schema.graph().nodes().map(|(id, _)| id).collect();
    let ids_after: Vec<_> = recanonicalized.nodes().map(|(id, _)| id).collect();
    assert_eq!(ids_before, ids_after);
    assert_eq!(
        Schema::new(recanonicalized).unwrap().describe(),
        schema.describe()
    );
}

#[test]
fn test_apply_then_drop_round_trips() {
    let mut env = TestEnv::new();
    let base = rich_schema(&mut env);
    let before = base.describe();

    let schema = env
        .apply(
            base,
            &["CREATE TABLE Scratch (Id INT64 NOT NULL, V STRING(MAX)) PRIMARY KEY (Id)"],
        )
        .unwrap();
    assert_ne!(schema.describe(), before);

    let schema = env.apply(schema, &["DROP TABLE Scratch"]).unwrap();
    assert_eq!(schema.describe(), before);
}

#[test]
fn test_table_limit_enforced() {
    let mut env = TestEnv::new();
    let mut statements: Vec<String> = Vec::with_capacity(MAX_TABLES_PER_DATABASE + 1);
    for i in 0..=MAX_TABLES_PER_DATABASE {
        statements.push(format!(
            "CREATE TABLE T{i} (Id INT64 NOT NULL) PRIMARY KEY (Id)"
        ));
    }
    let statement_refs: Vec<&str> = statements.iter().map(|s| s.as_str()).collect();
    let err = env.validate(None, &statement_refs).unwrap_err();
    assert_eq!(
        err,
        SchemaError::TooManyTablesPerDatabase {
            table: format!("T{MAX_TABLES_PER_DATABASE}"),
            limit: MAX_TABLES_PER_DATABASE,
        }
    );
}

#[test]
fn test_intermediate_snapshots_are_chained() {
    let mut env = TestEnv::new();
    let first = env
        .apply(
            empty(),
            &["CREATE TABLE A (Id INT64 NOT NULL) PRIMARY KEY (Id)"],
        )
        .unwrap();
    let second = env
        .apply(
            first.clone(),
            &["CREATE TABLE B (Id INT64 NOT NULL) PRIMARY KEY (Id)"],
        )
        .unwrap();

    // Unchanged nodes are shared between snapshots, not copied.
    let a_id = first.find_table("A").unwrap();
    assert_eq!(second.find_table("A"), Some(a_id));
    assert!(Arc::ptr_eq(
        first.graph().node(a_id).unwrap(),
        second.graph().node(a_id).unwrap()
    ));
}
