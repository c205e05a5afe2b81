use super::*;

#[test]
fn test_drop_table() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &["CREATE TABLE T (Id INT64 NOT NULL) PRIMARY KEY (Id)"],
        )
        .unwrap();
    let schema = env.apply(schema, &["DROP TABLE T"]).unwrap();
    assert!(schema.find_table("T").is_none());
    assert_eq!(schema.num_nodes(), 0);
}

#[test]
fn test_drop_missing_table() {
    let mut env = TestEnv::new();
    let err = env.apply(empty(), &["DROP TABLE Nope"]).unwrap_err();
    assert_eq!(err, SchemaError::TableNotFound("Nope".to_string()));
}

#[test]
fn test_drop_table_with_index_rejected() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE T (Id INT64 NOT NULL, V INT64) PRIMARY KEY (Id)",
                "CREATE INDEX Idx ON T (V)",
            ],
        )
        .unwrap();
    let err = env.apply(schema, &["DROP TABLE T"]).unwrap_err();
    assert_eq!(
        err,
        SchemaError::CannotDropReferencedTable {
            table: "T".to_string(),
            referrer: "index 'Idx'".to_string(),
        }
    );
}

#[test]
fn test_drop_interleave_parent_rejected() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE P (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE C (Id INT64 NOT NULL) PRIMARY KEY (Id), INTERLEAVE IN PARENT P",
            ],
        )
        .unwrap();
    let err = env.apply(schema, &["DROP TABLE P"]).unwrap_err();
    assert_eq!(
        err,
        SchemaError::CannotDropReferencedTable {
            table: "P".to_string(),
            referrer: "interleaved table 'C'".to_string(),
        }
    );
}

#[test]
fn test_drop_referenced_table_rejected() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE A (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE B (Id INT64 NOT NULL, Aid INT64, \
                 FOREIGN KEY (Aid) REFERENCES A (Id)) PRIMARY KEY (Id)",
            ],
        )
        .unwrap();
    let err = env.apply(schema, &["DROP TABLE A"]).unwrap_err();
    assert_eq!(
        err,
        SchemaError::CannotDropReferencedTable {
            table: "A".to_string(),
            referrer: "foreign key 'FK_B_A_1'".to_string(),
        }
    );
}

#[test]
fn test_drop_referencing_table_detaches_foreign_key() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE A (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE B (Id INT64 NOT NULL, Aid INT64, \
                 FOREIGN KEY (Aid) REFERENCES A (Id)) PRIMARY KEY (Id)",
            ],
        )
        .unwrap();
    // Dropping the referencing table drops its constraint with it.
    let schema = env.apply(schema, &["DROP TABLE B"]).unwrap();
    assert!(schema.find_table("B").is_none());
    assert!(table(&schema, "A").referencing_foreign_keys.is_empty());
}

#[test]
fn test_drop_table_with_self_referencing_foreign_key() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE A (Id INT64 NOT NULL, Pid INT64, \
                 FOREIGN KEY (Pid) REFERENCES A (Id)) PRIMARY KEY (Id)",
            ],
        )
        .unwrap();
    let schema = env.apply(schema, &["DROP TABLE A"]).unwrap();
    assert_eq!(schema.num_nodes(), 0);
}

#[test]
fn test_drop_index_removes_data_table() {
    let mut env = TestEnv::new();
    let base = env
        .apply(
            empty(),
            &["CREATE TABLE T (Id INT64 NOT NULL, V INT64) PRIMARY KEY (Id)"],
        )
        .unwrap();
    let with_index = env.apply(base.clone(), &["CREATE INDEX Idx ON T (V)"]).unwrap();
    let schema = env.apply(with_index, &["DROP INDEX Idx"]).unwrap();

    assert!(schema.find_index("Idx").is_none());
    assert_eq!(schema.num_nodes(), base.num_nodes());
    let t = table(&schema, "T");
    assert!(t.indexes.is_empty());
    assert!(t.children.is_empty());
}

#[test]
fn test_drop_missing_index() {
    let mut env = TestEnv::new();
    let err = env.apply(empty(), &["DROP INDEX Nope"]).unwrap_err();
    assert_eq!(err, SchemaError::IndexNotFound("Nope".to_string()));
}

#[test]
fn test_recreate_dropped_name_in_one_batch_is_rejected() {
    // The name registry spans the whole batch; a dropped name stays
    // occupied until the next update.
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &[
                "CREATE TABLE T (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "DROP TABLE T",
                "CREATE TABLE T (Id INT64 NOT NULL) PRIMARY KEY (Id)",
            ],
        )
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateName { .. }));
}

#[test]
fn test_recreate_dropped_name_across_batches() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE T (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "DROP TABLE T",
            ],
        )
        .unwrap();
    let schema = env
        .apply(schema, &["CREATE TABLE T (Id INT64 NOT NULL) PRIMARY KEY (Id)"])
        .unwrap();
    assert!(schema.find_table("T").is_some());
}
