use super::*;

use spandb_core::types::datatype::DataType;

#[test]
fn test_create_table_basic() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &["CREATE TABLE T1 (C1 INT64 NOT NULL, C2 STRING(MAX)) PRIMARY KEY (C1)"],
        )
        .unwrap();

    let t1 = table(&schema, "T1");
    assert_eq!(t1.name, "T1");
    assert_eq!(t1.columns.len(), 2);
    assert!(t1.parent.is_none());
    assert!(t1.foreign_keys.is_empty());
    assert!(t1.owner_index.is_none());

    let c1 = column(&schema, "T1", "C1");
    assert_eq!(c1.dtype, DataType::Int64);
    assert!(!c1.nullable);

    let c2 = column(&schema, "T1", "C2");
    assert_eq!(c2.dtype, DataType::String);
    assert!(c2.nullable);
    assert_eq!(c2.declared_max_length, None);

    assert_eq!(pk_names(&schema, t1), vec!["C1"]);
}

#[test]
fn test_create_table_declared_length_and_desc_key() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &["CREATE TABLE T (Id INT64 NOT NULL, Name STRING(50)) PRIMARY KEY (Id DESC)"],
        )
        .unwrap();

    assert_eq!(column(&schema, "T", "Name").declared_max_length, Some(50));
    assert_eq!(pk_names(&schema, table(&schema, "T")), vec!["Id DESC"]);
}

#[test]
fn test_create_table_commit_timestamp_option() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &["CREATE TABLE T (Id INT64 NOT NULL, Ts TIMESTAMP OPTIONS (allow_commit_timestamp = true)) PRIMARY KEY (Id)"],
        )
        .unwrap();

    assert_eq!(column(&schema, "T", "Ts").allow_commit_timestamp, Some(true));
    assert_eq!(column(&schema, "T", "Id").allow_commit_timestamp, None);
}

#[test]
fn test_create_table_interleave() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE T1 (C1 INT64 NOT NULL, C2 STRING(MAX)) PRIMARY KEY (C1)",
                "CREATE TABLE T2 (C1 INT64 NOT NULL, C3 INT64) PRIMARY KEY (C1), \
                 INTERLEAVE IN PARENT T1 ON DELETE CASCADE",
            ],
        )
        .unwrap();

    let t1 = table(&schema, "T1");
    let t2 = table(&schema, "T2");
    let t2_id = schema.find_table("T2").unwrap();
    assert_eq!(t2.parent, Some(schema.find_table("T1").unwrap()));
    assert_eq!(t1.children, vec![t2_id]);
    assert_eq!(t2.on_delete, spandb_core::schema::OnDeleteAction::Cascade);
}

#[test]
fn test_create_table_interleave_defaults_to_no_action() {
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

    assert_eq!(
        table(&schema, "C").on_delete,
        spandb_core::schema::OnDeleteAction::NoAction
    );
}

#[test]
fn test_create_table_unknown_parent_fails() {
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &["CREATE TABLE X (Id INT64 NOT NULL) PRIMARY KEY (Id), INTERLEAVE IN PARENT Ghost"],
        )
        .unwrap_err();
    assert_eq!(err, SchemaError::TableNotFound("Ghost".to_string()));
}

#[test]
fn test_failed_statement_installs_nothing() {
    let mut env = TestEnv::new();
    let result = env.update(
        empty(),
        &[
            "CREATE TABLE Ok1 (Id INT64 NOT NULL) PRIMARY KEY (Id)",
            "CREATE TABLE X (Id INT64 NOT NULL) PRIMARY KEY (Id), INTERLEAVE IN PARENT Ghost",
        ],
    );
    // Structural failures abort the whole batch.
    assert!(result.is_err());
}

#[test]
fn test_create_table_duplicate_name() {
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &[
                "CREATE TABLE Dup (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE dup (Id INT64 NOT NULL) PRIMARY KEY (Id)",
            ],
        )
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::DuplicateName {
            kind: "Table".to_string(),
            name: "dup".to_string(),
        }
    );
}

#[test]
fn test_index_name_clashes_with_table_name() {
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &[
                "CREATE TABLE Dup (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE INDEX Dup ON Dup (Id)",
            ],
        )
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::DuplicateName {
            kind: "Index".to_string(),
            name: "Dup".to_string(),
        }
    );
}

#[test]
fn test_nonexistent_key_column() {
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &["CREATE TABLE T (C1 INT64 NOT NULL) PRIMARY KEY (Missing)"],
        )
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::NonExistentKeyColumn {
            object_kind: "Table",
            object_name: "T".to_string(),
            column: "Missing".to_string(),
        }
    );
}

#[test]
fn test_key_column_lookup_is_case_sensitive() {
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &["CREATE TABLE T (C1 INT64 NOT NULL) PRIMARY KEY (c1)"],
        )
        .unwrap_err();
    assert!(matches!(err, SchemaError::NonExistentKeyColumn { .. }));
}

#[test]
fn test_duplicate_column_names_rejected() {
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &["CREATE TABLE T (C1 INT64 NOT NULL, c1 STRING(MAX)) PRIMARY KEY (C1)"],
        )
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateName { kind, .. } if kind == "Column"));
}

#[test]
fn test_invalid_table_name_rejected() {
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &["CREATE TABLE _hidden (Id INT64 NOT NULL) PRIMARY KEY (Id)"],
        )
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidSchemaName { .. }));
}

#[test]
fn test_empty_statement_fails() {
    let mut env = TestEnv::new();
    let err = env.apply(empty(), &["   "]).unwrap_err();
    assert_eq!(err, SchemaError::EmptyDdlStatement);
}

#[test]
fn test_empty_batch_yields_no_snapshot() {
    let mut env = TestEnv::new();
    let result = env.update(empty(), &[]).unwrap();
    assert_eq!(result.num_successful_statements, 0);
    assert!(result.updated_schema.is_none());
    assert!(result.backfill_status.is_ok());

    let validated = env.validate(None, &[]).unwrap();
    assert!(validated.is_none());
}

#[test]
fn test_create_foreign_key_cross_reference() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE A (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE B (Id INT64 NOT NULL, Aid INT64 NOT NULL, \
                 FOREIGN KEY (Aid) REFERENCES A (Id)) PRIMARY KEY (Id)",
            ],
        )
        .unwrap();

    let a = table(&schema, "A");
    let b = table(&schema, "B");
    assert_eq!(b.foreign_keys.len(), 1);
    assert_eq!(a.referencing_foreign_keys, b.foreign_keys);

    let fk = schema.foreign_key(b.foreign_keys[0]).unwrap();
    assert!(fk.constraint_name.is_none());
    assert_eq!(fk.generated_name.as_deref(), Some("FK_B_A_1"));
    assert_eq!(fk.referencing_table, schema.find_table("B").unwrap());
    assert_eq!(fk.referenced_table, schema.find_table("A").unwrap());
    assert_eq!(fk.referencing_columns.len(), 1);
    assert_eq!(
        schema.column(fk.referencing_columns[0]).unwrap().name,
        "Aid"
    );
    assert_eq!(schema.column(fk.referenced_columns[0]).unwrap().name, "Id");
}

#[test]
fn test_create_self_referencing_foreign_key() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE Emp (Id INT64 NOT NULL, Boss INT64, \
                 FOREIGN KEY (Boss) REFERENCES Emp (Id)) PRIMARY KEY (Id)",
            ],
        )
        .unwrap();

    let emp = table(&schema, "Emp");
    assert_eq!(emp.foreign_keys.len(), 1);
    assert_eq!(emp.referencing_foreign_keys, emp.foreign_keys);
    let fk = schema.foreign_key(emp.foreign_keys[0]).unwrap();
    assert_eq!(fk.referencing_table, fk.referenced_table);
}

#[test]
fn test_named_foreign_key_occupies_global_namespace() {
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &[
                "CREATE TABLE A (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE B (Id INT64 NOT NULL, Aid INT64, \
                 CONSTRAINT A FOREIGN KEY (Aid) REFERENCES A (Id)) PRIMARY KEY (Id)",
            ],
        )
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::DuplicateName {
            kind: "Foreign Key".to_string(),
            name: "A".to_string(),
        }
    );
}

#[test]
fn test_foreign_key_unknown_referenced_table() {
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &[
                "CREATE TABLE B (Id INT64 NOT NULL, Aid INT64, \
                 FOREIGN KEY (Aid) REFERENCES Nope (Id)) PRIMARY KEY (Id)",
            ],
        )
        .unwrap_err();
    assert_eq!(err, SchemaError::TableNotFound("Nope".to_string()));
}

#[test]
fn test_foreign_key_unknown_column() {
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &[
                "CREATE TABLE A (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE B (Id INT64 NOT NULL, \
                 FOREIGN KEY (Nope) REFERENCES A (Id)) PRIMARY KEY (Id)",
            ],
        )
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::ForeignKeyColumnNotFound {
            column: "Nope".to_string(),
            table: "B".to_string(),
            foreign_key: "FK_B_A_1".to_string(),
        }
    );
}

#[test]
fn test_foreign_key_arity_mismatch_rejected() {
    let mut env = TestEnv::new();
    let err = env
        .apply(
            empty(),
            &[
                "CREATE TABLE A (Id INT64 NOT NULL, X INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE B (Id INT64 NOT NULL, Aid INT64, Bx INT64, \
                 FOREIGN KEY (Aid, Bx) REFERENCES A (Id)) PRIMARY KEY (Id)",
            ],
        )
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::InvalidDdl(
            "FOREIGN KEY column count must match referenced column count".to_string()
        )
    );
}

#[test]
fn test_generated_foreign_key_names_stay_unique() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE A (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE B (Id INT64 NOT NULL, X INT64, Y INT64, \
                 FOREIGN KEY (X) REFERENCES A (Id), \
                 FOREIGN KEY (Y) REFERENCES A (Id)) PRIMARY KEY (Id)",
            ],
        )
        .unwrap();

    let b = table(&schema, "B");
    let names: Vec<&str> = b
        .foreign_keys
        .iter()
        .map(|&id| schema.foreign_key(id).unwrap().name())
        .collect();
    assert_eq!(names, vec!["FK_B_A_1", "FK_B_A_2"]);
}

#[test]
fn test_validate_does_not_run_deferred_actions() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &["CREATE TABLE T (Id INT64 NOT NULL, V STRING(MAX)) PRIMARY KEY (Id)"],
        )
        .unwrap();

    let validated = env
        .validate(Some(schema), &["CREATE INDEX Idx ON T (V)"])
        .unwrap()
        .unwrap();
    assert!(validated.find_index("Idx").is_some());
    // No backfill ran, so no data table storage was materialized.
    assert!(env.storage.table_names().is_empty());
}
