use super::*;

use spandb_core::schema::OnDeleteAction;
use spandb_core::types::datatype::DataType;

fn base_schema(env: &mut TestEnv) -> Arc<Schema> {
    env.apply(
        empty(),
        &["CREATE TABLE T1 (C1 INT64 NOT NULL, C2 STRING(MAX)) PRIMARY KEY (C1)"],
    )
    .unwrap()
}

#[test]
fn test_add_column() {
    let mut env = TestEnv::new();
    let before = base_schema(&mut env);
    let after = env
        .apply(
            before.clone(),
            &["ALTER TABLE T1 ADD COLUMN C3 BYTES(10)"],
        )
        .unwrap();

    let c3 = column(&after, "T1", "C3");
    assert_eq!(c3.dtype, DataType::Bytes);
    assert_eq!(c3.declared_max_length, Some(10));
    assert!(c3.nullable);
    assert_eq!(c3.table, after.find_table("T1").unwrap());
    assert_eq!(table(&after, "T1").columns.len(), 3);

    // The old snapshot is untouched.
    assert_eq!(table(&before, "T1").columns.len(), 2);
}

#[test]
fn test_alter_column_sets_not_null() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env
        .apply(schema, &["ALTER TABLE T1 ALTER COLUMN C2 STRING(MAX) NOT NULL"])
        .unwrap();
    assert!(!column(&schema, "T1", "C2").nullable);
}

#[test]
fn test_alter_column_drops_unstated_not_null() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env
        .apply(schema, &["ALTER TABLE T1 ALTER COLUMN C1 INT64"])
        .unwrap();
    // Defaults are reset before sub-constraints apply.
    assert!(column(&schema, "T1", "C1").nullable);
}

#[test]
fn test_alter_column_missing() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let err = env
        .apply(schema, &["ALTER TABLE T1 ALTER COLUMN Nope INT64"])
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::ColumnNotFound {
            table: "T1".to_string(),
            column: "Nope".to_string(),
        }
    );
}

#[test]
fn test_alter_missing_table() {
    let mut env = TestEnv::new();
    let err = env
        .apply(empty(), &["ALTER TABLE Nope ADD COLUMN C INT64"])
        .unwrap_err();
    assert_eq!(err, SchemaError::TableNotFound("Nope".to_string()));
}

#[test]
fn test_drop_column() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env
        .apply(schema, &["ALTER TABLE T1 DROP COLUMN C2"])
        .unwrap();
    let t1 = table(&schema, "T1");
    assert_eq!(t1.columns.len(), 1);
    assert!(schema.find_column(schema.find_table("T1").unwrap(), "C2").is_none());
}

#[test]
fn test_drop_key_column_rejected() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let err = env
        .apply(schema, &["ALTER TABLE T1 DROP COLUMN C1"])
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::CannotDropKeyColumn {
            column: "C1".to_string(),
            table: "T1".to_string(),
        }
    );
}

#[test]
fn test_drop_indexed_column_rejected() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env.apply(schema, &["CREATE INDEX Idx ON T1 (C2)"]).unwrap();
    let err = env
        .apply(schema, &["ALTER TABLE T1 DROP COLUMN C2"])
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::CannotDropReferencedColumn {
            column: "C2".to_string(),
            referrer: "index 'Idx'".to_string(),
        }
    );
}

#[test]
fn test_drop_foreign_key_column_rejected() {
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
    let err = env
        .apply(schema, &["ALTER TABLE B DROP COLUMN Aid"])
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::CannotDropReferencedColumn {
            column: "Aid".to_string(),
            referrer: "foreign key 'FK_B_A_1'".to_string(),
        }
    );
}

#[test]
fn test_add_foreign_key_with_constraint_name() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE A (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE B (Id INT64 NOT NULL, Aid INT64) PRIMARY KEY (Id)",
            ],
        )
        .unwrap();
    let schema = env
        .apply(
            schema,
            &["ALTER TABLE B ADD CONSTRAINT FkBA FOREIGN KEY (Aid) REFERENCES A (Id)"],
        )
        .unwrap();

    let b = table(&schema, "B");
    let a = table(&schema, "A");
    assert_eq!(b.foreign_keys.len(), 1);
    assert_eq!(a.referencing_foreign_keys, b.foreign_keys);
    let fk = schema.foreign_key(b.foreign_keys[0]).unwrap();
    assert_eq!(fk.constraint_name.as_deref(), Some("FkBA"));

    // The constraint name occupies the shared global namespace.
    let err = env
        .apply(schema, &["CREATE TABLE FkBA (Id INT64 NOT NULL) PRIMARY KEY (Id)"])
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateName { .. }));
}

#[test]
fn test_add_self_referencing_foreign_key() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &["CREATE TABLE A (Id INT64 NOT NULL, Pid INT64) PRIMARY KEY (Id)"],
        )
        .unwrap();
    let schema = env
        .apply(schema, &["ALTER TABLE A ADD FOREIGN KEY (Pid) REFERENCES A (Id)"])
        .unwrap();

    let a = table(&schema, "A");
    assert_eq!(a.foreign_keys.len(), 1);
    assert_eq!(a.referencing_foreign_keys, a.foreign_keys);
    let fk = schema.foreign_key(a.foreign_keys[0]).unwrap();
    assert_eq!(fk.referencing_table, fk.referenced_table);
    assert_eq!(fk.generated_name.as_deref(), Some("FK_A_A_1"));
}

#[test]
fn test_drop_constraint() {
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
    let schema = env
        .apply(schema, &["ALTER TABLE B DROP CONSTRAINT FK_B_A_1"])
        .unwrap();

    assert!(table(&schema, "B").foreign_keys.is_empty());
    assert!(table(&schema, "A").referencing_foreign_keys.is_empty());
}

#[test]
fn test_drop_missing_constraint() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let err = env
        .apply(schema, &["ALTER TABLE T1 DROP CONSTRAINT Nope"])
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::ConstraintNotFound {
            constraint: "Nope".to_string(),
            table: "T1".to_string(),
        }
    );
}

#[test]
fn test_set_on_delete() {
    let mut env = TestEnv::new();
    let schema = env
        .apply(
            empty(),
            &[
                "CREATE TABLE P (Id INT64 NOT NULL) PRIMARY KEY (Id)",
                "CREATE TABLE C (Id INT64 NOT NULL) PRIMARY KEY (Id), \
                 INTERLEAVE IN PARENT P ON DELETE CASCADE",
            ],
        )
        .unwrap();
    let schema = env
        .apply(schema, &["ALTER TABLE C SET ON DELETE NO ACTION"])
        .unwrap();
    assert_eq!(table(&schema, "C").on_delete, OnDeleteAction::NoAction);
}

#[test]
fn test_table_lookup_is_case_insensitive() {
    let mut env = TestEnv::new();
    let schema = base_schema(&mut env);
    let schema = env
        .apply(schema, &["ALTER TABLE t1 ADD COLUMN C3 BOOL"])
        .unwrap();
    assert_eq!(column(&schema, "T1", "C3").dtype, DataType::Bool);
}
