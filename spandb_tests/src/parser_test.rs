use spandb_core::error::SchemaError;
use spandb_core::parser::command::{
    AlterTableOpDef, ColumnConstraintDef, DdlStatement, OnDeleteActionDef, TableConstraintDef,
};
use spandb_core::parser::parse;

#[test]
fn parse_create_table_basic() {
    let ddl = parse("CREATE TABLE T1 (C1 INT64 NOT NULL, C2 STRING(MAX)) PRIMARY KEY (C1)")
        .unwrap();
    let DdlStatement::CreateTable(def) = ddl else {
        panic!("expected CreateTable");
    };
    assert_eq!(def.table_name, "T1");
    assert_eq!(def.columns.len(), 2);
    assert_eq!(def.columns[0].name, "C1");
    assert_eq!(def.columns[0].column_type, "INT64");
    assert_eq!(
        def.columns[0].constraints,
        vec![ColumnConstraintDef::NotNull { nullable: false }]
    );
    assert_eq!(def.columns[1].column_type, "STRING");
    assert!(def.columns[1].constraints.is_empty());

    assert_eq!(def.constraints.len(), 1);
    let TableConstraintDef::PrimaryKey(parts) = &def.constraints[0] else {
        panic!("expected primary key constraint");
    };
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].column, "C1");
    assert!(!parts[0].descending);
}

#[test]
fn parse_create_table_length_becomes_constraint() {
    let ddl = parse("CREATE TABLE T (S STRING(42) NOT NULL) PRIMARY KEY (S)").unwrap();
    let DdlStatement::CreateTable(def) = ddl else {
        panic!("expected CreateTable");
    };
    assert_eq!(
        def.columns[0].constraints,
        vec![
            ColumnConstraintDef::ColumnLength { max_length: 42 },
            ColumnConstraintDef::NotNull { nullable: false },
        ]
    );
}

#[test]
fn parse_create_table_interleave_clause() {
    let ddl = parse(
        "CREATE TABLE C (Id INT64 NOT NULL) PRIMARY KEY (Id), \
         INTERLEAVE IN PARENT P ON DELETE CASCADE",
    )
    .unwrap();
    let DdlStatement::CreateTable(def) = ddl else {
        panic!("expected CreateTable");
    };
    let TableConstraintDef::Interleave(interleave) = def.constraints.last().unwrap() else {
        panic!("expected interleave constraint");
    };
    assert_eq!(interleave.parent, "P");
    assert_eq!(interleave.on_delete, OnDeleteActionDef::Cascade);
}

#[test]
fn parse_create_table_foreign_keys_in_declaration_order() {
    let ddl = parse(
        "CREATE TABLE B (Id INT64 NOT NULL, X INT64, Y INT64, \
         FOREIGN KEY (X) REFERENCES A (Id), \
         CONSTRAINT FkY FOREIGN KEY (Y) REFERENCES A (Id)) PRIMARY KEY (Id)",
    )
    .unwrap();
    let DdlStatement::CreateTable(def) = ddl else {
        panic!("expected CreateTable");
    };
    let fks: Vec<_> = def
        .constraints
        .iter()
        .filter_map(|c| match c {
            TableConstraintDef::ForeignKey(fk) => Some(fk),
            _ => None,
        })
        .collect();
    assert_eq!(fks.len(), 2);
    assert_eq!(fks[0].constraint_name, None);
    assert_eq!(fks[0].referencing_columns, vec!["X"]);
    assert_eq!(fks[1].constraint_name.as_deref(), Some("FkY"));
    assert_eq!(fks[1].referenced_table, "A");
}

#[test]
fn parse_create_table_options_clause() {
    let ddl = parse(
        "CREATE TABLE T (Id INT64 NOT NULL, \
         Ts TIMESTAMP OPTIONS (allow_commit_timestamp = null)) PRIMARY KEY (Id)",
    )
    .unwrap();
    let DdlStatement::CreateTable(def) = ddl else {
        panic!("expected CreateTable");
    };
    let options = def.columns[1].options.as_ref().unwrap();
    assert_eq!(options.allow_commit_timestamp, None);
}

#[test]
fn parse_create_table_array_type() {
    let ddl = parse("CREATE TABLE T (Id INT64 NOT NULL, Tags ARRAY<STRING(MAX)>) PRIMARY KEY (Id)")
        .unwrap();
    let DdlStatement::CreateTable(def) = ddl else {
        panic!("expected CreateTable");
    };
    assert_eq!(def.columns[1].column_type, "ARRAY<STRING>");
}

#[test]
fn parse_create_index_synthesizes_interleave() {
    let ddl = parse("CREATE UNIQUE NULL_FILTERED INDEX Idx ON T (A, B DESC) STORING (C)").unwrap();
    let DdlStatement::CreateIndex(def) = ddl else {
        panic!("expected CreateIndex");
    };
    assert_eq!(def.index_name, "Idx");
    assert_eq!(def.table_name, "T");
    assert!(def.unique);
    assert!(def.null_filtered);
    assert_eq!(def.stored_columns, vec!["C"]);

    let TableConstraintDef::PrimaryKey(parts) = &def.constraints[0] else {
        panic!("expected key parts");
    };
    assert_eq!(parts.len(), 2);
    assert!(parts[1].descending);
    // The data table interleave defaults to the indexed table.
    let TableConstraintDef::Interleave(interleave) = &def.constraints[1] else {
        panic!("expected interleave constraint");
    };
    assert_eq!(interleave.parent, "T");
    assert_eq!(interleave.on_delete, OnDeleteActionDef::Cascade);
}

#[test]
fn parse_create_index_explicit_interleave() {
    let ddl = parse("CREATE INDEX Idx ON C (V), INTERLEAVE IN P").unwrap();
    let DdlStatement::CreateIndex(def) = ddl else {
        panic!("expected CreateIndex");
    };
    let TableConstraintDef::Interleave(interleave) = &def.constraints[1] else {
        panic!("expected interleave constraint");
    };
    assert_eq!(interleave.parent, "P");
}

#[test]
fn parse_alter_table_variants() {
    let ddl = parse("ALTER TABLE T ADD COLUMN C BYTES(10)").unwrap();
    let DdlStatement::AlterTable(def) = ddl else {
        panic!("expected AlterTable");
    };
    assert_eq!(def.table_name, "T");
    assert!(matches!(def.op, AlterTableOpDef::AddColumn(_)));

    let ddl = parse("ALTER TABLE T ALTER COLUMN C STRING(MAX) NOT NULL").unwrap();
    let DdlStatement::AlterTable(def) = ddl else {
        panic!("expected AlterTable");
    };
    let AlterTableOpDef::AlterColumn {
        column_name,
        definition,
    } = &def.op
    else {
        panic!("expected AlterColumn");
    };
    assert_eq!(column_name, "C");
    assert_eq!(definition.column_type, "STRING");

    let ddl = parse("ALTER TABLE T DROP COLUMN C").unwrap();
    let DdlStatement::AlterTable(def) = ddl else {
        panic!("expected AlterTable");
    };
    assert!(matches!(
        def.op,
        AlterTableOpDef::DropColumn { ref column_name } if column_name == "C"
    ));

    let ddl = parse("ALTER TABLE T ADD CONSTRAINT Fk FOREIGN KEY (A) REFERENCES U (B)").unwrap();
    let DdlStatement::AlterTable(def) = ddl else {
        panic!("expected AlterTable");
    };
    let AlterTableOpDef::AddForeignKey(fk) = &def.op else {
        panic!("expected AddForeignKey");
    };
    assert_eq!(fk.constraint_name.as_deref(), Some("Fk"));

    let ddl = parse("ALTER TABLE T DROP CONSTRAINT Fk").unwrap();
    let DdlStatement::AlterTable(def) = ddl else {
        panic!("expected AlterTable");
    };
    assert!(matches!(def.op, AlterTableOpDef::DropConstraint { .. }));

    let ddl = parse("ALTER TABLE T SET ON DELETE NO ACTION").unwrap();
    let DdlStatement::AlterTable(def) = ddl else {
        panic!("expected AlterTable");
    };
    assert_eq!(
        def.op,
        AlterTableOpDef::SetOnDelete(OnDeleteActionDef::NoAction)
    );
}

#[test]
fn parse_drop_statements() {
    assert_eq!(
        parse("DROP TABLE T").unwrap(),
        DdlStatement::DropTable {
            table_name: "T".to_string()
        }
    );
    assert_eq!(
        parse("drop index Idx").unwrap(),
        DdlStatement::DropIndex {
            index_name: "Idx".to_string()
        }
    );
}

#[test]
fn parse_keywords_are_case_insensitive() {
    let ddl = parse("create table t (c int64 not null) primary key (c)").unwrap();
    let DdlStatement::CreateTable(def) = ddl else {
        panic!("expected CreateTable");
    };
    assert_eq!(def.table_name, "t");
}

#[test]
fn parse_empty_statement() {
    assert_eq!(parse("").unwrap_err(), SchemaError::EmptyDdlStatement);
    assert_eq!(parse("   ").unwrap_err(), SchemaError::EmptyDdlStatement);
}

#[test]
fn parse_unknown_statement() {
    let err = parse("SELECT 1").unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDdl(msg) if msg.contains("Unknown DDL statement")));
}

#[test]
fn parse_unexpected_character() {
    let err = parse("CREATE TABLE T; DROP TABLE T").unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDdl(msg) if msg.contains("Unexpected character")));
}

#[test]
fn parse_table_without_primary_key_clause() {
    let err = parse("CREATE TABLE T (C1 INT64 NOT NULL)").unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDdl(msg) if msg.contains("Usage:")));
}

#[test]
fn parse_table_without_columns() {
    let err = parse("CREATE TABLE T () PRIMARY KEY ()").unwrap_err();
    assert!(
        matches!(err, SchemaError::InvalidDdl(msg) if msg.contains("at least one column"))
    );
}

#[test]
fn parse_trailing_tokens_rejected() {
    let err = parse("DROP TABLE T extra").unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDdl(_)));
}

#[test]
fn parse_bad_on_delete_action() {
    let err =
        parse("CREATE TABLE C (Id INT64 NOT NULL) PRIMARY KEY (Id), INTERLEAVE IN PARENT P ON DELETE MAYBE")
            .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDdl(msg) if msg.contains("CASCADE or NO ACTION")));
}
