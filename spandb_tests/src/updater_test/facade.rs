use spandb_core::error::SchemaError;
use spandb_core::Database;

#[test]
fn test_execute_applies_semicolon_separated_batch() {
    let mut db = Database::new();
    let out = db
        .execute(
            "CREATE TABLE T1 (C1 INT64 NOT NULL, C2 STRING(MAX)) PRIMARY KEY (C1); \
             CREATE INDEX Idx ON T1 (C2)",
        )
        .unwrap();
    assert_eq!(out, "applied 2 statement(s)");
    assert!(db.schema().find_table("T1").is_some());
    assert!(db.schema().find_index("Idx").is_some());
}

#[test]
fn test_execute_failure_keeps_previous_schema() {
    let mut db = Database::new();
    db.execute("CREATE TABLE T (Id INT64 NOT NULL) PRIMARY KEY (Id)")
        .unwrap();
    let err = db.execute("DROP TABLE Nope").unwrap_err();
    assert_eq!(err, SchemaError::TableNotFound("Nope".to_string()));
    assert!(db.schema().find_table("T").is_some());
}

#[test]
fn test_describe_reflects_current_snapshot() {
    let mut db = Database::new();
    assert_eq!(db.describe(), "");
    db.execute("CREATE TABLE T (Id INT64 NOT NULL) PRIMARY KEY (Id)")
        .unwrap();
    let description = db.describe();
    assert!(description.contains("table T"));
    assert!(description.contains("column Id INT64 NOT NULL"));
    assert!(description.contains("primary key (Id)"));
}
