use super::common::{
    bad, expect_kw, expect_tok, ident, is_kw, parse_column_def, parse_column_name_list,
    parse_foreign_key, parse_key_part_list, parse_on_delete_action, tok,
};
use crate::error::SchemaResult;
use crate::parser::command::{
    CreateIndexDef, CreateTableDef, DdlStatement, InterleaveDef, OnDeleteActionDef,
    TableConstraintDef,
};

pub(super) fn parse_create(tokens: &[String]) -> SchemaResult<DdlStatement> {
    match tok(tokens, 1) {
        Some(t) if is_kw(t, "table") => parse_create_table(tokens),
        Some(t) if is_kw(t, "index") || is_kw(t, "unique") || is_kw(t, "null_filtered") => {
            parse_create_index(tokens)
        }
        _ => Err(bad("Usage: CREATE TABLE ... or CREATE INDEX ...")),
    }
}

// CREATE TABLE <name> (<column defs and foreign keys>)
//   PRIMARY KEY (<key parts>)
//   [, INTERLEAVE IN PARENT <parent> [ON DELETE CASCADE|NO ACTION]]
fn parse_create_table(tokens: &[String]) -> SchemaResult<DdlStatement> {
    let usage = "Usage: CREATE TABLE <name> (<column defs>) PRIMARY KEY (<key parts>) \
                 [, INTERLEAVE IN PARENT <parent> [ON DELETE CASCADE|NO ACTION]]";
    let (table_name, i) = ident(tokens, 2, "table name")?;
    let mut i = expect_tok(tokens, i, "(", usage)?;

    let mut columns = Vec::new();
    let mut foreign_keys = Vec::new();
    if tok(tokens, i) == Some(")") {
        return Err(bad("CREATE TABLE requires at least one column"));
    }
    loop {
        match tok(tokens, i) {
            Some(t) if is_kw(t, "constraint") => {
                let (name, next) = ident(tokens, i + 1, "constraint name")?;
                let (fk, next) = parse_foreign_key(tokens, next, Some(name))?;
                foreign_keys.push(fk);
                i = next;
            }
            Some(t) if is_kw(t, "foreign") => {
                let (fk, next) = parse_foreign_key(tokens, i, None)?;
                foreign_keys.push(fk);
                i = next;
            }
            _ => {
                let (col, next) = parse_column_def(tokens, i)?;
                columns.push(col);
                i = next;
            }
        }
        match tok(tokens, i) {
            Some(",") => i += 1,
            Some(")") => {
                i += 1;
                break;
            }
            _ => return Err(bad("Column definitions must be comma-separated")),
        }
    }
    if columns.is_empty() {
        return Err(bad("CREATE TABLE requires at least one column"));
    }

    i = expect_kw(tokens, i, "primary", usage)?;
    i = expect_kw(tokens, i, "key", usage)?;
    let (key_parts, mut i) = parse_key_part_list(tokens, i)?;

    let mut constraints: Vec<TableConstraintDef> =
        foreign_keys.into_iter().map(TableConstraintDef::ForeignKey).collect();
    constraints.push(TableConstraintDef::PrimaryKey(key_parts));

    if tok(tokens, i) == Some(",") {
        i = expect_kw(tokens, i + 1, "interleave", usage)?;
        i = expect_kw(tokens, i, "in", usage)?;
        i = expect_kw(tokens, i, "parent", usage)?;
        let (parent, next) = ident(tokens, i, "parent table name")?;
        i = next;
        let mut on_delete = OnDeleteActionDef::NoAction;
        if let Some(t) = tok(tokens, i) {
            if is_kw(t, "on") {
                i = expect_kw(tokens, i + 1, "delete", usage)?;
                let (action, next) = parse_on_delete_action(tokens, i)?;
                on_delete = action;
                i = next;
            }
        }
        constraints.push(TableConstraintDef::Interleave(InterleaveDef {
            parent,
            on_delete,
        }));
    }

    if i != tokens.len() {
        return Err(bad(usage));
    }

    Ok(DdlStatement::CreateTable(CreateTableDef {
        table_name,
        columns,
        constraints,
    }))
}

// CREATE [UNIQUE] [NULL_FILTERED] INDEX <name> ON <table> (<key parts>)
//   [STORING (<cols>)] [, INTERLEAVE IN <parent>]
fn parse_create_index(tokens: &[String]) -> SchemaResult<DdlStatement> {
    let usage = "Usage: CREATE [UNIQUE] [NULL_FILTERED] INDEX <name> ON <table> (<key parts>) \
                 [STORING (<cols>)] [, INTERLEAVE IN <parent>]";
    let mut unique = false;
    let mut null_filtered = false;
    let mut i = 1usize;
    loop {
        match tok(tokens, i) {
            Some(t) if is_kw(t, "unique") => {
                unique = true;
                i += 1;
            }
            Some(t) if is_kw(t, "null_filtered") => {
                null_filtered = true;
                i += 1;
            }
            _ => break,
        }
    }
    i = expect_kw(tokens, i, "index", usage)?;
    let (index_name, i) = ident(tokens, i, "index name")?;
    let i = expect_kw(tokens, i, "on", usage)?;
    let (table_name, i) = ident(tokens, i, "table name")?;
    let (key_parts, mut i) = parse_key_part_list(tokens, i)?;

    let mut stored_columns = Vec::new();
    if let Some(t) = tok(tokens, i) {
        if is_kw(t, "storing") {
            let (cols, next) = parse_column_name_list(tokens, i + 1)?;
            stored_columns = cols;
            i = next;
        }
    }

    // The data table is always interleaved; default to the indexed table.
    let mut parent = table_name.clone();
    if tok(tokens, i) == Some(",") {
        i = expect_kw(tokens, i + 1, "interleave", usage)?;
        i = expect_kw(tokens, i, "in", usage)?;
        let (declared, next) = ident(tokens, i, "parent table name")?;
        parent = declared;
        i = next;
    }

    if i != tokens.len() {
        return Err(bad(usage));
    }

    Ok(DdlStatement::CreateIndex(CreateIndexDef {
        index_name,
        table_name,
        unique,
        null_filtered,
        constraints: vec![
            TableConstraintDef::PrimaryKey(key_parts),
            TableConstraintDef::Interleave(InterleaveDef {
                parent,
                on_delete: OnDeleteActionDef::Cascade,
            }),
        ],
        stored_columns,
    }))
}
