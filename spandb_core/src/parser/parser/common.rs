use crate::error::{SchemaError, SchemaResult};
use crate::parser::command::{
    ColumnConstraintDef, ColumnDef, ColumnOptionsDef, ForeignKeyDef, KeyPartDef, OnDeleteActionDef,
};

pub(super) fn is_kw(tok: &str, kw: &str) -> bool {
    tok.eq_ignore_ascii_case(kw)
}

pub(super) fn bad(msg: impl Into<String>) -> SchemaError {
    SchemaError::InvalidDdl(msg.into())
}

pub(super) fn tok<'a>(tokens: &'a [String], i: usize) -> Option<&'a str> {
    tokens.get(i).map(|s| s.as_str())
}

/// Consumes an identifier token; punctuation or end of input is an error.
pub(super) fn ident(tokens: &[String], i: usize, what: &str) -> SchemaResult<(String, usize)> {
    match tok(tokens, i) {
        Some(t)
            if t.chars()
                .next()
                .map(|c| c.is_ascii_alphabetic() || c == '_')
                .unwrap_or(false) =>
        {
            Ok((t.to_string(), i + 1))
        }
        Some(t) => Err(bad(format!("Expected {what} but got '{t}'"))),
        None => Err(bad(format!("Expected {what} but the statement ended"))),
    }
}

pub(super) fn expect_tok(tokens: &[String], i: usize, t: &str, usage: &str) -> SchemaResult<usize> {
    match tok(tokens, i) {
        Some(found) if found == t => Ok(i + 1),
        _ => Err(bad(usage.to_string())),
    }
}

pub(super) fn expect_kw(tokens: &[String], i: usize, kw: &str, usage: &str) -> SchemaResult<usize> {
    match tok(tokens, i) {
        Some(found) if is_kw(found, kw) => Ok(i + 1),
        _ => Err(bad(usage.to_string())),
    }
}

/// Parses a parenthesized, comma-separated list of column names. The list
/// may be empty: `()`.
pub(super) fn parse_column_name_list(
    tokens: &[String],
    i: usize,
) -> SchemaResult<(Vec<String>, usize)> {
    let mut i = expect_tok(tokens, i, "(", "Expected '(' before column name list")?;
    let mut names: Vec<String> = Vec::new();
    if tok(tokens, i) == Some(")") {
        return Ok((names, i + 1));
    }
    loop {
        let (name, next) = ident(tokens, i, "column name")?;
        names.push(name);
        i = next;
        match tok(tokens, i) {
            Some(",") => i += 1,
            Some(")") => return Ok((names, i + 1)),
            _ => return Err(bad("Column names must be comma-separated".to_string())),
        }
    }
}

/// Parses `(<column> [ASC|DESC], ...)`. The list may be empty: `()`.
pub(super) fn parse_key_part_list(
    tokens: &[String],
    i: usize,
) -> SchemaResult<(Vec<KeyPartDef>, usize)> {
    let mut i = expect_tok(tokens, i, "(", "Expected '(' before key column list")?;
    let mut parts: Vec<KeyPartDef> = Vec::new();
    if tok(tokens, i) == Some(")") {
        return Ok((parts, i + 1));
    }
    loop {
        let (column, next) = ident(tokens, i, "key column name")?;
        i = next;
        let mut descending = false;
        match tok(tokens, i) {
            Some(t) if is_kw(t, "asc") => i += 1,
            Some(t) if is_kw(t, "desc") => {
                descending = true;
                i += 1;
            }
            _ => {}
        }
        parts.push(KeyPartDef { column, descending });
        match tok(tokens, i) {
            Some(",") => i += 1,
            Some(")") => return Ok((parts, i + 1)),
            _ => return Err(bad("Key columns must be comma-separated".to_string())),
        }
    }
}

/// Parses `CASCADE` or `NO ACTION`.
pub(super) fn parse_on_delete_action(
    tokens: &[String],
    i: usize,
) -> SchemaResult<(OnDeleteActionDef, usize)> {
    match tok(tokens, i) {
        Some(t) if is_kw(t, "cascade") => Ok((OnDeleteActionDef::Cascade, i + 1)),
        Some(t) if is_kw(t, "no") => {
            let i = expect_kw(tokens, i + 1, "action", "ON DELETE requires CASCADE or NO ACTION")?;
            Ok((OnDeleteActionDef::NoAction, i))
        }
        _ => Err(bad("ON DELETE requires CASCADE or NO ACTION".to_string())),
    }
}

/// Parses one column definition: `<name> <type> [NOT NULL]
/// [OPTIONS (allow_commit_timestamp = true|false|null)]`. Stops before the
/// next top-level `,` or `)`.
pub(super) fn parse_column_def(tokens: &[String], i: usize) -> SchemaResult<(ColumnDef, usize)> {
    let (name, i) = ident(tokens, i, "column name")?;
    let (column_type, max_length, mut i) = parse_column_type(tokens, i)?;

    let mut constraints: Vec<ColumnConstraintDef> = Vec::new();
    if let Some(max_length) = max_length {
        constraints.push(ColumnConstraintDef::ColumnLength { max_length });
    }

    let mut options: Option<ColumnOptionsDef> = None;
    loop {
        match tok(tokens, i) {
            Some(t) if is_kw(t, "not") => {
                i = expect_kw(tokens, i + 1, "null", "Bad NOT NULL constraint. Use 'NOT NULL'")?;
                constraints.push(ColumnConstraintDef::NotNull { nullable: false });
            }
            Some(t) if is_kw(t, "options") => {
                let (opts, next) = parse_column_options(tokens, i + 1)?;
                options = Some(opts);
                i = next;
            }
            _ => break,
        }
    }

    Ok((
        ColumnDef {
            name,
            column_type,
            constraints,
            options,
        },
        i,
    ))
}

/// Parses a type reference, splitting a parenthesized length off into a
/// separate `COLUMN LENGTH` constraint. `(MAX)` yields no length constraint.
fn parse_column_type(
    tokens: &[String],
    i: usize,
) -> SchemaResult<(String, Option<i64>, usize)> {
    let (base, mut i) = ident(tokens, i, "column type")?;
    if is_kw(&base, "array") {
        i = expect_tok(tokens, i, "<", "Bad ARRAY type. Use ARRAY<type>")?;
        let (inner, next) = ident(tokens, i, "array element type")?;
        i = next;
        let (max_length, next) = parse_length_suffix(tokens, i)?;
        i = expect_tok(tokens, next, ">", "Bad ARRAY type. Use ARRAY<type>")?;
        return Ok((format!("ARRAY<{inner}>"), max_length, i));
    }
    let (max_length, i) = parse_length_suffix(tokens, i)?;
    Ok((base, max_length, i))
}

fn parse_length_suffix(tokens: &[String], i: usize) -> SchemaResult<(Option<i64>, usize)> {
    if tok(tokens, i) != Some("(") {
        return Ok((None, i));
    }
    let val = tok(tokens, i + 1)
        .ok_or_else(|| bad("Bad type length. Use (MAX) or (<n>)".to_string()))?;
    let max_length = if is_kw(val, "max") {
        None
    } else {
        Some(
            val.parse::<i64>()
                .map_err(|_| bad(format!("Bad type length '{val}'. Use (MAX) or (<n>)")))?,
        )
    };
    let i = expect_tok(tokens, i + 2, ")", "Bad type length. Use (MAX) or (<n>)")?;
    Ok((max_length, i))
}

fn parse_column_options(
    tokens: &[String],
    i: usize,
) -> SchemaResult<(ColumnOptionsDef, usize)> {
    let usage = "Bad column options. Use OPTIONS (allow_commit_timestamp = true|false|null)";
    let mut i = expect_tok(tokens, i, "(", usage)?;
    i = expect_kw(tokens, i, "allow_commit_timestamp", usage)?;
    i = expect_tok(tokens, i, "=", usage)?;
    let allow_commit_timestamp = match tok(tokens, i) {
        Some(t) if is_kw(t, "true") => Some(true),
        Some(t) if is_kw(t, "false") => Some(false),
        Some(t) if is_kw(t, "null") => None,
        _ => return Err(bad(usage.to_string())),
    };
    i = expect_tok(tokens, i + 1, ")", usage)?;
    Ok((
        ColumnOptionsDef {
            allow_commit_timestamp,
        },
        i,
    ))
}

/// Parses `FOREIGN KEY (<cols>) REFERENCES <table> (<cols>)`, with the
/// optional `CONSTRAINT <name>` prefix already consumed by the caller.
pub(super) fn parse_foreign_key(
    tokens: &[String],
    i: usize,
    constraint_name: Option<String>,
) -> SchemaResult<(ForeignKeyDef, usize)> {
    let usage = "Bad FOREIGN KEY constraint. Use FOREIGN KEY (<cols>) REFERENCES <table> (<cols>)";
    let mut i = expect_kw(tokens, i, "foreign", usage)?;
    i = expect_kw(tokens, i, "key", usage)?;
    let (referencing_columns, next) = parse_column_name_list(tokens, i)?;
    i = expect_kw(tokens, next, "references", usage)?;
    let (referenced_table, next) = ident(tokens, i, "referenced table name")?;
    let (referenced_columns, i) = parse_column_name_list(tokens, next)?;
    Ok((
        ForeignKeyDef {
            constraint_name,
            referencing_columns,
            referenced_table,
            referenced_columns,
        },
        i,
    ))
}
