use super::common::{
    bad, expect_kw, ident, is_kw, parse_column_def, parse_foreign_key, parse_on_delete_action, tok,
};
use crate::error::SchemaResult;
use crate::parser::command::{AlterTableDef, AlterTableOpDef, DdlStatement};

pub(super) fn parse_alter(tokens: &[String]) -> SchemaResult<DdlStatement> {
    let usage = "Usage: ALTER TABLE <table> ADD COLUMN <def> | ALTER COLUMN <def> | \
                 DROP COLUMN <name> | ADD [CONSTRAINT <name>] FOREIGN KEY ... | \
                 DROP CONSTRAINT <name> | SET ON DELETE CASCADE|NO ACTION";
    let i = expect_kw(tokens, 1, "table", usage)?;
    let (table_name, i) = ident(tokens, i, "table name")?;

    let (op, i) = match tok(tokens, i) {
        Some(t) if is_kw(t, "add") => parse_add(tokens, i + 1, usage)?,
        Some(t) if is_kw(t, "alter") => {
            let i = expect_kw(tokens, i + 1, "column", usage)?;
            let (definition, next) = parse_column_def(tokens, i)?;
            (
                AlterTableOpDef::AlterColumn {
                    column_name: definition.name.clone(),
                    definition,
                },
                next,
            )
        }
        Some(t) if is_kw(t, "drop") => parse_drop(tokens, i + 1, usage)?,
        Some(t) if is_kw(t, "set") => {
            let i = expect_kw(tokens, i + 1, "on", usage)?;
            let i = expect_kw(tokens, i, "delete", usage)?;
            let (action, next) = parse_on_delete_action(tokens, i)?;
            (AlterTableOpDef::SetOnDelete(action), next)
        }
        _ => return Err(bad(usage)),
    };

    if i != tokens.len() {
        return Err(bad(usage));
    }

    Ok(DdlStatement::AlterTable(AlterTableDef { table_name, op }))
}

fn parse_add(
    tokens: &[String],
    i: usize,
    usage: &str,
) -> SchemaResult<(AlterTableOpDef, usize)> {
    match tok(tokens, i) {
        Some(t) if is_kw(t, "column") => {
            let (def, next) = parse_column_def(tokens, i + 1)?;
            Ok((AlterTableOpDef::AddColumn(def), next))
        }
        Some(t) if is_kw(t, "constraint") => {
            let (name, next) = ident(tokens, i + 1, "constraint name")?;
            let (fk, next) = parse_foreign_key(tokens, next, Some(name))?;
            Ok((AlterTableOpDef::AddForeignKey(fk), next))
        }
        Some(t) if is_kw(t, "foreign") => {
            let (fk, next) = parse_foreign_key(tokens, i, None)?;
            Ok((AlterTableOpDef::AddForeignKey(fk), next))
        }
        _ => Err(bad(usage)),
    }
}

fn parse_drop(
    tokens: &[String],
    i: usize,
    usage: &str,
) -> SchemaResult<(AlterTableOpDef, usize)> {
    match tok(tokens, i) {
        Some(t) if is_kw(t, "column") => {
            let (column_name, next) = ident(tokens, i + 1, "column name")?;
            Ok((AlterTableOpDef::DropColumn { column_name }, next))
        }
        Some(t) if is_kw(t, "constraint") => {
            let (constraint_name, next) = ident(tokens, i + 1, "constraint name")?;
            Ok((AlterTableOpDef::DropConstraint { constraint_name }, next))
        }
        _ => Err(bad(usage)),
    }
}
