use super::common::{bad, ident, is_kw, tok};
use crate::error::SchemaResult;
use crate::parser::command::DdlStatement;

pub(super) fn parse_drop(tokens: &[String]) -> SchemaResult<DdlStatement> {
    let usage = "Usage: DROP TABLE <name> or DROP INDEX <name>";
    match tok(tokens, 1) {
        Some(t) if is_kw(t, "table") => {
            let (table_name, i) = ident(tokens, 2, "table name")?;
            if i != tokens.len() {
                return Err(bad(usage));
            }
            Ok(DdlStatement::DropTable { table_name })
        }
        Some(t) if is_kw(t, "index") => {
            let (index_name, i) = ident(tokens, 2, "index name")?;
            if i != tokens.len() {
                return Err(bad(usage));
            }
            Ok(DdlStatement::DropIndex { index_name })
        }
        _ => Err(bad(usage)),
    }
}
