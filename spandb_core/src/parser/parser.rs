mod alter;
mod common;
mod create;
mod drop;
mod tokenizer;

use crate::error::{SchemaError, SchemaResult};
use crate::parser::command::DdlStatement;

pub fn parse(input: &str) -> SchemaResult<DdlStatement> {
    let tokens = tokenizer::tokenize(input)?;
    if tokens.is_empty() {
        return Err(SchemaError::EmptyDdlStatement);
    }

    let keyword = tokens[0].to_lowercase();

    match keyword.as_str() {
        "create" => create::parse_create(&tokens),
        "alter" => alter::parse_alter(&tokens),
        "drop" => drop::parse_drop(&tokens),
        _ => Err(SchemaError::InvalidDdl(format!(
            "Unknown DDL statement '{}'",
            tokens[0]
        ))),
    }
}
