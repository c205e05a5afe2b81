use crate::error::{SchemaError, SchemaResult};

/// Splits a DDL statement into tokens. Identifiers and numbers come out as
/// single tokens; `( ) , < > =` are tokens of their own. DDL carries no
/// string literals, so there is no quote handling here.
pub(super) fn tokenize(input: &str) -> SchemaResult<Vec<String>> {
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();

    for ch in input.chars() {
        match ch {
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            '(' | ')' | ',' | '<' | '>' | '=' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(ch.to_string());
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                current.push(c);
            }
            other => {
                return Err(SchemaError::InvalidDdl(format!(
                    "Unexpected character '{other}' in DDL statement"
                )));
            }
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens)
}
