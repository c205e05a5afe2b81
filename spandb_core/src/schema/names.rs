use std::collections::HashMap;

use crate::error::{SchemaError, SchemaResult};
use crate::limits::MAX_SCHEMA_NAME_LENGTH;
use crate::schema::snapshot::Schema;

/// Registry of globally unique schema names for one update batch. Tables,
/// indexes and named foreign keys share a single namespace; comparison is
/// case-insensitive while the declared casing is preserved.
#[derive(Debug, Default)]
pub struct GlobalNames {
    /// lowercase name -> (kind, declared casing)
    names: HashMap<String, (String, String)>,
    fk_sequence: u64,
}

pub(crate) fn validate_schema_name(kind: &str, name: &str) -> SchemaResult<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic())
        .unwrap_or(false);
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_start || !valid_rest || name.len() > MAX_SCHEMA_NAME_LENGTH {
        return Err(SchemaError::InvalidSchemaName {
            kind: kind.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

impl GlobalNames {
    pub fn new() -> Self {
        GlobalNames::default()
    }

    /// Seeds the registry from an existing snapshot: every node whose name
    /// info is marked global occupies its name.
    pub fn from_schema(schema: &Schema) -> SchemaResult<Self> {
        let mut names = GlobalNames::new();
        for (_, node) in schema.graph().nodes() {
            if let Some(info) = node.schema_name_info() {
                if info.global {
                    names.add_name(info.kind, &info.name)?;
                }
            }
        }
        Ok(names)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(&name.to_lowercase())
    }

    /// Kind and declared casing registered under `name`, if occupied.
    pub fn get(&self, name: &str) -> Option<(&str, &str)> {
        self.names
            .get(&name.to_lowercase())
            .map(|(kind, declared)| (kind.as_str(), declared.as_str()))
    }

    pub fn add_name(&mut self, kind: &str, name: &str) -> SchemaResult<()> {
        validate_schema_name(kind, name)?;
        self.insert(kind, name)
    }

    fn insert(&mut self, kind: &str, name: &str) -> SchemaResult<()> {
        let key = name.to_lowercase();
        if self.names.contains_key(&key) {
            return Err(SchemaError::DuplicateName {
                kind: kind.to_string(),
                name: name.to_string(),
            });
        }
        self.names
            .insert(key, (kind.to_string(), name.to_string()));
        Ok(())
    }

    /// Synthesizes and registers a constraint name of the form
    /// `FK_<referencing>_<referenced>_<n>`. Generated names skip shape
    /// validation since their parts were validated at table creation.
    pub fn generate_foreign_key_name(
        &mut self,
        referencing_table: &str,
        referenced_table: &str,
    ) -> SchemaResult<String> {
        loop {
            self.fk_sequence += 1;
            let candidate = format!(
                "FK_{referencing_table}_{referenced_table}_{}",
                self.fk_sequence
            );
            if !self.contains(&candidate) {
                self.insert("Foreign Key", &candidate)?;
                return Ok(candidate);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
