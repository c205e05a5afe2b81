mod apply;
mod backfill;
pub mod context;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::SchemaResult;
use crate::schema::{ColumnIdGenerator, Schema, TableIdGenerator};
use crate::storage::StorageEngine;
use crate::types::datatype::TypeFactory;
use crate::updater::apply::Applier;

pub use self::context::{SchemaChangeAction, SchemaValidationContext};

/// Everything a schema change needs from its environment. The storage
/// handle is touched only by deferred actions, never by the structural
/// phase.
pub struct SchemaChangeContext<'a> {
    pub type_factory: &'a TypeFactory,
    pub table_id_generator: &'a TableIdGenerator,
    pub column_id_generator: &'a ColumnIdGenerator,
    pub storage: &'a mut dyn StorageEngine,
    pub schema_change_timestamp: DateTime<Utc>,
}

/// Outcome of `update_schema_from_ddl`. `num_successful_statements` counts
/// statements whose deferred actions all succeeded; `updated_schema` is the
/// snapshot after that many statements (`None` when no statement stuck).
#[derive(Debug)]
pub struct SchemaChangeResult {
    pub num_successful_statements: usize,
    pub updated_schema: Option<Arc<Schema>>,
    pub backfill_status: SchemaResult<()>,
}

/// Drives DDL batches: chains snapshots statement by statement, then runs
/// the deferred data-dependent actions in statement order.
pub struct SchemaUpdater;

impl SchemaUpdater {
    /// The process-wide empty schema.
    pub fn empty_schema() -> Arc<Schema> {
        Schema::empty()
    }

    /// Runs all statements through the applier and returns the final
    /// snapshot, without running any deferred actions. The batch is atomic:
    /// a failing statement fails the whole call and nothing is returned.
    pub fn validate_schema_from_ddl(
        statements: &[String],
        context: &mut SchemaChangeContext<'_>,
        existing_schema: Option<Arc<Schema>>,
    ) -> SchemaResult<Option<Arc<Schema>>> {
        let existing = existing_schema.unwrap_or_else(Schema::empty);
        let mut applier = Applier::build(
            context.type_factory,
            context.table_id_generator,
            context.column_id_generator,
            context.schema_change_timestamp,
            existing,
        )?;
        applier.apply_ddl_statements(statements)?;
        let mut intermediate_schemas = applier.into_intermediate_schemas();
        Ok(intermediate_schemas.pop())
    }

    /// Structurally validates the batch, then runs each statement's
    /// deferred actions in order, stopping at the first failure. This is
    /// the only path that can yield partial success.
    pub fn update_schema_from_ddl(
        existing_schema: Arc<Schema>,
        statements: &[String],
        context: &mut SchemaChangeContext<'_>,
    ) -> SchemaResult<SchemaChangeResult> {
        let mut applier = Applier::build(
            context.type_factory,
            context.table_id_generator,
            context.column_id_generator,
            context.schema_change_timestamp,
            existing_schema,
        )?;
        let pending_work = applier.apply_ddl_statements(statements)?;
        let intermediate_schemas = applier.into_intermediate_schemas();

        let mut num_successful = 0;
        let mut backfill_status: SchemaResult<()> = Ok(());
        for statement_context in &pending_work {
            match backfill::run_schema_change_actions(statement_context, &mut *context.storage) {
                Ok(()) => num_successful += 1,
                Err(error) => {
                    log::warn!("schema change action failed: {error}");
                    backfill_status = Err(error);
                    break;
                }
            }
        }

        // Use the schema snapshot of the last successful statement.
        let updated_schema = if num_successful > 0 {
            Some(intermediate_schemas[num_successful - 1].clone())
        } else {
            None
        };
        Ok(SchemaChangeResult {
            num_successful_statements: num_successful,
            updated_schema,
            backfill_status,
        })
    }

    /// Builds a schema from scratch; any deferred-action failure fails the
    /// whole call.
    pub fn create_schema_from_ddl(
        statements: &[String],
        context: &mut SchemaChangeContext<'_>,
    ) -> SchemaResult<Arc<Schema>> {
        let result = Self::update_schema_from_ddl(Schema::empty(), statements, context)?;
        result.backfill_status?;
        Ok(result.updated_schema.unwrap_or_else(Schema::empty))
    }
}
