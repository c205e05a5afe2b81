use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{internal, SchemaResult};
use crate::schema::{NodeId, Schema};

/// A data-dependent task enqueued during statement application and run only
/// after the whole batch validates structurally. Tagged records keep the
/// queue inspectable without executing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChangeAction {
    BackfillIndex { index: NodeId },
}

/// Per-statement record of the snapshots around one DDL statement plus the
/// deferred actions it scheduled.
#[derive(Debug)]
pub struct SchemaValidationContext {
    schema_change_timestamp: DateTime<Utc>,
    old_schema: Option<Arc<Schema>>,
    new_schema: Option<Arc<Schema>>,
    actions: Vec<SchemaChangeAction>,
}

impl SchemaValidationContext {
    pub(crate) fn new(schema_change_timestamp: DateTime<Utc>) -> Self {
        SchemaValidationContext {
            schema_change_timestamp,
            old_schema: None,
            new_schema: None,
            actions: Vec::new(),
        }
    }

    pub fn schema_change_timestamp(&self) -> DateTime<Utc> {
        self.schema_change_timestamp
    }

    pub(crate) fn add_action(&mut self, action: SchemaChangeAction) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[SchemaChangeAction] {
        &self.actions
    }

    pub(crate) fn set_old_schema(&mut self, schema: Arc<Schema>) {
        self.old_schema = Some(schema);
    }

    pub(crate) fn set_new_schema(&mut self, schema: Arc<Schema>) {
        self.new_schema = Some(schema);
    }

    /// Snapshot before the statement applied.
    pub fn old_schema(&self) -> SchemaResult<&Arc<Schema>> {
        self.old_schema
            .as_ref()
            .ok_or_else(|| internal("validation context has no old schema snapshot"))
    }

    /// Snapshot after the statement applied.
    pub fn new_schema(&self) -> SchemaResult<&Arc<Schema>> {
        self.new_schema
            .as_ref()
            .ok_or_else(|| internal("validation context has no new schema snapshot"))
    }
}
