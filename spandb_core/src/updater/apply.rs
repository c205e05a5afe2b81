use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{internal, SchemaError, SchemaResult};
use crate::limits;
use crate::parser;
use crate::parser::command::{
    AlterTableDef, AlterTableOpDef, ColumnConstraintDef, ColumnDef, CreateIndexDef,
    CreateTableDef, DdlStatement, ForeignKeyDef, InterleaveDef, KeyPartDef, OnDeleteActionDef,
    TableConstraintDef,
};
use crate::schema::column::{Column, ColumnBuilder, ColumnDefTarget, KeyColumnBuilder};
use crate::schema::editor::GraphEditor;
use crate::schema::foreign_key::ForeignKeyBuilder;
use crate::schema::index::{IndexBuilder, INDEX_DATA_TABLE_PREFIX};
use crate::schema::names::{validate_schema_name, GlobalNames};
use crate::schema::table::{Table, TableBuilder};
use crate::schema::{
    ColumnIdGenerator, NodeId, OnDeleteAction, Schema, SchemaNode, TableIdGenerator,
};
use crate::types::datatype::TypeFactory;
use crate::updater::context::{SchemaChangeAction, SchemaValidationContext};

/// Applies DDL statements to an immutable starting snapshot, one statement
/// at a time. Each statement gets a fresh graph editor over the latest
/// snapshot; a statement that fails leaves the chain untouched.
///
/// Semantic checks beyond the existence checks needed to wire up references
/// belong in snapshot validation, not here, so they run for both database
/// creation and update.
pub(crate) struct Applier<'a> {
    type_factory: &'a TypeFactory,
    table_id_generator: &'a TableIdGenerator,
    column_id_generator: &'a ColumnIdGenerator,
    schema_change_timestamp: DateTime<Utc>,
    /// Snapshot after the statements applied so far. Verification and
    /// backfill effects of those statements may still be pending.
    latest_schema: Arc<Schema>,
    intermediate_schemas: Vec<Arc<Schema>>,
    editor: GraphEditor,
    statement_context: SchemaValidationContext,
    global_names: GlobalNames,
}

/// The referencing endpoint of a foreign key under construction: either the
/// table builder of a CREATE TABLE in progress, or an existing table being
/// altered.
enum FkReferencing<'b> {
    New(&'b mut TableBuilder),
    Existing { base: NodeId },
}

impl<'a> Applier<'a> {
    pub(crate) fn build(
        type_factory: &'a TypeFactory,
        table_id_generator: &'a TableIdGenerator,
        column_id_generator: &'a ColumnIdGenerator,
        schema_change_timestamp: DateTime<Utc>,
        existing_schema: Arc<Schema>,
    ) -> SchemaResult<Self> {
        let global_names = GlobalNames::from_schema(&existing_schema)?;
        let editor = GraphEditor::new(existing_schema.graph().clone());
        Ok(Applier {
            type_factory,
            table_id_generator,
            column_id_generator,
            schema_change_timestamp,
            latest_schema: existing_schema,
            intermediate_schemas: Vec::new(),
            editor,
            statement_context: SchemaValidationContext::new(schema_change_timestamp),
            global_names,
        })
    }

    /// Applies every statement, chaining snapshots. Returns the validation
    /// context of each statement with its deferred actions; the caller
    /// decides whether and when to run them.
    pub(crate) fn apply_ddl_statements(
        &mut self,
        statements: &[String],
    ) -> SchemaResult<Vec<SchemaValidationContext>> {
        let mut pending_work = Vec::with_capacity(statements.len());
        for statement in statements {
            log::debug!("applying statement: {statement}");
            self.editor = GraphEditor::new(self.latest_schema.graph().clone());
            self.statement_context =
                SchemaValidationContext::new(self.schema_change_timestamp);

            let new_schema = self.apply_ddl_statement(statement)?;

            // Every snapshot is retained: verifiers and backfillers of this
            // or later statements refer to the before/after states.
            let mut context = std::mem::replace(
                &mut self.statement_context,
                SchemaValidationContext::new(self.schema_change_timestamp),
            );
            context.set_old_schema(self.latest_schema.clone());
            context.set_new_schema(new_schema.clone());
            self.latest_schema = new_schema.clone();
            self.intermediate_schemas.push(new_schema);
            pending_work.push(context);
        }
        Ok(pending_work)
    }

    pub(crate) fn into_intermediate_schemas(self) -> Vec<Arc<Schema>> {
        self.intermediate_schemas
    }

    fn apply_ddl_statement(&mut self, statement: &str) -> SchemaResult<Arc<Schema>> {
        if statement.trim().is_empty() {
            return Err(SchemaError::EmptyDdlStatement);
        }
        if self.editor.has_modifications() {
            return Err(internal("editor carried modifications across statements"));
        }

        let ddl_statement = parser::parse(statement)?;
        match &ddl_statement {
            DdlStatement::CreateTable(ddl_table) => self.create_table(ddl_table)?,
            DdlStatement::CreateIndex(ddl_index) => self.create_index(ddl_index)?,
            DdlStatement::AlterTable(alter_table) => self.alter_table(alter_table)?,
            DdlStatement::DropTable { table_name } => self.drop_table(table_name)?,
            DdlStatement::DropIndex { index_name } => self.drop_index(index_name)?,
        }

        let editor = std::mem::replace(
            &mut self.editor,
            GraphEditor::new(self.latest_schema.graph().clone()),
        );
        let graph = editor.canonicalize()?;
        Ok(Arc::new(Schema::new(graph)?))
    }
}

fn on_delete_action(action: OnDeleteActionDef) -> OnDeleteAction {
    match action {
        OnDeleteActionDef::Cascade => OnDeleteAction::Cascade,
        OnDeleteActionDef::NoAction => OnDeleteAction::NoAction,
    }
}

/// Applies a DDL column definition onto a builder or an existing column.
/// Nullability and length are reset to their defaults first, so an ALTER
/// COLUMN that does not restate NOT NULL drops it.
fn set_column_definition<T: ColumnDefTarget>(
    type_factory: &TypeFactory,
    ddl_column: &ColumnDef,
    target: &mut T,
) -> SchemaResult<()> {
    target.set_type(type_factory.resolve(&ddl_column.column_type)?);
    target.set_nullable(true);
    target.set_declared_max_length(None);
    for constraint in &ddl_column.constraints {
        match constraint {
            ColumnConstraintDef::NotNull { nullable } => target.set_nullable(*nullable),
            ColumnConstraintDef::ColumnLength { max_length } => {
                target.set_declared_max_length(Some(*max_length))
            }
        }
    }
    if let Some(options) = &ddl_column.options {
        target.set_allow_commit_timestamp(options.allow_commit_timestamp);
    }
    Ok(())
}

include!("apply/tables.inc.rs");
include!("apply/indexes.inc.rs");
include!("apply/constraints.inc.rs");
