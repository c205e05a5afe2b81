impl<'a> Applier<'a> {
    fn create_table(&mut self, ddl_table: &CreateTableDef) -> SchemaResult<()> {
        if self.latest_schema.tables().len() >= limits::MAX_TABLES_PER_DATABASE {
            return Err(SchemaError::TooManyTablesPerDatabase {
                table: ddl_table.table_name.clone(),
                limit: limits::MAX_TABLES_PER_DATABASE,
            });
        }
        self.global_names.add_name("Table", &ddl_table.table_name)?;

        let mut builder = TableBuilder::new(self.editor.reserve_id());
        builder
            .set_id(self.table_id_generator.next_id(&ddl_table.table_name))
            .set_name(&ddl_table.table_name);

        for ddl_column in &ddl_table.columns {
            let column = self.create_column(ddl_column, builder.id(), &ddl_table.table_name)?;
            builder.add_column(column, ddl_column.name.clone());
        }

        for constraint in &ddl_table.constraints {
            match constraint {
                TableConstraintDef::PrimaryKey(key_parts) => {
                    self.create_primary_key_constraint(key_parts, &mut builder)?;
                }
                TableConstraintDef::Interleave(interleave) => {
                    self.create_interleave_constraint(interleave, &mut builder)?;
                }
                TableConstraintDef::ForeignKey(ddl_foreign_key) => {
                    self.create_foreign_key_constraint(
                        ddl_foreign_key,
                        FkReferencing::New(&mut builder),
                    )?;
                }
            }
        }

        let (id, node) = builder.build()?;
        self.editor.add_node(id, node)
    }

    fn create_column(
        &mut self,
        ddl_column: &ColumnDef,
        table: NodeId,
        table_name: &str,
    ) -> SchemaResult<NodeId> {
        validate_schema_name("Column", &ddl_column.name)?;
        let mut builder = ColumnBuilder::new(self.editor.reserve_id());
        builder
            .set_id(
                self.column_id_generator
                    .next_id(&format!("{table_name}.{}", ddl_column.name)),
            )
            .set_name(&ddl_column.name)
            .set_table(table);
        set_column_definition(self.type_factory, ddl_column, &mut builder)?;
        let (id, node) = builder.build()?;
        self.editor.add_node(id, node)?;
        Ok(id)
    }

    fn create_primary_key_constraint(
        &mut self,
        key_parts: &[KeyPartDef],
        builder: &mut TableBuilder,
    ) -> SchemaResult<()> {
        for key_part in key_parts {
            let key_column = self.create_primary_key_column(key_part, builder)?;
            builder.add_key_column(key_column);
        }
        Ok(())
    }

    fn create_primary_key_column(
        &mut self,
        key_part: &KeyPartDef,
        builder: &TableBuilder,
    ) -> SchemaResult<NodeId> {
        // References to columns in a primary key clause are case-sensitive.
        let column = builder
            .find_column_case_sensitive(&key_part.column)
            .ok_or_else(|| match builder.owner_index_name() {
                Some(index) => SchemaError::NonExistentKeyColumn {
                    object_kind: "Index",
                    object_name: index.to_string(),
                    column: key_part.column.clone(),
                },
                None => SchemaError::NonExistentKeyColumn {
                    object_kind: "Table",
                    object_name: builder.name().to_string(),
                    column: key_part.column.clone(),
                },
            })?;
        let mut key_builder = KeyColumnBuilder::new(self.editor.reserve_id());
        key_builder
            .set_column(column)
            .set_descending(key_part.descending);
        let (id, node) = key_builder.build()?;
        self.editor.add_node(id, node)?;
        Ok(id)
    }

    fn create_interleave_constraint(
        &mut self,
        interleave: &InterleaveDef,
        builder: &mut TableBuilder,
    ) -> SchemaResult<()> {
        let parent = match self.latest_schema.find_table(&interleave.parent) {
            Some(parent) => parent,
            None => {
                return Err(match builder.owner_index_name() {
                    None => SchemaError::TableNotFound(interleave.parent.clone()),
                    Some(index) => SchemaError::IndexInterleaveTableNotFound {
                        index: index.to_string(),
                        parent: interleave.parent.clone(),
                    },
                });
            }
        };
        if builder.parent().is_some() {
            return Err(internal(format!(
                "table '{}' already has an interleave parent",
                builder.name()
            )));
        }

        let child = builder.id();
        let parent = self.editor.edit_node::<Table>(parent, |parent| {
            parent.add_child_table(child);
            Ok(())
        })?;
        builder.set_parent_table(parent);
        builder.set_on_delete(on_delete_action(interleave.on_delete));
        Ok(())
    }

    fn alter_table(&mut self, alter_table: &AlterTableDef) -> SchemaResult<()> {
        let table = self
            .latest_schema
            .find_table(&alter_table.table_name)
            .ok_or_else(|| SchemaError::TableNotFound(alter_table.table_name.clone()))?;
        let table_name = self.latest_schema.table(table)?.name.clone();

        match &alter_table.op {
            AlterTableOpDef::AddColumn(definition) => {
                let column = self.create_column(definition, table, &table_name)?;
                self.editor.edit_node::<Table>(table, |table| {
                    table.add_column(column);
                    Ok(())
                })?;
            }
            AlterTableOpDef::AlterColumn {
                column_name,
                definition,
            } => {
                let column = self
                    .latest_schema
                    .find_column(table, column_name)
                    .ok_or_else(|| SchemaError::ColumnNotFound {
                        table: table_name.clone(),
                        column: column_name.clone(),
                    })?;
                let type_factory = self.type_factory;
                self.editor.edit_node::<Column>(column, |column| {
                    set_column_definition(type_factory, definition, column)
                })?;
            }
            AlterTableOpDef::DropColumn { column_name } => {
                let column = self
                    .latest_schema
                    .find_column(table, column_name)
                    .ok_or_else(|| SchemaError::ColumnNotFound {
                        table: table_name.clone(),
                        column: column_name.clone(),
                    })?;
                self.editor.delete_node(column)?;
            }
            AlterTableOpDef::AddForeignKey(ddl_foreign_key) => {
                self.create_foreign_key_constraint(
                    ddl_foreign_key,
                    FkReferencing::Existing { base: table },
                )?;
            }
            AlterTableOpDef::DropConstraint { constraint_name } => {
                // Foreign keys are the only droppable constraint kind.
                match self.latest_schema.find_foreign_key(table, constraint_name) {
                    Some(foreign_key) => self.editor.delete_node(foreign_key)?,
                    None => {
                        return Err(SchemaError::ConstraintNotFound {
                            constraint: constraint_name.clone(),
                            table: table_name,
                        });
                    }
                }
            }
            AlterTableOpDef::SetOnDelete(action) => {
                let action = on_delete_action(*action);
                self.editor.edit_node::<Table>(table, |table| {
                    table.set_on_delete(action);
                    Ok(())
                })?;
            }
        }
        Ok(())
    }

    fn drop_table(&mut self, table_name: &str) -> SchemaResult<()> {
        let table = self
            .latest_schema
            .find_table(table_name)
            .ok_or_else(|| SchemaError::TableNotFound(table_name.to_string()))?;
        self.editor.delete_node(table)
    }

    fn drop_index(&mut self, index_name: &str) -> SchemaResult<()> {
        let index = self
            .latest_schema
            .find_index(index_name)
            .ok_or_else(|| SchemaError::IndexNotFound(index_name.to_string()))?;
        self.editor.delete_node(index)
    }
}
