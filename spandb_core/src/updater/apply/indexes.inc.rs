impl<'a> Applier<'a> {
    fn create_index(&mut self, ddl_index: &CreateIndexDef) -> SchemaResult<()> {
        let indexed_table = self
            .latest_schema
            .find_table(&ddl_index.table_name)
            .ok_or_else(|| SchemaError::TableNotFound(ddl_index.table_name.clone()))?;

        if self.latest_schema.indexes().len() >= limits::MAX_INDEXES_PER_DATABASE {
            return Err(SchemaError::TooManyIndicesPerDatabase {
                index: ddl_index.index_name.clone(),
                limit: limits::MAX_INDEXES_PER_DATABASE,
            });
        }

        // Tables and indexes share a namespace.
        self.global_names.add_name("Index", &ddl_index.index_name)?;

        let mut builder = IndexBuilder::new(self.editor.reserve_id());
        builder
            .set_name(&ddl_index.index_name)
            .set_unique(ddl_index.unique)
            .set_null_filtered(ddl_index.null_filtered);

        let mut key_columns: Vec<NodeId> = Vec::new();
        let mut stored_columns: Vec<NodeId> = Vec::new();
        let (data_table_id, data_table) = self.create_index_data_table(
            ddl_index,
            &builder,
            indexed_table,
            &mut key_columns,
            &mut stored_columns,
        )?;
        builder.set_index_data_table(data_table_id);

        for key_column in key_columns {
            builder.add_key_column(key_column);
        }
        for column in stored_columns {
            builder.add_stored_column(column);
        }

        let index_id = builder.id();
        let indexed = self.editor.edit_node::<Table>(indexed_table, |table| {
            table.add_index(index_id);
            Ok(())
        })?;
        builder.set_indexed_table(indexed);

        // Register a backfill action for the index.
        self.statement_context
            .add_action(SchemaChangeAction::BackfillIndex { index: index_id });

        // The data table must be added after the index for correct order of
        // validation.
        let (id, node) = builder.build()?;
        self.editor.add_node(id, node)?;
        self.editor.add_node(data_table_id, data_table)?;
        Ok(())
    }

    fn create_index_data_table(
        &mut self,
        ddl_index: &CreateIndexDef,
        index: &IndexBuilder,
        indexed_table: NodeId,
        key_columns: &mut Vec<NodeId>,
        stored_columns: &mut Vec<NodeId>,
    ) -> SchemaResult<(NodeId, SchemaNode)> {
        let table_name = format!("{INDEX_DATA_TABLE_PREFIX}{}", ddl_index.index_name);
        let mut builder = TableBuilder::new(self.editor.reserve_id());
        builder
            .set_name(&table_name)
            .set_id(self.table_id_generator.next_id(&table_name))
            .set_owner_index(index.id(), ddl_index.index_name.clone());

        let indexed_pk: Vec<(String, bool)> = {
            let table = self.latest_schema.table(indexed_table)?;
            let mut parts = Vec::with_capacity(table.primary_key.len());
            for &key_column in &table.primary_key {
                let key = self.latest_schema.key_column(key_column)?;
                let column = self.latest_schema.column(key.column)?;
                parts.push((column.name.clone(), key.descending));
            }
            parts
        };

        for constraint in &ddl_index.constraints {
            match constraint {
                TableConstraintDef::PrimaryKey(declared_keys) => {
                    // The data table key combines the declared index keys
                    // with the indexed table's remaining key columns.
                    let mut data_table_pk: Vec<KeyPartDef> = declared_keys.clone();

                    for key_part in declared_keys {
                        let (column, name) = self.create_index_data_table_column(
                            indexed_table,
                            &key_part.column,
                            &builder,
                            index.is_null_filtered(),
                        )?;
                        builder.add_column(column, name);
                    }

                    for (name, descending) in &indexed_pk {
                        if builder.has_column(name) {
                            // Skip already added columns
                            continue;
                        }
                        let (column, name) = self.create_index_data_table_column(
                            indexed_table,
                            name,
                            &builder,
                            index.is_null_filtered(),
                        )?;
                        builder.add_column(column, name.clone());
                        data_table_pk.push(KeyPartDef {
                            column: name,
                            descending: *descending,
                        });
                    }

                    self.create_primary_key_constraint(&data_table_pk, &mut builder)?;
                    key_columns
                        .extend_from_slice(&builder.primary_key()[..declared_keys.len()]);
                }
                TableConstraintDef::Interleave(interleave) => {
                    let mut interleave = interleave.clone();
                    interleave.on_delete = OnDeleteActionDef::Cascade;
                    self.create_interleave_constraint(&interleave, &mut builder)?;
                }
                TableConstraintDef::ForeignKey(_) => {
                    return Err(internal(format!(
                        "unexpected foreign key constraint on index '{}'",
                        ddl_index.index_name
                    )));
                }
            }
        }

        for stored in &ddl_index.stored_columns {
            let (column, name) =
                self.create_index_data_table_column(indexed_table, stored, &builder, false)?;
            builder.add_column(column, name);
            stored_columns.push(column);
        }

        builder.build()
    }

    /// Clones a column of the indexed table onto the data table, pointing
    /// `source_column` back at the original. Key columns of a null-filtered
    /// index come out non-nullable; everything else inherits nullability.
    fn create_index_data_table_column(
        &mut self,
        indexed_table: NodeId,
        source_column_name: &str,
        data_table: &TableBuilder,
        null_filtered_key_column: bool,
    ) -> SchemaResult<(NodeId, String)> {
        let source = self
            .latest_schema
            .find_column(indexed_table, source_column_name)
            .ok_or_else(|| SchemaError::IndexRefsNonExistentColumn {
                index: data_table.owner_index_name().unwrap_or_default().to_string(),
                column: source_column_name.to_string(),
            })?;
        let source_column = self.latest_schema.column(source)?.clone();

        let mut builder = ColumnBuilder::new(self.editor.reserve_id());
        builder
            .set_id(
                self.column_id_generator
                    .next_id(&format!("{}.{}", data_table.name(), source_column.name)),
            )
            .set_name(&source_column.name)
            .set_table(data_table.id())
            .set_source_column(source);
        builder.set_type(source_column.dtype.clone());
        builder.set_declared_max_length(source_column.declared_max_length);
        builder.set_allow_commit_timestamp(source_column.allow_commit_timestamp);
        if null_filtered_key_column {
            builder.set_nullable(false);
        } else {
            builder.set_nullable(source_column.nullable);
        }

        let (id, node) = builder.build()?;
        self.editor.add_node(id, node)?;
        Ok((id, source_column.name))
    }
}
