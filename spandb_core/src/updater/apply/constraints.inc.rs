impl<'a> Applier<'a> {
    /// Creates a foreign key between the referencing endpoint and the table
    /// named in the DDL. The builder's handle is registered with both
    /// endpoint tables before the node is built, so each side already lists
    /// the constraint when the snapshot is validated.
    ///
    /// Row-data enforcement of the constraint is a deferred concern; only
    /// the structural edge is recorded here.
    fn create_foreign_key_constraint(
        &mut self,
        ddl_foreign_key: &ForeignKeyDef,
        mut referencing: FkReferencing<'_>,
    ) -> SchemaResult<()> {
        let mut builder = ForeignKeyBuilder::new(self.editor.reserve_id());
        let foreign_key = builder.id();

        let (referencing_id, referencing_base, referencing_name) = match &mut referencing {
            FkReferencing::New(table_builder) => {
                table_builder.add_foreign_key(foreign_key);
                (table_builder.id(), None, table_builder.name().to_string())
            }
            FkReferencing::Existing { base } => {
                let name = self.latest_schema.table(*base)?.name.clone();
                let edited = self.editor.edit_node::<Table>(*base, |table| {
                    table.add_foreign_key(foreign_key);
                    Ok(())
                })?;
                (edited, Some(*base), name)
            }
        };
        builder.set_referencing_table(referencing_id);

        // Referenced-table resolution is case-sensitive; a miss naming the
        // referencing table itself is a self-reference.
        let (referenced_id, referenced_base, referenced_name) = match self
            .latest_schema
            .find_table_case_sensitive(&ddl_foreign_key.referenced_table)
        {
            Some(base) => {
                let name = self.latest_schema.table(base)?.name.clone();
                let edited = self.editor.edit_node::<Table>(base, |table| {
                    table.add_referencing_foreign_key(foreign_key);
                    Ok(())
                })?;
                (edited, Some(base), name)
            }
            None => {
                if ddl_foreign_key.referenced_table != referencing_name {
                    return Err(SchemaError::TableNotFound(
                        ddl_foreign_key.referenced_table.clone(),
                    ));
                }
                match &mut referencing {
                    FkReferencing::New(table_builder) => {
                        table_builder.add_referencing_foreign_key(foreign_key);
                        (table_builder.id(), None, referencing_name.clone())
                    }
                    FkReferencing::Existing { .. } => {
                        return Err(internal(
                            "self-referencing foreign key must resolve through the snapshot",
                        ));
                    }
                }
            }
        };
        builder.set_referenced_table(referenced_id);

        let foreign_key_name = match &ddl_foreign_key.constraint_name {
            Some(name) => {
                self.global_names.add_name("Foreign Key", name)?;
                builder.set_constraint_name(name);
                name.clone()
            }
            None => {
                let name = self
                    .global_names
                    .generate_foreign_key_name(&referencing_name, &referenced_name)?;
                builder.set_generated_name(&name);
                name
            }
        };

        // Column references on both sides are case-sensitive.
        for column_name in &ddl_foreign_key.referencing_columns {
            let column = self
                .find_fk_column(&referencing, referencing_base, column_name)
                .ok_or_else(|| SchemaError::ForeignKeyColumnNotFound {
                    column: column_name.clone(),
                    table: referencing_name.clone(),
                    foreign_key: foreign_key_name.clone(),
                })?;
            builder.add_referencing_column(column);
        }
        for column_name in &ddl_foreign_key.referenced_columns {
            let column = self
                .find_fk_column(&referencing, referenced_base, column_name)
                .ok_or_else(|| SchemaError::ForeignKeyColumnNotFound {
                    column: column_name.clone(),
                    table: referenced_name.clone(),
                    foreign_key: foreign_key_name.clone(),
                })?;
            builder.add_referenced_column(column);
        }

        let (id, node) = builder.build()?;
        self.editor.add_node(id, node)
    }

    /// Resolves a foreign-key column either in the snapshot (existing
    /// endpoint) or among the builder's columns (table under construction).
    fn find_fk_column(
        &self,
        referencing: &FkReferencing<'_>,
        base: Option<NodeId>,
        column_name: &str,
    ) -> Option<NodeId> {
        match base {
            Some(table) => self
                .latest_schema
                .find_column_case_sensitive(table, column_name),
            None => match referencing {
                FkReferencing::New(table_builder) => {
                    table_builder.find_column_case_sensitive(column_name)
                }
                FkReferencing::Existing { .. } => None,
            },
        }
    }
}
