#[derive(Debug, Clone, PartialEq)]
pub struct KeyPartDef {
    pub column: String,
    pub descending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OnDeleteActionDef {
    NoAction,
    Cascade,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterleaveDef {
    pub parent: String,
    pub on_delete: OnDeleteActionDef,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraintDef {
    NotNull { nullable: bool },
    ColumnLength { max_length: i64 },
}

/// `OPTIONS (allow_commit_timestamp = ...)` on a column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnOptionsDef {
    pub allow_commit_timestamp: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: String,
    pub constraints: Vec<ColumnConstraintDef>,
    pub options: Option<ColumnOptionsDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyDef {
    pub constraint_name: Option<String>,
    pub referencing_columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraintDef {
    PrimaryKey(Vec<KeyPartDef>),
    Interleave(InterleaveDef),
    ForeignKey(ForeignKeyDef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableDef {
    pub table_name: String,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraintDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexDef {
    pub index_name: String,
    pub table_name: String,
    pub unique: bool,
    pub null_filtered: bool,
    /// Declared key parts plus the interleave of the index data table. The
    /// parser always attaches an interleave (defaulting to the indexed
    /// table) so the data table is never left free-standing.
    pub constraints: Vec<TableConstraintDef>,
    pub stored_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlterTableOpDef {
    AddColumn(ColumnDef),
    AlterColumn {
        column_name: String,
        definition: ColumnDef,
    },
    DropColumn {
        column_name: String,
    },
    AddForeignKey(ForeignKeyDef),
    DropConstraint {
        constraint_name: String,
    },
    SetOnDelete(OnDeleteActionDef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableDef {
    pub table_name: String,
    pub op: AlterTableOpDef,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DdlStatement {
    CreateTable(CreateTableDef),
    CreateIndex(CreateIndexDef),
    AlterTable(AlterTableDef),
    DropTable { table_name: String },
    DropIndex { index_name: String },
}
