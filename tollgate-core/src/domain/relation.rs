// tollgate-core/src/domain/relation.rs

use serde::Serialize;

use crate::domain::sql::quote_ident;

/// Engine-independent description of a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_nullable,
        }
    }
}

/// A named, queryable dataset. Owned by the engine; the core only reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl Relation {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns,
        }
    }

    /// `schema.name`, unquoted. Used in logs and reports.
    pub fn identifier(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// `"schema"."name"`, ready to be placed in a FROM clause.
    pub fn qualified(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.name))
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(column))
    }
}
