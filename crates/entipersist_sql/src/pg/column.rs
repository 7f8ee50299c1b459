//! Column references.

use crate::chain::{QueryBuilder, QueryValueFactory};
use crate::pg::utils::{quote_table_column, quote_table_name};

/// References a table column, or every column of a table, without
/// parameters. Used as the formula of aggregate builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgColumnBuilder {
    table: String,
    column: Option<String>,
}

impl PgColumnBuilder {
    /// References `table.column`.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: Some(column.into()),
        }
    }

    /// References the whole row, `table.*`.
    pub fn all_columns(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: None,
        }
    }
}

impl QueryBuilder for PgColumnBuilder {
    fn build_query_string(&self) -> String {
        match &self.column {
            Some(column) => quote_table_column(&self.table, column),
            None => format!("{}.*", quote_table_name(&self.table)),
        }
    }

    fn query_value_factories(&self) -> Vec<QueryValueFactory> {
        Vec::new()
    }
}
