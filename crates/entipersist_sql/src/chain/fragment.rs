//! Captured query fragments.

use crate::chain::{QueryBuilder, QueryValueFactory};
use entipersist_core::Value;
use std::fmt;
use std::sync::Arc;

/// Query text plus its parameter factories, detached from the builder
/// that produced them.
#[derive(Clone, Default)]
pub struct QueryFragment {
    sql: String,
    values: Vec<QueryValueFactory>,
}

impl QueryFragment {
    /// Creates a fragment.
    pub fn new(sql: impl Into<String>, values: Vec<QueryValueFactory>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }

    /// Creates a fragment whose parameters are fixed values.
    pub fn with_values(sql: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        Self::new(
            sql,
            values
                .into_iter()
                .map(|value| Arc::new(move || value.clone()) as QueryValueFactory)
                .collect(),
        )
    }

    /// Returns the fragment text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns `true` if the fragment has no text.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Returns the number of parameters.
    pub fn parameter_count(&self) -> usize {
        self.values.len()
    }
}

impl QueryBuilder for QueryFragment {
    fn build_query_string(&self) -> String {
        self.sql.clone()
    }

    fn query_value_factories(&self) -> Vec<QueryValueFactory> {
        self.values.clone()
    }
}

impl fmt::Debug for QueryFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryFragment")
            .field("sql", &self.sql)
            .field("values", &self.build_query_values())
            .finish()
    }
}
