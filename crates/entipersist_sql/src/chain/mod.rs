//! Backend-neutral query builder contracts.
//!
//! A [`ChainQueryBuilder`] collects column predicates joined by a single
//! connective (AND or OR). [`build_chain`] walks a [`Where`] tree and
//! drives a graph of such builders obtained from a
//! [`ChainQueryBuilderFactory`].
//!
//! [`Where`]: entipersist_core::Where

mod build;
mod fragment;

pub use build::build_chain;
pub use fragment::QueryFragment;

use crate::error::{QueryError, QueryResult};
use entipersist_core::Value;
use std::sync::Arc;

/// Deferred producer of one query parameter.
pub type QueryValueFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Anything that renders to a parameterized query fragment.
///
/// Fragments mark parameters with `?`. Backends that use numbered
/// parameters renumber them in [`build`](QueryBuilder::build), so
/// fragments can be nested in any order.
pub trait QueryBuilder: Send + Sync {
    /// Renders the fragment text.
    fn build_query_string(&self) -> String;

    /// Returns the parameter factories in placeholder order.
    fn query_value_factories(&self) -> Vec<QueryValueFactory>;

    /// Resolves every parameter.
    fn build_query_values(&self) -> Vec<Value> {
        self.query_value_factories().iter().map(|f| f()).collect()
    }

    /// Renders the final query text and its parameters.
    fn build(&self) -> (String, Vec<Value>) {
        (self.build_query_string(), self.build_query_values())
    }

    /// Captures the current text and parameters.
    fn to_fragment(&self) -> QueryFragment {
        QueryFragment::new(self.build_query_string(), self.query_value_factories())
    }
}

/// A builder of column predicates joined by one connective.
///
/// `table` is the complete, unquoted table name (`schema.table` when a
/// schema is used). Time variants are called for properties declared
/// temporal; builders that cannot compare time values keep the default
/// implementations, which fail with [`QueryError::UnsupportedPredicate`].
pub trait ChainQueryBuilder: QueryBuilder {
    /// Short name used in error messages.
    fn builder_name(&self) -> &'static str;

    /// `column = value`.
    fn set_column_equals(&mut self, table: &str, column: &str, value: &Value) -> QueryResult<()>;

    /// `column < value`.
    fn set_column_before(&mut self, table: &str, column: &str, value: &Value) -> QueryResult<()>;

    /// `column > value`.
    fn set_column_after(&mut self, table: &str, column: &str, value: &Value) -> QueryResult<()>;

    /// `start <= column <= end`.
    fn set_column_between(
        &mut self,
        table: &str,
        column: &str,
        start: &Value,
        end: &Value,
    ) -> QueryResult<()>;

    /// `column IN (values...)`.
    fn set_column_in_list(&mut self, table: &str, column: &str, values: &[Value])
        -> QueryResult<()>;

    /// `column IS NULL`.
    fn set_column_is_null(&mut self, table: &str, column: &str) -> QueryResult<()>;

    /// `column IS NOT NULL`.
    fn set_column_is_not_null(&mut self, _table: &str, _column: &str) -> QueryResult<()> {
        Err(QueryError::unsupported_predicate("is-not-null", self.builder_name()))
    }

    /// `column = value`, compared as time.
    fn set_column_equals_as_time(
        &mut self,
        _table: &str,
        _column: &str,
        _value: &Value,
    ) -> QueryResult<()> {
        Err(QueryError::unsupported_predicate("equals-as-time", self.builder_name()))
    }

    /// `column < value`, compared as time.
    fn set_column_before_as_time(
        &mut self,
        _table: &str,
        _column: &str,
        _value: &Value,
    ) -> QueryResult<()> {
        Err(QueryError::unsupported_predicate("before-as-time", self.builder_name()))
    }

    /// `column > value`, compared as time.
    fn set_column_after_as_time(
        &mut self,
        _table: &str,
        _column: &str,
        _value: &Value,
    ) -> QueryResult<()> {
        Err(QueryError::unsupported_predicate("after-as-time", self.builder_name()))
    }

    /// `start <= column <= end`, compared as time.
    fn set_column_between_as_time(
        &mut self,
        _table: &str,
        _column: &str,
        _start: &Value,
        _end: &Value,
    ) -> QueryResult<()> {
        Err(QueryError::unsupported_predicate("between-as-time", self.builder_name()))
    }

    /// `column IN (values...)`, compared as time.
    fn set_column_in_list_as_time(
        &mut self,
        _table: &str,
        _column: &str,
        _values: &[Value],
    ) -> QueryResult<()> {
        Err(QueryError::unsupported_predicate("in-as-time", self.builder_name()))
    }

    /// Adds another builder's fragment as one grouped term.
    fn set_from_query_builder(&mut self, builder: &dyn QueryBuilder) -> QueryResult<()>;
}

/// Creates the AND and OR builders used by [`build_chain`].
pub trait ChainQueryBuilderFactory: Send + Sync {
    /// Returns a fresh builder joining its terms with AND.
    fn new_and_builder(&self) -> Box<dyn ChainQueryBuilder>;

    /// Returns a fresh builder joining its terms with OR.
    fn new_or_builder(&self) -> Box<dyn ChainQueryBuilder>;
}
