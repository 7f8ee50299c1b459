//! Recording query builders.
//!
//! [`RecordingFactory`] hands out [`RecordingBuilder`]s that render
//! nothing useful but log every call, in order, to one shared
//! [`CallLog`]. Tests of the chain algorithm assert on that log.

use entipersist_core::Value;
use entipersist_sql::{
    ChainQueryBuilder, ChainQueryBuilderFactory, QueryBuilder, QueryResult, QueryValueFactory,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Role of a recording builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuilderKind {
    /// Builder created by the test itself.
    Root,
    /// Builder from `new_and_builder`.
    And,
    /// Builder from `new_or_builder`.
    Or,
}

impl fmt::Display for BuilderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderKind::Root => f.write_str("root"),
            BuilderKind::And => f.write_str("and"),
            BuilderKind::Or => f.write_str("or"),
        }
    }
}

/// Identifies a recording builder, e.g. `and#2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuilderId {
    /// Role of the builder.
    pub kind: BuilderKind,
    /// Creation sequence number; the root is 0.
    pub seq: usize,
}

impl fmt::Display for BuilderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.seq)
    }
}

/// One logged call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// The factory created a builder.
    Created(BuilderId),
    /// A column setter was called.
    Setter {
        /// Receiving builder.
        builder: BuilderId,
        /// Setter name without the `set_column_` prefix, e.g. `equals_as_time`.
        method: &'static str,
        /// Table argument.
        table: String,
        /// Column argument.
        column: String,
        /// Value arguments in order.
        values: Vec<Value>,
    },
    /// `set_from_query_builder` was called.
    Attach {
        /// Receiving builder.
        builder: BuilderId,
        /// Rendered text of the attached builder, e.g. `and#1`.
        source: String,
    },
}

/// Shared, ordered call log.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl CallLog {
    fn push(&self, call: RecordedCall) {
        self.calls.lock().push(call);
    }

    /// Returns every call so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Returns the setter calls as `(builder, method, values)`.
    pub fn setters(&self) -> Vec<(BuilderId, &'static str, Vec<Value>)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Setter {
                    builder,
                    method,
                    values,
                    ..
                } => Some((*builder, *method, values.clone())),
                _ => None,
            })
            .collect()
    }

    /// Returns the attach calls as `(receiver, source)`.
    pub fn attaches(&self) -> Vec<(BuilderId, String)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Attach { builder, source } => Some((*builder, source.clone())),
                _ => None,
            })
            .collect()
    }

    /// Counts builders created with the given role.
    pub fn created(&self, kind: BuilderKind) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RecordedCall::Created(id) if id.kind == kind))
            .count()
    }
}

/// Builder that logs every call instead of rendering SQL.
///
/// Its query string is its id (`or#3`), so attach records show which
/// builder was attached.
#[derive(Debug, Clone)]
pub struct RecordingBuilder {
    id: BuilderId,
    log: CallLog,
}

impl RecordingBuilder {
    /// Returns this builder's id.
    pub fn id(&self) -> BuilderId {
        self.id
    }

    fn record(
        &self,
        method: &'static str,
        table: &str,
        column: &str,
        values: &[Value],
    ) -> QueryResult<()> {
        self.log.push(RecordedCall::Setter {
            builder: self.id,
            method,
            table: table.to_string(),
            column: column.to_string(),
            values: values.to_vec(),
        });
        Ok(())
    }
}

impl QueryBuilder for RecordingBuilder {
    fn build_query_string(&self) -> String {
        self.id.to_string()
    }

    fn query_value_factories(&self) -> Vec<QueryValueFactory> {
        Vec::new()
    }
}

impl ChainQueryBuilder for RecordingBuilder {
    fn builder_name(&self) -> &'static str {
        "RecordingBuilder"
    }

    fn set_column_equals(&mut self, table: &str, column: &str, value: &Value) -> QueryResult<()> {
        self.record("equals", table, column, std::slice::from_ref(value))
    }

    fn set_column_before(&mut self, table: &str, column: &str, value: &Value) -> QueryResult<()> {
        self.record("before", table, column, std::slice::from_ref(value))
    }

    fn set_column_after(&mut self, table: &str, column: &str, value: &Value) -> QueryResult<()> {
        self.record("after", table, column, std::slice::from_ref(value))
    }

    fn set_column_between(
        &mut self,
        table: &str,
        column: &str,
        start: &Value,
        end: &Value,
    ) -> QueryResult<()> {
        self.record("between", table, column, &[start.clone(), end.clone()])
    }

    fn set_column_in_list(
        &mut self,
        table: &str,
        column: &str,
        values: &[Value],
    ) -> QueryResult<()> {
        self.record("in_list", table, column, values)
    }

    fn set_column_is_null(&mut self, table: &str, column: &str) -> QueryResult<()> {
        self.record("is_null", table, column, &[])
    }

    fn set_column_is_not_null(&mut self, table: &str, column: &str) -> QueryResult<()> {
        self.record("is_not_null", table, column, &[])
    }

    fn set_column_equals_as_time(
        &mut self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> QueryResult<()> {
        self.record("equals_as_time", table, column, std::slice::from_ref(value))
    }

    fn set_column_before_as_time(
        &mut self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> QueryResult<()> {
        self.record("before_as_time", table, column, std::slice::from_ref(value))
    }

    fn set_column_after_as_time(
        &mut self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> QueryResult<()> {
        self.record("after_as_time", table, column, std::slice::from_ref(value))
    }

    fn set_column_between_as_time(
        &mut self,
        table: &str,
        column: &str,
        start: &Value,
        end: &Value,
    ) -> QueryResult<()> {
        self.record("between_as_time", table, column, &[start.clone(), end.clone()])
    }

    fn set_column_in_list_as_time(
        &mut self,
        table: &str,
        column: &str,
        values: &[Value],
    ) -> QueryResult<()> {
        self.record("in_list_as_time", table, column, values)
    }

    fn set_from_query_builder(&mut self, builder: &dyn QueryBuilder) -> QueryResult<()> {
        self.log.push(RecordedCall::Attach {
            builder: self.id,
            source: builder.build_query_string(),
        });
        Ok(())
    }
}

/// Factory of [`RecordingBuilder`]s sharing one [`CallLog`].
///
/// # Example
///
/// ```rust
/// use entipersist_core::{EntityField, Where};
/// use entipersist_sql::build_chain;
/// use entipersist_testkit::{BuilderKind, RecordingFactory};
///
/// let factory = RecordingFactory::new();
/// let mut root = factory.root_builder();
/// let fields = [EntityField::new("city", "city")];
///
/// build_chain(&mut root, &Where::property_equals("city", "Oulu"), "users", &fields, &[], &factory)
///     .unwrap();
///
/// assert_eq!(factory.log().setters().len(), 1);
/// assert_eq!(factory.log().created(BuilderKind::And), 0);
/// ```
#[derive(Debug, Default)]
pub struct RecordingFactory {
    log: CallLog,
    next_seq: AtomicUsize,
}

impl RecordingFactory {
    /// Creates a factory with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared log.
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Returns the root builder (`root#0`). Its creation is not logged.
    pub fn root_builder(&self) -> RecordingBuilder {
        RecordingBuilder {
            id: BuilderId {
                kind: BuilderKind::Root,
                seq: 0,
            },
            log: self.log.clone(),
        }
    }

    fn create(&self, kind: BuilderKind) -> Box<dyn ChainQueryBuilder> {
        let id = BuilderId {
            kind,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed) + 1,
        };
        self.log.push(RecordedCall::Created(id));
        Box::new(RecordingBuilder {
            id,
            log: self.log.clone(),
        })
    }
}

impl ChainQueryBuilderFactory for RecordingFactory {
    fn new_and_builder(&self) -> Box<dyn ChainQueryBuilder> {
        self.create(BuilderKind::And)
    }

    fn new_or_builder(&self) -> Box<dyn ChainQueryBuilder> {
        self.create(BuilderKind::Or)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_render_kind_and_sequence() {
        let factory = RecordingFactory::new();
        let or = factory.new_or_builder();
        let and = factory.new_and_builder();

        assert_eq!(factory.root_builder().build_query_string(), "root#0");
        assert_eq!(or.build_query_string(), "or#1");
        assert_eq!(and.build_query_string(), "and#2");
        assert_eq!(factory.log().created(BuilderKind::Or), 1);
        assert_eq!(factory.log().created(BuilderKind::And), 1);
    }

    #[test]
    fn calls_are_logged_in_order() {
        let factory = RecordingFactory::new();
        let mut root = factory.root_builder();
        let and = factory.new_and_builder();

        root.set_column_in_list("t", "c", &[Value::from(1), Value::from(2)]).unwrap();
        root.set_from_query_builder(&and.to_fragment()).unwrap();

        let calls = factory.log().calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], RecordedCall::Created(_)));
        assert_eq!(
            factory.log().setters(),
            [(root.id(), "in_list", vec![Value::from(1), Value::from(2)])]
        );
        assert_eq!(factory.log().attaches(), [(root.id(), "and#1".to_string())]);
    }
}
