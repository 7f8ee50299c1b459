//! PostgreSQL AND/OR chain builders.

use crate::chain::{
    ChainQueryBuilder, ChainQueryBuilderFactory, QueryBuilder, QueryFragment, QueryValueFactory,
};
use crate::error::QueryResult;
use crate::pg::utils::{build_numbered, quote_table_column};
use entipersist_core::Value;

const TIME_CAST: &str = "::timestamptz";

/// Connective joining the terms of a [`PgChainBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PgConnective {
    /// All terms must hold. An empty chain renders `TRUE`.
    And,
    /// Any term must hold. An empty chain renders `FALSE`.
    Or,
}

impl PgConnective {
    fn separator(self) -> &'static str {
        match self {
            PgConnective::And => " AND ",
            PgConnective::Or => " OR ",
        }
    }

    fn empty(self) -> &'static str {
        match self {
            PgConnective::And => "TRUE",
            PgConnective::Or => "FALSE",
        }
    }
}

/// Collects PostgreSQL predicates joined by one connective.
///
/// Attached builders become parenthesized terms. Parameters are numbered
/// `$1..$n` by [`build`](QueryBuilder::build) in the order they appear.
///
/// # Example
///
/// ```rust
/// use entipersist_core::Value;
/// use entipersist_sql::{ChainQueryBuilder, PgChainBuilder, QueryBuilder};
///
/// let mut or = PgChainBuilder::or();
/// or.set_column_equals("users", "city", &Value::from("Oulu")).unwrap();
/// or.set_column_is_null("users", "city").unwrap();
///
/// let mut and = PgChainBuilder::and();
/// and.set_column_after("users", "age", &Value::from(17)).unwrap();
/// and.set_from_query_builder(&or).unwrap();
///
/// let (sql, values) = and.build();
/// assert_eq!(
///     sql,
///     r#""users"."age" > $1 AND ("users"."city" = $2 OR "users"."city" IS NULL)"#
/// );
/// assert_eq!(values, [Value::from(17), Value::from("Oulu")]);
/// ```
#[derive(Debug, Clone)]
pub struct PgChainBuilder {
    connective: PgConnective,
    parts: Vec<QueryFragment>,
}

impl PgChainBuilder {
    /// Creates an empty chain.
    pub fn new(connective: PgConnective) -> Self {
        Self {
            connective,
            parts: Vec::new(),
        }
    }

    /// Creates an empty AND chain.
    pub fn and() -> Self {
        Self::new(PgConnective::And)
    }

    /// Creates an empty OR chain.
    pub fn or() -> Self {
        Self::new(PgConnective::Or)
    }

    /// Returns the connective.
    pub fn connective(&self) -> PgConnective {
        self.connective
    }

    /// Returns `true` if no term has been added.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn push(&mut self, sql: String, values: Vec<Value>) -> QueryResult<()> {
        self.parts.push(QueryFragment::with_values(sql, values));
        Ok(())
    }

    fn compare(
        &mut self,
        table: &str,
        column: &str,
        op: &str,
        value: &Value,
        cast: &str,
    ) -> QueryResult<()> {
        let sql = format!("{} {op} ?{cast}", quote_table_column(table, column));
        self.push(sql, vec![value.clone()])
    }

    /// `= NULL` never holds in SQL, so a null operand becomes `IS NULL`.
    fn equals(&mut self, table: &str, column: &str, value: &Value, cast: &str) -> QueryResult<()> {
        if value.is_null() {
            return self.set_column_is_null(table, column);
        }
        self.compare(table, column, "=", value, cast)
    }

    fn between(
        &mut self,
        table: &str,
        column: &str,
        start: &Value,
        end: &Value,
        cast: &str,
    ) -> QueryResult<()> {
        let sql = format!(
            "{} BETWEEN ?{cast} AND ?{cast}",
            quote_table_column(table, column)
        );
        self.push(sql, vec![start.clone(), end.clone()])
    }

    fn in_list(
        &mut self,
        table: &str,
        column: &str,
        values: &[Value],
        cast: &str,
    ) -> QueryResult<()> {
        let column_sql = quote_table_column(table, column);
        let has_null = values.iter().any(Value::is_null);
        let values: Vec<Value> = values.iter().filter(|v| !v.is_null()).cloned().collect();

        let sql = match (values.is_empty(), has_null) {
            (true, false) => "FALSE".to_string(),
            (true, true) => format!("{column_sql} IS NULL"),
            (false, _) => {
                let markers = vec![format!("?{cast}"); values.len()].join(", ");
                let in_sql = format!("{column_sql} IN ({markers})");
                if has_null {
                    format!("({in_sql} OR {column_sql} IS NULL)")
                } else {
                    in_sql
                }
            }
        };
        self.push(sql, values)
    }
}

impl QueryBuilder for PgChainBuilder {
    fn build_query_string(&self) -> String {
        if self.parts.is_empty() {
            return self.connective.empty().to_string();
        }
        self.parts
            .iter()
            .map(QueryFragment::sql)
            .collect::<Vec<_>>()
            .join(self.connective.separator())
    }

    fn query_value_factories(&self) -> Vec<QueryValueFactory> {
        self.parts
            .iter()
            .flat_map(|part| part.query_value_factories())
            .collect()
    }

    fn build(&self) -> (String, Vec<Value>) {
        build_numbered(self)
    }
}

impl ChainQueryBuilder for PgChainBuilder {
    fn builder_name(&self) -> &'static str {
        match self.connective {
            PgConnective::And => "PgAndChainBuilder",
            PgConnective::Or => "PgOrChainBuilder",
        }
    }

    fn set_column_equals(&mut self, table: &str, column: &str, value: &Value) -> QueryResult<()> {
        self.equals(table, column, value, "")
    }

    fn set_column_before(&mut self, table: &str, column: &str, value: &Value) -> QueryResult<()> {
        self.compare(table, column, "<", value, "")
    }

    fn set_column_after(&mut self, table: &str, column: &str, value: &Value) -> QueryResult<()> {
        self.compare(table, column, ">", value, "")
    }

    fn set_column_between(
        &mut self,
        table: &str,
        column: &str,
        start: &Value,
        end: &Value,
    ) -> QueryResult<()> {
        self.between(table, column, start, end, "")
    }

    fn set_column_in_list(
        &mut self,
        table: &str,
        column: &str,
        values: &[Value],
    ) -> QueryResult<()> {
        self.in_list(table, column, values, "")
    }

    fn set_column_is_null(&mut self, table: &str, column: &str) -> QueryResult<()> {
        let sql = format!("{} IS NULL", quote_table_column(table, column));
        self.push(sql, Vec::new())
    }

    fn set_column_is_not_null(&mut self, table: &str, column: &str) -> QueryResult<()> {
        let sql = format!("{} IS NOT NULL", quote_table_column(table, column));
        self.push(sql, Vec::new())
    }

    fn set_column_equals_as_time(
        &mut self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> QueryResult<()> {
        self.equals(table, column, value, TIME_CAST)
    }

    fn set_column_before_as_time(
        &mut self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> QueryResult<()> {
        self.compare(table, column, "<", value, TIME_CAST)
    }

    fn set_column_after_as_time(
        &mut self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> QueryResult<()> {
        self.compare(table, column, ">", value, TIME_CAST)
    }

    fn set_column_between_as_time(
        &mut self,
        table: &str,
        column: &str,
        start: &Value,
        end: &Value,
    ) -> QueryResult<()> {
        self.between(table, column, start, end, TIME_CAST)
    }

    fn set_column_in_list_as_time(
        &mut self,
        table: &str,
        column: &str,
        values: &[Value],
    ) -> QueryResult<()> {
        self.in_list(table, column, values, TIME_CAST)
    }

    fn set_from_query_builder(&mut self, builder: &dyn QueryBuilder) -> QueryResult<()> {
        let sql = format!("({})", builder.build_query_string());
        self.parts
            .push(QueryFragment::new(sql, builder.query_value_factories()));
        Ok(())
    }
}

/// Creates [`PgChainBuilder`]s for [`build_chain`](crate::build_chain).
#[derive(Debug, Clone, Copy, Default)]
pub struct PgChainBuilderFactory;

impl ChainQueryBuilderFactory for PgChainBuilderFactory {
    fn new_and_builder(&self) -> Box<dyn ChainQueryBuilder> {
        Box::new(PgChainBuilder::and())
    }

    fn new_or_builder(&self) -> Box<dyn ChainQueryBuilder> {
        Box::new(PgChainBuilder::or())
    }
}
