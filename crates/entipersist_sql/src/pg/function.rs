//! Aggregate function builders.

use crate::chain::{QueryBuilder, QueryFragment, QueryValueFactory};
use crate::pg::utils::build_numbered;
use entipersist_core::Value;
use std::fmt;

/// Aggregate functions a [`PgFunctionBuilder`] can wrap a formula in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PgAggregate {
    /// `array_agg`
    ArrayAgg,
    /// `jsonb_agg`
    JsonbAgg,
}

impl PgAggregate {
    /// Returns the SQL function name.
    pub fn function_name(self) -> &'static str {
        match self {
            PgAggregate::ArrayAgg => "array_agg",
            PgAggregate::JsonbAgg => "jsonb_agg",
        }
    }

    fn builder_name(self) -> &'static str {
        match self {
            PgAggregate::ArrayAgg => "PgArrayAggBuilder",
            PgAggregate::JsonbAgg => "PgJsonAggBuilder",
        }
    }
}

/// Renders `name([DISTINCT] formula)`.
///
/// The formula is captured from another builder when set; later changes
/// to that builder are not seen. Parameters keep the formula's order.
///
/// # Example
///
/// ```rust
/// use entipersist_sql::{PgColumnBuilder, PgFunctionBuilder, QueryBuilder};
///
/// let ids = PgFunctionBuilder::array_agg(&PgColumnBuilder::new("carts", "id"), true);
/// assert_eq!(ids.build_query_string(), r#"array_agg(DISTINCT "carts"."id")"#);
/// assert_eq!(ids.to_string(), r#"PgArrayAggBuilder "array_agg(DISTINCT "carts"."id")" with "#);
/// ```
#[derive(Debug, Clone)]
pub struct PgFunctionBuilder {
    aggregate: PgAggregate,
    distinct: bool,
    formula: QueryFragment,
}

impl PgFunctionBuilder {
    /// Wraps the current fragment of `formula` in `aggregate`.
    pub fn new(aggregate: PgAggregate, formula: &dyn QueryBuilder, distinct: bool) -> Self {
        Self {
            aggregate,
            distinct,
            formula: formula.to_fragment(),
        }
    }

    /// `array_agg([DISTINCT] formula)`.
    pub fn array_agg(formula: &dyn QueryBuilder, distinct: bool) -> Self {
        Self::new(PgAggregate::ArrayAgg, formula, distinct)
    }

    /// `jsonb_agg([DISTINCT] formula)`.
    pub fn jsonb_agg(formula: &dyn QueryBuilder, distinct: bool) -> Self {
        Self::new(PgAggregate::JsonbAgg, formula, distinct)
    }

    /// Replaces the wrapped formula.
    pub fn set_formula_from_query_builder(&mut self, builder: &dyn QueryBuilder) {
        self.formula = builder.to_fragment();
    }

    /// Returns the aggregate.
    pub fn aggregate(&self) -> PgAggregate {
        self.aggregate
    }

    /// Returns `true` for `DISTINCT` aggregation.
    pub fn is_distinct(&self) -> bool {
        self.distinct
    }
}

impl QueryBuilder for PgFunctionBuilder {
    fn build_query_string(&self) -> String {
        let distinct = if self.distinct { "DISTINCT " } else { "" };
        format!(
            "{}({distinct}{})",
            self.aggregate.function_name(),
            self.formula.sql()
        )
    }

    fn query_value_factories(&self) -> Vec<QueryValueFactory> {
        self.formula.query_value_factories()
    }

    fn build(&self) -> (String, Vec<Value>) {
        build_numbered(self)
    }
}

impl fmt::Display for PgFunctionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sql, values) = self.build();
        let values = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{} \"{sql}\" with {values}", self.aggregate.builder_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainQueryBuilder;
    use crate::pg::PgChainBuilder;

    fn filter() -> PgChainBuilder {
        let mut b = PgChainBuilder::and();
        b.set_column_equals("carts", "user_id", &Value::from("u1")).unwrap();
        b.set_column_after("carts", "total", &Value::from(100)).unwrap();
        b
    }

    #[test]
    fn wraps_formula_with_and_without_distinct() {
        let plain = PgFunctionBuilder::jsonb_agg(&filter(), false);
        let distinct = PgFunctionBuilder::jsonb_agg(&filter(), true);

        assert_eq!(
            plain.build().0,
            r#"jsonb_agg("carts"."user_id" = $1 AND "carts"."total" > $2)"#
        );
        assert_eq!(
            distinct.build_query_string(),
            r#"jsonb_agg(DISTINCT "carts"."user_id" = ? AND "carts"."total" > ?)"#
        );
        assert!(distinct.is_distinct());
        assert_eq!(distinct.aggregate(), PgAggregate::JsonbAgg);
    }

    #[test]
    fn values_follow_formula_order() {
        let agg = PgFunctionBuilder::array_agg(&filter(), false);
        assert_eq!(agg.build_query_values(), [Value::from("u1"), Value::from(100)]);
    }

    #[test]
    fn display_lists_values() {
        let agg = PgFunctionBuilder::array_agg(&filter(), true);
        assert_eq!(
            agg.to_string(),
            r#"PgArrayAggBuilder "array_agg(DISTINCT "carts"."user_id" = $1 AND "carts"."total" > $2)" with u1 100"#
        );

        let json = PgFunctionBuilder::jsonb_agg(&filter(), false);
        assert!(json.to_string().starts_with("PgJsonAggBuilder \"jsonb_agg("));
    }

    #[test]
    fn formula_is_captured_when_set() {
        let mut source = filter();
        let mut agg = PgFunctionBuilder::array_agg(&source, false);
        source.set_column_is_null("carts", "deleted").unwrap();
        assert_eq!(agg.build_query_values().len(), 2);
        assert!(!agg.build_query_string().contains("IS NULL"));

        agg.set_formula_from_query_builder(&source);
        assert!(agg.build_query_string().contains(r#""carts"."deleted" IS NULL"#));
    }
}
