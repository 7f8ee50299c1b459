//! Lowering of condition trees into builder graphs.

use crate::chain::{ChainQueryBuilder, ChainQueryBuilderFactory};
use crate::error::QueryResult;
use entipersist_core::{Condition, EntityField, PersistError, Predicate, TemporalProperty, Where};

/// Builds `condition` into `builder`.
///
/// Leaves become setter calls on the current builder, choosing the time
/// variant for temporal properties. `And` children are built into the
/// current builder in order. An `Or` gets a fresh OR builder from
/// `factory`; each child is built into its own fresh AND builder that is
/// then attached to the OR builder, except nested `Or` children which use
/// the OR builder as their parent. The OR builder is attached to the
/// current builder last. Leaf setters are never called on an OR builder.
///
/// # Errors
///
/// Fails on the first property missing from `fields` and on the first
/// predicate the builder rejects. The builder graph is left partially
/// built in that case and should be discarded.
///
/// # Example
///
/// ```rust
/// use entipersist_core::{EntityField, Where};
/// use entipersist_sql::{build_chain, PgChainBuilder, PgChainBuilderFactory, QueryBuilder};
///
/// let fields = [EntityField::new("city", "city"), EntityField::new("age", "age")];
/// let condition = Where::or([
///     Where::property_equals("city", "Oulu"),
///     Where::property_after("age", 17),
/// ]);
///
/// let mut builder = PgChainBuilder::and();
/// build_chain(&mut builder, &condition, "users", &fields, &[], &PgChainBuilderFactory).unwrap();
///
/// let (sql, values) = builder.build();
/// assert_eq!(sql, r#"(("users"."city" = $1) OR ("users"."age" > $2))"#);
/// assert_eq!(values.len(), 2);
/// ```
pub fn build_chain(
    builder: &mut dyn ChainQueryBuilder,
    condition: &Where,
    table_name: &str,
    fields: &[EntityField],
    temporal_properties: &[TemporalProperty],
    factory: &dyn ChainQueryBuilderFactory,
) -> QueryResult<()> {
    ChainContext {
        table_name,
        fields,
        temporal_properties,
        factory,
    }
    .build(builder, condition)
}

struct ChainContext<'a> {
    table_name: &'a str,
    fields: &'a [EntityField],
    temporal_properties: &'a [TemporalProperty],
    factory: &'a dyn ChainQueryBuilderFactory,
}

impl ChainContext<'_> {
    fn build(&self, builder: &mut dyn ChainQueryBuilder, condition: &Where) -> QueryResult<()> {
        match condition {
            Where::Condition(leaf) => self.set_condition(builder, leaf),
            Where::And(children) => children
                .iter()
                .try_for_each(|child| self.build(builder, child)),
            Where::Or(children) => {
                let mut or_builder = self.factory.new_or_builder();
                for child in children {
                    if let Where::Or(_) = child {
                        self.build(or_builder.as_mut(), child)?;
                    } else {
                        let mut and_builder = self.factory.new_and_builder();
                        self.build(and_builder.as_mut(), child)?;
                        or_builder.set_from_query_builder(&and_builder.to_fragment())?;
                    }
                }
                builder.set_from_query_builder(&or_builder.to_fragment())
            }
        }
    }

    fn set_condition(
        &self,
        builder: &mut dyn ChainQueryBuilder,
        leaf: &Condition,
    ) -> QueryResult<()> {
        let property = leaf.property_name.as_str();
        let column = self
            .fields
            .iter()
            .find(|f| f.property_name == property)
            .map(|f| f.column_name.as_str())
            .ok_or_else(|| PersistError::unknown_property(self.table_name, property))?;
        let temporal = self
            .temporal_properties
            .iter()
            .any(|p| p.property_name == property);
        let table = self.table_name;

        tracing::trace!(
            table,
            property,
            column,
            predicate = leaf.predicate.kind_name(),
            temporal,
            "set column predicate"
        );

        match &leaf.predicate {
            Predicate::Equals(v) if temporal => builder.set_column_equals_as_time(table, column, v),
            Predicate::Equals(v) => builder.set_column_equals(table, column, v),
            Predicate::Before(v) if temporal => builder.set_column_before_as_time(table, column, v),
            Predicate::Before(v) => builder.set_column_before(table, column, v),
            Predicate::After(v) if temporal => builder.set_column_after_as_time(table, column, v),
            Predicate::After(v) => builder.set_column_after(table, column, v),
            Predicate::Between(start, end) if temporal => {
                builder.set_column_between_as_time(table, column, start, end)
            }
            Predicate::Between(start, end) => builder.set_column_between(table, column, start, end),
            Predicate::In(values) if temporal => {
                builder.set_column_in_list_as_time(table, column, values)
            }
            Predicate::In(values) => builder.set_column_in_list(table, column, values),
            Predicate::IsNull => builder.set_column_is_null(table, column),
            Predicate::IsNotNull => builder.set_column_is_not_null(table, column),
        }
    }
}
