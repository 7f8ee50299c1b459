//! Whole-condition lowering for PostgreSQL.

use crate::chain::{build_chain, QueryBuilder};
use crate::error::QueryResult;
use crate::pg::{PgChainBuilder, PgChainBuilderFactory, PgQueryConfig};
use entipersist_core::{EntityMetadata, Value, Where};

/// Lowers `condition` into the body of a `WHERE` clause for the table
/// described by `metadata`.
///
/// Columns are qualified with the configured schema and parameters are
/// numbered `$1..$n`.
///
/// # Errors
///
/// Fails if the condition names a property missing from `metadata`.
///
/// # Example
///
/// ```rust
/// use entipersist_core::{EntityField, EntityMetadata, Value, Where};
/// use entipersist_sql::{build_where_clause, PgQueryConfig};
///
/// let users = EntityMetadata::new("users", "id")
///     .with_field(EntityField::new("id", "user_id"))
///     .with_field(EntityField::new("city", "city"));
///
/// let (sql, values) = build_where_clause(
///     &PgQueryConfig::new().schema("app"),
///     &users,
///     &Where::property_in("city", ["Oulu", "Turku"]),
/// )
/// .unwrap();
///
/// assert_eq!(sql, r#""app"."users"."city" IN ($1, $2)"#);
/// assert_eq!(values, [Value::from("Oulu"), Value::from("Turku")]);
/// ```
pub fn build_where_clause(
    config: &PgQueryConfig,
    metadata: &EntityMetadata,
    condition: &Where,
) -> QueryResult<(String, Vec<Value>)> {
    let table = config.complete_table_name(&metadata.table_name);
    let mut builder = PgChainBuilder::and();
    build_chain(
        &mut builder,
        condition,
        &table,
        &metadata.fields,
        &metadata.temporal_properties,
        &PgChainBuilderFactory,
    )?;
    let (sql, values) = builder.build();
    tracing::debug!(table = %table, parameters = values.len(), "built where clause");
    Ok((sql, values))
}
