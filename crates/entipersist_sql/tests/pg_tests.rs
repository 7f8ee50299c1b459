//! PostgreSQL rendering of fixture conditions.

use chrono::{TimeZone, Utc};
use entipersist_core::{Value, Where};
use entipersist_sql::{
    build_chain, build_where_clause, ChainQueryBuilder, PgChainBuilder, PgChainBuilderFactory,
    PgColumnBuilder, PgFunctionBuilder, PgQueryConfig, QueryBuilder,
};
use entipersist_testkit::prelude::*;
use proptest::prelude::*;

#[test]
fn fixture_condition_renders_with_schema() {
    init_tracing();
    let users = users_metadata();
    let (sql, values) = build_where_clause(
        &PgQueryConfig::new().schema("shop"),
        &users,
        &Where::and([
            Where::property_in("city", ["Oulu", "Turku"]),
            Where::property_after("createdAt", "2024-01-01T00:00:00Z"),
        ]),
    )
    .unwrap();

    assert_eq!(
        sql,
        r#""shop"."users"."city" IN ($1, $2) AND "shop"."users"."created_at" > $3::timestamptz"#
    );
    assert_eq!(
        values,
        [
            Value::from("Oulu"),
            Value::from("Turku"),
            Value::from("2024-01-01T00:00:00Z"),
        ]
    );
}

#[test]
fn timestamp_ranges_cast_in_declared_order() {
    let users = users_metadata();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap();

    let (sql, values) = build_where_clause(
        &PgQueryConfig::new(),
        &users,
        &Where::or([
            Where::property_before("createdAt", start),
            Where::property_between("createdAt", start, end),
        ]),
    )
    .unwrap();

    assert_eq!(
        sql,
        r#"(("users"."created_at" < $1::timestamptz) OR ("users"."created_at" BETWEEN $2::timestamptz AND $3::timestamptz))"#
    );
    assert_eq!(
        values,
        [Value::from(start), Value::from(start), Value::from(end)]
    );
}

#[test]
fn aggregate_over_filtered_chain() {
    let carts = carts_metadata();
    let mut filter = PgChainBuilder::and();
    build_chain(
        &mut filter,
        &Where::or([
            Where::property_equals("userId", "u1"),
            Where::property_equals("userId", "u2"),
        ]),
        &carts.table_name,
        &carts.fields,
        &carts.temporal_properties,
        &PgChainBuilderFactory,
    )
    .unwrap();

    let agg = PgFunctionBuilder::array_agg(&filter, true);
    assert_eq!(
        agg.build().0,
        r#"array_agg(DISTINCT (("carts"."user_id" = $1) OR ("carts"."user_id" = $2)))"#
    );
    assert_eq!(
        agg.to_string(),
        r#"PgArrayAggBuilder "array_agg(DISTINCT (("carts"."user_id" = $1) OR ("carts"."user_id" = $2)))" with u1 u2"#
    );
}

#[test]
fn aggregate_can_be_attached_to_a_chain() {
    let mut chain = PgChainBuilder::and();
    let ids = PgFunctionBuilder::jsonb_agg(&PgColumnBuilder::all_columns("carts"), false);
    chain.set_from_query_builder(&ids).unwrap();
    assert_eq!(chain.build_query_string(), r#"(jsonb_agg("carts".*))"#);
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn placeholders_match_parameter_count(condition in where_strategy(3)) {
        let (sql, values) =
            build_where_clause(&PgQueryConfig::new(), &users_metadata(), &condition).unwrap();
        let placeholders = sql.matches('$').count();
        prop_assert_eq!(placeholders, values.len());
        if !values.is_empty() {
            let last = format!("${}", values.len());
            prop_assert!(sql.contains(&last));
        }
    }
}
