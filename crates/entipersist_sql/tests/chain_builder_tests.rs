//! Call-level behavior of `build_chain` using recording builders.

use entipersist_core::{EntityField, PersistError, TemporalProperty, Value, Where};
use entipersist_sql::{build_chain, QueryError, QueryResult};
use entipersist_testkit::prelude::*;

const TABLE: &str = "app.users";

fn fields() -> Vec<EntityField> {
    vec![
        EntityField::new("city", "city_column"),
        EntityField::new("age", "age_column"),
        EntityField::new("createdAt", "created_at"),
    ]
}

fn temporal() -> Vec<TemporalProperty> {
    vec![TemporalProperty::new("createdAt")]
}

/// Builds `condition` into a fresh root builder and returns the factory
/// holding the call log.
fn run(condition: &Where) -> (RecordingFactory, RecordingBuilder, QueryResult<()>) {
    init_tracing();
    let factory = RecordingFactory::new();
    let mut root = factory.root_builder();
    let result = build_chain(&mut root, condition, TABLE, &fields(), &temporal(), &factory);
    (factory, root, result)
}

fn id(kind: BuilderKind, seq: usize) -> BuilderId {
    BuilderId { kind, seq }
}

mod leaves {
    use super::*;

    #[test]
    fn equals_calls_setter_on_current_builder() {
        let (factory, root, result) = run(&Where::property_equals("city", "New York"));
        result.unwrap();

        assert_eq!(
            factory.log().calls(),
            [RecordedCall::Setter {
                builder: root.id(),
                method: "equals",
                table: TABLE.into(),
                column: "city_column".into(),
                values: vec![Value::from("New York")],
            }]
        );
        assert_eq!(factory.log().created(BuilderKind::And), 0);
        assert_eq!(factory.log().created(BuilderKind::Or), 0);
    }

    #[test]
    fn each_predicate_maps_to_its_setter() {
        let cases = [
            (Where::property_before("age", 30), "before", vec![Value::from(30)]),
            (Where::property_after("age", 30), "after", vec![Value::from(30)]),
            (
                Where::property_between("age", 18, 30),
                "between",
                vec![Value::from(18), Value::from(30)],
            ),
            (
                Where::property_in("city", ["Oulu", "Turku"]),
                "in_list",
                vec![Value::from("Oulu"), Value::from("Turku")],
            ),
            (Where::property_is_null("city"), "is_null", vec![]),
            (Where::property_is_not_null("city"), "is_not_null", vec![]),
        ];

        for (condition, method, values) in cases {
            let (factory, root, result) = run(&condition);
            result.unwrap();
            assert_eq!(factory.log().setters(), [(root.id(), method, values)], "{condition}");
        }
    }

    #[test]
    fn temporal_properties_use_time_setters() {
        let cases = [
            (Where::property_equals("createdAt", "2024-01-01"), "equals_as_time"),
            (Where::property_before("createdAt", "2024-01-01"), "before_as_time"),
            (Where::property_after("createdAt", "2024-01-01"), "after_as_time"),
            (Where::property_between("createdAt", "a", "b"), "between_as_time"),
            (Where::property_in("createdAt", ["a"]), "in_list_as_time"),
            (Where::property_is_null("createdAt"), "is_null"),
        ];

        for (condition, method) in cases {
            let (factory, _, result) = run(&condition);
            result.unwrap();
            let setters = factory.log().setters();
            assert_eq!(setters.len(), 1);
            assert_eq!(setters[0].1, method, "{condition}");
        }
    }

    #[test]
    fn unknown_property_is_fatal() {
        let (factory, _, result) = run(&Where::property_equals("nickname", "x"));

        assert_eq!(
            result,
            Err(QueryError::Persist(PersistError::unknown_property(TABLE, "nickname")))
        );
        assert!(factory.log().calls().is_empty());
    }
}

mod groups {
    use super::*;

    #[test]
    fn and_calls_setters_in_order_on_same_builder() {
        let (factory, root, result) = run(&Where::and([
            Where::property_equals("city", "Oulu"),
            Where::property_after("age", 17),
        ]));
        result.unwrap();

        assert_eq!(
            factory.log().setters(),
            [
                (root.id(), "equals", vec![Value::from("Oulu")]),
                (root.id(), "after", vec![Value::from(17)]),
            ]
        );
        assert_eq!(factory.log().created(BuilderKind::And), 0);
        assert_eq!(factory.log().created(BuilderKind::Or), 0);
        assert!(factory.log().attaches().is_empty());
    }

    #[test]
    fn or_of_leaves_gets_one_and_builder_per_child() {
        let (factory, root, result) = run(&Where::or([
            Where::property_equals("city", "Oulu"),
            Where::property_equals("city", "Turku"),
        ]));
        result.unwrap();

        let or = id(BuilderKind::Or, 1);
        assert_eq!(
            factory.log().setters(),
            [
                (id(BuilderKind::And, 2), "equals", vec![Value::from("Oulu")]),
                (id(BuilderKind::And, 3), "equals", vec![Value::from("Turku")]),
            ]
        );
        assert_eq!(
            factory.log().attaches(),
            [
                (or, "and#2".to_string()),
                (or, "and#3".to_string()),
                (root.id(), "or#1".to_string()),
            ]
        );
        assert!(factory.log().setters().iter().all(|(b, _, _)| b.kind != BuilderKind::Or));
    }

    #[test]
    fn or_of_ands() {
        let (factory, root, result) = run(&Where::or([
            Where::and([
                Where::property_equals("city", "New York"),
                Where::property_equals("city", "Los Angeles"),
            ]),
            Where::and([
                Where::property_equals("age", 18),
                Where::property_equals("age", 30),
            ]),
        ]));
        result.unwrap();

        let log = factory.log();
        assert_eq!(log.created(BuilderKind::And), 2);
        assert_eq!(log.created(BuilderKind::Or), 1);

        let values: Vec<Value> = log.setters().into_iter().flat_map(|(_, _, v)| v).collect();
        assert_eq!(
            values,
            [
                Value::from("New York"),
                Value::from("Los Angeles"),
                Value::from(18),
                Value::from(30),
            ]
        );

        let or = id(BuilderKind::Or, 1);
        let attaches = log.attaches();
        assert_eq!(attaches.iter().filter(|(b, _)| *b == or).count(), 2);
        assert_eq!(attaches.last(), Some(&(root.id(), "or#1".to_string())));
    }

    #[test]
    fn nested_or_uses_or_builder_as_parent() {
        let (factory, root, result) = run(&Where::or([
            Where::property_equals("city", "Oulu"),
            Where::or([
                Where::property_equals("age", 1),
                Where::property_equals("age", 2),
            ]),
        ]));
        result.unwrap();

        let outer = id(BuilderKind::Or, 1);
        let inner = id(BuilderKind::Or, 3);
        assert_eq!(
            factory.log().attaches(),
            [
                (outer, "and#2".to_string()),
                (inner, "and#4".to_string()),
                (inner, "and#5".to_string()),
                (outer, "or#3".to_string()),
                (root.id(), "or#1".to_string()),
            ]
        );
    }

    #[test]
    fn and_containing_or() {
        let (factory, root, result) = run(&Where::and([
            Where::property_after("age", 17),
            Where::or([
                Where::property_equals("city", "Oulu"),
                Where::property_is_null("city"),
            ]),
        ]));
        result.unwrap();

        let setters = factory.log().setters();
        assert_eq!(setters[0], (root.id(), "after", vec![Value::from(17)]));
        assert_eq!(setters.len(), 3);
        assert_eq!(
            factory.log().attaches().last(),
            Some(&(root.id(), "or#1".to_string()))
        );
    }

    #[test]
    fn error_inside_or_stops_the_walk() {
        let (factory, _, result) = run(&Where::or([
            Where::property_equals("city", "Oulu"),
            Where::property_equals("nickname", "x"),
            Where::property_equals("city", "Turku"),
        ]));

        assert!(matches!(result, Err(QueryError::Persist(_))));
        assert_eq!(factory.log().setters().len(), 1);
        assert_eq!(factory.log().attaches().len(), 1);
    }
}
