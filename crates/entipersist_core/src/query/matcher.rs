//! Compiles condition trees into in-memory predicates.

use crate::entity::Entity;
use crate::query::{Condition, Predicate, Where};
use crate::value::Value;
use std::cmp::Ordering;

/// Compiled predicate over an entity's properties.
pub type Matcher = Box<dyn Fn(&Entity) -> bool + Send + Sync>;

/// Compiles a condition tree into a [`Matcher`].
///
/// Leaves read the named property from the entity; a missing property
/// never matches a comparison. `And` and `Or` short-circuit in
/// declaration order. An empty `And` matches everything, an empty `Or`
/// matches nothing.
///
/// # Example
///
/// ```rust
/// use entipersist_core::{build_matcher_from_where, Entity, Where};
///
/// let matcher = build_matcher_from_where(&Where::property_between("age", 18, 30));
///
/// assert!(matcher(&Entity::new("users").with("age", 18)));
/// assert!(!matcher(&Entity::new("users").with("age", 31)));
/// assert!(!matcher(&Entity::new("users")));
/// ```
pub fn build_matcher_from_where(condition: &Where) -> Matcher {
    match condition {
        Where::Condition(leaf) => build_condition_matcher(leaf),
        Where::And(children) => {
            let matchers: Vec<Matcher> = children.iter().map(build_matcher_from_where).collect();
            Box::new(move |entity| matchers.iter().all(|m| m(entity)))
        }
        Where::Or(children) => {
            let matchers: Vec<Matcher> = children.iter().map(build_matcher_from_where).collect();
            Box::new(move |entity| matchers.iter().any(|m| m(entity)))
        }
    }
}

fn build_condition_matcher(condition: &Condition) -> Matcher {
    let property = condition.property_name.clone();
    match condition.predicate.clone() {
        Predicate::Equals(expected) => {
            Box::new(move |entity| entity.get(&property) == Some(&expected))
        }
        Predicate::Before(limit) => Box::new(move |entity| {
            compare_property(entity, &property, &limit) == Some(Ordering::Less)
        }),
        Predicate::After(limit) => Box::new(move |entity| {
            compare_property(entity, &property, &limit) == Some(Ordering::Greater)
        }),
        Predicate::Between(start, end) => Box::new(move |entity| {
            matches!(
                compare_property(entity, &property, &start),
                Some(Ordering::Greater | Ordering::Equal)
            ) && matches!(
                compare_property(entity, &property, &end),
                Some(Ordering::Less | Ordering::Equal)
            )
        }),
        Predicate::In(values) => Box::new(move |entity| {
            entity
                .get(&property)
                .is_some_and(|value| values.contains(value))
        }),
        Predicate::IsNull => {
            Box::new(move |entity| entity.get(&property).map_or(true, Value::is_null))
        }
        Predicate::IsNotNull => {
            Box::new(move |entity| entity.get(&property).is_some_and(|v| !v.is_null()))
        }
    }
}

fn compare_property(entity: &Entity, property: &str, operand: &Value) -> Option<Ordering> {
    entity.get(property)?.compare(operand)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(city: &str, age: i64) -> Entity {
        Entity::new("users").with("city", city).with("age", age)
    }

    #[test]
    fn equals_is_strict_and_case_sensitive() {
        let m = build_matcher_from_where(&Where::property_equals("city", "Oulu"));
        assert!(m(&user("Oulu", 1)));
        assert!(!m(&user("oulu", 1)));

        let m = build_matcher_from_where(&Where::property_equals("age", "1"));
        assert!(!m(&user("Oulu", 1)));
    }

    #[test]
    fn before_and_after_are_strict() {
        let before = build_matcher_from_where(&Where::property_before("age", 30));
        let after = build_matcher_from_where(&Where::property_after("age", 30));

        assert!(before(&user("x", 29)));
        assert!(!before(&user("x", 30)));
        assert!(after(&user("x", 31)));
        assert!(!after(&user("x", 30)));
    }

    #[test]
    fn between_is_inclusive() {
        let m = build_matcher_from_where(&Where::property_between("age", 18, 30));
        assert!(m(&user("x", 18)));
        assert!(m(&user("x", 30)));
        assert!(!m(&user("x", 17)));
        assert!(!m(&user("x", 31)));
    }

    #[test]
    fn in_list_membership() {
        let m = build_matcher_from_where(&Where::property_in("city", ["Oulu", "Turku"]));
        assert!(m(&user("Turku", 1)));
        assert!(!m(&user("Espoo", 1)));
    }

    #[test]
    fn null_checks() {
        let is_null = build_matcher_from_where(&Where::property_is_null("email"));
        let not_null = build_matcher_from_where(&Where::property_is_not_null("email"));

        let missing = user("x", 1);
        let null = user("x", 1).with("email", Value::Null);
        let set = user("x", 1).with("email", "a@b.c");

        assert!(is_null(&missing));
        assert!(is_null(&null));
        assert!(!is_null(&set));
        assert!(!not_null(&missing));
        assert!(!not_null(&null));
        assert!(not_null(&set));
    }

    #[test]
    fn missing_property_never_matches_comparisons() {
        let entity = Entity::new("users");
        for w in [
            Where::property_equals("age", 1),
            Where::property_before("age", 1),
            Where::property_after("age", 1),
            Where::property_between("age", 0, 2),
            Where::property_in("age", [1]),
        ] {
            assert!(!build_matcher_from_where(&w)(&entity), "{w}");
        }
    }

    #[test]
    fn and_or_composition() {
        let m = build_matcher_from_where(&Where::or([
            Where::and([
                Where::property_equals("city", "Oulu"),
                Where::property_after("age", 17),
            ]),
            Where::property_equals("city", "Turku"),
        ]));

        assert!(m(&user("Oulu", 18)));
        assert!(!m(&user("Oulu", 17)));
        assert!(m(&user("Turku", 1)));
        assert!(!m(&user("Espoo", 50)));
    }

    #[test]
    fn empty_groups() {
        let e = user("x", 1);
        assert!(build_matcher_from_where(&Where::and([]))(&e));
        assert!(!build_matcher_from_where(&Where::or([]))(&e));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn leaf() -> impl Strategy<Value = Where> {
            (0i64..10).prop_flat_map(|n| {
                prop_oneof![
                    Just(Where::property_equals("n", n)),
                    Just(Where::property_before("n", n)),
                    Just(Where::property_after("n", n)),
                    Just(Where::property_between("n", n, n + 3)),
                    Just(Where::property_is_null("missing")),
                ]
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(128))]

            #[test]
            fn and_or_follow_boolean_laws(a in leaf(), b in leaf(), n in 0i64..10) {
                let entity = Entity::new("t").with("n", n);
                let ma = build_matcher_from_where(&a)(&entity);
                let mb = build_matcher_from_where(&b)(&entity);

                let and = build_matcher_from_where(&Where::and([a.clone(), b.clone()]));
                let or = build_matcher_from_where(&Where::or([a.clone(), b.clone()]));
                let swapped = build_matcher_from_where(&Where::and([b, a]));

                prop_assert_eq!(and(&entity), ma && mb);
                prop_assert_eq!(or(&entity), ma || mb);
                prop_assert_eq!(swapped(&entity), and(&entity));
            }
        }
    }
}
