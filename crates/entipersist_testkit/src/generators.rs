//! Property-based test generators using proptest.
//!
//! Strategies stay inside the fixture vocabulary (property names of the
//! `users` table, a handful of cities) so generated conditions actually
//! match generated entities some of the time.

use crate::fixtures::USERS;
use chrono::{DateTime, Utc};
use entipersist_core::{Entity, Value, Where};
use proptest::prelude::*;

/// Cities used by generated users.
pub const CITIES: [&str; 4] = ["Helsinki", "Oulu", "Tampere", "Turku"];

/// Strategy for scalar values of every kind.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
        timestamp_strategy().prop_map(Value::Timestamp),
    ]
}

/// Strategy for timestamps between 2000 and 2100.
pub fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..4_102_444_800i64)
        .prop_filter_map("timestamp in range", |secs| DateTime::from_timestamp(secs, 0))
}

fn city_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(CITIES.to_vec())
}

/// Strategy for users without ids.
pub fn user_strategy() -> impl Strategy<Value = Entity> {
    ("[A-Z][a-z]{1,8}", city_strategy(), 0i64..100).prop_map(|(name, city, age)| {
        Entity::new(USERS)
            .with("name", name)
            .with("city", city)
            .with("age", age)
    })
}

/// Strategy for leaf conditions over user properties.
pub fn user_condition_strategy() -> impl Strategy<Value = Where> {
    prop_oneof![
        city_strategy().prop_map(|c| Where::property_equals("city", c)),
        (0i64..100).prop_map(|n| Where::property_before("age", n)),
        (0i64..100).prop_map(|n| Where::property_after("age", n)),
        (0i64..100, 0i64..30).prop_map(|(n, w)| Where::property_between("age", n, n + w)),
        prop::collection::vec(city_strategy(), 0..3).prop_map(|c| Where::property_in("city", c)),
        Just(Where::property_is_null("contactId")),
        Just(Where::property_is_not_null("name")),
    ]
}

/// Strategy for condition trees up to `depth` levels of `And`/`Or`.
pub fn where_strategy(depth: u32) -> impl Strategy<Value = Where> {
    user_condition_strategy().prop_recursive(depth, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Where::and),
            prop::collection::vec(inner, 0..4).prop_map(Where::or),
        ]
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entipersist_core::build_matcher_from_where;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn values_equal_their_clones(value in value_strategy()) {
            prop_assert_eq!(value.clone(), value);
        }

        #[test]
        fn users_have_fixture_shape(user in user_strategy()) {
            prop_assert_eq!(user.table_name(), USERS);
            let city = user.get("city").and_then(Value::as_text);
            prop_assert!(city.is_some_and(|c| CITIES.contains(&c)));
        }

        #[test]
        fn single_child_or_matches_like_its_child(
            condition in where_strategy(3),
            user in user_strategy(),
        ) {
            let matcher = build_matcher_from_where(&condition);
            let single_or = build_matcher_from_where(&Where::or([condition.clone()]));
            prop_assert_eq!(matcher(&user), single_or(&user));
        }
    }
}
