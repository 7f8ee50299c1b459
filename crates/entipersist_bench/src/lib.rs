//! Benchmark utilities shared by the EntiPersist benches.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use entipersist_core::{Entity, Value, Where};
use entipersist_testkit::{cart, user, CITIES};
use rand::seq::SliceRandom;
use rand::Rng;

/// Generates `count` users with random cities and ages.
pub fn random_users(count: usize) -> Vec<Entity> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let city = CITIES.choose(&mut rng).copied().unwrap_or("Oulu");
            user(&format!("user{i}"), city, rng.gen_range(0..100))
        })
        .collect()
}

/// Generates `per_user` carts for every user id.
pub fn random_carts(user_ids: &[Value], per_user: usize) -> Vec<Entity> {
    let mut rng = rand::thread_rng();
    user_ids
        .iter()
        .flat_map(|id| (0..per_user).map(move |n| (id.clone(), n)))
        .map(|(id, n)| cart(id, &format!("cart{n}"), rng.gen_range(0..10_000)))
        .collect()
}

/// A condition tree `depth` levels deep alternating OR and AND, with
/// `width` children per group.
pub fn nested_condition(depth: usize, width: usize) -> Where {
    fn level(depth: usize, width: usize, or: bool) -> Where {
        if depth == 0 {
            return Where::property_after("age", 40);
        }
        let children = (0..width).map(|i| {
            if i == 0 {
                level(depth - 1, width, !or)
            } else {
                Where::property_equals("city", CITIES[i % CITIES.len()])
            }
        });
        if or {
            Where::or(children)
        } else {
            Where::and(children)
        }
    }
    level(depth, width, true)
}

/// Creates a single-threaded runtime for async benches.
pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build tokio runtime")
}
