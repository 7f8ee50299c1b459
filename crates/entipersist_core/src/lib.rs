//! # EntiPersist Core
//!
//! Backend-agnostic building blocks for entity persistence.
//!
//! This crate provides:
//! - [`Value`] and [`Entity`], the dynamic record model
//! - [`EntityMetadata`] describing tables, fields and relations
//! - The [`Where`] / [`Sort`] query DSL and the in-memory matcher compiler
//! - The [`Persister`] contract implemented by storage backends
//! - [`MetadataManager`] and [`EntityStateTracker`] used by persisters for
//!   relation lookup and change tracking
//!
//! ## Usage
//!
//! ```rust
//! use entipersist_core::{build_matcher_from_where, Entity, Sort, SortDirection, Where};
//!
//! let mut users = vec![
//!     Entity::new("users").with("name", "Alice").with("age", 30),
//!     Entity::new("users").with("name", "Bob").with("age", 17),
//!     Entity::new("users").with("name", "Carol").with("age", 42),
//! ];
//!
//! let adults = build_matcher_from_where(&Where::property_after("age", 17));
//! users.retain(|u| adults(u));
//! Sort::by_direction("age", SortDirection::Desc).sort_entities(&mut users);
//!
//! assert_eq!(users[0].get("name").and_then(|v| v.as_text()), Some("Carol"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entity;
mod error;
mod metadata;
mod persister;
mod query;
mod value;

pub use entity::{Entity, EntityStateTracker, Related};
pub use error::{PersistError, PersistResult};
pub use metadata::{
    EntityField, EntityFieldType, EntityMetadata, ManyToOneRelation, MetadataManager,
    OneToManyRelation, TemporalProperty, TemporalType,
};
pub use persister::{Persister, PersisterType};
pub use query::{
    build_matcher_from_where, Condition, Matcher, Predicate, Sort, SortDirection, SortOrder,
    Where,
};
pub use value::Value;
