//! # EntiPersist Testkit
//!
//! Test utilities for EntiPersist.
//!
//! This crate provides:
//! - Fixture metadata and entity builders (users, carts, contacts)
//! - Property-based test generators using proptest
//! - Recording query builders that log every call made by `build_chain`
//! - Test logging setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use entipersist_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn finds_users() {
//!     init_tracing();
//!     let persister = MemoryPersister::new();
//!     setup_metadata(&persister);
//!     persister.insert(&users_metadata(), &user("Alice", "Oulu", 30)).await.unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod logging;
pub mod recording;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::*;
    pub use crate::recording::*;
}

pub use fixtures::*;
pub use generators::*;
pub use logging::*;
pub use recording::*;
