//! # EntiPersist Memory
//!
//! Reference [`Persister`](entipersist_core::Persister) that keeps every
//! table in process memory.
//!
//! Useful for:
//! - Unit and integration tests of code written against `Persister`
//! - Development without a database
//! - Checking the behavior other backends must reproduce
//!
//! Ids are drawn from a per-instance [`IdGenerator`] when an entity is
//! inserted without one. Relations declared in metadata are populated on
//! every returned entity, so every linked table must be registered with
//! `setup_entity_metadata` first.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod persister;
mod relations;
mod stats;
mod table;

pub use config::{IdGenerator, MemoryIdType, MemoryPersisterConfig, SequenceIdGenerator};
pub use persister::MemoryPersister;
pub use stats::{MemoryStats, MemoryStatsSnapshot};
