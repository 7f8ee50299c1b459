//! The persister contract shared by every storage backend.

use crate::entity::Entity;
use crate::error::PersistResult;
use crate::metadata::EntityMetadata;
use crate::query::{Sort, Where};
use std::fmt;

/// Identifies a persister implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersisterType {
    /// Process-local in-memory storage.
    Memory,
    /// PostgreSQL.
    Pg,
}

impl fmt::Display for PersisterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersisterType::Memory => f.write_str("memory"),
            PersisterType::Pg => f.write_str("pg"),
        }
    }
}

/// Storage backend for entities.
///
/// Every data operation is a suspension point. Implementations must
/// return independent clones: mutating a returned entity never changes
/// stored state, and later writes never change an entity already handed
/// out.
///
/// # Invariants
///
/// - `setup_entity_metadata` is idempotent
/// - Relation properties of returned entities are populated from metadata
/// - Failures abort the whole operation; no partial results are returned
#[allow(async_fn_in_trait)]
pub trait Persister: Send + Sync {
    /// Returns the implementation type.
    fn persister_type(&self) -> PersisterType;

    /// Registers metadata for a table. Calling it again is a no-op.
    fn setup_entity_metadata(&self, metadata: &EntityMetadata);

    /// Releases all held tables and tracked state.
    fn destroy(&self);

    /// Counts matching entities, or all entities without a condition.
    async fn count(&self, metadata: &EntityMetadata, condition: Option<&Where>)
        -> PersistResult<usize>;

    /// Returns `true` if at least one entity matches.
    async fn exists_by(&self, metadata: &EntityMetadata, condition: &Where) -> PersistResult<bool>;

    /// Deletes matching entities, or the whole table without a condition.
    async fn delete_all(
        &self,
        metadata: &EntityMetadata,
        condition: Option<&Where>,
    ) -> PersistResult<()>;

    /// Returns every matching entity, sorted if a sort is given.
    async fn find_all(
        &self,
        metadata: &EntityMetadata,
        condition: Option<&Where>,
        sort: Option<&Sort>,
    ) -> PersistResult<Vec<Entity>>;

    /// Returns the first matching entity after sorting, or `None`.
    async fn find_by(
        &self,
        metadata: &EntityMetadata,
        condition: &Where,
        sort: Option<&Sort>,
    ) -> PersistResult<Option<Entity>>;

    /// Inserts one entity and returns the stored, populated copy.
    async fn insert(&self, metadata: &EntityMetadata, entity: &Entity) -> PersistResult<Entity>;

    /// Inserts entities in order and returns the stored, populated copies.
    ///
    /// Either every entity is stored or none is.
    async fn insert_all(
        &self,
        metadata: &EntityMetadata,
        entities: &[Entity],
    ) -> PersistResult<Vec<Entity>>;

    /// Saves the changed fields of an entity and returns the stored,
    /// populated copy.
    async fn update(&self, metadata: &EntityMetadata, entity: &Entity) -> PersistResult<Entity>;
}
