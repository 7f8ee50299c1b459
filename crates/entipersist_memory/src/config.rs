//! Memory persister configuration.

use entipersist_core::{EntityFieldType, EntityMetadata, PersistError, PersistResult, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Representation of generated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryIdType {
    /// Stringified sequence numbers (`"1"`, `"2"`, ...).
    #[default]
    String,
    /// Plain integers.
    Number,
}

/// Source of fresh sequence numbers for generated ids.
pub trait IdGenerator: fmt::Debug + Send + Sync {
    /// Returns the next sequence number. Never returns the same number twice.
    fn next_id(&self) -> u64;
}

/// Monotonic counter starting at 1.
#[derive(Debug, Default)]
pub struct SequenceIdGenerator {
    last: AtomicU64,
}

impl SequenceIdGenerator {
    /// Creates a generator whose first id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator continuing after `last`.
    #[must_use]
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Configuration for a [`MemoryPersister`](crate::MemoryPersister).
#[derive(Debug, Clone)]
pub struct MemoryPersisterConfig {
    /// Format of generated ids when the id field has no declared type.
    pub id_type: MemoryIdType,

    /// Sequence used for generated ids.
    pub id_generator: Arc<dyn IdGenerator>,
}

impl Default for MemoryPersisterConfig {
    fn default() -> Self {
        Self {
            id_type: MemoryIdType::String,
            id_generator: Arc::new(SequenceIdGenerator::new()),
        }
    }
}

impl MemoryPersisterConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the generated id format.
    #[must_use]
    pub const fn id_type(mut self, id_type: MemoryIdType) -> Self {
        self.id_type = id_type;
        self
    }

    /// Sets the id generator. Pass a shared `Arc` to let several
    /// persisters draw from one sequence.
    #[must_use]
    pub fn id_generator(mut self, generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = generator;
        self
    }

    /// Draws the next id for a table.
    ///
    /// A declared id field type wins over the configured id type.
    pub(crate) fn generate_id(&self, metadata: &EntityMetadata) -> PersistResult<Value> {
        let next = self.id_generator.next_id();
        let numeric = match metadata.id_field_type() {
            Some(EntityFieldType::Integer) => true,
            Some(EntityFieldType::Text) => false,
            _ => self.id_type == MemoryIdType::Number,
        };
        if numeric {
            i64::try_from(next)
                .map(Value::Integer)
                .map_err(|_| PersistError::invalid_operation("id sequence exhausted"))
        } else {
            Ok(Value::Text(next.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entipersist_core::EntityField;

    fn untyped() -> EntityMetadata {
        EntityMetadata::new("t", "id").with_field(EntityField::new("id", "id"))
    }

    #[test]
    fn default_config() {
        let config = MemoryPersisterConfig::default();
        assert_eq!(config.id_type, MemoryIdType::String);
    }

    #[test]
    fn sequence_starts_at_one() {
        let gen = SequenceIdGenerator::new();
        assert_eq!(gen.next_id(), 1);
        assert_eq!(gen.next_id(), 2);

        let gen = SequenceIdGenerator::starting_after(41);
        assert_eq!(gen.next_id(), 42);
    }

    #[test]
    fn id_type_selects_format() {
        let config = MemoryPersisterConfig::new();
        assert_eq!(config.generate_id(&untyped()), Ok(Value::from("1")));

        let config = MemoryPersisterConfig::new().id_type(MemoryIdType::Number);
        assert_eq!(config.generate_id(&untyped()), Ok(Value::Integer(1)));
    }

    #[test]
    fn declared_field_type_wins() {
        let numeric = EntityMetadata::new("t", "id")
            .with_field(EntityField::new("id", "id").with_type(EntityFieldType::Integer));
        let text = EntityMetadata::new("t", "id")
            .with_field(EntityField::new("id", "id").with_type(EntityFieldType::Text));

        let config = MemoryPersisterConfig::new();
        assert_eq!(config.generate_id(&numeric), Ok(Value::Integer(1)));

        let config = MemoryPersisterConfig::new().id_type(MemoryIdType::Number);
        assert_eq!(config.generate_id(&text), Ok(Value::from("1")));
    }

    #[test]
    fn shared_generator_spans_configs() {
        let shared: Arc<dyn IdGenerator> = Arc::new(SequenceIdGenerator::new());
        let a = MemoryPersisterConfig::new().id_generator(Arc::clone(&shared));
        let b = MemoryPersisterConfig::new().id_generator(shared);

        assert_eq!(a.generate_id(&untyped()), Ok(Value::from("1")));
        assert_eq!(b.generate_id(&untyped()), Ok(Value::from("2")));
    }
}
