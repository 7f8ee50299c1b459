//! Registry of entity metadata by table.

use crate::metadata::EntityMetadata;
use std::collections::HashMap;
use std::sync::Arc;

/// Keeps the metadata of every table a persister has been set up with.
///
/// Relation population looks linked tables up here, so every
/// `mapped_table` used in a relation must be registered before the
/// owning table is read.
#[derive(Debug, Default)]
pub struct MetadataManager {
    tables: HashMap<String, Arc<EntityMetadata>>,
}

impl MetadataManager {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers metadata for its table.
    ///
    /// Registering identical metadata again is a no-op. Registering
    /// different metadata for a known table replaces the old entry.
    pub fn setup_entity_metadata(&mut self, metadata: &EntityMetadata) {
        match self.tables.get(&metadata.table_name) {
            Some(existing) if existing.as_ref() == metadata => {}
            Some(_) => {
                tracing::warn!(table = %metadata.table_name, "replacing registered metadata");
                self.tables
                    .insert(metadata.table_name.clone(), Arc::new(metadata.clone()));
            }
            None => {
                tracing::debug!(table = %metadata.table_name, "registered metadata");
                self.tables
                    .insert(metadata.table_name.clone(), Arc::new(metadata.clone()));
            }
        }
    }

    /// Looks up the metadata registered for a table.
    pub fn get_metadata_by_table(&self, table_name: &str) -> Option<Arc<EntityMetadata>> {
        self.tables.get(table_name).cloned()
    }

    /// Returns the number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Forgets every registered table.
    pub fn clear(&mut self) {
        self.tables.clear();
    }
}
