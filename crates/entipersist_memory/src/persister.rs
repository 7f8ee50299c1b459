//! The in-memory persister.

use crate::config::MemoryPersisterConfig;
use crate::relations::RelationResolver;
use crate::stats::{MemoryStats, MemoryStatsSnapshot};
use crate::table::{MemoryItem, MemoryTable};
use entipersist_core::{
    build_matcher_from_where, Entity, EntityMetadata, EntityStateTracker, Matcher,
    MetadataManager, PersistError, PersistResult, Persister, PersisterType, Sort, Value, Where,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Everything a persister instance owns.
#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<String, MemoryTable>,
    metadata: MetadataManager,
    tracker: EntityStateTracker,
}

impl MemoryState {
    fn resolver(&self) -> RelationResolver<'_> {
        RelationResolver {
            tables: &self.tables,
            metadata: &self.metadata,
        }
    }

    /// Matching records as relation-free clones, sorted if requested.
    fn select(
        &self,
        table_name: &str,
        matcher: Option<&Matcher>,
        sort: Option<&Sort>,
    ) -> Vec<Entity> {
        let Some(table) = self.tables.get(table_name) else {
            return Vec::new();
        };
        let mut entities: Vec<Entity> = table
            .matching(matcher)
            .map(|item| item.value.simplified())
            .collect();
        if let Some(sort) = sort {
            sort.sort_entities(&mut entities);
        }
        entities
    }

    fn find_all(
        &mut self,
        metadata: &EntityMetadata,
        condition: Option<&Where>,
        sort: Option<&Sort>,
    ) -> PersistResult<Vec<Entity>> {
        let matcher = condition.map(build_matcher_from_where);
        let selected = self.select(&metadata.table_name, matcher.as_ref(), sort);
        let entities = self.resolver().populate_all(metadata, selected)?;
        self.tracker.save_last_entity_list_state(metadata, &entities);
        Ok(entities)
    }

    fn find_by(
        &mut self,
        metadata: &EntityMetadata,
        condition: &Where,
        sort: Option<&Sort>,
    ) -> PersistResult<Option<Entity>> {
        let matcher = build_matcher_from_where(condition);
        let Some(first) = self
            .select(&metadata.table_name, Some(&matcher), sort)
            .into_iter()
            .next()
        else {
            return Ok(None);
        };
        let entity = self.resolver().populate(metadata, first)?;
        self.tracker.save_last_entity_state(metadata, &entity);
        Ok(Some(entity))
    }

    fn insert_all(
        &mut self,
        config: &MemoryPersisterConfig,
        metadata: &EntityMetadata,
        entities: &[Entity],
    ) -> PersistResult<Vec<MemoryItem>> {
        let table_name = &metadata.table_name;
        let mut seen: HashSet<Value> = self
            .tables
            .get(table_name)
            .map(|table| table.items.iter().map(|item| item.id.clone()).collect())
            .unwrap_or_default();

        // Validate the whole batch before touching the table.
        let mut items = Vec::with_capacity(entities.len());
        for entity in entities {
            check_table(metadata, entity)?;
            let mut value = entity.simplified();
            let id = match value.id(metadata) {
                Some(id) => id.clone(),
                None => {
                    let id = config.generate_id(metadata)?;
                    value.set(metadata.id_property_name.clone(), id.clone());
                    id
                }
            };
            if !seen.insert(id.clone()) {
                return Err(PersistError::DuplicateId {
                    table: table_name.clone(),
                    id,
                });
            }
            items.push(MemoryItem::new(id, value));
        }

        self.tables
            .entry(table_name.clone())
            .or_default()
            .items
            .extend(items.iter().cloned());
        Ok(items)
    }

    /// Drops the last `count` records of a table after a failed write.
    fn rollback_append(&mut self, table_name: &str, count: usize) {
        if let Some(table) = self.tables.get_mut(table_name) {
            let keep = table.len().saturating_sub(count);
            table.items.truncate(keep);
        }
    }

    fn populate_inserted(
        &mut self,
        metadata: &EntityMetadata,
        items: Vec<MemoryItem>,
    ) -> PersistResult<Vec<Entity>> {
        let count = items.len();
        let values = items.into_iter().map(|item| item.value).collect();
        let populated = self.resolver().populate_all(metadata, values);
        match populated {
            Ok(entities) => {
                self.tracker.save_last_entity_list_state(metadata, &entities);
                Ok(entities)
            }
            Err(err) => {
                self.rollback_append(&metadata.table_name, count);
                Err(err)
            }
        }
    }

    /// Applies the changed fields of `entity` and returns the stored value
    /// together with what it replaced, if anything.
    fn write_update(
        &mut self,
        metadata: &EntityMetadata,
        entity: &Entity,
        id: &Value,
    ) -> (Entity, Option<Entity>) {
        let changed = self.tracker.changed_fields(metadata, entity);
        let table = self.tables.entry(metadata.table_name.clone()).or_default();

        match table.find_by_id_mut(id) {
            Some(item) => {
                let mut merged = item.value.clone();
                for field in changed {
                    match entity.get(&field.property_name) {
                        Some(value) => merged.set(field.property_name.clone(), value.clone()),
                        None => {
                            merged.remove(&field.property_name);
                        }
                    }
                }
                let previous = std::mem::replace(&mut item.value, merged.clone());
                (merged, Some(previous))
            }
            None => {
                let value = entity.simplified();
                table.items.push(MemoryItem::new(id.clone(), value.clone()));
                (value, None)
            }
        }
    }

    fn restore(&mut self, table_name: &str, id: &Value, previous: Option<Entity>) {
        let Some(table) = self.tables.get_mut(table_name) else {
            return;
        };
        match previous {
            Some(value) => {
                if let Some(item) = table.find_by_id_mut(id) {
                    item.value = value;
                }
            }
            None => table.items.retain(|item| &item.id != id),
        }
    }
}

fn check_table(metadata: &EntityMetadata, entity: &Entity) -> PersistResult<()> {
    if entity.table_name() == metadata.table_name {
        Ok(())
    } else {
        Err(PersistError::table_mismatch(
            &metadata.table_name,
            entity.table_name(),
        ))
    }
}

/// A persister that keeps every table in process memory.
///
/// Tables are created on first insert and belong to this instance alone.
/// All state sits behind one lock that is never held across a suspension
/// point, so every operation is atomic and callers see their own writes.
///
/// # Example
///
/// ```rust
/// use entipersist_core::{Entity, EntityField, EntityMetadata, Persister, Where};
/// use entipersist_memory::MemoryPersister;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let users = EntityMetadata::new("users", "id")
///     .with_field(EntityField::new("id", "id"))
///     .with_field(EntityField::new("name", "name"));
///
/// let persister = MemoryPersister::new();
/// persister.setup_entity_metadata(&users);
///
/// let saved = persister
///     .insert(&users, &Entity::new("users").with("name", "Alice"))
///     .await
///     .unwrap();
/// let found = persister
///     .find_by(&users, &Where::property_equals("id", saved.get("id").cloned()), None)
///     .await
///     .unwrap();
///
/// assert_eq!(found, Some(saved));
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryPersister {
    config: MemoryPersisterConfig,
    state: Mutex<MemoryState>,
    stats: MemoryStats,
}

impl MemoryPersister {
    /// Creates a persister with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a persister with the given configuration.
    #[must_use]
    pub fn with_config(config: MemoryPersisterConfig) -> Self {
        Self {
            config,
            state: Mutex::new(MemoryState::default()),
            stats: MemoryStats::default(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MemoryPersisterConfig {
        &self.config
    }

    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> MemoryStatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns the number of records in a table.
    pub fn table_len(&self, table_name: &str) -> usize {
        self.state
            .lock()
            .tables
            .get(table_name)
            .map_or(0, MemoryTable::len)
    }
}

impl Persister for MemoryPersister {
    fn persister_type(&self) -> PersisterType {
        PersisterType::Memory
    }

    fn setup_entity_metadata(&self, metadata: &EntityMetadata) {
        self.state.lock().metadata.setup_entity_metadata(metadata);
    }

    fn destroy(&self) {
        let mut state = self.state.lock();
        state.tables.clear();
        state.tracker.clear();
        state.metadata.clear();
        tracing::debug!("destroyed memory persister state");
    }

    async fn count(
        &self,
        metadata: &EntityMetadata,
        condition: Option<&Where>,
    ) -> PersistResult<usize> {
        self.stats.record_read();
        let state = self.state.lock();
        let Some(table) = state.tables.get(&metadata.table_name) else {
            return Ok(0);
        };
        let matcher = condition.map(build_matcher_from_where);
        Ok(table.matching(matcher.as_ref()).count())
    }

    async fn exists_by(&self, metadata: &EntityMetadata, condition: &Where) -> PersistResult<bool> {
        self.stats.record_read();
        let state = self.state.lock();
        let Some(table) = state.tables.get(&metadata.table_name) else {
            return Ok(false);
        };
        let matcher = build_matcher_from_where(condition);
        let found = table.matching(Some(&matcher)).next().is_some();
        Ok(found)
    }

    async fn delete_all(
        &self,
        metadata: &EntityMetadata,
        condition: Option<&Where>,
    ) -> PersistResult<()> {
        let mut state = self.state.lock();
        let table_name = &metadata.table_name;
        let removed = match condition {
            Some(condition) => {
                let matcher = build_matcher_from_where(condition);
                let ids = state
                    .tables
                    .get_mut(table_name)
                    .map(|table| table.remove_matching(&matcher))
                    .unwrap_or_default();
                for id in &ids {
                    state.tracker.forget(table_name, id);
                }
                ids.len()
            }
            None => {
                state.tracker.forget_table(table_name);
                state.tables.remove(table_name).map_or(0, |table| table.len())
            }
        };
        drop(state);
        tracing::debug!(table = %metadata.table_name, removed, "deleted entities");
        self.stats.record_deletes(removed as u64);
        Ok(())
    }

    async fn find_all(
        &self,
        metadata: &EntityMetadata,
        condition: Option<&Where>,
        sort: Option<&Sort>,
    ) -> PersistResult<Vec<Entity>> {
        self.stats.record_read();
        let entities = self.state.lock().find_all(metadata, condition, sort)?;
        tracing::debug!(table = %metadata.table_name, found = entities.len(), "find_all");
        Ok(entities)
    }

    async fn find_by(
        &self,
        metadata: &EntityMetadata,
        condition: &Where,
        sort: Option<&Sort>,
    ) -> PersistResult<Option<Entity>> {
        self.stats.record_read();
        self.state.lock().find_by(metadata, condition, sort)
    }

    async fn insert(&self, metadata: &EntityMetadata, entity: &Entity) -> PersistResult<Entity> {
        self.insert_all(metadata, std::slice::from_ref(entity))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PersistError::invalid_operation("could not add items"))
    }

    async fn insert_all(
        &self,
        metadata: &EntityMetadata,
        entities: &[Entity],
    ) -> PersistResult<Vec<Entity>> {
        let mut state = self.state.lock();
        let items = state.insert_all(&self.config, metadata, entities)?;
        let inserted = state.populate_inserted(metadata, items)?;
        drop(state);

        tracing::debug!(table = %metadata.table_name, count = inserted.len(), "inserted entities");
        self.stats.record_writes(inserted.len() as u64);
        Ok(inserted)
    }

    async fn update(&self, metadata: &EntityMetadata, entity: &Entity) -> PersistResult<Entity> {
        check_table(metadata, entity)?;
        let id_field = metadata.id_field()?;
        let id = entity
            .id(metadata)
            .cloned()
            .ok_or_else(|| PersistError::MissingEntityId {
                table: metadata.table_name.clone(),
                property: id_field.property_name.clone(),
            })?;

        let mut state = self.state.lock();

        if state.tracker.changed_fields(metadata, entity).is_empty() {
            tracing::debug!(
                table = %metadata.table_name,
                id = %id,
                "no changed fields, saved nothing"
            );
            self.stats.record_read();
            let condition = Where::property_equals(id_field.property_name.clone(), id.clone());
            return state
                .find_by(metadata, &condition, None)?
                .ok_or(PersistError::EntityNotFound {
                    table: metadata.table_name.clone(),
                    id,
                });
        }

        let (stored, previous) = state.write_update(metadata, entity, &id);
        let populated = state.resolver().populate(metadata, stored);
        let populated = match populated {
            Ok(populated) => populated,
            Err(err) => {
                state.restore(&metadata.table_name, &id, previous);
                return Err(err);
            }
        };
        state.tracker.save_last_entity_state(metadata, &populated);
        drop(state);

        tracing::debug!(table = %metadata.table_name, id = %id, "updated entity");
        self.stats.record_writes(1);
        Ok(populated)
    }
}
