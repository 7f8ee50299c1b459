//! Change tracking for entities returned by a persister.

use crate::entity::Entity;
use crate::metadata::{EntityField, EntityMetadata};
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};

type FieldSnapshot = BTreeMap<String, Value>;

/// Remembers the last observed field values of every entity a persister
/// handed out, keyed by table and id.
///
/// Persisters capture state after each successful find, insert and
/// update, and consult it on update to write only the fields that changed.
#[derive(Debug, Default)]
pub struct EntityStateTracker {
    states: HashMap<(String, Value), FieldSnapshot>,
}

impl EntityStateTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the current field values of an entity.
    ///
    /// Entities without an id are not tracked.
    pub fn save_last_entity_state(&mut self, metadata: &EntityMetadata, entity: &Entity) {
        let Some(id) = entity.id(metadata) else {
            return;
        };
        let snapshot = metadata
            .fields
            .iter()
            .filter_map(|field| {
                entity
                    .get(&field.property_name)
                    .map(|value| (field.property_name.clone(), value.clone()))
            })
            .collect();
        self.states
            .insert((metadata.table_name.clone(), id.clone()), snapshot);
    }

    /// Captures the state of every entity in a list.
    pub fn save_last_entity_list_state(&mut self, metadata: &EntityMetadata, entities: &[Entity]) {
        for entity in entities {
            self.save_last_entity_state(metadata, entity);
        }
    }

    /// Returns the fields whose values differ from the last captured state.
    ///
    /// Without a captured state every field counts as changed.
    pub fn changed_fields<'m>(
        &self,
        metadata: &'m EntityMetadata,
        entity: &Entity,
    ) -> Vec<&'m EntityField> {
        let previous = entity
            .id(metadata)
            .and_then(|id| self.states.get(&(metadata.table_name.clone(), id.clone())));

        match previous {
            Some(snapshot) => metadata
                .fields
                .iter()
                .filter(|field| {
                    entity.get(&field.property_name) != snapshot.get(&field.property_name)
                })
                .collect(),
            None => metadata.fields.iter().collect(),
        }
    }

    /// Returns `true` if state was captured for the table and id.
    pub fn is_tracked(&self, table_name: &str, id: &Value) -> bool {
        self.states
            .contains_key(&(table_name.to_string(), id.clone()))
    }

    /// Drops the captured state of one entity.
    pub fn forget(&mut self, table_name: &str, id: &Value) {
        self.states.remove(&(table_name.to_string(), id.clone()));
    }

    /// Drops the captured state of every entity in a table.
    pub fn forget_table(&mut self, table_name: &str) {
        self.states.retain(|(table, _), _| table != table_name);
    }

    /// Drops all captured state.
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> EntityMetadata {
        EntityMetadata::new("users", "id")
            .with_field(EntityField::new("id", "id"))
            .with_field(EntityField::new("name", "name"))
            .with_field(EntityField::new("age", "age"))
    }

    #[test]
    fn untracked_entity_changes_every_field() {
        let tracker = EntityStateTracker::new();
        let m = metadata();
        let e = Entity::new("users").with("id", 1).with("name", "A");

        assert_eq!(tracker.changed_fields(&m, &e).len(), 3);
    }

    #[test]
    fn tracked_entity_reports_only_differences() {
        let mut tracker = EntityStateTracker::new();
        let m = metadata();
        let e = Entity::new("users")
            .with("id", 1)
            .with("name", "A")
            .with("age", 20);
        tracker.save_last_entity_state(&m, &e);
        assert!(tracker.is_tracked("users", &Value::Integer(1)));

        assert!(tracker.changed_fields(&m, &e).is_empty());

        let changed = e.clone().with("age", 21);
        let fields = tracker.changed_fields(&m, &changed);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].property_name, "age");

        let mut removed = e.clone();
        removed.remove("name");
        let fields = tracker.changed_fields(&m, &removed);
        assert_eq!(fields[0].property_name, "name");
    }

    #[test]
    fn entities_without_id_are_not_tracked() {
        let mut tracker = EntityStateTracker::new();
        let m = metadata();
        tracker.save_last_entity_state(&m, &Entity::new("users").with("name", "A"));
        assert!(tracker.states.is_empty());
    }

    #[test]
    fn list_state_and_clear() {
        let mut tracker = EntityStateTracker::new();
        let m = metadata();
        tracker.save_last_entity_list_state(
            &m,
            &[
                Entity::new("users").with("id", 1),
                Entity::new("users").with("id", 2),
            ],
        );
        assert!(tracker.is_tracked("users", &Value::Integer(2)));

        tracker.clear();
        assert!(!tracker.is_tracked("users", &Value::Integer(1)));
    }

    #[test]
    fn forgetting_entities_and_tables() {
        let mut tracker = EntityStateTracker::new();
        let m = metadata();
        let carts = EntityMetadata::new("carts", "id").with_field(EntityField::new("id", "id"));
        tracker.save_last_entity_list_state(
            &m,
            &[
                Entity::new("users").with("id", 1),
                Entity::new("users").with("id", 2),
            ],
        );
        tracker.save_last_entity_state(&carts, &Entity::new("carts").with("id", 1));

        tracker.forget("users", &Value::Integer(1));
        assert!(!tracker.is_tracked("users", &Value::Integer(1)));
        assert!(tracker.is_tracked("users", &Value::Integer(2)));

        tracker.forget_table("users");
        assert!(!tracker.is_tracked("users", &Value::Integer(2)));
        assert!(tracker.is_tracked("carts", &Value::Integer(1)));
    }
}
