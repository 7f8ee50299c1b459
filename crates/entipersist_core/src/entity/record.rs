//! Entity record type.

use crate::metadata::EntityMetadata;
use crate::value::Value;
use std::collections::BTreeMap;

/// Entities attached to a relation property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Related {
    /// Many-to-one target; `None` when the foreign key is unset.
    One(Option<Box<Entity>>),
    /// One-to-many targets in the related table's order.
    Many(Vec<Entity>),
}

/// A persisted record.
///
/// An entity is tagged with its table name and holds two maps: scalar
/// properties described by the table's [`EntityMetadata`] fields, and
/// relation properties filled in by relation population. `Clone` is a
/// deep copy, so a cloned entity never shares state with the original.
///
/// # Example
///
/// ```rust
/// use entipersist_core::{Entity, Value};
///
/// let user = Entity::new("users")
///     .with("name", "Alice")
///     .with("age", 30);
///
/// assert_eq!(user.get("age"), Some(&Value::Integer(30)));
/// assert!(user.get("email").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    table_name: String,
    properties: BTreeMap<String, Value>,
    relations: BTreeMap<String, Related>,
}

impl Entity {
    /// Creates an empty entity for a table.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            properties: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    /// Sets a property and returns the entity.
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(property, value);
        self
    }

    /// Returns the table this entity belongs to.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Gets a property value.
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }

    /// Sets a property value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(property.into(), value.into());
    }

    /// Removes a property, returning its old value.
    pub fn remove(&mut self, property: &str) -> Option<Value> {
        self.properties.remove(property)
    }

    /// Returns `true` if the property is present (even if null).
    pub fn has(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Iterates over scalar properties in name order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the id value, if the entity has a truthy one.
    pub fn id(&self, metadata: &EntityMetadata) -> Option<&Value> {
        self.get(&metadata.id_property_name)
            .filter(|v| v.is_truthy())
    }

    /// Gets a relation property.
    pub fn relation(&self, property: &str) -> Option<&Related> {
        self.relations.get(property)
    }

    /// Gets a populated many-to-one target.
    pub fn related_one(&self, property: &str) -> Option<&Entity> {
        match self.relations.get(property) {
            Some(Related::One(Some(entity))) => Some(entity),
            _ => None,
        }
    }

    /// Gets populated one-to-many targets. Empty if not populated.
    pub fn related_many(&self, property: &str) -> &[Entity] {
        match self.relations.get(property) {
            Some(Related::Many(entities)) => entities,
            _ => &[],
        }
    }

    /// Sets a relation property.
    pub fn set_relation(&mut self, property: impl Into<String>, related: Related) {
        self.relations.insert(property.into(), related);
    }

    /// Returns `true` if any relation property is set.
    pub fn has_relations(&self) -> bool {
        !self.relations.is_empty()
    }

    /// Returns a copy without any relation properties.
    #[must_use]
    pub fn simplified(&self) -> Self {
        Self {
            table_name: self.table_name.clone(),
            properties: self.properties.clone(),
            relations: BTreeMap::new(),
        }
    }
}
