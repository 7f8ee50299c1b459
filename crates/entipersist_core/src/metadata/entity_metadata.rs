//! Table shape description.

use crate::error::{PersistError, PersistResult};
use crate::metadata::{
    EntityField, EntityFieldType, ManyToOneRelation, OneToManyRelation, TemporalProperty,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Static description of a table and its relations.
///
/// Every persister resolves property access through this description:
/// column names for query building, the id property for identity, and
/// relation declarations for population.
///
/// # Example
///
/// ```rust
/// use entipersist_core::{EntityMetadata, EntityField, ManyToOneRelation};
///
/// let carts = EntityMetadata::new("carts", "cartId")
///     .with_field(EntityField::new("cartId", "cart_id"))
///     .with_field(EntityField::new("userId", "user_id"))
///     .with_many_to_one(ManyToOneRelation::new("user", "user_id", "users"));
///
/// assert_eq!(carts.column_name("userId"), Some("user_id"));
/// assert_eq!(carts.property_name_for_column("user_id"), Some("userId"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawEntityMetadata")]
pub struct EntityMetadata {
    /// Table name.
    pub table_name: String,
    /// Property holding the entity id.
    pub id_property_name: String,
    /// Ordered field list.
    pub fields: Vec<EntityField>,
    /// One-to-many relations.
    pub one_to_many_relations: Vec<OneToManyRelation>,
    /// Many-to-one relations.
    pub many_to_one_relations: Vec<ManyToOneRelation>,
    /// Properties holding points in time.
    pub temporal_properties: Vec<TemporalProperty>,
}

/// Unchecked wire form of [`EntityMetadata`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntityMetadata {
    table_name: String,
    id_property_name: String,
    #[serde(default)]
    fields: Vec<EntityField>,
    #[serde(default)]
    one_to_many_relations: Vec<OneToManyRelation>,
    #[serde(default)]
    many_to_one_relations: Vec<ManyToOneRelation>,
    #[serde(default)]
    temporal_properties: Vec<TemporalProperty>,
}

impl TryFrom<RawEntityMetadata> for EntityMetadata {
    type Error = PersistError;

    fn try_from(raw: RawEntityMetadata) -> PersistResult<Self> {
        let metadata = Self {
            table_name: raw.table_name,
            id_property_name: raw.id_property_name,
            fields: raw.fields,
            one_to_many_relations: raw.one_to_many_relations,
            many_to_one_relations: raw.many_to_one_relations,
            temporal_properties: raw.temporal_properties,
        };
        metadata.validate()?;
        Ok(metadata)
    }
}

impl EntityMetadata {
    /// Creates metadata for a table with no fields yet.
    pub fn new(table_name: impl Into<String>, id_property_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            id_property_name: id_property_name.into(),
            fields: Vec::new(),
            one_to_many_relations: Vec::new(),
            many_to_one_relations: Vec::new(),
            temporal_properties: Vec::new(),
        }
    }

    /// Adds a field. A field with the same property name is replaced.
    #[must_use]
    pub fn with_field(mut self, field: EntityField) -> Self {
        match self
            .fields
            .iter_mut()
            .find(|f| f.property_name == field.property_name)
        {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Adds a one-to-many relation.
    #[must_use]
    pub fn with_one_to_many(mut self, relation: OneToManyRelation) -> Self {
        self.one_to_many_relations.push(relation);
        self
    }

    /// Adds a many-to-one relation.
    #[must_use]
    pub fn with_many_to_one(mut self, relation: ManyToOneRelation) -> Self {
        self.many_to_one_relations.push(relation);
        self
    }

    /// Declares a temporal property.
    #[must_use]
    pub fn with_temporal(mut self, property: TemporalProperty) -> Self {
        self.temporal_properties.push(property);
        self
    }

    /// Checks that every field has a distinct property name.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::DuplicateField`] for the first repeated
    /// property name.
    pub fn validate(&self) -> PersistResult<()> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        match self
            .fields
            .iter()
            .find(|f| !seen.insert(f.property_name.as_str()))
        {
            Some(field) => Err(PersistError::DuplicateField {
                table: self.table_name.clone(),
                property: field.property_name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Finds the field declared for a property.
    pub fn field_by_property(&self, property_name: &str) -> Option<&EntityField> {
        self.fields
            .iter()
            .find(|f| f.property_name == property_name)
    }

    /// Returns the column mapped to a property.
    pub fn column_name(&self, property_name: &str) -> Option<&str> {
        self.field_by_property(property_name)
            .map(|f| f.column_name.as_str())
    }

    /// Returns the first property mapped to a column.
    pub fn property_name_for_column(&self, column_name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.column_name == column_name)
            .map(|f| f.property_name.as_str())
    }

    /// Returns the field declared for the id property.
    pub fn id_field(&self) -> PersistResult<&EntityField> {
        self.field_by_property(&self.id_property_name)
            .ok_or_else(|| PersistError::MissingIdField {
                table: self.table_name.clone(),
                property: self.id_property_name.clone(),
            })
    }

    /// Returns the declared type of the id field, if the field exists.
    pub fn id_field_type(&self) -> Option<EntityFieldType> {
        self.field_by_property(&self.id_property_name)
            .map(|f| f.field_type)
    }

    /// Returns `true` if the property is declared temporal.
    pub fn is_temporal(&self, property_name: &str) -> bool {
        self.temporal_properties
            .iter()
            .any(|p| p.property_name == property_name)
    }

    /// Returns `true` if the table declares any relation.
    pub fn has_relations(&self) -> bool {
        !self.one_to_many_relations.is_empty() || !self.many_to_one_relations.is_empty()
    }
}
