//! Field and temporal property declarations.

use serde::{Deserialize, Serialize};

/// Storage type of a field, when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityFieldType {
    /// Type not declared.
    #[default]
    Unknown,
    /// Text column.
    Text,
    /// Integer column.
    Integer,
    /// Boolean column.
    Boolean,
    /// Binary column.
    Bytes,
    /// Date/time column.
    Timestamp,
}

/// Maps an entity property to a storage column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityField {
    /// Property name on the entity.
    pub property_name: String,
    /// Column name in storage.
    pub column_name: String,
    /// Declared storage type.
    #[serde(default)]
    pub field_type: EntityFieldType,
}

impl EntityField {
    /// Creates a field with an undeclared type.
    pub fn new(property_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            column_name: column_name.into(),
            field_type: EntityFieldType::Unknown,
        }
    }

    /// Sets the declared storage type.
    #[must_use]
    pub fn with_type(mut self, field_type: EntityFieldType) -> Self {
        self.field_type = field_type;
        self
    }
}

/// Granularity of a temporal property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemporalType {
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Full timestamp.
    #[default]
    Timestamp,
}

/// Declares that a property holds a point in time.
///
/// Query builders use this to pick the time-aware predicate variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalProperty {
    /// Property name on the entity.
    pub property_name: String,
    /// Granularity.
    #[serde(default)]
    pub temporal_type: TemporalType,
}

impl TemporalProperty {
    /// Creates a timestamp property declaration.
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            temporal_type: TemporalType::Timestamp,
        }
    }
}
