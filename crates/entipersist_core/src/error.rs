//! Error types for EntiPersist core.

use crate::value::Value;
use thiserror::Error;

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors that can occur in persistence operations.
///
/// Configuration errors (`UnknownProperty`, `MissingMetadata`,
/// `MissingRelationLink`, `MissingJoinField`, `MissingIdField`,
/// `DuplicateField`) are never
/// retried. Not-found conditions are reported as `None` by the persister
/// and only surface here when a configured link dangles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistError {
    /// A property name could not be resolved through the table's fields.
    #[error("unknown property \"{property}\" in table \"{table}\"")]
    UnknownProperty {
        /// The table searched.
        table: String,
        /// The unresolved property.
        property: String,
    },

    /// No metadata was registered for a linked table.
    #[error("could not find metadata for linked table \"{mapped_table}\" to populate property \"{property}\" in table \"{table}\"")]
    MissingMetadata {
        /// The owning table.
        table: String,
        /// The relation property being populated.
        property: String,
        /// The table the relation points to.
        mapped_table: String,
    },

    /// A relation is declared without a link to another table.
    #[error("no link to table exists to populate property \"{property}\" in table \"{table}\"")]
    MissingRelationLink {
        /// The owning table.
        table: String,
        /// The relation property.
        property: String,
    },

    /// The join field of a relation could not be resolved.
    #[error("could not resolve join field \"{field}\" in table \"{mapped_table}\" for property \"{property}\" in table \"{table}\"")]
    MissingJoinField {
        /// The owning table.
        table: String,
        /// The relation property.
        property: String,
        /// The table holding the join field.
        mapped_table: String,
        /// The property or column that did not resolve.
        field: String,
    },

    /// The metadata has no field for its id property.
    #[error("could not find id field using property \"{property}\" in table \"{table}\"")]
    MissingIdField {
        /// The table.
        table: String,
        /// The id property name.
        property: String,
    },

    /// Two fields of a table share a property name.
    #[error("property \"{property}\" is declared more than once in table \"{table}\"")]
    DuplicateField {
        /// The table.
        table: String,
        /// The repeated property name.
        property: String,
    },

    /// An entity was passed with metadata of another table.
    #[error("entity of table \"{actual}\" cannot be stored in table \"{expected}\"")]
    TableMismatch {
        /// The table named by the metadata.
        expected: String,
        /// The table the entity is tagged with.
        actual: String,
    },

    /// The entity has no usable id value.
    #[error("entity in table \"{table}\" has no value for id property \"{property}\"")]
    MissingEntityId {
        /// The table.
        table: String,
        /// The id property name.
        property: String,
    },

    /// An entity with the same id is already stored.
    #[error("entity already stored with id \"{id}\" in table \"{table}\"")]
    DuplicateId {
        /// The table.
        table: String,
        /// The conflicting id.
        id: Value,
    },

    /// A many-to-one foreign key points at a record that is not stored.
    #[error("could not find related entity by id \"{id}\" from table \"{mapped_table}\" for property \"{property}\"")]
    DanglingReference {
        /// The relation property.
        property: String,
        /// The table searched.
        mapped_table: String,
        /// The foreign key value.
        id: Value,
    },

    /// The entity was expected to be stored but is not.
    #[error("entity was not stored for id \"{id}\" in table \"{table}\"")]
    EntityNotFound {
        /// The table.
        table: String,
        /// The id searched for.
        id: Value,
    },

    /// Operation not permitted in current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why operation is invalid.
        message: String,
    },
}

impl PersistError {
    /// Creates an unknown property error.
    pub fn unknown_property(table: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            table: table.into(),
            property: property.into(),
        }
    }

    /// Creates a missing metadata error.
    pub fn missing_metadata(
        table: impl Into<String>,
        property: impl Into<String>,
        mapped_table: impl Into<String>,
    ) -> Self {
        Self::MissingMetadata {
            table: table.into(),
            property: property.into(),
            mapped_table: mapped_table.into(),
        }
    }

    /// Creates a missing relation link error.
    pub fn missing_relation_link(table: impl Into<String>, property: impl Into<String>) -> Self {
        Self::MissingRelationLink {
            table: table.into(),
            property: property.into(),
        }
    }

    /// Creates a missing join field error.
    pub fn missing_join_field(
        table: impl Into<String>,
        property: impl Into<String>,
        mapped_table: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::MissingJoinField {
            table: table.into(),
            property: property.into(),
            mapped_table: mapped_table.into(),
            field: field.into(),
        }
    }

    /// Creates a table mismatch error.
    pub fn table_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TableMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by inconsistent metadata.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownProperty { .. }
                | Self::MissingMetadata { .. }
                | Self::MissingRelationLink { .. }
                | Self::MissingJoinField { .. }
                | Self::MissingIdField { .. }
                | Self::DuplicateField { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_table_and_property() {
        let err = PersistError::unknown_property("users", "nickname");
        assert_eq!(
            err.to_string(),
            "unknown property \"nickname\" in table \"users\""
        );

        let err = PersistError::DuplicateId {
            table: "users".into(),
            id: Value::from("1"),
        };
        assert_eq!(
            err.to_string(),
            "entity already stored with id \"1\" in table \"users\""
        );
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert!(PersistError::missing_relation_link("carts", "user").is_configuration_error());
        assert!(!PersistError::invalid_operation("nope").is_configuration_error());
        assert!(!PersistError::DanglingReference {
            property: "user".into(),
            mapped_table: "users".into(),
            id: Value::Integer(9),
        }
        .is_configuration_error());
    }
}
