//! Relation declarations between tables.

use serde::{Deserialize, Serialize};

/// A one-to-many relation.
///
/// The owning entity exposes `property_name` as a list of entities from
/// `mapped_table` whose `mapped_by` property points back at the owner's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneToManyRelation {
    /// Relation property on the owning entity.
    pub property_name: String,
    /// Property on the related entity that holds the back reference.
    pub mapped_by: String,
    /// Table of the related entities.
    pub mapped_table: String,
}

impl OneToManyRelation {
    /// Creates a one-to-many relation.
    pub fn new(
        property_name: impl Into<String>,
        mapped_by: impl Into<String>,
        mapped_table: impl Into<String>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            mapped_by: mapped_by.into(),
            mapped_table: mapped_table.into(),
        }
    }
}

/// A many-to-one relation.
///
/// The owning entity stores the related id in the field mapped to
/// `join_column` and exposes the related entity as `property_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManyToOneRelation {
    /// Relation property on the owning entity.
    pub property_name: String,
    /// Column holding the foreign key.
    pub join_column: String,
    /// Table of the related entity.
    pub mapped_table: String,
}

impl ManyToOneRelation {
    /// Creates a many-to-one relation.
    pub fn new(
        property_name: impl Into<String>,
        join_column: impl Into<String>,
        mapped_table: impl Into<String>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            join_column: join_column.into(),
            mapped_table: mapped_table.into(),
        }
    }
}
