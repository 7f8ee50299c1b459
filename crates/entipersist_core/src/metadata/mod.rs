//! Entity metadata: table shape, relations and the metadata registry.

mod entity_metadata;
mod field;
mod manager;
mod relation;

pub use entity_metadata::EntityMetadata;
pub use field::{EntityField, EntityFieldType, TemporalProperty, TemporalType};
pub use manager::MetadataManager;
pub use relation::{ManyToOneRelation, OneToManyRelation};
