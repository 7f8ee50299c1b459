//! Fixture metadata and entity builders.
//!
//! Three linked tables:
//! - `users` has many `carts` and belongs to one `contacts` record
//! - `carts` belongs to one `users` record
//! - `contacts` stands alone
//!
//! Register all of them with [`setup_metadata`] before reading, since
//! relation population looks linked tables up by name.

use entipersist_core::{
    Entity, EntityField, EntityFieldType, EntityMetadata, ManyToOneRelation, OneToManyRelation,
    Persister, TemporalProperty, Value,
};

/// Users table name.
pub const USERS: &str = "users";
/// Carts table name.
pub const CARTS: &str = "carts";
/// Contacts table name.
pub const CONTACTS: &str = "contacts";

const CONTACTS_JSON: &str = r#"{
    "tableName": "contacts",
    "idPropertyName": "id",
    "fields": [
        { "propertyName": "id", "columnName": "contact_id", "fieldType": "text" },
        { "propertyName": "email", "columnName": "email" },
        { "propertyName": "phone", "columnName": "phone" }
    ]
}"#;

/// Metadata for `users`.
///
/// `carts` is resolved through the `user` many-to-one relation declared
/// on carts; `contact` through the `contact_id` column.
pub fn users_metadata() -> EntityMetadata {
    EntityMetadata::new(USERS, "id")
        .with_field(EntityField::new("id", "user_id").with_type(EntityFieldType::Text))
        .with_field(EntityField::new("name", "name"))
        .with_field(EntityField::new("city", "city"))
        .with_field(EntityField::new("age", "age").with_type(EntityFieldType::Integer))
        .with_field(EntityField::new("contactId", "contact_id"))
        .with_field(
            EntityField::new("createdAt", "created_at").with_type(EntityFieldType::Timestamp),
        )
        .with_one_to_many(OneToManyRelation::new("carts", "user", CARTS))
        .with_many_to_one(ManyToOneRelation::new("contact", "contact_id", CONTACTS))
        .with_temporal(TemporalProperty::new("createdAt"))
}

/// Metadata for `carts`.
pub fn carts_metadata() -> EntityMetadata {
    EntityMetadata::new(CARTS, "id")
        .with_field(EntityField::new("id", "cart_id"))
        .with_field(EntityField::new("userId", "user_id"))
        .with_field(EntityField::new("name", "name"))
        .with_field(EntityField::new("total", "total").with_type(EntityFieldType::Integer))
        .with_many_to_one(ManyToOneRelation::new("user", "user_id", USERS))
}

/// Metadata for `contacts`, declared as JSON.
pub fn contacts_metadata() -> EntityMetadata {
    serde_json::from_str(CONTACTS_JSON).expect("contacts fixture is valid JSON metadata")
}

/// Every fixture table.
pub fn all_metadata() -> Vec<EntityMetadata> {
    vec![users_metadata(), carts_metadata(), contacts_metadata()]
}

/// Registers every fixture table with a persister.
pub fn setup_metadata<P: Persister>(persister: &P) {
    for metadata in all_metadata() {
        persister.setup_entity_metadata(&metadata);
    }
}

/// A user without an id.
pub fn user(name: &str, city: &str, age: i64) -> Entity {
    Entity::new(USERS)
        .with("name", name)
        .with("city", city)
        .with("age", age)
}

/// A cart belonging to `user_id`.
pub fn cart(user_id: impl Into<Value>, name: &str, total: i64) -> Entity {
    Entity::new(CARTS)
        .with("userId", user_id)
        .with("name", name)
        .with("total", total)
}

/// A contact without an id.
pub fn contact(email: &str) -> Entity {
    Entity::new(CONTACTS).with("email", email)
}
