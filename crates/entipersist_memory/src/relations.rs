//! Relation population for stored entities.

use crate::table::MemoryTable;
use entipersist_core::{
    Entity, EntityMetadata, ManyToOneRelation, MetadataManager, OneToManyRelation, PersistError,
    PersistResult, Related,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Read view used to resolve relations.
pub(crate) struct RelationResolver<'a> {
    pub(crate) tables: &'a HashMap<String, MemoryTable>,
    pub(crate) metadata: &'a MetadataManager,
}

impl RelationResolver<'_> {
    /// Attaches every declared relation of `metadata` to `entity`.
    pub(crate) fn populate(
        &self,
        metadata: &EntityMetadata,
        mut entity: Entity,
    ) -> PersistResult<Entity> {
        for relation in &metadata.one_to_many_relations {
            let related = self.one_to_many(metadata, relation, &entity)?;
            entity.set_relation(relation.property_name.clone(), related);
        }
        for relation in &metadata.many_to_one_relations {
            let related = self.many_to_one(metadata, relation, &entity)?;
            entity.set_relation(relation.property_name.clone(), related);
        }
        Ok(entity)
    }

    pub(crate) fn populate_all(
        &self,
        metadata: &EntityMetadata,
        entities: Vec<Entity>,
    ) -> PersistResult<Vec<Entity>> {
        entities
            .into_iter()
            .map(|entity| self.populate(metadata, entity))
            .collect()
    }

    fn linked_metadata(
        &self,
        metadata: &EntityMetadata,
        property_name: &str,
        mapped_table: &str,
    ) -> PersistResult<Arc<EntityMetadata>> {
        if mapped_table.is_empty() {
            return Err(PersistError::missing_relation_link(
                &metadata.table_name,
                property_name,
            ));
        }
        self.metadata
            .get_metadata_by_table(mapped_table)
            .ok_or_else(|| {
                PersistError::missing_metadata(&metadata.table_name, property_name, mapped_table)
            })
    }

    fn one_to_many(
        &self,
        metadata: &EntityMetadata,
        relation: &OneToManyRelation,
        entity: &Entity,
    ) -> PersistResult<Related> {
        let linked = self.linked_metadata(
            metadata,
            &relation.property_name,
            &relation.mapped_table,
        )?;

        // `mapped_by` names either a plain field or a many-to-one relation.
        let join_column = linked
            .column_name(&relation.mapped_by)
            .or_else(|| {
                linked
                    .many_to_one_relations
                    .iter()
                    .find(|r| r.property_name == relation.mapped_by)
                    .map(|r| r.join_column.as_str())
            })
            .ok_or_else(|| {
                PersistError::missing_join_field(
                    &metadata.table_name,
                    &relation.property_name,
                    &relation.mapped_table,
                    &relation.mapped_by,
                )
            })?;

        let foreign_key = linked.property_name_for_column(join_column).ok_or_else(|| {
            PersistError::missing_join_field(
                &metadata.table_name,
                &relation.property_name,
                &relation.mapped_table,
                join_column,
            )
        })?;

        let Some(id) = entity.id(metadata) else {
            return Ok(Related::Many(Vec::new()));
        };

        let related = self
            .tables
            .get(&relation.mapped_table)
            .map(|table| {
                table
                    .items
                    .iter()
                    .filter(|item| item.value.get(foreign_key) == Some(id))
                    .map(|item| item.value.simplified())
                    .collect()
            })
            .unwrap_or_default();

        tracing::trace!(
            table = %metadata.table_name,
            property = %relation.property_name,
            id = %id,
            "populated one-to-many relation"
        );
        Ok(Related::Many(related))
    }

    fn many_to_one(
        &self,
        metadata: &EntityMetadata,
        relation: &ManyToOneRelation,
        entity: &Entity,
    ) -> PersistResult<Related> {
        self.linked_metadata(metadata, &relation.property_name, &relation.mapped_table)?;

        let foreign_key = metadata
            .property_name_for_column(&relation.join_column)
            .ok_or_else(|| {
                PersistError::missing_join_field(
                    &metadata.table_name,
                    &relation.property_name,
                    &relation.mapped_table,
                    &relation.join_column,
                )
            })?;

        let Some(id) = entity.get(foreign_key).filter(|v| v.is_truthy()) else {
            return Ok(Related::One(None));
        };

        let target = self
            .tables
            .get(&relation.mapped_table)
            .and_then(|table| table.find_by_id(id))
            .ok_or_else(|| PersistError::DanglingReference {
                property: relation.property_name.clone(),
                mapped_table: relation.mapped_table.clone(),
                id: id.clone(),
            })?;

        tracing::trace!(
            table = %metadata.table_name,
            property = %relation.property_name,
            id = %id,
            "populated many-to-one relation"
        );
        Ok(Related::One(Some(Box::new(target.value.simplified()))))
    }
}
