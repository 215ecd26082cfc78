//! The graph model: owned entity and relationship sets

use ahash::AHashMap;
use indexmap::IndexMap;
use tracing::{info, warn};

use super::validation::{validate, ValidationError};
use super::{Entity, EntityId, EntityRecord, Relationship, RelationshipIndex, RelationshipRecord};
use crate::state::ValidationSettings;

/// Owns the entity set and the directed relationship set.
///
/// The model has no partial mutation API: callers replace the whole set with
/// [`GraphModel::load`]. Entities iterate in insertion order and
/// relationships in registration order.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    entities: IndexMap<EntityId, Entity>,
    relationships: Vec<Relationship>,
    outgoing: AHashMap<EntityId, Vec<RelationshipIndex>>,
    incoming: AHashMap<EntityId, Vec<RelationshipIndex>>,
}

impl GraphModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate records and build a model from them
    pub fn from_records(
        entities: Vec<EntityRecord>,
        relationships: Vec<RelationshipRecord>,
    ) -> Result<Self, ValidationError> {
        Self::from_records_with(entities, relationships, &ValidationSettings::default())
    }

    /// Validate records against explicit year bounds and build a model
    pub fn from_records_with(
        entities: Vec<EntityRecord>,
        relationships: Vec<RelationshipRecord>,
        bounds: &ValidationSettings,
    ) -> Result<Self, ValidationError> {
        match validate(entities, relationships, bounds) {
            Ok((entities, relationships)) => Ok(Self::build(entities, relationships)),
            Err(err) => {
                warn!("Rejected graph input with {} issue(s)", err.issues.len());
                Err(err)
            }
        }
    }

    /// Replace the whole model. On error the current contents are kept.
    pub fn load(
        &mut self,
        entities: Vec<EntityRecord>,
        relationships: Vec<RelationshipRecord>,
    ) -> Result<(), ValidationError> {
        self.load_with(entities, relationships, &ValidationSettings::default())
    }

    /// Replace the whole model using explicit year bounds
    pub fn load_with(
        &mut self,
        entities: Vec<EntityRecord>,
        relationships: Vec<RelationshipRecord>,
        bounds: &ValidationSettings,
    ) -> Result<(), ValidationError> {
        *self = Self::from_records_with(entities, relationships, bounds)?;
        Ok(())
    }

    fn build(entities: Vec<Entity>, relationships: Vec<Relationship>) -> Self {
        let mut outgoing: AHashMap<EntityId, Vec<RelationshipIndex>> = AHashMap::new();
        let mut incoming: AHashMap<EntityId, Vec<RelationshipIndex>> = AHashMap::new();
        for (index, rel) in relationships.iter().enumerate() {
            outgoing.entry(rel.from.clone()).or_default().push(index);
            incoming.entry(rel.to.clone()).or_default().push(index);
        }

        let entities: IndexMap<EntityId, Entity> = entities
            .into_iter()
            .map(|entity| (entity.id.clone(), entity))
            .collect();

        info!(
            "Loaded graph model: {} entities, {} relationships",
            entities.len(),
            relationships.len()
        );

        Self {
            entities,
            relationships,
            outgoing,
            incoming,
        }
    }

    /// Look up an entity by id
    pub fn get_entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// All entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Insertion position of an entity
    pub fn entity_index(&self, id: &str) -> Option<usize> {
        self.entities.get_index_of(id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All relationships in registration order
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn relationship(&self, index: RelationshipIndex) -> Option<&Relationship> {
        self.relationships.get(index)
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Indices of relationships leaving `id`, in registration order
    pub fn outgoing_indices(&self, id: &str) -> &[RelationshipIndex] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices of relationships entering `id`, in registration order
    pub fn incoming_indices(&self, id: &str) -> &[RelationshipIndex] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Relationships leaving `id`, in registration order
    pub fn relationships_from<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.outgoing_indices(id)
            .iter()
            .map(move |&index| &self.relationships[index])
    }

    /// Relationships entering `id`, in registration order
    pub fn relationships_to<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.incoming_indices(id)
            .iter()
            .map(move |&index| &self.relationships[index])
    }

    /// Indices of every relationship with `id` as either endpoint, in
    /// registration order. A self-loop appears once.
    pub fn indices_involving(&self, id: &str) -> Vec<RelationshipIndex> {
        let mut indices: Vec<RelationshipIndex> = self
            .outgoing_indices(id)
            .iter()
            .chain(self.incoming_indices(id))
            .copied()
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Number of relationships leaving `id`
    pub fn out_degree(&self, id: &str) -> usize {
        self.outgoing_indices(id).len()
    }
}
