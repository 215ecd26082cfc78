//! Visibility filtering by year range and category

use ahash::AHashSet;
use indexmap::IndexSet;
use tracing::debug;
use ts_core::{Category, Entity, EntityId, GraphModel, RelationshipIndex};
use ts_render::RenderAdapter;

use crate::scene::Scene;

/// Active filter criteria. Unset parts accept everything; set parts are
/// combined by conjunction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Inclusive `(start, end)`
    pub year_range: Option<(i32, i32)>,
    pub categories: Option<AHashSet<Category>>,
}

impl FilterCriteria {
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to an inclusive year range. A start past the end collapses
    /// onto the end year.
    pub fn with_year_range(mut self, start: i32, end: i32) -> Self {
        self.year_range = Some((start.min(end), end));
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        self.year_range.is_none() && self.categories.is_none()
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        let in_range = self
            .year_range
            .map_or(true, |(start, end)| (start..=end).contains(&entity.year));
        let in_category = self
            .categories
            .as_ref()
            .map_or(true, |set| set.contains(&entity.category));
        in_range && in_category
    }
}

/// Outcome of one filter pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilitySet {
    entities: IndexSet<EntityId>,
    relationships: Vec<bool>,
    hidden: usize,
}

impl VisibilitySet {
    /// Everything in `model` visible
    pub fn all(model: &GraphModel) -> Self {
        Self::compute(model, |_| true)
    }

    pub(crate) fn compute<P>(model: &GraphModel, predicate: P) -> Self
    where
        P: Fn(&Entity) -> bool,
    {
        let entities: IndexSet<EntityId> = model
            .entities()
            .filter(|e| predicate(e))
            .map(|e| e.id.clone())
            .collect();
        // an edge is shown only when both endpoints are
        let relationships = model
            .relationships()
            .iter()
            .map(|rel| entities.contains(&rel.from) && entities.contains(&rel.to))
            .collect();
        let hidden = model.entity_count() - entities.len();
        Self {
            entities,
            relationships,
            hidden,
        }
    }

    pub fn is_entity_visible(&self, id: &str) -> bool {
        self.entities.contains(id)
    }

    pub fn is_relationship_visible(&self, index: RelationshipIndex) -> bool {
        self.relationships.get(index).copied().unwrap_or(false)
    }

    /// Visible ids in model order
    pub fn visible_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entities.iter().map(String::as_str)
    }

    pub fn visible_count(&self) -> usize {
        self.entities.len()
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden
    }
}

/// Receives every completed filter pass
pub trait VisibilityListener {
    fn on_visibility_changed(&mut self, visibility: &VisibilitySet);
}

impl<F> VisibilityListener for F
where
    F: FnMut(&VisibilitySet),
{
    fn on_visibility_changed(&mut self, visibility: &VisibilitySet) {
        self(visibility)
    }
}

/// Computes which entities and relationships are shown
#[derive(Default)]
pub struct VisibilityFilter {
    criteria: FilterCriteria,
    current: VisibilitySet,
    listener: Option<Box<dyn VisibilityListener>>,
}

impl VisibilityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn current(&self) -> &VisibilitySet {
        &self.current
    }

    /// Install the listener, replacing any previous one
    pub fn set_listener(&mut self, listener: impl VisibilityListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Run a pass with an arbitrary predicate
    pub fn apply<P>(&mut self, model: &GraphModel, predicate: P) -> &VisibilitySet
    where
        P: Fn(&Entity) -> bool,
    {
        self.current = VisibilitySet::compute(model, predicate);
        debug!(
            "Filter pass: {} visible, {} hidden",
            self.current.visible_count(),
            self.current.hidden_count()
        );
        if let Some(listener) = self.listener.as_mut() {
            listener.on_visibility_changed(&self.current);
        }
        &self.current
    }

    /// Replace the criteria and run a pass with them
    pub fn apply_criteria(&mut self, model: &GraphModel, criteria: FilterCriteria) -> &VisibilitySet {
        self.criteria = criteria;
        let criteria = self.criteria.clone();
        self.apply(model, |entity| criteria.matches(entity))
    }

    /// Set the visibility of every materialized visual from the current pass
    pub fn push_to(&self, scene: &Scene, renderer: &mut dyn RenderAdapter) {
        for (id, handle) in scene.entity_handles() {
            renderer.set_visible(handle, self.current.is_entity_visible(id));
        }
        for (index, handle) in scene.relationship_handles() {
            renderer.set_visible(handle, self.current.is_relationship_visible(index));
        }
    }
}
