//! The timeline view: ties the model, layout, selection and filters to a
//! render backend
//!
//! Filter and layout changes are queued and applied one per frame from
//! [`TimelineView::tick`]. Pointer input is handled synchronously so that
//! picking always sees the current scene.

use std::collections::VecDeque;
use std::sync::Arc;

use ahash::AHashSet;
use rand::seq::IteratorRandom;
use rand::Rng;
use tracing::{debug, info, warn};
use ts_core::{
    events::events::{
        LayoutComputed, ModelLoaded, SelectionChanged, StatsComputed, VisibilityChanged,
    },
    layout::{Layout, SeededJitter, TemporalLayout},
    state::FilterMode,
    Analytics, CameraRig, Category, Entity, EntityId, EntityRecord, EventBus, GraphModel,
    GraphStats, RelationshipRecord, ShuttleSettings, ValidationError,
};
use ts_render::RenderAdapter;

use crate::animation::FloatAnimation;
use crate::filter::{FilterCriteria, VisibilityFilter, VisibilityListener, VisibilitySet};
use crate::scene::Scene;
use crate::selection::{SelectionController, SelectionListener};

/// A deferred change, applied by the next frame
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Replace the year range, keeping the category filter
    TimeRange(Option<(i32, i32)>),
    /// Replace the category filter, keeping the year range
    Categories(Option<AHashSet<Category>>),
    /// Replace both criteria
    Filter(FilterCriteria),
    /// Recompute positions for the current active set
    Relayout,
    /// Drop every filter, relayout and home the camera
    Reset,
}

/// Pointer input in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Click { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Leave,
}

pub struct TimelineView<R: RenderAdapter> {
    settings: ShuttleSettings,
    model: GraphModel,
    algorithm: TemporalLayout,
    /// Positions of every entity from the last full pass
    full_layout: Layout,
    /// What the scene was materialized from
    layout: Layout,
    scene: Scene,
    selection: SelectionController,
    filter: VisibilityFilter,
    camera: CameraRig,
    animation: FloatAnimation,
    stats: GraphStats,
    events: Arc<EventBus>,
    pending: VecDeque<Mutation>,
    renderer: R,
}

impl<R: RenderAdapter> TimelineView<R> {
    pub fn new(renderer: R, settings: ShuttleSettings) -> Self {
        Self {
            algorithm: TemporalLayout::new(settings.layout.clone()),
            camera: CameraRig::new(settings.camera.clone()),
            animation: FloatAnimation::new(settings.animation.clone()),
            settings,
            model: GraphModel::new(),
            full_layout: Layout::default(),
            layout: Layout::default(),
            scene: Scene::default(),
            selection: SelectionController::new(),
            filter: VisibilityFilter::new(),
            stats: GraphStats::default(),
            events: Arc::new(EventBus::new()),
            pending: VecDeque::new(),
            renderer,
        }
    }

    pub fn settings(&self) -> &ShuttleSettings {
        &self.settings
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(&self.model)
    }

    /// Positions the current scene was built from
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn visibility(&self) -> &VisibilitySet {
        self.filter.current()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        self.filter.criteria()
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Statistics of the visible subgraph
    pub fn stats(&self) -> &GraphStats {
        &self.stats
    }

    pub fn events(&self) -> Arc<EventBus> {
        Arc::clone(&self.events)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn pending_mutations(&self) -> usize {
        self.pending.len()
    }

    /// Install the selection listener, replacing any previous one
    pub fn on_selection_changed(&mut self, listener: impl SelectionListener + 'static) {
        self.selection.set_listener(listener);
    }

    /// Install the visibility listener, replacing any previous one
    pub fn on_visibility_changed(&mut self, listener: impl VisibilityListener + 'static) {
        self.filter.set_listener(listener);
    }

    /// Receive the statistics of every load and filter pass
    pub fn on_stats_computed<F>(&self, mut f: F)
    where
        F: FnMut(&GraphStats) + Send + Sync + 'static,
    {
        self.events
            .on::<StatsComputed, _>("ui", move |event| f(&event.stats));
    }

    /// Validate records and rebuild everything from them. On error the
    /// current model and scene are kept.
    pub fn load(
        &mut self,
        entities: Vec<EntityRecord>,
        relationships: Vec<RelationshipRecord>,
    ) -> Result<(), ValidationError> {
        let model = GraphModel::from_records_with(entities, relationships, &self.settings.validation)
            .map_err(|err| {
                warn!("Keeping current model: {}", err);
                err
            })?;
        self.set_model(model);
        Ok(())
    }

    /// Install an already validated model and rebuild the scene
    pub fn set_model(&mut self, model: GraphModel) {
        self.model = model;
        self.pending.clear();
        self.events.publish(ModelLoaded {
            entity_count: self.model.entity_count(),
            relationship_count: self.model.relationship_count(),
        });

        self.full_layout = self.compute_layout(false);
        let criteria = self.filter.criteria().clone();
        self.filter.apply_criteria(&self.model, criteria);
        self.rebuild();
        self.publish_visibility();
    }

    /// Queue a year range for the next frame
    pub fn set_time_range(&mut self, start: i32, end: i32) {
        let range = FilterCriteria::all().with_year_range(start, end).year_range;
        self.pending.push_back(Mutation::TimeRange(range));
    }

    pub fn clear_time_range(&mut self) {
        self.pending.push_back(Mutation::TimeRange(None));
    }

    /// Queue a category filter for the next frame
    pub fn set_categories(&mut self, categories: impl IntoIterator<Item = Category>) {
        self.pending
            .push_back(Mutation::Categories(Some(categories.into_iter().collect())));
    }

    pub fn clear_categories(&mut self) {
        self.pending.push_back(Mutation::Categories(None));
    }

    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.pending.push_back(Mutation::Filter(criteria));
    }

    pub fn request_relayout(&mut self) {
        self.pending.push_back(Mutation::Relayout);
    }

    pub fn reset_view(&mut self) {
        self.pending.push_back(Mutation::Reset);
    }

    /// Advance one frame: apply at most one queued mutation, step the
    /// camera, then run the animation pass. Returns whether a mutation ran.
    pub fn tick(&mut self, time: f32) -> bool {
        let applied = match self.pending.pop_front() {
            Some(mutation) => {
                self.apply_mutation(mutation);
                true
            }
            None => false,
        };

        if let Some(pose) = self.camera.step() {
            self.renderer.set_camera(pose);
        }

        self.animation.apply(
            time,
            &self.layout,
            &self.scene,
            self.filter.current(),
            &mut self.renderer,
        );
        applied
    }

    /// Apply every queued mutation, one pass each, without animating
    pub fn flush(&mut self) {
        while let Some(mutation) = self.pending.pop_front() {
            self.apply_mutation(mutation);
        }
    }

    fn apply_mutation(&mut self, mutation: Mutation) {
        debug!("Applying {:?}", mutation);
        let mut criteria = self.filter.criteria().clone();
        match mutation {
            Mutation::TimeRange(range) => criteria.year_range = range,
            Mutation::Categories(categories) => criteria.categories = categories,
            Mutation::Filter(replacement) => criteria = replacement,
            Mutation::Relayout => {
                self.full_layout = self.compute_layout(false);
                self.rebuild();
                return;
            }
            Mutation::Reset => {
                self.filter.apply_criteria(&self.model, FilterCriteria::all());
                self.full_layout = self.compute_layout(false);
                self.rebuild();
                self.publish_visibility();
                self.reset_camera();
                return;
            }
        }
        self.apply_filter(criteria);
    }

    fn apply_filter(&mut self, criteria: FilterCriteria) {
        let previous = self.filter.current().clone();
        self.filter.apply_criteria(&self.model, criteria);

        let reflow = self.settings.filter.mode == FilterMode::Reflow;
        if reflow && self.filter.current() != &previous {
            self.rebuild();
        } else {
            self.filter.push_to(&self.scene, &mut self.renderer);
            self.sync_selection_visibility();
        }
        self.publish_visibility();
    }

    /// Layout pass over the whole model, or over the visible entities only
    fn compute_layout(&self, visible_only: bool) -> Layout {
        let mut jitter = SeededJitter::from_settings(&self.settings.layout);
        let visibility = self.filter.current();
        let entities = self
            .model
            .entities()
            .filter(|e| !visible_only || visibility.is_entity_visible(&e.id));
        self.algorithm.compute(entities, &mut jitter)
    }

    /// Recreate every visual from the current model, filter and selection
    fn rebuild(&mut self) {
        self.layout = match self.settings.filter.mode {
            FilterMode::Hide => self.full_layout.clone(),
            FilterMode::Reflow => {
                let mut layout = self.compute_layout(true);
                layout.carry_over(&self.full_layout);
                layout
            }
        };

        self.scene = Scene::materialize(&self.model, &self.layout, &mut self.renderer);
        self.filter.push_to(&self.scene, &mut self.renderer);
        self.selection
            .reapply(&self.model, &self.scene, &mut self.renderer);
        self.sync_selection_visibility();

        info!(
            "Rebuilt scene: {} entities placed, timeline length {:.1}",
            self.layout.ranked_len(),
            self.layout.timeline_length
        );
        self.events.publish(LayoutComputed {
            entity_count: self.layout.ranked_len(),
            timeline_length: self.layout.timeline_length,
        });
    }

    fn sync_selection_visibility(&mut self) {
        self.selection.sync_visibility(
            self.filter.current(),
            &self.model,
            &self.scene,
            &mut self.renderer,
        );
    }

    fn publish_visibility(&mut self) {
        let visibility = self.filter.current();
        self.events.publish(VisibilityChanged {
            visible_entities: visibility.visible_count(),
            hidden_entities: visibility.hidden_count(),
        });

        self.stats = GraphStats::compute_filtered(&self.model, |e| visibility.is_entity_visible(&e.id));
        self.events.publish(StatsComputed {
            stats: self.stats.clone(),
        });
    }

    /// Route pointer input through the backend's picking
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Click { x, y } => {
                let hit = self.renderer.pick_at(x, y);
                self.select(hit.as_deref());
            }
            PointerEvent::Move { x, y } => {
                let hit = self.renderer.pick_at(x, y);
                self.hover(hit.as_deref());
            }
            PointerEvent::Leave => self.hover(None),
        }
    }

    /// Select whatever lies under a screen point; empty space clears
    pub fn pick_at(&mut self, x: f32, y: f32) {
        self.handle_pointer(PointerEvent::Click { x, y });
    }

    pub fn hover_at(&mut self, x: f32, y: f32) {
        self.handle_pointer(PointerEvent::Move { x, y });
    }

    /// Select an entity by id, or clear with `None`. Unknown ids are ignored.
    ///
    /// `SelectionChanged` is published only when the selection moved.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        let previous = self.selection.state().clone();
        let applied = self
            .selection
            .pick(id, &self.model, &self.scene, &mut self.renderer);
        if applied && self.selection.state() != &previous {
            self.events.publish(SelectionChanged {
                entity: self.selected_entity().cloned(),
            });
        }
        applied
    }

    pub fn hover(&mut self, id: Option<&str>) {
        self.selection
            .hover(id, &self.model, &self.scene, &mut self.renderer);
    }

    /// The selected entity, if any
    pub fn selected_entity(&self) -> Option<&Entity> {
        self.selection
            .selected()
            .and_then(|id| self.model.get_entity(id))
    }

    /// Start a camera transition toward an entity. Returns false when the
    /// entity has no position.
    pub fn focus_on(&mut self, id: &str) -> bool {
        match self.layout.position(id) {
            Some(position) => {
                self.camera.focus_on(position);
                true
            }
            None => {
                debug!("Cannot focus {}: not placed", id);
                false
            }
        }
    }

    /// Focus a random visible entity
    pub fn focus_random<G: Rng + ?Sized>(&mut self, rng: &mut G) -> Option<EntityId> {
        let id = self
            .filter
            .current()
            .visible_ids()
            .filter(|id| self.layout.contains(id))
            .choose(rng)?
            .to_string();
        self.focus_on(&id);
        Some(id)
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
        self.renderer.set_camera(self.camera.pose());
    }
}
