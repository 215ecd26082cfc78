//! Selection and hover state machine
//!
//! Picking an entity always resets every visual to baseline first, then
//! highlights the entity, its direct neighbours and the relationships that
//! touch it. Hover is tracked separately and never disturbs the selection.

use tracing::{debug, trace};
use ts_core::{Entity, EntityId, GraphModel};
use ts_render::{HighlightLevel, RenderAdapter};

use crate::filter::VisibilitySet;
use crate::scene::Scene;

/// Receives the selected entity, or `None` when the selection is cleared
pub trait SelectionListener {
    fn on_selection_changed(&mut self, entity: Option<&Entity>);
}

impl<F> SelectionListener for F
where
    F: FnMut(Option<&Entity>),
{
    fn on_selection_changed(&mut self, entity: Option<&Entity>) {
        self(entity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(EntityId),
}

/// Owns the current selection and hover target
#[derive(Default)]
pub struct SelectionController {
    state: SelectionState,
    hovered: Option<EntityId>,
    listener: Option<Box<dyn SelectionListener>>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> Option<&str> {
        match &self.state {
            SelectionState::Selected(id) => Some(id),
            SelectionState::Idle => None,
        }
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Install the listener, replacing any previous one
    pub fn set_listener(&mut self, listener: impl SelectionListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Select `id`, or clear the selection with `None`.
    ///
    /// An id the model does not know is ignored and leaves every visual as
    /// it was. Returns whether the pick was applied.
    pub fn pick(
        &mut self,
        id: Option<&str>,
        model: &GraphModel,
        scene: &Scene,
        renderer: &mut dyn RenderAdapter,
    ) -> bool {
        match id {
            Some(id) => {
                let Some(entity) = model.get_entity(id) else {
                    debug!("Ignoring pick of unknown entity {}", id);
                    return false;
                };
                reset_highlights(scene, renderer);
                highlight_neighbourhood(id, model, scene, renderer);
                self.state = SelectionState::Selected(id.to_string());
                debug!("Selected {}", id);
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_selection_changed(Some(entity));
                }
            }
            None => {
                reset_highlights(scene, renderer);
                let was_selected = matches!(self.state, SelectionState::Selected(_));
                self.state = SelectionState::Idle;
                if was_selected {
                    debug!("Selection cleared");
                    if let Some(listener) = self.listener.as_mut() {
                        listener.on_selection_changed(None);
                    }
                }
            }
        }
        true
    }

    /// Move the hover emphasis to `id`, or drop it with `None`
    pub fn hover(
        &mut self,
        id: Option<&str>,
        model: &GraphModel,
        scene: &Scene,
        renderer: &mut dyn RenderAdapter,
    ) {
        if self.hovered.as_deref() == id {
            return;
        }
        if let Some(handle) = self.hovered.as_deref().and_then(|h| scene.entity_handle(h)) {
            renderer.set_hover(handle, false);
        }
        self.hovered = match id {
            Some(id) if model.contains(id) => {
                if let Some(handle) = scene.entity_handle(id) {
                    renderer.set_hover(handle, true);
                }
                trace!("Hovering {}", id);
                Some(id.to_string())
            }
            _ => None,
        };
    }

    /// Push the current selection and hover onto freshly created visuals.
    ///
    /// A selection whose entity left the model falls back to idle.
    pub fn reapply(&mut self, model: &GraphModel, scene: &Scene, renderer: &mut dyn RenderAdapter) {
        if let SelectionState::Selected(id) = &self.state {
            if model.contains(id) {
                highlight_neighbourhood(id, model, scene, renderer);
            } else {
                debug!("Selected entity {} is gone, clearing selection", id);
                self.state = SelectionState::Idle;
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_selection_changed(None);
                }
            }
        }

        match self.hovered.as_deref() {
            Some(id) if model.contains(id) => {
                if let Some(handle) = scene.entity_handle(id) {
                    renderer.set_hover(handle, true);
                }
            }
            Some(_) => self.hovered = None,
            None => {}
        }
    }

    /// Drop the highlight of a selection that the filter hid, and restore
    /// it once the selected entity is visible again. The selection itself
    /// is kept either way.
    pub fn sync_visibility(
        &self,
        visibility: &VisibilitySet,
        model: &GraphModel,
        scene: &Scene,
        renderer: &mut dyn RenderAdapter,
    ) {
        let SelectionState::Selected(id) = &self.state else {
            return;
        };
        reset_highlights(scene, renderer);
        if visibility.is_entity_visible(id) {
            highlight_neighbourhood(id, model, scene, renderer);
        } else {
            trace!("Selected entity {} is hidden", id);
        }
    }
}

fn reset_highlights(scene: &Scene, renderer: &mut dyn RenderAdapter) {
    for (_, handle) in scene.entity_handles() {
        renderer.set_highlight(handle, HighlightLevel::Baseline);
    }
    for (_, handle) in scene.relationship_handles() {
        renderer.set_highlight(handle, HighlightLevel::Baseline);
    }
}

fn highlight_neighbourhood(
    id: &str,
    model: &GraphModel,
    scene: &Scene,
    renderer: &mut dyn RenderAdapter,
) {
    if let Some(handle) = scene.entity_handle(id) {
        renderer.set_highlight(handle, HighlightLevel::Selected);
    }

    for index in model.indices_involving(id) {
        let Some(rel) = model.relationship(index) else {
            continue;
        };
        if let Some(handle) = scene.relationship_handle(index) {
            renderer.set_highlight(handle, HighlightLevel::Emphasized);
        }
        // self-loops keep the selected style
        if let Some(other) = rel.other_endpoint(id).filter(|other| *other != id) {
            if let Some(handle) = scene.entity_handle(other) {
                renderer.set_highlight(handle, HighlightLevel::Related);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use ts_core::{
        Category, EntityRecord, NoJitter, RelationKind, RelationshipRecord, TemporalLayout,
    };
    use ts_render::palette::{LineStyle, ACCENT, RELATIONSHIP_OPACITY, SELECTED_EMISSIVE};
    use ts_render::RecordingRenderer;

    fn fixture() -> (GraphModel, Scene, RecordingRenderer) {
        let model = GraphModel::from_records(
            vec![
                EntityRecord::new("A", "A", 1970, Category::Server),
                EntityRecord::new("B", "B", 1980, Category::Personal),
                EntityRecord::new("C", "C", 1990, Category::Personal),
                EntityRecord::new("D", "D", 2000, Category::Mobile),
            ],
            vec![
                RelationshipRecord::new("A", "B", RelationKind::Influence, 0.9),
                RelationshipRecord::new("B", "C", RelationKind::Evolution, 0.5),
                RelationshipRecord::new("C", "D", RelationKind::Inspiration, 0.3),
            ],
        )
        .unwrap();
        let layout = TemporalLayout::default().compute(model.entities(), &mut NoJitter);
        let mut renderer = RecordingRenderer::new();
        let scene = Scene::materialize(&model, &layout, &mut renderer);
        (model, scene, renderer)
    }

    fn sorted(mut ids: Vec<String>) -> Vec<String> {
        ids.sort();
        ids
    }

    #[test]
    fn test_pick_highlights_neighbourhood() {
        let (model, scene, mut renderer) = fixture();
        let mut selection = SelectionController::new();

        assert!(selection.pick(Some("B"), &model, &scene, &mut renderer));

        assert_eq!(selection.selected(), Some("B"));
        assert_eq!(renderer.entities_at(HighlightLevel::Selected), vec!["B"]);
        assert_eq!(
            sorted(renderer.entities_at(HighlightLevel::Related)),
            vec!["A", "C"]
        );
        assert_eq!(renderer.entities_at(HighlightLevel::Baseline), vec!["D"]);
        assert_eq!(renderer.emphasized_relationships().len(), 2);
    }

    #[test]
    fn test_second_pick_leaves_no_stale_highlight() {
        let (model, scene, mut renderer) = fixture();
        let mut selection = SelectionController::new();

        selection.pick(Some("A"), &model, &scene, &mut renderer);
        selection.pick(Some("D"), &model, &scene, &mut renderer);

        for (from, to) in renderer.emphasized_relationships() {
            assert!(from == "D" || to == "D", "stale edge {from}->{to}");
        }
        assert_eq!(renderer.entities_at(HighlightLevel::Selected), vec!["D"]);
        assert_eq!(renderer.entities_at(HighlightLevel::Related), vec!["C"]);
        assert!(!renderer
            .entities_at(HighlightLevel::Related)
            .contains(&"B".to_string()));
    }

    #[test]
    fn test_unknown_pick_is_a_no_op() {
        let (model, scene, mut renderer) = fixture();
        let mut selection = SelectionController::new();
        selection.pick(Some("A"), &model, &scene, &mut renderer);

        assert!(!selection.pick(Some("nope"), &model, &scene, &mut renderer));
        assert_eq!(selection.selected(), Some("A"));
        assert_eq!(renderer.entities_at(HighlightLevel::Selected), vec!["A"]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let (model, scene, mut renderer) = fixture();
        let mut selection = SelectionController::new();
        selection.pick(Some("C"), &model, &scene, &mut renderer);
        selection.pick(None, &model, &scene, &mut renderer);

        assert_eq!(selection.state(), &SelectionState::Idle);
        assert_eq!(renderer.entities_at(HighlightLevel::Baseline).len(), 4);
        assert!(renderer.emphasized_relationships().is_empty());
    }

    #[test]
    fn test_listener_sees_selection_and_clear() {
        let (model, scene, mut renderer) = fixture();
        let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut selection = SelectionController::new();
        selection.set_listener(move |entity: Option<&Entity>| {
            sink.borrow_mut().push(entity.map(|e| e.id.clone()));
        });

        selection.pick(Some("B"), &model, &scene, &mut renderer);
        selection.pick(Some("missing"), &model, &scene, &mut renderer);
        selection.pick(None, &model, &scene, &mut renderer);
        // clearing an idle selection does not notify again
        selection.pick(None, &model, &scene, &mut renderer);

        assert_eq!(*seen.borrow(), vec![Some("B".to_string()), None]);
    }

    #[test]
    fn test_hover_is_independent_of_selection() {
        let (model, scene, mut renderer) = fixture();
        let mut selection = SelectionController::new();
        selection.pick(Some("A"), &model, &scene, &mut renderer);

        selection.hover(Some("D"), &model, &scene, &mut renderer);
        assert!(renderer.entity_visual("D").unwrap().hovered);
        assert_eq!(renderer.entities_at(HighlightLevel::Selected), vec!["A"]);

        selection.hover(Some("A"), &model, &scene, &mut renderer);
        assert!(!renderer.entity_visual("D").unwrap().hovered);
        assert!(renderer.entity_visual("A").unwrap().hovered);

        selection.hover(None, &model, &scene, &mut renderer);
        assert_eq!(selection.hovered(), None);
        assert!(!renderer.entity_visual("A").unwrap().hovered);
    }

    #[test]
    fn test_reapply_after_rebuild() {
        let (model, _, mut renderer) = fixture();
        let layout = TemporalLayout::default().compute(model.entities(), &mut NoJitter);
        let scene = Scene::materialize(&model, &layout, &mut renderer);
        let mut selection = SelectionController::new();
        selection.pick(Some("C"), &model, &scene, &mut renderer);
        selection.hover(Some("A"), &model, &scene, &mut renderer);

        let rebuilt = Scene::materialize(&model, &layout, &mut renderer);
        assert!(renderer.entities_at(HighlightLevel::Selected).is_empty());

        selection.reapply(&model, &rebuilt, &mut renderer);
        assert_eq!(renderer.entities_at(HighlightLevel::Selected), vec!["C"]);
        assert_eq!(renderer.emphasized_relationships().len(), 2);
        assert!(renderer.entity_visual("A").unwrap().hovered);
    }

    #[test]
    fn test_hidden_selection_drops_neighbour_highlight() {
        let (model, scene, mut renderer) = fixture();
        let mut selection = SelectionController::new();
        selection.pick(Some("B"), &model, &scene, &mut renderer);

        let hidden = VisibilitySet::compute(&model, |e| e.id != "B");
        selection.sync_visibility(&hidden, &model, &scene, &mut renderer);
        assert_eq!(selection.selected(), Some("B"));
        assert_eq!(renderer.entities_at(HighlightLevel::Baseline).len(), 4);
        assert!(renderer.emphasized_relationships().is_empty());

        selection.sync_visibility(&VisibilitySet::all(&model), &model, &scene, &mut renderer);
        assert_eq!(renderer.entities_at(HighlightLevel::Selected), vec!["B"]);
        assert_eq!(
            sorted(renderer.entities_at(HighlightLevel::Related)),
            vec!["A", "C"]
        );
    }

    #[test]
    fn test_emphasized_edge_style_follows_selection() {
        let (model, scene, mut renderer) = fixture();
        let mut selection = SelectionController::new();
        let edge = scene.relationship_handle(0).unwrap();

        selection.pick(Some("A"), &model, &scene, &mut renderer);
        assert_eq!(
            renderer.line_style(edge),
            Some(LineStyle {
                color: ACCENT,
                opacity: 1.0
            })
        );
        assert_eq!(
            renderer.entity_style("A").map(|style| style.emissive),
            Some(SELECTED_EMISSIVE)
        );

        selection.pick(Some("D"), &model, &scene, &mut renderer);
        let style = renderer.line_style(edge).unwrap();
        assert_ne!(style.color, ACCENT);
        assert!((style.opacity - 0.9 * RELATIONSHIP_OPACITY).abs() < 1e-6);
        assert_eq!(
            renderer.entity_style("A").map(|style| style.emissive_intensity),
            Some(0.0)
        );
    }
}
