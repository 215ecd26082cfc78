//! Registry of the visuals materialized for one layout pass

use indexmap::IndexMap;
use tracing::debug;
use ts_core::{layout::Layout, EntityId, GraphModel, RelationshipIndex};
use ts_render::{RenderAdapter, VisualHandle};

/// Maps model records to the renderer handles created for them
#[derive(Debug, Clone, Default)]
pub struct Scene {
    entity_handles: IndexMap<EntityId, VisualHandle>,
    /// Indexed by relationship registration order
    relationship_handles: Vec<Option<VisualHandle>>,
}

impl Scene {
    /// Drop every existing visual and create one per positioned entity and
    /// per relationship whose endpoints are both positioned
    pub fn materialize(
        model: &GraphModel,
        layout: &Layout,
        renderer: &mut dyn RenderAdapter,
    ) -> Self {
        renderer.remove_all();

        let mut entity_handles = IndexMap::with_capacity(model.entity_count());
        for entity in model.entities() {
            if let Some(position) = layout.position(&entity.id) {
                let handle = renderer.create_entity_visual(entity, position);
                entity_handles.insert(entity.id.clone(), handle);
            }
        }

        let relationship_handles = model
            .relationships()
            .iter()
            .map(|rel| match (layout.position(&rel.from), layout.position(&rel.to)) {
                (Some(from), Some(to)) => {
                    Some(renderer.create_relationship_visual(rel, from, to))
                }
                _ => None,
            })
            .collect::<Vec<_>>();

        debug!(
            "Materialized {} entity and {} relationship visuals",
            entity_handles.len(),
            relationship_handles.iter().flatten().count()
        );

        Self {
            entity_handles,
            relationship_handles,
        }
    }

    pub fn entity_handle(&self, id: &str) -> Option<VisualHandle> {
        self.entity_handles.get(id).copied()
    }

    pub fn relationship_handle(&self, index: RelationshipIndex) -> Option<VisualHandle> {
        self.relationship_handles.get(index).copied().flatten()
    }

    /// `(id, handle)` for every entity visual, in model order
    pub fn entity_handles(&self) -> impl Iterator<Item = (&str, VisualHandle)> + '_ {
        self.entity_handles.iter().map(|(id, h)| (id.as_str(), *h))
    }

    /// `(index, handle)` for every relationship visual
    pub fn relationship_handles(&self) -> impl Iterator<Item = (RelationshipIndex, VisualHandle)> + '_ {
        self.relationship_handles
            .iter()
            .enumerate()
            .filter_map(|(index, h)| h.map(|h| (index, h)))
    }

    pub fn is_empty(&self) -> bool {
        self.entity_handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_core::{
        Category, EntityRecord, NoJitter, RelationKind, RelationshipRecord, TemporalLayout,
    };
    use ts_render::RecordingRenderer;

    #[test]
    fn test_materialize_skips_unpositioned_endpoints() {
        let model = GraphModel::from_records(
            vec![
                EntityRecord::new("unix", "Unix", 1969, Category::Server),
                EntityRecord::new("linux", "Linux", 1991, Category::Server),
                EntityRecord::new("ios", "iOS", 2007, Category::Mobile),
            ],
            vec![
                RelationshipRecord::new("unix", "linux", RelationKind::Influence, 0.8),
                RelationshipRecord::new("linux", "ios", RelationKind::Inspiration, 0.2),
            ],
        )
        .unwrap();
        let layout = TemporalLayout::default().compute(
            model.entities().filter(|e| e.id != "ios"),
            &mut NoJitter,
        );
        let mut renderer = RecordingRenderer::new();

        let scene = Scene::materialize(&model, &layout, &mut renderer);

        assert_eq!(scene.entity_handles().count(), 2);
        assert!(scene.entity_handle("ios").is_none());
        assert!(scene.relationship_handle(0).is_some());
        assert!(scene.relationship_handle(1).is_none());
        assert_eq!(renderer.len(), 3);
        assert_eq!(renderer.removals(), 1);
    }
}
