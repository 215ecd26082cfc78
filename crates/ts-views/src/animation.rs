//! Per-frame bobbing of entity visuals around their layout positions

use glam::Vec3;
use ts_core::{layout::Layout, state::AnimationSettings};
use ts_render::RenderAdapter;

use crate::filter::VisibilitySet;
use crate::scene::Scene;

#[derive(Debug, Clone, Default)]
pub struct FloatAnimation {
    settings: AnimationSettings,
}

impl FloatAnimation {
    pub fn new(settings: AnimationSettings) -> Self {
        Self { settings }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enable_floating
    }

    /// Displayed position at `time` seconds for an entity resting at `base`
    pub fn offset(&self, time: f32, base: Vec3) -> Vec3 {
        base + Vec3::Y * ((time + base.x).sin() * self.settings.float_amplitude)
    }

    /// Move every visible entity visual. Layout positions are only read.
    pub fn apply(
        &self,
        time: f32,
        layout: &Layout,
        scene: &Scene,
        visibility: &VisibilitySet,
        renderer: &mut dyn RenderAdapter,
    ) {
        if !self.is_enabled() {
            return;
        }
        for (id, handle) in scene.entity_handles() {
            if !visibility.is_entity_visible(id) {
                continue;
            }
            if let Some(base) = layout.position(id) {
                renderer.set_position(handle, self.offset(time, base));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_core::{Category, EntityRecord, GraphModel, NoJitter, TemporalLayout};
    use ts_render::RecordingRenderer;

    #[test]
    fn test_offset_only_moves_y() {
        let animation = FloatAnimation::default();
        let base = Vec3::new(2.0, 1.0, -3.0);
        let moved = animation.offset(1.0, base);
        assert_eq!(moved.x, base.x);
        assert_eq!(moved.z, base.z);
        assert!((moved.y - (1.0 + 3.0f32.sin() * 0.3)).abs() < 1e-6);
    }

    #[test]
    fn test_apply_reads_layout_without_drift() {
        let model = GraphModel::from_records(
            vec![
                EntityRecord::new("a", "A", 1970, Category::Server),
                EntityRecord::new("b", "B", 1990, Category::Mobile),
            ],
            vec![],
        )
        .unwrap();
        let layout = TemporalLayout::default().compute(model.entities(), &mut NoJitter);
        let mut renderer = RecordingRenderer::new();
        let scene = Scene::materialize(&model, &layout, &mut renderer);
        let visible = VisibilitySet::all(&model);
        let animation = FloatAnimation::default();

        for frame in 0..50 {
            animation.apply(frame as f32 * 0.1, &layout, &scene, &visible, &mut renderer);
        }
        animation.apply(0.0, &layout, &scene, &visible, &mut renderer);

        let base = layout.position("a").unwrap();
        assert_eq!(
            renderer.entity_visual("a").unwrap().position,
            animation.offset(0.0, base)
        );
    }

    #[test]
    fn test_disabled_animation_leaves_visuals() {
        let model =
            GraphModel::from_records(vec![EntityRecord::new("a", "A", 1970, Category::Server)], vec![])
                .unwrap();
        let layout = TemporalLayout::default().compute(model.entities(), &mut NoJitter);
        let mut renderer = RecordingRenderer::new();
        let scene = Scene::materialize(&model, &layout, &mut renderer);
        let animation = FloatAnimation::new(AnimationSettings {
            enable_floating: false,
            ..AnimationSettings::default()
        });

        animation.apply(1.0, &layout, &scene, &VisibilitySet::all(&model), &mut renderer);
        assert_eq!(
            renderer.entity_visual("a").unwrap().position,
            layout.position("a").unwrap()
        );
    }
}
