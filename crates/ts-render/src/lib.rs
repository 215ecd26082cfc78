//! Rendering abstraction layer
//!
//! The engine never talks to a scene graph directly. Everything it needs from
//! a backend goes through [`RenderAdapter`]; [`RecordingRenderer`] is a
//! headless implementation that keeps the resulting visual state in memory.

pub mod headless;
pub mod palette;

pub use headless::{Projection, RecordingRenderer, VisualKind, VisualRecord};
pub use palette::{EntityStyle, LineStyle};

use glam::Vec3;
use ts_core::{navigation::CameraPose, Entity, EntityId, Relationship};

/// Opaque reference to a visual primitive owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

/// Selection emphasis applied to a visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightLevel {
    /// Resting style
    #[default]
    Baseline,
    /// Entity adjacent to the selection
    Related,
    /// The selected entity itself
    Selected,
    /// Relationship touching the selection
    Emphasized,
}

/// Capability surface of a rendering backend
pub trait RenderAdapter: Send {
    /// Materialize an entity at `position`
    fn create_entity_visual(&mut self, entity: &Entity, position: Vec3) -> VisualHandle;

    /// Materialize a directed relationship between two positions
    fn create_relationship_visual(
        &mut self,
        relationship: &Relationship,
        from: Vec3,
        to: Vec3,
    ) -> VisualHandle;

    /// Drop every visual; previously issued handles become invalid
    fn remove_all(&mut self);

    fn set_position(&mut self, handle: VisualHandle, position: Vec3);

    fn set_visible(&mut self, handle: VisualHandle, visible: bool);

    fn set_highlight(&mut self, handle: VisualHandle, level: HighlightLevel);

    /// Lighter, transient emphasis under the pointer
    fn set_hover(&mut self, handle: VisualHandle, hovered: bool);

    /// The visible entity under a screen point, if any
    fn pick_at(&self, screen_x: f32, screen_y: f32) -> Option<EntityId>;

    /// Move the camera
    fn set_camera(&mut self, _pose: CameraPose) {}
}
