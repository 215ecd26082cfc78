//! View layer for the OS time shuttle
//!
//! Binds a [`ts_core::GraphModel`] to a [`ts_render::RenderAdapter`]:
//! materializing visuals, selection, filtering and per-frame animation.

pub mod animation;
pub mod filter;
pub mod scene;
pub mod selection;
mod timeline_view;

pub use animation::FloatAnimation;
pub use filter::{FilterCriteria, VisibilityFilter, VisibilityListener, VisibilitySet};
pub use scene::Scene;
pub use selection::{SelectionController, SelectionListener, SelectionState};
pub use timeline_view::{Mutation, PointerEvent, TimelineView};
