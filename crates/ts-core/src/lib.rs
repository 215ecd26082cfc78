//! Core functionality for the OS time shuttle
//!
//! This crate provides the graph model, the analytics over it, the temporal
//! layout algorithm and the shared state types used by the view layer. It has
//! no knowledge of any rendering backend.

pub mod analytics;
pub mod events;
pub mod layout;
pub mod model;
pub mod navigation;
pub mod state;

// Re-export commonly used types
pub use analytics::{Analytics, GraphStats};
pub use events::EventBus;
pub use layout::{Jitter, Layout, NoJitter, SeededJitter, TemporalLayout};
pub use model::{
    Category, Entity, EntityId, EntityRecord, GraphModel, RelationKind, Relationship,
    RelationshipIndex, RelationshipRecord, ValidationError, ValidationIssue,
};
pub use navigation::{CameraPose, CameraRig};
pub use state::ShuttleSettings;
