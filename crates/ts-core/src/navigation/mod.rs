//! Camera navigation: home pose and smooth focus transitions

use glam::Vec3;
use serde::{Deserialize, Serialize};

mod engine;

pub use engine::{CameraRig, CameraTransition};

/// Where the camera sits and what it looks at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target }
    }
}
