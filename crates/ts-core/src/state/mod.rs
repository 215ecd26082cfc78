//! Engine settings
//!
//! Every section is defaulted so a settings file only needs the values it
//! overrides.

use serde::{Deserialize, Serialize};

/// Top-level settings for the time shuttle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShuttleSettings {
    pub layout: LayoutSettings,
    pub validation: ValidationSettings,
    pub camera: CameraSettings,
    pub animation: AnimationSettings,
    pub filter: FilterSettings,
}

/// Temporal layout constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Spiral angle increment per rank, in radians
    pub angle_step: f32,
    pub base_radius: f32,
    pub radius_step: f32,
    /// Number of distinct spiral radii
    pub radius_cycle: usize,
    /// Timeline units per year of range
    pub timeline_scale: f32,
    pub min_timeline_length: f32,
    /// Fraction of the timeline length used by the x spread
    pub spread: f32,
    /// Half-width of the per-axis jitter
    pub jitter_amplitude: f32,
    /// Seed of the jitter generator; `None` draws from entropy
    pub jitter_seed: Option<u64>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            angle_step: 0.8,
            base_radius: 3.0,
            radius_step: 2.0,
            radius_cycle: 3,
            timeline_scale: 1.5,
            min_timeline_length: 50.0,
            spread: 0.8,
            jitter_amplitude: 1.0,
            jitter_seed: Some(1969),
        }
    }
}

/// Accepted year range for entities, inclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            min_year: 1940,
            max_year: 2030,
        }
    }
}

/// Camera home pose and focus transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub home_eye: [f32; 3],
    pub home_target: [f32; 3],
    /// Eye offset from a focused entity
    pub focus_offset: [f32; 3],
    /// Progress added per frame during a focus transition
    pub transition_step: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            home_eye: [0.0, 10.0, 50.0],
            home_target: [0.0, 0.0, 0.0],
            focus_offset: [0.0, 0.0, 20.0],
            transition_step: 0.02,
        }
    }
}

/// Per-frame animation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub enable_floating: bool,
    pub float_amplitude: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enable_floating: true,
            float_amplitude: 0.3,
        }
    }
}

/// How a filter change treats the layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Hide filtered entities, keep every position
    #[default]
    Hide,
    /// Hide filtered entities and re-rank the visible ones
    Reflow,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub mode: FilterMode,
}
