//! Colors and opacities for each highlight state

use ts_core::{RelationKind, Relationship};

use crate::HighlightLevel;

/// Accent color of emphasized relationships
pub const ACCENT: u32 = 0xffff00;
pub const SELECTED_EMISSIVE: u32 = 0xff4444;
pub const RELATED_EMISSIVE: u32 = 0x44ff44;
pub const EMISSIVE_INTENSITY: f32 = 0.3;
pub const GLOW_OPACITY: f32 = 0.2;
pub const HOVER_GLOW_OPACITY: f32 = 0.4;
/// Baseline relationship opacity per unit of strength
pub const RELATIONSHIP_OPACITY: f32 = 0.7;

/// Resolved look of an entity visual
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityStyle {
    pub emissive: u32,
    pub emissive_intensity: f32,
    pub glow_opacity: f32,
}

/// Resolved look of a relationship line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: u32,
    pub opacity: f32,
}

pub fn relation_color(kind: RelationKind) -> u32 {
    match kind {
        RelationKind::Influence => 0x00ff00,
        RelationKind::Evolution => 0xff8800,
        RelationKind::Inspiration => 0x0088ff,
    }
}

pub fn entity_style(level: HighlightLevel, hovered: bool) -> EntityStyle {
    let (emissive, emissive_intensity) = match level {
        HighlightLevel::Selected => (SELECTED_EMISSIVE, EMISSIVE_INTENSITY),
        HighlightLevel::Related => (RELATED_EMISSIVE, EMISSIVE_INTENSITY),
        HighlightLevel::Baseline | HighlightLevel::Emphasized => (0x000000, 0.0),
    };
    EntityStyle {
        emissive,
        emissive_intensity,
        glow_opacity: if hovered { HOVER_GLOW_OPACITY } else { GLOW_OPACITY },
    }
}

pub fn relationship_style(relationship: &Relationship, level: HighlightLevel) -> LineStyle {
    match level {
        HighlightLevel::Emphasized => LineStyle {
            color: ACCENT,
            opacity: 1.0,
        },
        _ => LineStyle {
            color: relation_color(relationship.kind),
            opacity: relationship.strength as f32 * RELATIONSHIP_OPACITY,
        },
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into a packed color
pub fn parse_hex_color(value: &str) -> Option<u32> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
