//! Headless renderer that records visual state in memory
//!
//! Picking uses a fixed orthographic projection of the x/y plane, which is
//! enough to drive the pointer protocol from tests and from the CLI.

use std::collections::BTreeMap;

use glam::Vec3;
use tracing::trace;
use ts_core::{navigation::CameraPose, Entity, EntityId, RelationKind, Relationship};

use crate::palette::{self, EntityStyle, LineStyle};
use crate::{HighlightLevel, RenderAdapter, VisualHandle};

/// What a recorded visual represents
#[derive(Debug, Clone, PartialEq)]
pub enum VisualKind {
    Entity {
        id: EntityId,
        color: Option<u32>,
    },
    Relationship {
        from: EntityId,
        to: EntityId,
        kind: RelationKind,
        strength: f64,
    },
}

/// Current state of one visual
#[derive(Debug, Clone, PartialEq)]
pub struct VisualRecord {
    pub kind: VisualKind,
    pub position: Vec3,
    /// End point of relationship visuals
    pub end: Option<Vec3>,
    pub visible: bool,
    pub highlight: HighlightLevel,
    pub hovered: bool,
}

impl VisualRecord {
    pub fn entity_id(&self) -> Option<&str> {
        match &self.kind {
            VisualKind::Entity { id, .. } => Some(id),
            VisualKind::Relationship { .. } => None,
        }
    }

    /// Endpoints of a relationship visual
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        match &self.kind {
            VisualKind::Relationship { from, to, .. } => Some((from, to)),
            VisualKind::Entity { .. } => None,
        }
    }
}

/// Orthographic projection of the x/y plane onto the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub width: f32,
    pub height: f32,
    /// Pixels per world unit
    pub scale: f32,
    /// Maximum pick distance in pixels
    pub pick_radius: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            scale: 10.0,
            pick_radius: 12.0,
        }
    }
}

impl Projection {
    pub fn project(&self, position: Vec3) -> (f32, f32) {
        (
            self.width / 2.0 + position.x * self.scale,
            self.height / 2.0 - position.y * self.scale,
        )
    }
}

/// In-memory [`RenderAdapter`]
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    visuals: BTreeMap<VisualHandle, VisualRecord>,
    next_handle: u64,
    projection: Projection,
    camera: Option<CameraPose>,
    removals: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    fn allocate(&mut self, record: VisualRecord) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.visuals.insert(handle, record);
        handle
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&VisualRecord> {
        self.visuals.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// How many times `remove_all` ran
    pub fn removals(&self) -> usize {
        self.removals
    }

    pub fn camera(&self) -> Option<CameraPose> {
        self.camera
    }

    pub fn entity_visual(&self, id: &str) -> Option<&VisualRecord> {
        self.visuals.values().find(|v| v.entity_id() == Some(id))
    }

    pub fn relationship_visuals(&self) -> impl Iterator<Item = &VisualRecord> {
        self.visuals
            .values()
            .filter(|v| matches!(v.kind, VisualKind::Relationship { .. }))
    }

    /// `(from, to)` of every relationship currently emphasized
    pub fn emphasized_relationships(&self) -> Vec<(String, String)> {
        self.relationship_visuals()
            .filter(|v| v.highlight == HighlightLevel::Emphasized)
            .filter_map(|v| v.endpoints())
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }

    /// Ids of entities at a given highlight level
    pub fn entities_at(&self, level: HighlightLevel) -> Vec<String> {
        self.visuals
            .values()
            .filter(|v| v.highlight == level)
            .filter_map(|v| v.entity_id().map(str::to_string))
            .collect()
    }

    pub fn entity_style(&self, id: &str) -> Option<EntityStyle> {
        self.entity_visual(id)
            .map(|v| palette::entity_style(v.highlight, v.hovered))
    }

    pub fn line_style(&self, handle: VisualHandle) -> Option<LineStyle> {
        let visual = self.visuals.get(&handle)?;
        match &visual.kind {
            VisualKind::Relationship {
                from,
                to,
                kind,
                strength,
            } => {
                let relationship = Relationship {
                    from: from.clone(),
                    to: to.clone(),
                    kind: *kind,
                    strength: *strength,
                };
                Some(palette::relationship_style(&relationship, visual.highlight))
            }
            VisualKind::Entity { .. } => None,
        }
    }

    /// Screen point of an entity visual, for driving `pick_at`
    pub fn screen_position(&self, id: &str) -> Option<(f32, f32)> {
        self.entity_visual(id)
            .map(|v| self.projection.project(v.position))
    }

    fn update(&mut self, handle: VisualHandle, f: impl FnOnce(&mut VisualRecord)) {
        match self.visuals.get_mut(&handle) {
            Some(visual) => f(visual),
            None => trace!("Ignoring update for stale handle {:?}", handle),
        }
    }
}

impl RenderAdapter for RecordingRenderer {
    fn create_entity_visual(&mut self, entity: &Entity, position: Vec3) -> VisualHandle {
        self.allocate(VisualRecord {
            kind: VisualKind::Entity {
                id: entity.id.clone(),
                color: palette::parse_hex_color(&entity.color),
            },
            position,
            end: None,
            visible: true,
            highlight: HighlightLevel::Baseline,
            hovered: false,
        })
    }

    fn create_relationship_visual(
        &mut self,
        relationship: &Relationship,
        from: Vec3,
        to: Vec3,
    ) -> VisualHandle {
        self.allocate(VisualRecord {
            kind: VisualKind::Relationship {
                from: relationship.from.clone(),
                to: relationship.to.clone(),
                kind: relationship.kind,
                strength: relationship.strength,
            },
            position: from,
            end: Some(to),
            visible: true,
            highlight: HighlightLevel::Baseline,
            hovered: false,
        })
    }

    fn remove_all(&mut self) {
        self.visuals.clear();
        self.removals += 1;
    }

    fn set_position(&mut self, handle: VisualHandle, position: Vec3) {
        self.update(handle, |v| v.position = position);
    }

    fn set_visible(&mut self, handle: VisualHandle, visible: bool) {
        self.update(handle, |v| v.visible = visible);
    }

    fn set_highlight(&mut self, handle: VisualHandle, level: HighlightLevel) {
        self.update(handle, |v| v.highlight = level);
    }

    fn set_hover(&mut self, handle: VisualHandle, hovered: bool) {
        self.update(handle, |v| v.hovered = hovered);
    }

    fn pick_at(&self, screen_x: f32, screen_y: f32) -> Option<EntityId> {
        let radius_sq = self.projection.pick_radius * self.projection.pick_radius;
        self.visuals
            .values()
            .filter(|v| v.visible)
            .filter_map(|v| {
                let id = v.entity_id()?;
                let (sx, sy) = self.projection.project(v.position);
                let distance = (sx - screen_x).powi(2) + (sy - screen_y).powi(2);
                (distance <= radius_sq).then_some((id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id.to_string())
    }

    fn set_camera(&mut self, pose: CameraPose) {
        self.camera = Some(pose);
    }
}
