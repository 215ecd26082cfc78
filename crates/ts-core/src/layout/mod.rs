//! Temporal layout: places entities along a time axis on a helix
//!
//! `x` follows the year. `y` and `z` follow a spiral indexed by the entity's
//! rank in time order, so same-era entities fan out around the axis instead
//! of stacking on one point.

mod jitter;

pub use jitter::{Jitter, NoJitter, SeededJitter};

use glam::Vec3;
use indexmap::IndexMap;
use tracing::debug;

use crate::model::{Entity, EntityId};
use crate::state::LayoutSettings;

/// Positions for one layout pass, in rank order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: IndexMap<EntityId, Vec3>,
    /// Entries past this index were carried over from another pass
    ranked: usize,
    pub min_year: i32,
    pub max_year: i32,
    pub timeline_length: f32,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<Vec3> {
        self.positions.get(id).copied()
    }

    /// Rank of an entity in time order; carried-over entries have none
    pub fn rank(&self, id: &str) -> Option<usize> {
        self.positions
            .get_index_of(id)
            .filter(|&index| index < self.ranked)
    }

    /// Number of entities this pass actually placed
    pub fn ranked_len(&self) -> usize {
        self.ranked
    }

    /// Keep `previous` positions for entities this pass did not place.
    ///
    /// Lets a pass over a subset leave the rest of the scene where it was.
    pub fn carry_over(&mut self, previous: &Layout) {
        for (id, position) in previous.iter() {
            if !self.positions.contains_key(id) {
                self.positions.insert(id.to_string(), position);
            }
        }
    }

    /// `(id, position)` pairs in rank order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec3)> + '_ {
        self.positions.iter().map(|(id, pos)| (id.as_str(), *pos))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// x coordinate of a year on this layout's time axis
    pub fn year_to_x(&self, year: i32, spread: f32) -> f32 {
        let range = (self.max_year - self.min_year) as f32;
        let progress = if range > 0.0 {
            (year - self.min_year) as f32 / range
        } else {
            0.5
        };
        (progress - 0.5) * self.timeline_length * spread
    }
}

/// The layout algorithm
#[derive(Debug, Clone, Default)]
pub struct TemporalLayout {
    settings: LayoutSettings,
}

impl TemporalLayout {
    pub fn new(settings: LayoutSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Full layout pass over `entities`.
    ///
    /// Entities are stably sorted by year, so equal years keep input order.
    /// Jitter is drawn for y then z, entity by entity in rank order.
    pub fn compute<'e, I>(&self, entities: I, jitter: &mut dyn Jitter) -> Layout
    where
        I: IntoIterator<Item = &'e Entity>,
    {
        let mut sorted: Vec<&Entity> = entities.into_iter().collect();
        sorted.sort_by_key(|e| e.year);

        let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
            return Layout::default();
        };
        let (min_year, max_year) = (first.year, last.year);
        let s = &self.settings;
        let year_range = (max_year - min_year) as f32;
        let timeline_length = (year_range * s.timeline_scale).max(s.min_timeline_length);

        let mut layout = Layout {
            positions: IndexMap::with_capacity(sorted.len()),
            ranked: sorted.len(),
            min_year,
            max_year,
            timeline_length,
        };

        let cycle = s.radius_cycle.max(1);
        for (index, entity) in sorted.iter().enumerate() {
            let x = layout.year_to_x(entity.year, s.spread);
            let angle = index as f32 * s.angle_step;
            let radius = s.base_radius + (index % cycle) as f32 * s.radius_step;
            let y = angle.sin() * radius + jitter.next_offset();
            let z = angle.cos() * radius + jitter.next_offset();
            layout.positions.insert(entity.id.clone(), Vec3::new(x, y, z));
        }

        debug!(
            "Computed layout for {} entities ({}..={}, length {:.1})",
            layout.len(),
            min_year,
            max_year,
            timeline_length
        );
        layout
    }
}
