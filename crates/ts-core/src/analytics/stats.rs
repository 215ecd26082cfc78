//! Summary statistics for the info panel

use indexmap::IndexMap;
use serde::Serialize;

use super::Analytics;
use crate::model::{Category, Entity, EntityId, GraphModel};

/// The top entity by influence score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluenceRank {
    pub id: EntityId,
    pub name: String,
    pub score: f64,
}

/// Statistics over a (possibly filtered) view of the model
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStats {
    pub total_entities: usize,
    /// Relationships whose endpoints are both included
    pub total_relationships: usize,
    /// Counts in order of first appearance
    pub category_count: IndexMap<Category, usize>,
    /// Counts keyed like `"1970s"`, in order of first appearance
    pub decade_count: IndexMap<String, usize>,
    pub most_influential: Option<InfluenceRank>,
    /// Mean year rounded half up; 0 when empty
    pub avg_year: i32,
    pub time_span: i32,
}

impl GraphStats {
    /// Statistics over the whole model
    pub fn compute(model: &GraphModel) -> Self {
        Self::compute_filtered(model, |_| true)
    }

    /// Statistics over the entities accepted by `include`.
    ///
    /// Influence scores are always taken over the full model; only the
    /// ranking is restricted to the included entities.
    pub fn compute_filtered<F>(model: &GraphModel, include: F) -> Self
    where
        F: Fn(&Entity) -> bool,
    {
        let included: Vec<&Entity> = model.entities().filter(|e| include(e)).collect();
        if included.is_empty() {
            return Self::default();
        }

        let mut category_count: IndexMap<Category, usize> = IndexMap::new();
        let mut decade_count: IndexMap<String, usize> = IndexMap::new();
        for entity in &included {
            *category_count.entry(entity.category).or_insert(0) += 1;
            *decade_count
                .entry(format!("{}s", entity.decade()))
                .or_insert(0) += 1;
        }

        let total_relationships = model
            .relationships()
            .iter()
            .filter(|rel| {
                let endpoint = |id: &str| model.get_entity(id).is_some_and(|e| include(e));
                endpoint(&rel.from) && endpoint(&rel.to)
            })
            .count();

        let sum: i64 = included.iter().map(|e| e.year as i64).sum();
        let avg_year = (sum as f64 / included.len() as f64 + 0.5).floor() as i32;
        let min = included.iter().map(|e| e.year).min().unwrap_or_default();
        let max = included.iter().map(|e| e.year).max().unwrap_or_default();

        Self {
            total_entities: included.len(),
            total_relationships,
            category_count,
            decade_count,
            most_influential: Analytics::new(model).most_influential(&include),
            avg_year,
            time_span: max - min,
        }
    }
}
