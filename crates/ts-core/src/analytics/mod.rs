//! Traversal and scoring over an immutable graph model
//!
//! Every function here is total: ids that are not in the model produce empty
//! results rather than errors. Each traversal owns its visited set, so calls
//! never share state.

mod stats;

pub use stats::{GraphStats, InfluenceRank};

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;

use crate::model::{Entity, EntityId, GraphModel, Relationship, RelationshipIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Outgoing,
    Incoming,
}

impl Direction {
    fn neighbor(self, rel: &Relationship) -> &str {
        match self {
            Direction::Outgoing => &rel.to,
            Direction::Incoming => &rel.from,
        }
    }
}

/// Read-only analytics view over a graph model
#[derive(Debug, Clone, Copy)]
pub struct Analytics<'a> {
    model: &'a GraphModel,
}

impl<'a> Analytics<'a> {
    pub fn new(model: &'a GraphModel) -> Self {
        Self { model }
    }

    fn edges(&self, id: &str, direction: Direction) -> &'a [RelationshipIndex] {
        let model = self.model;
        match direction {
            Direction::Outgoing => model.outgoing_indices(id),
            Direction::Incoming => model.incoming_indices(id),
        }
    }

    /// Depth-first reachability. Each reachable id appears once, in
    /// first-visit order; the start id is never reported.
    fn reachable(&self, start: &str, direction: Direction) -> Vec<EntityId> {
        let model = self.model;
        let Some(root) = model.get_entity(start) else {
            return Vec::new();
        };

        let mut visited: AHashSet<&'a str> = AHashSet::new();
        visited.insert(root.id.as_str());
        let mut order = Vec::new();
        // (node, cursor into its edge list)
        let mut stack: Vec<(&'a str, usize)> = vec![(root.id.as_str(), 0)];

        while let Some(top) = stack.last_mut() {
            let edges = self.edges(top.0, direction);
            if top.1 >= edges.len() {
                stack.pop();
                continue;
            }
            let rel = &model.relationships()[edges[top.1]];
            top.1 += 1;

            let next = direction.neighbor(rel);
            if visited.insert(next) {
                order.push(next.to_string());
                stack.push((next, 0));
            }
        }
        order
    }

    /// Every entity reachable over outgoing edges
    pub fn descendants(&self, id: &str) -> Vec<EntityId> {
        self.reachable(id, Direction::Outgoing)
    }

    /// Every entity reachable over incoming edges
    pub fn ancestors(&self, id: &str) -> Vec<EntityId> {
        self.reachable(id, Direction::Incoming)
    }

    /// Breadth-first minimum-edge path from `from` to `to`, inclusive of both
    /// ends. Empty when unreachable.
    ///
    /// Among equal-length paths the one discovered first wins, which follows
    /// relationship registration order. Treat that tie-break as incidental.
    pub fn shortest_influence_path(&self, from: &str, to: &str) -> Vec<EntityId> {
        let model = self.model;
        let (Some(source), Some(target)) = (model.get_entity(from), model.get_entity(to)) else {
            return Vec::new();
        };
        let (source, target) = (source.id.as_str(), target.id.as_str());
        if source == target {
            return vec![source.to_string()];
        }

        let mut parent: AHashMap<&'a str, &'a str> = AHashMap::new();
        let mut visited: AHashSet<&'a str> = AHashSet::new();
        visited.insert(source);
        let mut queue = VecDeque::from([source]);

        while let Some(current) = queue.pop_front() {
            for &index in self.edges(current, Direction::Outgoing) {
                let next = model.relationships()[index].to.as_str();
                if !visited.insert(next) {
                    continue;
                }
                parent.insert(next, current);
                if next == target {
                    let mut path = vec![target.to_string()];
                    let mut cursor = target;
                    while let Some(&prev) = parent.get(cursor) {
                        path.push(prev.to_string());
                        cursor = prev;
                    }
                    path.reverse();
                    return path;
                }
                queue.push_back(next);
            }
        }
        Vec::new()
    }

    /// `2 * out_degree + |descendants| + 5 * sum(outgoing strength)`
    pub fn influence_score(&self, id: &str) -> f64 {
        if !self.model.contains(id) {
            return 0.0;
        }
        let out_degree = self.model.out_degree(id) as f64;
        let strength: f64 = self.model.relationships_from(id).map(|r| r.strength).sum();
        2.0 * out_degree + self.descendants(id).len() as f64 + 5.0 * strength
    }

    /// Highest scoring entity among those accepted by `include`. The first of
    /// equal scores wins; an all-zero field has no winner.
    pub fn most_influential<F>(&self, include: F) -> Option<InfluenceRank>
    where
        F: Fn(&Entity) -> bool,
    {
        let mut best: Option<InfluenceRank> = None;
        let mut best_score = 0.0;
        for entity in self.model.entities().filter(|e| include(e)) {
            let score = self.influence_score(&entity.id);
            if score > best_score {
                best_score = score;
                best = Some(InfluenceRank {
                    id: entity.id.clone(),
                    name: entity.name.clone(),
                    score,
                });
            }
        }
        best
    }
}

/// Partition entities by `floor(year / 10) * 10`. Groups appear in order of
/// first appearance and keep input order inside.
pub fn group_by_decade<'e, I>(entities: I) -> IndexMap<i32, Vec<&'e Entity>>
where
    I: IntoIterator<Item = &'e Entity>,
{
    let mut groups: IndexMap<i32, Vec<&'e Entity>> = IndexMap::new();
    for entity in entities {
        groups.entry(entity.decade()).or_default().push(entity);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, EntityRecord, RelationKind, RelationshipRecord};

    fn model(ids: &[(&str, i32)], edges: &[(&str, &str, f64)]) -> GraphModel {
        GraphModel::from_records(
            ids.iter()
                .map(|(id, year)| EntityRecord::new(id, id, *year, Category::Personal))
                .collect(),
            edges
                .iter()
                .map(|(from, to, s)| RelationshipRecord::new(from, to, RelationKind::Influence, *s))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_unix_linux_example() {
        let model = model(
            &[("U", 1969), ("M", 1975), ("L", 1991)],
            &[("U", "L", 0.8)],
        );
        let analytics = Analytics::new(&model);

        assert_eq!(analytics.descendants("U"), vec!["L"]);
        assert_eq!(analytics.ancestors("L"), vec!["U"]);
        assert_eq!(analytics.shortest_influence_path("U", "L"), vec!["U", "L"]);
        assert!(analytics.descendants("M").is_empty());
        assert!(analytics.shortest_influence_path("L", "U").is_empty());
    }

    #[test]
    fn test_descendants_first_visit_order_without_duplicates() {
        // a -> b -> d, a -> c -> d, d -> e
        let model = model(
            &[("a", 1960), ("b", 1970), ("c", 1971), ("d", 1980), ("e", 1990)],
            &[
                ("a", "b", 0.5),
                ("a", "c", 0.5),
                ("b", "d", 0.5),
                ("c", "d", 0.5),
                ("d", "e", 0.5),
            ],
        );
        let analytics = Analytics::new(&model);
        assert_eq!(analytics.descendants("a"), vec!["b", "d", "e", "c"]);
        assert_eq!(analytics.ancestors("e"), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_cycles_never_report_the_start() {
        let model = model(
            &[("a", 1960), ("b", 1970), ("c", 1980)],
            &[("a", "b", 0.5), ("b", "c", 0.5), ("c", "a", 0.5), ("a", "a", 0.1)],
        );
        let analytics = Analytics::new(&model);
        for id in ["a", "b", "c"] {
            let descendants = analytics.descendants(id);
            assert!(!descendants.iter().any(|d| d == id));
            assert_eq!(descendants.len(), 2);
            let ancestors = analytics.ancestors(id);
            assert!(!ancestors.iter().any(|d| d == id));
        }
    }

    #[test]
    fn test_unknown_ids_are_empty() {
        let model = model(&[("a", 1960)], &[]);
        let analytics = Analytics::new(&model);
        assert!(analytics.descendants("zz").is_empty());
        assert!(analytics.ancestors("zz").is_empty());
        assert!(analytics.shortest_influence_path("a", "zz").is_empty());
        assert!(analytics.shortest_influence_path("zz", "a").is_empty());
        assert_eq!(analytics.influence_score("zz"), 0.0);
    }

    #[test]
    fn test_path_to_self() {
        let model = model(&[("a", 1960)], &[]);
        let analytics = Analytics::new(&model);
        assert_eq!(analytics.shortest_influence_path("a", "a"), vec!["a"]);
    }

    #[test]
    fn test_path_tie_break_follows_registration_order() {
        // Two equal paths a-b-d and a-c-d; b is registered first
        let model = model(
            &[("a", 1960), ("b", 1970), ("c", 1971), ("d", 1980)],
            &[("a", "b", 0.5), ("a", "c", 0.5), ("c", "d", 0.5), ("b", "d", 0.5)],
        );
        let analytics = Analytics::new(&model);
        assert_eq!(analytics.shortest_influence_path("a", "d"), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_path_prefers_fewer_edges() {
        let model = model(
            &[("a", 1960), ("b", 1970), ("c", 1975), ("d", 1980)],
            &[("a", "b", 0.5), ("b", "c", 0.5), ("c", "d", 0.5), ("a", "d", 0.1)],
        );
        let analytics = Analytics::new(&model);
        assert_eq!(analytics.shortest_influence_path("a", "d"), vec!["a", "d"]);
    }

    /// Exhaustive check against every simple path on small deterministic graphs
    #[test]
    fn test_path_is_never_longer_than_enumerated_paths() {
        use petgraph::algo::all_simple_paths;
        use petgraph::graph::{DiGraph, NodeIndex};
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..40 {
            let n = rng.gen_range(2..=10);
            let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
            let mut edges = Vec::new();
            for _ in 0..rng.gen_range(0..=n * 2) {
                let from = rng.gen_range(0..n);
                let to = rng.gen_range(0..n);
                edges.push((from, to));
            }

            let model = GraphModel::from_records(
                ids.iter()
                    .map(|id| EntityRecord::new(id, id, 1970, Category::Server))
                    .collect(),
                edges
                    .iter()
                    .map(|&(f, t)| {
                        RelationshipRecord::new(&ids[f], &ids[t], RelationKind::Evolution, 0.5)
                    })
                    .collect(),
            )
            .unwrap();
            let mut graph: DiGraph<(), ()> = DiGraph::new();
            let nodes: Vec<NodeIndex> = (0..n).map(|_| graph.add_node(())).collect();
            for &(f, t) in &edges {
                graph.add_edge(nodes[f], nodes[t], ());
            }

            let analytics = Analytics::new(&model);
            for a in 0..n {
                for b in 0..n {
                    if a == b {
                        continue;
                    }
                    let found = analytics.shortest_influence_path(&ids[a], &ids[b]);
                    let shortest = all_simple_paths::<Vec<_>, _>(&graph, nodes[a], nodes[b], 0, None)
                        .map(|p| p.len())
                        .min();
                    match shortest {
                        None => assert!(found.is_empty()),
                        Some(len) => {
                            assert_eq!(found.len(), len);
                            assert_eq!(found.first(), Some(&ids[a]));
                            assert_eq!(found.last(), Some(&ids[b]));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_influence_score_formula() {
        let model = model(
            &[("a", 1960), ("b", 1970), ("c", 1980)],
            &[("a", "b", 0.5), ("a", "b", 0.3), ("b", "c", 1.0)],
        );
        let analytics = Analytics::new(&model);
        // 2 * 2 + |{b, c}| + 5 * 0.8
        assert!((analytics.influence_score("a") - 10.0).abs() < 1e-9);
        assert!((analytics.influence_score("c") - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_influence_score_monotonic_in_strength() {
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=10 {
            let strength = step as f64 / 10.0;
            let model = model(
                &[("a", 1960), ("b", 1970), ("c", 1980)],
                &[("a", "b", strength), ("a", "c", 0.5)],
            );
            let score = Analytics::new(&model).influence_score("a");
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_most_influential_first_wins_ties() {
        let model = model(
            &[("a", 1960), ("b", 1970), ("c", 1980), ("d", 1990)],
            &[("a", "c", 0.5), ("b", "d", 0.5)],
        );
        let analytics = Analytics::new(&model);
        let top = analytics.most_influential(|_| true).unwrap();
        assert_eq!(top.id, "a");

        let top = analytics.most_influential(|e| e.id != "a").unwrap();
        assert_eq!(top.id, "b");

        assert!(analytics.most_influential(|e| e.id == "c").is_none());
    }

    #[test]
    fn test_group_by_decade() {
        let model = model(&[("U", 1969), ("M", 1975), ("L", 1991), ("B", 1977)], &[]);
        let groups = group_by_decade(model.entities());

        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec![1960, 1970, 1990]);
        let seventies: Vec<_> = groups[&1970].iter().map(|e| e.id.as_str()).collect();
        assert_eq!(seventies, vec!["M", "B"]);
        assert_eq!(groups[&1960].len(), 1);
        assert_eq!(groups[&1990].len(), 1);
    }
}
