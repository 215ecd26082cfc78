//! Plain-text rendering of query results

use std::fmt;

use ts_core::{Analytics, Entity, GraphStats};

pub struct StatsReport<'a>(pub &'a GraphStats);

impl fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        writeln!(f, "Entities:      {}", stats.total_entities)?;
        writeln!(f, "Relationships: {}", stats.total_relationships)?;
        writeln!(f, "Average year:  {}", stats.avg_year)?;
        writeln!(f, "Time span:     {} years", stats.time_span)?;
        match &stats.most_influential {
            Some(rank) => writeln!(f, "Most influential: {} ({:.1})", rank.name, rank.score)?,
            None => writeln!(f, "Most influential: -")?,
        }

        writeln!(f, "By category:")?;
        for (category, count) in &stats.category_count {
            writeln!(f, "  {:<18} {}", category.display_name(), count)?;
        }
        writeln!(f, "By decade:")?;
        for (decade, count) in &stats.decade_count {
            writeln!(f, "  {:<18} {}", decade, count)?;
        }
        Ok(())
    }
}

pub struct EntityReport<'a> {
    pub entity: &'a Entity,
    pub analytics: &'a Analytics<'a>,
}

impl fmt::Display for EntityReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entity = self.entity;
        writeln!(
            f,
            "{} ({}, {})",
            entity.name,
            entity.year,
            entity.category.display_name()
        )?;
        if !entity.details.company.is_empty() {
            writeln!(f, "  Company:     {}", entity.details.company)?;
        }
        if !entity.details.key_persons.is_empty() {
            writeln!(f, "  Key persons: {}", entity.details.key_persons.join(", "))?;
        }
        writeln!(f, "  Influence:   {:.1}", self.analytics.influence_score(&entity.id))?;
        writeln!(f, "  Ancestors:   {}", list(&self.analytics.ancestors(&entity.id)))?;
        writeln!(f, "  Descendants: {}", list(&self.analytics.descendants(&entity.id)))
    }
}

pub fn path(from: &str, to: &str, path: &[String]) -> String {
    if path.is_empty() {
        format!("No influence path from {from} to {to}")
    } else {
        path.join(" -> ")
    }
}

fn list(ids: &[String]) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_core::{Category, EntityRecord, GraphModel, RelationKind, RelationshipRecord};

    fn model() -> GraphModel {
        GraphModel::from_records(
            vec![
                EntityRecord::new("U", "Unix", 1969, Category::Server),
                EntityRecord::new("M", "Mac OS", 1975, Category::Personal),
                EntityRecord::new("L", "Linux", 1991, Category::Server),
            ],
            vec![RelationshipRecord::new("U", "L", RelationKind::Influence, 0.8)],
        )
        .unwrap()
    }

    #[test]
    fn test_stats_report() {
        let text = StatsReport(&GraphStats::compute(&model())).to_string();
        assert!(text.contains("Entities:      3"));
        assert!(text.contains("Most influential: Unix (7.0)"));
        assert!(text.contains("1960s"));
    }

    #[test]
    fn test_entity_report() {
        let model = model();
        let analytics = Analytics::new(&model);
        let text = EntityReport {
            entity: model.get_entity("L").unwrap(),
            analytics: &analytics,
        }
        .to_string();
        assert!(text.contains("Linux (1991, Server)"));
        assert!(text.contains("Ancestors:   U"));
        assert!(text.contains("Descendants: -"));
    }

    #[test]
    fn test_path_report() {
        assert_eq!(path("U", "L", &["U".into(), "L".into()]), "U -> L");
        assert_eq!(path("L", "U", &[]), "No influence path from L to U");
    }
}
