//! Entities, relationships and the graph model that owns them

mod graph;
mod validation;

pub use graph::GraphModel;
pub use validation::{Endpoint, ValidationError, ValidationIssue};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity identifier type
pub type EntityId = String;

/// Position of a relationship in registration order
pub type RelationshipIndex = usize;

/// Closed set of entity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mainframe,
    Personal,
    Server,
    Mobile,
    Embedded,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 5] = [
        Category::Mainframe,
        Category::Personal,
        Category::Server,
        Category::Mobile,
        Category::Embedded,
    ];

    /// Parse the lowercase tag used in input data
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim() {
            "mainframe" => Some(Category::Mainframe),
            "personal" => Some(Category::Personal),
            "server" => Some(Category::Server),
            "mobile" => Some(Category::Mobile),
            "embedded" => Some(Category::Embedded),
            _ => None,
        }
    }

    /// The lowercase tag used in input data
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mainframe => "mainframe",
            Category::Personal => "personal",
            Category::Server => "server",
            Category::Mobile => "mobile",
            Category::Embedded => "embedded",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Mainframe => "Mainframe",
            Category::Personal => "Personal Computer",
            Category::Server => "Server",
            Category::Mobile => "Mobile Device",
            Category::Embedded => "Embedded",
        }
    }

    /// Fallback entity color for the category
    pub fn default_color(&self) -> &'static str {
        match self {
            Category::Mainframe => "#8B4513",
            Category::Personal => "#4169E1",
            Category::Server => "#2E8B57",
            Category::Mobile => "#FF6347",
            Category::Embedded => "#9370DB",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// Direct technical or design influence
    Influence,
    /// Direct evolution or upgrade
    Evolution,
    /// Conceptual or philosophical inspiration
    Inspiration,
}

impl RelationKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim() {
            "influence" => Some(RelationKind::Influence),
            "evolution" => Some(RelationKind::Evolution),
            "inspiration" => Some(RelationKind::Inspiration),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Influence => "influence",
            RelationKind::Evolution => "evolution",
            RelationKind::Inspiration => "inspiration",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive fields carried through to the info panel untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityDetails {
    pub description: String,
    pub company: String,
    pub key_persons: Vec<String>,
    pub tech_features: Vec<String>,
    pub significance: String,
}

/// A validated node of the temporal graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub year: i32,
    pub category: Category,
    pub color: String,
    #[serde(default)]
    pub details: EntityDetails,
}

impl Entity {
    /// Decade bucket, `floor(year / 10) * 10`
    pub fn decade(&self) -> i32 {
        self.year.div_euclid(10) * 10
    }
}

/// A validated directed edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: EntityId,
    pub to: EntityId,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    pub strength: f64,
}

impl Relationship {
    /// Whether `id` is either endpoint
    pub fn involves(&self, id: &str) -> bool {
        self.from == id || self.to == id
    }

    /// The endpoint opposite to `id`, if `id` is an endpoint at all
    pub fn other_endpoint(&self, id: &str) -> Option<&str> {
        if self.from == id {
            Some(&self.to)
        } else if self.to == id {
            Some(&self.from)
        } else {
            None
        }
    }
}

/// Unvalidated entity input, as read from a data source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub key_persons: Vec<String>,
    pub tech_features: Vec<String>,
    pub significance: Option<String>,
}

impl EntityRecord {
    /// Minimal record with the category's default color
    pub fn new(id: &str, name: &str, year: i32, category: Category) -> Self {
        Self {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            year: Some(year),
            category: Some(category.as_str().to_string()),
            color: Some(category.default_color().to_string()),
            ..Self::default()
        }
    }
}

/// Unvalidated relationship input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipRecord {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub strength: Option<f64>,
}

impl RelationshipRecord {
    pub fn new(from: &str, to: &str, kind: RelationKind, strength: f64) -> Self {
        Self {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            kind: Some(kind.as_str().to_string()),
            strength: Some(strength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_through_tags() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("quantum"), None);
    }

    #[test]
    fn test_decade_floors_toward_negative_infinity() {
        let entity = Entity {
            id: "unix".into(),
            name: "Unix".into(),
            year: 1969,
            category: Category::Server,
            color: "#fff".into(),
            details: EntityDetails::default(),
        };
        assert_eq!(entity.decade(), 1960);
    }

    #[test]
    fn test_other_endpoint() {
        let rel = Relationship {
            from: "unix".into(),
            to: "linux".into(),
            kind: RelationKind::Influence,
            strength: 0.8,
        };
        assert_eq!(rel.other_endpoint("unix"), Some("linux"));
        assert_eq!(rel.other_endpoint("linux"), Some("unix"));
        assert_eq!(rel.other_endpoint("macos"), None);
    }

    #[test]
    fn test_record_deserializes_camel_case() {
        let record: EntityRecord = serde_json::from_str(
            r##"{"id":"unix","name":"Unix","year":1969,"category":"server","color":"#2E8B57","keyPersons":["Ken Thompson"]}"##,
        )
        .unwrap();
        assert_eq!(record.key_persons, vec!["Ken Thompson".to_string()]);
        assert_eq!(record.year, Some(1969));
    }
}
