//! Input validation for entity and relationship records

use std::fmt;

use ahash::AHashSet;
use thiserror::Error;

use super::{
    Category, Entity, EntityDetails, EntityRecord, RelationKind, Relationship, RelationshipRecord,
};
use crate::state::ValidationSettings;

/// Which end of a relationship an issue refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    From,
    To,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::From => f.write_str("from"),
            Endpoint::To => f.write_str("to"),
        }
    }
}

/// A single problem found in the input data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("entity at index {index} missing id")]
    MissingId { index: usize },

    #[error("entity {id} missing {field}")]
    MissingField { id: String, field: &'static str },

    #[error("entity {id} has invalid year: {year:?} (expected {min}..={max})")]
    YearOutOfRange {
        id: String,
        year: Option<i32>,
        min: i32,
        max: i32,
    },

    #[error("entity {id} has unknown category: {value}")]
    UnknownCategory { id: String, value: String },

    #[error("duplicate entity id: {id}")]
    DuplicateId { id: String },

    #[error("relationship at index {index} missing {field}")]
    MissingRelationshipField { index: usize, field: &'static str },

    #[error("relationship at index {index} has invalid '{endpoint}' id: {id}")]
    UnknownEndpoint {
        index: usize,
        endpoint: Endpoint,
        id: String,
    },

    #[error("relationship at index {index} has unknown type: {value}")]
    UnknownRelationKind { index: usize, value: String },

    #[error("relationship at index {index} has invalid strength: {strength}")]
    StrengthOutOfRange { index: usize, strength: f64 },
}

/// Malformed input data; the load that produced it installs nothing
#[derive(Error, Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issues.first() {
            Some(first) => write!(
                f,
                "{} validation issue(s), first: {}",
                self.issues.len(),
                first
            ),
            None => f.write_str("validation failed"),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Validate raw records, collecting every issue before failing.
pub(crate) fn validate(
    entities: Vec<EntityRecord>,
    relationships: Vec<RelationshipRecord>,
    bounds: &ValidationSettings,
) -> Result<(Vec<Entity>, Vec<Relationship>), ValidationError> {
    let mut issues = Vec::new();
    let mut known_ids: AHashSet<String> = AHashSet::with_capacity(entities.len());
    let mut valid_entities = Vec::with_capacity(entities.len());

    for (index, record) in entities.into_iter().enumerate() {
        let Some(id) = present(&record.id).map(str::to_string) else {
            issues.push(ValidationIssue::MissingId { index });
            continue;
        };
        if !known_ids.insert(id.clone()) {
            issues.push(ValidationIssue::DuplicateId { id });
            continue;
        }

        let before = issues.len();
        let name = present(&record.name).map(str::to_string);
        if name.is_none() {
            issues.push(ValidationIssue::MissingField {
                id: id.clone(),
                field: "name",
            });
        }

        let year = record
            .year
            .filter(|y| (bounds.min_year..=bounds.max_year).contains(y));
        if year.is_none() {
            issues.push(ValidationIssue::YearOutOfRange {
                id: id.clone(),
                year: record.year,
                min: bounds.min_year,
                max: bounds.max_year,
            });
        }

        let category = match present(&record.category) {
            None => {
                issues.push(ValidationIssue::MissingField {
                    id: id.clone(),
                    field: "category",
                });
                None
            }
            Some(tag) => {
                let parsed = Category::parse(tag);
                if parsed.is_none() {
                    issues.push(ValidationIssue::UnknownCategory {
                        id: id.clone(),
                        value: tag.to_string(),
                    });
                }
                parsed
            }
        };

        let color = present(&record.color).map(str::to_string);
        if color.is_none() {
            issues.push(ValidationIssue::MissingField {
                id: id.clone(),
                field: "color",
            });
        }

        if issues.len() > before {
            continue;
        }
        if let (Some(name), Some(year), Some(category), Some(color)) = (name, year, category, color)
        {
            valid_entities.push(Entity {
                id,
                name,
                year,
                category,
                color,
                details: EntityDetails {
                    description: record.description.unwrap_or_default(),
                    company: record.company.unwrap_or_default(),
                    key_persons: record.key_persons,
                    tech_features: record.tech_features,
                    significance: record.significance.unwrap_or_default(),
                },
            });
        }
    }

    let mut valid_relationships = Vec::with_capacity(relationships.len());
    for (index, record) in relationships.into_iter().enumerate() {
        let before = issues.len();

        let endpoint = |value: &Option<String>, endpoint: Endpoint, issues: &mut Vec<ValidationIssue>| {
            match present(value) {
                None => {
                    issues.push(ValidationIssue::MissingRelationshipField {
                        index,
                        field: match endpoint {
                            Endpoint::From => "from",
                            Endpoint::To => "to",
                        },
                    });
                    None
                }
                Some(id) if !known_ids.contains(id) => {
                    issues.push(ValidationIssue::UnknownEndpoint {
                        index,
                        endpoint,
                        id: id.to_string(),
                    });
                    None
                }
                Some(id) => Some(id.to_string()),
            }
        };
        let from = endpoint(&record.from, Endpoint::From, &mut issues);
        let to = endpoint(&record.to, Endpoint::To, &mut issues);

        let kind = match present(&record.kind) {
            None => {
                issues.push(ValidationIssue::MissingRelationshipField {
                    index,
                    field: "type",
                });
                None
            }
            Some(tag) => {
                let parsed = RelationKind::parse(tag);
                if parsed.is_none() {
                    issues.push(ValidationIssue::UnknownRelationKind {
                        index,
                        value: tag.to_string(),
                    });
                }
                parsed
            }
        };

        let strength = match record.strength {
            None => {
                issues.push(ValidationIssue::MissingRelationshipField {
                    index,
                    field: "strength",
                });
                None
            }
            // NaN fails the range check as well
            Some(s) if !(0.0..=1.0).contains(&s) => {
                issues.push(ValidationIssue::StrengthOutOfRange { index, strength: s });
                None
            }
            Some(s) => Some(s),
        };

        if issues.len() > before {
            continue;
        }
        if let (Some(from), Some(to), Some(kind), Some(strength)) = (from, to, kind, strength) {
            valid_relationships.push(Relationship {
                from,
                to,
                kind,
                strength,
            });
        }
    }

    if issues.is_empty() {
        Ok((valid_entities, valid_relationships))
    } else {
        Err(ValidationError { issues })
    }
}
