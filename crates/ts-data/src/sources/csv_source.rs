use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, info};
use ts_core::{EntityRecord, RelationshipRecord};

use super::DatasetSource;
use crate::{DataError, Dataset};

/// Separator for list-valued cells such as `key_persons`
const LIST_SEPARATOR: char = ';';

/// One row of the entities file
#[derive(Debug, Deserialize)]
struct EntityRow {
    id: Option<String>,
    name: Option<String>,
    year: Option<i32>,
    category: Option<String>,
    color: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    key_persons: Option<String>,
    #[serde(default)]
    tech_features: Option<String>,
    #[serde(default)]
    significance: Option<String>,
}

impl From<EntityRow> for EntityRecord {
    fn from(row: EntityRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            category: row.category,
            color: row.color,
            description: row.description,
            company: row.company,
            key_persons: split_list(row.key_persons),
            tech_features: split_list(row.tech_features),
            significance: row.significance,
        }
    }
}

/// One row of the relationships file
#[derive(Debug, Deserialize)]
struct RelationshipRow {
    from: Option<String>,
    to: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    strength: Option<f64>,
}

impl From<RelationshipRow> for RelationshipRecord {
    fn from(row: RelationshipRow) -> Self {
        Self {
            from: row.from,
            to: row.to,
            kind: row.kind,
            strength: row.strength,
        }
    }
}

fn split_list(cell: Option<String>) -> Vec<String> {
    cell.map(|cell| {
        cell.split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Entities and (optionally) relationships from two CSV files with headers
pub struct CsvSource {
    entities_path: PathBuf,
    relationships_path: Option<PathBuf>,
}

impl CsvSource {
    pub fn new(entities_path: impl AsRef<Path>) -> Self {
        Self {
            entities_path: entities_path.as_ref().to_path_buf(),
            relationships_path: None,
        }
    }

    pub fn with_relationships(mut self, path: impl AsRef<Path>) -> Self {
        self.relationships_path = Some(path.as_ref().to_path_buf());
        self
    }

    fn read_rows<T, R>(path: &Path) -> Result<Vec<R>, DataError>
    where
        T: for<'de> Deserialize<'de>,
        R: From<T>,
    {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for result in reader.deserialize::<T>() {
            rows.push(R::from(result?));
        }
        debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }
}

impl DatasetSource for CsvSource {
    fn name(&self) -> String {
        format!("csv:{}", self.entities_path.display())
    }

    fn load(&self) -> Result<Dataset, DataError> {
        let entities = Self::read_rows::<EntityRow, EntityRecord>(&self.entities_path)?;
        let relationships = match &self.relationships_path {
            Some(path) => Self::read_rows::<RelationshipRow, RelationshipRecord>(path)?,
            None => Vec::new(),
        };
        info!(
            "Read {} entities and {} relationships from {}",
            entities.len(),
            relationships.len(),
            self.entities_path.display()
        );
        Ok(Dataset {
            entities,
            relationships,
        })
    }
}
