//! Dataset loading for the OS time shuttle

pub mod config;
pub mod sample;
pub mod sources;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_core::{
    state::ValidationSettings, EntityRecord, GraphModel, RelationshipRecord, ValidationError,
};

// Re-exports
pub use config::{load_settings, save_settings};
pub use sample::{sample_dataset, SampleSource};
pub use sources::{open_dataset, CsvSource, DatasetSource, JsonSource};

/// Errors that can occur while reading datasets and settings
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Invalid dataset: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}

/// Unvalidated records as read from a source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub entities: Vec<EntityRecord>,
    pub relationships: Vec<RelationshipRecord>,
}

impl Dataset {
    /// Validate into a model
    pub fn into_model(self, bounds: &ValidationSettings) -> Result<GraphModel, DataError> {
        Ok(GraphModel::from_records_with(
            self.entities,
            self.relationships,
            bounds,
        )?)
    }
}
