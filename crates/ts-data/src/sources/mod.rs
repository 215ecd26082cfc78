//! Dataset sources

pub mod csv_source;
pub mod json_source;

pub use csv_source::CsvSource;
pub use json_source::JsonSource;

use std::path::Path;

use crate::{DataError, Dataset};

/// Something that can produce a dataset
pub trait DatasetSource {
    /// Human readable name for logs
    fn name(&self) -> String;

    fn load(&self) -> Result<Dataset, DataError>;
}

/// Pick a source from the file extension.
///
/// A `.csv` path is read as entities; relationships are looked up next to
/// it as `<stem>_relationships.csv`.
pub fn open_dataset(path: &Path) -> Result<Box<dyn DatasetSource>, DataError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(Box::new(JsonSource::new(path))),
        Some("csv") => {
            let stem = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default();
            let relationships = path.with_file_name(format!("{stem}_relationships.csv"));
            let source = CsvSource::new(path);
            Ok(Box::new(if relationships.exists() {
                source.with_relationships(relationships)
            } else {
                source
            }))
        }
        _ => Err(DataError::UnsupportedFormat(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = open_dataset(Path::new("systems.xml")).err().unwrap();
        assert!(matches!(err, DataError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_extension_picks_source() {
        let json = open_dataset(Path::new("data/systems.JSON")).unwrap();
        assert!(json.name().contains("systems.JSON"));

        let csv = open_dataset(Path::new("data/systems.csv")).unwrap();
        assert!(csv.name().starts_with("csv:"));
    }
}
