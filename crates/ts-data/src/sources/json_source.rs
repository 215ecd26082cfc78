use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::info;

use super::DatasetSource;
use crate::{DataError, Dataset};

/// A `{ "entities": [...], "relationships": [...] }` document
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for JsonSource {
    fn name(&self) -> String {
        format!("json:{}", self.path.display())
    }

    fn load(&self) -> Result<Dataset, DataError> {
        let reader = BufReader::new(File::open(&self.path)?);
        let dataset: Dataset = serde_json::from_reader(reader)?;
        info!(
            "Read {} entities and {} relationships from {}",
            dataset.entities.len(),
            dataset.relationships.len(),
            self.path.display()
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use ts_core::state::ValidationSettings;

    #[test]
    fn test_load_json_dataset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{
                "entities": [
                    {{"id": "unix", "name": "Unix", "year": 1969, "category": "server",
                      "color": "#2E8B57", "company": "Bell Labs",
                      "keyPersons": ["Ken Thompson", "Dennis Ritchie"]}},
                    {{"id": "linux", "name": "Linux", "year": 1991, "category": "server",
                      "color": "#2E8B57"}}
                ],
                "relationships": [
                    {{"from": "unix", "to": "linux", "type": "influence", "strength": 0.8}}
                ]
            }}"##
        )
        .unwrap();

        let dataset = JsonSource::new(file.path()).load().unwrap();
        assert_eq!(dataset.entities.len(), 2);
        assert_eq!(dataset.entities[0].key_persons.len(), 2);

        let model = dataset.into_model(&ValidationSettings::default()).unwrap();
        let unix = model.get_entity("unix").unwrap();
        assert_eq!(unix.details.company, "Bell Labs");
        assert_eq!(model.relationship_count(), 1);
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"entities\": [").unwrap();
        let err = JsonSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, DataError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = JsonSource::new("/definitely/not/here.json").load().unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }

    #[test]
    fn test_invalid_records_surface_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"entities": [], "relationships": [{{"from": "a", "to": "b", "type": "influence", "strength": 0.5}}]}}"#
        )
        .unwrap();
        let err = JsonSource::new(file.path())
            .load()
            .unwrap()
            .into_model(&ValidationSettings::default())
            .unwrap_err();
        match err {
            DataError::Validation(validation) => assert_eq!(validation.issues.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
