//! Settings files

use std::fs;
use std::path::Path;

use tracing::{debug, info};
use ts_core::ShuttleSettings;

use crate::DataError;

/// Read settings from a JSON file. Missing sections and fields take their
/// defaults; no path means all defaults.
pub fn load_settings(path: Option<&Path>) -> Result<ShuttleSettings, DataError> {
    let Some(path) = path else {
        debug!("No settings file, using defaults");
        return Ok(ShuttleSettings::default());
    };
    let text = fs::read_to_string(path)?;
    let settings: ShuttleSettings = serde_json::from_str(&text)?;
    info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Write settings as pretty JSON
pub fn save_settings(settings: &ShuttleSettings, path: &Path) -> Result<(), DataError> {
    let text = serde_json::to_string_pretty(settings)?;
    fs::write(path, text)?;
    Ok(())
}
