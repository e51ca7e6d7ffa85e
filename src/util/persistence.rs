use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::domain::EmbeddingMode;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "LandedCost";
const APP_NAME: &str = "LandedCost";

/// Overrides the settings file location.
pub const CONFIG_PATH_ENV: &str = "LANDED_COST_CONFIG";

/// User defaults applied when the command line does not say otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub default_mode: EmbeddingMode,
    /// Take the embedding mode from the declaration's trade term when possible.
    #[serde(default)]
    pub detect_incoterm: bool,
    /// Treat a divergent reconciliation as a failed run.
    #[serde(default)]
    pub strict: bool,
}

pub fn settings_file() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

/// Loads saved settings; a missing or unreadable file yields the defaults.
pub fn load_settings() -> Settings {
    let Some(path) = settings_file() else {
        return Settings::default();
    };
    let Ok(data) = fs::read_to_string(&path) else {
        debug!("no settings at {}; using defaults", path.display());
        return Settings::default();
    };
    serde_json::from_str(&data).unwrap_or_else(|err| {
        warn!("ignoring unreadable settings at {}: {err}", path.display());
        Settings::default()
    })
}

pub fn save_settings(settings: &Settings) -> Result<PathBuf, SettingsError> {
    let path = settings_file().ok_or(SettingsError::StorageUnavailable)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&path, json)?;
    Ok(path)
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "detect_incoterm": true }"#).unwrap();
        assert_eq!(settings.default_mode, EmbeddingMode::Separate);
        assert!(settings.detect_incoterm);
        assert!(!settings.strict);

        let settings: Settings =
            serde_json::from_str(r#"{ "default_mode": "both_embedded" }"#).unwrap();
        assert_eq!(settings.default_mode, EmbeddingMode::BothEmbedded);
    }
}
