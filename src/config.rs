//! Configuration for the stream decoders

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Decoder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Apply parameter defaults to every completed command
    pub normalize: bool,
    /// Drop an unfinished sequence when a control byte interrupts it
    pub reset_on_control: bool,
    /// Emit a trace event for every decoded command and key
    pub log_sequences: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            reset_on_control: false,
            log_sequences: false,
        }
    }
}

impl CodecConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: CodecConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from the default location or return the defaults
    pub fn load_or_default() -> Self {
        let Some(path) = default_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring codec config");
                Self::default()
            }
        }
    }
}

/// `~/.config/mochi/codec.json`
pub fn default_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("mochi")
            .join("codec.json")
    })
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CodecConfig::default();
        assert!(config.normalize);
        assert!(!config.reset_on_control);
        assert!(!config.log_sequences);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec.json");

        let config = CodecConfig {
            normalize: false,
            reset_on_control: true,
            log_sequences: true,
        };
        config.save(&path).unwrap();

        assert_eq!(CodecConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec.json");
        std::fs::write(&path, r#"{ "reset_on_control": true }"#).unwrap();

        let config = CodecConfig::load(&path).unwrap();
        assert!(config.normalize);
        assert!(config.reset_on_control);
    }

    #[test]
    fn test_config_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = CodecConfig::load(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ normalize").unwrap();
        assert!(matches!(CodecConfig::load(&path), Err(ConfigError::Json(_))));
    }
}
