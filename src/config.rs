use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::baseline::{BaselineBand, BaselineTable};
use crate::constants::ScoringConstants;
use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User id used when the CLI is not given one
    #[serde(default = "default_user")]
    pub default_user: String,

    /// Configuration metadata
    #[serde(default)]
    pub metadata: ConfigMetadata,

    /// Scoring pipeline calibration
    #[serde(default)]
    pub scoring: ScoringConstants,

    /// Logging preferences
    #[serde(default)]
    pub logging: LogConfig,

    /// Where history, todos and routine runs are stored
    #[serde(default)]
    pub storage: StorageSettings,

    /// Reference baseline bands
    #[serde(default)]
    pub baseline: BaselineSettings,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// SQLite database file
    pub database_path: PathBuf,
}

/// Reference baseline table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineSettings {
    /// Consult the table at all; when off every delta uses the fallback
    pub enabled: bool,

    /// Label reported with baselines from this table
    pub source: String,

    pub bands: Vec<BaselineBand>,
}

fn default_user() -> String {
    "local".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_user: default_user(),
            metadata: ConfigMetadata::default(),
            scoring: ScoringConstants::default(),
            logging: LogConfig::default(),
            storage: StorageSettings::default(),
            baseline: BaselineSettings::default(),
        }
    }
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        ConfigMetadata {
            version: "1.0".to_string(),
            updated_at: Utc::now(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: AppConfig::config_dir().join("recoverrs.db"),
        }
    }
}

impl Default for BaselineSettings {
    fn default() -> Self {
        let table = BaselineTable::default();
        BaselineSettings {
            enabled: true,
            source: table.source,
            bands: table.bands,
        }
    }
}

impl BaselineSettings {
    /// Baseline provider described by these settings, if enabled
    pub fn table(&self) -> Option<BaselineTable> {
        self.enabled
            .then(|| BaselineTable::new(self.source.clone(), self.bands.clone()))
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Directory holding the config file and, by default, the database
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".recoverrs")
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from_file(&config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(config.scoring, deserialized.scoring);
        assert_eq!(deserialized.baseline.bands.len(), config.baseline.bands.len());
    }

    #[test]
    fn test_sparse_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            default_user = "sam"

            [scoring]
            red_fatigue = 85

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_user, "sam");
        assert_eq!(config.scoring.red_fatigue, 85);
        assert_eq!(config.scoring.yellow_fatigue, 65);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.baseline.enabled);
    }

    #[test]
    fn test_disabled_baseline_has_no_table() {
        let mut config = AppConfig::default();
        assert!(config.baseline.table().is_some());
        config.baseline.enabled = false;
        assert!(config.baseline.table().is_none());
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = AppConfig::default();
        original.storage.database_path = temp_dir.path().join("test.db");
        original.scoring.next_rest_minutes = 240;

        original.save_to_file(&config_path).unwrap();
        let loaded = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded.storage.database_path, original.storage.database_path);
        assert_eq!(loaded.scoring.next_rest_minutes, 240);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig::load_or_default(Some(&temp_dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.default_user, "local");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "scoring = [not toml").unwrap();
        assert!(AppConfig::load_or_default(Some(&path)).is_err());
    }
}
