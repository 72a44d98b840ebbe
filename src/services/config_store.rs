// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

use crate::services::detection::{HeadlineClassifier, RuleError, RuleTable};

pub const CONFIG_DIR_ENV: &str = "TRUTHSENSE_CONFIG_DIR";
const MAX_BACKUPS: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Invalid rule table in config: {0}")]
    Rules(#[from] RuleError),
    #[error("No config directory available on this platform")]
    NoConfigDir,
    #[error("Unknown output format '{0}' (expected text or json)")]
    UnknownOutputFormat(String),
}

fn io_err(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError {
    let path = path.to_path_buf();
    move |source| ConfigError::Io { action, path, source }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnknownOutputFormat(val.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub detection: DetectionConfig,
    /// Replaces the built-in rule table when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleTable>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            detection: DetectionConfig::default(),
            rules: None,
        }
    }
}

impl AppConfig {
    /// Classifier for this config: the custom table if one is set, else the built-in one
    pub fn classifier(&self) -> Result<HeadlineClassifier, RuleError> {
        match &self.rules {
            Some(table) => HeadlineClassifier::new(table.clone()),
            None => Ok(HeadlineClassifier::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionConfig {
    /// Artificial wait before a presented result, in milliseconds
    #[serde(default = "default_presentation_delay")]
    pub presentation_delay_ms: u64,
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            presentation_delay_ms: default_presentation_delay(),
            output_format: OutputFormat::Text,
        }
    }
}

fn default_version() -> String { env!("CARGO_PKG_VERSION").to_string() }
fn default_presentation_delay() -> u64 { 800 }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory (`TRUTHSENSE_CONFIG_DIR` wins over the platform dir)
    pub fn default_config_dir() -> Option<PathBuf> {
        match std::env::var(CONFIG_DIR_ENV) {
            Ok(p) if !p.trim().is_empty() => Some(PathBuf::from(p)),
            _ => dirs::config_dir().map(|p| p.join("truthsense")),
        }
    }

    pub fn open_default() -> Result<Self, ConfigError> {
        Self::default_config_dir()
            .map(Self::new)
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(io_err("create", &self.config_dir))
    }

    /// Load configuration from file; a missing file yields defaults
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).map_err(io_err("read", &self.config_file))?;

        let config: AppConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.config_file.clone(),
            source,
        })?;
        if let Some(table) = &config.rules {
            table.validate()?;
        }
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(table) = &config.rules {
            table.validate()?;
        }
        self.ensure_dir()?;

        // Create backup if file exists
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;

        fs::write(&self.config_file, content).map_err(io_err("write", &self.config_file))?;
        info!(path = %self.config_file.display(), "config.saved");
        Ok(())
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(io_err("create", &backup_dir))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(io_err("back up", &self.config_file))?;

        self.cleanup_old_backups(&backup_dir, MAX_BACKUPS)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(io_err("read", backup_dir))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Oldest first
        entries.sort_by_key(|e| {
            e.metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        });

        let remove_count = entries.len() - keep;
        for entry in entries.iter().take(remove_count) {
            if let Err(e) = fs::remove_file(entry.path()) {
                warn!(path = %entry.path().display(), error = %e, "config.backup_cleanup_failed");
            }
        }

        Ok(())
    }
}
