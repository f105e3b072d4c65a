//! Configuration loading and typed config structures for the loader.
//!
//! The configuration lives in `gathering-config.yaml` next to the binary's
//! working directory. Every section is optional; a missing file yields the
//! defaults.

use std::path::{Path, PathBuf};

use gathering_types::ClientLanguage;
use serde::Deserialize;

/// Environment variable overriding `data.path`.
pub const DATA_PATH_ENV: &str = "GATHERING_DATA";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A display hour outside `0..24`.
    #[error("display hour {0} is not an hour of the day")]
    InvalidHour(u8),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level loader configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GathererConfig {
    /// Where the data dump lives.
    #[serde(default)]
    pub data: DataConfig,

    /// Which nodes to print and how.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GathererConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `GATHERING_DATA` overrides `data.path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidHour`] for an out-of-range display hour.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::InvalidHour`] for an out-of-range display hour.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.data.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values serde cannot rule out.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.display.hour {
            Some(hour) if hour >= gathering_nodes::HOURS_PER_DAY => {
                Err(ConfigError::InvalidHour(hour))
            }
            _ => Ok(()),
        }
    }
}

/// Data source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataConfig {
    /// Path of the JSON data dump.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

impl DataConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_path_override(std::env::var(DATA_PATH_ENV).ok());
    }

    /// Replace the dump path with a non-empty override value.
    fn apply_path_override(&mut self, value: Option<String>) {
        if let Some(val) = value.filter(|val| !val.is_empty()) {
            self.path = PathBuf::from(val);
        }
    }
}

/// Output selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    /// Language used for item names in log lines.
    #[serde(default)]
    pub language: ClientLanguage,

    /// Eorzea hour to evaluate uptime at; the current hour if unset.
    #[serde(default)]
    pub hour: Option<u8>,

    /// Only print nodes yielding all of these items (English names).
    #[serde(default)]
    pub items: Vec<String>,

    /// Only print nodes that are up at the evaluated hour.
    #[serde(default)]
    pub only_up: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("gathering-data.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GathererConfig::default();
        assert_eq!(config.data.path, PathBuf::from("gathering-data.json"));
        assert_eq!(config.display.language, ClientLanguage::English);
        assert_eq!(config.display.hour, None);
        assert!(config.display.items.is_empty());
        assert!(!config.display.only_up);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
display:
  language: german
  hour: 14
  items:
    - Copper Ore
    - Fire Shard
  only_up: true

logging:
  level: debug
";
        let config = GathererConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.unwrap_or_default();
        assert_eq!(config.display.language, ClientLanguage::German);
        assert_eq!(config.display.hour, Some(14));
        assert_eq!(config.display.items, vec!["Copper Ore", "Fire Shard"]);
        assert!(config.display.only_up);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = GathererConfig::parse("display:\n  only_up: true\n").unwrap_or_default();
        assert!(config.display.only_up);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn data_path_override_replaces_configured_path() {
        let mut data = DataConfig {
            path: PathBuf::from("configured.json"),
        };
        data.apply_path_override(None);
        assert_eq!(data.path, PathBuf::from("configured.json"));
        data.apply_path_override(Some(String::new()));
        assert_eq!(data.path, PathBuf::from("configured.json"));
        data.apply_path_override(Some("/srv/dumps/latest.json".to_owned()));
        assert_eq!(data.path, PathBuf::from("/srv/dumps/latest.json"));
    }

    #[test]
    fn parse_applies_the_environment_override() {
        let config = GathererConfig::parse("data:\n  path: from-yaml.json\n").unwrap_or_default();
        let expected = std::env::var(DATA_PATH_ENV)
            .ok()
            .filter(|val| !val.is_empty())
            .map_or_else(|| PathBuf::from("from-yaml.json"), PathBuf::from);
        assert_eq!(config.data.path, expected);
    }

    #[test]
    fn out_of_range_hour_is_rejected() {
        let result = GathererConfig::parse("display:\n  hour: 24\n");
        assert!(matches!(result, Err(ConfigError::InvalidHour(24))));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result = GathererConfig::parse("display: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = GathererConfig::from_file(Path::new("does-not-exist.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
