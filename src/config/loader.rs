// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_EMPTY_QUEUE_POLL_MS, DEFAULT_EVENT_CAPACITY, DEFAULT_MAX_DEGREE_OF_PARALLELISM,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration for a thread block.
///
/// Every field is optional in the file; missing values fall back to the constants in
/// [`crate::config::consts`]. Per-call values passed through `ExecuteOptions` take
/// precedence over what is configured here.
///
/// # Example
/// ```yaml
/// max_degree_of_parallelism: 8
/// timeouts:
///   item_timeout_ms: 30000
///   empty_queue_poll_ms: 500
/// events:
///   capacity: 1024
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BlockConfig {
    #[serde(default = "default_max_degree_of_parallelism")]
    pub max_degree_of_parallelism: usize,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub events: EventConfig,
}

fn default_max_degree_of_parallelism() -> usize {
    DEFAULT_MAX_DEGREE_OF_PARALLELISM
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            max_degree_of_parallelism: DEFAULT_MAX_DEGREE_OF_PARALLELISM,
            timeouts: TimeoutConfig::default(),
            events: EventConfig::default(),
        }
    }
}

impl BlockConfig {
    /// Reject values that could never drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_degree_of_parallelism == 0 {
            return Err(ConfigError::Invalid {
                field: "max_degree_of_parallelism",
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.timeouts.empty_queue_poll_ms == Some(0) {
            return Err(ConfigError::Invalid {
                field: "timeouts.empty_queue_poll_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.timeouts.item_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid {
                field: "timeouts.item_timeout_ms",
                reason: "must be greater than zero when set".to_string(),
            });
        }
        if self.events.capacity == Some(0) {
            return Err(ConfigError::Invalid {
                field: "events.capacity",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Timing knobs for a block.
///
/// # Fields
/// * `item_timeout_ms` - Per-item limit after which a transformation is cancelled (optional)
/// * `empty_queue_poll_ms` - How often continuous mode re-announces an empty queue (optional)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TimeoutConfig {
    pub item_timeout_ms: Option<u64>,
    pub empty_queue_poll_ms: Option<u64>,
}

impl TimeoutConfig {
    pub fn item_timeout(&self) -> Option<Duration> {
        self.item_timeout_ms.map(Duration::from_millis)
    }

    /// Get the poll interval, using the built-in default if not configured.
    pub fn empty_queue_poll(&self) -> Duration {
        Duration::from_millis(
            self.empty_queue_poll_ms
                .unwrap_or(DEFAULT_EMPTY_QUEUE_POLL_MS),
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EventConfig {
    pub capacity: Option<usize>,
}

impl EventConfig {
    pub fn get_capacity(&self) -> usize {
        self.capacity.unwrap_or(DEFAULT_EVENT_CAPACITY)
    }
}

/// Load a config from a YAML or TOML file, chosen by extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BlockConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let content = fs::read_to_string(path)?;
    let cfg = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        _ => return Err(ConfigError::UnsupportedFormat { extension }),
    };
    Ok(cfg)
}

/// Load a config file and reject values that could never drive a run.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<BlockConfig, ConfigError> {
    let cfg = load_config(path)?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_yaml() {
        let yaml = r#"
max_degree_of_parallelism: 8
timeouts:
  item_timeout_ms: 2500
"#;
        let cfg: BlockConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.max_degree_of_parallelism, 8);
        assert_eq!(cfg.timeouts.item_timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(
            cfg.timeouts.empty_queue_poll(),
            Duration::from_millis(DEFAULT_EMPTY_QUEUE_POLL_MS)
        );
        assert_eq!(cfg.events.get_capacity(), DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg: BlockConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, BlockConfig::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_load_yaml_file() {
        let file = write_config(".yaml", "max_degree_of_parallelism: 4\n");
        let cfg = load_and_validate_config(file.path()).unwrap();
        assert_eq!(cfg.max_degree_of_parallelism, 4);
    }

    #[test]
    fn test_load_toml_file() {
        let file = write_config(
            ".toml",
            "max_degree_of_parallelism = 16\n\n[timeouts]\nempty_queue_poll_ms = 50\n\n[events]\ncapacity = 32\n",
        );
        let cfg = load_and_validate_config(file.path()).unwrap();
        assert_eq!(cfg.max_degree_of_parallelism, 16);
        assert_eq!(cfg.timeouts.empty_queue_poll(), Duration::from_millis(50));
        assert_eq!(cfg.events.get_capacity(), 32);
    }

    #[test]
    fn test_zero_parallelism_is_rejected() {
        let file = write_config(".yml", "max_degree_of_parallelism: 0\n");
        let error = load_and_validate_config(file.path()).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "max_degree_of_parallelism",
                ..
            }
        ));
        // Loading without validation still succeeds
        assert!(load_config(file.path()).is_ok());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let cfg = BlockConfig {
            events: EventConfig { capacity: Some(0) },
            ..BlockConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid {
                field: "events.capacity",
                ..
            })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_config(".json", "{}");
        let error = load_config(file.path()).unwrap_err();
        assert!(error.to_string().contains("unsupported config format 'json'"));
    }

    #[test]
    fn test_missing_file() {
        let error = load_config("/nonexistent/threadblock.yaml").unwrap_err();
        assert!(matches!(error, ConfigError::Io(_)));
    }
}
