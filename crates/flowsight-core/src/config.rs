//! Runtime configuration.
//!
//! Loaded from a TOML file and/or environment variables:
//!
//! | Variable                  | Effect                                  |
//! |---------------------------|-----------------------------------------|
//! | `FLOWSIGHT_CONFIG`        | path of a TOML file to start from       |
//! | `FLOWSIGHT_LOG_LEVEL`     | overrides `logging.level`               |
//! | `FLOWSIGHT_LOG_FORMAT`    | `json` enables JSON log lines           |
//! | `FLOWSIGHT_LINK_STRATEGY` | overrides `normalizer.link_strategy`    |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{FlowsightError, Result};
use crate::normalizer::{LinkStrategy, NormalizeOptions};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlowsightConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub normalizer: NormalizeOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default verbosity when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl FlowsightConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FlowsightError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("FLOWSIGHT_CONFIG") {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(level) = lookup("FLOWSIGHT_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = lookup("FLOWSIGHT_LOG_FORMAT") {
            config.logging.json = format.eq_ignore_ascii_case("json");
        }
        if let Some(strategy) = lookup("FLOWSIGHT_LINK_STRATEGY") {
            config.normalizer.link_strategy = strategy
                .parse::<LinkStrategy>()
                .map_err(FlowsightError::Config)?;
        }

        Ok(config)
    }
}
