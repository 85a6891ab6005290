//! Configuration types for attrnorm.
//!
//! [`Config::load`] reads `~/.config/attrnorm/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::load_from`] reads an
//! explicit file on top of the same defaults. [`Config::defaults`] returns the
//! defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::RuleTableError;
use crate::types::{AttributeType, UnknownAttributeType};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[engine]
collisions = "reject"

[input]
format = "tsv"

[output]
audit = false

# Extra key aliases, appended to the built-in rule of the given type:
#
# [[aliases]]
# alias = "thermal design power"
# type  = "power"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/attrnorm/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub aliases: Vec<AliasConfig>,
}

/// `[engine]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub collisions: CollisionPolicy,
}

/// What to do when two rules claim the same key alias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Refuse to build the rule table.
    #[default]
    Reject,
    /// Keep the first-registered rule's claim and log a warning.
    FirstWins,
}

/// `[input]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub format: InputFormat,
}

/// Line format of raw key/value input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum InputFormat {
    /// `key<TAB>value` per line.
    #[default]
    #[serde(rename = "tsv")]
    Tsv,
    /// `{"key": "...", "value": "..."}` per line.
    #[serde(rename = "jsonl")]
    JsonLines,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Emit every input pair with its outcome, not only recognized ones.
    #[serde(default)]
    pub audit: bool,
}

/// One `[[aliases]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct AliasConfig {
    pub alias: String,
    #[serde(rename = "type")]
    pub attribute_type: String,
}

/// Errors turning a loaded [`Config`] into an engine.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("alias {alias:?}: {source}")]
    UnknownAttributeType {
        alias: String,
        source: UnknownAttributeType,
    },

    #[error(transparent)]
    Rules(#[from] RuleTableError),
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/attrnorm/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::layered(&path, false)
    }

    /// Load an explicit config file, layered on top of the built-in defaults.
    /// The file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::layered(path, true)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Resolve `[[aliases]]` entries to attribute types.
    pub fn extra_aliases(&self) -> Result<Vec<(AttributeType, String)>, ConfigError> {
        self.aliases
            .iter()
            .map(|entry| {
                entry
                    .attribute_type
                    .parse::<AttributeType>()
                    .map(|ty| (ty, entry.alias.clone()))
                    .map_err(|source| ConfigError::UnknownAttributeType {
                        alias: entry.alias.clone(),
                        source,
                    })
            })
            .collect()
    }

    fn layered(path: &Path, required: bool) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(required))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("attrnorm")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
