//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-info\config.toml
//! - macOS: ~/Library/Application Support/music-info/config.toml
//! - Linux: ~/.config/music-info/config.toml
//!
//! A different file can be given on the command line with `--config`.
//!
//! ```toml
//! [output]
//! pretty = true
//!
//! [jackets]
//! export_dir = "/home/me/jackets"
//!
//! [provenance]
//! builtin_rules = true
//!
//! [[provenance.rules]]
//! pattern = 'https://label\.example/release/(\d+)'
//! provider = "Label Shop"
//! link = "https://label.example/r/$1"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::provenance::{LinkTransform, ProvenanceRule, RuleTable};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON output settings
    pub output: OutputConfig,

    /// Jacket export settings
    pub jackets: JacketConfig,

    /// Provenance rule settings
    pub provenance: ProvenanceConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JacketConfig {
    /// Write each decoded jacket's original bytes here
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvenanceConfig {
    /// Keep the built-in store rules after the user rules
    pub builtin_rules: bool,

    /// User rules, evaluated before the built-in ones
    pub rules: Vec<RuleConfig>,
}

impl Default for ProvenanceConfig {
    fn default() -> Self {
        Self {
            builtin_rules: true,
            rules: Vec::new(),
        }
    }
}

/// A user-defined provenance rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Regex matched against the comment
    pub pattern: String,
    /// Provider label
    pub provider: String,
    /// Replacement template over the match (`$0`, `$1`, ...); verbatim if unset
    #[serde(default)]
    pub link: Option<String>,
}

impl ProvenanceConfig {
    /// Compile the configured rules into a table.
    pub fn rule_table(&self) -> Result<RuleTable, ConfigError> {
        let user_rules = self
            .rules
            .iter()
            .map(|rule| {
                let transform = match &rule.link {
                    Some(template) => LinkTransform::Template(template.clone()),
                    None => LinkTransform::Verbatim,
                };
                ProvenanceRule::new(&rule.pattern, rule.provider.clone(), transform)
                    .map_err(|e| ConfigError::InvalidRule(rule.pattern.clone(), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let base = if self.builtin_rules {
            RuleTable::builtin()
        } else {
            RuleTable::default()
        };
        Ok(base.preceded_by(user_rules))
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-info"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit file. Errors are returned, not masked.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

/// Save configuration to a file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(path.to_path_buf())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Invalid provenance rule pattern {0:?}: {1}")]
    InvalidRule(String, regex::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
