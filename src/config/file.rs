//! Configuration file (doc-combiner.toml)

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for when no explicit config is given
pub const CONFIG_FILE_NAME: &str = "doc-combiner.toml";

/// Image directory created beside the output document
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Java runtime used for a PlantUML jar
pub const DEFAULT_JAVA: &str = "java";

/// PlantUML command looked up on `PATH`
pub const DEFAULT_COMMAND: &str = "plantuml";

/// Configuration loaded from `doc-combiner.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Rendering configuration
    #[serde(default)]
    pub render: RenderConfig,
}

impl Config {
    /// Load a config from a file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::io(path))?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the config as pretty TOML
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|source| ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(ConfigError::io(path))
    }

    /// Find a config file by searching upward from `start`
    #[must_use]
    pub fn find(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Load the explicit config if given, otherwise the nearest one above
    /// `start`, otherwise defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be loaded.
    pub fn resolve(explicit: Option<&Path>, start: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::find(start) {
            Some(path) => {
                tracing::debug!("using config {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Render by default, as if `--render` was passed
    #[serde(default)]
    pub enabled: bool,
    /// Default PlantUML jar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plantuml_jar: Option<PathBuf>,
    /// Java runtime for the jar
    #[serde(default = "default_java")]
    pub java: String,
    /// PlantUML command on `PATH`
    #[serde(default = "default_command")]
    pub command: String,
    /// Image directory, relative to the output document
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            plantuml_jar: None,
            java: default_java(),
            command: default_command(),
            assets_dir: default_assets_dir(),
        }
    }
}

fn default_java() -> String {
    DEFAULT_JAVA.to_string()
}

fn default_command() -> String {
    DEFAULT_COMMAND.to_string()
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ASSETS_DIR)
}

/// Errors that can occur when working with config files
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// IO error reading/writing the config
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        /// Path that caused the error
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
    /// Parse error in TOML
    #[error("parse error in {}: {source}", .path.display())]
    #[diagnostic(help("see `doc-combiner init` for a valid configuration"))]
    Parse {
        /// Path that caused the error
        path: PathBuf,
        /// Underlying parse error
        source: toml::de::Error,
    },
    /// Serialization error
    #[error("serialization error for {}: {source}", .path.display())]
    Serialize {
        /// Path that caused the error
        path: PathBuf,
        /// Underlying serialization error
        source: toml::ser::Error,
    },
}

impl ConfigError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
