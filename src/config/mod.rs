//! Configuration module
//!
//! Optional defaults for the CLI, read from `doc-combiner.toml`:
//!
//! - `Config`: The whole file
//! - `RenderConfig`: How PlantUML is located and where images go

mod file;

pub use file::{
    Config, ConfigError, RenderConfig, CONFIG_FILE_NAME, DEFAULT_ASSETS_DIR, DEFAULT_COMMAND,
    DEFAULT_JAVA,
};
