//! Command-line interface module
//!
//! This module provides the CLI for doc-combiner:
//!
//! - `doc-combiner generate` - Write the combined Markdown document
//! - `doc-combiner check` - Validate inputs only
//! - `doc-combiner init` - Create a default config file
//! - `doc-combiner renderers` - List available PlantUML renderers

mod commands;

pub use commands::{run, Cli, CliError, Commands, InputArgs, RenderArgs};
