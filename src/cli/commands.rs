//! CLI commands implementation

use crate::assemble::{self, AssembleError};
use crate::config::{Config, ConfigError, RenderConfig, CONFIG_FILE_NAME};
use crate::render::Renderer;
use crate::request::{GenerationRequest, InputError};
use clap::{Args, Parser, Subcommand};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Combine a PlantUML diagram and an OpenAPI spec into one Markdown document
#[derive(Parser, Debug)]
#[command(name = "doc-combiner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to the nearest doc-combiner.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Paths shared by `generate` and `check`
#[derive(Args, Debug)]
pub struct InputArgs {
    /// PlantUML source (*.puml)
    pub diagram: Option<PathBuf>,
    /// OpenAPI spec (*.yml, *.yaml, *.json)
    pub api_spec: Option<PathBuf>,
    /// Markdown output (*.md, *.markdown)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Rendering options
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Render the diagram to PNG and embed it
    #[arg(long, overrides_with = "no_render")]
    pub render: bool,
    /// Do not render, even if the config enables it
    #[arg(long, overrides_with = "render")]
    pub no_render: bool,
    /// PlantUML jar to try before the `plantuml` command
    #[arg(long, value_name = "JAR")]
    pub plantuml_jar: Option<PathBuf>,
}

impl RenderArgs {
    /// Whether rendering is on: the last of `--render`/`--no-render`,
    /// otherwise the config's `render.enabled`
    #[must_use]
    pub fn render_image(&self, config: &RenderConfig) -> bool {
        if self.render {
            true
        } else if self.no_render {
            false
        } else {
            config.enabled
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the combined Markdown document
    Generate {
        #[allow(missing_docs)]
        #[command(flatten)]
        inputs: InputArgs,
        #[allow(missing_docs)]
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Validate inputs without writing anything
    Check {
        #[allow(missing_docs)]
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Write a default doc-combiner.toml
    Init {
        /// Directory to create the config in
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List the renderers that would be tried, in order
    Renderers {
        /// PlantUML jar to include
        #[arg(long, value_name = "JAR")]
        plantuml_jar: Option<PathBuf>,
    },
}

/// Run the CLI with the given arguments
///
/// # Errors
///
/// Returns an error if the command fails.
pub fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate { inputs, render } => {
            let config = load_config(cli.config.as_deref())?;
            cmd_generate(&inputs, &render, &config.render)
        }
        Commands::Check { inputs } => cmd_check(&inputs),
        Commands::Init { path } => cmd_init(&path),
        Commands::Renderers { plantuml_jar } => {
            let config = load_config(cli.config.as_deref())?;
            cmd_renderers(plantuml_jar.as_deref(), &config.render);
            Ok(())
        }
    }
}

fn cmd_generate(
    inputs: &InputArgs,
    render: &RenderArgs,
    config: &RenderConfig,
) -> Result<(), CliError> {
    let render_image = render.render_image(config);
    if !render_image && render.plantuml_jar.is_some() {
        return Err(CliError::JarWithoutRender);
    }

    let package = render
        .plantuml_jar
        .as_deref()
        .or(config.plantuml_jar.as_deref());

    let request = GenerationRequest::validate(
        inputs.diagram.as_deref(),
        inputs.api_spec.as_deref(),
        inputs.output.as_deref(),
        render_image,
        package,
    )?;
    debug!("{request:?}");

    let generated = assemble::generate(&request, config)?;

    println!("Markdown saved to {}", generated.output_path.display());

    if request.render_image {
        match &generated.image {
            Some(image) => println!("  Diagram image: {}", image.display()),
            None => {
                println!("\nNote: PNG rendering is optional and produced no image.");
                println!("Install PlantUML or pass --plantuml-jar <JAR>.");
            }
        }
    }

    Ok(())
}

fn cmd_check(inputs: &InputArgs) -> Result<(), CliError> {
    let request = GenerationRequest::validate(
        inputs.diagram.as_deref(),
        inputs.api_spec.as_deref(),
        inputs.output.as_deref(),
        false,
        None,
    )?;

    println!("Inputs are valid:");
    println!("  diagram:  {}", request.diagram_path.display());
    println!("  API spec: {}", request.api_spec_path.display());
    println!("  output:   {}", request.output_path.display());

    Ok(())
}

fn cmd_init(dir: &Path) -> Result<(), CliError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(CliError::ConfigExists(path));
    }

    std::fs::create_dir_all(dir).map_err(|e| CliError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    Config::default().save(&path)?;

    println!("Created {}", path.display());
    Ok(())
}

fn cmd_renderers(package: Option<&Path>, config: &RenderConfig) {
    let package = package.or(config.plantuml_jar.as_deref());
    let renderer = Renderer::discover(package, &config.java, &config.command);

    if renderer.is_empty() {
        println!("No PlantUML renderer available.");
        println!("Install PlantUML or pass --plantuml-jar <JAR>.");
        return;
    }

    for (i, candidate) in renderer.candidates().iter().enumerate() {
        println!("  {}. {candidate}", i + 1);
    }
}

fn load_config(explicit: Option<&Path>) -> Result<Config, CliError> {
    let cwd = std::env::current_dir().map_err(|e| CliError::Io {
        path: PathBuf::from("."),
        source: e,
    })?;
    Ok(Config::resolve(explicit, &cwd)?)
}

/// CLI errors
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    /// Invalid user input
    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    /// Document generation failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Assemble(#[from] AssembleError),

    /// Config file error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        /// Path that caused the error
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// `--plantuml-jar` given while rendering is off
    #[error("--plantuml-jar has no effect while rendering is off")]
    #[diagnostic(help("pass --render or set `render.enabled = true` in doc-combiner.toml"))]
    JarWithoutRender,

    /// Refusing to overwrite a config
    #[error("{} already exists", .0.display())]
    ConfigExists(PathBuf),
}
