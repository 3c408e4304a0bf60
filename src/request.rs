//! Input validation
//!
//! Turns raw user-supplied paths and options into a [`GenerationRequest`].
//! Only existence and the output extension are checked; file contents are
//! never read here.

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions accepted for the generated document (compared case-insensitively)
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// A validated request to generate one combined document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// PlantUML source file
    pub diagram_path: PathBuf,
    /// OpenAPI source file
    pub api_spec_path: PathBuf,
    /// Destination of the Markdown document
    pub output_path: PathBuf,
    /// Whether to try rendering the diagram to PNG
    pub render_image: bool,
    /// PlantUML jar; only set when `render_image` is true
    pub renderer_package: Option<PathBuf>,
}

impl GenerationRequest {
    /// Validate raw inputs. The first failing rule wins.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] describing the first invalid input.
    pub fn validate(
        diagram: Option<&Path>,
        api_spec: Option<&Path>,
        output: Option<&Path>,
        render_image: bool,
        renderer_package: Option<&Path>,
    ) -> Result<Self, InputError> {
        let diagram_path = existing(diagram).ok_or(InputError::InvalidDiagram)?;
        let api_spec_path = existing(api_spec).ok_or(InputError::InvalidApiSpec)?;
        let output_path = non_empty(output).ok_or(InputError::MissingOutput)?;

        if !has_document_extension(&output_path) {
            return Err(InputError::BadOutputExtension(output_path));
        }

        // The package field is inert while rendering is off
        let renderer_package = if render_image {
            non_empty(renderer_package)
        } else {
            None
        };

        Ok(Self {
            diagram_path,
            api_spec_path,
            output_path,
            render_image,
            renderer_package,
        })
    }
}

fn non_empty(path: Option<&Path>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty())
        .map(Path::to_path_buf)
}

fn existing(path: Option<&Path>) -> Option<PathBuf> {
    non_empty(path).filter(|p| p.exists())
}

/// Check whether a path ends in one of [`DOCUMENT_EXTENSIONS`]
#[must_use]
pub fn has_document_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Reasons a set of inputs is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum InputError {
    /// Diagram path missing or not found
    #[error("select a valid diagram file (*.puml)")]
    #[diagnostic(code(input::diagram), help("pass the path of an existing PlantUML file"))]
    InvalidDiagram,

    /// API spec path missing or not found
    #[error("select a valid API spec file (*.yml/*.yaml/*.json)")]
    #[diagnostic(code(input::api_spec), help("pass the path of an existing OpenAPI file"))]
    InvalidApiSpec,

    /// No output path given
    #[error("select an output location for the Markdown document")]
    #[diagnostic(code(input::output), help("use -o/--output <FILE.md>"))]
    MissingOutput,

    /// Output path has the wrong extension
    #[error("output file must end in .md or .markdown: {}", .0.display())]
    #[diagnostic(code(input::extension))]
    BadOutputExtension(PathBuf),
}
