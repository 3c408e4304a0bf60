//! Document assembly
//!
//! Reads both sources, optionally renders the diagram, composes the
//! Markdown and writes it next to (or into) the requested location.
//! Source and output IO failures are fatal; rendering failures are not.

use crate::codegen::{
    derive_title, language_hint, CombinedDocument, MarkdownGenerator, TIMESTAMP_FORMAT,
};
use crate::config::RenderConfig;
use crate::render::Renderer;
use crate::request::GenerationRequest;
use chrono::Local;
use miette::Diagnostic;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Result of a successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Where the document was written
    pub output_path: PathBuf,
    /// The embedded image, if rendering was requested and succeeded
    pub image: Option<PathBuf>,
}

/// Generate the document for a validated request, discovering renderers
/// from `config` when rendering is requested.
///
/// # Errors
///
/// Returns an error if a source cannot be read or the output cannot be
/// written.
pub fn generate(
    request: &GenerationRequest,
    config: &RenderConfig,
) -> Result<Generated, AssembleError> {
    let renderer = if request.render_image {
        Renderer::discover(
            request.renderer_package.as_deref(),
            &config.java,
            &config.command,
        )
    } else {
        Renderer::default()
    };

    Assembler::new(renderer)
        .with_assets_dir(&config.assets_dir)
        .generate(request)
}

/// Composes and writes combined documents
#[derive(Debug, Clone)]
pub struct Assembler {
    renderer: Renderer,
    assets_dir: PathBuf,
}

impl Assembler {
    /// Create an assembler using the given renderer and the default `assets`
    /// image directory
    #[must_use]
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            assets_dir: PathBuf::from(crate::config::DEFAULT_ASSETS_DIR),
        }
    }

    /// Override the image directory (relative to the document's directory)
    #[must_use]
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Compose the document and write it to `request.output_path`
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the output cannot be
    /// written.
    pub fn generate(&self, request: &GenerationRequest) -> Result<Generated, AssembleError> {
        let generated_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let (markdown, image) = self.compose(request, &generated_at)?;

        write_document(&request.output_path, &markdown)?;
        info!("wrote {}", request.output_path.display());

        Ok(Generated {
            output_path: request.output_path.clone(),
            image,
        })
    }

    /// Build the Markdown text without writing it. Rendering (if requested)
    /// still happens, since the image is placed beside the output.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read.
    pub fn compose(
        &self,
        request: &GenerationRequest,
        generated_at: &str,
    ) -> Result<(String, Option<PathBuf>), AssembleError> {
        let diagram_source = read_lossy(&request.diagram_path)?;
        let api_spec_source = read_lossy(&request.api_spec_path)?;

        let (image, image_link) = if request.render_image {
            self.render(request)
        } else {
            (None, None)
        };

        let document = CombinedDocument {
            title: derive_title(&request.diagram_path, &request.api_spec_path),
            generated_at: generated_at.to_string(),
            diagram_source,
            api_spec_source,
            api_language: language_hint(&request.api_spec_path),
            image: image_link,
        };

        Ok((MarkdownGenerator::new(&document).generate(), image))
    }

    /// Returns the image path and its link relative to the document
    fn render(&self, request: &GenerationRequest) -> (Option<PathBuf>, Option<String>) {
        let doc_dir = match std::path::absolute(document_dir(&request.output_path)) {
            Ok(dir) => dir,
            Err(e) => {
                warn!("cannot resolve output directory, skipping rendering: {e}");
                return (None, None);
            }
        };

        let assets = doc_dir.join(&self.assets_dir);
        if let Err(e) = fs::create_dir_all(&assets) {
            warn!("cannot create {}, skipping rendering: {e}", assets.display());
            return (None, None);
        }

        let Some(image) = self.renderer.render(&request.diagram_path, &assets) else {
            return (None, None);
        };

        let link = relative_link(&image, &doc_dir);
        debug!("image link: {link}");
        (Some(image), Some(link))
    }
}

/// Directory the document will live in; `.` for bare file names
fn document_dir(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Link from `base` to `target` with forward slashes
fn relative_link(target: &Path, base: &Path) -> String {
    pathdiff::diff_paths(target, base)
        .unwrap_or_else(|| target.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

fn read_lossy(path: &Path) -> Result<String, AssembleError> {
    let bytes = fs::read(path).map_err(|source| AssembleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_document(path: &Path, content: &str) -> Result<(), AssembleError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| AssembleError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| AssembleError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Fatal errors while generating a document
#[derive(Debug, Error, Diagnostic)]
pub enum AssembleError {
    /// A source file could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        /// Source file
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
    /// The output directory could not be created
    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory that failed
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
    /// The output document could not be written
    #[error("cannot write {}: {source}", .path.display())]
    #[diagnostic(help("check that the output location is writable"))]
    Write {
        /// Output file
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
}
