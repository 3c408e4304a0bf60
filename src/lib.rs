//! doc-combiner: PlantUML + OpenAPI to Markdown
//!
//! Bundles a PlantUML diagram and an OpenAPI specification into one
//! Markdown document. Both sources are embedded verbatim in fenced code
//! blocks; optionally the diagram is rendered to PNG with a local PlantUML
//! and linked above its source.
//!
//! # Example
//!
//! ```no_run
//! use doc_combiner::assemble;
//! use doc_combiner::config::RenderConfig;
//! use doc_combiner::request::GenerationRequest;
//! use std::path::Path;
//!
//! let request = GenerationRequest::validate(
//!     Some(Path::new("order.puml")),
//!     Some(Path::new("order.yaml")),
//!     Some(Path::new("docs/order.md")),
//!     true,
//!     None,
//! )?;
//! let generated = assemble::generate(&request, &RenderConfig::default())?;
//! println!("{}", generated.output_path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod assemble;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod logging;
pub mod render;
pub mod request;
