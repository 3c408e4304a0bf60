//! doc-combiner CLI - PlantUML + OpenAPI to Markdown

use clap::Parser;
use doc_combiner::cli::{run, Cli};
use miette::Diagnostic;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = doc_combiner::logging::init(cli.verbose) {
        eprintln!("Warning: could not initialize logging: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(help) = e.help() {
                eprintln!("  help: {help}");
            }
            ExitCode::FAILURE
        }
    }
}
