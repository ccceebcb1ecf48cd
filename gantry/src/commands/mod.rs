mod completions;
mod dao;
mod service;

use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use dao::DaoCommand;
use eyre::Result;
use gantry_codegen::{GenerateResult, Preview};
use service::ServiceCommand;

/// Extension trait for exiting on pipeline errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T, E> UnwrapOrExit<T> for Result<T, Box<E>>
where
    E: miette::Diagnostic + Send + Sync + 'static,
{
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

impl<T> UnwrapOrExit<T> for Result<T, gantry_core::WriteError> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "gantry")]
#[command(version)]
#[command(about = "Regenerate Go service interfaces and dao layers")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Service(cmd) => cmd.run(),
            Commands::Dao(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate service interface files from implementation structs
    Service(ServiceCommand),

    /// Regenerate dao, do, and entity layers from a database schema
    Dao(DaoCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Print a generation summary; exits non-zero when any item failed.
pub(crate) fn report(result: &GenerateResult) {
    for path in &result.written {
        println!("  + {}", path);
    }
    for path in &result.skipped {
        println!("  = {} (kept)", path);
    }
    println!(
        "{} written, {} unchanged, {} kept",
        result.written.len(),
        result.unchanged.len(),
        result.skipped.len()
    );

    if !result.is_success() {
        for failure in &result.failures {
            eprintln!("error: generation failed for '{}'", failure.item);
            eprintln!("{:?}", failure.error);
        }
        std::process::exit(1);
    }
}

/// Print rendered files without writing; exits non-zero when any item
/// failed to render.
pub(crate) fn report_preview(preview: &Preview) {
    for file in &preview.files {
        println!("── {} ──", file.path);
        println!("{}", file.content);
    }
    println!("── Summary ──");
    println!("{} files would be generated", preview.files.len());

    if !preview.failures.is_empty() {
        for failure in &preview.failures {
            eprintln!("error: generation failed for '{}'", failure.item);
            eprintln!("{:?}", failure.error);
        }
        std::process::exit(1);
    }
}
