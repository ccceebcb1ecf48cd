use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use gantry_codegen::ServiceGenerator;
use gantry_core::NameCase;
use gantry_resolve::resolve;
use gantry_source::Extractor;

use super::{UnwrapOrExit, report, report_preview};

#[derive(Args)]
pub struct ServiceCommand {
    /// Source directory holding the implementation structs
    #[arg(short, long, default_value = "internal/logic")]
    pub src: PathBuf,

    /// Destination directory for generated interface files
    #[arg(short, long, default_value = "internal/service")]
    pub dst: PathBuf,

    /// Only generate for this contract name
    #[arg(long = "type")]
    pub type_filter: Option<String>,

    /// Regex matching implementation struct names; capture group 1 becomes
    /// the contract name
    #[arg(long)]
    pub pattern: Option<String>,

    /// File name case for generated files
    #[arg(long, default_value_t = NameCase::Snake)]
    pub name_case: NameCase,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Delete machine-owned files in the destination this run did not produce
    #[arg(long)]
    pub clear: bool,
}

impl ServiceCommand {
    pub fn run(&self) -> Result<()> {
        let extractor = match &self.pattern {
            Some(pattern) => Extractor::with_pattern(&self.src, pattern).unwrap_or_exit(),
            None => Extractor::new(&self.src),
        };
        let symbols = extractor.extract(self.type_filter.as_deref()).unwrap_or_exit();
        let outcome = resolve(&symbols).unwrap_or_exit();
        for warning in &outcome.warnings {
            eprintln!("warning: {}", warning);
        }

        let generator = ServiceGenerator::new(&outcome.contracts, self.name_case);
        if self.dry_run {
            report_preview(&generator.preview());
            return Ok(());
        }

        let result = generator.generate(&self.dst);
        if self.clear {
            let cleared = generator.clear(&self.dst).unwrap_or_exit();
            for name in &cleared.deleted {
                println!("  - {} (orphan)", name);
            }
            for name in &cleared.kept_foreign {
                eprintln!("warning: orphan '{}' kept, not machine-owned", name);
            }
        }
        report(&result);
        Ok(())
    }
}
