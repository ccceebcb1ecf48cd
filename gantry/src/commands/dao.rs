use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use gantry_codegen::DaoGenerator;
use gantry_core::GantryConfig;
use gantry_schema::{SqliteIntrospector, TableFilter};

use super::{UnwrapOrExit, report, report_preview};

#[derive(Args)]
pub struct DaoCommand {
    /// SQLite database file to introspect
    #[arg(short, long)]
    pub db: PathBuf,

    /// Output directory for the generated dao tree
    #[arg(short, long, default_value = "internal/dao")]
    pub out: PathBuf,

    /// Tables to generate (defaults to every user table)
    #[arg(long, value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Tables to exclude
    #[arg(long, value_delimiter = ',')]
    pub tables_ex: Vec<String>,

    /// Prefix stripped from table names before deriving type names
    #[arg(long, default_value = "")]
    pub remove_prefix: String,

    /// Go import path of the generated internal package
    #[arg(long, default_value = "internal")]
    pub import_prefix: String,

    /// Path to gantry.toml with type and field overrides
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl DaoCommand {
    pub fn run(&self) -> Result<()> {
        let config = match &self.config {
            Some(path) => GantryConfig::from_file(path).unwrap_or_exit(),
            None => GantryConfig::default(),
        };

        let introspector = SqliteIntrospector::open(&self.db).unwrap_or_exit();
        let filter = TableFilter {
            tables: self.tables.clone(),
            tables_ex: self.tables_ex.clone(),
        };
        let tables = introspector.introspect(&filter).unwrap_or_exit();

        let generator =
            DaoGenerator::new(&tables, &config, &self.remove_prefix, &self.import_prefix);
        if self.dry_run {
            report_preview(&generator.preview());
            return Ok(());
        }

        report(&generator.generate(&self.out));
        Ok(())
    }
}
