//! Go file rendering and reconciliation.
//!
//! Renders resolved contracts and mapped table layers into Go source files
//! and writes them through the sentinel-aware reconciler in `gantry-core`:
//! machine-owned files are regenerated, scaffolds are created once, foreign
//! files are never clobbered.

mod builder;
mod files;
mod generator;

pub use builder::CodeBuilder;
pub use files::{DaoIndexGo, DaoInternalGo, DoGo, EntityGo, ServiceGo};
pub use generator::{
    ClearResult, DaoGenerator, GenerateResult, ItemFailure, Preview, PreviewFile, ServiceGenerator,
};
