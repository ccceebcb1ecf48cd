//! Core utilities for the gantry code generator.
//!
//! This crate provides the file reconciliation layer (sentinel-based
//! ownership classification, atomic render-then-write), naming conversions,
//! and the `gantry.toml` override configuration shared by all generators.

mod config;
mod file;
mod naming;

pub use config::{ConfigError, GantryConfig, TypeOverride};
pub use file::{
    FileClass, FileRules, GeneratedFile, Overwrite, SENTINEL, WriteError, WriteResult, classify,
};
pub use naming::{NameCase, to_camel_lower, to_pascal_case, to_snake_case};
