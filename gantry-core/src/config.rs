//! The `gantry.toml` override configuration.
//!
//! Carries the user-supplied type override map consumed by the schema
//! type mapper:
//!
//! ```toml
//! [type_mapping.decimal]
//! type = "string"
//!
//! [field_mapping."user.balance"]
//! type = "float64"
//! ```

use std::{path::Path, str::FromStr};

use indexmap::IndexMap;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Deserialize;
use thiserror::Error;

/// A single user override: the target Go type and an optional import path
/// the generated file must carry for it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TypeOverride {
    #[serde(rename = "type")]
    pub go_type: String,
    #[serde(default)]
    pub import: Option<String>,
}

/// Parsed `gantry.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GantryConfig {
    /// Native type name -> override, applied to every table.
    #[serde(default)]
    pub type_mapping: IndexMap<String, TypeOverride>,
    /// `table.column` -> override, takes precedence over `type_mapping`.
    #[serde(default)]
    pub field_mapping: IndexMap<String, TypeOverride>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse gantry.toml")]
    #[diagnostic(code(gantry::config_parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },
}

impl GantryConfig {
    /// Load configuration from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<ConfigError>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_config(&content, &path.display().to_string())
    }

    /// Look up a field-level override for `table.column`.
    pub fn field_override(&self, table: &str, column: &str) -> Option<&TypeOverride> {
        self.field_mapping.get(&format!("{}.{}", table, column))
    }

    /// Look up a type-level override for a native type name.
    pub fn type_override(&self, native_type: &str) -> Option<&TypeOverride> {
        self.type_mapping.get(native_type)
    }
}

impl FromStr for GantryConfig {
    type Err = Box<ConfigError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_config(s, "gantry.toml")
    }
}

fn parse_config(content: &str, filename: &str) -> Result<GantryConfig, Box<ConfigError>> {
    toml::from_str(content).map_err(|e| {
        let span = e.span().map(SourceSpan::from);
        Box::new(ConfigError::Parse {
            src: NamedSource::new(filename, content.to_string()),
            span,
            source: e,
        })
    })
}
