use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors raised while extracting the declaration surface of a source tree.
#[derive(Debug, Error, Diagnostic)]
pub enum ExtractionError {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("check that the source folder exists and is readable"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid struct name pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unsupported declaration: {message}")]
    #[diagnostic(
        code(gantry::unsupported_construct),
        help("the extractor only understands plain fields, embedded types, and method declarations")
    )]
    UnsupportedConstruct {
        #[source_code]
        src: NamedSource<String>,
        #[label("cannot classify this declaration")]
        span: SourceSpan,
        message: String,
    },
}

impl ExtractionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(ExtractionError::Io {
            path: path.into(),
            source,
        })
    }

    pub fn unsupported(
        src: &str,
        filename: &str,
        span: impl Into<SourceSpan>,
        message: impl Into<String>,
    ) -> Box<Self> {
        Box::new(ExtractionError::UnsupportedConstruct {
            src: NamedSource::new(filename, src.to_string()),
            span: span.into(),
            message: message.into(),
        })
    }
}
