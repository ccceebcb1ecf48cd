//! Source model extraction for the gantry generator.
//!
//! Parses the declaration surface of a Go source tree — implementation
//! structs, their method signatures, and embedded-type composition edges —
//! into a normalized symbol table. No type checking and no execution: only
//! the surface needed to synthesize service interfaces.

mod error;
mod extract;
mod symbol;

pub use error::ExtractionError;
pub use extract::Extractor;
pub use symbol::{CompositionEdge, EdgeKind, MethodSignature, Param, TypeSymbol, Visibility};
