//! Composition and interface resolution.
//!
//! Takes the symbol table built by `gantry-source`, validates the
//! extend-composition graph, and flattens each type's reachable method set
//! into a deduplicated, shadow-resolved contract suitable for interface
//! synthesis.

mod contract;
mod error;
mod graph;

pub use contract::{ResolveOutcome, ResolvedContract, ResolvedMethod, resolve};
pub use error::ResolveError;
pub use graph::CompositionGraph;
