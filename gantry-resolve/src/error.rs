use miette::Diagnostic;
use thiserror::Error;

/// Errors raised during composition and contract resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    #[error("composition cycle between types: {}", cycle.join(" -> "))]
    #[diagnostic(
        code(gantry::composition_cycle),
        help("extend edges must form a directed acyclic graph; break the cycle by removing one gen:\"extend\" tag")
    )]
    CompositionCycle { cycle: Vec<String> },

    #[error(
        "conflicting result types for method '{method}' promoted into '{type_name}': '{first_source}' and '{second_source}' disagree"
    )]
    #[diagnostic(
        code(gantry::result_type_conflict),
        help("declare the method directly on '{type_name}' to pick one signature, or align the composed declarations")
    )]
    ResultTypeConflict {
        type_name: String,
        method: String,
        first_source: String,
        second_source: String,
    },
}
