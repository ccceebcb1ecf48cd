//! The normalized symbol model produced by extraction.

use std::path::PathBuf;

use indexmap::IndexMap;

/// Whether a method is part of the public surface of its type.
///
/// Derived purely from the first-character casing convention of the method
/// name; unexported methods never reach contract synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Exported,
    Unexported,
}

/// A single named parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

/// A parsed method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<Param>,
    pub results: Vec<String>,
    pub visibility: Visibility,
}

impl MethodSignature {
    /// Identity for deduplication: method name plus parameter-type sequence.
    /// Result types are deliberately excluded, matching override semantics.
    pub fn identity(&self) -> (String, Vec<String>) {
        (
            self.name.clone(),
            self.params.iter().map(|p| p.ty.clone()).collect(),
        )
    }

    pub fn is_exported(&self) -> bool {
        self.visibility == Visibility::Exported
    }

    /// Render the signature as a Go interface method head.
    pub fn render(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| {
                if p.name.is_empty() {
                    p.ty.clone()
                } else {
                    format!("{} {}", p.name, p.ty)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        match self.results.len() {
            0 => format!("{}({})", self.name, params),
            1 => format!("{}({}) {}", self.name, params, self.results[0]),
            _ => format!("{}({}) ({})", self.name, params, self.results.join(", ")),
        }
    }
}

/// How a composed type participates in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Promote the composed type's contract methods into the owner.
    Extend,
    /// Plain containment; never contributes methods.
    Contain,
}

/// A declared composition relationship between two implementation types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionEdge {
    pub owner: String,
    pub composed: String,
    pub kind: EdgeKind,
}

/// One implementation type's declaration set, normalized.
///
/// Immutable once built for a run; methods and compositions preserve
/// declaration order, which the resolver's tie-break depends on.
#[derive(Debug, Clone)]
pub struct TypeSymbol {
    /// Contract name, e.g. `User` for implementation struct `sUser`.
    pub name: String,
    pub source_path: PathBuf,
    pub methods: Vec<MethodSignature>,
    pub compositions: Vec<CompositionEdge>,
    pub tags: IndexMap<String, String>,
}

impl TypeSymbol {
    /// Extend-tagged composition targets, in declaration order.
    pub fn extends(&self) -> impl Iterator<Item = &str> {
        self.compositions
            .iter()
            .filter(|e| e.kind == EdgeKind::Extend)
            .map(|e| e.composed.as_str())
    }
}
