//! The extend-composition graph and its validation.

use indexmap::{IndexMap, IndexSet};

use gantry_source::TypeSymbol;

use crate::error::ResolveError;

/// Directed graph restricted to extend-tagged composition edges between
/// known implementation types.
///
/// Edges pointing at types outside the symbol table are dropped with a
/// warning; an external embedded type has no parsed methods to promote.
pub struct CompositionGraph {
    /// Owner -> extend targets, declaration order preserved.
    edges: IndexMap<String, Vec<String>>,
    warnings: Vec<String>,
}

impl CompositionGraph {
    /// Build the graph from the extracted symbol table.
    pub fn build(symbols: &[TypeSymbol]) -> Self {
        let known: IndexSet<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        let mut edges: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut warnings = Vec::new();

        for symbol in symbols {
            let mut targets = Vec::new();
            for composed in symbol.extends() {
                if known.contains(composed) {
                    targets.push(composed.to_string());
                } else {
                    warnings.push(format!(
                        "type '{}' extends unknown type '{}'; edge ignored",
                        symbol.name, composed
                    ));
                }
            }
            edges.insert(symbol.name.clone(), targets);
        }

        Self { edges, warnings }
    }

    /// Extend targets of a type, in declaration order.
    pub fn extends_of(&self, name: &str) -> &[String] {
        self.edges.get(name).map_or(&[], Vec::as_slice)
    }

    /// Warnings collected while building the graph.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Topologically order the graph, composed types before their owners.
    ///
    /// Cycles are always fatal; they are reported, never auto-broken.
    pub fn topological_order(&self) -> Result<Vec<String>, Box<ResolveError>> {
        // Kahn's algorithm: a node is ready once all its extend targets are
        // emitted.
        let mut pending: IndexMap<&str, usize> = self
            .edges
            .iter()
            .map(|(name, targets)| (name.as_str(), targets.len()))
            .collect();
        let mut dependents: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for (owner, targets) in &self.edges {
            for target in targets {
                dependents
                    .entry(target.as_str())
                    .or_default()
                    .push(owner.as_str());
            }
        }

        let mut ready: Vec<&str> = pending
            .iter()
            .filter(|(_, n)| **n == 0)
            .map(|(name, _)| *name)
            .collect();
        let mut order = Vec::with_capacity(pending.len());

        while let Some(name) = ready.pop() {
            order.push(name.to_string());
            for dependent in dependents.get(name).into_iter().flatten() {
                if let Some(n) = pending.get_mut(dependent) {
                    *n -= 1;
                    if *n == 0 {
                        ready.push(dependent);
                    }
                }
            }
            pending.shift_remove(name);
        }

        if order.len() == self.edges.len() {
            Ok(order)
        } else {
            let mut cycle: Vec<String> = pending
                .iter()
                .filter(|(_, n)| **n > 0)
                .map(|(name, _)| name.to_string())
                .collect();
            cycle.sort();
            Err(Box::new(ResolveError::CompositionCycle { cycle }))
        }
    }
}
