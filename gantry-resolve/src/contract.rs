//! Contract resolution: flattening composed method sets per type.

use indexmap::{IndexMap, IndexSet};

use gantry_source::{MethodSignature, TypeSymbol};

use crate::{error::ResolveError, graph::CompositionGraph};

/// A method in a resolved contract, attributed to the type that declared it.
#[derive(Debug, Clone)]
pub struct ResolvedMethod {
    pub signature: MethodSignature,
    /// Contract name of the declaring type (the owner itself for direct
    /// declarations).
    pub source: String,
}

/// The deduplicated, shadow-resolved method set computed for a type.
///
/// Derived state: recomputed every run, never persisted apart from the
/// generated interface files.
#[derive(Debug, Clone)]
pub struct ResolvedContract {
    pub type_name: String,
    pub methods: Vec<ResolvedMethod>,
}

/// Result of resolving a full symbol table.
#[derive(Debug)]
pub struct ResolveOutcome {
    /// One contract per input type, input order preserved.
    pub contracts: Vec<ResolvedContract>,
    /// Non-fatal diagnostics (e.g. dropped edges to unknown types).
    pub warnings: Vec<String>,
}

/// Resolve every type in the symbol table.
///
/// The merge policy, in precedence order:
/// 1. a method declared directly on the owner shadows any same-identity
///    method reachable through composition;
/// 2. among composed types, breadth-first order over the extend graph with
///    declaration-order ties: the first contributor wins silently;
/// 3. two composed contributors with the same identity but differing result
///    types are a hard error, never a silent pick.
pub fn resolve(symbols: &[TypeSymbol]) -> Result<ResolveOutcome, Box<ResolveError>> {
    let graph = CompositionGraph::build(symbols);
    // Cycle validation up front; a cyclic graph produces no contracts at all.
    graph.topological_order()?;

    let by_name: IndexMap<&str, &TypeSymbol> = symbols.iter().map(|s| (s.name.as_str(), s)).collect();

    let mut contracts = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        contracts.push(resolve_type(symbol, &by_name, &graph)?);
    }

    Ok(ResolveOutcome {
        contracts,
        warnings: graph.warnings().to_vec(),
    })
}

fn resolve_type(
    owner: &TypeSymbol,
    by_name: &IndexMap<&str, &TypeSymbol>,
    graph: &CompositionGraph,
) -> Result<ResolvedContract, Box<ResolveError>> {
    let mut methods: Vec<ResolvedMethod> = Vec::new();
    let mut seen: IndexMap<(String, Vec<String>), usize> = IndexMap::new();

    // Direct declarations first; they always win.
    for method in &owner.methods {
        if !method.is_exported() {
            continue;
        }
        let identity = method.identity();
        if seen.contains_key(&identity) {
            // Duplicate direct declaration surface; first one stands.
            continue;
        }
        seen.insert(identity, methods.len());
        methods.push(ResolvedMethod {
            signature: method.clone(),
            source: owner.name.clone(),
        });
    }

    // Breadth-first collection over extend edges, declaration order per
    // level. `visited` collapses diamonds to their first encounter.
    let mut queue: Vec<&str> = graph.extends_of(&owner.name).iter().map(String::as_str).collect();
    let mut visited: IndexSet<&str> = queue.iter().copied().collect();
    let mut cursor = 0;

    while cursor < queue.len() {
        let current = queue[cursor];
        cursor += 1;

        let Some(composed) = by_name.get(current) else {
            continue;
        };

        for method in &composed.methods {
            if !method.is_exported() {
                continue;
            }
            let identity = method.identity();
            match seen.get(&identity) {
                None => {
                    seen.insert(identity, methods.len());
                    methods.push(ResolvedMethod {
                        signature: method.clone(),
                        source: composed.name.clone(),
                    });
                }
                Some(&existing_idx) => {
                    let existing = &methods[existing_idx];
                    // Shadowed by the owner: silent, regardless of results.
                    if existing.source == owner.name {
                        continue;
                    }
                    // Same identity from two composed sources: silent only
                    // when the result types agree.
                    if existing.signature.results != method.results {
                        return Err(Box::new(ResolveError::ResultTypeConflict {
                            type_name: owner.name.clone(),
                            method: method.name.clone(),
                            first_source: existing.source.clone(),
                            second_source: composed.name.clone(),
                        }));
                    }
                }
            }
        }

        for next in graph.extends_of(current) {
            if visited.insert(next.as_str()) {
                queue.push(next.as_str());
            }
        }
    }

    Ok(ResolvedContract {
        type_name: owner.name.clone(),
        methods,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use gantry_source::{CompositionEdge, EdgeKind, Param, Visibility};

    use super::*;

    fn method(name: &str, param_tys: &[&str], results: &[&str]) -> MethodSignature {
        MethodSignature {
            name: name.to_string(),
            params: param_tys
                .iter()
                .map(|ty| Param {
                    name: "v".to_string(),
                    ty: ty.to_string(),
                })
                .collect(),
            results: results.iter().map(|s| s.to_string()).collect(),
            visibility: if name.chars().next().is_some_and(char::is_uppercase) {
                Visibility::Exported
            } else {
                Visibility::Unexported
            },
        }
    }

    fn symbol(name: &str, extends: &[&str], methods: Vec<MethodSignature>) -> TypeSymbol {
        TypeSymbol {
            name: name.to_string(),
            source_path: PathBuf::from("test.go"),
            methods,
            compositions: extends
                .iter()
                .map(|e| CompositionEdge {
                    owner: name.to_string(),
                    composed: e.to_string(),
                    kind: EdgeKind::Extend,
                })
                .collect(),
            tags: Default::default(),
        }
    }

    fn contract<'a>(outcome: &'a ResolveOutcome, name: &str) -> &'a ResolvedContract {
        outcome
            .contracts
            .iter()
            .find(|c| c.type_name == name)
            .unwrap()
    }

    #[test]
    fn test_first_declared_composed_type_wins_ties() {
        // A extends B then C; both declare M with identical identity and
        // results. B wins silently.
        let symbols = vec![
            symbol("A", &["B", "C"], vec![]),
            symbol("B", &[], vec![method("M", &["int64"], &["error"])]),
            symbol("C", &[], vec![method("M", &["int64"], &["error"])]),
        ];
        let outcome = resolve(&symbols).unwrap();
        let a = contract(&outcome, "A");
        assert_eq!(a.methods.len(), 1);
        assert_eq!(a.methods[0].source, "B");
    }

    #[test]
    fn test_owner_declaration_shadows_composed() {
        let symbols = vec![
            symbol(
                "A",
                &["B"],
                vec![method("M", &["int64"], &["*entity.A", "error"])],
            ),
            symbol("B", &[], vec![method("M", &["int64"], &["error"])]),
        ];
        let outcome = resolve(&symbols).unwrap();
        let a = contract(&outcome, "A");
        assert_eq!(a.methods.len(), 1);
        assert_eq!(a.methods[0].source, "A");
        assert_eq!(
            a.methods[0].signature.results,
            vec!["*entity.A".to_string(), "error".to_string()]
        );
    }

    #[test]
    fn test_multi_level_promotion_is_flattened() {
        let symbols = vec![
            symbol("A", &["B"], vec![method("Own", &[], &["error"])]),
            symbol("B", &["C"], vec![method("Mid", &[], &["error"])]),
            symbol("C", &[], vec![method("Deep", &[], &["error"])]),
        ];
        let outcome = resolve(&symbols).unwrap();
        let a = contract(&outcome, "A");
        let names: Vec<&str> = a.methods.iter().map(|m| m.signature.name.as_str()).collect();
        assert_eq!(names, vec!["Own", "Mid", "Deep"]);
    }

    #[test]
    fn test_closer_level_beats_deeper_level() {
        // A extends [B, C]; B extends [D]. BFS visits B, C, D — so C's M
        // beats D's even though B was declared first.
        let symbols = vec![
            symbol("A", &["B", "C"], vec![]),
            symbol("B", &["D"], vec![]),
            symbol("C", &[], vec![method("M", &[], &["error"])]),
            symbol("D", &[], vec![method("M", &[], &["error"])]),
        ];
        let outcome = resolve(&symbols).unwrap();
        let a = contract(&outcome, "A");
        assert_eq!(a.methods.len(), 1);
        assert_eq!(a.methods[0].source, "C");
    }

    #[test]
    fn test_result_type_conflict_is_an_error() {
        let symbols = vec![
            symbol("A", &["B", "C"], vec![]),
            symbol("B", &[], vec![method("M", &["int64"], &["error"])]),
            symbol("C", &[], vec![method("M", &["int64"], &["string"])]),
        ];
        let err = resolve(&symbols).unwrap_err();
        match *err {
            ResolveError::ResultTypeConflict {
                type_name,
                method,
                first_source,
                second_source,
            } => {
                assert_eq!(type_name, "A");
                assert_eq!(method, "M");
                assert_eq!(first_source, "B");
                assert_eq!(second_source, "C");
            }
            other => panic!("expected result type conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_differing_param_types_are_distinct_methods() {
        let symbols = vec![
            symbol("A", &["B", "C"], vec![]),
            symbol("B", &[], vec![method("M", &["int64"], &["error"])]),
            symbol("C", &[], vec![method("M", &["string"], &["error"])]),
        ];
        let outcome = resolve(&symbols).unwrap();
        assert_eq!(contract(&outcome, "A").methods.len(), 2);
    }

    #[test]
    fn test_unexported_methods_never_promoted() {
        let symbols = vec![
            symbol("A", &["B"], vec![method("visible", &[], &[])]),
            symbol("B", &[], vec![method("hidden", &[], &[])]),
        ];
        let outcome = resolve(&symbols).unwrap();
        assert!(contract(&outcome, "A").methods.is_empty());
    }

    #[test]
    fn test_cycle_produces_no_contracts() {
        let symbols = vec![
            symbol("A", &["B"], vec![method("M", &[], &[])]),
            symbol("B", &["A"], vec![method("N", &[], &[])]),
        ];
        let err = resolve(&symbols).unwrap_err();
        assert!(matches!(*err, ResolveError::CompositionCycle { .. }));
    }

    #[test]
    fn test_diamond_contributes_once() {
        let symbols = vec![
            symbol("Top", &["Left", "Right"], vec![]),
            symbol("Left", &["Base"], vec![]),
            symbol("Right", &["Base"], vec![]),
            symbol("Base", &[], vec![method("M", &[], &["error"])]),
        ];
        let outcome = resolve(&symbols).unwrap();
        let top = contract(&outcome, "Top");
        assert_eq!(top.methods.len(), 1);
        assert_eq!(top.methods[0].source, "Base");
    }
}
