//! Independent checks of a computed cover.
//!
//! Used as the oracle in tests and by `cliquecover --validate`. Nothing here
//! depends on how the cover was produced.

use crate::graph::{CompatibilityGraph, VertexId};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// First property a cover was found to violate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoverViolation {
    /// A clique without members.
    #[error("clique {clique} is empty")]
    EmptyClique {
        /// Index of the clique.
        clique: usize,
    },
    /// A handle outside the graph.
    #[error("clique {clique} references unknown vertex {vertex}")]
    UnknownVertex {
        /// Index of the clique.
        clique: usize,
        /// Offending handle index.
        vertex: usize,
    },
    /// A vertex placed in two cliques.
    #[error("vertex `{label}` appears in cliques {first} and {second}")]
    Overlap {
        /// Label of the vertex.
        label: String,
        /// First clique containing it.
        first: usize,
        /// Second clique containing it.
        second: usize,
    },
    /// A vertex placed in no clique.
    #[error("vertex `{label}` is not covered")]
    Uncovered {
        /// Label of the vertex.
        label: String,
    },
    /// Two members of one clique are not compatible.
    #[error("clique {clique} joins incompatible vertices `{a}` and `{b}`")]
    NotAClique {
        /// Index of the clique.
        clique: usize,
        /// Label of the first vertex.
        a: String,
        /// Label of the second vertex.
        b: String,
    },
    /// Two members of one subpartition share a clique.
    #[error("clique {clique} holds `{a}` and `{b}` from subpartition {group}")]
    SharedSubpartition {
        /// Index of the clique.
        clique: usize,
        /// Subpartition id.
        group: usize,
        /// Label of the first vertex.
        a: String,
        /// Label of the second vertex.
        b: String,
    },
}

// ============================================================================
// Public API
// ============================================================================

/// Checks that `cliques` partitions the vertices of `graph` into cliques.
///
/// With `subpartitions`, additionally checks that no clique holds two members of
/// the same group.
///
/// # Errors
/// Returns the first [`CoverViolation`] found, scanning cliques in order.
pub fn validate_cover<V: Clone + Ord>(
    graph: &CompatibilityGraph<V>,
    cliques: &[BTreeSet<VertexId>],
    subpartitions: Option<&BTreeMap<usize, BTreeSet<VertexId>>>,
) -> Result<(), CoverViolation> {
    let n = graph.vertex_count();
    let mut owner: Vec<Option<usize>> = vec![None; n];

    for (ci, clique) in cliques.iter().enumerate() {
        if clique.is_empty() {
            return Err(CoverViolation::EmptyClique { clique: ci });
        }
        for &v in clique {
            if v.index() >= n {
                return Err(CoverViolation::UnknownVertex {
                    clique: ci,
                    vertex: v.index(),
                });
            }
            if let Some(first) = owner[v.index()] {
                return Err(CoverViolation::Overlap {
                    label: graph.label(v).to_string(),
                    first,
                    second: ci,
                });
            }
            owner[v.index()] = Some(ci);
        }
        check_pairwise(graph, ci, clique)?;
    }

    if let Some(v) = owner.iter().position(Option::is_none) {
        return Err(CoverViolation::Uncovered {
            label: graph.label(VertexId(v)).to_string(),
        });
    }

    if let Some(groups) = subpartitions {
        check_subpartitions(graph, cliques, groups)?;
    }
    Ok(())
}

// ============================================================================
// Internal
// ============================================================================

fn check_pairwise<V: Clone + Ord>(
    graph: &CompatibilityGraph<V>,
    ci: usize,
    clique: &BTreeSet<VertexId>,
) -> Result<(), CoverViolation> {
    let members: Vec<VertexId> = clique.iter().copied().collect();
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            if graph.weight(a, b).is_none() {
                return Err(CoverViolation::NotAClique {
                    clique: ci,
                    a: graph.label(a).to_string(),
                    b: graph.label(b).to_string(),
                });
            }
        }
    }
    Ok(())
}

fn check_subpartitions<V: Clone + Ord>(
    graph: &CompatibilityGraph<V>,
    cliques: &[BTreeSet<VertexId>],
    groups: &BTreeMap<usize, BTreeSet<VertexId>>,
) -> Result<(), CoverViolation> {
    for (ci, clique) in cliques.iter().enumerate() {
        for (&group, members) in groups {
            let mut shared = clique.intersection(members);
            if let (Some(&a), Some(&b)) = (shared.next(), shared.next()) {
                return Err(CoverViolation::SharedSubpartition {
                    clique: ci,
                    group,
                    a: graph.label(a).to_string(),
                    b: graph.label(b).to_string(),
                });
            }
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> CompatibilityGraph<u8> {
        let mut g = CompatibilityGraph::default();
        for v in 0..4 {
            g.add_vertex(v, format!("v{v}")).unwrap();
        }
        g.add_edge(&0, &1, 2).unwrap();
        g.add_edge(&1, &2, 2).unwrap();
        g.add_edge(&2, &3, 2).unwrap();
        g
    }

    fn cover(groups: &[&[usize]]) -> Vec<BTreeSet<VertexId>> {
        groups
            .iter()
            .map(|g| g.iter().copied().map(VertexId).collect())
            .collect()
    }

    #[test]
    fn accepts_a_valid_cover() {
        let g = path();
        validate_cover(&g, &cover(&[&[0, 1], &[2, 3]]), None).unwrap();
        validate_cover(&g, &cover(&[&[0], &[1, 2], &[3]]), None).unwrap();
    }

    #[test]
    fn rejects_overlap_and_gaps() {
        let g = path();
        assert_eq!(
            validate_cover(&g, &cover(&[&[0, 1], &[1, 2], &[3]]), None),
            Err(CoverViolation::Overlap { label: "v1".into(), first: 0, second: 1 })
        );
        assert_eq!(
            validate_cover(&g, &cover(&[&[0, 1], &[2]]), None),
            Err(CoverViolation::Uncovered { label: "v3".into() })
        );
        assert_eq!(
            validate_cover(&g, &cover(&[&[0, 1], &[], &[2, 3]]), None),
            Err(CoverViolation::EmptyClique { clique: 1 })
        );
        assert!(matches!(
            validate_cover(&g, &cover(&[&[0, 1, 2, 3, 9]]), None),
            Err(CoverViolation::UnknownVertex { vertex: 9, .. })
        ));
    }

    #[test]
    fn rejects_non_cliques() {
        let g = path();
        let err = validate_cover(&g, &cover(&[&[0, 1, 2], &[3]]), None).unwrap_err();
        assert_eq!(
            err,
            CoverViolation::NotAClique { clique: 0, a: "v0".into(), b: "v2".into() }
        );
        assert!(err.to_string().contains("incompatible"));
    }

    #[test]
    fn rejects_shared_subpartitions() {
        let g = path();
        let groups: BTreeMap<usize, BTreeSet<VertexId>> =
            [(7, [VertexId(2), VertexId(3)].into_iter().collect())].into_iter().collect();
        validate_cover(&g, &cover(&[&[0, 1], &[2], &[3]]), Some(&groups)).unwrap();
        assert!(matches!(
            validate_cover(&g, &cover(&[&[0, 1], &[2, 3]]), Some(&groups)),
            Err(CoverViolation::SharedSubpartition { group: 7, .. })
        ));
    }
}
