//! Error taxonomy for graph construction and solving.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = CoverError> = std::result::Result<T, E>;

/// Why an edge was refused by [`crate::graph::CompatibilityGraph::add_edge`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidEdgeReason {
    /// Both endpoints are the same vertex.
    SelfLoop,
    /// The weight is outside `[1, max]`.
    WeightOutOfRange {
        /// Offending weight.
        weight: u32,
        /// Largest accepted weight.
        max: u32,
    },
    /// The unordered pair already carries an edge.
    Duplicate,
}

impl std::fmt::Display for InvalidEdgeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidEdgeReason::SelfLoop => write!(f, "self-loops are not allowed"),
            InvalidEdgeReason::WeightOutOfRange { weight, max } => {
                write!(f, "weight {weight} is outside [1, {max}]")
            }
            InvalidEdgeReason::Duplicate => write!(f, "the pair is already connected"),
        }
    }
}

/// Errors raised while building a compatibility graph or solving a cover.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoverError {
    /// The element was already added to the graph.
    #[error("vertex `{label}` was already added")]
    DuplicateVertex {
        /// Label of the rejected vertex.
        label: String,
    },
    /// The edge violates the compatibility-graph invariants.
    #[error("invalid edge {src} -- {dest}: {reason}")]
    InvalidEdge {
        /// Label of the first endpoint.
        src: String,
        /// Label of the second endpoint.
        dest: String,
        /// What is wrong with it.
        reason: InvalidEdgeReason,
    },
    /// An operation referenced an element that was never added.
    #[error("unknown vertex referenced by {context}")]
    UnknownVertex {
        /// Which operation saw the unknown element.
        context: &'static str,
    },
    /// Bipartite matching needs more cliques than the hard upper bound allows.
    #[error("resource binding infeasible: {required} resources needed, at most {max} allowed")]
    ResourceBindingInfeasible {
        /// Number of columns the solver was about to open.
        required: usize,
        /// The hard bound that was hit.
        max: usize,
    },
}
