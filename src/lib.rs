//! # Clique Covering Engine
//!
//! Weighted clique covering for high-level-synthesis binding.
//!
//! Operations (or variables) that may share one functional unit (or register)
//! form a *compatibility graph*; edge weights say how much sharing a pair is
//! worth. Partitioning the vertices into cliques binds every clique to one
//! resource. This crate provides:
//! - A compatibility graph with weight levels and Graphviz export.
//! - Coloring, branch-and-bound maximum-weight clique (TTT), greedy merge (TS),
//!   randomized multi-start (RTS) and bipartite-matching strategies.
//! - Weight-level refinement that merges the most profitable pairs first.
//! - Caller hooks ([`filter::FilterClique`], [`filter::CheckClique`]) that veto
//!   or price cliques, with a slack/multiplexer-aware pair of implementations.
//!
//! ## Quick Start
//!
//! ```
//! use cliquecover::prelude::*;
//! use std::collections::BTreeSet;
//!
//! let mut cc = CliqueCovering::new(Algorithm::Ttt, 4);
//! for op in ["a", "b", "c", "d"] {
//!     cc.add_vertex(op, op).unwrap();
//! }
//! cc.add_edge(&"a", &"b", 5).unwrap();
//! cc.add_edge(&"a", &"c", 5).unwrap();
//! cc.add_edge(&"b", &"c", 3).unwrap();
//! cc.add_edge(&"c", &"d", 2).unwrap();
//!
//! cc.exec(&NoFilter, &mut NoCheck).unwrap();
//! assert_eq!(cc.num_vertices(), 2);
//! assert_eq!(cc.get_clique(0), Some(BTreeSet::from(["a", "b", "c"])));
//! assert_eq!(cc.get_clique(1), Some(BTreeSet::from(["d"])));
//! ```
//!
//! ## Exclusivity Groups and Bounds
//!
//! ```
//! use cliquecover::prelude::*;
//!
//! let mut cc = CliqueCovering::new(Algorithm::Bipartite, 4);
//! for v in 0..4u32 {
//!     cc.add_vertex(v, format!("op{v}")).unwrap();
//! }
//! for (a, b) in [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)] {
//!     cc.add_edge(&a, &b, 4).unwrap();
//! }
//! // 0 and 1 run in the same cycle; so do 2 and 3.
//! for v in 0..4u32 {
//!     cc.add_subpartition((v / 2) as usize, &v).unwrap();
//! }
//! cc.max_resources(2);
//! cc.exec(&NoFilter, &mut NoCheck).unwrap();
//! validate_cover(cc.graph(), cc.cliques(), Some(cc.subpartitions())).unwrap();
//! assert_eq!(cc.num_vertices(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: Compatibility graph, weight-level views and DOT export.
//! - [`covering`]: The solver and its strategies.
//! - [`filter`]: Clique filter/check hooks.
//! - [`validate`]: Independent cover validation.
//! - [`parse`]: Text problem format used by the `cliquecover` binary.
//! - [`batch`]: Parallel solving of independent instances.
//!
//! ## Logging
//!
//! Progress is reported through the `log` facade: `debug!` per refinement level
//! and peeled clique, `info!` per solve, `warn!` on resource-bound overruns.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)] // Often clearer for matrix indexing
#![allow(clippy::doc_markdown)]
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod assignment;
pub mod batch;
pub mod coloring;
pub mod covering;
pub mod disjoint_set;
pub mod error;
pub mod filter;
pub mod graph;
pub mod parse;
pub mod validate;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::batch::exec_all;
    pub use crate::covering::{Algorithm, CliqueCovering, CoveringConfig, ResourceBounds};
    pub use crate::error::{CoverError, InvalidEdgeReason};
    pub use crate::filter::{
        CheckClique, FilterClique, MuxModel, NoCheck, NoFilter, OperationTiming, SlackAwareCheck,
        SlackBasedFilter,
    };
    pub use crate::graph::{CompatibilityGraph, MAX_EDGE_WEIGHT, VertexId};
    pub use crate::parse::{load_problem, parse_problem, ParseError};
    pub use crate::validate::{validate_cover, CoverViolation};
}
