//! # graphmis
//!
//! A graph store with lazily maintained matrix caches, and a family of
//! maximum independent set solvers that run against it.
//!
//! This crate provides:
//! - [`Graph<T>`](graph::Graph): directed or undirected graphs over any hashable
//!   vertex type, with an adjacency matrix and optional weight matrix kept in
//!   lockstep with the adjacency lists once built.
//! - An **exact** solver (branch-and-bound over inclusion bit-vectors, fanned
//!   out over rayon by fixing a prefix of the decision vector).
//! - A minimum-residual-degree **greedy** heuristic and a bit-flip **local
//!   search** refinement.
//! - An F1 metric and a comparison driver grading heuristics against the exact answer.
//!
//! ## Quick Start
//!
//! ```
//! use graphmis::prelude::*;
//!
//! let g = Graph::undirected_from_edges([(1u32, 2), (2, 3), (3, 4), (4, 1)]);
//! let cancel = CancelToken::new();
//!
//! let exact = mis_maghout(&g, &MaghoutConfig::default(), &cancel).unwrap();
//! assert_eq!(exact.len(), 2);
//!
//! let greedy = mis_greedy(&g, &GreedyConfig { seed: Some(1) }, &cancel).unwrap();
//! assert!(is_maximal(&g, &greedy));
//! assert_eq!(f1_score(&exact, &exact), 1.0);
//! ```
//!
//! ## Text Format
//!
//! ```
//! use graphmis::graph::Graph;
//!
//! let g: Graph<u32> = Graph::from_dot("digraph {\n  1 -> 2 [weight=3];\n}").unwrap();
//! assert_eq!(g.weight(&1, &2), Some(3.0));
//! assert!(g.to_dot().contains("1 -> 2 [weight=3];"));
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: Graph store, edge type, loop and cycle queries.
//! - [`matrix`]: Bit and weight matrices backing the caches.
//! - [`dot`]: Text rendering, parsing, and file import/export.
//! - [`iset`]: Conflict relation and independence checks.
//! - [`maghout`]: Exact parallel search.
//! - [`greedy`]: Greedy heuristic.
//! - [`local_search`]: Hill-climbing refinement.
//! - [`metric`]: F1 score.
//! - [`compare`]: Exact-versus-heuristic comparison runs.
//!
//! ## Performance Notes
//!
//! - The exact search is exponential and meant for graphs of a few dozen vertices.
//! - Solvers read the adjacency matrix only; build it once with
//!   [`Graph::adjacency_matrix`](graph::Graph::adjacency_matrix) before sharing a
//!   graph between threads to avoid concurrent initialization.

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
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::float_cmp)] // Weights are compared against an exact sentinel
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod cancel;
pub mod compare;
pub mod dot;
pub mod error;
pub mod graph;
pub mod greedy;
pub mod iset;
pub mod local_search;
pub mod maghout;
pub mod matrix;
pub mod metric;
pub mod solver;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::cancel::CancelToken;
    pub use crate::compare::{run_comparison, summarize, CompareConfig, Method, RunRecord};
    pub use crate::dot::load_from_dot;
    pub use crate::error::{DotError, GraphError, SolveError};
    pub use crate::graph::{Edge, Graph, GraphType, Vertex, NO_WEIGHT};
    pub use crate::greedy::{mis_greedy, Greedy, GreedyConfig};
    pub use crate::iset::{cardinality, is_independent, is_maximal};
    pub use crate::local_search::{improve, local_search, LocalSearchConfig};
    pub use crate::maghout::{mis_maghout, Maghout, MaghoutConfig};
    pub use crate::metric::f1_score;
    pub use crate::solver::Solver;
}
