//! Common interface over the independent-set solvers.

use crate::cancel::CancelToken;
use crate::error::SolveError;
use crate::graph::{Graph, Vertex};

/// A maximum-independent-set solver over a read-only graph.
///
/// Implementations keep no state between calls, so one solver value may be
/// used from several threads against the same graph.
pub trait Solver<T: Vertex>: Send + Sync {
    /// Short identifier used in run records and logs.
    fn name(&self) -> &'static str;

    /// Returns an independent set of `graph`, or `Err(SolveError::Cancelled)`.
    fn solve(&self, graph: &Graph<T>, cancel: &CancelToken) -> Result<Vec<T>, SolveError>;
}
