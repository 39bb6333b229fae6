//! Bit-flip hill climbing over inclusion vectors.

use crate::cancel::CancelToken;
use crate::error::SolveError;
use crate::graph::{Graph, Vertex};
use crate::iset::{BitSet, ConflictMatrix};
use tracing::debug;

/// Local search parameters.
#[derive(Clone, Debug)]
pub struct LocalSearchConfig {
    /// Maximum number of full sweeps.
    pub max_iterations: usize,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self { max_iterations: 100 }
    }
}

/// Refines `initial` by repeatedly sweeping every position and applying each
/// flip that keeps the set independent and strictly raises its cardinality.
///
/// A sweep that applies nothing ends the search early. The result never has
/// fewer members than `initial`.
///
/// # Errors
///
/// [`SolveError::LengthMismatch`] if `initial.len() != graph.size()`, and
/// [`SolveError::Cancelled`] if `cancel` fires before the search settles.
pub fn local_search<T: Vertex>(
    graph: &Graph<T>,
    initial: &[bool],
    config: &LocalSearchConfig,
    cancel: &CancelToken,
) -> Result<Vec<bool>, SolveError> {
    let n = graph.size();
    if initial.len() != n {
        return Err(SolveError::LengthMismatch {
            expected: n,
            got: initial.len(),
        });
    }

    let conflicts = ConflictMatrix::from_graph(graph);
    let mut current = BitSet::from_bools(initial);
    let mut best = current.len();
    let mut sweeps = 0usize;

    let mut poll = cancel.poller();

    for _ in 0..config.max_iterations {
        if cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }
        sweeps += 1;

        let mut improved = false;
        for v in 0..n {
            if poll.is_cancelled() {
                return Err(SolveError::Cancelled);
            }
            // Dropping a member can only lower the cardinality.
            if current.contains(v) || current.intersects(conflicts.row(v)) {
                continue;
            }
            current.insert(v);
            best += 1;
            improved = true;
        }
        if !improved {
            break;
        }
    }

    debug!(
        vertices = n,
        sweeps,
        from = initial.iter().filter(|&&b| b).count(),
        to = best,
        "local search finished"
    );
    Ok(current.to_bools(n))
}

/// Runs [`local_search`] starting from the vertex set `start`.
pub fn improve<T: Vertex>(
    graph: &Graph<T>,
    start: &[T],
    config: &LocalSearchConfig,
    cancel: &CancelToken,
) -> Result<Vec<T>, SolveError> {
    let refined = local_search(graph, &graph.inclusion_vector(start), config, cancel)?;
    Ok(graph.vertices_of(&refined))
}
