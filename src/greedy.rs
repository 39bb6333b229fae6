//! Minimum-residual-degree greedy heuristic.
//!
//! Repeatedly takes a vertex of minimum degree among the vertices still alive,
//! breaking ties uniformly at random, then kills it and its neighbors. The
//! result is a maximal independent set; it carries no optimality guarantee.

use crate::cancel::CancelToken;
use crate::error::SolveError;
use crate::graph::{Graph, Vertex};
use crate::iset::{BitSet, ConflictMatrix};
use crate::solver::Solver;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Greedy solver parameters.
#[derive(Clone, Debug, Default)]
pub struct GreedyConfig {
    /// Seed for the tie-break RNG; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl GreedyConfig {
    /// Returns the tie-break RNG described by this config.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

/// Runs the greedy heuristic with tie-breaks drawn from `rng`.
///
/// Vertices are returned in selection order. Returns `Err(SolveError::Cancelled)`
/// if `cancel` fires between rounds.
pub fn mis_greedy_with_rng<T: Vertex, R: Rng>(
    graph: &Graph<T>,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<Vec<T>, SolveError> {
    let n = graph.size();
    if n == 0 {
        return Ok(Vec::new());
    }

    let conflicts = ConflictMatrix::from_graph(graph);
    let mut alive = BitSet::full(n);
    let mut chosen = Vec::new();
    let mut ties = Vec::with_capacity(n);

    while !alive.is_empty() {
        if cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }

        let mut best_degree = usize::MAX;
        ties.clear();
        for v in alive.iter() {
            let degree = conflicts.degree_within(v, &alive);
            if degree < best_degree {
                best_degree = degree;
                ties.clear();
                ties.push(v);
            } else if degree == best_degree {
                ties.push(v);
            }
        }

        let v = ties[rng.random_range(0..ties.len())];
        chosen.push(v);
        alive.remove(v);
        alive.subtract(conflicts.row(v));
    }

    debug!(vertices = n, cardinality = chosen.len(), "greedy search finished");
    Ok(chosen
        .into_iter()
        .filter_map(|i| graph.vertex_at(i).cloned())
        .collect())
}

/// Runs the greedy heuristic using the RNG described by `config`.
pub fn mis_greedy<T: Vertex>(
    graph: &Graph<T>,
    config: &GreedyConfig,
    cancel: &CancelToken,
) -> Result<Vec<T>, SolveError> {
    mis_greedy_with_rng(graph, &mut config.rng(), cancel)
}

/// [`Solver`] adapter for [`mis_greedy`].
#[derive(Clone, Debug, Default)]
pub struct Greedy {
    /// Tie-break parameters.
    pub config: GreedyConfig,
}

impl Greedy {
    /// Creates the solver with `config`.
    pub fn new(config: GreedyConfig) -> Self {
        Self { config }
    }
}

impl<T: Vertex> Solver<T> for Greedy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(&self, graph: &Graph<T>, cancel: &CancelToken) -> Result<Vec<T>, SolveError> {
        mis_greedy(graph, &self.config, cancel)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iset::{is_independent, is_maximal};
    use crate::maghout::{mis_maghout, MaghoutConfig};
    use rand::RngCore;
    use rand_xorshift::XorShiftRng;

    /// Tie-break source that cancels `token` as soon as it is drawn from.
    struct CancellingRng<'a> {
        inner: XorShiftRng,
        token: &'a CancelToken,
    }

    impl RngCore for CancellingRng<'_> {
        fn next_u32(&mut self) -> u32 {
            self.token.cancel();
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.token.cancel();
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            self.token.cancel();
            self.inner.fill_bytes(dst);
        }
    }

    fn random_graph(rng: &mut XorShiftRng, n: u32, p: f64) -> Graph<u32> {
        let mut g = Graph::undirected();
        for v in 0..n {
            g.add_vertex(v);
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.random_bool(p) {
                    g.add_edge(i, j);
                }
            }
        }
        g
    }

    #[test]
    fn greedy_returns_maximal_independent_sets() {
        let mut rng = XorShiftRng::seed_from_u64(0xBCDE);
        let cancel = CancelToken::new();
        for _ in 0..40 {
            let g = random_graph(&mut rng, 30, 0.2);
            let set = mis_greedy_with_rng(&g, &mut rng, &cancel).unwrap();
            assert!(is_independent(&g, &set));
            assert!(is_maximal(&g, &set));
        }
    }

    #[test]
    fn exact_dominates_greedy() {
        let mut rng = XorShiftRng::seed_from_u64(0xAAAA);
        let cancel = CancelToken::new();
        for _ in 0..15 {
            let g = random_graph(&mut rng, 14, 0.3);
            let greedy = mis_greedy_with_rng(&g, &mut rng, &cancel).unwrap();
            let exact = mis_maghout(&g, &MaghoutConfig::with_depth(4), &cancel).unwrap();
            assert!(exact.len() >= greedy.len());
        }
    }

    #[test]
    fn four_cycle_is_maximal_with_two_vertices() {
        let g = Graph::undirected_from_edges([(1u32, 2), (2, 3), (3, 4), (4, 1)]);
        let mut rng = XorShiftRng::seed_from_u64(3);
        let set = mis_greedy_with_rng(&g, &mut rng, &CancelToken::new()).unwrap();
        assert!(set.len() >= 2);
        assert!(is_maximal(&g, &set));
    }

    #[test]
    fn star_prefers_leaves() {
        let g = Graph::undirected_from_edges((1u32..=6).map(|leaf| (0, leaf)));
        let mut set = mis_greedy(&g, &GreedyConfig { seed: Some(9) }, &CancelToken::new()).unwrap();
        set.sort_unstable();
        assert_eq!(set, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut rng = XorShiftRng::seed_from_u64(11);
        let g = random_graph(&mut rng, 40, 0.15);
        let cfg = GreedyConfig { seed: Some(42) };
        let cancel = CancelToken::new();
        assert_eq!(mis_greedy(&g, &cfg, &cancel), mis_greedy(&g, &cfg, &cancel));
    }

    #[test]
    fn empty_graph_and_cancellation() {
        let cancel = CancelToken::new();
        let empty = Graph::<u32>::undirected();
        assert_eq!(mis_greedy(&empty, &GreedyConfig::default(), &cancel), Ok(vec![]));

        let g = Graph::undirected_from_edges([(1u32, 2)]);
        cancel.cancel();
        assert_eq!(
            mis_greedy(&g, &GreedyConfig::default(), &cancel),
            Err(SolveError::Cancelled)
        );
    }

    #[test]
    fn cancel_between_rounds_discards_partial_set() {
        let mut g = Graph::<u32>::undirected();
        for v in 0..10 {
            g.add_vertex(v);
        }
        let cancel = CancelToken::new();
        let mut rng = CancellingRng {
            inner: XorShiftRng::seed_from_u64(4),
            token: &cancel,
        };
        assert!(!cancel.is_cancelled());
        assert_eq!(
            mis_greedy_with_rng(&g, &mut rng, &cancel),
            Err(SolveError::Cancelled)
        );
    }

    #[test]
    fn directed_graph_is_treated_symmetrically() {
        let mut g = Graph::<u32>::directed();
        g.add_edge(1, 2);
        g.add_edge(3, 2);
        let set = mis_greedy(&g, &GreedyConfig { seed: Some(1) }, &CancelToken::new()).unwrap();
        assert!(is_maximal(&g, &set));
        assert!(!set.contains(&2));
    }
}
