//! Repeated exact-versus-heuristic runs.
//!
//! Each run solves the graph exactly, then solves it again with the greedy
//! heuristic (optionally refined by local search) and grades every answer with
//! [`f1_score`] against the exact one.

use crate::cancel::CancelToken;
use crate::error::SolveError;
use crate::graph::{Graph, Vertex};
use crate::greedy::{Greedy, GreedyConfig};
use crate::local_search::{improve, LocalSearchConfig};
use crate::maghout::{Maghout, MaghoutConfig};
use crate::metric::f1_score;
use crate::solver::Solver;
use std::fmt;
use std::time::Instant;
use tracing::info;

/// Which solver produced a [`RunRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// Exact branch-and-bound search; the reference answer.
    Exact,
    /// Minimum-residual-degree greedy.
    Greedy,
    /// Greedy followed by local search.
    LocalSearch,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Exact => "exact",
            Method::Greedy => "greedy",
            Method::LocalSearch => "greedy+local",
        })
    }
}

/// Parameters of a comparison session.
#[derive(Clone, Debug)]
pub struct CompareConfig {
    /// Number of runs.
    pub runs: usize,
    /// Exact solver parameters.
    pub maghout: MaghoutConfig,
    /// Greedy parameters. A fixed seed is mixed with the run id so runs differ
    /// but the session is reproducible.
    pub greedy: GreedyConfig,
    /// If set, every greedy answer is also refined by local search.
    pub local_search: Option<LocalSearchConfig>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            runs: 1,
            maghout: MaghoutConfig::default(),
            greedy: GreedyConfig::default(),
            local_search: Some(LocalSearchConfig::default()),
        }
    }
}

/// One solver answer within a run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunRecord<T> {
    /// 1-based run number.
    pub run_id: usize,
    /// Producing solver.
    pub method: Method,
    /// Wall time in nanoseconds; local search includes its greedy start.
    pub elapsed_ns: u128,
    /// F1 score against the exact answer of the same run.
    pub f1: f64,
    /// Size of the answer.
    pub cardinality: usize,
    /// The answer itself.
    pub solution: Vec<T>,
}

/// Averages over all records of one method.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodSummary {
    /// Summarized solver.
    pub method: Method,
    /// Number of records.
    pub runs: usize,
    /// Mean F1 score.
    pub mean_f1: f64,
    /// Mean cardinality.
    pub mean_cardinality: f64,
    /// Mean wall time in nanoseconds.
    pub mean_elapsed_ns: f64,
}

/// Runs `config.runs` comparison rounds on `graph`.
///
/// Records come out grouped by run, the exact answer first. Any cancellation
/// discards the whole session.
pub fn run_comparison<T: Vertex>(
    graph: &Graph<T>,
    config: &CompareConfig,
    cancel: &CancelToken,
) -> Result<Vec<RunRecord<T>>, SolveError> {
    let exact = Maghout::new(config.maghout.clone());
    let mut records = Vec::with_capacity(config.runs * 3);

    for run_id in 1..=config.runs {
        let start = Instant::now();
        let reference = exact.solve(graph, cancel)?;
        let exact_ns = start.elapsed().as_nanos();

        let greedy = Greedy::new(GreedyConfig {
            seed: config
                .greedy
                .seed
                .map(|s| splitmix64(s ^ run_id as u64)),
        });
        let start = Instant::now();
        let heuristic = greedy.solve(graph, cancel)?;
        let greedy_ns = start.elapsed().as_nanos();

        let refined = match &config.local_search {
            Some(ls) => {
                let start = Instant::now();
                let refined = improve(graph, &heuristic, ls, cancel)?;
                Some((refined, greedy_ns + start.elapsed().as_nanos()))
            }
            None => None,
        };

        info!(
            run_id,
            exact = reference.len(),
            greedy = heuristic.len(),
            refined = refined.as_ref().map(|(r, _)| r.len()),
            "comparison run finished"
        );

        let exact_record = grade(run_id, Method::Exact, exact_ns, &reference, reference.clone());
        let greedy_record = grade(run_id, Method::Greedy, greedy_ns, &reference, heuristic);
        records.push(exact_record);
        records.push(greedy_record);
        if let Some((solution, ns)) = refined {
            records.push(grade(run_id, Method::LocalSearch, ns, &reference, solution));
        }
    }
    Ok(records)
}

fn grade<T: Vertex>(
    run_id: usize,
    method: Method,
    elapsed_ns: u128,
    reference: &[T],
    solution: Vec<T>,
) -> RunRecord<T> {
    // The empty graph has an empty exact answer; every solver agrees with it.
    let f1 = if reference.is_empty() && solution.is_empty() {
        1.0
    } else {
        f1_score(reference, &solution)
    };
    RunRecord {
        run_id,
        method,
        elapsed_ns,
        f1,
        cardinality: solution.len(),
        solution,
    }
}

/// Collapses `records` into one summary per method, in [`Method`] order.
pub fn summarize<T>(records: &[RunRecord<T>]) -> Vec<MethodSummary> {
    let mut out: Vec<MethodSummary> = Vec::new();
    for method in [Method::Exact, Method::Greedy, Method::LocalSearch] {
        let rows: Vec<&RunRecord<T>> = records.iter().filter(|r| r.method == method).collect();
        if rows.is_empty() {
            continue;
        }
        let k = rows.len() as f64;
        out.push(MethodSummary {
            method,
            runs: rows.len(),
            mean_f1: rows.iter().map(|r| r.f1).sum::<f64>() / k,
            mean_cardinality: rows.iter().map(|r| r.cardinality as f64).sum::<f64>() / k,
            mean_elapsed_ns: rows.iter().map(|r| r.elapsed_ns as f64).sum::<f64>() / k,
        });
    }
    out
}

/// SplitMix64 mixer for deriving per-run seeds from a base seed.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iset::is_independent;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use std::time::Duration;

    fn petersen() -> Graph<u32> {
        let mut edges = Vec::new();
        for i in 0..5 {
            edges.push((i, (i + 1) % 5));
            edges.push((i, i + 5));
            edges.push((i + 5, (i + 2) % 5 + 5));
        }
        Graph::undirected_from_edges(edges)
    }

    #[test]
    fn records_are_grouped_by_run() {
        let g = petersen();
        let cfg = CompareConfig {
            runs: 3,
            greedy: GreedyConfig { seed: Some(7) },
            ..CompareConfig::default()
        };
        let records = run_comparison(&g, &cfg, &CancelToken::new()).unwrap();
        assert_eq!(records.len(), 9);
        for (chunk, run_id) in records.chunks(3).zip(1..) {
            assert_eq!(chunk[0].method, Method::Exact);
            assert_eq!(chunk[1].method, Method::Greedy);
            assert_eq!(chunk[2].method, Method::LocalSearch);
            assert!(chunk.iter().all(|r| r.run_id == run_id));
            assert_eq!(chunk[0].cardinality, 4, "alpha(Petersen) = 4");
            assert_eq!(chunk[0].f1, 1.0);
            for r in chunk {
                assert!(is_independent(&g, &r.solution));
                assert!((0.0..=1.0).contains(&r.f1));
                assert!(r.cardinality <= chunk[0].cardinality);
            }
            assert!(chunk[2].cardinality >= chunk[1].cardinality);
        }
    }

    #[test]
    fn seeded_sessions_repeat() {
        let g = petersen();
        let cfg = CompareConfig {
            runs: 4,
            greedy: GreedyConfig { seed: Some(99) },
            local_search: None,
            ..CompareConfig::default()
        };
        let cancel = CancelToken::new();
        let a = run_comparison(&g, &cfg, &cancel).unwrap();
        let b = run_comparison(&g, &cfg, &cancel).unwrap();
        let solutions = |rs: &[RunRecord<u32>]| rs.iter().map(|r| r.solution.clone()).collect::<Vec<_>>();
        assert_eq!(solutions(&a), solutions(&b));
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn empty_graph_scores_full_agreement() {
        let g = Graph::<u32>::undirected();
        let records = run_comparison(&g, &CompareConfig::default(), &CancelToken::new()).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.cardinality == 0 && r.f1 == 1.0));
    }

    #[test]
    fn cancellation_discards_session() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(
            run_comparison(&petersen(), &CompareConfig::default(), &cancel),
            Err(SolveError::Cancelled)
        );
    }

    #[test]
    fn deadline_during_exact_run_discards_session() {
        let mut rng = XorShiftRng::seed_from_u64(0x7117);
        let mut g = Graph::<u32>::undirected();
        for v in 0..90 {
            g.add_vertex(v);
        }
        for i in 0..90 {
            for j in (i + 1)..90 {
                if rng.random_bool(0.05) {
                    g.add_edge(i, j);
                }
            }
        }
        let cfg = CompareConfig {
            runs: 3,
            maghout: MaghoutConfig::with_depth(4),
            ..CompareConfig::default()
        };
        let cancel = CancelToken::with_timeout(Duration::from_millis(150));
        let start = Instant::now();
        assert_eq!(run_comparison(&g, &cfg, &cancel), Err(SolveError::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(5), "took {:?}", start.elapsed());
    }

    #[test]
    fn summary_averages_per_method() {
        let g = petersen();
        let cfg = CompareConfig {
            runs: 2,
            ..CompareConfig::default()
        };
        let records = run_comparison(&g, &cfg, &CancelToken::new()).unwrap();
        let summary = summarize(&records);
        assert_eq!(
            summary.iter().map(|s| s.method).collect::<Vec<_>>(),
            vec![Method::Exact, Method::Greedy, Method::LocalSearch]
        );
        assert_eq!(summary[0].mean_f1, 1.0);
        assert_eq!(summary[0].mean_cardinality, 4.0);
        assert!(summary.iter().all(|s| s.runs == 2));
    }

    #[test]
    fn splitmix64_is_deterministic() {
        assert_eq!(splitmix64(12345), splitmix64(12345));
        assert_ne!(splitmix64(0), splitmix64(1));
    }
}
