//! Exact maximum independent set search (Maghout method).
//!
//! Depth-first enumeration over inclusion bit-vectors, vertex `0` first. At
//! each position the search first excludes the vertex, then includes it if it
//! conflicts with no previously included vertex. Branches that cannot strictly
//! beat the best known cardinality are cut.
//!
//! The first `d` positions are fixed up front: each of the `2^d` prefixes is an
//! independent rayon task, and all tasks publish into one [`BestRecord`].

use crate::cancel::{CancelPoll, CancelToken};
use crate::error::SolveError;
use crate::graph::{Graph, Vertex};
use crate::iset::{BitSet, ConflictMatrix};
use crate::solver::Solver;
use crossbeam::utils::CachePadded;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Upper bound on the number of prefix bits fixed per task.
pub const MAX_PARALLEL_DEPTH: usize = 16;

// ============================================================================
// Configuration
// ============================================================================

/// Exact solver parameters.
#[derive(Clone, Debug)]
pub struct MaghoutConfig {
    /// Requested number of prefix bits; `None` (or out of range) means "as many as allowed".
    pub parallel_depth: Option<usize>,
    /// Cap on the prefix length, bounding fan-out at `2^max_parallel_depth` tasks.
    pub max_parallel_depth: usize,
}

impl Default for MaghoutConfig {
    fn default() -> Self {
        Self {
            parallel_depth: None,
            max_parallel_depth: MAX_PARALLEL_DEPTH,
        }
    }
}

impl MaghoutConfig {
    /// Config with an explicit parallel depth.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            parallel_depth: Some(depth),
            ..Self::default()
        }
    }

    /// Prefix length actually used for a graph of `n` vertices, in `[1, min(n, cap)]`.
    pub fn effective_depth(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let requested = match self.parallel_depth {
            Some(d) if (1..=n).contains(&d) => d,
            _ => n,
        };
        let cap = self.max_parallel_depth.clamp(1, MAX_PARALLEL_DEPTH);
        requested.min(cap)
    }
}

// ============================================================================
// BestRecord
// ============================================================================

/// Best independent set found so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Number of members.
    pub cardinality: usize,
    /// Member indices.
    pub members: BitSet,
}

/// Shared best-solution register.
///
/// Cardinality and members are replaced together under one lock, so a reader
/// never pairs a new cardinality with an old vector. `hint` mirrors the stored
/// cardinality (`+1`, `0` = empty register) for lock-free pruning reads; it only
/// ever grows.
pub struct BestRecord {
    hint: CachePadded<AtomicUsize>,
    slot: Mutex<Option<Record>>,
}

impl Default for BestRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl BestRecord {
    /// Creates an empty register.
    pub fn new() -> Self {
        Self {
            hint: CachePadded::new(AtomicUsize::new(0)),
            slot: Mutex::new(None),
        }
    }

    /// Cardinality of the stored record, if any.
    #[inline]
    pub fn cardinality(&self) -> Option<usize> {
        self.hint.load(Ordering::Acquire).checked_sub(1)
    }

    /// Returns `true` if a set of size `cardinality` would replace the record.
    #[inline]
    fn would_improve(&self, cardinality: usize) -> bool {
        cardinality + 1 > self.hint.load(Ordering::Relaxed)
    }

    /// Stores `members` if its cardinality strictly exceeds the record's.
    ///
    /// Ties keep the earlier record. Returns `true` if the record was replaced.
    pub fn offer(&self, members: &BitSet, cardinality: usize) -> bool {
        if !self.would_improve(cardinality) {
            return false;
        }
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|r| cardinality <= r.cardinality) {
            return false;
        }
        *slot = Some(Record {
            cardinality,
            members: members.clone(),
        });
        self.hint.store(cardinality + 1, Ordering::Release);
        true
    }

    #[cfg(test)]
    fn snapshot(&self) -> Option<Record> {
        self.slot.lock().clone()
    }

    /// Consumes the register.
    pub fn into_inner(self) -> Option<Record> {
        self.slot.into_inner()
    }
}

// ============================================================================
// Search
// ============================================================================

struct Search<'a> {
    conflicts: &'a ConflictMatrix,
    best: &'a BestRecord,
    aborted: &'a AtomicBool,
    n: usize,
}

impl Search<'_> {
    #[inline]
    fn check_cancel(&self, poll: &mut CancelPoll<'_>) -> bool {
        if poll.is_cancelled() {
            self.aborted.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    /// Builds the fixed prefix of task `mask`; `None` if the prefix itself conflicts.
    fn prefix(&self, mask: usize, depth: usize) -> Option<(BitSet, usize)> {
        let mut current = BitSet::new(self.n);
        let mut count = 0;
        for i in (0..depth).filter(|&i| (mask >> i) & 1 == 1) {
            if current.intersects(self.conflicts.row(i)) {
                return None;
            }
            current.insert(i);
            count += 1;
        }
        Some((current, count))
    }

    fn backtrack(&self, poll: &mut CancelPoll<'_>, current: &mut BitSet, count: usize, idx: usize) {
        if self.check_cancel(poll) {
            return;
        }

        if idx == self.n {
            debug_assert!(self.conflicts.is_independent(current));
            if self.best.offer(current, count) {
                debug!(cardinality = count, "exact search improved best record");
            }
            return;
        }

        if !self.best.would_improve(count + (self.n - idx)) {
            return;
        }

        self.backtrack(poll, current, count, idx + 1);

        // `current` only holds indices below `idx` here.
        if !current.intersects(self.conflicts.row(idx)) {
            current.insert(idx);
            self.backtrack(poll, current, count + 1, idx + 1);
            current.remove(idx);
        }
    }
}

/// Computes a maximum independent set of `graph`.
///
/// Returns `Ok(vec![])` for the empty graph and `Err(SolveError::Cancelled)` if
/// `cancel` fired before the search space was exhausted.
pub fn mis_maghout<T: Vertex>(
    graph: &Graph<T>,
    config: &MaghoutConfig,
    cancel: &CancelToken,
) -> Result<Vec<T>, SolveError> {
    let n = graph.size();
    if n == 0 {
        return Ok(Vec::new());
    }
    if cancel.is_cancelled() {
        return Err(SolveError::Cancelled);
    }

    let conflicts = ConflictMatrix::from_graph(graph);
    let depth = config.effective_depth(n);
    let tasks = 1usize << depth;
    let start = Instant::now();
    info!(vertices = n, depth, tasks, "starting exact search");

    let best = BestRecord::new();
    let aborted = AtomicBool::new(false);
    let search = Search {
        conflicts: &conflicts,
        best: &best,
        aborted: &aborted,
        n,
    };

    (0..tasks).into_par_iter().for_each(|mask| {
        if cancel.is_cancelled() {
            aborted.store(true, Ordering::Relaxed);
            return;
        }
        if let Some((mut current, count)) = search.prefix(mask, depth) {
            search.backtrack(&mut cancel.poller(), &mut current, count, depth);
        }
    });

    if aborted.load(Ordering::Relaxed) {
        warn!(elapsed_ms = start.elapsed().as_millis() as u64, "exact search cancelled");
        return Err(SolveError::Cancelled);
    }

    let Some(record) = best.into_inner() else {
        return Ok(Vec::new());
    };
    debug!(
        cardinality = record.cardinality,
        elapsed_us = start.elapsed().as_micros() as u64,
        "exact search finished"
    );
    Ok(graph.vertices_of(&record.members.to_bools(n)))
}

/// [`Solver`] adapter for [`mis_maghout`].
#[derive(Clone, Debug, Default)]
pub struct Maghout {
    /// Search parameters.
    pub config: MaghoutConfig,
}

impl Maghout {
    /// Creates the solver with `config`.
    pub fn new(config: MaghoutConfig) -> Self {
        Self { config }
    }
}

impl<T: Vertex> Solver<T> for Maghout {
    fn name(&self) -> &'static str {
        "maghout"
    }

    fn solve(&self, graph: &Graph<T>, cancel: &CancelToken) -> Result<Vec<T>, SolveError> {
        mis_maghout(graph, &self.config, cancel)
    }
}

// ============================================================================
// Tests
// ============================================================================
