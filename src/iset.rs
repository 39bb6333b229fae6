//! Independence checks over the symmetrized adjacency relation.
//!
//! Solvers never look at edge direction: two distinct vertices conflict if an
//! edge joins them either way. [`ConflictMatrix`] materializes that relation
//! once per run as bitset rows so every inclusion test is a few word ANDs.
//! Self-loops do not make a vertex conflict with itself.

use crate::graph::{Graph, Vertex};
use crate::matrix::{words_for, BitMatrix, Ones};

#[inline(always)]
const fn bit(v: usize) -> u64 {
    1u64 << (v & 63)
}

// ============================================================================
// BitSet
// ============================================================================

/// A fixed-capacity set of vertex indices.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    /// Creates an empty set able to hold indices `0..n`.
    pub fn new(n: usize) -> Self {
        Self {
            words: vec![0u64; words_for(n)],
        }
    }

    /// Creates a set with every index in `0..n`.
    pub fn full(n: usize) -> Self {
        let mut s = Self::new(n);
        for (w, word) in s.words.iter_mut().enumerate() {
            let lo = w * 64;
            let k = (n - lo).min(64);
            *word = if k == 64 { u64::MAX } else { (1u64 << k) - 1 };
        }
        s
    }

    /// Builds a set from an inclusion vector.
    pub fn from_bools(included: &[bool]) -> Self {
        let mut s = Self::new(included.len());
        for (i, _) in included.iter().enumerate().filter(|(_, &b)| b) {
            s.insert(i);
        }
        s
    }

    /// Expands into an inclusion vector of length `n`.
    pub fn to_bools(&self, n: usize) -> Vec<bool> {
        (0..n).map(|i| self.contains(i)).collect()
    }

    /// Inserts `i`.
    #[inline(always)]
    pub fn insert(&mut self, i: usize) {
        self.words[i / 64] |= bit(i);
    }

    /// Removes `i`.
    #[inline(always)]
    pub fn remove(&mut self, i: usize) {
        self.words[i / 64] &= !bit(i);
    }

    /// Returns `true` if `i` is in the set.
    #[inline(always)]
    pub fn contains(&self, i: usize) -> bool {
        (self.words[i / 64] & bit(i)) != 0
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if the set has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns `true` if `self ∩ row` is non-empty.
    #[inline]
    pub fn intersects(&self, row: &[u64]) -> bool {
        self.words.iter().zip(row).any(|(a, b)| (a & b) != 0)
    }

    /// Returns `|self ∩ row|`.
    #[inline]
    pub fn intersection_len(&self, row: &[u64]) -> usize {
        self.words
            .iter()
            .zip(row)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    /// Removes every member of `row` from the set.
    #[inline]
    pub fn subtract(&mut self, row: &[u64]) {
        for (a, b) in self.words.iter_mut().zip(row) {
            *a &= !b;
        }
    }

    /// Iterates members in increasing order.
    pub fn iter(&self) -> Ones<'_> {
        Ones::new(&self.words)
    }
}

// ============================================================================
// ConflictMatrix
// ============================================================================

/// Symmetrized adjacency without the diagonal.
#[derive(Clone, Debug)]
pub struct ConflictMatrix {
    m: BitMatrix,
}

impl ConflictMatrix {
    /// Builds the conflict relation of `graph`, warming its adjacency cache.
    pub fn from_graph<T: Vertex>(graph: &Graph<T>) -> Self {
        Self {
            m: graph.adjacency_matrix().symmetrized(),
        }
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.m.size()
    }

    /// Conflict row of vertex `i`.
    #[inline(always)]
    pub fn row(&self, i: usize) -> &[u64] {
        self.m.row(i)
    }

    #[cfg(test)]
    fn conflicts(&self, i: usize, j: usize) -> bool {
        self.m.get(i, j)
    }

    /// Number of conflicts of `i` inside `alive`.
    #[inline]
    pub fn degree_within(&self, i: usize, alive: &BitSet) -> usize {
        alive.intersection_len(self.row(i))
    }

    /// Returns `true` if no two members of `set` conflict.
    pub fn is_independent(&self, set: &BitSet) -> bool {
        set.iter().all(|v| !set.intersects(self.row(v)))
    }

    /// Returns `true` if no vertex outside `set` could be added to it.
    pub fn is_maximal(&self, set: &BitSet) -> bool {
        (0..self.size()).all(|v| set.contains(v) || set.intersects(self.row(v)))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Number of included positions.
#[inline]
pub fn cardinality(included: &[bool]) -> usize {
    included.iter().filter(|&&b| b).count()
}

/// Returns `true` if no two distinct vertices of `set` are adjacent in `graph`.
///
/// Vertices absent from the graph are ignored.
pub fn is_independent<T: Vertex>(graph: &Graph<T>, set: &[T]) -> bool {
    let conflicts = ConflictMatrix::from_graph(graph);
    conflicts.is_independent(&BitSet::from_bools(&graph.inclusion_vector(set)))
}

/// Returns `true` if `set` is independent and no other vertex can join it.
pub fn is_maximal<T: Vertex>(graph: &Graph<T>, set: &[T]) -> bool {
    let conflicts = ConflictMatrix::from_graph(graph);
    let bits = BitSet::from_bools(&graph.inclusion_vector(set));
    conflicts.is_independent(&bits) && conflicts.is_maximal(&bits)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitset_full_and_len() {
        for n in [0, 1, 63, 64, 65, 130] {
            let s = BitSet::full(n);
            assert_eq!(s.len(), n);
            assert_eq!(s.iter().count(), n);
        }
    }

    #[test]
    fn bitset_bools_roundtrip() {
        let v = vec![true, false, false, true, true];
        let s = BitSet::from_bools(&v);
        assert_eq!(s.len(), 3);
        assert_eq!(s.to_bools(5), v);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![0, 3, 4]);
    }

    #[test]
    fn conflicts_ignore_direction_and_self_loops() {
        let mut g = Graph::<u32>::directed();
        g.add_edge(0, 1);
        g.add_edge(2, 2);
        let c = ConflictMatrix::from_graph(&g);
        assert!(c.conflicts(0, 1));
        assert!(c.conflicts(1, 0));
        assert!(!c.conflicts(2, 2));
        assert!(is_independent(&g, &[0, 2]));
        assert!(!is_independent(&g, &[1, 0]));
    }

    #[test]
    fn maximality_on_path() {
        let g = Graph::<u32>::undirected_from_edges([(1, 2), (2, 3), (3, 4)]);
        assert!(is_maximal(&g, &[1, 3]));
        assert!(is_maximal(&g, &[2, 4]));
        assert!(!is_maximal(&g, &[1]), "4 can still be added");
        assert!(!is_maximal(&g, &[1, 2]), "not independent");
    }

    #[test]
    fn cardinality_counts_true() {
        assert_eq!(cardinality(&[]), 0);
        assert_eq!(cardinality(&[true, false, true]), 2);
    }

    #[test]
    fn degree_within_alive_set() {
        let g = Graph::<u32>::undirected_from_edges([(0, 1), (0, 2), (0, 3)]);
        let c = ConflictMatrix::from_graph(&g);
        let mut alive = BitSet::full(4);
        assert_eq!(c.degree_within(0, &alive), 3);
        alive.remove(2);
        assert_eq!(c.degree_within(0, &alive), 2);
        alive.subtract(c.row(0));
        assert_eq!(alive.iter().collect::<Vec<_>>(), vec![0]);
    }
}
