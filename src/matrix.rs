//! Square matrices addressed by dense vertex indices.
//!
//! These back the derived caches of [`crate::graph::Graph`]: a boolean adjacency
//! matrix stored as `u64` bitset rows, and a real-valued weight matrix. Both can
//! be grown by one vertex or reduced by removing one index, so the caches follow
//! the graph's index compaction without holes.

use crate::graph::NO_WEIGHT;

#[inline(always)]
pub(crate) const fn words_for(n: usize) -> usize {
    n.div_ceil(64)
}

#[inline(always)]
const fn bit(v: usize) -> u64 {
    1u64 << (v & 63)
}

// ============================================================================
// BitMatrix
// ============================================================================

/// An `n × n` boolean matrix; row `i` is a bitset over columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitMatrix {
    n: usize,
    words: usize,
    bits: Vec<u64>,
}

impl BitMatrix {
    /// Creates an all-false matrix.
    pub fn new(n: usize) -> Self {
        let words = words_for(n);
        Self {
            n,
            words,
            bits: vec![0u64; n * words],
        }
    }

    /// Returns the order of the matrix.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Returns cell `(i, j)`.
    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> bool {
        debug_assert!(i < self.n && j < self.n);
        (self.bits[i * self.words + j / 64] & bit(j)) != 0
    }

    /// Sets cell `(i, j)`.
    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        debug_assert!(i < self.n && j < self.n);
        let w = &mut self.bits[i * self.words + j / 64];
        if value {
            *w |= bit(j);
        } else {
            *w &= !bit(j);
        }
    }

    /// Returns row `i` as a bitset.
    #[inline(always)]
    pub fn row(&self, i: usize) -> &[u64] {
        &self.bits[i * self.words..(i + 1) * self.words]
    }

    /// Returns the set column indices of row `i`.
    pub fn row_ones(&self, i: usize) -> Ones<'_> {
        Ones::new(self.row(i))
    }

    /// Returns `true` if any diagonal cell is set.
    pub fn has_diagonal(&self) -> bool {
        (0..self.n).any(|i| self.get(i, i))
    }

    /// Returns `self | selfᵀ` with the diagonal cleared.
    pub fn symmetrized(&self) -> Self {
        let mut out = self.clone();
        for i in 0..self.n {
            for j in self.row_ones(i) {
                out.set(j, i, true);
            }
        }
        for i in 0..self.n {
            out.set(i, i, false);
        }
        out
    }

    /// Returns a copy with one more (empty) row and column.
    pub fn grown(&self) -> Self {
        let mut out = Self::new(self.n + 1);
        for i in 0..self.n {
            let dst = i * out.words;
            out.bits[dst..dst + self.words].copy_from_slice(self.row(i));
        }
        out
    }

    /// Returns a copy of order `n - 1` with row and column `removed` dropped.
    ///
    /// Indices above `removed` shift down by one, matching the graph's
    /// index compaction.
    pub fn reduced(&self, removed: usize) -> Self {
        debug_assert!(removed < self.n);
        let mut out = Self::new(self.n - 1);
        for i in (0..self.n).filter(|&i| i != removed) {
            let ni = if i > removed { i - 1 } else { i };
            for j in self.row_ones(i) {
                if j == removed {
                    continue;
                }
                let nj = if j > removed { j - 1 } else { j };
                out.set(ni, nj, true);
            }
        }
        out
    }
}

/// Iterator over the set bit positions of a bitset slice.
pub struct Ones<'a> {
    words: &'a [u64],
    idx: usize,
    cur: u64,
}

impl<'a> Ones<'a> {
    /// Creates an iterator over `words`.
    pub fn new(words: &'a [u64]) -> Self {
        let cur = words.first().copied().unwrap_or(0);
        Self { words, idx: 0, cur }
    }
}

impl Iterator for Ones<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        loop {
            if self.cur != 0 {
                let b = self.cur.trailing_zeros() as usize;
                self.cur &= self.cur - 1;
                return Some(self.idx * 64 + b);
            }
            self.idx += 1;
            if self.idx >= self.words.len() {
                return None;
            }
            self.cur = self.words[self.idx];
        }
    }
}

// ============================================================================
// WeightMatrix
// ============================================================================

/// An `n × n` matrix of edge weights; absent weights hold [`NO_WEIGHT`].
#[derive(Clone, Debug, PartialEq)]
pub struct WeightMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl WeightMatrix {
    /// Creates a matrix filled with [`NO_WEIGHT`].
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![NO_WEIGHT; n * n],
        }
    }

    /// Returns the order of the matrix.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Returns cell `(i, j)`.
    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.n && j < self.n);
        self.cells[i * self.n + j]
    }

    /// Sets cell `(i, j)`.
    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, weight: f64) {
        debug_assert!(i < self.n && j < self.n);
        self.cells[i * self.n + j] = weight;
    }

    /// Returns a copy with one more row and column of [`NO_WEIGHT`].
    pub fn grown(&self) -> Self {
        let mut out = Self::new(self.n + 1);
        for i in 0..self.n {
            let src = &self.cells[i * self.n..(i + 1) * self.n];
            out.cells[i * out.n..i * out.n + self.n].copy_from_slice(src);
        }
        out
    }

    /// Returns a copy of order `n - 1` with row and column `removed` dropped.
    pub fn reduced(&self, removed: usize) -> Self {
        debug_assert!(removed < self.n);
        let mut out = Self::new(self.n - 1);
        let mut k = 0;
        for i in (0..self.n).filter(|&i| i != removed) {
            for j in (0..self.n).filter(|&j| j != removed) {
                out.cells[k] = self.get(i, j);
                k += 1;
            }
        }
        out
    }
}

// ============================================================================
// Tests
// ============================================================================
