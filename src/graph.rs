//! Vertex-parameterized graph store with lazily derived matrix caches.
//!
//! The adjacency lists are the source of truth. A boolean adjacency matrix is
//! built on first matrix-dependent query and then maintained in lockstep with
//! every structural mutation; a weight matrix is allocated the first time a
//! weight is supplied. Both are addressed through a dense `vertex <-> index`
//! mapping that is compacted on vertex removal.

use crate::matrix::{BitMatrix, WeightMatrix};
use rayon::prelude::*;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::OnceLock;

/// Sentinel weight meaning "this edge carries no weight".
pub const NO_WEIGHT: f64 = f64::INFINITY;

/// Bounds required of a vertex identifier.
pub trait Vertex: Clone + Eq + Hash + Send + Sync {}

impl<T: Clone + Eq + Hash + Send + Sync> Vertex for T {}

/// Edge orientation of a graph, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphType {
    /// Edges are ordered pairs.
    Directed,
    /// Edges are unordered pairs, stored as two mirrored entries.
    Undirected,
}

/// A `(from, to, weight)` triple. `weight` is [`NO_WEIGHT`] when unset.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge<T> {
    /// Tail vertex.
    pub from: T,
    /// Head vertex.
    pub to: T,
    /// Edge weight or [`NO_WEIGHT`].
    pub weight: f64,
}

impl<T> Edge<T> {
    /// Returns `true` if a finite weight is attached.
    #[inline]
    pub fn has_weight(&self) -> bool {
        self.weight.is_finite()
    }
}

// ============================================================================
// Graph
// ============================================================================

/// A directed or undirected graph over caller-supplied vertex values.
///
/// Representation:
/// - `index_to_vertex[i]` / `vertex_to_index[v]` form a bijection onto `[0, size)`.
/// - `adjacency[i]` lists the out-neighbors of vertex `i` in insertion order.
/// - `adj_matrix`, once built, agrees with `adjacency` at every address.
///
/// Mutation needs `&mut self`; concurrent solver runs share `&Graph` and may
/// warm the caches from several threads at once.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    graph_type: GraphType,
    index_to_vertex: Vec<T>,
    vertex_to_index: HashMap<T, usize>,
    adjacency: Vec<Vec<T>>,
    adj_matrix: OnceLock<BitMatrix>,
    weights: Option<WeightMatrix>,
    has_loop: OnceLock<bool>,
    is_acyclic: OnceLock<bool>,
}

impl<T: Vertex> Graph<T> {
    /// Creates an empty graph of the given type.
    pub fn new(graph_type: GraphType) -> Self {
        Self {
            graph_type,
            index_to_vertex: Vec::new(),
            vertex_to_index: HashMap::new(),
            adjacency: Vec::new(),
            adj_matrix: OnceLock::new(),
            weights: None,
            has_loop: OnceLock::new(),
            is_acyclic: OnceLock::new(),
        }
    }

    /// Creates an empty directed graph.
    pub fn directed() -> Self {
        Self::new(GraphType::Directed)
    }

    /// Creates an empty undirected graph.
    pub fn undirected() -> Self {
        Self::new(GraphType::Undirected)
    }

    /// Builds an undirected graph from an edge list.
    pub fn undirected_from_edges<I: IntoIterator<Item = (T, T)>>(edges: I) -> Self {
        let mut g = Self::undirected();
        for (u, v) in edges {
            g.add_edge(u, v);
        }
        g
    }

    /// Returns the graph type.
    #[inline]
    pub fn graph_type(&self) -> GraphType {
        self.graph_type
    }

    /// Returns `true` for directed graphs.
    #[inline]
    pub fn is_directed(&self) -> bool {
        self.graph_type == GraphType::Directed
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn size(&self) -> usize {
        self.index_to_vertex.len()
    }

    /// Returns `true` if the graph has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index_to_vertex.is_empty()
    }

    /// Returns the dense index of `v`.
    #[inline]
    pub fn index_of(&self, v: &T) -> Option<usize> {
        self.vertex_to_index.get(v).copied()
    }

    /// Returns the vertex at dense index `i`.
    #[inline]
    pub fn vertex_at(&self, i: usize) -> Option<&T> {
        self.index_to_vertex.get(i)
    }

    /// Returns a snapshot of all vertices in index order.
    pub fn vertices(&self) -> Vec<T> {
        self.index_to_vertex.clone()
    }

    /// Returns `true` if `v` is a vertex of the graph.
    #[inline]
    pub fn contains_vertex(&self, v: &T) -> bool {
        self.vertex_to_index.contains_key(v)
    }

    /// Returns `true` once a weight matrix has been allocated.
    #[inline]
    pub fn has_weights(&self) -> bool {
        self.weights.is_some()
    }

    /// Returns `true` if the adjacency matrix has been built.
    #[inline]
    pub fn is_cache_warm(&self) -> bool {
        self.adj_matrix.get().is_some()
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Adds a vertex. Returns `false` (and changes nothing) if it already exists.
    pub fn add_vertex(&mut self, v: T) -> bool {
        if self.contains_vertex(&v) {
            return false;
        }
        self.vertex_to_index.insert(v.clone(), self.index_to_vertex.len());
        self.index_to_vertex.push(v);
        self.adjacency.push(Vec::new());

        if let Some(m) = self.adj_matrix.get_mut() {
            *m = m.grown();
        }
        if let Some(w) = self.weights.as_mut() {
            *w = w.grown();
        }
        true
    }

    /// Adds an unweighted edge, creating missing endpoints.
    ///
    /// Returns `false` if the edge already exists.
    pub fn add_edge(&mut self, from: T, to: T) -> bool {
        self.insert_edge(from, to, None)
    }

    /// Adds a weighted edge, creating missing endpoints and the weight matrix.
    ///
    /// Returns `false` if the edge already exists.
    pub fn add_weighted_edge(&mut self, from: T, to: T, weight: f64) -> bool {
        self.insert_edge(from, to, Some(weight))
    }

    fn insert_edge(&mut self, from: T, to: T, weight: Option<f64>) -> bool {
        if self.contains_edge(&from, &to) {
            return false;
        }
        self.add_vertex(from.clone());
        self.add_vertex(to.clone());

        let fi = self.vertex_to_index[&from];
        let ti = self.vertex_to_index[&to];
        let mirrored = self.graph_type == GraphType::Undirected && fi != ti;

        self.adjacency[fi].push(to);
        if mirrored {
            self.adjacency[ti].push(from);
        }

        if let Some(m) = self.adj_matrix.get_mut() {
            m.set(fi, ti, true);
            if mirrored {
                m.set(ti, fi, true);
            }
        }

        if let Some(w) = weight {
            let n = self.size();
            let wm = self.weights.get_or_insert_with(|| WeightMatrix::new(n));
            wm.set(fi, ti, w);
            if mirrored {
                wm.set(ti, fi, w);
            }
        }

        if fi == ti {
            self.has_loop = OnceLock::from(true);
        }
        self.is_acyclic.take();
        true
    }

    /// Removes the edge `from -> to` (both directions for undirected graphs).
    ///
    /// Returns `false` if the edge does not exist.
    pub fn remove_edge(&mut self, from: &T, to: &T) -> bool {
        let (Some(fi), Some(ti)) = (self.index_of(from), self.index_of(to)) else {
            return false;
        };
        let Some(pos) = self.adjacency[fi].iter().position(|x| x == to) else {
            return false;
        };
        self.adjacency[fi].remove(pos);

        let mirrored = self.graph_type == GraphType::Undirected && fi != ti;
        if mirrored {
            if let Some(pos) = self.adjacency[ti].iter().position(|x| x == from) {
                self.adjacency[ti].remove(pos);
            }
        }

        if let Some(m) = self.adj_matrix.get_mut() {
            m.set(fi, ti, false);
            if mirrored {
                m.set(ti, fi, false);
            }
        }
        if let Some(w) = self.weights.as_mut() {
            w.set(fi, ti, NO_WEIGHT);
            if mirrored {
                w.set(ti, fi, NO_WEIGHT);
            }
        }

        self.has_loop.take();
        self.is_acyclic.take();
        true
    }

    /// Removes a vertex and all incident edges, compacting the index mapping.
    ///
    /// Returns `false` if the vertex does not exist.
    pub fn remove_vertex(&mut self, v: &T) -> bool {
        let Some(idx) = self.vertex_to_index.remove(v) else {
            return false;
        };
        self.index_to_vertex.remove(idx);
        self.adjacency.remove(idx);
        for (i, vertex) in self.index_to_vertex.iter().enumerate().skip(idx) {
            if let Some(slot) = self.vertex_to_index.get_mut(vertex) {
                *slot = i;
            }
        }
        for list in &mut self.adjacency {
            list.retain(|x| x != v);
        }

        if let Some(m) = self.adj_matrix.get_mut() {
            *m = m.reduced(idx);
        }
        if let Some(w) = self.weights.as_mut() {
            *w = w.reduced(idx);
        }

        self.has_loop.take();
        self.is_acyclic.take();
        true
    }

    /// Sets the weight of an existing edge. Returns `false` if the edge is absent.
    pub fn set_weight(&mut self, from: &T, to: &T, weight: f64) -> bool {
        if !self.contains_edge(from, to) {
            return false;
        }
        let (fi, ti) = (self.vertex_to_index[from], self.vertex_to_index[to]);
        let n = self.size();
        let undirected = self.graph_type == GraphType::Undirected;
        let wm = self.weights.get_or_insert_with(|| WeightMatrix::new(n));
        wm.set(fi, ti, weight);
        if undirected {
            wm.set(ti, fi, weight);
        }
        true
    }

    /// Drops the weight matrix; all edges become unweighted.
    pub fn clear_weights(&mut self) {
        self.weights = None;
    }

    /// Drops the adjacency matrix and the memoized loop/acyclicity flags.
    pub fn clear_cache(&mut self) {
        self.adj_matrix.take();
        self.has_loop.take();
        self.is_acyclic.take();
    }

    /// Removes every vertex, edge, weight and cache.
    pub fn reset(&mut self) {
        *self = Self::new(self.graph_type);
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Returns the adjacency matrix, building it from the lists if absent.
    pub fn adjacency_matrix(&self) -> &BitMatrix {
        self.adj_matrix.get_or_init(|| {
            let mut m = BitMatrix::new(self.size());
            for (i, list) in self.adjacency.iter().enumerate() {
                for to in list {
                    m.set(i, self.vertex_to_index[to], true);
                }
            }
            m
        })
    }

    /// Returns `true` if the edge `from -> to` exists.
    ///
    /// Uses the matrix when warm, otherwise scans the adjacency list.
    pub fn contains_edge(&self, from: &T, to: &T) -> bool {
        let (Some(fi), Some(ti)) = (self.index_of(from), self.index_of(to)) else {
            return false;
        };
        match self.adj_matrix.get() {
            Some(m) => m.get(fi, ti),
            None => self.adjacency[fi].contains(to),
        }
    }

    /// Returns the vertices adjacent to `v` in either direction, in index order.
    ///
    /// Returns `None` if `v` is not a vertex.
    pub fn neighbors(&self, v: &T) -> Option<Vec<T>> {
        let idx = self.index_of(v)?;
        let m = self.adjacency_matrix();
        let directed = self.is_directed();
        let out = (0..self.size())
            .into_par_iter()
            .filter(|&i| m.get(i, idx) || (directed && m.get(idx, i)))
            .map(|i| self.index_to_vertex[i].clone())
            .collect();
        Some(out)
    }

    /// Returns the edges leaving `v`; undirected graphs also list the mirrored entries.
    ///
    /// Returns `None` if `v` is not a vertex.
    pub fn edges_of(&self, v: &T) -> Option<Vec<Edge<T>>> {
        let fi = self.index_of(v)?;
        let undirected = self.graph_type == GraphType::Undirected;
        let out = self.adjacency[fi]
            .par_iter()
            .flat_map_iter(|to| {
                let weight = self.weight_at(fi, self.vertex_to_index[to]);
                let forward = Edge {
                    from: v.clone(),
                    to: to.clone(),
                    weight,
                };
                let mirror = (undirected && to != v).then(|| Edge {
                    from: to.clone(),
                    to: v.clone(),
                    weight,
                });
                std::iter::once(forward).chain(mirror)
            })
            .collect();
        Some(out)
    }

    /// Returns every stored directed entry (both halves of each undirected edge).
    pub fn all_edges(&self) -> Vec<Edge<T>> {
        self.adjacency
            .par_iter()
            .enumerate()
            .flat_map_iter(|(fi, list)| {
                let from = &self.index_to_vertex[fi];
                list.iter().map(move |to| Edge {
                    from: from.clone(),
                    to: to.clone(),
                    weight: self.weight_at(fi, self.vertex_to_index[to]),
                })
            })
            .collect()
    }

    /// Returns the edge `from -> to` with its weight, if present.
    pub fn edge(&self, from: &T, to: &T) -> Option<Edge<T>> {
        let weight = self.weight(from, to)?;
        Some(Edge {
            from: from.clone(),
            to: to.clone(),
            weight,
        })
    }

    /// Returns the weight of `from -> to`.
    ///
    /// `None` if the edge is absent; `Some(NO_WEIGHT)` if it exists unweighted.
    pub fn weight(&self, from: &T, to: &T) -> Option<f64> {
        if !self.contains_edge(from, to) {
            return None;
        }
        Some(self.weight_at(self.vertex_to_index[from], self.vertex_to_index[to]))
    }

    #[inline]
    fn weight_at(&self, fi: usize, ti: usize) -> f64 {
        self.weights.as_ref().map_or(NO_WEIGHT, |w| w.get(fi, ti))
    }

    /// Returns `true` if some vertex has an edge to itself. Memoized.
    pub fn has_loop(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        *self.has_loop.get_or_init(|| match self.adj_matrix.get() {
            Some(m) => m.has_diagonal(),
            None => self
                .adjacency
                .iter()
                .zip(&self.index_to_vertex)
                .any(|(list, v)| list.contains(v)),
        })
    }

    /// Returns `true` if the graph contains no cycle. Memoized.
    pub fn is_acyclic(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        *self.is_acyclic.get_or_init(|| {
            let adj = self.index_lists();
            match self.graph_type {
                GraphType::Directed => !directed_has_cycle(&adj),
                GraphType::Undirected => !undirected_has_cycle(&adj),
            }
        })
    }

    fn index_lists(&self) -> Vec<Vec<usize>> {
        self.adjacency
            .iter()
            .map(|list| list.iter().map(|to| self.vertex_to_index[to]).collect())
            .collect()
    }

    // ------------------------------------------------------------------------
    // Inclusion vectors
    // ------------------------------------------------------------------------

    /// Converts a vertex sequence into an inclusion vector of length `size`.
    ///
    /// Vertices that are not in the graph are ignored.
    pub fn inclusion_vector(&self, set: &[T]) -> Vec<bool> {
        let mut out = vec![false; self.size()];
        for v in set {
            if let Some(i) = self.index_of(v) {
                out[i] = true;
            }
        }
        out
    }

    /// Converts an inclusion vector back into vertices, in index order.
    pub fn vertices_of(&self, included: &[bool]) -> Vec<T> {
        included
            .iter()
            .zip(&self.index_to_vertex)
            .filter_map(|(&inc, v)| inc.then(|| v.clone()))
            .collect()
    }

    pub(crate) fn adjacency_lists(&self) -> &[Vec<T>] {
        &self.adjacency
    }

    pub(crate) fn weight_matrix(&self) -> Option<&WeightMatrix> {
        self.weights.as_ref()
    }
}

// ============================================================================
// Cycle detection
// ============================================================================

/// Iterative DFS with white/gray/black coloring.
fn directed_has_cycle(adj: &[Vec<usize>]) -> bool {
    const WHITE: u8 = 0;
    const GRAY: u8 = 1;
    const BLACK: u8 = 2;

    let n = adj.len();
    let mut color = vec![WHITE; n];
    let mut stack: Vec<(usize, usize)> = Vec::with_capacity(n);

    for root in 0..n {
        if color[root] != WHITE {
            continue;
        }
        color[root] = GRAY;
        stack.push((root, 0));
        while let Some(top) = stack.last_mut() {
            let v = top.0;
            if let Some(&w) = adj[v].get(top.1) {
                top.1 += 1;
                match color[w] {
                    GRAY => return true,
                    WHITE => {
                        color[w] = GRAY;
                        stack.push((w, 0));
                    }
                    _ => {}
                }
            } else {
                color[v] = BLACK;
                stack.pop();
            }
        }
    }
    false
}

/// Iterative DFS that skips the tree edge back to the parent.
///
/// Lists are symmetric and hold no parallel edges, so any other edge to a
/// visited vertex closes a cycle. A self-loop is a cycle.
fn undirected_has_cycle(adj: &[Vec<usize>]) -> bool {
    let n = adj.len();
    let mut visited = vec![false; n];
    let mut stack: Vec<(usize, Option<usize>, usize)> = Vec::with_capacity(n);

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        stack.push((root, None, 0));
        while let Some(top) = stack.last_mut() {
            let (v, parent) = (top.0, top.1);
            let Some(&w) = adj[v].get(top.2) else {
                stack.pop();
                continue;
            };
            top.2 += 1;
            if w == v {
                return true;
            }
            if Some(w) == parent {
                continue;
            }
            if visited[w] {
                return true;
            }
            visited[w] = true;
            stack.push((w, Some(v), 0));
        }
    }
    false
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> Graph<u32> {
        Graph::undirected_from_edges([(1, 2), (2, 3), (3, 4), (4, 1)])
    }

    fn sorted(mut v: Vec<u32>) -> Vec<u32> {
        v.sort_unstable();
        v
    }

    #[test]
    fn add_vertex_rejects_duplicates() {
        let mut g = Graph::<u32>::directed();
        assert!(g.add_vertex(7));
        assert!(!g.add_vertex(7));
        assert_eq!(g.size(), 1);
        assert_eq!(g.index_of(&7), Some(0));
    }

    #[test]
    fn add_edge_creates_endpoints_and_rejects_duplicates() {
        let mut g = Graph::<u32>::undirected();
        assert!(g.add_edge(1, 2));
        assert_eq!(g.size(), 2);
        assert!(!g.add_edge(1, 2));
        assert!(!g.add_edge(2, 1), "undirected edge is stored symmetrically");
        assert!(g.contains_edge(&2, &1));
        assert_eq!(g.all_edges().len(), 2);
    }

    #[test]
    fn directed_edges_are_one_way() {
        let mut g = Graph::<u32>::directed();
        g.add_edge(1, 2);
        assert!(g.contains_edge(&1, &2));
        assert!(!g.contains_edge(&2, &1));
        assert!(g.add_edge(2, 1));
        assert_eq!(g.all_edges().len(), 2);
    }

    #[test]
    fn warm_matrix_is_updated_incrementally() {
        let mut g = square();
        let _ = g.adjacency_matrix();
        assert!(g.is_cache_warm());

        g.add_edge(1, 3);
        g.add_edge(5, 1);
        assert!(g.is_cache_warm());
        let m = g.adjacency_matrix();
        let (i1, i3, i5) = (g.index_of(&1).unwrap(), g.index_of(&3).unwrap(), g.index_of(&5).unwrap());
        assert!(m.get(i1, i3) && m.get(i3, i1));
        assert!(m.get(i5, i1) && m.get(i1, i5));

        let mut cold = g.clone();
        cold.clear_cache();
        assert_eq!(g.adjacency_matrix(), cold.adjacency_matrix());
    }

    #[test]
    fn remove_vertex_compacts_indices_and_matrix() {
        let mut g = square();
        let _ = g.adjacency_matrix();
        assert!(g.remove_vertex(&2));
        assert!(!g.remove_vertex(&2));
        assert_eq!(g.size(), 3);
        assert_eq!(g.vertices(), vec![1, 3, 4]);
        for (i, v) in g.vertices().iter().enumerate() {
            assert_eq!(g.index_of(v), Some(i));
        }
        assert!(!g.contains_edge(&1, &2));
        assert!(g.contains_edge(&3, &4));
        assert!(g.contains_edge(&4, &1));
        assert!(!g.contains_edge(&1, &3));
        assert_eq!(g.adjacency_matrix().size(), 3);

        let mut cold = g.clone();
        cold.clear_cache();
        assert_eq!(g.adjacency_matrix(), cold.adjacency_matrix());
    }

    #[test]
    fn remove_edge_is_symmetric_and_reports_missing() {
        let mut g = square();
        assert!(g.remove_edge(&2, &1));
        assert!(!g.contains_edge(&1, &2));
        assert!(!g.contains_edge(&2, &1));
        assert!(!g.remove_edge(&1, &2));
        assert!(!g.remove_edge(&1, &99));
        assert_eq!(g.all_edges().len(), 6);
    }

    #[test]
    fn neighbors_cover_both_directions_for_directed_graphs() {
        let mut g = Graph::<u32>::directed();
        g.add_edge(1, 2);
        g.add_edge(3, 1);
        g.add_edge(1, 3);
        assert_eq!(sorted(g.neighbors(&1).unwrap()), vec![2, 3]);
        assert_eq!(g.neighbors(&2).unwrap(), vec![1]);
        assert!(g.neighbors(&42).is_none());
    }

    #[test]
    fn edges_of_mirrors_undirected_entries() {
        let g = square();
        let edges = g.edges_of(&1).unwrap();
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().any(|e| e.from == 2 && e.to == 1));
        assert!(edges.iter().all(|e| !e.has_weight()));
    }

    #[test]
    fn weights_are_lazily_allocated() {
        let mut g = Graph::<u32>::undirected();
        g.add_edge(1, 2);
        assert!(!g.has_weights());
        assert_eq!(g.weight(&1, &2), Some(NO_WEIGHT));
        assert_eq!(g.weight(&1, &3), None);

        g.add_weighted_edge(2, 3, 2.5);
        assert!(g.has_weights());
        assert_eq!(g.weight(&3, &2), Some(2.5));
        assert_eq!(g.weight(&1, &2), Some(NO_WEIGHT));

        assert!(g.set_weight(&1, &2, -1.0));
        assert_eq!(g.edge(&2, &1).unwrap().weight, -1.0);
        assert!(!g.set_weight(&1, &3, 1.0));

        g.add_vertex(9);
        g.add_weighted_edge(9, 1, 4.0);
        assert_eq!(g.weight(&1, &9), Some(4.0));

        g.remove_vertex(&2);
        assert_eq!(g.weight(&9, &1), Some(4.0));

        g.clear_weights();
        assert_eq!(g.weight(&9, &1), Some(NO_WEIGHT));
    }

    #[test]
    fn self_loop_is_reported_immediately() {
        let mut g = Graph::<u32>::undirected();
        assert!(g.add_edge(1, 1));
        assert!(g.has_loop());
        assert!(!g.is_acyclic());
        assert_eq!(g.adjacency_lists()[0], vec![1]);
        assert!(g.remove_edge(&1, &1));
        assert!(!g.has_loop());
        assert!(g.is_acyclic());
    }

    #[test]
    fn empty_graph_properties() {
        let g = Graph::<u32>::undirected();
        assert!(g.is_acyclic());
        assert!(!g.has_loop());
        assert!(g.all_edges().is_empty());
        assert_eq!(g.adjacency_matrix().size(), 0);
    }

    #[test]
    fn acyclicity_undirected() {
        let mut g = Graph::<u32>::undirected_from_edges([(1, 2), (2, 3), (2, 4)]);
        assert!(g.is_acyclic(), "a tree has no cycle");
        g.add_edge(3, 4);
        assert!(!g.is_acyclic());
        g.remove_edge(&3, &4);
        assert!(g.is_acyclic());
        assert!(!square().is_acyclic());
    }

    #[test]
    fn acyclicity_directed() {
        let mut g = Graph::<u32>::directed();
        g.add_edge(1, 2);
        g.add_edge(1, 3);
        g.add_edge(2, 3);
        assert!(g.is_acyclic(), "diamond-shaped DAG");
        g.add_edge(3, 1);
        assert!(!g.is_acyclic());
    }

    #[test]
    fn two_way_directed_pair_is_a_cycle() {
        let mut g = Graph::<u32>::directed();
        g.add_edge(1, 2);
        assert!(g.is_acyclic());
        g.add_edge(2, 1);
        assert!(!g.is_acyclic());
    }

    #[test]
    fn inclusion_vector_roundtrip() {
        let g = square();
        let inc = g.inclusion_vector(&[3, 1, 77]);
        assert_eq!(inc, vec![true, false, true, false]);
        assert_eq!(g.vertices_of(&inc), vec![1, 3]);
    }

    #[test]
    fn reset_clears_everything() {
        let mut g = square();
        g.set_weight(&1, &2, 3.0);
        let _ = g.adjacency_matrix();
        g.reset();
        assert!(g.is_empty());
        assert!(!g.has_weights());
        assert!(!g.is_cache_warm());
        assert_eq!(g.graph_type(), GraphType::Undirected);
    }

    #[derive(Clone, Debug)]
    enum Op {
        AddVertex(u8),
        AddEdge(u8, u8),
        RemoveEdge(u8, u8),
        RemoveVertex(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            1 => (0u8..8).prop_map(Op::AddVertex),
            4 => (0u8..8, 0u8..8).prop_map(|(a, b)| Op::AddEdge(a, b)),
            2 => (0u8..8, 0u8..8).prop_map(|(a, b)| Op::RemoveEdge(a, b)),
            1 => (0u8..8).prop_map(Op::RemoveVertex),
        ]
    }

    fn apply(g: &mut Graph<u8>, op: &Op) -> bool {
        match *op {
            Op::AddVertex(v) => g.add_vertex(v),
            Op::AddEdge(a, b) => g.add_edge(a, b),
            Op::RemoveEdge(a, b) => g.remove_edge(&a, &b),
            Op::RemoveVertex(v) => g.remove_vertex(&v),
        }
    }

    proptest! {
        #[test]
        fn matrix_and_lists_agree(
            directed in any::<bool>(),
            ops in proptest::collection::vec(op_strategy(), 0..60),
        ) {
            let kind = if directed { GraphType::Directed } else { GraphType::Undirected };
            let mut warm = Graph::<u8>::new(kind);
            let mut cold = Graph::<u8>::new(kind);
            let _ = warm.adjacency_matrix();

            for op in &ops {
                let a = apply(&mut warm, op);
                let b = apply(&mut cold, op);
                prop_assert_eq!(a, b);
                prop_assert!(warm.is_cache_warm());
                prop_assert!(!cold.is_cache_warm());

                for u in 0u8..8 {
                    for v in 0u8..8 {
                        prop_assert_eq!(warm.contains_edge(&u, &v), cold.contains_edge(&u, &v));
                    }
                }
            }

            let mut rebuilt = warm.clone();
            rebuilt.clear_cache();
            prop_assert_eq!(warm.adjacency_matrix(), rebuilt.adjacency_matrix());
            prop_assert_eq!(warm.has_loop(), cold.has_loop());
            prop_assert_eq!(warm.is_acyclic(), cold.is_acyclic());
        }
    }
}
