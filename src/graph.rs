//! Graph storage variants over bit-packed adjacency.
//!
//! Three interchangeable encodings, selected at compile time through the
//! [`EdgeStorage`] trait so the edge test in the innermost search loops is a
//! direct word probe rather than a virtual call:
//!
//! - [`DenseStorage`]: one bitset row per vertex; O(1) edge test, fast
//!   neighbor scans.
//! - [`TriangularStorage`]: a single flat bit array indexed
//!   `max*(max+1)/2 + min`; half the memory, symmetric by construction.
//! - [`RaggedStorage`]: row `i` only stores bits for neighbors `<= i`;
//!   for static graphs.
//!
//! [`WeightedGraph`] is the dense variant extended with vertex weights and a
//! live degree cache, as needed by the vertex-cover algorithms.
//!
//! Vertex ids are 0-based internally; parsers handle external offsets.

use crate::bitset::BitSet;

// ============================================================================
// EdgeStorage variants
// ============================================================================

/// Backing storage for a symmetric adjacency relation.
pub trait EdgeStorage {
    /// Allocates storage for `n` vertices with no edges.
    fn with_capacity(n: usize) -> Self;
    /// Returns whether the edge `(u, v)` is present.
    fn test(&self, u: usize, v: usize) -> bool;
    /// Inserts the edge `(u, v)`.
    fn set(&mut self, u: usize, v: usize);
    /// Removes the edge `(u, v)`.
    fn clear(&mut self, u: usize, v: usize);
}

/// Full adjacency matrix: one bitset row per vertex, both directions stored.
#[derive(Clone, Debug)]
pub struct DenseStorage {
    rows: Vec<BitSet>,
}

impl EdgeStorage for DenseStorage {
    fn with_capacity(n: usize) -> Self {
        Self {
            rows: (0..n).map(|_| BitSet::with_capacity(n)).collect(),
        }
    }

    #[inline(always)]
    fn test(&self, u: usize, v: usize) -> bool {
        self.rows[u].contains(v)
    }

    #[inline(always)]
    fn set(&mut self, u: usize, v: usize) {
        self.rows[u].insert(v);
        self.rows[v].insert(u);
    }

    #[inline(always)]
    fn clear(&mut self, u: usize, v: usize) {
        self.rows[u].erase(v);
        self.rows[v].erase(u);
    }
}

/// Lower-triangular packed matrix backed by a single flat bit array.
///
/// The larger id selects the row, so `(u, v)` and `(v, u)` share one bit and
/// the representation cannot become asymmetric.
#[derive(Clone, Debug)]
pub struct TriangularStorage {
    bits: BitSet,
}

#[inline(always)]
fn triangular_index(u: usize, v: usize) -> usize {
    let (lo, hi) = if u < v { (u, v) } else { (v, u) };
    hi * (hi + 1) / 2 + lo
}

impl EdgeStorage for TriangularStorage {
    fn with_capacity(n: usize) -> Self {
        Self {
            bits: BitSet::with_capacity(n * (n + 1) / 2),
        }
    }

    #[inline(always)]
    fn test(&self, u: usize, v: usize) -> bool {
        self.bits.contains(triangular_index(u, v))
    }

    #[inline(always)]
    fn set(&mut self, u: usize, v: usize) {
        self.bits.insert(triangular_index(u, v));
    }

    #[inline(always)]
    fn clear(&mut self, u: usize, v: usize) {
        self.bits.erase(triangular_index(u, v));
    }
}

/// Ragged rows: row `i` holds only the bits for neighbors with id `<= i`.
#[derive(Clone, Debug)]
pub struct RaggedStorage {
    rows: Vec<BitSet>,
}

impl EdgeStorage for RaggedStorage {
    fn with_capacity(n: usize) -> Self {
        Self {
            rows: (0..n).map(|i| BitSet::with_capacity(i + 1)).collect(),
        }
    }

    #[inline(always)]
    fn test(&self, u: usize, v: usize) -> bool {
        let (lo, hi) = if u < v { (u, v) } else { (v, u) };
        self.rows[hi].contains(lo)
    }

    #[inline(always)]
    fn set(&mut self, u: usize, v: usize) {
        let (lo, hi) = if u < v { (u, v) } else { (v, u) };
        self.rows[hi].insert(lo);
    }

    #[inline(always)]
    fn clear(&mut self, u: usize, v: usize) {
        let (lo, hi) = if u < v { (u, v) } else { (v, u) };
        self.rows[hi].erase(lo);
    }
}

// ============================================================================
// Graph
// ============================================================================

/// Which end of the degree ordering the density sort selects first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extremum {
    /// Ascending degree order (lowest degree first).
    Min,
    /// Descending degree order (highest degree first).
    Max,
}

/// An undirected graph over one of the [`EdgeStorage`] variants.
///
/// The edge count comes from the input header (`set_parameters`) and is not
/// tracked through individual `add_edge`/`remove_edge` calls; it feeds the
/// density and Turán computations only.
#[derive(Clone, Debug)]
pub struct Graph<S> {
    n: usize,
    m: usize,
    storage: S,
}

impl<S: EdgeStorage> Default for Graph<S> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl<S: EdgeStorage> Graph<S> {
    /// Creates a graph with `n` vertices, `m` declared edges, and no edge bits.
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            n,
            m,
            storage: S::with_capacity(n),
        }
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn vertex_count(&self) -> usize {
        self.n
    }

    /// Declared number of edges.
    #[inline(always)]
    pub fn edge_count(&self) -> usize {
        self.m
    }

    /// Reallocates storage for the declared vertex/edge counts.
    pub fn set_parameters(&mut self, n: usize, m: usize) {
        self.n = n;
        self.m = m;
        self.storage = S::with_capacity(n);
    }

    /// Returns whether the edge `(u, v)` exists.
    #[inline(always)]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        debug_assert!(u < self.n && v < self.n);
        self.storage.test(u, v)
    }

    /// Adds the edge `(u, v)`.
    #[inline(always)]
    pub fn add_edge(&mut self, u: usize, v: usize) {
        debug_assert!(u < self.n && v < self.n);
        self.storage.set(u, v);
    }

    /// Removes the edge `(u, v)`.
    #[inline(always)]
    pub fn remove_edge(&mut self, u: usize, v: usize) {
        debug_assert!(u < self.n && v < self.n);
        self.storage.clear(u, v);
    }

    /// Exchanges the presence bits of two edges.
    pub fn swap_edge(&mut self, u1: usize, v1: usize, u2: usize, v2: usize) {
        let e1 = self.has_edge(u1, v1);
        let e2 = self.has_edge(u2, v2);

        if e1 {
            self.add_edge(u2, v2);
        } else {
            self.remove_edge(u2, v2);
        }

        if e2 {
            self.add_edge(u1, v1);
        } else {
            self.remove_edge(u1, v1);
        }
    }

    /// Exchanges the identities of vertices `a` and `b`.
    pub fn swap_vertex(&mut self, a: usize, b: usize) {
        for i in 0..self.n {
            // The counterpart endpoint is itself renamed by the swap.
            let actual = if i == a {
                b
            } else if i == b {
                a
            } else {
                i
            };
            self.swap_edge(a, i, b, actual);
        }
    }

    /// Edge density `2E / (V (V - 1))`.
    pub fn density(&self) -> f64 {
        let v = self.n as f64;
        2.0 * (self.m as f64) / (v * (v - 1.0))
    }

    /// Degree of `v` by row scan; storage-agnostic, O(V).
    pub fn degree_scan(&self, v: usize) -> usize {
        (0..self.n).filter(|&u| u != v && self.has_edge(v, u)).count()
    }

    /// Permutes vertex identities into degree order when the graph is dense
    /// enough for the O(V²) relabeling to pay off.
    ///
    /// Returns the label map: `labels[i]` is the original id of the vertex
    /// now called `i`, so reported solutions can be translated back.
    pub fn sort_by_degree(&mut self, density_threshold: f64, extremum: Extremum) -> Vec<u32> {
        let mut labels: Vec<u32> = (0..self.n as u32).collect();

        if self.n < 3 || self.density() < density_threshold {
            return labels;
        }

        let mut degrees: Vec<usize> = (0..self.n).map(|v| self.degree_scan(v)).collect();

        // Selection sort via pairwise vertex swaps so the storage stays
        // consistent with the new identities at every step.
        for pos in 0..self.n - 2 {
            let chosen = match extremum {
                Extremum::Min => (pos..self.n).min_by_key(|&i| degrees[i]),
                Extremum::Max => (pos..self.n).max_by_key(|&i| (degrees[i], std::cmp::Reverse(i))),
            }
            .unwrap_or(pos);

            if chosen != pos {
                degrees.swap(chosen, pos);
                labels.swap(chosen, pos);
                self.swap_vertex(pos, chosen);
            }
        }

        labels
    }
}

impl Graph<DenseStorage> {
    /// Degree of `v` via row popcount.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.storage.rows[v].len()
    }

    /// Borrowed neighbor bitset of `v`.
    #[inline(always)]
    pub fn neighbors(&self, v: usize) -> &BitSet {
        &self.storage.rows[v]
    }
}

// ============================================================================
// WeightedGraph
// ============================================================================

/// Dense graph with per-vertex weights and a live degree cache.
///
/// Invariant: `degree(v)` equals the popcount of row `v` after every
/// mutation, including soft vertex removal.
#[derive(Clone, Debug)]
pub struct WeightedGraph {
    n: usize,
    m: usize,
    rows: Vec<BitSet>,
    weights: Vec<u64>,
    degrees: Vec<u32>,
}

impl Default for WeightedGraph {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl WeightedGraph {
    /// Creates a weighted graph with `n` vertices and `m` declared edges.
    /// Weights default to zero until assigned.
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            n,
            m,
            rows: (0..n).map(|_| BitSet::with_capacity(n)).collect(),
            weights: vec![0; n],
            degrees: vec![0; n],
        }
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn vertex_count(&self) -> usize {
        self.n
    }

    /// Remaining number of edges (decremented by [`Self::remove_vertex`]).
    #[inline(always)]
    pub fn edge_count(&self) -> usize {
        self.m
    }

    /// Reallocates storage for the declared vertex/edge counts.
    pub fn set_parameters(&mut self, n: usize, m: usize) {
        *self = Self::new(n, m);
    }

    /// Returns whether the edge `(u, v)` exists.
    #[inline(always)]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        debug_assert!(u < self.n && v < self.n);
        self.rows[u].contains(v)
    }

    /// Adds the edge `(u, v)`, keeping the degree cache in sync.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        debug_assert!(u < self.n && v < self.n && u != v);
        if self.rows[u].contains(v) {
            return;
        }
        self.rows[u].insert(v);
        self.rows[v].insert(u);
        self.degrees[u] += 1;
        self.degrees[v] += 1;
    }

    /// Removes the edge `(u, v)`, keeping the degree cache in sync.
    pub fn remove_edge(&mut self, u: usize, v: usize) {
        debug_assert!(u < self.n && v < self.n);
        if !self.rows[u].contains(v) {
            return;
        }
        self.rows[u].erase(v);
        self.rows[v].erase(u);
        self.degrees[u] -= 1;
        self.degrees[v] -= 1;
    }

    /// Cached degree of `v`.
    #[inline(always)]
    pub fn degree(&self, v: usize) -> u32 {
        self.degrees[v]
    }

    /// Weight of `v`.
    #[inline(always)]
    pub fn weight(&self, v: usize) -> u64 {
        self.weights[v]
    }

    /// Assigns the weight of `v`.
    #[inline(always)]
    pub fn set_weight(&mut self, v: usize, weight: u64) {
        self.weights[v] = weight;
    }

    /// Borrowed neighbor bitset of `v`.
    #[inline(always)]
    pub fn neighbors(&self, v: usize) -> &BitSet {
        &self.rows[v]
    }

    /// Owned copy of the neighbor set of `v`.
    pub fn neighbors_set(&self, v: usize) -> BitSet {
        self.rows[v].clone()
    }

    /// Soft-deletes `v`: clears all incident edges and subtracts the removed
    /// degree from the edge count. The id stays valid but isolated; the
    /// vertex-id space is not compacted.
    pub fn remove_vertex(&mut self, v: usize) {
        debug_assert!(v < self.n);
        let removed = self.degrees[v] as usize;

        let snapshot = self.rows[v].clone();
        for u in snapshot.iter() {
            self.rows[u].erase(v);
            self.degrees[u] -= 1;
        }
        self.rows[v].clear();
        self.degrees[v] = 0;
        self.m -= removed;
    }

    /// Edge density `2E / (V (V - 1))`.
    pub fn density(&self) -> f64 {
        let v = self.n as f64;
        2.0 * (self.m as f64) / (v * (v - 1.0))
    }
}

// ============================================================================
// Tests
// ============================================================================
