//! Incremental k-opt local search for large cliques.
//!
//! The search walks between cliques by chains of single-vertex add and drop
//! moves, scored against the best clique seen along the chain. The moves are
//! made cheap by a set of auxiliary structures maintained incrementally:
//!
//! - `possible_additions` (PA): vertices adjacent to the whole clique.
//! - `one_missing` (OM): vertices missing exactly one clique member.
//! - `missing_list[v]`: the clique members `v` is not adjacent to; a clique
//!   member lists itself, so PA membership is exactly `missing_count == 0`.
//! - `degree_pa[v]`: for `v` in PA, its degree in the subgraph induced by PA.
//!
//! A chain forbids revisiting vertices (the set `P`) and ends once every
//! member of the starting clique has been dropped; if the chain improved on
//! the start the walk restarts from the improvement.
//!
//! Multi-start: one independent chain per start vertex, run in parallel with
//! per-start RNGs split from one root seed so runs are reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::bitset::BitSet;
use crate::branch_bound::CliqueResult;
use crate::graph::{EdgeStorage, Graph};

/// SplitMix64 step, used to derive independent per-start seeds.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

// ============================================================================
// Auxiliary sets
// ============================================================================

/// Incrementally maintained move-evaluation state for one clique.
#[derive(Clone, Debug)]
pub struct AuxiliarySets {
    /// Vertices adjacent to every clique member.
    pub possible_additions: BitSet,
    /// Vertices missing exactly one clique member.
    pub one_missing: BitSet,
    /// Per vertex, the clique members it is not adjacent to. A clique member
    /// counts itself.
    missing_list: Vec<BitSet>,
    /// Popcount cache of `missing_list`, so size transitions are O(1).
    missing_count: Vec<u32>,
    /// Degree within the PA-induced subgraph, valid for PA members.
    degree_pa: Vec<u32>,
}

impl AuxiliarySets {
    /// Empty state for an `n`-vertex graph (matches the empty clique).
    pub fn new(n: usize) -> Self {
        Self {
            possible_additions: BitSet::with_capacity(n),
            one_missing: BitSet::with_capacity(n),
            missing_list: (0..n).map(|_| BitSet::with_capacity(n)).collect(),
            missing_count: vec![0; n],
            degree_pa: vec![0; n],
        }
    }

    /// Missing-member count of `v` against the current clique.
    #[inline]
    pub fn missing_count(&self, v: usize) -> u32 {
        self.missing_count[v]
    }

    /// PA-induced degree of `v`; meaningful only while `v` is in PA.
    #[inline]
    pub fn degree_pa(&self, v: usize) -> u32 {
        self.degree_pa[v]
    }
}

// ============================================================================
// Local search driver
// ============================================================================

/// Shared, read-only context for every chain over one graph.
pub struct LocalSearch<'a, S> {
    graph: &'a Graph<S>,
    /// Complement adjacency lists: for each vertex, the vertices it is NOT
    /// connected to.
    missing_connections: Vec<Vec<u32>>,
}

impl<'a, S: EdgeStorage> LocalSearch<'a, S> {
    /// Precomputes the complement adjacency lists for `graph`.
    pub fn new(graph: &'a Graph<S>) -> Self {
        let n = graph.vertex_count();
        let mut missing_connections: Vec<Vec<u32>> = vec![Vec::new(); n];
        for v in 0..n {
            for o in 0..v {
                if !graph.has_edge(v, o) {
                    missing_connections[v].push(o as u32);
                    missing_connections[o].push(v as u32);
                }
            }
        }
        Self {
            graph,
            missing_connections,
        }
    }

    /// Rebuilds every auxiliary structure from scratch for `clique`.
    pub fn recompute(&self, clique: &BitSet, aux: &mut AuxiliarySets) {
        let n = self.graph.vertex_count();

        aux.possible_additions.clear();
        aux.one_missing.clear();
        for v in 0..n {
            aux.missing_list[v].clear();
            aux.missing_count[v] = 0;
            aux.degree_pa[v] = 0;
        }

        for v in clique.iter() {
            aux.missing_list[v].insert(v);
            aux.missing_count[v] += 1;
            for &o in &self.missing_connections[v] {
                aux.missing_list[o as usize].insert(v);
                aux.missing_count[o as usize] += 1;
            }
        }

        for v in 0..n {
            match aux.missing_count[v] {
                0 => aux.possible_additions.insert(v),
                1 => aux.one_missing.insert(v),
                _ => {}
            }
        }

        let pa_members: Vec<usize> = aux.possible_additions.iter().collect();
        for &v in &pa_members {
            aux.degree_pa[v] = pa_members
                .iter()
                .filter(|&&o| o != v && self.graph.has_edge(v, o))
                .count() as u32;
        }
    }

    /// One full local-search run from `clique` (with `aux` matching it).
    /// Returns the best clique reached.
    pub fn k_opt(&self, mut clique: BitSet, aux: &mut AuxiliarySets, rng: &mut SmallRng) -> BitSet {
        let n = self.graph.vertex_count();

        loop {
            // P: vertices not yet moved in this chain.
            let mut p = BitSet::with_capacity(n);
            p.fill();

            let mut gain: i32 = 0;
            let mut best_gain: i32 = 0;

            let previous = clique.clone();
            // Members of the starting clique not yet dropped; the chain runs
            // until all of them are gone.
            let mut d = previous.clone();

            let mut best = BitSet::with_capacity(n);

            while !d.is_empty() {
                let candidates = aux.possible_additions.intersection_with(&p);
                let m;
                let is_add = !candidates.is_empty();

                if is_add {
                    // Add the candidate with the largest PA-induced degree,
                    // random among ties.
                    let mut ties: Vec<usize> = Vec::new();
                    let mut maximum = 0u32;
                    for v in candidates.iter() {
                        let deg = aux.degree_pa[v];
                        if deg == maximum {
                            ties.push(v);
                        } else if deg > maximum {
                            maximum = deg;
                            ties.clear();
                            ties.push(v);
                        }
                    }
                    m = ties[rng.random_range(0..ties.len())];

                    clique.insert(m);
                    gain += 1;
                    p.erase(m);

                    if gain > best_gain {
                        best_gain = gain;
                        best = clique.clone();
                    }
                } else {
                    // Drop the member blocking the most one-missing vertices,
                    // random among ties.
                    let droppable = clique.intersection_with(&p);
                    let mut ties: Vec<usize> = Vec::new();
                    let mut maximum = 0u32;
                    for v in droppable.iter() {
                        let mut frequency = 0u32;
                        for om in aux.one_missing.iter() {
                            if aux.missing_list[om].contains(v) {
                                frequency += 1;
                            }
                        }
                        if frequency == maximum {
                            ties.push(v);
                        } else if frequency > maximum {
                            ties.clear();
                            ties.push(v);
                            maximum = frequency;
                        }
                    }
                    debug_assert!(!ties.is_empty());
                    m = ties[rng.random_range(0..ties.len())];

                    clique.erase(m);
                    gain -= 1;
                    p.erase(m);

                    if previous.contains(m) {
                        d.erase(m);
                    }
                }

                self.incremental_update(m, is_add, aux);
            }

            clique = if best_gain > 0 { best } else { previous };
            self.recompute(&clique, aux);

            if best_gain <= 0 {
                return clique;
            }
        }
    }

    /// Single-move update of the auxiliary sets after adding or dropping `v`.
    pub fn incremental_update(&self, v: usize, is_add: bool, aux: &mut AuxiliarySets) {
        if is_add {
            aux.missing_list[v].insert(v);
            aux.missing_count[v] += 1;
            match aux.missing_count[v] {
                1 => {
                    self.pa_remove(aux, v);
                    aux.one_missing.insert(v);
                }
                2 => {
                    aux.one_missing.erase(v);
                }
                _ => {}
            }

            for &j in &self.missing_connections[v] {
                let j = j as usize;
                aux.missing_list[j].insert(v);
                aux.missing_count[j] += 1;

                match aux.missing_count[j] {
                    1 => {
                        self.pa_remove(aux, j);
                        aux.one_missing.insert(j);
                    }
                    2 => {
                        aux.one_missing.erase(j);
                    }
                    _ => {}
                }
            }
        } else {
            aux.one_missing.erase(v);
            aux.missing_list[v].erase(v);
            aux.missing_count[v] -= 1;
            if aux.missing_count[v] == 0 {
                self.pa_insert(aux, v);
            } else if aux.missing_count[v] == 1 {
                aux.one_missing.insert(v);
            }

            for &j in &self.missing_connections[v] {
                let j = j as usize;
                aux.missing_list[j].erase(v);
                aux.missing_count[j] -= 1;

                match aux.missing_count[j] {
                    0 => {
                        aux.one_missing.erase(j);
                        self.pa_insert(aux, j);
                    }
                    1 => {
                        aux.one_missing.insert(j);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Inserts `x` into PA, restoring the induced-degree cache: `x` gets a
    /// fresh count and every PA neighbor of `x` gains one.
    fn pa_insert(&self, aux: &mut AuxiliarySets, x: usize) {
        if aux.possible_additions.contains(x) {
            return;
        }
        let mut own = 0u32;
        let members: Vec<usize> = aux.possible_additions.iter().collect();
        for y in members {
            if self.graph.has_edge(x, y) {
                aux.degree_pa[y] += 1;
                own += 1;
            }
        }
        aux.degree_pa[x] = own;
        aux.possible_additions.insert(x);
    }

    /// Removes `x` from PA; every remaining PA neighbor of `x` loses one.
    fn pa_remove(&self, aux: &mut AuxiliarySets, x: usize) {
        if !aux.possible_additions.contains(x) {
            return;
        }
        aux.possible_additions.erase(x);
        let members: Vec<usize> = aux.possible_additions.iter().collect();
        for y in members {
            if self.graph.has_edge(x, y) {
                aux.degree_pa[y] -= 1;
            }
        }
    }
}

/// Runs one chain per start vertex in parallel and returns the best clique
/// found. Per-start RNGs are split from `seed`, so runs repeat exactly.
pub fn multi_start<S: EdgeStorage + Sync>(graph: &Graph<S>, seed: u64) -> CliqueResult {
    let n = graph.vertex_count();
    if n == 0 {
        return CliqueResult { members: Vec::new() };
    }

    let search = LocalSearch::new(graph);

    let best = (0..n)
        .into_par_iter()
        .map(|start| {
            let mut rng = SmallRng::seed_from_u64(splitmix64(seed.wrapping_add(start as u64)));

            let mut clique = BitSet::with_capacity(n);
            clique.insert(start);

            let mut aux = AuxiliarySets::new(n);
            search.recompute(&clique, &mut aux);
            search.k_opt(clique, &mut aux, &mut rng)
        })
        .max_by_key(|clique| clique.len());

    let members = best
        .map(|clique| clique.iter().map(|v| v as u32).collect())
        .unwrap_or_default();
    CliqueResult { members }
}
