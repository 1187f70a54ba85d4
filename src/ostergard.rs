//! Exact maximum clique via Östergård's vertex-ordering algorithm.
//!
//! Vertices are processed in ascending id order. Iteration `i` finds the
//! largest clique that contains vertex `i` and otherwise only vertices with
//! smaller ids; its size is memoized as `c[i]`. Two prunes follow:
//!
//! - `c[i]` grows by at most one per iteration, so the first improving leaf
//!   inside iteration `i` is optimal for it and the `found` flag unwinds the
//!   whole recursion immediately.
//! - During expansion the pivot is the highest-id candidate `p`; if the
//!   committed size plus `c[p]` cannot beat the incumbent, no candidate can,
//!   since every remaining candidate has an id at most `p`.
//!
//! Candidate sets live in bitsets, so the intersection with a neighbor row
//! is a handful of word ANDs.

use crate::bitset::BitSet;
use crate::branch_bound::{CliqueResult, SORT_DENSITY_THRESHOLD};
use crate::graph::{DenseStorage, Extremum, Graph};

struct Search<'a> {
    graph: &'a Graph<DenseStorage>,
    best: BitSet,
    best_size: usize,
    temp: BitSet,
    found: bool,
    /// c[i]: size of the largest clique within vertices `0..=i` containing `i`.
    c: Vec<usize>,
}

impl Search<'_> {
    fn expand(&mut self, active: &BitSet, neighbors: &BitSet, size: usize) {
        let mut next = active.intersection_with(neighbors);
        let mut remaining = next.len();

        if remaining == 0 {
            if size > self.best_size {
                self.best_size = size;
                self.best = self.temp.clone();
                self.found = true;
            }
            return;
        }

        while remaining != 0 {
            if size + remaining <= self.best_size {
                return;
            }

            // Highest-id candidate; its memoized bound caps everything left.
            let pivot = match next.last_set() {
                Some(v) => v,
                None => return,
            };

            if size + self.c[pivot] <= self.best_size {
                return;
            }

            self.temp.insert(pivot);
            next.erase(pivot);

            let neighbors = self.graph.neighbors(pivot).clone();
            self.expand(&next, &neighbors, size + 1);

            if self.found {
                return;
            }

            self.temp.erase(pivot);
            remaining -= 1;
        }
    }
}

/// Finds a maximum clique of `graph`.
///
/// The graph is relabeled in place by the degree sort; the result is
/// translated back to the original ids.
pub fn max_clique(graph: &mut Graph<DenseStorage>) -> CliqueResult {
    let n = graph.vertex_count();
    if n == 0 {
        return CliqueResult { members: Vec::new() };
    }

    let labels = graph.sort_by_degree(SORT_DENSITY_THRESHOLD, Extremum::Max);

    let mut search = Search {
        graph,
        best: BitSet::with_capacity(n),
        best_size: 0,
        temp: BitSet::with_capacity(n),
        found: false,
        c: vec![n; n],
    };

    for i in 0..n {
        search.found = false;

        search.temp.clear();
        search.temp.insert(i);

        // Candidates: strictly smaller ids.
        let mut active = BitSet::with_capacity(n);
        for v in 0..i {
            active.insert(v);
        }

        let neighbors = search.graph.neighbors(i).clone();
        search.expand(&active, &neighbors, 1);
        search.c[i] = search.best_size;
    }

    let members = search
        .best
        .iter()
        .map(|v| labels[v])
        .collect();
    CliqueResult { members }
}
