//! Initial lower-bound estimation for the maximum clique size.
//!
//! Two cheap estimates are combined before the exact search starts:
//!
//! - The clique number equals the independence number of the complement, and
//!   the independence number is at least `V / X` where `X` is any upper bound
//!   on the complement's chromatic number. A greedy coloring of the
//!   complement supplies such an `X`.
//! - Turán's bound `V² / (V² - 2E)`, applicable when `V² > 2E`.
//!
//! Seeding the search with the larger of the two lets the very first descent
//! prune subtrees a bound of zero would have to walk.

use crate::graph::{EdgeStorage, Graph};
use crate::bitset::BitSet;

/// Greedily colors the complement graph and returns the number of colors
/// used. This upper-bounds the complement's chromatic number.
pub fn greedy_complement_coloring<S: EdgeStorage>(graph: &Graph<S>) -> usize {
    let n = graph.vertex_count();
    if n == 0 {
        return 0;
    }

    // colors[v] == 0 means uncolored; real colors start at 1.
    let mut colors = vec![0usize; n];
    colors[0] = 1;

    let mut unavailable = BitSet::with_capacity(n + 1);

    for i in 1..n {
        // Sentinel occupying the "uncolored" slot so first_unset lands on a
        // real color.
        unavailable.insert(0);

        for j in 0..n {
            // A non-edge here is an edge of the complement.
            if i != j && !graph.has_edge(i, j) && colors[j] != 0 {
                unavailable.insert(colors[j]);
            }
        }

        // At most n - 1 colors are blocked, so a slot below n + 1 is free.
        colors[i] = unavailable.first_unset().unwrap_or(n);

        unavailable.clear();
    }

    colors.iter().copied().max().unwrap_or(1)
}

/// Initial lower bound for the maximum clique size: the better of the
/// coloring-derived bound `V / X` and Turán's bound.
pub fn initial_clique_lower_bound<S: EdgeStorage>(graph: &Graph<S>) -> usize {
    let n = graph.vertex_count();
    if n == 0 {
        return 0;
    }

    let complement_colors = greedy_complement_coloring(graph);
    let mut bound = n / complement_colors;

    let m = graph.edge_count();
    if n * n > 2 * m {
        bound = bound.max(n * n / (n * n - 2 * m));
    }

    bound
}
