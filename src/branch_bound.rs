//! Exact maximum clique via iterative branch and bound.
//!
//! The recursion is flattened into explicit per-depth cursor arrays so the
//! hot loop touches nothing but a few contiguous buffers: `start[d]` and
//! `last[d]` delimit the candidate row for depth `d`, and `rows[d - 1]`
//! holds the candidates themselves. Depth `d` means `d - 1` vertices are
//! committed to the growing clique.
//!
//! Pruning: a subtree is abandoned when the committed vertices plus all
//! remaining candidates cannot beat the incumbent. Until a first incumbent
//! exists the search always descends, which guarantees `best` is populated
//! even on edgeless inputs.

use crate::bounds::initial_clique_lower_bound;
use crate::graph::{EdgeStorage, Extremum, Graph};

/// Density above which the preliminary degree sort is worth its O(V²) cost.
pub const SORT_DENSITY_THRESHOLD: f64 = 0.40;

/// A maximum clique, reported in the caller's original vertex ids.
#[derive(Clone, Debug)]
pub struct CliqueResult {
    /// Members of the clique.
    pub members: Vec<u32>,
}

impl CliqueResult {
    /// Clique size.
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Finds a maximum clique of `graph`.
///
/// The graph is relabeled in place by the degree sort; the result is
/// translated back to the original ids.
pub fn max_clique<S: EdgeStorage>(graph: &mut Graph<S>) -> CliqueResult {
    let n = graph.vertex_count();
    if n == 0 {
        return CliqueResult { members: Vec::new() };
    }

    let labels = graph.sort_by_degree(SORT_DENSITY_THRESHOLD, Extremum::Min);

    let mut max_clique = initial_clique_lower_bound(graph);

    // Cursor state, indexed by depth (1-based so depth 0 terminates the
    // loop). start[d] is the 1-based position of the vertex currently
    // expanded at depth d; last[d] is the candidate count.
    let mut start = vec![0usize; n + 2];
    let mut last = vec![0usize; n + 2];
    let mut depth = 1usize;
    start[1] = 0;
    last[1] = n;

    let mut best = vec![0u32; n + 1];
    let mut stored_best = false;

    // rows[d - 1] holds the candidate vertices for depth d.
    let mut rows: Vec<Vec<u32>> = vec![vec![0u32; n]; n + 1];
    for v in 0..n {
        rows[0][v] = v as u32;
    }

    while depth > 0 {
        start[depth] += 1;

        // start <= last + 1 always holds, so no wrap here.
        if depth + last[depth] - start[depth] > max_clique || !stored_best {
            let prev = depth;
            let from = rows[prev - 1][start[prev] - 1] as usize;
            depth += 1;
            start[depth] = 0;
            last[depth] = 0;

            // Candidates for the next depth: remaining candidates of this
            // depth adjacent to the chosen vertex.
            for col in (start[prev] + 1)..=last[prev] {
                let to = rows[prev - 1][col - 1];
                if graph.has_edge(from, to as usize) {
                    rows[prev][last[depth]] = to;
                    last[depth] += 1;
                }
            }

            // A leaf: check whether the path beats the incumbent.
            if last[depth] == 0 {
                depth -= 1;
                if depth > max_clique || !stored_best {
                    max_clique = depth;
                    for col in 1..=depth {
                        best[col] = rows[col - 1][start[col] - 1];
                    }
                    stored_best = true;
                }
            }
        } else {
            depth -= 1;
        }
    }

    let members = (1..=max_clique)
        .map(|col| labels[best[col] as usize])
        .collect();
    CliqueResult { members }
}
