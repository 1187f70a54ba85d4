//! Minimum weighted vertex cover: reductions, exact branch and bound, and
//! the pricing approximation.
//!
//! The exact pipeline is reduce, decompose, search:
//!
//! 1. Four reduction rules shrink the graph to a fixpoint, moving forced
//!    vertices straight into the cover.
//! 2. The remaining vertices split into connected components; each is
//!    solved independently, seeded with the whole component as the first
//!    incumbent (trivially a cover).
//! 3. The search branches on a heuristic-chosen vertex: either it joins the
//!    cover, or all its active neighbors do. A clique-partition lower bound
//!    prunes: within any clique, all members but the heaviest must be
//!    covered.
//!
//! The incumbent weight is threaded through the recursion next to the
//! incumbent set, so the prune never re-sums it.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::bitset::BitSet;
use crate::graph::WeightedGraph;

// ============================================================================
// Reductions
// ============================================================================

/// Drops isolated vertices from the active set; none of them can be needed.
pub fn reduce_degree0(graph: &WeightedGraph, active: &mut BitSet) -> bool {
    let mut edited = false;
    for v in active.clone().iter() {
        if graph.degree(v) == 0 {
            active.erase(v);
            edited = true;
        }
    }
    edited
}

/// If a vertex outweighs its whole neighborhood, taking the neighborhood is
/// never worse: move N(v) into the cover and discard v.
pub fn reduce_adjacent(graph: &mut WeightedGraph, active: &mut BitSet, cover: &mut BitSet) -> bool {
    let mut edited = false;
    for v in active.clone().iter() {
        if !active.contains(v) {
            continue;
        }

        let neighbours = graph.neighbors_set(v);
        let weight: u64 = neighbours.iter().map(|u| graph.weight(u)).sum();

        if graph.weight(v) >= weight {
            for u in neighbours.iter() {
                active.erase(u);
                graph.remove_vertex(u);
                cover.insert(u);
            }
            active.erase(v);
            graph.remove_vertex(v);
            edited = true;
        }
    }
    edited
}

/// If the degree-1 neighbors of a vertex together outweigh it, the vertex
/// itself goes into the cover and those leaves disappear.
pub fn reduce_degree1(graph: &mut WeightedGraph, active: &mut BitSet, cover: &mut BitSet) -> bool {
    let mut edited = false;
    for v in active.clone().iter() {
        if !active.contains(v) {
            continue;
        }

        let mut weight = 0u64;
        let mut leaves = Vec::new();
        for u in graph.neighbors_set(v).iter() {
            if graph.degree(u) == 1 {
                weight += graph.weight(u);
                leaves.push(u);
            }
        }

        if graph.weight(v) <= weight {
            for u in leaves {
                active.erase(u);
                graph.remove_vertex(u);
            }
            active.erase(v);
            graph.remove_vertex(v);
            cover.insert(v);
            edited = true;
        }
    }
    edited
}

/// Pair rule: if the common degree-2 neighbors of two vertices outweigh the
/// pair, both enter the cover and the shared leaves disappear.
pub fn reduce_degree2(graph: &mut WeightedGraph, active: &mut BitSet, cover: &mut BitSet) -> bool {
    let mut edited = false;
    for v1 in active.clone().iter() {
        if !active.contains(v1) {
            continue;
        }
        for v2 in active.clone().iter() {
            if v1 == v2 || !active.contains(v1) || !active.contains(v2) {
                continue;
            }

            let neighbours1 = graph.neighbors_set(v1);
            let mut weight = 0u64;
            let mut shared = Vec::new();
            for u in graph.neighbors_set(v2).iter() {
                if neighbours1.contains(u) && graph.degree(u) == 2 {
                    weight += graph.weight(u);
                    shared.push(u);
                }
            }

            if graph.weight(v1) + graph.weight(v2) <= weight {
                for u in shared {
                    active.erase(u);
                    graph.remove_vertex(u);
                }
                active.erase(v1);
                active.erase(v2);
                graph.remove_vertex(v1);
                graph.remove_vertex(v2);
                cover.insert(v1);
                cover.insert(v2);
                edited = true;
            }
        }
    }
    edited
}

/// Applies all reduction rules until none of them changes the active set.
pub fn reduce(graph: &mut WeightedGraph, active: &mut BitSet, cover: &mut BitSet) {
    loop {
        let size = active.len();

        while reduce_degree0(graph, active) {}
        while reduce_adjacent(graph, active, cover) {}
        while reduce_degree1(graph, active, cover) {}
        while reduce_degree2(graph, active, cover) {}

        if size == active.len() {
            break;
        }
    }
}

// ============================================================================
// Branch and bound
// ============================================================================

/// Branch-vertex selection rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchHeuristic {
    /// Highest degree first.
    GreatestDegree,
    /// Uniformly random active vertex.
    Random,
    /// Lowest weight first.
    SmallestWeight,
    /// Highest degree-to-weight ratio first.
    DegreeWeightRatio,
}

/// How the degree/weight ratio is compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatioRule {
    /// Integer division, so small ratios collapse to the same bucket.
    Truncated,
    /// Cross-multiplied exact comparison.
    Exact,
}

/// Knobs for [`bmwvc`].
#[derive(Clone, Debug)]
pub struct CoverConfig {
    /// Branch-vertex selection rule.
    pub heuristic: BranchHeuristic,
    /// Comparison rule backing [`BranchHeuristic::DegreeWeightRatio`].
    pub ratio_rule: RatioRule,
    /// Seed for the random branch heuristic.
    pub seed: u64,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            heuristic: BranchHeuristic::GreatestDegree,
            ratio_rule: RatioRule::Truncated,
            seed: 0,
        }
    }
}

/// A vertex cover and its total weight.
#[derive(Clone, Debug)]
pub struct CoverSolution {
    /// Members in ascending id order.
    pub members: Vec<u32>,
    /// Total weight of the members.
    pub weight: u64,
}

struct CoverState {
    members: BitSet,
    weight: u64,
}

struct CoverSearch<'a> {
    graph: &'a WeightedGraph,
    /// Neighbor snapshots taken once after reduction.
    neighbours: Vec<BitSet>,
    heuristic: BranchHeuristic,
    ratio_rule: RatioRule,
    rng: SmallRng,
}

impl CoverSearch<'_> {
    /// Greedy clique partition of the active vertices. Any cover must pay
    /// for every clique member except the heaviest, so the partition sums to
    /// a lower bound.
    fn lower_bound(&self, active: &BitSet) -> u64 {
        let mut active = active.clone();
        let mut result = 0u64;

        while let Some(start) = active.first_set() {
            active.erase(start);
            let mut candidates = self.neighbours[start].intersection_with(&active);

            let mut clique_weight = self.graph.weight(start);
            let mut heaviest = clique_weight;

            while let Some(selected) = candidates.first_set() {
                active.erase(selected);
                let w = self.graph.weight(selected);
                clique_weight += w;
                if w > heaviest {
                    heaviest = w;
                }
                // No self loops, so this also drops `selected` itself.
                candidates = candidates.intersection_with(&self.neighbours[selected]);
            }

            result += clique_weight - heaviest;
        }
        result
    }

    fn ratio_beats(&self, v: usize, incumbent: usize) -> bool {
        let dv = u64::from(self.graph.degree(v));
        let wv = self.graph.weight(v);
        let di = u64::from(self.graph.degree(incumbent));
        let wi = self.graph.weight(incumbent);
        match self.ratio_rule {
            RatioRule::Truncated => {
                let rv = if wv == 0 { u64::MAX } else { dv / wv };
                let ri = if wi == 0 { u64::MAX } else { di / wi };
                rv > ri
            }
            RatioRule::Exact => dv.saturating_mul(wi) > di.saturating_mul(wv),
        }
    }

    fn pick_branch_vertex(&mut self, active: &BitSet) -> usize {
        let Some(first) = active.first_set() else {
            return 0;
        };

        match self.heuristic {
            BranchHeuristic::GreatestDegree => {
                let mut v = first;
                for u in active.iter() {
                    if self.graph.degree(u) > self.graph.degree(v) {
                        v = u;
                    }
                }
                v
            }
            BranchHeuristic::Random => {
                let skip = self.rng.random_range(0..active.len());
                active.iter().nth(skip).unwrap_or(first)
            }
            BranchHeuristic::SmallestWeight => {
                let mut v = first;
                for u in active.iter() {
                    if self.graph.weight(u) < self.graph.weight(v) {
                        v = u;
                    }
                }
                v
            }
            BranchHeuristic::DegreeWeightRatio => {
                let mut v = first;
                for u in active.iter() {
                    if self.ratio_beats(u, v) {
                        v = u;
                    }
                }
                v
            }
        }
    }

    fn search(&mut self, active: &mut BitSet, cover: &mut BitSet, cover_weight: u64, best: &mut CoverState) {
        if active.is_empty() {
            if cover_weight < best.weight {
                best.members = cover.clone();
                best.weight = cover_weight;
            }
            return;
        }

        if self.lower_bound(active) + cover_weight >= best.weight {
            return;
        }

        let v = self.pick_branch_vertex(active);

        // Branch 1: v joins the cover.
        active.erase(v);
        cover.insert(v);
        self.search(active, cover, cover_weight + self.graph.weight(v), best);
        cover.erase(v);

        // Branch 2: v stays out, so every active neighbor must join.
        let moved = self.neighbours[v].intersection_with(active);
        let mut added = 0u64;
        for u in moved.iter() {
            active.erase(u);
            cover.insert(u);
            added += self.graph.weight(u);
        }
        self.search(active, cover, cover_weight + added, best);

        active.insert(v);
        for u in moved.iter() {
            active.insert(u);
            cover.erase(u);
        }
    }
}

/// Splits the active vertices into connected components by flood fill.
fn components(active: &BitSet, neighbours: &[BitSet]) -> Vec<BitSet> {
    let mut remaining = active.clone();
    let mut result = Vec::new();

    while let Some(seed) = remaining.first_set() {
        let mut component = BitSet::with_capacity(active.capacity());
        let mut queue = VecDeque::new();
        component.insert(seed);
        queue.push_back(seed);

        while let Some(v) = queue.pop_front() {
            remaining.erase(v);
            for u in neighbours[v].intersection_with(&remaining).iter() {
                if !component.contains(u) {
                    component.insert(u);
                    queue.push_back(u);
                }
            }
        }
        result.push(component);
    }
    result
}

/// Exact minimum weighted vertex cover.
///
/// The graph is consumed destructively: reductions soft-delete vertices.
/// Weights are read from the (unchanged) weight array for the final total.
pub fn bmwvc(graph: &mut WeightedGraph, config: &CoverConfig) -> CoverSolution {
    let n = graph.vertex_count();

    let mut active = BitSet::with_capacity(n);
    active.fill();
    let mut cover = BitSet::with_capacity(n);

    reduce(graph, &mut active, &mut cover);

    let graph = &*graph;
    let neighbours: Vec<BitSet> = (0..n).map(|v| graph.neighbors_set(v)).collect();

    let mut searcher = CoverSearch {
        graph,
        neighbours,
        heuristic: config.heuristic,
        ratio_rule: config.ratio_rule,
        rng: SmallRng::seed_from_u64(config.seed),
    };

    for mut component in components(&active, &searcher.neighbours) {
        // The whole component is itself a cover: a safe first incumbent.
        let weight = component.iter().map(|v| graph.weight(v)).sum();
        let mut best = CoverState {
            members: component.clone(),
            weight,
        };
        let mut partial = BitSet::with_capacity(n);
        searcher.search(&mut component, &mut partial, 0, &mut best);
        cover.insert_all(&best.members);
    }

    let weight = cover.iter().map(|v| graph.weight(v)).sum();
    CoverSolution {
        members: cover.iter().map(|v| v as u32).collect(),
        weight,
    }
}

// ============================================================================
// Pricing approximation
// ============================================================================

/// Edge ordering for the pricing pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum EdgeOrder {
    /// Descending first-endpoint id.
    FirstVertex,
    MaxDegree,
    MinDegree,
    TotalDegree,
    MaxWeight,
    MinWeight,
}

fn edge_key(graph: &WeightedGraph, order: EdgeOrder, (u, v): (usize, usize)) -> u64 {
    match order {
        EdgeOrder::FirstVertex => u as u64,
        EdgeOrder::MaxDegree => u64::from(graph.degree(u).max(graph.degree(v))),
        EdgeOrder::MinDegree => u64::from(graph.degree(u).min(graph.degree(v))),
        EdgeOrder::TotalDegree => u64::from(graph.degree(u) + graph.degree(v)),
        EdgeOrder::MaxWeight => graph.weight(u).max(graph.weight(v)),
        EdgeOrder::MinWeight => graph.weight(u).min(graph.weight(v)),
    }
}

/// Primal-dual pricing pass: walks the edges in descending key order and,
/// for each unpaid edge, buys the endpoint whose residual weight runs out
/// first. Fast, and every edge ends up with a bought endpoint.
pub fn pricing_method(graph: &WeightedGraph, order: EdgeOrder) -> CoverSolution {
    let n = graph.vertex_count();

    let mut edges: Vec<(usize, usize)> = Vec::with_capacity(graph.edge_count());
    for u in 0..n {
        for v in graph.neighbors(u).iter() {
            if u < v {
                edges.push((u, v));
            }
        }
    }
    edges.sort_by_key(|&e| std::cmp::Reverse(edge_key(graph, order, e)));

    let mut residual: Vec<u64> = (0..n).map(|v| graph.weight(v)).collect();
    let mut cover = BitSet::with_capacity(n);
    let mut total = 0u64;

    for (from, to) in edges {
        if cover.contains(from) || cover.contains(to) {
            continue;
        }

        let (min_vertex, max_vertex) = if residual[from] < residual[to] {
            (from, to)
        } else {
            (to, from)
        };

        let paid = residual[min_vertex];
        residual[min_vertex] = 0;
        residual[max_vertex] = residual[max_vertex].saturating_sub(paid);
        total += graph.weight(min_vertex);
        cover.insert(min_vertex);
    }

    CoverSolution {
        members: cover.iter().map(|v| v as u32).collect(),
        weight: total,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn build(n: usize, edges: &[(usize, usize)], weights: &[u64]) -> WeightedGraph {
        let mut g = WeightedGraph::new(n, edges.len());
        for &(u, v) in edges {
            g.add_edge(u, v);
        }
        for (v, &w) in weights.iter().enumerate() {
            g.set_weight(v, w);
        }
        g
    }

    fn random_instance(rng: &mut XorShiftRng, n: usize, p: f64) -> WeightedGraph {
        let mut edges = Vec::new();
        for u in 0..n {
            for v in (u + 1)..n {
                if rng.random_bool(p) {
                    edges.push((u, v));
                }
            }
        }
        let weights: Vec<u64> = (0..n).map(|_| rng.random_range(1..20)).collect();
        build(n, &edges, &weights)
    }

    fn is_cover(g: &WeightedGraph, members: &[u32]) -> bool {
        let n = g.vertex_count();
        let in_cover = |v: usize| members.contains(&(v as u32));
        (0..n).all(|u| {
            g.neighbors(u)
                .iter()
                .all(|v| in_cover(u) || in_cover(v))
        })
    }

    fn brute_min_cover_weight(g: &WeightedGraph) -> u64 {
        let n = g.vertex_count();
        let mut edges = Vec::new();
        for u in 0..n {
            for v in g.neighbors(u).iter() {
                if u < v {
                    edges.push((u, v));
                }
            }
        }
        let mut best = u64::MAX;
        for mask in 0u32..(1 << n) {
            if edges
                .iter()
                .all(|&(u, v)| mask & (1 << u) != 0 || mask & (1 << v) != 0)
            {
                let w = (0..n)
                    .filter(|&v| mask & (1 << v) != 0)
                    .map(|v| g.weight(v))
                    .sum();
                best = best.min(w);
            }
        }
        best
    }

    #[test]
    fn matches_brute_force_on_random_instances() {
        let mut rng = XorShiftRng::seed_from_u64(0xC0FE);
        for _ in 0..30 {
            let n = rng.random_range(1..11);
            let p = rng.random_range(0.1..0.8);
            let original = random_instance(&mut rng, n, p);
            let mut g = original.clone();

            let solution = bmwvc(&mut g, &CoverConfig::default());

            assert!(is_cover(&original, &solution.members));
            assert_eq!(solution.weight, brute_min_cover_weight(&original));
            assert_eq!(
                solution.weight,
                solution
                    .members
                    .iter()
                    .map(|&v| original.weight(v as usize))
                    .sum::<u64>()
            );
        }
    }

    #[test]
    fn every_heuristic_is_exact() {
        let mut rng = XorShiftRng::seed_from_u64(0xBEA7);
        let heuristics = [
            BranchHeuristic::GreatestDegree,
            BranchHeuristic::Random,
            BranchHeuristic::SmallestWeight,
            BranchHeuristic::DegreeWeightRatio,
        ];
        for _ in 0..8 {
            let n = rng.random_range(2..10);
            let original = random_instance(&mut rng, n, 0.5);
            let expected = brute_min_cover_weight(&original);

            for heuristic in heuristics {
                for ratio_rule in [RatioRule::Truncated, RatioRule::Exact] {
                    let mut g = original.clone();
                    let config = CoverConfig {
                        heuristic,
                        ratio_rule,
                        seed: 99,
                    };
                    assert_eq!(bmwvc(&mut g, &config).weight, expected, "{heuristic:?}");
                }
            }
        }
    }

    #[test]
    fn path_of_three_picks_the_middle() {
        let mut g = build(3, &[(0, 1), (1, 2)], &[1, 1, 1]);
        let solution = bmwvc(&mut g, &CoverConfig::default());
        assert_eq!(solution.weight, 1);
        assert_eq!(solution.members, vec![1]);
    }

    #[test]
    fn uniform_path_of_five_needs_two_vertices() {
        let mut g = build(5, &[(0, 1), (1, 2), (2, 3), (3, 4)], &[1; 5]);
        let solution = bmwvc(&mut g, &CoverConfig::default());
        assert_eq!(solution.weight, 2);
        assert!(is_cover(
            &build(5, &[(0, 1), (1, 2), (2, 3), (3, 4)], &[1; 5]),
            &solution.members
        ));
    }

    #[test]
    fn star_takes_the_center() {
        let edges: Vec<_> = (1..6).map(|leaf| (0, leaf)).collect();
        let mut g = build(6, &edges, &[1, 3, 3, 3, 3, 3]);
        let solution = bmwvc(&mut g, &CoverConfig::default());
        assert_eq!(solution.weight, 1);
        assert_eq!(solution.members, vec![0]);
    }

    #[test]
    fn edgeless_graph_needs_nothing() {
        let mut g = build(4, &[], &[5, 5, 5, 5]);
        let solution = bmwvc(&mut g, &CoverConfig::default());
        assert!(solution.members.is_empty());
        assert_eq!(solution.weight, 0);
    }

    #[test]
    fn reduce_is_idempotent() {
        let mut rng = XorShiftRng::seed_from_u64(0x1DE);
        for _ in 0..15 {
            let n = rng.random_range(2..14);
            let mut g = random_instance(&mut rng, n, 0.3);
            let mut active = BitSet::with_capacity(n);
            active.fill();
            let mut cover = BitSet::with_capacity(n);

            reduce(&mut g, &mut active, &mut cover);
            let active_after = active.clone();
            let cover_after = cover.clone();

            reduce(&mut g, &mut active, &mut cover);
            assert_eq!(active, active_after);
            assert_eq!(cover, cover_after);
        }
    }

    #[test]
    fn degree0_drops_isolated_vertices() {
        let g = build(4, &[(0, 1)], &[1, 1, 1, 1]);
        let mut active = BitSet::with_capacity(4);
        active.fill();
        assert!(reduce_degree0(&g, &mut active));
        assert!(active.contains(0) && active.contains(1));
        assert!(!active.contains(2) && !active.contains(3));
    }

    #[test]
    fn degree1_covers_a_cheap_hub() {
        // Hub 0 (weight 2) with leaves of total weight 3.
        let mut g = build(4, &[(0, 1), (0, 2), (0, 3)], &[2, 1, 1, 1]);
        let mut active = BitSet::with_capacity(4);
        active.fill();
        let mut cover = BitSet::with_capacity(4);
        assert!(reduce_degree1(&mut g, &mut active, &mut cover));
        assert!(cover.contains(0));
        assert!(!active.contains(0));
    }

    #[test]
    fn components_split_disjoint_subgraphs() {
        let g = build(6, &[(0, 1), (2, 3), (3, 4)], &[1; 6]);
        let mut active = BitSet::with_capacity(6);
        for v in 0..5 {
            active.insert(v);
        }
        let neighbours: Vec<BitSet> = (0..6).map(|v| g.neighbors_set(v)).collect();
        let mut comps = components(&active, &neighbours);
        comps.sort_by_key(|c| c.first_set());
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].iter().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(comps[1].iter().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn pricing_returns_a_valid_cover() {
        let mut rng = XorShiftRng::seed_from_u64(0x9C1);
        let orders = [
            EdgeOrder::FirstVertex,
            EdgeOrder::MaxDegree,
            EdgeOrder::MinDegree,
            EdgeOrder::TotalDegree,
            EdgeOrder::MaxWeight,
            EdgeOrder::MinWeight,
        ];
        for _ in 0..15 {
            let n = rng.random_range(2..14);
            let g = random_instance(&mut rng, n, 0.4);
            let optimal = brute_min_cover_weight(&g);
            for order in orders {
                let solution = pricing_method(&g, order);
                assert!(is_cover(&g, &solution.members), "{order:?}");
                assert!(solution.weight >= optimal);
                assert_eq!(
                    solution.weight,
                    solution
                        .members
                        .iter()
                        .map(|&v| g.weight(v as usize))
                        .sum::<u64>()
                );
            }
        }
    }

    #[test]
    fn pricing_on_a_single_edge_buys_the_cheap_end() {
        let g = build(2, &[(0, 1)], &[5, 2]);
        let solution = pricing_method(&g, EdgeOrder::FirstVertex);
        assert_eq!(solution.members, vec![1]);
        assert_eq!(solution.weight, 2);
    }
}
