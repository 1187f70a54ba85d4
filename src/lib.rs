//! # Clique / Cover Search Engine
//!
//! Exact and heuristic solvers for maximum clique and minimum weighted
//! vertex cover over bit-packed graphs.
//!
//! This crate provides:
//! - A dynamic [`bitset::BitSet`] and three interchangeable adjacency
//!   encodings selected at compile time via [`graph::EdgeStorage`].
//! - Two **exact** maximum-clique searches: an iterative branch and bound
//!   with a coloring/Turán seed bound, and Östergård's vertex-ordering
//!   algorithm with memoized per-vertex bounds.
//! - An incremental **k-opt local search** for large cliques, multi-started
//!   in parallel with reproducible per-start seeds.
//! - An exact **minimum weighted vertex cover** pipeline
//!   (reduce, decompose, branch and bound) plus a fast pricing
//!   approximation.
//! - Streaming parsers for DIMACS `.clq`, weighted `.clq`, and Matrix
//!   Market files.
//!
//! ## Quick Start
//!
//! ```
//! use cliquecover::graph::{Graph, TriangularStorage};
//! use cliquecover::branch_bound;
//!
//! // A triangle with a pendant vertex.
//! let mut g: Graph<TriangularStorage> = Graph::new(4, 4);
//! g.add_edge(0, 1);
//! g.add_edge(1, 2);
//! g.add_edge(0, 2);
//! g.add_edge(2, 3);
//!
//! let clique = branch_bound::max_clique(&mut g);
//! assert_eq!(clique.size(), 3);
//! ```
//!
//! ## Weighted Vertex Cover
//!
//! ```
//! use cliquecover::cover::{bmwvc, CoverConfig};
//! use cliquecover::graph::WeightedGraph;
//!
//! // Path 0-1-2 with uniform weights: the middle vertex covers both edges.
//! let mut g = WeightedGraph::new(3, 2);
//! g.add_edge(0, 1);
//! g.add_edge(1, 2);
//! for v in 0..3 {
//!     g.set_weight(v, 1);
//! }
//!
//! let cover = bmwvc(&mut g, &CoverConfig::default());
//! assert_eq!(cover.weight, 1);
//! assert_eq!(cover.members, vec![1]);
//! ```
//!
//! ## Modules
//!
//! - [`bitset`]: Dynamic bit-packed set with word-level bulk operations.
//! - [`graph`]: Storage variants, the generic [`graph::Graph`], and the
//!   weighted graph used by the cover solvers.
//! - [`bounds`]: Initial clique lower bounds (greedy complement coloring,
//!   Turán).
//! - [`branch_bound`]: Iterative exact maximum clique.
//! - [`ostergard`]: Östergård's exact maximum clique.
//! - [`kopt`]: Incremental k-opt local search with parallel multi-start.
//! - [`cover`]: Reductions, exact weighted vertex cover, and pricing.
//! - [`io`]: DIMACS and Matrix Market parsers.
//!
//! ## Performance Notes
//!
//! - Edge tests are direct word probes; choose [`graph::TriangularStorage`]
//!   to halve memory on large instances, [`graph::DenseStorage`] when the
//!   algorithm scans neighbor rows.
//! - Dense graphs benefit from the degree relabeling both exact searches
//!   apply above 40% density.
//! - For maximum performance, compile with:
//!   `RUSTFLAGS="-C target-cpu=native" cargo build --release`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::needless_range_loop)] // Often clearer for adjacency indexing
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod bitset;
pub mod bounds;
pub mod branch_bound;
pub mod cover;
pub mod graph;
pub mod io;
pub mod kopt;
pub mod ostergard;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::bitset::BitSet;
    pub use crate::branch_bound::CliqueResult;
    pub use crate::cover::{bmwvc, pricing_method, CoverConfig, CoverSolution};
    pub use crate::graph::{
        DenseStorage, EdgeStorage, Extremum, Graph, RaggedStorage, TriangularStorage,
        WeightedGraph,
    };
    pub use crate::io::{parse_clq, parse_clq_weighted, parse_mtx, GraphSink, ParseError};
}
