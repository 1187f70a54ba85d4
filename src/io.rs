//! Input parsers: DIMACS `.clq`, weighted `.clq`, and Matrix Market `.mtx`.
//!
//! All three stream line by line into a [`GraphSink`], so the same parser
//! fills any storage variant. File ids are rebased to 0 on the way in; the
//! `base` argument names the file's first vertex id (1 for DIMACS and MTX).
//! Every id is validated against the declared vertex count before it touches
//! the sink, so a malformed file fails with [`ParseError::InvalidVertex`]
//! instead of corrupting the graph.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::graph::{EdgeStorage, Graph, WeightedGraph};

/// First vertex id used by DIMACS and Matrix Market files.
pub const DIMACS_BASE: usize = 1;

// ============================================================================
// GraphSink
// ============================================================================

/// Receiver for parsed graph data.
pub trait GraphSink {
    /// Declares the vertex and edge counts; called once per file, before any
    /// edge or weight.
    fn set_parameters(&mut self, vertices: usize, edges: usize);
    /// Adds an undirected edge between two 0-based ids.
    fn add_edge(&mut self, from: usize, to: usize);
    /// Assigns a vertex weight; only emitted by the weighted parser.
    fn set_weight(&mut self, vertex: usize, weight: u64) {
        let _ = (vertex, weight);
    }
}

impl<S: EdgeStorage> GraphSink for Graph<S> {
    fn set_parameters(&mut self, vertices: usize, edges: usize) {
        Graph::set_parameters(self, vertices, edges);
    }

    fn add_edge(&mut self, from: usize, to: usize) {
        Graph::add_edge(self, from, to);
    }
}

impl GraphSink for WeightedGraph {
    fn set_parameters(&mut self, vertices: usize, edges: usize) {
        WeightedGraph::set_parameters(self, vertices, edges);
    }

    fn add_edge(&mut self, from: usize, to: usize) {
        WeightedGraph::add_edge(self, from, to);
    }

    fn set_weight(&mut self, vertex: usize, weight: u64) {
        WeightedGraph::set_weight(self, vertex, weight);
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failure while reading a graph file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Underlying I/O failure.
    Io(String),
    /// A line starts with something no format rule matches.
    UnexpectedToken {
        token: String,
    },
    /// A field that should be a number is not one (or is missing).
    MalformedNumber {
        token: String,
    },
    /// A vertex id outside `[base, base + vertices)`.
    InvalidVertex {
        vertex: usize,
        vertices: usize,
    },
    /// Edge or weight data before the header line.
    MissingHeader,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io(msg) => write!(f, "I/O error: {msg}"),
            ParseError::UnexpectedToken { token } => {
                write!(f, "unexpected token {token:?}")
            }
            ParseError::MalformedNumber { token } => {
                write!(f, "malformed number {token:?}")
            }
            ParseError::InvalidVertex { vertex, vertices } => {
                write!(f, "vertex {vertex} out of range for {vertices} vertices")
            }
            ParseError::MissingHeader => write!(f, "edge data before header line"),
        }
    }
}

impl std::error::Error for ParseError {}

// ============================================================================
// Parsers
// ============================================================================

fn number(tokens: &[&str], index: usize) -> Result<usize, ParseError> {
    let token = tokens.get(index).copied().unwrap_or("");
    token.parse().map_err(|_| ParseError::MalformedNumber {
        token: token.to_string(),
    })
}

/// Rebases a file vertex id to 0-based, rejecting out-of-range ids.
fn vertex_id(raw: usize, base: usize, vertices: usize) -> Result<usize, ParseError> {
    if raw < base || raw - base >= vertices {
        return Err(ParseError::InvalidVertex {
            vertex: raw,
            vertices,
        });
    }
    Ok(raw - base)
}

fn parse_clq_inner<G: GraphSink>(
    reader: impl BufRead,
    sink: &mut G,
    base: usize,
    accept_weights: bool,
) -> Result<(), ParseError> {
    let mut vertices = 0usize;
    let mut header_seen = false;

    for line in reader.lines() {
        let line = line.map_err(|e| ParseError::Io(e.to_string()))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&kind) = tokens.first() else {
            continue;
        };

        match kind {
            "c" => {}
            "p" => {
                // "p FORMAT VERTICES EDGES"; the format name is ignored.
                vertices = number(&tokens, 2)?;
                let edges = number(&tokens, 3)?;
                sink.set_parameters(vertices, edges);
                header_seen = true;
            }
            "e" => {
                if !header_seen {
                    return Err(ParseError::MissingHeader);
                }
                let from = vertex_id(number(&tokens, 1)?, base, vertices)?;
                let to = vertex_id(number(&tokens, 2)?, base, vertices)?;
                sink.add_edge(from, to);
            }
            "w" if accept_weights => {
                if !header_seen {
                    return Err(ParseError::MissingHeader);
                }
                let vertex = vertex_id(number(&tokens, 1)?, base, vertices)?;
                let weight = number(&tokens, 2)? as u64;
                sink.set_weight(vertex, weight);
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    token: other.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Parses DIMACS `.clq` text: `c` comments, one `p` header, `e` edge lines.
pub fn parse_clq<G: GraphSink>(
    reader: impl BufRead,
    sink: &mut G,
    base: usize,
) -> Result<(), ParseError> {
    parse_clq_inner(reader, sink, base, false)
}

/// Parses weighted `.clq` text: the DIMACS format extended with
/// `w VERTEX WEIGHT` lines.
pub fn parse_clq_weighted<G: GraphSink>(
    reader: impl BufRead,
    sink: &mut G,
    base: usize,
) -> Result<(), ParseError> {
    parse_clq_inner(reader, sink, base, true)
}

/// Parses Matrix Market text: `%` comments, a `ROWS COLS NNZ` size line,
/// then one edge per line.
pub fn parse_mtx<G: GraphSink>(
    reader: impl BufRead,
    sink: &mut G,
    base: usize,
) -> Result<(), ParseError> {
    let mut vertices = 0usize;
    let mut header_seen = false;

    for line in reader.lines() {
        let line = line.map_err(|e| ParseError::Io(e.to_string()))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&first) = tokens.first() else {
            continue;
        };

        if first.starts_with('%') {
            continue;
        }
        if !first.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ParseError::UnexpectedToken {
                token: first.to_string(),
            });
        }

        if !header_seen {
            // Size line "ROWS COLS NNZ"; the matrix is square, columns carry
            // the vertex count.
            vertices = number(&tokens, 1)?;
            let edges = number(&tokens, 2)?;
            sink.set_parameters(vertices, edges);
            header_seen = true;
            continue;
        }

        let from = vertex_id(number(&tokens, 0)?, base, vertices)?;
        let to = vertex_id(number(&tokens, 1)?, base, vertices)?;
        sink.add_edge(from, to);
    }
    Ok(())
}

/// Opens `path` and parses it with `parse`, wrapping the open failure.
pub fn parse_file<G: GraphSink>(
    path: impl AsRef<Path>,
    sink: &mut G,
    parse: impl FnOnce(BufReader<File>, &mut G, usize) -> Result<(), ParseError>,
) -> Result<(), ParseError> {
    let file = File::open(path).map_err(|e| ParseError::Io(e.to_string()))?;
    parse(BufReader::new(file), sink, DIMACS_BASE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DenseStorage;

    #[test]
    fn parses_a_small_clq_file() {
        let text = "\
c example graph
p edge 4 3
e 1 2
e 2 3
e 1 4
";
        let mut g: Graph<DenseStorage> = Graph::default();
        parse_clq(text.as_bytes(), &mut g, DIMACS_BASE).unwrap();

        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(1, 2));
        assert!(g.has_edge(0, 3));
        assert!(!g.has_edge(2, 3));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let text = "c leading comment\n\np edge 2 1\nc inner comment\ne 1 2\n";
        let mut g: Graph<DenseStorage> = Graph::default();
        parse_clq(text.as_bytes(), &mut g, DIMACS_BASE).unwrap();
        assert!(g.has_edge(0, 1));
    }

    #[test]
    fn weighted_parser_reads_weights() {
        let text = "p edge 3 2\ne 1 2\ne 2 3\nw 1 10\nw 2 20\nw 3 5\n";
        let mut g = WeightedGraph::default();
        parse_clq_weighted(text.as_bytes(), &mut g, DIMACS_BASE).unwrap();

        assert_eq!(g.weight(0), 10);
        assert_eq!(g.weight(1), 20);
        assert_eq!(g.weight(2), 5);
        assert!(g.has_edge(0, 1));
        assert_eq!(g.degree(1), 2);
    }

    #[test]
    fn plain_parser_rejects_weight_lines() {
        let text = "p edge 2 1\ne 1 2\nw 1 10\n";
        let mut g: Graph<DenseStorage> = Graph::default();
        let err = parse_clq(text.as_bytes(), &mut g, DIMACS_BASE).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                token: "w".to_string()
            }
        );
    }

    #[test]
    fn rejects_out_of_range_vertices() {
        let text = "p edge 3 1\ne 1 4\n";
        let mut g: Graph<DenseStorage> = Graph::default();
        let err = parse_clq(text.as_bytes(), &mut g, DIMACS_BASE).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidVertex {
                vertex: 4,
                vertices: 3
            }
        );
    }

    #[test]
    fn rejects_vertex_below_base() {
        // Vertex 0 is invalid in a 1-based file.
        let text = "p edge 3 1\ne 0 2\n";
        let mut g: Graph<DenseStorage> = Graph::default();
        let err = parse_clq(text.as_bytes(), &mut g, DIMACS_BASE).unwrap_err();
        assert!(matches!(err, ParseError::InvalidVertex { vertex: 0, .. }));
    }

    #[test]
    fn base_zero_files_parse_with_base_zero() {
        let text = "p edge 3 2\ne 0 1\ne 1 2\n";
        let mut g: Graph<DenseStorage> = Graph::default();
        parse_clq(text.as_bytes(), &mut g, 0).unwrap();
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(1, 2));
    }

    #[test]
    fn rejects_edges_before_header() {
        let text = "e 1 2\np edge 2 1\n";
        let mut g: Graph<DenseStorage> = Graph::default();
        let err = parse_clq(text.as_bytes(), &mut g, DIMACS_BASE).unwrap_err();
        assert_eq!(err, ParseError::MissingHeader);
    }

    #[test]
    fn rejects_malformed_numbers() {
        let text = "p edge two 3\n";
        let mut g: Graph<DenseStorage> = Graph::default();
        let err = parse_clq(text.as_bytes(), &mut g, DIMACS_BASE).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedNumber {
                token: "two".to_string()
            }
        );
    }

    #[test]
    fn rejects_truncated_edge_lines() {
        let text = "p edge 2 1\ne 1\n";
        let mut g: Graph<DenseStorage> = Graph::default();
        let err = parse_clq(text.as_bytes(), &mut g, DIMACS_BASE).unwrap_err();
        assert!(matches!(err, ParseError::MalformedNumber { .. }));
    }

    #[test]
    fn rejects_unknown_line_kinds() {
        let text = "p edge 2 1\nx 1 2\n";
        let mut g: Graph<DenseStorage> = Graph::default();
        let err = parse_clq(text.as_bytes(), &mut g, DIMACS_BASE).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn parses_mtx_format() {
        let text = "\
%%MatrixMarket matrix coordinate pattern symmetric
% comment
3 3 2
1 2
2 3
";
        let mut g: Graph<DenseStorage> = Graph::default();
        parse_mtx(text.as_bytes(), &mut g, DIMACS_BASE).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(1, 2));
        assert!(!g.has_edge(0, 2));
    }

    #[test]
    fn mtx_rejects_out_of_range() {
        let text = "2 2 1\n1 3\n";
        let mut g: Graph<DenseStorage> = Graph::default();
        let err = parse_mtx(text.as_bytes(), &mut g, DIMACS_BASE).unwrap_err();
        assert!(matches!(err, ParseError::InvalidVertex { vertex: 3, .. }));
    }

    #[test]
    fn weighted_parse_feeds_cover_pipeline() {
        let text = "p edge 3 2\ne 1 2\ne 2 3\nw 1 1\nw 2 1\nw 3 1\n";
        let mut g = WeightedGraph::default();
        parse_clq_weighted(text.as_bytes(), &mut g, DIMACS_BASE).unwrap();
        let solution = crate::cover::bmwvc(&mut g, &crate::cover::CoverConfig::default());
        assert_eq!(solution.weight, 1);
        assert_eq!(solution.members, vec![1]);
    }
}
