use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{digit1, space0, space1};
use nom::combinator::{eof, map_res, rest};
use nom::sequence::{pair, preceded};
use tracing::{info, warn};

use crate::error::DimacsError;
use crate::graph::AdjacencyGraph;


/// reads a DIMACS instance from a file
pub fn read_from_file<P: AsRef<Path>>(filename:P) -> Result<AdjacencyGraph, DimacsError> {
    let path = filename.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|source| DimacsError::Io { path: path.to_path_buf(), source })?;
    info!(path = %path.display(), "loading DIMACS graph");
    parse_graph(&content)
}

/** parses a DIMACS instance.
Comment lines (starting with 'c') and blank lines are ignored. The header
`p <format> <n> <m>` must come before any edge. Edge lines are either `e u v` or `u v`,
with 1-based indices; tokens after the two endpoints (edge weights) are ignored.
*/
pub fn parse_graph(content:&str) -> Result<AdjacencyGraph, DimacsError> {
    let mut lines = content.lines().enumerate();
    let mut header = None;
    for (i, raw) in lines.by_ref() {
        let line = raw.trim();
        if is_skipped(line) { continue; }
        if !line.starts_with('p') {
            return Err(DimacsError::MissingHeader);
        }
        match read_header(line) {
            Ok(("", (n,m))) => {
                header = Some((i+1, n, m));
                break;
            }
            _ => return Err(DimacsError::InvalidHeader { line_no: i+1, line: line.to_string() }),
        }
    }
    let (header_line, n, m) = header.ok_or(DimacsError::MissingHeader)?;
    if n == 0 {
        return Err(DimacsError::NoVertices);
    }
    let mut graph = AdjacencyGraph::try_new(n)
        .map_err(|source| DimacsError::Graph { line_no: header_line, source })?;
    let mut check_nb_edges = 0;
    for (i, raw) in lines {
        let line = raw.trim();
        if is_skipped(line) { continue; }
        let (a,b) = match read_edge(line) {
            Ok(("", e)) => e,
            _ => return Err(DimacsError::InvalidLine { line_no: i+1, line: line.to_string() }),
        };
        graph.add_edge(to_zero_based(a), to_zero_based(b))
            .map_err(|source| DimacsError::Graph { line_no: i+1, source })?;
        check_nb_edges += 1;
    }
    if check_nb_edges != m && 2*check_nb_edges != m {
        warn!(declared = m, read = check_nb_edges, "edge count differs from the header");
    }
    info!(vertices = graph.nb_vertices(), edges = graph.nb_edges(), "DIMACS graph loaded");
    Ok(graph)
}

/// DIMACS indices start at 1. A 0 index is kept as is.
fn to_zero_based(i:usize) -> usize { i.saturating_sub(1) }

fn is_skipped(line:&str) -> bool { line.is_empty() || line.starts_with('c') }

/// reads an unsigned integer
fn read_integer(s:&str) -> IResult<&str, usize> {
    map_res(digit1, |d:&str| d.parse::<usize>())(s)
}

/// reads two numbers separated by spaces
fn read_two_integers(s:&str) -> IResult<&str, (usize,usize)> {
    let (s, n1) = read_integer(s)?;
    let (s, _) = space1(s)?;
    let (s, n2) = read_integer(s)?;
    Ok((s, (n1,n2)))
}

/// two endpoints, then either the end of the line or extra fields that are dropped
fn read_endpoints(s:&str) -> IResult<&str, (usize,usize)> {
    let (s, e) = read_two_integers(s)?;
    let (s, _) = alt((eof, preceded(space1, rest)))(s)?;
    Ok((s, e))
}

/// reads header containing (n,m). The format tag ("edge", "col", "clq", ...) is ignored.
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    let (s, _) = tag("p")(s)?;
    let (s, _) = space1(s)?;
    let (s, _) = take_till1(|c:char| c.is_whitespace())(s)?;
    let (s, _) = space1(s)?;
    let (s, nm) = read_two_integers(s)?;
    let (s, _) = space0(s)?;
    Ok((s, nm))
}

/// reads edge line, either "e u v [w]" or "u v [w]" (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s:&str) -> IResult<&str, (usize,usize)> {
    alt((
        preceded(pair(tag("e"), space1), read_endpoints),
        read_endpoints,
    ))(s)
}

/// DIMACS encoding of the graph (1-based indices)
pub fn to_dimacs_string(graph:&AdjacencyGraph) -> String {
    let mut res = format!("p edge {} {}\n", graph.nb_vertices(), graph.nb_edges());
    for (u,v) in graph.edges() {
        // writing into a String cannot fail
        let _ = writeln!(res, "e {} {}", u+1, v+1);
    }
    res
}

/// writes the graph in the DIMACS format
pub fn write_to_file<P: AsRef<Path>>(graph:&AdjacencyGraph, filename:P) -> std::io::Result<()> {
    fs::write(filename, to_dimacs_string(graph))
}

/** adjacency dump: a `# Vertices: n` line then one `i: n1 n2 ...` line per vertex
(0-based, neighbors sorted).
*/
pub fn adjacency_to_string(graph:&AdjacencyGraph) -> String {
    let mut res = format!("# Vertices: {}\n", graph.nb_vertices());
    for (i, adj) in graph.vertices().map(|v| graph.sorted_neighbors(v)).enumerate() {
        res += format!("{}:", i).as_str();
        for j in adj.unwrap_or_default() {
            res += format!(" {}", j).as_str();
        }
        res += "\n";
    }
    res
}

/// writes the adjacency dump into a file
pub fn write_adjacency<P: AsRef<Path>>(graph:&AdjacencyGraph, filename:P) -> std::io::Result<()> {
    fs::write(filename, adjacency_to_string(graph))
}
