use std::path::PathBuf;

use thiserror::Error;

use crate::graph::VertexId;

/// errors raised while building or querying a graph
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// a vertex id outside `[0, n)`
    #[error("vertex {vertex} out of range (graph has {nb_vertices} vertices)")]
    VertexOutOfRange {
        /// offending vertex
        vertex: VertexId,
        /// number of vertices of the graph
        nb_vertices: usize,
    },
    /// an edge (u,u)
    #[error("self-loop on vertex {0}")]
    SelfLoop(VertexId),
    /// edge probability outside [0,1]
    #[error("edge probability {0} is not in [0,1]")]
    InvalidProbability(f64),
    /// the vertex table cannot be allocated
    #[error("cannot allocate a graph with {0} vertices")]
    TooManyVertices(usize),
}

/// errors raised while reading a DIMACS instance
#[derive(Debug, Error)]
pub enum DimacsError {
    /// file could not be read
    #[error("unable to read {path}: {source}")]
    Io {
        /// instance path
        path: PathBuf,
        /// underlying error
        #[source]
        source: std::io::Error,
    },
    /// no `p` line before the data lines (or no data at all)
    #[error("missing header line 'p <format> <n> <m>'")]
    MissingHeader,
    /// `p` line that cannot be parsed
    #[error("line {line_no}: invalid header '{line}'")]
    InvalidHeader {
        /// 1-based line number
        line_no: usize,
        /// line content
        line: String,
    },
    /// header announcing an empty graph
    #[error("header declares no vertices")]
    NoVertices,
    /// data line that is neither `e u v` nor `u v`
    #[error("line {line_no}: invalid edge line '{line}'")]
    InvalidLine {
        /// 1-based line number
        line_no: usize,
        /// line content
        line: String,
    },
    /// edge rejected by the graph (out of range endpoint, self-loop)
    #[error("line {line_no}: {source}")]
    Graph {
        /// 1-based line number
        line_no: usize,
        /// underlying error
        #[source]
        source: GraphError,
    },
}

/// errors raised before a multi-start search is dispatched
#[derive(Debug, Error)]
pub enum SearchError {
    /// rejected configuration
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
    /// the worker pool could not be created
    #[error("unable to build the worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
