use std::ops::Range;

use bit_set::BitSet;
use rustc_hash::FxHashSet;
use tracing::info;

use crate::error::GraphError;

/** Vertex Id */
pub type VertexId = usize;

/** Clique (vertices pairwise adjacent, no particular order) */
pub type Clique = Vec<VertexId>;

/** models an undirected graph.
Neighborhoods are stored in a vertex-indexed vector (no hashing on the vertex itself),
each neighborhood being a hash set to answer adjacency queries in O(1).
*/
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    /// nb vertices
    n: usize,
    /// nb edges
    m: usize,
    /// adj_sets[i]: set of vertices adjacent to i
    adj_sets: Vec<FxHashSet<VertexId>>,
    /// if exists: adj_matrix[i] represents a bitset of its neighbors
    adj_matrix: Option<Vec<BitSet>>,
}

impl AdjacencyGraph {

    /** creates an edgeless graph with n vertices */
    pub fn new(n:usize) -> Self {
        Self { n, m:0, adj_sets: vec![FxHashSet::default(); n], adj_matrix: None }
    }

    /** creates an edgeless graph with n vertices, failing instead of aborting when the
    vertex table cannot be allocated (e.g. n read from an untrusted header) */
    pub fn try_new(n:usize) -> Result<Self, GraphError> {
        let mut adj_sets:Vec<FxHashSet<VertexId>> = Vec::new();
        adj_sets.try_reserve_exact(n).map_err(|_| GraphError::TooManyVertices(n))?;
        adj_sets.resize_with(n, FxHashSet::default);
        Ok(Self { n, m:0, adj_sets, adj_matrix: None })
    }

    /** creates a graph from an edge list (0-based endpoints) */
    pub fn from_edges(n:usize, edges:&[(VertexId,VertexId)]) -> Result<Self, GraphError> {
        let mut res = Self::try_new(n)?;
        for (u,v) in edges {
            res.add_edge(*u, *v)?;
        }
        Ok(res)
    }

    /// number of vertices
    pub fn nb_vertices(&self) -> usize { self.n }

    /// number of edges
    pub fn nb_edges(&self) -> usize { self.m }

    /// iterator over the vertex ids
    pub fn vertices(&self) -> Range<VertexId> { 0..self.n }

    fn check_vertex(&self, v:VertexId) -> Result<(), GraphError> {
        if v < self.n {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange { vertex: v, nb_vertices: self.n })
        }
    }

    /** adds the edge {u,v}. Returns true if the edge was not already present.
    Out of range endpoints and self-loops are rejected.
    */
    pub fn add_edge(&mut self, u:VertexId, v:VertexId) -> Result<bool, GraphError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        if u == v {
            return Err(GraphError::SelfLoop(u));
        }
        if !self.adj_sets[u].insert(v) {
            return Ok(false);
        }
        self.adj_sets[v].insert(u);
        self.m += 1;
        if let Some(matrix) = &mut self.adj_matrix {
            matrix[u].insert(v);
            matrix[v].insert(u);
        }
        Ok(true)
    }

    /// set of vertices adjacent to v
    pub fn neighbors(&self, v:VertexId) -> Result<&FxHashSet<VertexId>, GraphError> {
        self.check_vertex(v)?;
        Ok(&self.adj_sets[v])
    }

    /** set of vertices adjacent to i (unchecked version of `neighbors`)

# Panics
- if i is not a vertex of the graph
    */
    pub fn adj(&self, i:VertexId) -> &FxHashSet<VertexId> {
        &self.adj_sets[i]
    }

    /// neighbors of v sorted by increasing id
    pub fn sorted_neighbors(&self, v:VertexId) -> Result<Vec<VertexId>, GraphError> {
        let mut res:Vec<VertexId> = self.neighbors(v)?.iter().copied().collect();
        res.sort_unstable();
        Ok(res)
    }

    /// number of neighbors of v
    pub fn degree(&self, v:VertexId) -> Result<usize, GraphError> {
        self.check_vertex(v)?;
        Ok(self.adj_sets[v].len())
    }

    /** returns if a and b are adjacent (false if one of them does not exist).
    if the adjacency matrix is defined: bitset lookup, otherwise: hash lookup
    */
    pub fn are_adjacent(&self, a:VertexId, b:VertexId) -> bool {
        match &self.adj_matrix {
            None => self.adj_sets.get(a).map_or(false, |s| s.contains(&b)),
            Some(matrix) => matrix.get(a).map_or(false, |row| row.contains(b)),
        }
    }

    /// edge list (u<v), sorted
    pub fn edges(&self) -> Vec<(VertexId,VertexId)> {
        let mut res = Vec::with_capacity(self.m);
        for (i,l) in self.adj_sets.iter().enumerate() {
            for j in l {
                if i < *j {
                    res.push((i,*j));
                }
            }
        }
        res.sort_unstable();
        res
    }

    /// if called, populate the adj_matrix (n² bits, only for small or dense graphs)
    pub fn populate_adj_matrix(&mut self) {
        let mut res = vec![BitSet::default(); self.n];
        for (a,resa) in res.iter_mut().enumerate() {
            for b in &self.adj_sets[a] {
                resa.insert(*b);
            }
        }
        self.adj_matrix = Some(res);
    }

    /// true if the dense adjacency matrix has been computed
    pub fn has_adj_matrix(&self) -> bool { self.adj_matrix.is_some() }

    /// logs statistics of the graph
    pub fn display_statistics(&self) {
        let degrees = self.adj_sets.iter().map(|s| s.len());
        let min_degree = degrees.clone().min().unwrap_or(0);
        let max_degree = degrees.max().unwrap_or(0);
        info!(
            vertices = self.n,
            edges = self.m,
            min_degree,
            max_degree,
            adj_matrix = self.has_adj_matrix(),
            "graph statistics"
        );
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    /// 0-1, 0-2, 1-2, 2-3
    fn small_graph() -> AdjacencyGraph {
        AdjacencyGraph::from_edges(4, &[(0,1), (0,2), (1,2), (2,3)]).unwrap()
    }

    #[test]
    fn test_degrees() {
        let g = small_graph();
        assert_eq!(g.nb_vertices(), 4);
        assert_eq!(g.nb_edges(), 4);
        let degrees:Vec<usize> = g.vertices().map(|v| g.degree(v).unwrap()).collect();
        assert_eq!(degrees, vec![2,2,3,1]);
        assert_eq!(g.sorted_neighbors(2).unwrap(), vec![0,1,3]);
    }

    #[test]
    fn test_symmetric_adjacency() {
        let g = small_graph();
        for u in g.vertices() {
            for v in g.vertices() {
                assert_eq!(g.are_adjacent(u,v), g.are_adjacent(v,u));
            }
        }
        assert!(g.are_adjacent(2,3));
        assert!(!g.are_adjacent(0,3));
        assert!(!g.are_adjacent(0,42));
    }

    #[test]
    fn test_add_edge_is_idempotent() {
        let mut g = small_graph();
        assert_eq!(g.add_edge(1,0), Ok(false));
        assert_eq!(g.add_edge(0,1), Ok(false));
        assert_eq!(g.nb_edges(), 4);
        assert_eq!(g.degree(0).unwrap(), 2);
        assert_eq!(g.add_edge(1,3), Ok(true));
        assert_eq!(g.nb_edges(), 5);
    }

    #[test]
    fn test_out_of_range_is_reported() {
        let mut g = small_graph();
        assert_eq!(
            g.add_edge(1,4),
            Err(GraphError::VertexOutOfRange { vertex: 4, nb_vertices: 4 })
        );
        assert!(g.neighbors(7).is_err());
        assert!(g.degree(4).is_err());
        assert_eq!(g.nb_edges(), 4);
    }

    #[test]
    fn test_try_new() {
        let g = AdjacencyGraph::try_new(3).unwrap();
        assert_eq!(g.nb_vertices(), 3);
        assert_eq!(g.nb_edges(), 0);
        assert_eq!(AdjacencyGraph::try_new(usize::MAX).err(), Some(GraphError::TooManyVertices(usize::MAX)));
    }

    #[test]
    fn test_self_loop_is_rejected() {
        let mut g = small_graph();
        assert_eq!(g.add_edge(3,3), Err(GraphError::SelfLoop(3)));
        assert!(!g.are_adjacent(3,3));
    }

    #[test]
    fn test_adj_matrix_agrees_with_sets() {
        let mut g = small_graph();
        g.populate_adj_matrix();
        assert!(g.has_adj_matrix());
        g.add_edge(0,3).unwrap();
        assert!(g.are_adjacent(3,0));
        assert!(g.are_adjacent(1,2));
        assert!(!g.are_adjacent(1,3));
    }

    #[test]
    fn test_edges() {
        let g = small_graph();
        assert_eq!(g.edges(), vec![(0,1), (0,2), (1,2), (2,3)]);
    }
}
