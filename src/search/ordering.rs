use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, SearchError};
use crate::graph::{AdjacencyGraph, VertexId};


/** vertex degrees, computed once per graph and shared by every trial of a run */
#[derive(Debug, Clone, Default)]
pub struct DegreeTable {
    /// degrees[v]: degree of v
    degrees: Vec<usize>,
}

impl DegreeTable {
    /// computes the degree of each vertex
    pub fn new(graph:&AdjacencyGraph) -> Self {
        Self { degrees: graph.vertices().map(|v| graph.adj(v).len()).collect() }
    }

    /// degree of v
    pub fn degree(&self, v:VertexId) -> usize { self.degrees[v] }

    /// number of vertices
    pub fn len(&self) -> usize { self.degrees.len() }

    /// true if the graph has no vertex
    pub fn is_empty(&self) -> bool { self.degrees.is_empty() }

    /// average degree (0 for an empty graph)
    pub fn mean_degree(&self) -> f64 {
        if self.degrees.is_empty() {
            return 0.;
        }
        self.degrees.iter().sum::<usize>() as f64 / self.degrees.len() as f64
    }

    /// noise width used when none is configured: a tenth of the mean degree
    pub fn default_noise_width(&self) -> f64 { self.mean_degree() / 10. }
}


/** sequence of distinct vertices scanned by the greedy.
For neighborhood-restricted orders, `seed` is the vertex whose neighborhood was taken;
it is not part of `vertices` and has to be added to the resulting clique.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexOrder {
    vertices: Vec<VertexId>,
    seed: Option<VertexId>,
}

impl VertexOrder {
    /// order over (a permutation of) the whole vertex set
    pub fn full(vertices:Vec<VertexId>) -> Self { Self { vertices, seed: None } }

    /// order restricted to the neighborhood of seed
    pub fn restricted(seed:VertexId, vertices:Vec<VertexId>) -> Self {
        Self { vertices, seed: Some(seed) }
    }

    /// vertices in visiting order
    pub fn vertices(&self) -> &[VertexId] { &self.vertices }

    /// seed of a neighborhood-restricted order
    pub fn seed(&self) -> Option<VertexId> { self.seed }

    /// number of vertices to visit
    pub fn len(&self) -> usize { self.vertices.len() }

    /// true if there is nothing to visit
    pub fn is_empty(&self) -> bool { self.vertices.is_empty() }
}


/** vertex ordering strategies diversifying the greedy construction */
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrderingStrategy {
    /// non-increasing degree, ties broken by increasing id (deterministic)
    DegreeDescending,
    /// uniformly random permutation
    UniformRandom,
    /// non-increasing degree + U[-width, width]
    WeightedNoisy {
        /// noise amplitude
        width: f64,
    },
    /** random seed vertex, only its neighbors are visited.
    Neighbors are sorted by noisy degree if a width is given, shuffled otherwise.
    */
    NeighborhoodRestricted {
        /// noise amplitude (None: uniform shuffle)
        width: Option<f64>,
    },
}

impl OrderingStrategy {
    /** generates a vertex order. Never fails: an empty graph yields an empty order. */
    pub fn generate<R:Rng + ?Sized>(
        &self,
        graph:&AdjacencyGraph,
        degrees:&DegreeTable,
        rng:&mut R,
    ) -> VertexOrder {
        match *self {
            Self::DegreeDescending => VertexOrder::full(degree_descending(degrees)),
            Self::UniformRandom => VertexOrder::full(uniform_random(graph.nb_vertices(), rng)),
            Self::WeightedNoisy { width } => {
                VertexOrder::full(weighted_noisy(degrees, graph.vertices(), width, rng))
            }
            Self::NeighborhoodRestricted { width } => {
                if graph.nb_vertices() == 0 {
                    return VertexOrder::default();
                }
                let seed = rng.gen_range(0..graph.nb_vertices());
                restricted_order(graph, degrees, seed, width, rng)
            }
        }
    }

    /// true if the strategy draws random numbers
    pub fn is_randomized(&self) -> bool { !matches!(self, Self::DegreeDescending) }
}

impl fmt::Display for OrderingStrategy {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegreeDescending => write!(f, "degree"),
            Self::UniformRandom => write!(f, "random"),
            Self::WeightedNoisy { width } => write!(f, "weighted(±{:.2})", width),
            Self::NeighborhoodRestricted { width: Some(w) } => write!(f, "neighborhood(±{:.2})", w),
            Self::NeighborhoodRestricted { width: None } => write!(f, "neighborhood(shuffle)"),
        }
    }
}


/** strategy names as given on the command line, before parameters are known */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// see [`OrderingStrategy::DegreeDescending`]
    Degree,
    /// see [`OrderingStrategy::UniformRandom`]
    Random,
    /// see [`OrderingStrategy::WeightedNoisy`]
    Weighted,
    /// see [`OrderingStrategy::NeighborhoodRestricted`]
    Neighborhood,
}

impl StrategyKind {
    /// builds the strategy given the noise width of the run
    pub fn resolve(self, width:f64, neighborhood_noise:bool) -> OrderingStrategy {
        match self {
            Self::Degree => OrderingStrategy::DegreeDescending,
            Self::Random => OrderingStrategy::UniformRandom,
            Self::Weighted => OrderingStrategy::WeightedNoisy { width },
            Self::Neighborhood => OrderingStrategy::NeighborhoodRestricted {
                width: if neighborhood_noise { Some(width) } else { None },
            },
        }
    }
}

impl FromStr for StrategyKind {
    type Err = SearchError;

    fn from_str(s:&str) -> Result<Self, Self::Err> {
        match s.trim() {
            "degree" => Ok(Self::Degree),
            "random" => Ok(Self::Random),
            "weighted" => Ok(Self::Weighted),
            "neighborhood" => Ok(Self::Neighborhood),
            other => Err(SearchError::InvalidConfig(format!(
                "unknown strategy '{}' (valid: degree, random, weighted, neighborhood)", other
            ))),
        }
    }
}


/// all vertices by non-increasing degree, ties by increasing id
pub fn degree_descending(degrees:&DegreeTable) -> Vec<VertexId> {
    let mut res:Vec<VertexId> = (0..degrees.len()).collect();
    // stable sort: equal degrees keep the increasing id order
    res.sort_by_key(|v| Reverse(degrees.degree(*v)));
    res
}

/// uniformly random permutation of [0,n)
pub fn uniform_random<R:Rng + ?Sized>(n:usize, rng:&mut R) -> Vec<VertexId> {
    let mut res:Vec<VertexId> = (0..n).collect();
    res.shuffle(rng);
    res
}

/** sorts the given vertices by non-increasing degree + U[-width, width].
A fresh noise is drawn for each vertex at each call.
*/
pub fn weighted_noisy<I, R>(degrees:&DegreeTable, universe:I, width:f64, rng:&mut R) -> Vec<VertexId>
where
    I: IntoIterator<Item=VertexId>,
    R: Rng + ?Sized,
{
    let mut scored:Vec<(OrderedFloat<f64>, VertexId)> = universe.into_iter()
        .map(|v| (OrderedFloat(degrees.degree(v) as f64 + noise(width, &mut *rng)), v))
        .collect();
    scored.sort_unstable_by(|a,b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored.into_iter().map(|(_,v)| v).collect()
}

/// largest noise width: the range [-width, width] must stay finite
pub const MAX_NOISE_WIDTH:f64 = f64::MAX / 2.;

/// uniform noise in [-width, width]. Non-positive or NaN widths give 0, huge ones are capped.
fn noise<R:Rng + ?Sized>(width:f64, rng:&mut R) -> f64 {
    if width > 0. {
        let w = width.min(MAX_NOISE_WIDTH);
        rng.gen_range(-w..=w)
    } else {
        0.
    }
}

/** order over the neighbors of an explicit seed vertex.
Any clique containing seed lies in its closed neighborhood, so nothing is lost for
cliques through seed.
*/
pub fn neighborhood_restricted<R:Rng + ?Sized>(
    graph:&AdjacencyGraph,
    degrees:&DegreeTable,
    seed:VertexId,
    width:Option<f64>,
    rng:&mut R,
) -> Result<VertexOrder, GraphError> {
    graph.neighbors(seed)?;
    Ok(restricted_order(graph, degrees, seed, width, rng))
}

fn restricted_order<R:Rng + ?Sized>(
    graph:&AdjacencyGraph,
    degrees:&DegreeTable,
    seed:VertexId,
    width:Option<f64>,
    rng:&mut R,
) -> VertexOrder {
    let mut universe:Vec<VertexId> = graph.adj(seed).iter().copied().collect();
    universe.sort_unstable();
    let vertices = match width {
        Some(w) => weighted_noisy(degrees, universe, w, rng),
        None => {
            universe.shuffle(rng);
            universe
        }
    };
    VertexOrder::restricted(seed, vertices)
}
