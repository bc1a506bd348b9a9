use rand::Rng;
use tracing::info;

use crate::error::GraphError;
use crate::graph::AdjacencyGraph;

/** generates a G(n,p) random graph (Erdős–Rényi).
Each pair {i,j} (i<j) is an edge with probability p, one uniform draw per pair.
*/
pub fn gnp<R:Rng + ?Sized>(n:usize, p:f64, rng:&mut R) -> Result<AdjacencyGraph, GraphError> {
    if !(0. ..=1.).contains(&p) {
        return Err(GraphError::InvalidProbability(p));
    }
    info!(vertices = n, p, "generating random graph");
    let mut res = AdjacencyGraph::try_new(n)?;
    for i in 0..n {
        for j in i+1..n {
            if rng.gen::<f64>() < p {
                res.add_edge(i, j)?;
            }
        }
    }
    Ok(res)
}


#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_extreme_probabilities() {
        let mut rng = SmallRng::seed_from_u64(42);
        let empty = gnp(20, 0., &mut rng).unwrap();
        assert_eq!(empty.nb_edges(), 0);
        let complete = gnp(20, 1., &mut rng).unwrap();
        assert_eq!(complete.nb_edges(), 20*19/2);
    }

    #[test]
    fn test_invalid_probability() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(gnp(5, 1.5, &mut rng).unwrap_err(), GraphError::InvalidProbability(1.5));
        assert!(gnp(5, -0.1, &mut rng).is_err());
        assert!(gnp(5, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn test_same_seed_same_graph() {
        let g1 = gnp(50, 0.3, &mut SmallRng::seed_from_u64(7)).unwrap();
        let g2 = gnp(50, 0.3, &mut SmallRng::seed_from_u64(7)).unwrap();
        assert_eq!(g1.edges(), g2.edges());
        // 1225 pairs, expected ~367 edges
        assert!(g1.nb_edges() > 250 && g1.nb_edges() < 500);
    }
}
