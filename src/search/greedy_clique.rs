use bit_set::BitSet;

use crate::graph::{AdjacencyGraph, Clique, VertexId};
use crate::search::ordering::{DegreeTable, VertexOrder, degree_descending};

/** builds a clique by scanning the order once: a vertex is added iff it is adjacent to
every vertex already added. Discarded vertices are never reconsidered.
The result is maximal with respect to the order, not necessarily maximum.
*/
pub fn greedy_extend(graph:&AdjacencyGraph, order:&[VertexId]) -> Clique {
    let mut res:Clique = Vec::new();
    for u in order {
        if res.iter().all(|v| graph.are_adjacent(*u, *v)) {
            res.push(*u);
        }
    }
    res
}

/// greedy extension along a vertex order. The seed of a restricted order is appended.
pub fn greedy_clique(graph:&AdjacencyGraph, order:&VertexOrder) -> Clique {
    let mut res = greedy_extend(graph, order.vertices());
    if let Some(seed) = order.seed() {
        res.push(seed);
    }
    res
}

/** implements a greedy algorithm that finds a "large" size clique.
Vertices are considered by non-increasing degree.
*/
pub fn degree_greedy_clique(graph:&AdjacencyGraph) -> Clique {
    greedy_extend(graph, &degree_descending(&DegreeTable::new(graph)))
}

/// true if the vertices are distinct, exist, and are pairwise adjacent
pub fn is_clique(graph:&AdjacencyGraph, clique:&[VertexId]) -> bool {
    let mut visited = BitSet::new();
    for v in clique {
        if *v >= graph.nb_vertices() || !visited.insert(*v) {
            return false;
        }
    }
    for (i,a) in clique.iter().enumerate() {
        for b in &clique[i+1..] {
            if !graph.are_adjacent(*a, *b) { return false; }
        }
    }
    true
}


#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::dimacs::read_from_file;
    use crate::generator::gnp;
    use crate::search::ordering::OrderingStrategy;

    fn all_strategies() -> Vec<OrderingStrategy> {
        vec![
            OrderingStrategy::DegreeDescending,
            OrderingStrategy::UniformRandom,
            OrderingStrategy::WeightedNoisy { width: 1. },
            OrderingStrategy::NeighborhoodRestricted { width: None },
            OrderingStrategy::NeighborhoodRestricted { width: Some(1.) },
        ]
    }

    fn sorted(mut c:Clique) -> Clique {
        c.sort_unstable();
        c
    }

    #[test]
    fn test_scenario_a() {
        let g = read_from_file("insts/other-instances/scenario_a.clq").unwrap();
        assert_eq!(greedy_extend(&g, &[2,0,1,3]), vec![2,0,1]);
        assert_eq!(sorted(degree_greedy_clique(&g)), vec![0,1,2]);
    }

    #[test]
    fn test_degree_greedy_matches_degree_order() {
        let g = gnp(80, 0.4, &mut SmallRng::seed_from_u64(21)).unwrap();
        let degrees = DegreeTable::new(&g);
        let order = OrderingStrategy::DegreeDescending.generate(&g, &degrees, &mut SmallRng::seed_from_u64(0));
        let expected = greedy_clique(&g, &order);
        assert_eq!(degree_greedy_clique(&g), expected);
        assert_eq!(degree_greedy_clique(&g), expected);
    }

    #[test]
    fn test_scenario_b_edgeless() {
        let g = AdjacencyGraph::new(5);
        let degrees = DegreeTable::new(&g);
        let mut rng = SmallRng::seed_from_u64(2);
        for strategy in all_strategies() {
            for _ in 0..10 {
                let order = strategy.generate(&g, &degrees, &mut rng);
                assert_eq!(greedy_clique(&g, &order).len(), 1, "strategy {}", strategy);
            }
        }
    }

    #[test]
    fn test_scenario_c_complete() {
        let g = read_from_file("insts/other-instances/k6.clq").unwrap();
        let degrees = DegreeTable::new(&g);
        let mut rng = SmallRng::seed_from_u64(3);
        for strategy in all_strategies() {
            for _ in 0..10 {
                let order = strategy.generate(&g, &degrees, &mut rng);
                let clique = greedy_clique(&g, &order);
                assert_eq!(sorted(clique), vec![0,1,2,3,4,5], "strategy {}", strategy);
            }
        }
    }

    #[test]
    fn test_triangle_free() {
        let g = read_from_file("insts/other-instances/myciel3.col").unwrap();
        assert_eq!(degree_greedy_clique(&g).len(), 2);
    }

    #[test]
    fn test_empty_order() {
        let g = AdjacencyGraph::new(3);
        assert!(greedy_extend(&g, &[]).is_empty());
        assert!(greedy_clique(&g, &VertexOrder::default()).is_empty());
    }

    #[test]
    fn test_seed_is_appended() {
        let g = read_from_file("insts/other-instances/scenario_a.clq").unwrap();
        let order = VertexOrder::restricted(3, vec![2]);
        assert_eq!(greedy_clique(&g, &order), vec![2,3]);
    }

    #[test]
    fn test_checker() {
        let g = read_from_file("insts/other-instances/scenario_a.clq").unwrap();
        assert!(is_clique(&g, &[0,1,2]));
        assert!(is_clique(&g, &[]));
        assert!(!is_clique(&g, &[0,1,3]));
        assert!(!is_clique(&g, &[0,0]));
        assert!(!is_clique(&g, &[2,9]));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_greedy_is_maximal_clique(
            n in 1usize..40,
            p in 0.0f64..1.0,
            graph_seed in any::<u64>(),
            order_seed in any::<u64>(),
        ) {
            let g = gnp(n, p, &mut SmallRng::seed_from_u64(graph_seed)).unwrap();
            let degrees = DegreeTable::new(&g);
            let mut rng = SmallRng::seed_from_u64(order_seed);
            for strategy in all_strategies() {
                let order = strategy.generate(&g, &degrees, &mut rng);
                let clique = greedy_clique(&g, &order);
                prop_assert!(is_clique(&g, &clique));
                prop_assert!(!clique.is_empty());
                // no vertex of the order can be added afterwards
                for u in order.vertices() {
                    if !clique.contains(u) {
                        prop_assert!(clique.iter().any(|v| !g.are_adjacent(*u, *v)));
                    }
                }
                if let Some(seed) = order.seed() {
                    prop_assert!(clique.contains(&seed));
                    prop_assert!(clique.iter().filter(|v| **v != seed).all(|v| g.are_adjacent(seed, *v)));
                }
            }
        }
    }
}
