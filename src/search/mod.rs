//! Multi-start greedy search for the maximum clique problem.

/// vertex orderings diversifying the greedy
pub mod ordering;

/// greedy that finds a maximal clique along a vertex order
pub mod greedy_clique;

/// race-free aggregation of the best clique
pub mod best_clique;

/// parallel multi-start scheduler
pub mod multistart;
