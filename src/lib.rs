//! Parallel multi-start greedy search for the Maximum Clique problem

// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// graph model (vertex-indexed adjacency sets)
pub mod graph;

/// error types
pub mod error;

/// read/write DIMACS formats, adjacency dump
pub mod dimacs;

/// random graph generation
pub mod generator;

/// multi-start greedy search for the clique problem
pub mod search;

/// repeated runs and their statistics
pub mod experiment;

/// helper and utility methods for executables
pub mod util;
