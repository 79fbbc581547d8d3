//! Local Branching matheuristic for the Positive Influence Dominating Set problem

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


/// PIDS instance base trait, solutions and checker
pub mod pids;

/// compact instance (adjacency lists and bitsets)
pub mod compact_instance;

/// read DIMACS instances
pub mod dimacs;

/// read plain text instances (adjacency matrix, edge list) and convert between them
pub mod plain;

/// search parameters
pub mod params;

/// error types
pub mod error;

/// run log (console and file)
pub mod report;

/// helper and utility methods for executables
pub mod util;

/// search procedures for the PIDS problem
pub mod search;

/// solvers used by the search
pub mod solvers;
