//! Solvers used as collaborators by the search.

/// MIP subproblems (model, external solver, age bookkeeping)
pub mod mip;
