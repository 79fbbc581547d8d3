use std::path::PathBuf;

use thiserror::Error;

/** errors raised while reading or converting a graph file. They are fatal for the executables. */
#[derive(Debug, Error)]
pub enum InstanceError {
    /// the file cannot be read or written
    #[error("unable to access {path}: {source}")]
    Io {
        /// file involved
        path: PathBuf,
        /// underlying error
        source: std::io::Error,
    },
    /// the header (number of vertices / edges) is missing or malformed
    #[error("malformed header: {0}")]
    Header(String),
    /// a matrix entry is not 0/1, or the matrix is too short
    #[error("malformed adjacency matrix: {0}")]
    Matrix(String),
    /// an edge refers to an unknown vertex or is a self-loop
    #[error("malformed edge: {0}")]
    Edge(String),
    /// the instance type given on the command line is not known
    #[error("unknown instance type '{0}' (valid: 'matrix', 'edges', 'dimacs')")]
    UnknownType(String),
}

/** invalid search configuration */
#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    /// a fraction (alpha, beta) outside [0,1]
    #[error("{name} must be in [0,1] (got {value})")]
    Fraction {
        /// parameter name
        name: &'static str,
        /// value given
        value: f64,
    },
    /// a negative or non finite time limit
    #[error("{name} must be a finite non-negative number of seconds (got {value})")]
    Time {
        /// parameter name
        name: &'static str,
        /// value given
        value: f32,
    },
    /// the age limit must allow at least one solver call
    #[error("age limit must be at least 1")]
    AgeLimit,
    /// a command line value cannot be parsed
    #[error("invalid value '{value}' for {name}")]
    Parse {
        /// argument name
        name: String,
        /// value given
        value: String,
    },
}

/** reasons for which a call to the external MIP solver did not produce a solution.
None of them is fatal: the caller keeps its incumbent.
*/
#[derive(Debug, Error)]
pub enum SolverFailure {
    /// a scratch file (model, warm start, script) could not be written
    #[error("unable to write {path}: {source}")]
    Scratch {
        /// scratch file
        path: PathBuf,
        /// underlying error
        source: std::io::Error,
    },
    /// the solver process could not be started
    #[error("unable to launch {executable}: {source}")]
    Launch {
        /// executable that was invoked
        executable: String,
        /// underlying error
        source: std::io::Error,
    },
    /// the solver process returned a non-zero exit status
    #[error("solver exited with status {0:?}")]
    ExitStatus(Option<i32>),
    /// the solver log does not contain any solution listing
    #[error("no solution section in the solver output")]
    MissingSolution,
    /// the solution listing names a variable that does not exist
    #[error("unknown variable in the solver output: {0}")]
    UnknownVariable(String),
}
