//! Errors surfaced by the solver entry points.

use std::fmt;

/// Fatal errors of a search run. No partial result accompanies any of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// A parallel run was requested with zero workers.
    InvalidWorkerCount,
    /// The worker pool could not be created.
    ThreadPool(String),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::InvalidWorkerCount => write!(f, "worker count must be at least 1"),
            SolveError::ThreadPool(msg) => write!(f, "failed to start worker pool: {msg}"),
        }
    }
}

impl std::error::Error for SolveError {}
