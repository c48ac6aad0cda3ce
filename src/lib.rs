//! # N-Queens Profit Search
//!
//! Exhaustive backtracking over N-Queens placements that counts every valid
//! placement and keeps the one maximizing the profit
//! \(\sum_i |i - \text{row}_i|\).
//!
//! This crate provides:
//! - A flat row-per-column [`board::Board`] with an O(column) safety check.
//! - A sequential backtracking engine ([`search`]) that reuses one board buffer
//!   for the whole recursion.
//! - A parallel driver ([`parallel`]) that splits the first column's rows across
//!   a fixed worker pool by stride and merges per-worker results once.
//!
//! ## Quick Start
//!
//! ```
//! use nqueens::search::solve;
//!
//! let outcome = solve(8);
//! assert_eq!(outcome.solutions, 92);
//! assert!(outcome.board().unwrap().is_valid_solution());
//! ```
//!
//! ## Parallel Search
//!
//! ```
//! use nqueens::parallel::{solve_parallel, MergeStrategy, ParallelConfig};
//!
//! let cfg = ParallelConfig::default()
//!     .with_workers(3)
//!     .with_merge(MergeStrategy::Shared);
//! let run = solve_parallel(6, &cfg).expect("pool should start");
//! assert_eq!(run.outcome.solutions, 4);
//! assert_eq!(run.worker_summaries.len(), 3);
//! ```
//!
//! ## Validating Outcomes
//!
//! ```
//! use nqueens::search::solve;
//! use nqueens::validate::validate_outcome;
//!
//! validate_outcome(&solve(7)).expect("engine agrees with the reference table");
//! ```
//!
//! ## Modules
//!
//! - [`board`]: Board representation, profit and rendering.
//! - [`search`]: Sequential backtracking engine and result types.
//! - [`incumbent`]: Mutex-guarded best placement with a lock-free profit hint.
//! - [`parallel`]: Stride decomposition over a rayon pool.
//! - [`validate`]: Reference counts and a brute-force permutation oracle.
//!
//! ## Performance Notes
//!
//! - The safety check scans only the placed prefix, so the cost per node is
//!   O(column); total work is dominated by the branching factor.
//! - Boards are never shared between workers; the only synchronization is one
//!   merge per worker and the final join.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::doc_markdown)] // LaTeX-style notation in docs

pub mod board;
pub mod error;
pub mod incumbent;
pub mod parallel;
pub mod search;
pub mod validate;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::board::{Board, BoardError};
    pub use crate::error::SolveError;
    pub use crate::incumbent::SharedBest;
    pub use crate::parallel::{solve_parallel, MergeStrategy, ParallelConfig, ParallelOutcome};
    pub use crate::search::{solve, BestPlacement, SearchOutcome};
    pub use crate::validate::{validate_outcome, KNOWN_SOLUTION_COUNTS};
}
