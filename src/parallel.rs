//! Parallel stride decomposition of the backtracking search.
//!
//! The choice of row for column 0 is split across `p` workers: worker `k`
//! takes the starting rows `{k, k+p, k+2p, ...} ∩ [0, n)`. Every worker runs the
//! sequential engine on its own board buffer, so the recursive hot path never
//! touches shared state. Results meet exactly once per worker, either as a
//! report sent back to the orchestrator ([`MergeStrategy::Channel`]) or as a
//! single locked install into a [`SharedBest`] ([`MergeStrategy::Shared`]).

use crate::error::SolveError;
use crate::incumbent::SharedBest;
use crate::search::{Backtracker, SearchOutcome, Tally};
use log::{debug, info};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::fmt;
use std::time::{Duration, Instant};

// ============================================================================
// Configuration
// ============================================================================

/// How worker results are combined into the global count and best placement.
///
/// Both strategies merge once per [`WorkerTask`], whichever pool thread ran it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Workers send their tallies over a channel; the orchestrator reduces them
    /// in worker order after the join. Fully deterministic, including the
    /// placement kept on profit ties.
    #[default]
    Channel,
    /// Workers install their local best into a mutex-guarded holder as they
    /// finish; counts are returned by value and summed after the join. On
    /// profit ties the placement kept depends on finishing order.
    Shared,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStrategy::Channel => write!(f, "channel"),
            MergeStrategy::Shared => write!(f, "shared"),
        }
    }
}

/// Parallel run parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Number of worker threads (and stride of the partition).
    pub workers: usize,
    /// Result combination policy.
    pub merge: MergeStrategy,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(std::num::NonZero::get)
            .unwrap_or(1);
        Self {
            workers,
            merge: MergeStrategy::default(),
        }
    }
}

impl ParallelConfig {
    /// Sets the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the merge strategy.
    #[must_use]
    pub fn with_merge(mut self, merge: MergeStrategy) -> Self {
        self.merge = merge;
        self
    }
}

// ============================================================================
// Worker
// ============================================================================

/// Work assigned to one worker: starting rows `worker, worker + stride, ...`
/// below `n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerTask {
    /// Board dimension.
    pub n: usize,
    /// Worker index, also its first starting row.
    pub worker: usize,
    /// Distance between consecutive starting rows (the worker count).
    pub stride: usize,
}

impl WorkerTask {
    /// Creates the task of `worker` among `stride` workers.
    pub fn new(n: usize, worker: usize, stride: usize) -> Self {
        debug_assert!(stride > 0, "stride must be positive");
        debug_assert!(worker < stride, "worker index outside the pool");
        Self { n, worker, stride }
    }

    /// Starting rows for column 0 owned by this task. Empty when `worker >= n`.
    pub fn starting_rows(&self) -> impl Iterator<Item = usize> {
        (self.worker..self.n).step_by(self.stride.max(1))
    }

    /// Runs the sequential engine from every owned starting row on one private
    /// board buffer.
    pub fn run(self) -> WorkerReport {
        let mut engine = Backtracker::new(self.n);
        let mut starting_rows = 0usize;
        for row in self.starting_rows() {
            engine.search_from(row);
            starting_rows += 1;
        }
        let tally = engine.into_tally();
        debug!(
            "worker {}: {} starting rows, {} solutions, best profit {:?}",
            self.worker,
            starting_rows,
            tally.solutions,
            tally.best.as_ref().map(|b| b.profit)
        );
        WorkerReport {
            worker: self.worker,
            starting_rows,
            tally,
        }
    }
}

/// Everything a worker found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerReport {
    /// Worker index.
    pub worker: usize,
    /// Number of column-0 rows searched.
    pub starting_rows: usize,
    /// Local count and best placement.
    pub tally: Tally,
}

impl WorkerReport {
    /// Per-worker statistics without the board.
    pub fn summary(&self) -> WorkerSummary {
        WorkerSummary {
            worker: self.worker,
            starting_rows: self.starting_rows,
            solutions: self.tally.solutions,
            best_profit: self.tally.best.as_ref().map(|b| b.profit),
        }
    }
}

/// Per-worker statistics kept in the final outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerSummary {
    /// Worker index.
    pub worker: usize,
    /// Number of column-0 rows searched.
    pub starting_rows: usize,
    /// Solutions found by this worker.
    pub solutions: u64,
    /// Best local profit, if the worker found any solution.
    pub best_profit: Option<u64>,
}

// ============================================================================
// Outcome
// ============================================================================

/// Wall-clock split of a parallel run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseTimings {
    /// Pool creation and task construction.
    pub setup: Duration,
    /// From handing tasks to the pool until every worker has joined.
    pub execution: Duration,
    /// Reduction of worker results.
    pub teardown: Duration,
}

/// Result of [`solve_parallel`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelOutcome {
    /// Global count and best placement.
    pub outcome: SearchOutcome,
    /// Worker count used.
    pub workers: usize,
    /// Phase durations.
    pub timings: PhaseTimings,
    /// One entry per worker, ordered by worker index.
    pub worker_summaries: Vec<WorkerSummary>,
}

// ============================================================================
// Orchestration
// ============================================================================

/// Runs the search for an `n x n` board on `config.workers` threads.
///
/// One [`WorkerTask`] is built per worker and the pool has one thread per
/// worker, but rayon schedules tasks by work stealing: a thread may run two
/// tasks back to back while another idles. "Worker" therefore names a slice
/// of the first column, not a thread, and
/// [`ParallelOutcome::worker_summaries`] always holds one entry per task.
///
/// # Errors
/// - [`SolveError::InvalidWorkerCount`] if `config.workers == 0`.
/// - [`SolveError::ThreadPool`] if the worker threads cannot be started.
///
/// # Panics
/// A panic inside a worker is propagated to the caller by the pool.
pub fn solve_parallel(n: usize, config: &ParallelConfig) -> Result<ParallelOutcome, SolveError> {
    if config.workers == 0 {
        return Err(SolveError::InvalidWorkerCount);
    }
    info!(
        "parallel search: n={n}, workers={}, merge={}",
        config.workers, config.merge
    );

    let setup_start = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|i| format!("nqueens-worker-{i}"))
        .build()
        .map_err(|e| SolveError::ThreadPool(e.to_string()))?;
    let tasks: Vec<WorkerTask> = (0..config.workers)
        .map(|worker| WorkerTask::new(n, worker, config.workers))
        .collect();
    let setup = setup_start.elapsed();

    let (mut tally, worker_summaries, execution, teardown) = match config.merge {
        MergeStrategy::Channel => run_with_channel(&pool, tasks),
        MergeStrategy::Shared => run_with_shared_best(&pool, tasks),
    };

    // Column 0 does not exist for n == 0, so no worker saw the empty placement.
    if n == 0 {
        let mut engine = Backtracker::new(0);
        engine.search(0);
        tally.merge(engine.into_tally());
    }

    let outcome = SearchOutcome::from_tally(n, tally);
    info!("parallel search finished: {outcome}");
    Ok(ParallelOutcome {
        outcome,
        workers: config.workers,
        timings: PhaseTimings {
            setup,
            execution,
            teardown,
        },
        worker_summaries,
    })
}

type Reduced = (Tally, Vec<WorkerSummary>, Duration, Duration);

fn run_with_channel(pool: &ThreadPool, tasks: Vec<WorkerTask>) -> Reduced {
    let expected = tasks.len();
    let (tx, rx) = crossbeam::channel::unbounded::<WorkerReport>();

    let execution_start = Instant::now();
    pool.install(|| {
        tasks.into_par_iter().for_each_with(tx, |tx, task| {
            // `rx` lives until the reduction below, so the send cannot fail.
            let _ = tx.send(task.run());
        });
    });
    let execution = execution_start.elapsed();

    // Every sender was dropped with the parallel iterator, so this drains and
    // ends. A panicking worker is re-raised by `install` and never gets here.
    let teardown_start = Instant::now();
    let mut reports: Vec<WorkerReport> = rx.iter().collect();
    debug_assert_eq!(reports.len(), expected);
    reports.sort_by_key(|r| r.worker);

    let summaries = reports.iter().map(WorkerReport::summary).collect();
    let mut tally = Tally::default();
    for report in reports {
        tally.merge(report.tally);
    }
    (tally, summaries, execution, teardown_start.elapsed())
}

fn run_with_shared_best(pool: &ThreadPool, tasks: Vec<WorkerTask>) -> Reduced {
    let shared = SharedBest::new();

    let execution_start = Instant::now();
    let summaries: Vec<WorkerSummary> = pool.install(|| {
        tasks
            .into_par_iter()
            .map(|task| {
                let report = task.run();
                if let Some(best) = &report.tally.best {
                    if shared.try_install(best) {
                        debug!("worker {}: installed profit {}", report.worker, best.profit);
                    }
                }
                report.summary()
            })
            .collect()
    });
    let execution = execution_start.elapsed();

    let teardown_start = Instant::now();
    let tally = Tally {
        solutions: summaries.iter().map(|s| s.solutions).sum(),
        best: shared.into_inner(),
    };
    (tally, summaries, execution, teardown_start.elapsed())
}

// ============================================================================
// Tests
// ============================================================================
