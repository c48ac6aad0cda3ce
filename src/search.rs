//! Sequential backtracking engine.
//!
//! Queens are placed column by column into a single [`Board`] buffer. Each
//! candidate row is checked against the placed prefix only, and a branch is
//! undone simply by overwriting its column on the next candidate, so one buffer
//! serves the whole recursion.

use crate::board::Board;
use std::fmt;

// ============================================================================
// Results
// ============================================================================

/// The highest-profit placement seen so far, together with its profit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestPlacement {
    /// `board.profit()`, cached.
    pub profit: u64,
    /// A complete, valid placement.
    pub board: Board,
}

impl BestPlacement {
    /// Captures a copy of `board` with its profit.
    pub fn capture(board: &Board) -> Self {
        Self {
            profit: board.profit(),
            board: board.clone(),
        }
    }
}

/// Solution count and best placement accumulated by one search (or one worker).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Complete placements seen.
    pub solutions: u64,
    /// Best placement seen; `None` until the first solution.
    pub best: Option<BestPlacement>,
}

impl Tally {
    /// Records one complete placement.
    ///
    /// The board is only copied on a strict profit improvement, so ties keep the
    /// earliest placement.
    #[inline]
    pub fn record(&mut self, board: &Board) {
        self.solutions += 1;
        let profit = board.profit();
        let improves = match &self.best {
            Some(best) => profit > best.profit,
            None => true,
        };
        if improves {
            self.best = Some(BestPlacement {
                profit,
                board: board.clone(),
            });
        }
    }

    /// Folds `other` into `self`: counts add, the better placement wins, and
    /// `self` wins ties.
    pub fn merge(&mut self, other: Tally) {
        self.solutions += other.solutions;
        if let Some(candidate) = other.best {
            let improves = match &self.best {
                Some(best) => candidate.profit > best.profit,
                None => true,
            };
            if improves {
                self.best = Some(candidate);
            }
        }
    }
}

/// Final result of a search over an `n x n` board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Board dimension.
    pub n: usize,
    /// Total number of valid placements.
    pub solutions: u64,
    /// Highest-profit placement; `None` iff `solutions == 0`.
    pub best: Option<BestPlacement>,
}

impl SearchOutcome {
    /// Builds the outcome for `n` from an accumulated tally.
    pub fn from_tally(n: usize, tally: Tally) -> Self {
        Self {
            n,
            solutions: tally.solutions,
            best: tally.best,
        }
    }

    /// Best profit, or 0 when no placement exists.
    pub fn profit(&self) -> u64 {
        self.best.as_ref().map_or(0, |b| b.profit)
    }

    /// Best board, if any placement exists.
    pub fn board(&self) -> Option<&Board> {
        self.best.as_ref().map(|b| &b.board)
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SearchOutcome(n: {}, solutions: {}, profit: {})",
            self.n,
            self.solutions,
            self.profit()
        )
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Recursive column-by-column search over a private board buffer.
#[derive(Clone, Debug)]
pub struct Backtracker {
    n: usize,
    board: Board,
    tally: Tally,
}

impl Backtracker {
    /// Creates an engine for an `n x n` board with an empty tally.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            board: Board::new(n),
            tally: Tally::default(),
        }
    }

    /// Board dimension.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Tally accumulated so far.
    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    /// Consumes the engine and returns its tally.
    pub fn into_tally(self) -> Tally {
        self.tally
    }

    /// Explores every completion of the placement currently held in columns
    /// `0..column`.
    ///
    /// The prefix must be pairwise non-attacking; the recursion depth is
    /// `n - column`.
    pub fn search(&mut self, column: usize) {
        if column == self.n {
            self.tally.record(&self.board);
            return;
        }
        for row in 0..self.n {
            if self.board.is_safe(row, column) {
                self.board.place(column, row);
                self.search(column + 1);
            }
        }
    }

    /// Fixes the queen of column 0 at `first_row` and searches columns `1..n`.
    ///
    /// Does nothing when `n == 0` or `first_row >= n`.
    pub fn search_from(&mut self, first_row: usize) {
        if first_row >= self.n {
            return;
        }
        self.board.place(0, first_row);
        self.search(1);
    }
}

/// Runs the sequential engine on an `n x n` board.
///
/// `n == 0` yields the single empty placement with profit 0.
pub fn solve(n: usize) -> SearchOutcome {
    let mut engine = Backtracker::new(n);
    engine.search(0);
    SearchOutcome::from_tally(n, engine.into_tally())
}

// ============================================================================
// Tests
// ============================================================================
