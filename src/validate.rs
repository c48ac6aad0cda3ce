//! Reference data and independent checks for search outcomes.

use crate::search::{solve, SearchOutcome};
use std::fmt;

// ============================================================================
// Reference data
// ============================================================================

/// Number of N-Queens solutions for `n = 0..=27` (OEIS A000170).
pub const KNOWN_SOLUTION_COUNTS: [u64; 28] = [
    1,
    1,
    0,
    0,
    2,
    10,
    4,
    40,
    92,
    352,
    724,
    2_680,
    14_200,
    73_712,
    365_596,
    2_279_184,
    14_772_512,
    95_815_104,
    666_090_624,
    4_968_057_848,
    39_029_188_884,
    314_666_222_712,
    2_691_008_701_644,
    24_233_937_684_440,
    227_514_171_973_736,
    2_207_893_435_808_352,
    22_317_699_616_364_044,
    234_907_967_154_122_528,
];

/// Reference solution count for `n`, if tabulated.
pub fn known_solution_count(n: usize) -> Option<u64> {
    KNOWN_SOLUTION_COUNTS.get(n).copied()
}

/// Counts valid placements and their maximum profit by visiting every
/// permutation of `0..n` (Heap's algorithm). Shares no code with the engine.
///
/// Cost is `O(n! * n^2)`; meant for `n <= 9`.
pub fn enumerate_permutations(n: usize) -> (u64, Option<u64>) {
    let mut perm: Vec<usize> = (0..n).collect();
    let mut counters = vec![0usize; n];
    let mut count = 0u64;
    let mut best: Option<u64> = None;

    let mut visit = |p: &[usize]| {
        if diagonals_clear(p) {
            count += 1;
            let profit: u64 = p.iter().enumerate().map(|(i, &r)| i.abs_diff(r) as u64).sum();
            best = Some(best.map_or(profit, |b| b.max(profit)));
        }
    };

    visit(&perm);
    let mut i = 1usize;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                perm.swap(0, i);
            } else {
                perm.swap(counters[i], i);
            }
            visit(&perm);
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    (count, best)
}

fn diagonals_clear(p: &[usize]) -> bool {
    for i in 0..p.len() {
        for j in (i + 1)..p.len() {
            if p[i].abs_diff(p[j]) == j - i {
                return false;
            }
        }
    }
    true
}

// ============================================================================
// Outcome validation
// ============================================================================

/// Ways in which an outcome can disagree with reference data or with itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Solution count differs from the reference table.
    CountMismatch {
        /// Board dimension.
        n: usize,
        /// Reference count.
        expected: u64,
        /// Reported count.
        got: u64,
    },
    /// A best placement is reported with zero solutions, or missing with some.
    BestPresence {
        /// Reported count.
        solutions: u64,
        /// Whether a best placement was reported.
        has_best: bool,
    },
    /// The best board has the wrong dimension.
    WrongSize {
        /// Expected dimension.
        expected: usize,
        /// Board dimension.
        got: usize,
    },
    /// The best board has attacking queens.
    InvalidBoard,
    /// Reported profit differs from the profit recomputed on the board.
    ProfitMismatch {
        /// Reported profit.
        reported: u64,
        /// Recomputed profit.
        recomputed: u64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CountMismatch { n, expected, got } => {
                write!(f, "n={n}: expected {expected} solutions, got {got}")
            }
            ValidationError::BestPresence {
                solutions,
                has_best,
            } => write!(
                f,
                "{solutions} solutions reported but best placement present={has_best}"
            ),
            ValidationError::WrongSize { expected, got } => {
                write!(f, "best board has {got} columns, expected {expected}")
            }
            ValidationError::InvalidBoard => write!(f, "best board is not a valid placement"),
            ValidationError::ProfitMismatch {
                reported,
                recomputed,
            } => write!(
                f,
                "reported profit {reported} but board profit is {recomputed}"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks an outcome against the reference count (when tabulated) and checks
/// that its best placement is a valid board whose profit matches.
///
/// # Errors
/// Returns the first inconsistency found.
pub fn validate_outcome(outcome: &SearchOutcome) -> Result<(), ValidationError> {
    if let Some(expected) = known_solution_count(outcome.n) {
        if outcome.solutions != expected {
            return Err(ValidationError::CountMismatch {
                n: outcome.n,
                expected,
                got: outcome.solutions,
            });
        }
    }

    let has_best = outcome.best.is_some();
    if has_best != (outcome.solutions > 0) {
        return Err(ValidationError::BestPresence {
            solutions: outcome.solutions,
            has_best,
        });
    }

    if let Some(best) = &outcome.best {
        if best.board.n() != outcome.n {
            return Err(ValidationError::WrongSize {
                expected: outcome.n,
                got: best.board.n(),
            });
        }
        if !best.board.is_valid_solution() {
            return Err(ValidationError::InvalidBoard);
        }
        let recomputed = best.board.profit();
        if recomputed != best.profit {
            return Err(ValidationError::ProfitMismatch {
                reported: best.profit,
                recomputed,
            });
        }
    }
    Ok(())
}

/// Solves every `n` in `0..=max_n` sequentially and validates each outcome.
///
/// # Errors
/// Returns the first failing validation.
pub fn validate_known_counts(max_n: usize) -> Result<(), ValidationError> {
    (0..=max_n).try_for_each(|n| validate_outcome(&solve(n)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{grid_profit, Board};
    use crate::search::{Backtracker, BestPlacement};

    #[test]
    fn engine_matches_reference_table() {
        validate_known_counts(10).unwrap();
    }

    #[test]
    fn permutation_oracle_matches_reference_table() {
        for n in 0..=8 {
            let (count, _) = enumerate_permutations(n);
            assert_eq!(Some(count), known_solution_count(n), "n={n}");
        }
    }

    #[test]
    fn engine_best_profit_is_maximal() {
        for n in 0..=8 {
            let (count, best) = enumerate_permutations(n);
            let outcome = solve(n);
            assert_eq!(outcome.solutions, count, "n={n}");
            assert_eq!(outcome.best.as_ref().map(|b| b.profit), best, "n={n}");
        }
    }

    #[test]
    fn flat_and_grid_profit_agree_on_every_solution() {
        // Walk every solution by recording each completed board.
        for n in 1..=8 {
            let mut boards = Vec::new();
            collect(&mut Board::new(n), 0, &mut boards);
            assert_eq!(Some(boards.len() as u64), known_solution_count(n));
            for board in &boards {
                assert_eq!(grid_profit(&board.to_grid()), board.profit(), "{board:?}");
            }
        }
    }

    fn collect(board: &mut Board, column: usize, out: &mut Vec<Board>) {
        if column == board.n() {
            out.push(board.clone());
            return;
        }
        for row in 0..board.n() {
            if board.is_safe(row, column) {
                board.place(column, row);
                collect(board, column + 1, out);
            }
        }
    }

    #[test]
    fn four_queens_tied_profits() {
        let a = Board::from_rows(vec![1, 3, 0, 2]).unwrap();
        let b = Board::from_rows(vec![2, 0, 3, 1]).unwrap();
        assert_eq!(a.profit(), 6);
        assert_eq!(b.profit(), 6);
        assert_eq!(enumerate_permutations(4), (2, Some(6)));
    }

    #[test]
    fn rejects_wrong_count() {
        let mut outcome = solve(5);
        outcome.solutions = 9;
        assert_eq!(
            validate_outcome(&outcome),
            Err(ValidationError::CountMismatch { n: 5, expected: 10, got: 9 })
        );
    }

    #[test]
    fn rejects_tampered_profit() {
        let mut outcome = solve(6);
        if let Some(best) = outcome.best.as_mut() {
            best.profit += 1;
        }
        assert!(matches!(
            validate_outcome(&outcome),
            Err(ValidationError::ProfitMismatch { .. })
        ));
    }

    #[test]
    fn rejects_attacking_board() {
        let mut outcome = solve(4);
        outcome.best = Some(BestPlacement::capture(&Board::from_rows(vec![0, 1, 2, 3]).unwrap()));
        assert_eq!(validate_outcome(&outcome), Err(ValidationError::InvalidBoard));
    }

    #[test]
    fn rejects_missing_best() {
        let mut outcome = solve(4);
        outcome.best = None;
        assert_eq!(
            validate_outcome(&outcome),
            Err(ValidationError::BestPresence { solutions: 2, has_best: false })
        );
    }

    #[test]
    fn rejects_wrong_size_board() {
        let mut outcome = solve(5);
        let mut engine = Backtracker::new(4);
        engine.search(0);
        outcome.best = engine.into_tally().best;
        assert_eq!(
            validate_outcome(&outcome),
            Err(ValidationError::WrongSize { expected: 5, got: 4 })
        );
    }

    #[test]
    fn unknown_sizes_skip_the_count_check() {
        assert_eq!(known_solution_count(28), None);
        assert_eq!(known_solution_count(8), Some(92));
    }
}
