//! Flat row-per-column board representation and the per-placement helpers the
//! search needs (safety check, profit, validity, rendering).

use std::fmt;

// ============================================================================
// Board
// ============================================================================

/// A queen placement on an `n x n` board.
///
/// Representation:
/// - `rows[c]` is the row of the queen standing in column `c`.
/// - During a search only the prefix `rows[0..column)` is meaningful; entries
///   past the current column hold stale values from earlier branches and are
///   overwritten before they are read again.
///
/// A complete board (every column written) is a valid N-Queens solution iff
/// [`Board::is_valid_solution`] holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    rows: Vec<usize>,
}

impl Board {
    /// Creates a zero-filled board with `n` columns.
    pub fn new(n: usize) -> Self {
        Self { rows: vec![0; n] }
    }

    /// Creates a board from explicit rows, one per column.
    ///
    /// The placement itself is not checked for attacks; use
    /// [`Board::is_valid_solution`] for that.
    ///
    /// # Errors
    /// Returns [`BoardError::RowOutOfRange`] if any row is `>= rows.len()`.
    pub fn from_rows(rows: Vec<usize>) -> Result<Self, BoardError> {
        let n = rows.len();
        if let Some((column, &row)) = rows.iter().enumerate().find(|(_, &r)| r >= n) {
            return Err(BoardError::RowOutOfRange { column, row, n });
        }
        Ok(Self { rows })
    }

    /// Board dimension.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.rows.len()
    }

    /// Row indices, one per column.
    #[inline(always)]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Writes the queen of `column` into `row`, replacing whatever was there.
    #[inline(always)]
    pub fn place(&mut self, column: usize, row: usize) {
        debug_assert!(column < self.rows.len());
        debug_assert!(row < self.rows.len());
        self.rows[column] = row;
    }

    /// Returns whether a queen at (`row`, `column`) is attacked by any queen in
    /// columns `0..column`.
    ///
    /// Two queens in columns `i < column` and `column` attack each other when
    /// they share a row or when `|rows[i] - row| == column - i`.
    #[inline]
    pub fn is_safe(&self, row: usize, column: usize) -> bool {
        debug_assert!(column <= self.rows.len());
        self.rows[..column]
            .iter()
            .enumerate()
            .all(|(i, &placed)| placed != row && placed.abs_diff(row) != column - i)
    }

    /// Sum of `|column - row|` over all columns.
    #[inline]
    pub fn profit(&self) -> u64 {
        self.rows
            .iter()
            .enumerate()
            .map(|(column, &row)| column.abs_diff(row) as u64)
            .sum()
    }

    /// Returns whether every column holds a queen that no other queen attacks.
    ///
    /// Rows are range-checked too, so a `true` result implies exactly one queen
    /// per row and per column.
    pub fn is_valid_solution(&self) -> bool {
        let n = self.n();
        (0..n).all(|column| self.rows[column] < n && self.is_safe(self.rows[column], column))
    }

    /// Matrix form: `grid[i][j] == 1` iff `rows[i] == j`.
    pub fn to_grid(&self) -> Vec<Vec<u8>> {
        let n = self.n();
        self.rows
            .iter()
            .map(|&row| (0..n).map(|j| u8::from(j == row)).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    /// One line per column index, `1` marking the queen, cells separated by a blank.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.n();
        for &row in &self.rows {
            for j in 0..n {
                if j > 0 {
                    f.write_str(" ")?;
                }
                f.write_str(if j == row { "1" } else { "0" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Profit of a matrix-form board: `Σ |i - j|` over every set cell.
///
/// For any grid produced by [`Board::to_grid`] this equals [`Board::profit`].
pub fn grid_profit(grid: &[Vec<u8>]) -> u64 {
    grid.iter()
        .enumerate()
        .flat_map(|(i, line)| {
            line.iter()
                .enumerate()
                .filter(|(_, &cell)| cell != 0)
                .map(move |(j, _)| i.abs_diff(j) as u64)
        })
        .sum()
}

// ============================================================================
// Errors
// ============================================================================

/// Errors encountered while building a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardError {
    /// A row index does not fit the board.
    RowOutOfRange {
        /// Column holding the offending row.
        column: usize,
        /// The offending row.
        row: usize,
        /// Board dimension.
        n: usize,
    },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::RowOutOfRange { column, row, n } => {
                write!(f, "row {row} in column {column} is outside a {n}x{n} board")
            }
        }
    }
}

impl std::error::Error for BoardError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    /// Pairwise attack test, independent of `is_safe`.
    fn attacks(c1: usize, r1: usize, c2: usize, r2: usize) -> bool {
        r1 == r2 || c1.abs_diff(c2) == r1.abs_diff(r2)
    }

    #[test]
    fn is_safe_matches_pairwise_definition() {
        const N: usize = 10;
        let mut rng = XorShiftRng::seed_from_u64(0xC0FFEE);

        for _ in 0..2_000 {
            let rows: Vec<usize> = (0..N).map(|_| rng.random_range(0..N)).collect();
            let board = Board::from_rows(rows.clone()).unwrap();
            let column = rng.random_range(0..N);
            let row = rng.random_range(0..N);

            let expect = (0..column).all(|i| !attacks(i, rows[i], column, row));
            assert_eq!(board.is_safe(row, column), expect, "rows={rows:?} row={row} col={column}");
        }
    }

    #[test]
    fn is_safe_ignores_columns_at_and_after_the_target() {
        let board = Board::from_rows(vec![1, 3, 3, 3]).unwrap();
        // Columns 2 and 3 hold stale values and must not be consulted.
        assert!(board.is_safe(0, 2));
        assert!(!board.is_safe(3, 2));
        assert!(board.is_safe(0, 0));
    }

    #[test]
    fn profit_of_known_boards() {
        // The two n = 4 solutions are mirror images and tie at 1+2+2+1.
        assert_eq!(Board::from_rows(vec![1, 3, 0, 2]).unwrap().profit(), 6);
        assert_eq!(Board::from_rows(vec![2, 0, 3, 1]).unwrap().profit(), 6);
        assert_eq!(Board::from_rows(vec![0]).unwrap().profit(), 0);
        assert_eq!(Board::from_rows(vec![3, 2, 1, 0]).unwrap().profit(), 8);
        assert_eq!(Board::new(0).profit(), 0);
    }

    #[test]
    fn validity_of_known_boards() {
        assert!(Board::from_rows(vec![1, 3, 0, 2]).unwrap().is_valid_solution());
        assert!(Board::from_rows(vec![2, 0, 3, 1]).unwrap().is_valid_solution());
        assert!(!Board::from_rows(vec![0, 1, 2, 3]).unwrap().is_valid_solution());
        assert!(!Board::from_rows(vec![1, 1, 0, 2]).unwrap().is_valid_solution());
        assert!(Board::new(0).is_valid_solution());
        assert!(Board::new(1).is_valid_solution());
    }

    #[test]
    fn from_rows_rejects_out_of_range() {
        let err = Board::from_rows(vec![0, 4, 1, 2]).unwrap_err();
        assert_eq!(err, BoardError::RowOutOfRange { column: 1, row: 4, n: 4 });
        assert_eq!(err.to_string(), "row 4 in column 1 is outside a 4x4 board");
        assert!(Board::from_rows(vec![2, 0, 3, 1]).is_ok());
    }

    #[test]
    fn grid_profit_agrees_with_flat_profit_on_random_boards() {
        const N: usize = 9;
        let mut rng = XorShiftRng::seed_from_u64(0xBEEF);
        for _ in 0..500 {
            let rows: Vec<usize> = (0..N).map(|_| rng.random_range(0..N)).collect();
            let board = Board::from_rows(rows).unwrap();
            assert_eq!(grid_profit(&board.to_grid()), board.profit());
        }
    }

    #[test]
    fn display_renders_one_line_per_column() {
        let board = Board::from_rows(vec![1, 3, 0, 2]).unwrap();
        assert_eq!(
            board.to_string(),
            "0 1 0 0\n0 0 0 1\n1 0 0 0\n0 0 1 0\n"
        );
    }
}
