//! Shared best-placement holder for workers that publish into common state.
//!
//! An atomic profit hint lets a worker discard an obviously worse candidate
//! without locking. The placement itself lives behind a `Mutex` and is the
//! source of truth: the hint is only ever raised after the guarded value has
//! been replaced, under the same lock.

use crate::search::BestPlacement;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Hint value meaning "nothing installed yet".
const EMPTY: i64 = i64::MIN;

/// Concurrent holder of the highest-profit placement published so far.
#[derive(Debug)]
pub struct SharedBest {
    /// Profit of the installed placement, or [`EMPTY`].
    hint: AtomicI64,
    placement: Mutex<Option<BestPlacement>>,
}

impl Default for SharedBest {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedBest {
    /// Creates an empty holder.
    pub fn new() -> Self {
        Self {
            hint: AtomicI64::new(EMPTY),
            placement: Mutex::new(None),
        }
    }

    /// Profit of the installed placement, read without locking.
    ///
    /// May lag behind a concurrent `try_install`, never ahead of it.
    #[inline]
    pub fn best_profit(&self) -> Option<u64> {
        match self.hint.load(Ordering::Acquire) {
            EMPTY => None,
            profit => u64::try_from(profit).ok(),
        }
    }

    /// Installs `candidate` if its profit is strictly greater than the current
    /// one (or nothing is installed). Returns whether it was installed.
    pub fn try_install(&self, candidate: &BestPlacement) -> bool {
        let profit = to_hint(candidate.profit);
        if self.hint.load(Ordering::Acquire) >= profit {
            return false;
        }

        let mut guard = self.lock();
        // The hint may be stale; compare against the stored placement.
        if let Some(current) = guard.as_ref() {
            if candidate.profit <= current.profit {
                return false;
            }
        }
        *guard = Some(candidate.clone());
        self.hint.store(profit, Ordering::Release);
        true
    }

    /// Clone of the installed placement, if any.
    pub fn snapshot(&self) -> Option<BestPlacement> {
        self.lock().clone()
    }

    /// Consumes the holder and returns the installed placement.
    pub fn into_inner(self) -> Option<BestPlacement> {
        self.placement
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, Option<BestPlacement>> {
        // The guarded value is replaced in a single assignment, so a panic
        // elsewhere cannot leave it half-written.
        self.placement.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Display for SharedBest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.best_profit() {
            Some(profit) => write!(f, "SharedBest(profit: {profit})"),
            None => write!(f, "SharedBest(empty)"),
        }
    }
}

#[inline]
fn to_hint(profit: u64) -> i64 {
    i64::try_from(profit).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use std::sync::Arc;
    use std::thread;

    fn placement(rows: Vec<usize>) -> BestPlacement {
        BestPlacement::capture(&Board::from_rows(rows).unwrap())
    }

    #[test]
    fn starts_empty() {
        let best = SharedBest::new();
        assert_eq!(best.best_profit(), None);
        assert!(best.snapshot().is_none());
        assert_eq!(best.to_string(), "SharedBest(empty)");
    }

    #[test]
    fn zero_profit_placement_is_installed() {
        let best = SharedBest::new();
        assert!(best.try_install(&placement(vec![0])));
        assert_eq!(best.best_profit(), Some(0));
    }

    #[test]
    fn keeps_first_on_ties_and_accepts_strict_improvements() {
        let best = SharedBest::new();
        let first = placement(vec![1, 3, 0, 2]);
        let tied = placement(vec![2, 0, 3, 1]);
        let worse = placement(vec![0]);

        assert!(best.try_install(&first));
        assert!(!best.try_install(&tied));
        assert!(!best.try_install(&worse));
        assert_eq!(best.snapshot(), Some(first));

        let better = placement(vec![2, 4, 1, 3, 0]);
        assert!(better.profit > 6);
        assert!(best.try_install(&better));
        assert_eq!(best.into_inner(), Some(better));
    }

    #[test]
    fn concurrent_installs_converge_on_maximum() {
        let best = Arc::new(SharedBest::new());
        let handles: Vec<_> = (0..8usize)
            .map(|t| {
                let best = Arc::clone(&best);
                thread::spawn(move || {
                    for k in 0..200usize {
                        // Profit grows with (t, k); every thread races on the lock.
                        let n = 1 + (t * 200 + k) % 40;
                        let rows: Vec<usize> = (0..n).rev().collect();
                        best.try_install(&placement(rows));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let max_rows: Vec<usize> = (0..40).rev().collect();
        let expected = placement(max_rows).profit;
        assert_eq!(best.best_profit(), Some(expected));
        assert_eq!(best.snapshot().map(|p| p.profit), Some(expected));
    }
}
