//! Aggregate pass/fail counts for a run.

use crate::comparison::Verdict;

/// Counts of checks run and failed over one harness run.
///
/// Every recorded verdict bumps `tests_run` once and `tests_failed` at most once, so the order
/// in which checks are recorded doesn't affect the totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunTotals {
    tests_run: u32,
    tests_failed: u32,
}

impl RunTotals {
    /// Creates empty totals.
    pub const fn new() -> Self {
        Self {
            tests_run: 0,
            tests_failed: 0,
        }
    }

    /// Records the outcome of one check.
    pub const fn record(&mut self, verdict: &Verdict) {
        self.tests_run += 1;
        if verdict.is_failure() {
            self.tests_failed += 1;
        }
    }

    /// Number of checks recorded.
    pub const fn tests_run(&self) -> u32 {
        self.tests_run
    }

    /// Number of recorded checks that failed.
    pub const fn tests_failed(&self) -> u32 {
        self.tests_failed
    }

    /// Returns whether every recorded check passed.
    pub const fn all_passed(&self) -> bool {
        self.tests_failed == 0
    }

    /// Process exit code for these totals: 0 if everything passed, 1 otherwise.
    pub const fn exit_code(&self) -> u8 {
        if self.all_passed() { 0 } else { 1 }
    }
}
