//! Engine for black-box conformance testing of command-line programs.
//!
//! The harness drives an already-built executable through a fixed, ordered test plan. Each
//! check runs the program (or inspects a file it wrote earlier), compares what was observed
//! against a recorded expectation, and contributes to a single pair of run totals.
//!
//! # Checks
//!
//! 1. **stdout + exit status**: captured stdout must match an expected file (modulo a missing
//!    final newline) and the exit status must match an expected value. Both are checked and reported
//!    independently, but the check fails at most once.
//!
//! 2. **file**: a file the program wrote must match an expected file. Nothing is executed.
//!
//! 3. **exit status**: only the exit status is compared; stdout is dropped.
//!
//! Plans may also contain `run` steps that execute a command purely for its side effects.

mod comparison;
mod config;
mod error;
mod execution;
mod plan;
mod reporting;
mod runner;
mod totals;

pub use comparison::{
    Comparator, DiffLine, ExitStatusComparator, FileComparator, StatusComparison,
    StdoutExitComparator, TextComparison, Verdict, diff_lines, normalize_trailing_newline,
};
pub use config::RunnerConfig;
pub use error::{Error, Result};
pub use execution::{Invocation, RunResult, StderrDisposition};
pub use plan::{
    Action, CommandSpec, ExitStatusEntry, FileEntry, PlanEntry, RunEntry, StdoutExitEntry, TestPlan,
};
pub use reporting::{CheckResult, Reporter};
pub use runner::TestRunner;
pub use totals::RunTotals;
