//! Test runner implementation.

use crate::config::RunnerConfig;
use crate::error::Result;
use crate::plan::{Action, TestPlan};
use crate::reporting::{CheckResult, Reporter};
use crate::totals::RunTotals;
use std::io::Write;

/// Executes a test plan, one entry at a time, in declared order.
pub struct TestRunner {
    config: RunnerConfig,
    plan: TestPlan,
}

impl TestRunner {
    /// Creates a new test runner for the given configuration and plan.
    pub const fn new(config: RunnerConfig, plan: TestPlan) -> Self {
        Self { config, plan }
    }

    /// Runs every entry of the plan, writing the report to `writer`.
    ///
    /// Check failures are reported and counted, and the run carries on. Harness-level errors
    /// (a program that can't be launched, a missing expectation file) abort the run.
    pub fn run<W: Write>(&self, writer: W) -> Result<RunTotals> {
        let mut reporter = Reporter::new(writer, self.config.verbose);
        let mut totals = RunTotals::new();

        tracing::info!(
            "running {} check(s) from plan {} in {}",
            self.plan.check_count(),
            self.plan.name.as_deref().unwrap_or("(unnamed)"),
            self.config.fixtures_dir.display()
        );

        for entry in &self.plan.checks {
            match entry.action(&self.config) {
                Action::Check(comparator) => {
                    tracing::info!("check: {}", entry.name());
                    reporter.check_started(entry.name())?;

                    let verdict = comparator.compare(&self.config.fixtures_dir)?;
                    totals.record(&verdict);

                    reporter.report_check(&CheckResult {
                        name: entry.name().to_owned(),
                        verdict,
                    })?;
                }
                Action::SideEffect(invocation) => {
                    tracing::info!("step: {}", entry.name());

                    let result = invocation.run(&self.config.fixtures_dir)?;
                    if result.exit_status != 0 {
                        tracing::warn!(
                            "step '{}' exited with status {}",
                            entry.name(),
                            result.exit_status
                        );
                    }
                }
            }
        }

        reporter.report_summary(&totals)?;

        Ok(totals)
    }

    /// Writes one line per plan entry without running anything.
    pub fn list<W: Write>(&self, mut writer: W) -> Result<()> {
        for entry in &self.plan.checks {
            match entry.invocation(&self.config) {
                Some(invocation) => {
                    writeln!(writer, "{}: {}: {invocation}", entry.kind(), entry.name())?;
                }
                None => writeln!(writer, "{}: {}", entry.kind(), entry.name())?,
            }
        }

        Ok(())
    }
}
