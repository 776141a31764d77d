//! Reporting utilities for check results.

use crate::comparison::{DiffLine, StatusComparison, TextComparison, Verdict};
use crate::error::Result;
use crate::totals::RunTotals;
use colored::Colorize;
use std::io::Write;

const RULE: &str =
    "================================================================================";

/// Result of running a single check.
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// The check's verdict.
    pub verdict: Verdict,
}

/// Renders check results and the final summary to a writer.
pub struct Reporter<W: Write> {
    writer: W,
    verbose: bool,
}

impl<W: Write> Reporter<W> {
    /// Creates a reporter that writes to `writer`.
    pub const fn new(writer: W, verbose: bool) -> Self {
        Self { writer, verbose }
    }

    /// Announces that a check is about to run. Only writes anything in verbose mode.
    pub fn check_started(&mut self, name: &str) -> Result<()> {
        if self.verbose {
            writeln!(
                self.writer,
                "* {}: [{}]...",
                "Running check".bright_yellow(),
                name.italic()
            )?;
        }

        Ok(())
    }

    /// Reports the outcome of a check. Failures are always written in full; passes are only
    /// mentioned in verbose mode.
    pub fn report_check(&mut self, result: &CheckResult) -> Result<()> {
        let verdict = &result.verdict;

        if verdict.passed() {
            if self.verbose {
                writeln!(
                    self.writer,
                    "* {}: [{}]... {}",
                    "Check".bright_yellow(),
                    result.name.italic(),
                    "ok.".bright_green()
                )?;
            }
            return Ok(());
        }

        writeln!(
            self.writer,
            "* {}: [{}]... {}",
            "Check".bright_yellow(),
            result.name.italic(),
            "FAILED.".bright_red()
        )?;

        if let Some(command) = &verdict.command {
            writeln!(self.writer, "    {} {command}", "command:".cyan())?;
        }

        self.write_text_details(&verdict.text)?;
        self.write_status_details(verdict.exit_status)?;

        Ok(())
    }

    /// Writes the summary line for the whole run.
    pub fn report_summary(&mut self, totals: &RunTotals) -> Result<()> {
        writeln!(self.writer, "{RULE}")?;

        if totals.all_passed() {
            writeln!(
                self.writer,
                "All {} test(s) passed.",
                totals.tests_run().to_string().green()
            )?;
        } else {
            writeln!(
                self.writer,
                "{} of {} test(s) failed.",
                totals.tests_failed().to_string().red(),
                totals.tests_run()
            )?;
        }

        writeln!(self.writer, "{RULE}")?;

        Ok(())
    }

    /// Consumes the reporter, returning its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_text_details(&mut self, text: &TextComparison) -> Result<()> {
        let TextComparison::Differs {
            expected_source,
            actual_source,
            expected,
            actual,
            diff,
        } = text
        else {
            return Ok(());
        };

        let actual_label = actual_source
            .as_ref()
            .map_or_else(|| String::from("stdout"), |p| p.to_string_lossy().to_string());

        writeln!(
            self.writer,
            "    {} {}",
            actual_label,
            "DIFFERS:".bright_red()
        )?;

        writeln!(
            self.writer,
            "      {}",
            "------ Actual ------------------------------------------------".cyan()
        )?;
        write_block(&mut self.writer, actual)?;

        writeln!(
            self.writer,
            "      {} {}",
            "------ Expected:".cyan(),
            expected_source.to_string_lossy().cyan()
        )?;
        write_block(&mut self.writer, expected)?;

        writeln!(
            self.writer,
            "      {}",
            "------ Expected <> Actual ------------------------------------".cyan()
        )?;
        if diff.iter().any(DiffLine::is_change) {
            write_diff(&mut self.writer, 8, diff)?;
        } else {
            writeln!(self.writer, "        (texts differ only in line endings)")?;
        }

        writeln!(
            self.writer,
            "      {}",
            "--------------------------------------------------------------".cyan()
        )?;

        Ok(())
    }

    fn write_status_details(&mut self, status: StatusComparison) -> Result<()> {
        if let StatusComparison::Differs { expected, actual } = status {
            writeln!(
                self.writer,
                "    exit status {}: expected {}, got {}",
                "DIFFERS".bright_red(),
                expected.to_string().cyan(),
                actual.to_string().bright_red()
            )?;
        }

        Ok(())
    }
}

fn write_block(writer: &mut impl Write, text: &str) -> Result<()> {
    if text.is_empty() {
        writeln!(writer, "        (empty)")?;
    } else {
        write!(writer, "{}", indent::indent_all_by(8, text))?;
        if !text.ends_with('\n') {
            writeln!(writer)?;
        }
    }

    Ok(())
}

/// Writes a line diff to a writer, one line per entry.
fn write_diff(writer: &mut impl Write, indent: usize, diff: &[DiffLine]) -> Result<()> {
    let indent_str = " ".repeat(indent);

    for d in diff {
        let formatted = match d {
            DiffLine::Removed(l) => std::format!("{indent_str}- {l}").red(),
            DiffLine::Unchanged(l) => std::format!("{indent_str}  {l}").bright_black(),
            DiffLine::Added(r) => std::format!("{indent_str}+ {r}").green(),
        };

        writeln!(writer, "{formatted}")?;
    }

    Ok(())
}
