//! Comparison strategies and the verdicts they produce.

use crate::error::{Error, Result};
use crate::execution::Invocation;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// One line of a line-based edit script, going from expected to actual.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    /// Line present in both texts.
    Unchanged(String),
    /// Line present only in the expected text.
    Removed(String),
    /// Line present only in the actual text.
    Added(String),
}

impl DiffLine {
    /// Returns whether this line represents a change.
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged(_))
    }
}

/// Comparison of captured text against expected text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextComparison {
    /// Text was not part of this check.
    NotChecked,
    /// Actual text matches expected text.
    Matches,
    /// Actual text differs from expected text.
    Differs {
        /// File the expected text was read from.
        expected_source: PathBuf,
        /// File the actual text was read from, if it wasn't captured from stdout.
        actual_source: Option<PathBuf>,
        /// The expected text.
        expected: String,
        /// The actual text.
        actual: String,
        /// Minimal line edit script from expected to actual.
        diff: Vec<DiffLine>,
    },
}

impl TextComparison {
    /// Returns whether this comparison indicates a failure.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Differs { .. })
    }
}

/// Comparison of an exit status against an expected one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusComparison {
    /// Exit status was not part of this check.
    NotChecked,
    /// Exit status matches.
    Matches(i32),
    /// Exit status differs.
    Differs {
        /// The expected status.
        expected: i32,
        /// The observed status.
        actual: i32,
    },
}

impl StatusComparison {
    /// Compares an observed exit status against the expected one.
    pub const fn compare(expected: i32, actual: i32) -> Self {
        if expected == actual {
            Self::Matches(actual)
        } else {
            Self::Differs { expected, actual }
        }
    }

    /// Returns whether this comparison indicates a failure.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Differs { .. })
    }
}

/// Outcome of a single check.
///
/// A check may fail on its text, its exit status, or both; either way it is one verdict and
/// counts as one failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// Display form of the command that was run, if the check ran one.
    pub command: Option<String>,
    /// Comparison of stdout or file contents.
    pub text: TextComparison,
    /// Comparison of the exit status.
    pub exit_status: StatusComparison,
}

impl Verdict {
    /// Returns whether this verdict indicates a failure.
    pub const fn is_failure(&self) -> bool {
        self.text.is_failure() || self.exit_status.is_failure()
    }

    /// Returns whether the check passed.
    pub const fn passed(&self) -> bool {
        !self.is_failure()
    }
}

/// A strategy for judging one check.
pub trait Comparator {
    /// Performs the check, resolving relative paths and running any command in `working_dir`.
    ///
    /// Only harness-level problems are returned as errors; a mismatch is a failing [`Verdict`].
    fn compare(&self, working_dir: &Path) -> Result<Verdict>;
}

/// Checks a command's stdout against an expected file and its exit status against an
/// expected value. The two comparisons are independent.
#[derive(Clone, Debug)]
pub struct StdoutExitComparator {
    /// Command to run.
    pub invocation: Invocation,
    /// File holding the expected stdout.
    pub expected_stdout: PathBuf,
    /// Expected exit status.
    pub expected_exit_status: i32,
}

impl Comparator for StdoutExitComparator {
    fn compare(&self, working_dir: &Path) -> Result<Verdict> {
        let expected_path = working_dir.join(&self.expected_stdout);
        let expected = read_expectation(&expected_path)?;

        let result = self.invocation.run(working_dir)?;

        Ok(Verdict {
            command: Some(self.invocation.to_string()),
            text: compare_text(&expected, &result.stdout, &self.expected_stdout, None),
            exit_status: StatusComparison::compare(self.expected_exit_status, result.exit_status),
        })
    }
}

/// Checks a file the program under test already wrote against an expected file.
/// Nothing is executed.
#[derive(Clone, Debug)]
pub struct FileComparator {
    /// File written by the program under test.
    pub actual: PathBuf,
    /// File holding the expected contents.
    pub expected: PathBuf,
}

impl Comparator for FileComparator {
    fn compare(&self, working_dir: &Path) -> Result<Verdict> {
        let expected = read_expectation(&working_dir.join(&self.expected))?;

        let actual_path = working_dir.join(&self.actual);
        let actual = std::fs::read(&actual_path)
            .map_err(|source| Error::ReadActual {
                path: actual_path,
                source,
            })
            .map(|bytes| String::from_utf8_lossy(&bytes).to_string())?;

        Ok(Verdict {
            command: None,
            text: compare_text(&expected, &actual, &self.expected, Some(self.actual.as_path())),
            exit_status: StatusComparison::NotChecked,
        })
    }
}

/// Checks only a command's exit status; its stdout is captured and dropped.
#[derive(Clone, Debug)]
pub struct ExitStatusComparator {
    /// Command to run.
    pub invocation: Invocation,
    /// Expected exit status.
    pub expected_exit_status: i32,
}

impl Comparator for ExitStatusComparator {
    fn compare(&self, working_dir: &Path) -> Result<Verdict> {
        let result = self.invocation.run(working_dir)?;

        Ok(Verdict {
            command: Some(self.invocation.to_string()),
            text: TextComparison::NotChecked,
            exit_status: StatusComparison::compare(self.expected_exit_status, result.exit_status),
        })
    }
}

/// Terminates non-empty text that lacks a final newline. Empty text stays empty, and extra
/// trailing newlines are kept so they show up in the diff.
pub fn normalize_trailing_newline(text: &str) -> Cow<'_, str> {
    if text.is_empty() || text.ends_with('\n') {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(std::format!("{text}\n"))
    }
}

/// Computes a minimal line edit script turning `expected` into `actual`.
pub fn diff_lines(expected: &str, actual: &str) -> Vec<DiffLine> {
    let expected_lines: Vec<_> = expected.lines().collect();
    let actual_lines: Vec<_> = actual.lines().collect();

    diff::slice(&expected_lines, &actual_lines)
        .into_iter()
        .map(|d| match d {
            diff::Result::Left(l) => DiffLine::Removed((*l).to_owned()),
            diff::Result::Both(l, _) => DiffLine::Unchanged((*l).to_owned()),
            diff::Result::Right(r) => DiffLine::Added((*r).to_owned()),
        })
        .collect()
}

fn compare_text(
    expected: &str,
    actual: &str,
    expected_source: &Path,
    actual_source: Option<&Path>,
) -> TextComparison {
    let expected = normalize_trailing_newline(expected);
    let actual = normalize_trailing_newline(actual);

    if expected == actual {
        TextComparison::Matches
    } else {
        TextComparison::Differs {
            expected_source: expected_source.to_owned(),
            actual_source: actual_source.map(Path::to_path_buf),
            diff: diff_lines(&expected, &actual),
            expected: expected.into_owned(),
            actual: actual.into_owned(),
        }
    }
}

fn read_expectation(path: &Path) -> Result<String> {
    std::fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).to_string())
        .map_err(|source| Error::ReadExpectation {
            path: path.to_owned(),
            source,
        })
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_trailing_newlines() {
        assert_eq!(normalize_trailing_newline(""), "");
        assert_eq!(normalize_trailing_newline("\n"), "\n");
        assert_eq!(normalize_trailing_newline("\n\n"), "\n\n");
        assert_eq!(normalize_trailing_newline("usage"), "usage\n");
        assert_eq!(normalize_trailing_newline("usage\n"), "usage\n");
        assert_eq!(normalize_trailing_newline("usage\n\n\n"), "usage\n\n\n");
        assert_eq!(normalize_trailing_newline("a\n\nb"), "a\n\nb\n");
    }

    #[test]
    fn diff_reports_changed_line() {
        let diff = diff_lines("a\nb\nc\n", "a\nB\nc\n");

        assert_eq!(
            diff,
            vec![
                DiffLine::Unchanged("a".into()),
                DiffLine::Removed("b".into()),
                DiffLine::Added("B".into()),
                DiffLine::Unchanged("c".into()),
            ]
        );
    }

    #[test]
    fn file_matches_exact_copy() -> Result<()> {
        let dir = assert_fs::TempDir::new()?;
        dir.child("report.csv").write_str("id,count\n1,2\n")?;
        dir.child("report.expected").write_str("id,count\n1,2\n")?;

        let verdict = FileComparator {
            actual: "report.csv".into(),
            expected: "report.expected".into(),
        }
        .compare(dir.path())?;

        assert!(verdict.passed());
        assert_eq!(verdict.text, TextComparison::Matches);
        assert_eq!(verdict.exit_status, StatusComparison::NotChecked);
        assert_eq!(verdict.command, None);

        Ok(())
    }

    #[test]
    fn file_ignores_missing_trailing_newline() -> Result<()> {
        let dir = assert_fs::TempDir::new()?;
        dir.child("out.txt").write_str("x\ny")?;
        dir.child("out.expected").write_str("x\ny\n")?;

        let verdict = FileComparator {
            actual: "out.txt".into(),
            expected: "out.expected".into(),
        }
        .compare(dir.path())?;

        assert!(verdict.passed());

        Ok(())
    }

    #[test]
    fn file_with_extra_blank_lines_fails() -> Result<()> {
        let dir = assert_fs::TempDir::new()?;
        dir.child("report.csv").write_str("id,count\n1,2\n\n\n")?;
        dir.child("report.expected").write_str("id,count\n1,2\n")?;

        let verdict = FileComparator {
            actual: "report.csv".into(),
            expected: "report.expected".into(),
        }
        .compare(dir.path())?;

        let TextComparison::Differs { diff, .. } = &verdict.text else {
            anyhow::bail!("expected a text difference, got {:?}", verdict.text);
        };

        let changes: Vec<_> = diff.iter().filter(|d| d.is_change()).collect();
        assert_eq!(
            changes,
            vec![&DiffLine::Added(String::new()), &DiffLine::Added(String::new())]
        );

        Ok(())
    }

    #[test]
    fn file_with_appended_line_reports_one_addition() -> Result<()> {
        let dir = assert_fs::TempDir::new()?;
        dir.child("report.csv").write_str("id,count\n1,2\nextra\n")?;
        dir.child("report.expected").write_str("id,count\n1,2\n")?;

        let verdict = FileComparator {
            actual: "report.csv".into(),
            expected: "report.expected".into(),
        }
        .compare(dir.path())?;

        assert!(verdict.is_failure());

        let TextComparison::Differs {
            diff,
            actual_source,
            ..
        } = &verdict.text
        else {
            anyhow::bail!("expected a text difference, got {:?}", verdict.text);
        };

        let changes: Vec<_> = diff.iter().filter(|d| d.is_change()).collect();
        assert_eq!(changes, vec![&DiffLine::Added("extra".into())]);
        assert_eq!(actual_source.as_deref(), Some(Path::new("report.csv")));

        Ok(())
    }

    #[test]
    fn missing_actual_file_is_harness_error() -> Result<()> {
        let dir = assert_fs::TempDir::new()?;
        dir.child("report.expected").write_str("x\n")?;

        let result = FileComparator {
            actual: "output/report.csv".into(),
            expected: "report.expected".into(),
        }
        .compare(dir.path());

        assert!(matches!(result, Err(Error::ReadActual { .. })));

        Ok(())
    }

    #[test]
    fn missing_expectation_is_harness_error() -> Result<()> {
        let dir = assert_fs::TempDir::new()?;
        dir.child("report.csv").write_str("x\n")?;

        let result = FileComparator {
            actual: "report.csv".into(),
            expected: "report.expected".into(),
        }
        .compare(dir.path());

        assert!(matches!(result, Err(Error::ReadExpectation { .. })));

        Ok(())
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use anyhow::Result;
        use pretty_assertions::assert_eq;

        fn sh(script: &str) -> Invocation {
            Invocation::new("sh").with_args(["-c", script])
        }

        fn stdout_exit(
            dir: &assert_fs::TempDir,
            script: &str,
            expected_stdout: &str,
            expected_exit_status: i32,
        ) -> Result<Verdict> {
            dir.child("expected.txt").write_str(expected_stdout)?;

            Ok(StdoutExitComparator {
                invocation: sh(script),
                expected_stdout: "expected.txt".into(),
                expected_exit_status,
            }
            .compare(dir.path())?)
        }

        #[test]
        fn stdout_and_status_match() -> Result<()> {
            let dir = assert_fs::TempDir::new()?;
            let verdict = stdout_exit(&dir, "echo usage: magphi; exit 2", "usage: magphi\n", 2)?;

            assert!(verdict.passed());
            assert_eq!(verdict.text, TextComparison::Matches);
            assert_eq!(verdict.exit_status, StatusComparison::Matches(2));
            assert_eq!(verdict.command.as_deref(), Some("sh -c 'echo usage: magphi; exit 2'"));

            Ok(())
        }

        #[test]
        fn output_without_trailing_newline_matches() -> Result<()> {
            let dir = assert_fs::TempDir::new()?;
            let verdict = stdout_exit(&dir, "printf usage", "usage\n", 0)?;

            assert!(verdict.passed());

            Ok(())
        }

        #[test]
        fn extra_trailing_newline_fails_either_way() -> Result<()> {
            let dir = assert_fs::TempDir::new()?;

            assert!(stdout_exit(&dir, r"printf 'usage\n\n'", "usage\n", 0)?.is_failure());
            assert!(stdout_exit(&dir, r"printf 'usage\n'", "usage\n\n", 0)?.is_failure());
            assert!(stdout_exit(&dir, r"printf 'usage\n'", "usage\n", 0)?.passed());

            Ok(())
        }

        #[test]
        fn single_character_divergence_fails() -> Result<()> {
            let dir = assert_fs::TempDir::new()?;
            let verdict = stdout_exit(&dir, "echo usage: magphj", "usage: magphi\n", 0)?;

            assert!(verdict.is_failure());
            assert!(verdict.text.is_failure());
            assert_eq!(verdict.exit_status, StatusComparison::Matches(0));

            Ok(())
        }

        #[test]
        fn status_mismatch_alone_fails() -> Result<()> {
            let dir = assert_fs::TempDir::new()?;
            let verdict = stdout_exit(&dir, "echo usage; exit 1", "usage\n", 2)?;

            assert!(verdict.is_failure());
            assert_eq!(verdict.text, TextComparison::Matches);
            assert_eq!(
                verdict.exit_status,
                StatusComparison::Differs {
                    expected: 2,
                    actual: 1
                }
            );

            Ok(())
        }

        #[test]
        fn text_and_status_failures_are_both_kept() -> Result<()> {
            let dir = assert_fs::TempDir::new()?;
            let verdict = stdout_exit(&dir, "echo wrong; exit 1", "usage\n", 2)?;

            assert!(verdict.text.is_failure());
            assert!(verdict.exit_status.is_failure());

            Ok(())
        }

        #[test]
        fn empty_expectation_requires_empty_output() -> Result<()> {
            let dir = assert_fs::TempDir::new()?;

            assert!(stdout_exit(&dir, "true", "", 0)?.passed());
            assert!(stdout_exit(&dir, "echo", "", 0)?.is_failure());

            Ok(())
        }

        #[test]
        fn stdout_exit_is_idempotent() -> Result<()> {
            let dir = assert_fs::TempDir::new()?;
            let first = stdout_exit(&dir, "echo one; exit 4", "two\n", 3)?;
            let second = stdout_exit(&dir, "echo one; exit 4", "two\n", 3)?;

            assert_eq!(first, second);

            Ok(())
        }

        #[test]
        fn exit_status_ignores_stdout() -> Result<()> {
            let dir = assert_fs::TempDir::new()?;

            let verdict = ExitStatusComparator {
                invocation: sh("echo anything at all; exit 3"),
                expected_exit_status: 3,
            }
            .compare(dir.path())?;

            assert!(verdict.passed());
            assert_eq!(verdict.text, TextComparison::NotChecked);

            let verdict = ExitStatusComparator {
                invocation: sh("exit 0"),
                expected_exit_status: 3,
            }
            .compare(dir.path())?;

            assert_eq!(
                verdict.exit_status,
                StatusComparison::Differs {
                    expected: 3,
                    actual: 0
                }
            );

            Ok(())
        }
    }
}
