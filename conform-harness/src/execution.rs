//! Execution logic for running the program under test.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// What to do with a child process's standard error stream.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StderrDisposition {
    /// Drop everything the child writes to stderr.
    #[default]
    Discard,
    /// Let the child write straight to the harness's own stderr.
    Inherit,
}

/// A fully-bound command line: a program plus its argument vector.
///
/// The program is spawned directly; arguments are never re-parsed by a shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
    stderr: StderrDisposition,
}

/// Result of running an [`Invocation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunResult {
    /// Standard output, decoded as (lossy) UTF-8.
    pub stdout: String,
    /// Exit status of the process.
    pub exit_status: i32,
}

impl Invocation {
    /// Creates an invocation of the given program with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            stderr: StderrDisposition::default(),
        }
    }

    /// Appends arguments to the invocation.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets what happens to the child's stderr.
    #[must_use]
    pub const fn with_stderr(mut self, stderr: StderrDisposition) -> Self {
        self.stderr = stderr;
        self
    }

    /// Returns the program to be executed.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the arguments passed to the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Runs the program to completion in `working_dir`, capturing its stdout and exit status.
    ///
    /// The child gets no stdin. This blocks for as long as the child runs.
    pub fn run(&self, working_dir: &Path) -> Result<RunResult> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(match self.stderr {
                StderrDisposition::Discard => Stdio::null(),
                StderrDisposition::Inherit => Stdio::inherit(),
            });

        tracing::debug!("running: {self}");

        let start_time = std::time::Instant::now();
        let output = cmd.output().map_err(|source| Error::Spawn {
            command: self.to_string(),
            source,
        })?;

        let exit_status = exit_code(output.status);
        tracing::debug!(
            "exited with status {exit_status} after {:?}",
            start_time.elapsed()
        );

        Ok(RunResult {
            stdout: String::from_utf8_lossy(output.stdout.as_slice()).to_string(),
            exit_status,
        })
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// Maps an exit status to the integer a shell would report for it.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

/// Quotes a word so the displayed command can be pasted into a POSIX shell.
fn quote(word: &str) -> Cow<'_, str> {
    let is_plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));

    if is_plain {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(std::format!("'{}'", word.replace('\'', r"'\''")))
    }
}
