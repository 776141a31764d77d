//! Test plan definitions and YAML schema.
//!
//! A plan is an ordered list of entries. Most entries are checks bound to one of the
//! comparators; `run` entries only execute a command for its side effects (typically writing
//! output files that later `file` entries validate).

use crate::comparison::{
    Comparator, ExitStatusComparator, FileComparator, StdoutExitComparator,
};
use crate::config::RunnerConfig;
use crate::error::{Error, Result};
use crate::execution::{Invocation, StderrDisposition};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An ordered set of plan entries loaded from a single YAML document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TestPlan {
    /// Name of the plan.
    pub name: Option<String>,

    /// The entries, in execution order.
    pub checks: Vec<PlanEntry>,
}

/// One entry in a test plan.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanEntry {
    /// Compare stdout against a file and the exit status against a value.
    StdoutExit(StdoutExitEntry),
    /// Compare a file the program wrote against an expected file.
    File(FileEntry),
    /// Compare only the exit status.
    ExitStatus(ExitStatusEntry),
    /// Run a command for its side effects; nothing is checked.
    Run(RunEntry),
}

/// How to launch the command for an entry that runs one.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CommandSpec {
    /// Program to run instead of the program under test. A relative path with more than one
    /// component is taken relative to the fixtures directory.
    #[serde(default)]
    pub program: Option<PathBuf>,
    /// Command-line arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// What to do with stderr.
    #[serde(default)]
    pub stderr: StderrDisposition,
}

/// A `stdout_exit` plan entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StdoutExitEntry {
    /// Name of the check.
    pub name: String,
    /// Command to run.
    #[serde(flatten)]
    pub command: CommandSpec,
    /// File holding the expected stdout.
    pub expected_stdout: PathBuf,
    /// Expected exit status.
    pub expected_exit_status: i32,
}

/// A `file` plan entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FileEntry {
    /// Name of the check.
    pub name: String,
    /// File written by an earlier entry.
    pub actual: PathBuf,
    /// File holding the expected contents.
    pub expected: PathBuf,
}

/// An `exit_status` plan entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExitStatusEntry {
    /// Name of the check.
    pub name: String,
    /// Command to run.
    #[serde(flatten)]
    pub command: CommandSpec,
    /// Expected exit status.
    pub expected_exit_status: i32,
}

/// A `run` plan entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RunEntry {
    /// Name of the step.
    pub name: String,
    /// Command to run.
    #[serde(flatten)]
    pub command: CommandSpec,
}

/// What the runner should do for a plan entry.
pub enum Action {
    /// Judge a check and record its verdict.
    Check(Box<dyn Comparator>),
    /// Execute a command and ignore its result.
    SideEffect(Invocation),
}

impl TestPlan {
    /// Parses a plan from YAML text; `origin` names the source in error messages.
    pub fn from_yaml_str(yaml: &str, origin: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|source| Error::ParsePlan {
            origin: origin.to_owned(),
            source,
        })
    }

    /// Reads and parses a plan file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| Error::ReadPlan {
            path: path.to_owned(),
            source,
        })?;

        Self::from_yaml_str(&yaml, &path.to_string_lossy())
    }

    /// Returns the number of entries that produce a verdict.
    pub fn check_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|entry| !matches!(entry, PlanEntry::Run(_)))
            .count()
    }
}

impl CommandSpec {
    /// Binds this spec to a concrete invocation.
    pub fn bind(&self, config: &RunnerConfig) -> Invocation {
        let program = match &self.program {
            Some(program) if program.is_relative() && program.components().count() > 1 => {
                config.fixtures_dir.join(program)
            }
            Some(program) => program.clone(),
            None => config.program.clone(),
        };

        Invocation::new(program)
            .with_args(self.args.iter().cloned())
            .with_stderr(self.stderr)
    }
}

impl PlanEntry {
    /// Returns the entry's name.
    pub fn name(&self) -> &str {
        match self {
            Self::StdoutExit(e) => &e.name,
            Self::File(e) => &e.name,
            Self::ExitStatus(e) => &e.name,
            Self::Run(e) => &e.name,
        }
    }

    /// Returns the entry's kind as written in YAML.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StdoutExit(_) => "stdout_exit",
            Self::File(_) => "file",
            Self::ExitStatus(_) => "exit_status",
            Self::Run(_) => "run",
        }
    }

    /// Returns the spec of the command this entry runs, if any.
    pub const fn command(&self) -> Option<&CommandSpec> {
        match self {
            Self::StdoutExit(e) => Some(&e.command),
            Self::ExitStatus(e) => Some(&e.command),
            Self::Run(e) => Some(&e.command),
            Self::File(_) => None,
        }
    }

    /// Returns the command this entry runs, if any.
    pub fn invocation(&self, config: &RunnerConfig) -> Option<Invocation> {
        self.command().map(|command| command.bind(config))
    }

    /// Binds this entry to the action the runner should take for it.
    pub fn action(&self, config: &RunnerConfig) -> Action {
        match self {
            Self::StdoutExit(e) => Action::Check(Box::new(StdoutExitComparator {
                invocation: e.command.bind(config),
                expected_stdout: e.expected_stdout.clone(),
                expected_exit_status: e.expected_exit_status,
            })),
            Self::File(e) => Action::Check(Box::new(FileComparator {
                actual: e.actual.clone(),
                expected: e.expected.clone(),
            })),
            Self::ExitStatus(e) => Action::Check(Box::new(ExitStatusComparator {
                invocation: e.command.bind(config),
                expected_exit_status: e.expected_exit_status,
            })),
            Self::Run(e) => Action::SideEffect(e.command.bind(config)),
        }
    }
}
