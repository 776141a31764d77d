//! Configuration types for the harness.

use std::path::PathBuf;

/// Configuration for one harness run.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Program under test; used by every plan entry that doesn't name its own program.
    pub program: PathBuf,
    /// Directory holding fixtures. Commands run here and relative paths resolve against it.
    pub fixtures_dir: PathBuf,
    /// Announce each check as it starts.
    pub verbose: bool,
}

impl RunnerConfig {
    /// Creates a new runner config with default values.
    pub fn new(program: impl Into<PathBuf>, fixtures_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            fixtures_dir: fixtures_dir.into(),
            verbose: false,
        }
    }

    /// Sets whether each check is announced as it starts.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
