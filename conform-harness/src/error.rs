//! Harness-level errors.
//!
//! These are distinct from check failures: a check failure is an ordinary, recorded
//! [`Verdict`](crate::Verdict), whereas an [`Error`] means the harness itself is misconfigured
//! and the run cannot continue.

use std::path::PathBuf;

/// Error that aborts a harness run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The program under test could not be started at all.
    #[error("failed to launch '{command}'")]
    Spawn {
        /// Display form of the command that failed to launch.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file holding expected output is missing or unreadable.
    #[error("failed to read expectation file {}", .path.display())]
    ReadExpectation {
        /// Path to the expectation file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An output file the program was expected to write is missing or unreadable.
    #[error("failed to read output file {}", .path.display())]
    ReadActual {
        /// Path to the output file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The test plan file could not be read.
    #[error("failed to read test plan {}", .path.display())]
    ReadPlan {
        /// Path to the plan file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The test plan is not valid.
    #[error("failed to parse test plan {origin}")]
    ParsePlan {
        /// Where the plan came from (a path, or a name for built-in plans).
        origin: String,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Writing the report failed.
    #[error("failed to write report")]
    Report(#[from] std::io::Error),
}

/// Result type used throughout the harness.
pub type Result<T> = std::result::Result<T, Error>;
