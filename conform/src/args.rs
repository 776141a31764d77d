use clap::Parser;
use std::path::PathBuf;

use crate::productinfo;

const SHORT_DESCRIPTION: &str = "Black-box conformance tests for command-line programs";

const LONG_DESCRIPTION: &str = r"
conform runs a fixed, ordered test plan against an already-built program. Each check compares the
program's stdout and exit status, or a file it wrote, against expectations stored in a fixtures
directory.

Without --plan, the built-in plan for the Magphi command line is used.

Exit status is 0 when every check passes, 1 when any check fails or the harness itself hits an
error, and 2 when required options are missing.
";

/// Parsed command-line arguments for the harness.
#[derive(Parser)]
#[clap(name = productinfo::PRODUCT_NAME,
       version = productinfo::PRODUCT_VERSION,
       about = SHORT_DESCRIPTION,
       long_about = LONG_DESCRIPTION,
       disable_help_flag = true)]
pub(crate) struct CommandLineArgs {
    /// Display usage information.
    #[clap(short = 'h', long = "help", action = clap::ArgAction::HelpLong)]
    #[allow(dead_code, reason = "only consumed by clap")]
    pub help: Option<bool>,

    /// Program under test (a path, or a name looked up in PATH).
    #[clap(short = 'p', long = "program", env = "CONFORM_PROGRAM", value_name = "PROGRAM")]
    pub program: PathBuf,

    /// Directory holding fixture files; checks run from here.
    #[clap(short = 'd', long = "data-dir", env = "CONFORM_DATA_DIR", value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Announce each check as it runs.
    #[clap(short = 'v', long = "verbose", env = "CONFORM_VERBOSE")]
    pub verbose: bool,

    /// Enable debug-level tracing (commands spawned, exit statuses).
    #[clap(long = "debug")]
    pub debug: bool,

    /// Test plan to run instead of the built-in one.
    #[clap(long = "plan", value_name = "FILE")]
    pub plan: Option<PathBuf>,

    /// List the plan's entries without running them.
    #[clap(long = "list")]
    pub list: bool,

    /// Colorize output?
    #[clap(long = "color", default_value_t = clap::ColorChoice::Auto)]
    pub color: clap::ColorChoice,
}
