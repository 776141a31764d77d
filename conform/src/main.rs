//! Implements the command-line interface for the `conform` harness.

#![deny(missing_docs)]

mod args;
mod events;
mod productinfo;

use crate::args::CommandLineArgs;
use anyhow::Context;
use clap::Parser;
use conform_harness::{RunnerConfig, TestPlan, TestRunner};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Plan used when none is given on the command line.
const BUILTIN_PLAN: &str = include_str!("../plans/magphi.yaml");

/// Main entry point for the `conform` harness.
fn main() -> ExitCode {
    //
    // Set up panic handler. On release builds, it will capture panic details to a
    // temporary .toml file and report a human-readable message to the screen.
    //
    human_panic::setup_panic!(human_panic::Metadata::new(
        productinfo::PRODUCT_NAME,
        productinfo::PRODUCT_VERSION
    ));

    // Missing or invalid options exit with status 2; help exits with 0.
    let args = CommandLineArgs::parse();

    let tracing_enabled = events::init(args.verbose, args.debug);

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            if tracing_enabled {
                tracing::error!("{err:#}");
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CommandLineArgs) -> anyhow::Result<u8> {
    match args.color {
        clap::ColorChoice::Always => colored::control::set_override(true),
        clap::ColorChoice::Never => colored::control::set_override(false),
        clap::ColorChoice::Auto => (),
    }

    let plan = load_plan(args.plan.as_deref())?;

    let fixtures_dir = std::path::absolute(&args.data_dir)
        .with_context(|| format!("resolving {}", args.data_dir.display()))?;
    if !fixtures_dir.is_dir() {
        anyhow::bail!("fixtures directory not found: {}", fixtures_dir.display());
    }

    let config = RunnerConfig::new(resolve_program(&args.program)?, fixtures_dir)
        .with_verbose(args.verbose);
    let runner = TestRunner::new(config, plan);

    if args.list {
        runner.list(std::io::stdout().lock())?;
        return Ok(0);
    }

    let totals = runner.run(std::io::stdout().lock())?;

    Ok(totals.exit_code())
}

fn load_plan(path: Option<&Path>) -> anyhow::Result<TestPlan> {
    let plan = match path {
        Some(path) => TestPlan::load(path)?,
        None => TestPlan::from_yaml_str(BUILTIN_PLAN, "(built-in magphi plan)")?,
    };

    Ok(plan)
}

/// Anchors a program given as a relative path to the directory the harness was started from,
/// since checks run from the fixtures directory. Bare names are left for PATH lookup.
fn resolve_program(program: &Path) -> anyhow::Result<PathBuf> {
    if program.components().count() > 1 {
        std::path::absolute(program).with_context(|| format!("resolving {}", program.display()))
    } else {
        Ok(program.to_owned())
    }
}
