use tracing_subscriber::{
    Layer, filter::LevelFilter, filter::Targets, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Crates whose events are subject to the verbosity flags.
const TARGETS: [&str; 2] = ["conform", "conform_harness"];

/// Installs the global tracing subscriber, writing to stderr.
///
/// Only warnings and errors are shown by default; `verbose` adds informational events
/// (which check is running) and `debug` adds the commands spawned and their statuses.
/// Returns whether the subscriber was installed.
pub(crate) fn init(verbose: bool, debug: bool) -> bool {
    let level = if debug {
        LevelFilter::DEBUG
    } else if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };

    let filter = Targets::new()
        .with_default(LevelFilter::WARN)
        .with_targets(TARGETS.into_iter().map(|target| (target, level)));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .is_err()
    {
        // Something went wrong; proceed on anyway but complain audibly.
        eprintln!("warning: failed to initialize tracing.");
        return false;
    }

    true
}
