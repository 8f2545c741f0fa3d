//! Diagnostics for the `palaver` binary.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "palaver=debug";

/// Filter used when `RUST_LOG` is not set. `--verbose` always wins.
pub fn filter_directive(verbose: bool, rust_log: Option<&str>) -> String {
    match (verbose, rust_log.map(str::trim).filter(|s| !s.is_empty())) {
        (true, Some(env)) => format!("{env},{VERBOSE_FILTER}"),
        (true, None) => format!("{DEFAULT_FILTER},{VERBOSE_FILTER}"),
        (false, Some(env)) => env.to_string(),
        (false, None) => DEFAULT_FILTER.to_string(),
    }
}

/// Install the stderr `tracing` subscriber. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
