//! Log setup for enrichment runs.
//!
//! Enrichment logs go to stderr so that command output on stdout stays
//! clean. HTTP client internals are capped at WARN unless `RUST_LOG` asks
//! for more.

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::Result;
use crate::error::EnrichmentError;

/// Targets that are chatty at DEBUG and rarely useful for a run.
const NOISY_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "h2"];

/// Maps CLI verbosity flags onto a tracing level. `quiet` wins.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Filter directives for a verbosity level.
pub fn filter_directives(level: Level) -> String {
    let mut directives = vec![level.as_str().to_lowercase()];
    if level > Level::WARN {
        directives.extend(NOISY_TARGETS.iter().map(|target| format!("{}=warn", target)));
    }
    directives.join(",")
}

/// Installs the global subscriber.
///
/// `RUST_LOG`, when set and valid, replaces the flag-derived filter.
///
/// # Errors
/// Returns a configuration error if the filter is invalid or a global
/// subscriber is already installed.
///
/// # Example
/// ```rust,no_run
/// use schemalift_core::logging::init_logging;
///
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directives(level_for(verbose, quiet))).map_err(
            |e| EnrichmentError::configuration(format!("Invalid log filter: {}", e)),
        )?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| {
            EnrichmentError::configuration(format!("Failed to initialize logging: {}", e))
        })
}
