//! tracing setup for the command-line tool

use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Directive used when nothing else is configured
pub const DEFAULT_FILTER: &str = "tripstats=warn";

/// Directive used by `--verbose`
pub const VERBOSE_FILTER: &str = "tripstats=debug";

/// Pick the filter directive: `--verbose`, then `RUST_LOG`, then settings
pub fn resolve_filter(verbose: bool, env: Option<&str>, configured: Option<&str>) -> String {
    if verbose {
        return VERBOSE_FILTER.to_string();
    }
    env.filter(|d| !d.trim().is_empty())
        .or(configured)
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Install the global subscriber once; logs go to stderr.
pub fn init(directive: &str) {
    TRACING_INIT.call_once(|| {
        let filter =
            EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // Fails only when another global subscriber is already installed
        // (tests, embedding binaries); that subscriber keeps receiving events.
        if let Err(e) = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
        {
            debug!("tracing subscriber already installed: {}", e);
        }
    });
}
