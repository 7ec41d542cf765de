//! Logging init: structured output on stderr, leaving stdout for image locations.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset and `--verbose` was not given.
const QUIET_FILTER: &str = "warn";

/// Default filter when `RUST_LOG` is unset and `--verbose` was given.
const VERBOSE_FILTER: &str = "info,tagwall=debug";

/// Picks the filter directive used when `RUST_LOG` is not set.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        QUIET_FILTER
    }
}

/// Initialize logging to stderr. `RUST_LOG` overrides the verbosity flag.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
