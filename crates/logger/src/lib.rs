//! Tracing setup shared by the binaries.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info";
const VERBOSE_DIRECTIVE: &str = "debug";

/// Picks the filter directive used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    }
}

/// Initialize tracing. `RUST_LOG` wins over the default directive.
pub fn init(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(verbose).into()),
        )
        .with_target(false)
        .init();
}
