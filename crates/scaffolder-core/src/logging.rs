//! Diagnostic logging
//!
//! User-facing progress goes through the prompt UI. Diagnostics (registry
//! lookups, glob expansion, every file written) are `tracing` events sent to
//! stderr and filtered by `RUST_LOG`, defaulting to warnings only.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
        tracing::debug!("logging initialized");
    }
}
