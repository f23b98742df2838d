//! Logging initialization for the binary.

use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// `verbose` picks the default filter (debug output for this crate, warnings
/// otherwise); a set `RUST_LOG` replaces it. Logs go to stderr so reports on
/// stdout stay clean.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .with(filter)
        .init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "lookback=debug" } else { "lookback=warn" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_selects_debug_for_this_crate() {
        assert_eq!(default_directive(true), "lookback=debug");
        assert_eq!(default_directive(false), "lookback=warn");
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
    }
}
