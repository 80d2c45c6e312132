//! Logging init: `tracing` events to stderr, filtered by `RUST_LOG` or the
//! CLI verbosity level.

use tracing_subscriber::EnvFilter;

/// Filter directive for a CLI verbosity level.
pub fn directive_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "off",
        1 => "error",
        2 => "warn",
        3 | 4 => "warn,abuseenricher=info",
        _ => "info,abuseenricher=debug",
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `verbose` when set.
/// Calling it twice is harmless; the second call is ignored.
pub fn init_logging(verbose: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive_for(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(directive_for(0), "off");
        assert_eq!(directive_for(2), "warn");
        assert!(directive_for(3).contains("abuseenricher=info"));
        assert!(directive_for(5).contains("abuseenricher=debug"));
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logging(0);
        init_logging(5);
    }
}
