//! Tracing subscriber setup

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Pick the default filter directive from the CLI flags.
///
/// `--quiet` wins, then `--verbose`, then the configured level.
pub fn filter_directive(verbose: bool, quiet: bool, configured: &str) -> String {
    if quiet {
        Level::ERROR.to_string()
    } else if verbose {
        Level::DEBUG.to_string()
    } else {
        configured.to_string()
    }
}

/// Install a stderr subscriber. `RUST_LOG` overrides the flags when set.
pub fn configure_logging(verbose: bool, quiet: bool, configured: &str) {
    let directive = filter_directive(verbose, quiet, configured);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins() {
        assert_eq!(filter_directive(true, true, "info"), "ERROR");
    }

    #[test]
    fn test_verbose_is_debug() {
        assert_eq!(filter_directive(true, false, "warn"), "DEBUG");
    }

    #[test]
    fn test_configured_level_is_default() {
        assert_eq!(filter_directive(false, false, "workshop_kanban=trace"), "workshop_kanban=trace");
    }
}
