use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Pick the log filter: `verbose` wins over `quiet`, then `RUST_LOG`, then info.
pub fn log_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("codeweb=debug")
    } else if quiet {
        EnvFilter::new("codeweb=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("codeweb=info"))
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean for
/// rendered graphs and JSON.
pub fn init_logger(verbose: bool, quiet: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(log_filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_enables_debug() {
        assert_eq!(log_filter(true, false).to_string(), "codeweb=debug");
    }

    #[test]
    fn test_quiet_limits_to_errors() {
        assert_eq!(log_filter(false, true).to_string(), "codeweb=error");
    }

    #[test]
    fn test_verbose_wins_over_quiet() {
        assert_eq!(log_filter(true, true).to_string(), "codeweb=debug");
    }
}
