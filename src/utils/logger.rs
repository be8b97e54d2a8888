use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directive(verbose: bool, level: Option<&str>) -> String {
    match (verbose, level) {
        (true, _) => "taxi_fare=debug,info".to_string(),
        (false, Some(level)) => format!("taxi_fare={}", level),
        (false, None) => "taxi_fare=info".to_string(),
    }
}

/// Console logging for the CLI. `RUST_LOG` wins over `level` and `verbose`.
pub fn init_cli_logger(verbose: bool, level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// JSON lines on stderr, for running batch jobs under a log collector.
pub fn init_json_logger(verbose: bool, level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_configured_level() {
        assert_eq!(default_directive(true, Some("warn")), "taxi_fare=debug,info");
        assert_eq!(default_directive(true, None), "taxi_fare=debug,info");
    }

    #[test]
    fn test_configured_level_and_fallback() {
        assert_eq!(default_directive(false, Some("warn")), "taxi_fare=warn");
        assert_eq!(default_directive(false, None), "taxi_fare=info");
    }
}
