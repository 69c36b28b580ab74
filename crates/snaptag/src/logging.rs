//! Tracing setup for the snaptag binary.
//!
//! Logs go to stderr so stdout stays clean for keyword output and the
//! progress bar. The level comes from the config file unless `--verbose`
//! or `RUST_LOG` overrides it, and `--json-logs` (or `format = "json"` in
//! config) switches to structured output for machine consumers.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wire up the global subscriber from config plus CLI overrides.
pub fn init_from_config(
    config: &snaptag_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let verbose =
        verbose_override || matches!(config.logging.level.as_str(), "debug" | "trace");
    let json = json_logs_override || config.logging.format == "json";
    init(verbose, json);
}

fn init(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    // RUST_LOG wins over both config and --verbose
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}
