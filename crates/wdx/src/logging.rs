//! Logging initialization.
//!
//! Uses the `tracing` ecosystem with either human-readable or JSON output.
//! Logs go to stderr so progress output and logs never mix with data written
//! to stdout.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` wins over `level` when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section plus CLI overrides.
pub fn init_from_config(config: &wdx_core::Config, verbose: bool, json_logs: bool) {
    init(
        effective_level(&config.logging.level, verbose),
        json_logs || config.logging.format == "json",
    );
}

/// `--verbose` raises anything quieter than debug to debug.
fn effective_level(configured: &str, verbose: bool) -> &str {
    match configured {
        "trace" | "debug" => configured,
        _ if verbose => "debug",
        "error" | "warn" | "info" => configured,
        other => {
            eprintln!("Warning: unknown log level '{other}', using info");
            "info"
        }
    }
}
