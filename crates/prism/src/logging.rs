//! Logging initialization.
//!
//! `tracing` events go to stderr so stdout stays clean for answers and JSON
//! lines. `RUST_LOG` overrides the level chosen here.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Pick the default filter directive.
///
/// `--verbose` forces debug; otherwise the configured level is used when it is
/// one of error/warn/info/debug/trace, and info when it isn't.
fn default_level(configured: &str, verbose: bool) -> &'static str {
    if verbose {
        return "debug";
    }
    match configured.to_ascii_lowercase().as_str() {
        "error" => "error",
        "warn" => "warn",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    }
}

/// Initialize the logging subsystem.
///
/// * `level` - default filter directive when `RUST_LOG` is unset
/// * `json_format` - structured JSON lines instead of human-readable output
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

/// Initialize logging from the `[logging]` config section, with CLI overrides.
pub fn init_from_config(config: &prism_core::Config, verbose: bool, json_logs: bool) {
    let level = default_level(&config.logging.level, verbose);
    let json_format = json_logs || config.logging.format == "json";
    init(level, json_format);
}
