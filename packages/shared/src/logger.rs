//! Logging setup utilities for the relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing target of the relay library crate
const SERVER_TARGET: &str = "ludo_relay_server";

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// The server library crate, the binary and `tower_http` are enabled at the
/// same level. A binary whose target equals the library's is listed once.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut targets = vec![SERVER_TARGET];
    if binary_target != SERVER_TARGET {
        targets.push(&binary_target);
    }
    targets.push("tower_http");

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "ludo-relay-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use ludo_relay_shared::logger::setup_logger;
///
/// setup_logger("ludo-relay-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
