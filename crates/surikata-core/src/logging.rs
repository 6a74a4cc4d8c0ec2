//! `tracing` subscriber bootstrap.
//!
//! [`init_subscriber`] installs a global subscriber writing to stderr, either
//! in compact human-readable form or as one JSON object per line. `RUST_LOG`
//! takes precedence over the configured level when set.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber with stderr output.
///
/// Call once at application startup. Subsequent calls are no-ops.
///
/// # Arguments
///
/// * `level` - Minimum log level (or full filter directive) when `RUST_LOG` is unset.
/// * `json` - Emit newline-delimited JSON instead of the compact format.
pub fn init_subscriber(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    // try_init fails if a global subscriber is already set
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_subscriber_is_idempotent() {
        init_subscriber("warn", false);
        init_subscriber("debug", true);
        tracing::info!("still alive");
    }
}
