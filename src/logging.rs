//! Structured logging for the `fetchurl` binary.
//!
//! Log lines go to stderr so that stdout only carries the tool's own output,
//! such as the snippet printed in report-only mode.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set, by number of `-v` flags.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity`. Fails if a global subscriber
/// was already installed.
pub fn init_logging(
    verbosity: u8,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()?;

    tracing::debug!("logging initialized");
    Ok(())
}
