//! Tracing subscriber setup
//!
//! Logs go to stderr so they never interleave with prompts on stdout.
//! `RUST_LOG` takes precedence over the configured level.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use cl_shared::config::{LogFormat, LoggingConfig};

/// Install the global tracing subscriber described by `config`
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.colored)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}
