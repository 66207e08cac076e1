//! Logging initialization and configuration.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{log_dir, Config};

/// Initialize daemon logging: stdout plus a daily rolling file under the
/// log directory, filtered by the configured level (overridable with
/// `RUST_LOG`).
pub fn init_logging(cfg: &Config) -> Result<()> {
    let level = parse_log_level(&cfg.log.level)?;

    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deskmate={level}")));

    let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix("deskmate")
        .filename_suffix("log")
        .build(&dir)
        .map_err(|e| anyhow::anyhow!("Failed to create rolling file appender: {e}"))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    // Keep the appender guard alive for the process lifetime.
    std::mem::forget(guard);

    tracing::info!(level = %cfg.log.level, dir = %dir.display(), "Logging initialized");
    Ok(())
}

/// Parse log level string to a tracing level directive.
fn parse_log_level(level_str: &str) -> Result<&'static str> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" => Ok("warn"),
        "error" => Ok("error"),
        _ => anyhow::bail!("Invalid log level: {}", level_str),
    }
}

/// Initialize simple logging for commands that don't run the daemon.
pub fn init_simple_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "deskmate=info".into()),
        )
        .init();
}
