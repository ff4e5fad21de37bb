pub mod config;
pub mod error;

pub use config::{CalendarConfig, Config, GoogleConfig, LoggingConfig, ValidationResult};
pub use error::{AppError, AuthError, ConfigError, NetworkError, ReqwestErrorExt};

use anyhow::Result;

/// Initialize logging. `RUST_LOG` wins over `level` when set.
///
/// Logs go to stderr so formula results on stdout stay machine-readable.
pub fn init_with_level(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("calnotify core initialized");
    Ok(())
}
