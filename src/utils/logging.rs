//! Logging setup for applications embedding the decoder.
//!
//! The decoder itself only emits `debug`/`trace` events; installing a
//! subscriber is left to the caller, and this is the standard way to do it.

use crate::config::LoggingConfig;
use crate::error::{InformError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
/// Returns `InformError::ConfigError` if a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_lowercase()));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_format {
        subscriber
            .with(fmt::layer().json())
            .try_init()
            .map_err(|e| InformError::ConfigError(format!("Failed to init logging: {e}")))?;
    } else {
        subscriber
            .with(fmt::layer())
            .try_init()
            .map_err(|e| InformError::ConfigError(format!("Failed to init logging: {e}")))?;
    }

    tracing::info!(app = %config.app_name, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        // The first call may race other tests installing a subscriber; only
        // the second one is guaranteed to fail.
        let _ = init_logging(&config);
        assert!(matches!(
            init_logging(&config),
            Err(InformError::ConfigError(_))
        ));
    }
}
