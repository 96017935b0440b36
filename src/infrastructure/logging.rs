//! Logging system configuration and initialization
//!
//! Console output only, plain or structured JSON. `RUST_LOG` takes precedence
//! over the configured level and module filters.

use anyhow::{Result, anyhow};
use tracing::info;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub use crate::infrastructure::config::LoggingConfig;

/// Initialize the logging system with default configuration
pub fn init_default_logging() -> Result<()> {
    init_logging(&LoggingConfig::default())
}

/// Install the global subscriber.
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let registry = Registry::default().with(build_env_filter(config)?);

    let installed = if config.json_format {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized");
    info!("Log level: {}", config.level);
    info!("JSON format: {}", config.json_format);
    Ok(())
}

/// `RUST_LOG` when set, otherwise the configured level and module filters
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => filter_from_config(config),
    }
}

fn filter_from_config(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e))?;

    for (module, level) in &config.module_filters {
        let directive = format!("{module}={level}");
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| anyhow!("Invalid log directive '{}': {}", directive, e))?,
        );
    }
    Ok(filter)
}
