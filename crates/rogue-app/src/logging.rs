//! Logging setup for the binary.
//!
//! A `tracing-subscriber` registry with an `EnvFilter` and one `fmt` layer,
//! compact for terminals or JSON for log collection. `RUST_LOG` overrides
//! the configured level.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    /// Emit one JSON object per line instead of compact text.
    pub json: bool,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub fn default_directive(&self) -> String {
        self.level.to_string().to_lowercase()
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.default_directive()))?;

    let registry = Registry::default().with(env_filter);
    if config.json {
        registry
            .with(fmt::layer().with_target(config.with_target).json())
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(config.with_target).compact())
            .try_init()?;
    }
    Ok(())
}
