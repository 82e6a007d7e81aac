//! Client configuration module

use clap::Args;
use thiserror::Error;

pub mod observability;
pub mod store;

pub use observability::{LogFormat, LoggingConfig};
pub use store::{Basis, StoreConfig};

/// Errors raised while turning parsed settings into runtime values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The currency code is not a known ISO 4217 code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The store timeout must be at least one second.
    #[error("timeout-seconds must be greater than zero")]
    ZeroTimeout,
}

/// Settings shared by every `partlist` command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Parts store settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
