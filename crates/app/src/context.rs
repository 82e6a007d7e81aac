//! App Context

use std::sync::Arc;

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    config::{ConfigError, StoreConfig},
    coordinator::MutationCoordinator,
    store::{HttpPartsStore, StoreError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build the parts store client")]
    Store(#[source] StoreError),
}

/// Everything a command needs to talk to the store.
#[derive(Debug)]
pub struct AppContext {
    pub coordinator: MutationCoordinator,
    pub currency: &'static Currency,
}

impl AppContext {
    /// Build application context from store settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the settings are invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &StoreConfig) -> Result<Self, AppInitError> {
        let currency = config.currency()?;
        let store = HttpPartsStore::new(config.http()?).map_err(AppInitError::Store)?;

        Ok(Self {
            coordinator: MutationCoordinator::new(Arc::new(store), config.coordinator()?),
            currency,
        })
    }
}
