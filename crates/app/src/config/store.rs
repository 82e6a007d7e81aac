//! Parts Store Config

use std::time::Duration;

use clap::Args;
use rusty_money::{Findable, iso::Currency};

use partlist::costs::TotalBasis;

use crate::{coordinator::CoordinatorSettings, store::HttpStoreConfig};

use super::ConfigError;

/// What the store's reported totals are checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Basis {
    /// A part's total covers its whole subtree.
    Rollup,

    /// A part's total covers its own line only.
    Line,
}

impl From<Basis> for TotalBasis {
    fn from(basis: Basis) -> Self {
        match basis {
            Basis::Rollup => TotalBasis::Rollup,
            Basis::Line => TotalBasis::Line,
        }
    }
}

/// Parts store settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Base URL of the parts store
    #[arg(long, env = "PARTLIST_STORE_URL", default_value = "http://localhost:8000")]
    pub store_url: String,

    /// Upper bound for a single store request, in seconds
    #[arg(long, env = "PARTLIST_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub timeout_seconds: u64,

    /// ISO 4217 currency the store's prices are expressed in
    #[arg(long, env = "PARTLIST_CURRENCY", default_value = "RUB")]
    pub currency: String,

    /// What store-reported totals are checked against (rollup, line)
    #[arg(long, env = "PARTLIST_TOTAL_BASIS", value_enum, default_value_t = Basis::Rollup)]
    pub total_basis: Basis,
}

impl StoreConfig {
    /// Request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Duration::from_secs(self.timeout_seconds))
    }

    /// Resolve the configured currency code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is not a known ISO currency.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        let code = self.currency.trim().to_uppercase();

        Currency::find(&code).ok_or(ConfigError::UnknownCurrency(code))
    }

    /// Settings for the HTTP store client.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero.
    pub fn http(&self) -> Result<HttpStoreConfig, ConfigError> {
        Ok(HttpStoreConfig {
            base_url: self.store_url.clone(),
            timeout: self.timeout()?,
        })
    }

    /// Settings for the mutation coordinator.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero.
    pub fn coordinator(&self) -> Result<CoordinatorSettings, ConfigError> {
        Ok(CoordinatorSettings {
            timeout: self.timeout()?,
            basis: self.total_basis.into(),
        })
    }
}
