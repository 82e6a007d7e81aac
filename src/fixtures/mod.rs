//! Fixtures
//!
//! Part collections stored as YAML under `fixtures/parts/`, shaped the way
//! the store returns them.

use std::{fs, path::PathBuf};

use rusty_money::{Findable, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    parts::PartRecord,
    tree::{Assembly, assemble},
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

#[derive(Debug, Deserialize)]
struct PartsFile {
    currency: String,
    parts: Vec<PartRecord>,
}

/// A loaded part collection.
#[derive(Debug, Clone)]
pub struct Fixture {
    records: Vec<PartRecord>,
    currency: &'static Currency,
}

impl Fixture {
    /// Load `./fixtures/parts/{name}.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or names an
    /// unknown currency.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_path(PathBuf::from("./fixtures").join("parts").join(format!("{name}.yml")))
    }

    /// Load a part collection from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or names an
    /// unknown currency.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path.into())?;

        Self::from_yaml(&contents)
    }

    /// Parse a part collection from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or names an unknown
    /// currency.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        let file: PartsFile = serde_norway::from_str(contents)?;

        let currency = Currency::find(&file.currency)
            .ok_or_else(|| FixtureError::UnknownCurrency(file.currency.clone()))?;

        Ok(Self {
            records: file.parts,
            currency,
        })
    }

    /// The records as stored.
    #[must_use]
    pub fn records(&self) -> &[PartRecord] {
        &self.records
    }

    /// Currency the prices are expressed in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Assemble the records into a tree.
    #[must_use]
    pub fn assembly(&self) -> Assembly {
        assemble(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn loads_nested_set() -> TestResult {
        let fixture = Fixture::from_set("gearbox")?;

        assert_eq!(fixture.records().len(), 2);
        assert_eq!(fixture.currency(), iso::RUB);
        assert_eq!(fixture.assembly().tree.len(), 6);

        Ok(())
    }

    #[test]
    fn loads_flat_set() -> TestResult {
        let fixture = Fixture::from_set("flat")?;

        assert_eq!(fixture.records().len(), 5);

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let result = Fixture::from_yaml("currency: XXZ\nparts: []\n");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "XXZ"));
    }

    #[test]
    fn missing_set_is_an_io_error() {
        assert!(matches!(
            Fixture::from_set("does-not-exist"),
            Err(FixtureError::Io(_))
        ));
    }
}
