//! Parts Store
//!
//! The remote service that owns the parts. Everything the client knows about
//! the tree comes from here.

use std::fmt::{Display, Formatter, Result as FmtResult};

use async_trait::async_trait;
use mockall::automock;

use partlist::parts::{PartId, PartPayload, PartRecord};

pub mod errors;
pub mod http;

pub use errors::StoreError;
pub use http::{HttpPartsStore, HttpStoreConfig};

/// Document formats the store can export the tree to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Spreadsheet (`.xlsx`)
    Excel,

    /// Printable document (`.pdf`)
    Pdf,
}

impl ExportFormat {
    /// Path segment under `/export/`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excel => "excel",
            Self::Pdf => "pdf",
        }
    }

    /// File name used when saving a download.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Excel => "parts.xlsx",
            Self::Pdf => "parts.pdf",
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[automock]
#[async_trait]
pub trait PartsStore: Send + Sync {
    /// Fetch every part, nested or flat.
    async fn fetch_parts(&self) -> Result<Vec<PartRecord>, StoreError>;

    /// Create a part and return it as stored.
    async fn create_part(&self, part: PartPayload) -> Result<PartRecord, StoreError>;

    /// Replace a part's attributes.
    async fn update_part(&self, id: PartId, part: PartPayload) -> Result<(), StoreError>;

    /// Delete a part.
    async fn delete_part(&self, id: PartId) -> Result<(), StoreError>;

    /// Download the tree rendered in the given format.
    async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, StoreError>;
}
