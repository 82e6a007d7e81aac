//! HTTP parts store client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::debug;

use partlist::parts::{PartId, PartPayload, PartRecord};

use crate::store::{
    ExportFormat, PartsStore,
    errors::{StoreError, rejection_detail},
};

/// Configuration for connecting to a parts store.
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Store base address, e.g. `"http://localhost:8000"`.
    pub base_url: String,

    /// Upper bound for a single request, connection included.
    pub timeout: Duration,
}

/// HTTP client for the parts store.
#[derive(Debug, Clone)]
pub struct HttpPartsStore {
    config: HttpStoreConfig,
    http: Client,
}

impl HttpPartsStore {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: HttpStoreConfig) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    /// The configured base address.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);

        debug!(%method, %url, "sending store request");

        self.http.request(method, url)
    }

    /// Pass successful responses through; turn anything else into a
    /// rejection carrying the store's `detail`.
    async fn accept(response: Response) -> Result<Response, StoreError> {
        let status = response.status();

        debug!(%status, url = %response.url(), "store responded");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await?;

        Err(StoreError::Rejected {
            status,
            detail: rejection_detail(&body),
        })
    }
}

#[async_trait]
impl PartsStore for HttpPartsStore {
    async fn fetch_parts(&self) -> Result<Vec<PartRecord>, StoreError> {
        let response = Self::accept(self.request(Method::GET, "").send().await?).await?;
        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(StoreError::Decode)
    }

    async fn create_part(&self, part: PartPayload) -> Result<PartRecord, StoreError> {
        let response =
            Self::accept(self.request(Method::POST, "").json(&part).send().await?).await?;
        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(StoreError::Decode)
    }

    async fn update_part(&self, id: PartId, part: PartPayload) -> Result<(), StoreError> {
        Self::accept(
            self.request(Method::PUT, &id.to_string())
                .json(&part)
                .send()
                .await?,
        )
        .await?;

        Ok(())
    }

    async fn delete_part(&self, id: PartId) -> Result<(), StoreError> {
        Self::accept(self.request(Method::DELETE, &id.to_string()).send().await?).await?;

        Ok(())
    }

    async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, StoreError> {
        let path = format!("export/{format}");
        let response = Self::accept(self.request(Method::GET, &path).send().await?).await?;

        Ok(response.bytes().await?.to_vec())
    }
}
