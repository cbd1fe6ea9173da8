//! # knca-client
//!
//! HTTP client for the document backend:
//! - `GET  /api/documents`
//! - `POST /api/documents` with `{content}`
//! - `PUT  /api/documents/{id}/sign` with `{signature}`
//!
//! [`BackendClient`] implements [`knca_core::DocumentBackend`] so it can be
//! driven by the document controller.

mod error;
mod http;

pub use error::BackendError;

use std::time::Duration;

use knca_config::BackendConfig;
use knca_core::{CreateDocumentRequest, Document, DocumentBackend, SignAck, SignDocumentRequest};

use crate::http::{check_response, error_field};

const DOCUMENTS_PATH: &str = "/api/documents";
const SAVE_SIGNATURE_FAILED: &str = "Failed to save signature";

/// HTTP client for the document backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    documents_url: String,
}

impl BackendClient {
    /// Build a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] for a URL without an http(s)
    /// scheme, or [`BackendError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base = config.url.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(BackendError::InvalidUrl(config.url.clone()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("knca-signer/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            documents_url: format!("{base}{DOCUMENTS_PATH}"),
        })
    }

    /// Full URL of the documents collection.
    #[must_use]
    pub fn documents_url(&self) -> &str {
        &self.documents_url
    }

    fn sign_url(&self, id: &str) -> String {
        format!("{}/{}/sign", self.documents_url, urlencoding::encode(id))
    }
}

impl DocumentBackend for BackendClient {
    type Error = BackendError;

    async fn list_documents(&self) -> Result<Vec<Document>, BackendError> {
        tracing::debug!(url = %self.documents_url, "listing documents");
        let resp = check_response(self.http.get(&self.documents_url).send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn create_document(&self, content: &str) -> Result<Document, BackendError> {
        tracing::debug!(len = content.len(), "creating document");
        let body = CreateDocumentRequest {
            content: content.to_string(),
        };
        let resp = check_response(
            self.http
                .post(&self.documents_url)
                .json(&body)
                .send()
                .await?,
        )
        .await?;
        Ok(resp.json().await?)
    }

    async fn sign_document(&self, id: &str, signature: &str) -> Result<SignAck, BackendError> {
        let url = self.sign_url(id);
        tracing::debug!(%url, "submitting signature");
        let body = SignDocumentRequest {
            signature: signature.to_string(),
        };
        let resp = self.http.put(&url).json(&body).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(BackendError::SignRejected {
                status: status.as_u16(),
                message: error_field(&text).unwrap_or_else(|| SAVE_SIGNATURE_FAILED.to_string()),
            });
        }
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}
