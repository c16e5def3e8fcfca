//! Lucid API client
//!
//! Defines the two service seams the resolver consumes (document metadata
//! and page exports) and the production HTTP implementation of both.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::SharedConfig;
use crate::error::{ResolveError, Result};

use super::types::DocumentInfo;

/// API version header required by the Lucid REST API
const API_VERSION_HEADER: &str = "Lucid-Api-Version";

/// Version of the Lucid REST API this client speaks
const API_VERSION: &str = "1";

/// Upper bound on any single remote call; a hung export fails the
/// resolution instead of wedging it
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Source of current document metadata
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the current metadata (including version) for a document
    async fn document_info(&self, document_id: &str) -> Result<DocumentInfo>;
}

/// Source of rasterized page exports
#[async_trait]
pub trait RenditionSource: Send + Sync {
    /// Fetch the cropped PNG export of one page at the document's current
    /// content
    async fn export_page(&self, document_id: &str, page_id: &str) -> Result<Vec<u8>>;
}

/// HTTP client for the Lucid REST API
///
/// Implements both service seams against the configured base URL with
/// bearer-token auth. Credentials are read from the shared configuration at
/// the start of each request, so a settings save takes effect on the next
/// call without rebuilding the client.
#[derive(Clone)]
pub struct LucidClient {
    http: reqwest::Client,
    config: SharedConfig,
}

impl LucidClient {
    /// Create a client against the given configuration
    pub fn new(config: SharedConfig) -> std::result::Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, config })
    }

    /// Shared configuration this client reads on every request
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    fn document_url(&self, base_url: &str, document_id: &str) -> String {
        format!("{}/documents/{}", base_url, document_id)
    }
}

#[async_trait]
impl MetadataSource for LucidClient {
    async fn document_info(&self, document_id: &str) -> Result<DocumentInfo> {
        let config = self.config.snapshot().await;
        let url = self.document_url(config.base_url_trimmed(), document_id);

        tracing::debug!(document_id = %document_id, "fetching document metadata");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&config.api_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .send()
            .await
            .map_err(|e| ResolveError::MetadataFetch {
                document_id: document_id.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResolveError::MetadataFetch {
                document_id: document_id.to_string(),
                reason: format!("unexpected status {}: {}", status, body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResolveError::MetadataFetch {
                document_id: document_id.to_string(),
                reason: format!("failed to read response body: {}", e),
            })?;

        serde_json::from_str(&body).map_err(|e| ResolveError::MetadataParse {
            document_id: document_id.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl RenditionSource for LucidClient {
    async fn export_page(&self, document_id: &str, page_id: &str) -> Result<Vec<u8>> {
        let config = self.config.snapshot().await;
        let url = self.document_url(config.base_url_trimmed(), document_id);

        tracing::debug!(
            document_id = %document_id,
            page_id = %page_id,
            "fetching page export"
        );

        let response = self
            .http
            .get(&url)
            .query(&[("pageId", page_id), ("crop", "content")])
            .bearer_auth(&config.api_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .header(reqwest::header::ACCEPT, "image/png")
            .send()
            .await
            .map_err(|e| ResolveError::RenditionFetch {
                document_id: document_id.to_string(),
                page_id: page_id.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResolveError::RenditionFetch {
                document_id: document_id.to_string(),
                page_id: page_id.to_string(),
                reason: format!("unexpected status {}: {}", status, body),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ResolveError::RenditionFetch {
                document_id: document_id.to_string(),
                page_id: page_id.to_string(),
                reason: format!("failed to read export body: {}", e),
            })?;

        if bytes.is_empty() {
            tracing::warn!(
                document_id = %document_id,
                page_id = %page_id,
                "export returned an empty body"
            );
        }

        tracing::debug!(
            document_id = %document_id,
            page_id = %page_id,
            size = bytes.len(),
            "page export received"
        );

        Ok(bytes.to_vec())
    }
}
