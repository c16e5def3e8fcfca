//! Version-aware export resolution
//!
//! `ExportResolver` ties the pieces together: fetch the document's current
//! version, derive the deterministic rendition key, and fetch the export
//! only when no artifact exists under that key. Because the version is part
//! of the key, presence is the entire freshness check; there is no timestamp
//! or ETag bookkeeping, and stale renditions are never overwritten, only
//! superseded by new keys.

use std::sync::Arc;

use crate::api::{LucidClient, MetadataSource, RenditionSource};
use crate::config::SharedConfig;
use crate::error::{ResolveError, Result};
use crate::link::{validate_component, DrawingRef, RenditionKey};
use crate::store::BlobStore;

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Key the current rendition is stored under
    pub key: RenditionKey,
    /// Whether the artifact already existed before this call
    pub cached: bool,
}

/// Resolves drawing references to locally stored rendition artifacts
///
/// Cloning is cheap; clones share the same sources, store, and
/// configuration.
#[derive(Clone)]
pub struct ExportResolver {
    metadata: Arc<dyn MetadataSource>,
    renditions: Arc<dyn RenditionSource>,
    store: Arc<dyn BlobStore>,
    config: SharedConfig,
}

impl ExportResolver {
    /// Wire a resolver from its parts
    pub fn new(
        metadata: Arc<dyn MetadataSource>,
        renditions: Arc<dyn RenditionSource>,
        store: Arc<dyn BlobStore>,
        config: SharedConfig,
    ) -> Self {
        Self {
            metadata,
            renditions,
            store,
            config,
        }
    }

    /// Wire a resolver with one [`LucidClient`] serving both API roles
    pub fn with_client(client: LucidClient, store: Arc<dyn BlobStore>) -> Self {
        let config = client.config().clone();
        let client = Arc::new(client);
        Self::new(client.clone(), client, store, config)
    }

    /// Ensure a current rendition of the referenced page exists locally
    ///
    /// Always fetches metadata to learn the current version; fetches the
    /// export only on a key miss. Duplicate concurrent calls for the same
    /// reference may both fetch, but the store keeps whichever artifact
    /// lands first and both calls succeed with the same key.
    pub async fn resolve(&self, reference: &DrawingRef) -> Result<Resolution> {
        validate_component("document id", &reference.document_id)?;
        validate_component("page id", &reference.page_id)?;

        let info = self.metadata.document_info(&reference.document_id).await?;

        let config = self.config.snapshot().await;
        let key = RenditionKey::new(
            &config.attachment_root,
            &reference.document_id,
            &info.version,
            &reference.page_id,
        )?;

        let present = self
            .store
            .exists(&key)
            .await
            .map_err(|e| ResolveError::store(key.to_string(), e))?;
        if present {
            tracing::debug!(key = %key, "Rendition already cached");
            return Ok(Resolution { key, cached: true });
        }

        let bytes = self
            .renditions
            .export_page(&reference.document_id, &reference.page_id)
            .await?;

        self.store
            .create(&key, &bytes)
            .await
            .map_err(|e| ResolveError::store(key.to_string(), e))?;

        tracing::info!(
            key = %key,
            version = %info.version,
            size = bytes.len(),
            "Cached new rendition"
        );

        Ok(Resolution { key, cached: false })
    }
}
