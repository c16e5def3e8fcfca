//! Editor command glue
//!
//! The two note-editing operations a host wires into its UI: refreshing an
//! existing rendition link in place, and turning a Lucidchart share URL into
//! a fresh embed. Both take the selected text and return the replacement
//! text, or `None` when the selection is not theirs, so a stray invocation
//! over ordinary prose never edits the note.

use crate::error::Result;
use crate::link::{parse_embed_link, parse_share_url, EmbedLink};
use crate::resolver::ExportResolver;

/// Rewrite a selected rendition link to the document's current version
///
/// Recognizes the selection with or without either half of the `![[ ]]`
/// wrapper and reproduces exactly the halves it found. When the document
/// has not changed, the replacement equals the selection.
pub async fn refresh_drawing(
    resolver: &ExportResolver,
    selection: &str,
) -> Result<Option<String>> {
    let link = match parse_embed_link(selection) {
        Some(link) => link,
        None => return Ok(None),
    };

    let resolution = resolver.resolve(&link.key.reference()).await?;
    Ok(Some(link.rewritten(resolution.key).to_string()))
}

/// Replace a selected share URL with an embedded rendition link
pub async fn insert_drawing(
    resolver: &ExportResolver,
    selection: &str,
) -> Result<Option<String>> {
    let reference = match parse_share_url(selection) {
        Some(reference) => reference,
        None => return Ok(None),
    };

    let resolution = resolver.resolve(&reference).await?;
    Ok(Some(EmbedLink::embedded(resolution.key).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::api::{DocumentInfo, DocumentVersion, MetadataSource, RenditionSource};
    use crate::config::{LucidConfig, SharedConfig};
    use crate::error::ResolveError;
    use crate::store::{BlobStore, MemoryBlobStore};

    /// Fixed-version API double
    struct StubApi {
        version: String,
        fail: bool,
        metadata_calls: AtomicUsize,
        export_calls: AtomicUsize,
    }

    impl StubApi {
        fn at_version(version: &str) -> Arc<Self> {
            Arc::new(Self {
                version: version.to_string(),
                fail: false,
                metadata_calls: AtomicUsize::new(0),
                export_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MetadataSource for StubApi {
        async fn document_info(&self, document_id: &str) -> crate::error::Result<DocumentInfo> {
            self.metadata_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ResolveError::MetadataFetch {
                    document_id: document_id.to_string(),
                    reason: "scripted failure".to_string(),
                });
            }
            Ok(DocumentInfo {
                version: DocumentVersion::new(self.version.as_str()),
                title: None,
                page_count: None,
            })
        }
    }

    #[async_trait]
    impl RenditionSource for StubApi {
        async fn export_page(&self, _: &str, _: &str) -> crate::error::Result<Vec<u8>> {
            self.export_calls.fetch_add(1, Ordering::SeqCst);
            Ok(b"png bytes".to_vec())
        }
    }

    fn resolver_with(api: Arc<StubApi>, store: MemoryBlobStore) -> ExportResolver {
        let config = SharedConfig::new(LucidConfig {
            api_key: "test-key".to_string(),
            attachment_root: "attachments".to_string(),
            ..LucidConfig::default()
        });
        ExportResolver::new(api.clone(), api, Arc::new(store), config)
    }

    #[tokio::test]
    async fn test_refresh_rewrites_stale_link() {
        let resolver = resolver_with(StubApi::at_version("5"), MemoryBlobStore::new());

        let replaced = refresh_drawing(&resolver, "![[attachments/lucidchart~abc123~4~0.png]]")
            .await
            .unwrap();

        assert_eq!(
            replaced.as_deref(),
            Some("![[attachments/lucidchart~abc123~5~0.png]]")
        );
    }

    #[tokio::test]
    async fn test_refresh_preserves_partial_wrappers() {
        let resolver = resolver_with(StubApi::at_version("5"), MemoryBlobStore::new());

        let cases = [
            (
                "attachments/lucidchart~abc123~4~0.png",
                "attachments/lucidchart~abc123~5~0.png",
            ),
            (
                "![[attachments/lucidchart~abc123~4~0.png",
                "![[attachments/lucidchart~abc123~5~0.png",
            ),
            (
                "attachments/lucidchart~abc123~4~0.png]]",
                "attachments/lucidchart~abc123~5~0.png]]",
            ),
        ];
        for (selection, expected) in cases {
            let replaced = refresh_drawing(&resolver, selection).await.unwrap();
            assert_eq!(replaced.as_deref(), Some(expected), "from {:?}", selection);
        }
    }

    #[tokio::test]
    async fn test_refresh_at_current_version_is_identity() {
        let store = MemoryBlobStore::new();
        let resolver = resolver_with(StubApi::at_version("5"), store.clone());
        let selection = "![[attachments/lucidchart~abc123~5~0.png]]";

        let replaced = refresh_drawing(&resolver, selection).await.unwrap();

        assert_eq!(replaced.as_deref(), Some(selection));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_refresh_uses_configured_root_for_rootless_links() {
        let resolver = resolver_with(StubApi::at_version("5"), MemoryBlobStore::new());

        let replaced = refresh_drawing(&resolver, "lucidchart~abc123~4~0.png")
            .await
            .unwrap();

        assert_eq!(
            replaced.as_deref(),
            Some("attachments/lucidchart~abc123~5~0.png")
        );
    }

    #[tokio::test]
    async fn test_refresh_leaves_foreign_selection_alone() {
        let api = StubApi::at_version("5");
        let resolver = resolver_with(api.clone(), MemoryBlobStore::new());

        for selection in ["plain prose", "![[notes/other-image.png]]", ""] {
            let replaced = refresh_drawing(&resolver, selection).await.unwrap();
            assert_eq!(replaced, None, "from {:?}", selection);
        }
        assert_eq!(api.metadata_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_propagates_resolution_failure() {
        let api = Arc::new(StubApi {
            version: "5".to_string(),
            fail: true,
            metadata_calls: AtomicUsize::new(0),
            export_calls: AtomicUsize::new(0),
        });
        let resolver = resolver_with(api, MemoryBlobStore::new());

        let result = refresh_drawing(&resolver, "![[attachments/lucidchart~abc123~4~0.png]]").await;

        assert!(matches!(result, Err(ResolveError::MetadataFetch { .. })));
    }

    #[tokio::test]
    async fn test_insert_builds_embedded_link_and_stores_artifact() {
        let store = MemoryBlobStore::new();
        let resolver = resolver_with(StubApi::at_version("5"), store.clone());

        let replaced = insert_drawing(
            &resolver,
            "https://lucid.app/lucidchart/abc123/edit?page=page9#section",
        )
        .await
        .unwrap();

        assert_eq!(
            replaced.as_deref(),
            Some("![[attachments/lucidchart~abc123~5~page9.png]]")
        );
        assert_eq!(store.len().await, 1);

        let key = crate::link::parse_rendition_key("attachments/lucidchart~abc123~5~page9.png")
            .unwrap();
        assert_eq!(store.read(&key).await.unwrap(), b"png bytes");
    }

    #[tokio::test]
    async fn test_insert_leaves_other_urls_alone() {
        let api = StubApi::at_version("5");
        let resolver = resolver_with(api.clone(), MemoryBlobStore::new());

        for selection in [
            "https://example.com/lucid",
            "https://lucid.app/documents/abc123?page=0",
            "not a url",
        ] {
            let replaced = insert_drawing(&resolver, selection).await.unwrap();
            assert_eq!(replaced, None, "from {:?}", selection);
        }
        assert_eq!(api.export_calls.load(Ordering::SeqCst), 0);
    }
}
