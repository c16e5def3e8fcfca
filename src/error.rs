//! Error types for rendition resolution
//!
//! Every failure aborts the current resolution and propagates to the caller;
//! nothing is retried. No partial artifact is ever written, so there is no
//! cleanup path. Text that simply does not look like a rendition link is not
//! an error at all; the link parsers return `None` for that.

use thiserror::Error;

/// Crate-wide result type alias
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors raised while resolving a drawing reference to a local rendition
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A reference field is empty or contains a character reserved by the
    /// key format (`~`, `/`, `\`). Rejected before any network call so two
    /// distinct references can never collide on one cache key.
    #[error("invalid drawing reference: {0}")]
    InvalidReference(String),

    /// The metadata request failed (transport error or non-success status)
    #[error("metadata fetch failed for document {document_id}: {reason}")]
    MetadataFetch {
        document_id: String,
        reason: String,
    },

    /// The metadata response carried no usable version field
    #[error("metadata for document {document_id} has no usable version: {reason}")]
    MetadataParse {
        document_id: String,
        reason: String,
    },

    /// The rendition export request failed (transport error or non-success status)
    #[error("rendition fetch failed for document {document_id} page {page_id}: {reason}")]
    RenditionFetch {
        document_id: String,
        page_id: String,
        reason: String,
    },

    /// The blob store failed while checking or writing the rendition
    #[error("store operation failed for {key}: {source}")]
    StoreWrite {
        key: String,
        #[source]
        source: StoreError,
    },
}

/// Blob-store failures
///
/// Host-provided store implementations map their own failures into
/// `Backend`; the shipped filesystem store surfaces io errors directly.
/// Note that "key already exists" is NOT an error: creates are idempotent
/// by contract (see [`crate::store::BlobStore`]).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl ResolveError {
    /// Attach a key to a store failure
    pub(crate) fn store(key: impl Into<String>, source: StoreError) -> Self {
        Self::StoreWrite {
            key: key.into(),
            source,
        }
    }
}
