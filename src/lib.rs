//! Lucid Embed
//!
//! Version-aware caching of Lucidchart page renditions for markdown notes.
//! A drawing reference (document id + page id) resolves to a PNG export
//! stored under a deterministic key that embeds the document's current
//! version:
//!
//! ```text
//! <attachmentRoot>/lucidchart~<documentId>~<version>~<pageId>.png
//! ```
//!
//! Presence of the key is the entire cache-validity check: when a diagram
//! changes, its version changes, the key changes, and the next resolution
//! fetches a fresh export while old artifacts stay untouched for notes that
//! still reference them.
//!
//! # Modules
//!
//! - `api`: Lucid REST API client and the metadata/export seams
//! - `link`: Rendition key format, embed wrapper, and link/URL parsers
//! - `store`: Blob storage backends with create-if-absent semantics
//! - `resolver`: The metadata → key → fetch-on-miss orchestration
//! - `commands`: Selection-in, replacement-out editor operations
//! - `config`: API credentials and attachment root, shareable and reloadable
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lucid_embed::api::LucidClient;
//! use lucid_embed::config::{LucidConfig, SharedConfig};
//! use lucid_embed::store::LocalBlobStore;
//! use lucid_embed::{commands, ExportResolver};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SharedConfig::new(LucidConfig {
//!     api_key: "lucid-api-key".to_string(),
//!     attachment_root: "attachments".to_string(),
//!     ..LucidConfig::default()
//! });
//! let client = LucidClient::new(config)?;
//! let store = Arc::new(LocalBlobStore::new("/path/to/vault"));
//! let resolver = ExportResolver::with_client(client, store);
//!
//! if let Some(link) = commands::insert_drawing(
//!     &resolver,
//!     "https://lucid.app/lucidchart/abc123/edit?page=0#",
//! )
//! .await?
//! {
//!     println!("{}", link);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod link;
pub mod resolver;
pub mod store;

pub use error::{ResolveError, Result, StoreError};
pub use link::{DrawingRef, EmbedLink, RenditionKey};
pub use resolver::{ExportResolver, Resolution};
