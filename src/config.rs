//! Configuration for the Lucid integration
//!
//! All three values are user-supplied through the host's settings surface
//! and validated only by the remote calls' own failure responses. The config
//! is injected explicitly, constructed once by the host and handed to the
//! resolver and client, never read as ambient global state. Settings
//! updates flow through [`SharedConfig::replace`].

use std::env;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Default Lucid REST API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.lucid.co";

/// Connection settings for the Lucid API plus the attachment location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LucidConfig {
    /// Bearer token created in the Lucid developer portal
    pub api_key: String,
    /// Base URL for both the metadata and export endpoints
    pub base_url: String,
    /// Folder (relative to the host's vault/store root) under which
    /// rendition files are created; may be empty
    pub attachment_root: String,
}

impl Default for LucidConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            attachment_root: String::new(),
        }
    }
}

impl LucidConfig {
    /// Load configuration from the process environment
    ///
    /// `LUCID_API_KEY` is required; `LUCID_BASE_URL` and
    /// `LUCID_ATTACHMENT_ROOT` fall back to the defaults.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            api_key: env::var("LUCID_API_KEY")?,
            base_url: env::var("LUCID_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            attachment_root: env::var("LUCID_ATTACHMENT_ROOT").unwrap_or_default(),
        })
    }

    /// Base URL without any trailing slash, ready for path concatenation
    pub(crate) fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Cloneable handle to the live configuration
///
/// The host keeps one handle for its settings surface and gives clones to
/// the client and resolver. Operations take a [`snapshot`](Self::snapshot)
/// at their start so a settings save never tears a resolution in progress.
#[derive(Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<LucidConfig>>,
}

impl SharedConfig {
    /// Wrap an initial configuration
    pub fn new(config: LucidConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Clone out the current configuration
    pub async fn snapshot(&self) -> LucidConfig {
        self.inner.read().await.clone()
    }

    /// Replace the configuration wholesale (the settings-save path)
    pub async fn replace(&self, config: LucidConfig) {
        let mut guard = self.inner.write().await;
        *guard = config;
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(LucidConfig::default())
    }
}

impl From<LucidConfig> for SharedConfig {
    fn from(config: LucidConfig) -> Self {
        Self::new(config)
    }
}
