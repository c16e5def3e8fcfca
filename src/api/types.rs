//! Lucid API response types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Version token assigned by the Lucid service each time a document's
/// content changes
///
/// The API serializes it as an integer today, but the token is treated as
/// opaque: it is carried verbatim into rendition keys and compared only for
/// equality, never ordered locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentVersion(String);

impl DocumentVersion {
    /// Wrap a raw version token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token as written into rendition keys
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for DocumentVersion {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for DocumentVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Accept both the numeric form the API emits and a string token.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(u64),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Int(n) => Ok(Self(n.to_string())),
            Repr::Str(s) => Ok(Self(s)),
        }
    }
}

/// Metadata for a Lucid document, as returned by `GET /documents/{id}`
///
/// Only `version` participates in resolution; the remaining fields are
/// surfaced for hosts that want them (titles in pickers, page counts in
/// diagnostics) and tolerate absent values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    /// Current content version
    pub version: DocumentVersion,

    /// Document title
    #[serde(default)]
    pub title: Option<String>,

    /// Number of pages in the document
    #[serde(default)]
    pub page_count: Option<u32>,
}
