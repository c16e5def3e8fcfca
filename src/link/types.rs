//! Rendition key and embed link types
//!
//! The key format is a compatibility contract with links already written
//! into notes and must be reproduced byte for byte:
//!
//! ```text
//! <attachmentRoot>/lucidchart~<documentId>~<version>~<pageId>.png
//! ```
//!
//! The root prefix is joined unconditionally (an empty root yields a leading
//! slash); a key parsed from text that carried no `/` at all stays rootless.

use std::fmt;

use crate::api::DocumentVersion;
use crate::error::{ResolveError, Result};

// ============================================================================
// Key format constants
// ============================================================================

/// Namespace tag leading every rendition file name
pub const KEY_TAG: &str = "lucidchart";

/// Field delimiter inside a rendition file name
pub const KEY_DELIMITER: char = '~';

/// Fixed extension of every rendition file
pub const KEY_EXTENSION: &str = ".png";

/// Opening half of the markdown wiki-embed wrapper
pub const EMBED_PREFIX: &str = "![[";

/// Closing half of the markdown wiki-embed wrapper
pub const EMBED_SUFFIX: &str = "]]";

/// Characters that may not appear inside a key field
///
/// `~` would shift the field boundaries; path separators would move the
/// rendition out of the attachment root.
const RESERVED: [char; 3] = [KEY_DELIMITER, '/', '\\'];

/// Reject a key field that is empty or contains a reserved character
pub(crate) fn validate_component(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ResolveError::InvalidReference(format!("empty {}", name)));
    }
    if let Some(c) = value.chars().find(|c| RESERVED.contains(c)) {
        return Err(ResolveError::InvalidReference(format!(
            "{} contains reserved character {:?}",
            name, c
        )));
    }
    Ok(())
}

// ============================================================================
// Drawing reference
// ============================================================================

/// Identifies one page of one diagram, independent of version
///
/// This is what a parsed link or share URL yields: the version is fetched
/// fresh at resolution time, never trusted from old link text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DrawingRef {
    /// Opaque document identifier, stable for the diagram's lifetime
    pub document_id: String,
    /// Opaque page identifier, stable across versions
    pub page_id: String,
}

impl DrawingRef {
    /// Create a reference from raw identifiers
    pub fn new(document_id: impl Into<String>, page_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            page_id: page_id.into(),
        }
    }
}

// ============================================================================
// Rendition key
// ============================================================================

/// Deterministic local path of one rendition
///
/// Construction validates every field against the reserved characters, so a
/// key that exists cannot collide with a key for a different reference and
/// cannot escape the attachment root. Two keys are equal exactly when their
/// textual forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenditionKey {
    root: Option<String>,
    document_id: String,
    version: DocumentVersion,
    page_id: String,
}

impl RenditionKey {
    /// Build a key under an attachment root (which may be empty)
    pub fn new(
        root: &str,
        document_id: &str,
        version: &DocumentVersion,
        page_id: &str,
    ) -> Result<Self> {
        Self::build(
            Some(root.to_string()),
            document_id.to_string(),
            version.clone(),
            page_id.to_string(),
        )
    }

    /// Build a key, optionally rootless (parsed from bare link text)
    pub(crate) fn build(
        root: Option<String>,
        document_id: String,
        version: DocumentVersion,
        page_id: String,
    ) -> Result<Self> {
        validate_component("document id", &document_id)?;
        validate_component("version", version.as_str())?;
        validate_component("page id", &page_id)?;
        Ok(Self {
            root,
            document_id,
            version,
            page_id,
        })
    }

    /// Attachment root this key lives under, if the key carries one
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Document identifier embedded in the key
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Version token embedded in the key
    pub fn version(&self) -> &DocumentVersion {
        &self.version
    }

    /// Page identifier embedded in the key
    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    /// The version-independent reference this key renders
    pub fn reference(&self) -> DrawingRef {
        DrawingRef::new(self.document_id.clone(), self.page_id.clone())
    }

    /// File-name portion of the key (everything after the root)
    pub fn file_name(&self) -> String {
        format!(
            "{tag}{d}{doc}{d}{ver}{d}{page}{ext}",
            tag = KEY_TAG,
            d = KEY_DELIMITER,
            doc = self.document_id,
            ver = self.version,
            page = self.page_id,
            ext = KEY_EXTENSION,
        )
    }
}

impl fmt::Display for RenditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(root) = &self.root {
            write!(f, "{}/", root)?;
        }
        f.write_str(&self.file_name())
    }
}

// ============================================================================
// Embed wrapper
// ============================================================================

/// Which halves of the `![[ ... ]]` wiki-embed wrapper a link carries
///
/// The halves are tracked independently: a selection that had only the
/// opening `![[` keeps only the opening after a rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedWrapper {
    /// Link opened with `![[`
    pub prefix: bool,
    /// Link closed with `]]`
    pub suffix: bool,
}

impl EmbedWrapper {
    /// Fully wrapped form, `![[key]]`, the default for fresh inserts
    pub fn embed() -> Self {
        Self {
            prefix: true,
            suffix: true,
        }
    }

    /// Bare-path form with no wrapper
    pub fn plain() -> Self {
        Self {
            prefix: false,
            suffix: false,
        }
    }

    /// Wrap key text in whichever halves this wrapper carries
    pub fn apply(&self, key_text: &str) -> String {
        let mut out = String::with_capacity(
            key_text.len() + EMBED_PREFIX.len() + EMBED_SUFFIX.len(),
        );
        if self.prefix {
            out.push_str(EMBED_PREFIX);
        }
        out.push_str(key_text);
        if self.suffix {
            out.push_str(EMBED_SUFFIX);
        }
        out
    }
}

// ============================================================================
// Embed link
// ============================================================================

/// A rendition key together with the wrapper it was (or will be) written with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedLink {
    /// The key the link points at
    pub key: RenditionKey,
    /// The wrapper halves around the key text
    pub wrapper: EmbedWrapper,
}

impl EmbedLink {
    /// Pair a key with an explicit wrapper
    pub fn new(key: RenditionKey, wrapper: EmbedWrapper) -> Self {
        Self { key, wrapper }
    }

    /// The fully wrapped form used for fresh inserts
    pub fn embedded(key: RenditionKey) -> Self {
        Self::new(key, EmbedWrapper::embed())
    }

    /// Rewrite this link to point at a new key, keeping the wrapper
    pub fn rewritten(&self, key: RenditionKey) -> Self {
        Self::new(key, self.wrapper)
    }
}

impl fmt::Display for EmbedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wrapper.apply(&self.key.to_string()))
    }
}
