//! Parsers for embed links and Lucidchart share URLs
//!
//! Both parsers are strict: they either recognize the full structure or
//! return `None`. Callers treat `None` as "this text is not ours" and leave
//! the selection untouched, so a permissive parse here would silently
//! corrupt notes.

use url::Url;

use crate::api::DocumentVersion;
use crate::link::types::{
    DrawingRef, EmbedLink, EmbedWrapper, RenditionKey, EMBED_PREFIX, EMBED_SUFFIX,
    KEY_DELIMITER, KEY_EXTENSION, KEY_TAG,
};

/// Path segment that precedes the document id in a share URL
const SHARE_PATH_SEGMENT: &str = "lucidchart";

/// Query parameter names that carry the page id in a share URL
const PAGE_PARAMS: [&str; 2] = ["page", "pageId"];

/// Parse a selection as a rendition embed link
///
/// Accepts the bare key and any combination of the `![[` / `]]` wrapper
/// halves, recording which halves were present. Surrounding whitespace is
/// ignored. Returns `None` for anything that is not structurally a
/// rendition link.
pub fn parse_embed_link(text: &str) -> Option<EmbedLink> {
    let mut inner = text.trim();

    let prefix = inner.starts_with(EMBED_PREFIX);
    if prefix {
        inner = &inner[EMBED_PREFIX.len()..];
    }

    let suffix = inner.ends_with(EMBED_SUFFIX);
    if suffix {
        inner = &inner[..inner.len() - EMBED_SUFFIX.len()];
    }

    let key = parse_rendition_key(inner.trim())?;
    Some(EmbedLink::new(key, EmbedWrapper { prefix, suffix }))
}

/// Parse bare key text into a [`RenditionKey`]
///
/// The grammar is exact: an optional root before the last `/`, then a file
/// name of precisely four `~`-separated fields starting with the
/// `lucidchart` tag and ending in `.png`. A stray `~` anywhere in the name
/// changes the field count and fails the parse rather than mis-assigning
/// fields.
pub fn parse_rendition_key(text: &str) -> Option<RenditionKey> {
    let (root, name) = match text.rfind('/') {
        Some(idx) => (Some(text[..idx].to_string()), &text[idx + 1..]),
        None => (None, text),
    };

    let stem = name.strip_suffix(KEY_EXTENSION)?;
    let fields: Vec<&str> = stem.split(KEY_DELIMITER).collect();
    if fields.len() != 4 || fields[0] != KEY_TAG {
        return None;
    }

    RenditionKey::build(
        root,
        fields[1].to_string(),
        DocumentVersion::new(fields[2]),
        fields[3].to_string(),
    )
    .ok()
}

/// Parse a Lucidchart share URL into a version-independent drawing reference
///
/// The document id is the path segment immediately after `lucidchart`, and
/// the page id comes from the first `page` or `pageId` query parameter.
/// Both must be present and non-empty; the fragment is ignored.
pub fn parse_share_url(text: &str) -> Option<DrawingRef> {
    let url = Url::parse(text.trim()).ok()?;

    let mut segments = url.path_segments()?;
    let document_id = segments
        .by_ref()
        .skip_while(|s| *s != SHARE_PATH_SEGMENT)
        .nth(1)
        .filter(|s| !s.is_empty())?
        .to_string();

    let page_id = url
        .query_pairs()
        .find(|(name, _)| PAGE_PARAMS.contains(&name.as_ref()))
        .map(|(_, value)| value.into_owned())
        .filter(|v| !v.is_empty())?;

    Some(DrawingRef::new(document_id, page_id))
}
