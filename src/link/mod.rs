//! Link module - rendition key format and link/URL parsing
//!
//! Everything textual about a rendition lives here: the deterministic key a
//! rendition is stored under, the markdown embed wrapper around it, and the
//! strict parsers that recognize existing links and Lucidchart share URLs.

mod parser;
mod types;

pub(crate) use types::validate_component;

pub use parser::{parse_embed_link, parse_rendition_key, parse_share_url};
pub use types::{
    DrawingRef, EmbedLink, EmbedWrapper, RenditionKey, EMBED_PREFIX, EMBED_SUFFIX,
    KEY_DELIMITER, KEY_EXTENSION, KEY_TAG,
};
