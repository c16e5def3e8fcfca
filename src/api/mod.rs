//! Lucid REST API integration
//!
//! Two service contracts back a resolution: [`MetadataSource`] answers
//! "what is the current version of this document" and [`RenditionSource`]
//! exports one page as a cropped PNG. [`LucidClient`] implements both over
//! HTTP with bearer-token auth; tests and alternative hosts can substitute
//! their own implementations at the trait seam.

mod client;
mod types;

pub use client::{LucidClient, MetadataSource, RenditionSource};
pub use types::{DocumentInfo, DocumentVersion};
