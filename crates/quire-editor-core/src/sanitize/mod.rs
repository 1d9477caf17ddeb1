//! Paste and source-view sanitization.
//!
//! The pipeline is text based: [`foreign`] strips word-processor artifacts
//! when their signatures are present, [`generic`] then removes hazardous
//! attributes and structural noise. Tag matching goes through [`rewrite`] so
//! the rules stay in one place.
//!
//! Content typed straight into the rendered view never passes through here;
//! only paste input and source-to-editor transfers do.

use tracing::debug;

pub mod foreign;
pub mod generic;
pub mod normalize;
pub mod rewrite;

pub use foreign::{clean_foreign_markup, is_foreign_origin_markup};
pub use generic::clean_generic;
pub use normalize::normalize_for_comparison;

/// Full pipeline: foreign cleanup when detected, then generic cleanup.
pub fn sanitize(html: &str) -> String {
    if is_foreign_origin_markup(html) {
        debug!(len = html.len(), "foreign markup detected");
        clean_generic(&clean_foreign_markup(html))
    } else {
        clean_generic(html)
    }
}

/// Escape `&`, `<`, `>` and `"` so `text` can be inserted as markup.
pub fn encode_entities(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
