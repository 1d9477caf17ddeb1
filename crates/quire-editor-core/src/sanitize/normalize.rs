//! Canonical text form used by the source view and for change detection.

use std::sync::LazyLock;

use regex::Regex;

static INTERTAG_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">[ \t\r\n\x0C]+<").unwrap());
static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br[ \t\r\n\x0C]*/?>[ \t\r\n\x0C]*").unwrap());
static BLOCK_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(h[1-6]|p|div|blockquote|pre|ul|ol)>[ \t\r\n\x0C]*").unwrap()
});
static EMPTY_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p><br>\n</p>\n{0,2}").unwrap());

/// Canonical multi-line form of `html`.
///
/// Blocks end with a blank line, `<br>` ends its line, and an empty
/// `<p><br></p>` disappears. Applying it twice changes nothing.
pub fn normalize_for_comparison(html: &str) -> String {
    let html = html.trim();
    let html = INTERTAG_WS_RE.replace_all(html, "><");
    let html = BR_RE.replace_all(&html, "<br>\n");
    let html = BLOCK_CLOSE_RE.replace_all(&html, "</$1>\n\n");
    let mut html = EMPTY_PARAGRAPH_RE.replace_all(&html, "").into_owned();
    if html.ends_with("\n\n") {
        html.pop();
    }
    html
}
