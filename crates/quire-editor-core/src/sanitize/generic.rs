//! Attribute, whitespace and structure cleanup applied to all pasted markup.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{trace, warn};

use super::rewrite::{StartTag, TagAttr, rewrite_start_tags};
use crate::dom::parse::decode_entities;
use crate::dom::style::{parse_declarations, serialize_declarations};

/// Inline style properties that survive cleanup.
pub const ALLOWED_STYLE_PROPERTIES: &[&str] = &[
    "color",
    "font-size",
    "background",
    "background-color",
    "font-weight",
    "font-style",
    "text-decoration",
    "text-align",
];

const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "formaction"];

const FRAMEWORK_PREFIXES: &[&str] = &["_ng", "ng-", "data-ng-", "data-v-"];

/// Elements kept even when empty.
const KEEP_WHEN_EMPTY: &[&str] = &[
    "td", "th", "textarea", "iframe", "canvas", "video", "audio", "object",
];

const MAX_PASSES: usize = 10;

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r\n\x0C]+").unwrap());
static SPACE_BEFORE_GT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +>").unwrap());
static LIST_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(ul|ol|li)\b[^>]*>").unwrap());
static EMPTY_LI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<li> ?</li>").unwrap());
static EMPTY_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(ul|ol)> ?</(ul|ol)>").unwrap());
static DOCTYPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<!doctype[^>]*>").unwrap());
static HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<head\b[^>]*>.*?</head *>").unwrap());
static DOCUMENT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:html|body)\b[^>]*>").unwrap());
static EMPTY_ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([a-zA-Z][a-zA-Z0-9]*)\b[^>]*>( ?)</([a-zA-Z][a-zA-Z0-9]*) *>").unwrap()
});
static BULLET_PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<p\b[^>]*> ?<span\b[^>]*> ?<span\b[^>]*> ?•[^<]*</span> ?</span>(.*?)</p>").unwrap()
});

/// Clean markup until it stops changing.
///
/// Running it on its own output returns the output unchanged.
pub fn clean_generic(html: &str) -> String {
    let mut current = html.to_string();
    for pass in 0..MAX_PASSES {
        let next = clean_pass(&current);
        if next == current {
            trace!(passes = pass + 1, "generic cleanup reached fixpoint");
            return next;
        }
        current = next;
    }
    warn!(max = MAX_PASSES, "generic cleanup did not settle");
    current
}

fn clean_pass(html: &str) -> String {
    let html = rewrite_start_tags(html, clean_tag);

    let html = COMMENT_RE.replace_all(&html, "");
    let html = WHITESPACE_RE.replace_all(&html, " ");
    let html = SPACE_BEFORE_GT_RE.replace_all(&html, ">");

    let html = LIST_TAG_RE.replace_all(&html, "<$1>");
    let mut html = html.into_owned();
    loop {
        let next = EMPTY_LI_RE.replace_all(&html, "");
        let next = EMPTY_LIST_RE.replace_all(&next, |caps: &Captures<'_>| {
            if caps[1].eq_ignore_ascii_case(&caps[2]) {
                String::new()
            } else {
                caps[0].to_string()
            }
        });
        if next == html {
            break;
        }
        html = next.into_owned();
    }

    let html = DOCTYPE_RE.replace_all(&html, "");
    let html = HEAD_RE.replace_all(&html, "");
    let mut html = DOCUMENT_TAG_RE.replace_all(&html, "").into_owned();

    loop {
        let next = EMPTY_ELEMENT_RE.replace_all(&html, |caps: &Captures<'_>| {
            let name = &caps[1];
            let removable = name.eq_ignore_ascii_case(&caps[3])
                && !KEEP_WHEN_EMPTY.iter().any(|k| k.eq_ignore_ascii_case(name))
                && !crate::dom::parse::is_void_element(name);
            if removable {
                caps[2].to_string()
            } else {
                caps[0].to_string()
            }
        });
        if next == html {
            break;
        }
        html = next.into_owned();
    }

    if html.contains('•') {
        html = rewrap_bullets(&html);
    }
    html
}

fn clean_tag(tag: &mut StartTag) {
    tag.attrs.retain_mut(|attr| keep_attribute(attr));
}

/// Names a browser would only produce from broken markup.
fn is_junk_name(name: &str) -> bool {
    name.contains(['"', '\'', '<', '`'])
}

/// Decide whether an attribute survives, rewriting `style` and `class` in place.
fn keep_attribute(attr: &mut TagAttr) -> bool {
    let name = attr.name.to_ascii_lowercase();
    if is_junk_name(&name) || (name.len() > 2 && name.starts_with("on")) {
        return false;
    }
    if name == "xmlns"
        || name.starts_with("xmlns:")
        || name.starts_with("xlink:")
        || name.starts_with("xml:")
    {
        return false;
    }
    if FRAMEWORK_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return false;
    }
    let Some(value) = attr.value.as_mut() else {
        return true;
    };
    if URL_ATTRIBUTES.contains(&name.as_str()) && is_script_url(&decode_entities(value)) {
        return false;
    }
    match name.as_str() {
        "style" => {
            let kept: Vec<(String, String)> = parse_declarations(value)
                .into_iter()
                .filter(|(prop, v)| {
                    let lower = v.to_ascii_lowercase();
                    ALLOWED_STYLE_PROPERTIES.contains(&prop.as_str())
                        && !lower.contains("url(")
                        && !lower.contains("expression(")
                })
                .collect();
            *value = serialize_declarations(&kept);
            !kept.is_empty()
        }
        "class" => {
            let kept = value
                .split_ascii_whitespace()
                .filter(|c| !c.starts_with("ng-"))
                .collect::<Vec<_>>()
                .join(" ");
            *value = kept;
            !value.is_empty()
        }
        _ => true,
    }
}

fn is_script_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    compact.starts_with("javascript:") || compact.starts_with("vbscript:")
}

/// Turn runs of `<p><span><span>•</span></span>text</p>` into one `<ul>`.
fn rewrap_bullets(html: &str) -> String {
    let matches: Vec<_> = BULLET_PARAGRAPH_RE.find_iter(html).collect();
    let (Some(first), Some(last)) = (matches.first(), matches.last()) else {
        return html.to_string();
    };
    let (start, end) = (first.start(), last.end());
    let items = BULLET_PARAGRAPH_RE.replace_all(&html[start..end], "<li>$1</li>");
    trace!(items = matches.len(), "bullet paragraphs rewrapped");
    format!("{}<ul>{}</ul>{}", &html[..start], items, &html[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_event_handlers_and_script_urls() {
        let out = clean_generic(
            r#"<a href="javascript:alert(1)" onclick='x()' title="ok">t</a><img src=" jav ascript:x" onerror=alert(1)>"#,
        );
        assert_eq!(out, r#"<a title="ok">t</a><img>"#);
    }

    #[test]
    fn test_malformed_tags_still_lose_handlers() {
        assert_eq!(clean_generic("<img src=x onerror=alert(1) '>"), r#"<img src="x">"#);
        assert_eq!(
            clean_generic(r#"<a href="javascript:alert(1)" "x">t</a>"#),
            "<a>t</a>"
        );
        assert_eq!(
            clean_generic("<a x=a=b onmouseover=y href=javascript:z>t</a>"),
            r#"<a x="a=b">t</a>"#
        );
        assert_eq!(
            clean_generic("<a href='jav&#x61;script&#58;x'>t</a>"),
            "<a>t</a>"
        );
    }

    #[test]
    fn test_style_allow_list() {
        let out = clean_generic(
            r#"<span style="color: red; position: absolute; background: url(x.png); font-weight: bold">x</span>"#,
        );
        assert_eq!(out, r#"<span style="color: red; font-weight: bold;">x</span>"#);
    }

    #[test]
    fn test_removes_style_attribute_when_nothing_allowed() {
        assert_eq!(clean_generic(r#"<p style="margin: 0">x</p>"#), "<p>x</p>");
    }

    #[test]
    fn test_framework_attributes() {
        let out = clean_generic(
            r#"<div _ngcontent-c1="" ng-if="x" data-v-12ab class="ng-scope keep ng-dirty">x</div>"#,
        );
        assert_eq!(out, r#"<div class="keep">x</div>"#);
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(clean_generic("<p>a \n\t b</p>\n\n<p >c</p >"), "<p>a b</p> <p>c</p>");
    }

    #[test]
    fn test_lists_are_bared_and_empty_ones_dropped() {
        let out = clean_generic(r#"<ul class="x"><li style="color: red">a</li><li> </li></ul><ol><li></li></ol>"#);
        assert_eq!(out, "<ul><li>a</li></ul>");
    }

    #[test]
    fn test_document_wrappers() {
        let out = clean_generic("<!DOCTYPE html><html><head><title>t</title></head><body><p>Hello</p></body></html>");
        assert_eq!(out, "<p>Hello</p>");
    }

    #[test]
    fn test_empty_elements_removed_recursively() {
        assert_eq!(clean_generic("<div><span></span><p></p></div>x"), "x");
        assert_eq!(clean_generic("<div><p> </p></div>x"), " x");
        assert_eq!(clean_generic("<p><br></p><td></td>"), "<p><br></p><td></td>");
    }

    #[test]
    fn test_bullet_paragraphs_become_list() {
        let html = "<p>intro</p><p><span><span>•</span></span>one</p><p><span><span>•</span></span>two</p><p>outro</p>";
        assert_eq!(
            clean_generic(html),
            "<p>intro</p><ul><li>one</li><li>two</li></ul><p>outro</p>"
        );
    }

    #[test]
    fn test_idempotent_on_mixed_input() {
        let inputs = [
            "<div   onclick=x><p style='color:red;margin:0'>a  b</p><ul id=l><li></li></ul></div>",
            "<html><body><span> </span><b>x</b>\n</body></html>",
            "<p><span><span>•</span></span>item</p>",
            "plain text &amp; more",
        ];
        for input in inputs {
            let once = clean_generic(input);
            assert_eq!(clean_generic(&once), once, "input: {input}");
        }
    }
}
