//! Word-processor markup detection and cleanup.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

use super::rewrite::{remove_elements, rename_tag};
use crate::dom::style::{parse_declarations, serialize_declarations};

static FOREIGN_SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)class="?Mso|style="[^"]*\bmso-|<w:WordDocument|<o:p>|urn:schemas-microsoft-com|docs-internal-guid|<meta[^>]+content="?(?:Microsoft|Word)"#,
    )
    .unwrap()
});

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// `<![if !supportLists]>`, `<![endif]>` and friends.
static CONDITIONAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<!\[[^>]*>").unwrap());

static VENDOR_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:\?xml(?::\w+)?|meta|link|style|\w+:\w+)\b[^>]*>").unwrap()
});

static NBSP_ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&(?:nbsp|#160|#xa0);").unwrap());

static SPACERUN_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<span\b[^>]*\bstyle="[^"]*mso-spacerun:[ \t]*yes[^"]*"[^>]*>(.*?)</span>"#).unwrap()
});

static SPACERUN_P_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<p\b([^>]*?)[ \t\r\n\x0C]style="[^"]*mso-spacerun:[ \t]*yes[^"]*"([^>]*)>(.*?)</p>"#,
    )
    .unwrap()
});

static INNER_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

static MSO_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)[ \t\r\n\x0C]class="?Mso\w*"?"#).unwrap());

static STYLE_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)[ \t\r\n\x0C]style="([^"]*)""#).unwrap());

static DANGEROUS_OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:style|script|applet|embed|noframes|noscript)\b[^>]*>").unwrap()
});

const DANGEROUS_ELEMENTS: &[&str] = &["style", "script", "applet", "embed", "noframes", "noscript"];

/// Whether `html` carries word-processor or office-suite signatures.
pub fn is_foreign_origin_markup(html: &str) -> bool {
    FOREIGN_SIGNATURE_RE.is_match(html)
}

/// Strip word-processor artifacts. Only meaningful for markup that
/// [`is_foreign_origin_markup`] accepted; the steps run in a fixed order.
pub fn clean_foreign_markup(html: &str) -> String {
    let html = COMMENT_RE.replace_all(html, "");
    let html = CONDITIONAL_RE.replace_all(&html, "");
    trace!("foreign: comments stripped");

    let html = remove_elements(&html, &["script", "style"]);
    let html = VENDOR_TAG_RE.replace_all(&html, "");
    trace!("foreign: vendor tags stripped");

    let html = rename_tag(&html, "strike", "s");
    let html = NBSP_ENTITY_RE.replace_all(&html, "\u{a0}");

    let html = SPACERUN_SPAN_RE.replace_all(&html, |caps: &Captures<'_>| alternating_spaces(&caps[1]));
    let html = SPACERUN_P_RE.replace_all(&html, |caps: &Captures<'_>| {
        format!("<p{}{}>{}</p>", &caps[1], &caps[2], alternating_spaces(&caps[3]))
    });
    trace!("foreign: space runs converted");

    let html = LINE_BREAK_RE.replace_all(&html, " ");
    let html = MSO_CLASS_RE.replace_all(&html, " ");
    let html = STYLE_ATTR_RE.replace_all(&html, |caps: &Captures<'_>| {
        let kept: Vec<(String, String)> = parse_declarations(&caps[1])
            .into_iter()
            .filter(|(prop, _)| !prop.starts_with("mso-"))
            .collect();
        if kept.is_empty() {
            String::new()
        } else {
            format!(" style=\"{}\"", serialize_declarations(&kept))
        }
    });

    let html = remove_elements(&html, DANGEROUS_ELEMENTS);
    let html = DANGEROUS_OPEN_TAG_RE.replace_all(&html, "");
    trace!("foreign: dangerous elements removed");
    html.into_owned()
}

/// Same visual width as `run`, alternating non-breaking and breaking spaces
/// so a browser does not collapse them. A single space stays non-breaking.
fn alternating_spaces(run: &str) -> String {
    let count = INNER_TAG_RE.replace_all(run, "").chars().count();
    (0..count)
        .map(|i| if i % 2 == 0 { '\u{a0}' } else { ' ' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_office_signatures() {
        assert!(is_foreign_origin_markup(r#"<p class="MsoNormal">x</p>"#));
        assert!(is_foreign_origin_markup("<p class=MsoListParagraph>x</p>"));
        assert!(is_foreign_origin_markup(r#"<span style="font-size:11pt;mso-bidi-font-weight:bold">x</span>"#));
        assert!(is_foreign_origin_markup(r#"<b id="docs-internal-guid-1234">x</b>"#));
        assert!(is_foreign_origin_markup(r#"<meta name=Generator content="Microsoft Word 15">"#));
        assert!(!is_foreign_origin_markup(r#"<p class="note" style="color: red">x</p>"#));
    }

    #[test]
    fn test_spacerun_paragraph_cleanup() {
        let out = clean_foreign_markup(r#"<p class="MsoNormal" style="mso-spacerun:yes">&nbsp;&nbsp;</p>"#);
        assert!(!out.contains("class"));
        assert!(!out.contains("mso-"));
        assert!(out.contains("\u{a0} "));
        assert!(out.starts_with("<p"));
        assert!(out.ends_with("</p>"));
    }

    #[test]
    fn test_spacerun_span_becomes_plain_spaces() {
        let out = clean_foreign_markup(
            r#"<p>a<span style="mso-spacerun:yes">&nbsp;&nbsp;&nbsp;</span>b</p>"#,
        );
        assert_eq!(out, "<p>a\u{a0} \u{a0}b</p>");
    }

    #[test]
    fn test_strips_vendor_tags_and_comments() {
        let html = "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\"><head><meta charset=utf-8><style>p{}</style></head>\
                    <!--[if gte mso 9]><xml><w:WordDocument></w:WordDocument></xml><![endif]-->\
                    <p class=MsoNormal>one<o:p></o:p></p><strike>two</strike></html>";
        let out = clean_foreign_markup(html);
        assert!(!out.contains("<meta"));
        assert!(!out.contains("<style"));
        assert!(!out.contains("o:p"));
        assert!(!out.contains("w:WordDocument"));
        assert!(!out.contains("<!--"));
        assert!(out.contains("<p >one</p>"));
        assert!(out.contains("<s>two</s>"));
    }

    #[test]
    fn test_keeps_non_vendor_style_declarations() {
        let out = clean_foreign_markup(r#"<span style="color:red;mso-fareast-language:EN-US">x</span>"#);
        assert_eq!(out, r#"<span style="color: red;">x</span>"#);
    }

    #[test]
    fn test_removes_dangerous_elements() {
        let out = clean_foreign_markup("<p class=MsoNormal>a</p><noscript>b</noscript><applet code=x>c</applet><embed src=y>");
        assert!(!out.contains('b'));
        assert!(!out.contains("applet"));
        assert!(!out.contains("embed"));
    }
}
