//! Tag rewrite and attribute strip helpers.
//!
//! The sanitizer works on markup text. Everything that touches tags goes
//! through these few functions so the matching rules live in one place.

use regex::Regex;
use tracing::warn;

use crate::dom::parse::{RawStartTag, scan_start_tag};

/// One attribute as written in the markup. `value` is the raw text between
/// the quotes (entities left alone); `None` for a bare attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAttr {
    pub name: String,
    pub value: Option<String>,
}

/// A parsed start tag handed to [`rewrite_start_tags`] callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attrs: Vec<TagAttr>,
    pub self_closing: bool,
}

impl StartTag {
    fn from_raw(raw: RawStartTag<'_>) -> Self {
        Self {
            name: raw.name.to_string(),
            attrs: raw
                .attrs
                .into_iter()
                .map(|(name, value)| TagAttr {
                    name: name.to_string(),
                    value: value.map(str::to_string),
                })
                .collect(),
            self_closing: raw.self_closing,
        }
    }

    /// Serialize with single spaces and double-quoted values.
    pub fn render(&self) -> String {
        let mut out = format!("<{}", self.name);
        for attr in &self.attrs {
            out.push(' ');
            out.push_str(&attr.name);
            if let Some(value) = &attr.value {
                out.push_str("=\"");
                out.push_str(&value.replace('"', "&quot;"));
                out.push('"');
            }
        }
        out.push_str(if self.self_closing { "/>" } else { ">" });
        out
    }
}

/// Run `f` over every start tag and write the (possibly edited) tag back.
///
/// Tags are found with the same tokenizer the document parser uses, so a tag
/// with junk between its attributes is still a tag here. Comments and
/// declarations are copied through untouched.
pub fn rewrite_start_tags(html: &str, mut f: impl FnMut(&mut StartTag)) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(rel) = html[pos..].find('<') {
        let lt = pos + rel;
        out.push_str(&html[pos..lt]);
        let rest = &html[lt..];
        let skip = if rest.starts_with("<!--") {
            Some(rest[4..].find("-->").map_or(rest.len(), |end| 4 + end + 3))
        } else if rest.starts_with("<!") || rest.starts_with("<?") || rest.starts_with("</") {
            None
        } else {
            match scan_start_tag(rest) {
                Some(raw) => {
                    let len = raw.len;
                    let mut tag = StartTag::from_raw(raw);
                    f(&mut tag);
                    out.push_str(&tag.render());
                    pos = lt + len;
                    continue;
                }
                None => None,
            }
        };
        let len = skip.unwrap_or(1);
        out.push_str(&rest[..len]);
        pos = lt + len;
    }
    out.push_str(&html[pos..]);
    out
}

/// Rename every start and end tag `from` to `to`, keeping attributes.
pub fn rename_tag(html: &str, from: &str, to: &str) -> String {
    let pattern = format!(r"(?i)<(/?){}([ \t\r\n\x0C/>])", regex::escape(from));
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(html, format!("<${{1}}{to}${{2}}")).into_owned(),
        Err(err) => {
            warn!(%err, from, "tag rename pattern rejected");
            html.to_string()
        }
    }
}

/// Remove elements with the given names together with their content.
///
/// Matching is non-greedy on the end tag of the same name, so nested
/// same-name elements leave their outer end tag behind.
pub fn remove_elements(html: &str, names: &[&str]) -> String {
    let mut out = html.to_string();
    for name in names {
        let pattern = format!(
            r"(?is)<{0}\b[^>]*>.*?</{0}[ \t\r\n\x0C]*>",
            regex::escape(name)
        );
        match Regex::new(&pattern) {
            Ok(re) => out = re.replace_all(&out, "").into_owned(),
            Err(err) => warn!(%err, name, "element removal pattern rejected"),
        }
    }
    out
}

/// Remove start and end tags with the given names, keeping their content.
pub fn strip_tags(html: &str, names: &[&str]) -> String {
    let alternation = names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?i)</?(?:{alternation})\b[^>]*>");
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(html, "").into_owned(),
        Err(err) => {
            warn!(%err, "tag strip pattern rejected");
            html.to_string()
        }
    }
}
