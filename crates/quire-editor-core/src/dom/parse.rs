//! Lenient HTML fragment parser.
//!
//! Good enough for editor content and pasted markup: void elements, raw-text
//! `script`/`style`, comments, implied `</li>` and `</p>`, and the usual
//! entity references. Anything it does not understand is kept as text or
//! skipped; it never fails.

use smol_str::SmolStr;

use super::{Attribute, Document, NodeId};

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Start tags that close an open `<p>`.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "fieldset", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol", "p", "pre", "section",
    "table", "ul",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// Parse `html` into detached top-level nodes owned by `doc`.
pub fn parse_fragment(doc: &mut Document, html: &str) -> Vec<NodeId> {
    let container = doc.create_element("template");
    let mut builder = TreeBuilder {
        doc,
        stack: vec![container],
    };
    builder.run(html);
    let nodes = builder.doc.children(container).to_vec();
    for &node in &nodes {
        builder.doc.detach(node);
    }
    nodes
}

struct TreeBuilder<'a> {
    doc: &'a mut Document,
    stack: Vec<NodeId>,
}

impl TreeBuilder<'_> {
    fn current(&self) -> NodeId {
        // The container is never popped.
        self.stack[self.stack.len() - 1]
    }

    fn current_tag(&self) -> Option<&str> {
        if self.stack.len() > 1 {
            self.doc.tag(self.current())
        } else {
            None
        }
    }

    fn run(&mut self, html: &str) {
        let mut pos = 0;
        let mut text_start = 0;
        while let Some(rel) = html[pos..].find('<') {
            let lt = pos + rel;
            let rest = &html[lt..];
            let consumed = if rest.starts_with("<!--") {
                self.flush_text(&html[text_start..lt]);
                Some(self.comment(rest))
            } else if rest.starts_with("</") {
                match end_tag(rest) {
                    Some((name, len)) => {
                        self.flush_text(&html[text_start..lt]);
                        self.close(&name);
                        Some(len)
                    }
                    None => None,
                }
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.flush_text(&html[text_start..lt]);
                Some(rest.find('>').map_or(rest.len(), |i| i + 1))
            } else {
                match start_tag(rest) {
                    Some(tag) => {
                        self.flush_text(&html[text_start..lt]);
                        Some(self.open(tag, &html[lt..]))
                    }
                    None => None,
                }
            };
            match consumed {
                Some(len) => {
                    pos = lt + len;
                    text_start = pos;
                }
                None => pos = lt + 1,
            }
        }
        self.flush_text(&html[text_start..]);
    }

    fn flush_text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let text = decode_entities(raw);
        let parent = self.current();
        if let Some(&last) = self.doc.children(parent).last()
            && let Some(existing) = self.doc.text(last)
        {
            let merged = format!("{existing}{text}");
            self.doc.set_text(last, merged);
            return;
        }
        let node = self.doc.create_text(text);
        self.doc.append_child(parent, node);
    }

    fn comment(&mut self, rest: &str) -> usize {
        let body = &rest[4..];
        let (content, len) = match body.find("-->") {
            Some(end) => (&body[..end], 4 + end + 3),
            None => (body, rest.len()),
        };
        let node = self.doc.create_comment(content);
        let parent = self.current();
        self.doc.append_child(parent, node);
        len
    }

    fn open(&mut self, tag: StartTag, rest: &str) -> usize {
        let name = tag.name.to_ascii_lowercase();
        if name == "li" {
            self.close_open_li();
        }
        if CLOSES_P.contains(&name.as_str()) && self.current_tag() == Some("p") {
            self.stack.pop();
        }

        let element = self.doc.create_element(&name);
        if let Some(el) = self.doc.element_mut(element) {
            for (attr_name, value) in tag.attrs {
                if el.attr(&attr_name).is_none() {
                    el.attrs.push(Attribute {
                        name: SmolStr::new(attr_name.to_ascii_lowercase()),
                        value,
                    });
                }
            }
        }
        let parent = self.current();
        self.doc.append_child(parent, element);

        if is_void_element(&name) || tag.self_closing {
            return tag.len;
        }
        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            let body = &rest[tag.len..];
            let close = format!("</{name}");
            let end = find_ascii_ci(body, &close).unwrap_or(body.len());
            if end > 0 {
                let text = self.doc.create_text(&body[..end]);
                self.doc.append_child(element, text);
            }
            let after_close = body[end..].find('>').map_or(body.len(), |i| end + i + 1);
            return tag.len + after_close;
        }
        self.stack.push(element);
        tag.len
    }

    fn close_open_li(&mut self) {
        for depth in (1..self.stack.len()).rev() {
            match self.doc.tag(self.stack[depth]) {
                Some("li") => {
                    self.stack.truncate(depth);
                    return;
                }
                Some("ul" | "ol") => return,
                _ => {}
            }
        }
    }

    fn close(&mut self, name: &str) {
        let found = (1..self.stack.len())
            .rev()
            .find(|&depth| self.doc.has_tag(self.stack[depth], name));
        if let Some(depth) = found {
            self.stack.truncate(depth);
        }
    }
}

struct StartTag {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
    len: usize,
}

/// Parse a start tag at the beginning of `s` (which starts with `<`).
fn start_tag(s: &str) -> Option<StartTag> {
    let raw = scan_start_tag(s)?;
    Some(StartTag {
        name: raw.name.to_string(),
        attrs: raw
            .attrs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.map(decode_entities).unwrap_or_default()))
            .collect(),
        self_closing: raw.self_closing,
        len: raw.len,
    })
}

/// A start tag exactly as written. Values are raw (entities undecoded) and
/// `None` for a bare attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawStartTag<'a> {
    pub name: &'a str,
    pub attrs: Vec<(&'a str, Option<&'a str>)>,
    pub self_closing: bool,
    pub len: usize,
}

/// Tokenize a start tag at the beginning of `s` (which starts with `<`).
///
/// This is the only definition of what counts as a tag. The sanitizer scans
/// with it too, so anything the parser would turn into an element has been
/// through attribute cleanup. Stray quotes, `/` and `=` between attributes
/// are skipped; an unterminated quoted value means this `<` is text.
pub(crate) fn scan_start_tag(s: &str) -> Option<RawStartTag<'_>> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || !bytes[1].is_ascii_alphabetic() {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() && !is_ws(bytes[i]) && bytes[i] != b'>' && bytes[i] != b'/' {
        i += 1;
    }
    let name = &s[1..i];
    let mut attrs = Vec::new();
    loop {
        while i < bytes.len() && is_ws(bytes[i]) {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        match bytes[i] {
            b'>' => {
                return Some(RawStartTag {
                    name,
                    attrs,
                    self_closing: false,
                    len: i + 1,
                });
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Some(RawStartTag {
                    name,
                    attrs,
                    self_closing: true,
                    len: i + 2,
                });
            }
            b'/' | b'"' | b'\'' | b'=' => {
                i += 1;
                continue;
            }
            _ => {}
        }
        let name_start = i;
        while i < bytes.len() && !is_ws(bytes[i]) && !matches!(bytes[i], b'>' | b'/' | b'=') {
            i += 1;
        }
        let attr_name = &s[name_start..i];
        let mut j = i;
        while j < bytes.len() && is_ws(bytes[j]) {
            j += 1;
        }
        let mut value = None;
        if bytes.get(j) == Some(&b'=') {
            j += 1;
            while j < bytes.len() && is_ws(bytes[j]) {
                j += 1;
            }
            match bytes.get(j) {
                Some(&quote @ (b'"' | b'\'')) => {
                    let end = s[j + 1..].find(quote as char)?;
                    value = Some(&s[j + 1..j + 1 + end]);
                    j += end + 2;
                }
                Some(_) => {
                    let start = j;
                    while j < bytes.len() && !is_ws(bytes[j]) && bytes[j] != b'>' {
                        j += 1;
                    }
                    value = Some(&s[start..j]);
                }
                None => return None,
            }
            i = j;
        }
        attrs.push((attr_name, value));
    }
}

/// Parse an end tag at the beginning of `s`; returns the name and byte length.
fn end_tag(s: &str) -> Option<(String, usize)> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || !bytes[2].is_ascii_alphabetic() {
        return None;
    }
    let close = s.find('>')?;
    let name_end = s[2..close]
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .map_or(close, |i| i + 2);
    Some((s[2..name_end].to_ascii_lowercase(), close + 1))
}

fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0C)
}

fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// Decode named (`amp`, `lt`, `gt`, `quot`, `apos`, `nbsp`) and numeric references.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_one(rest) {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_one(s: &str) -> Option<(char, usize)> {
    let limit = s.char_indices().nth(12).map_or(s.len(), |(i, _)| i);
    let semi = s[..limit].find(';')?;
    let body = &s[1..semi];
    let ch = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        char::from_u32(code)?
    } else {
        match body {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{a0}',
            _ => return None,
        }
    };
    Some((ch, semi + 1))
}
