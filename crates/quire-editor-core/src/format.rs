//! Pretty-printer for the source view.
//!
//! Purely presentational: one tag per line, four spaces per nesting level,
//! inline text on its own line with whitespace collapsed. An element whose
//! only content is text stays on one line (`<p>hi</p>`).
//!
//! Whitespace at the edge of a text run is kept as a single space at the end
//! of a line, so removing every line break plus indentation gives the input
//! markup back.

/// Tags that never increase the indent.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "link", "meta",
    "param", "source",
];

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    /// Tag text between `<` and `>`, exclusive.
    Tag(&'a str),
    Text(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
    /// Void, self-closed, comment or declaration.
    Standalone,
}

fn classify(tag: &str) -> TagKind {
    if tag.starts_with('/') {
        TagKind::Close
    } else if tag.starts_with('!') || tag.starts_with('?') || tag.ends_with('/') {
        TagKind::Standalone
    } else if SELF_CLOSING_TAGS
        .iter()
        .any(|v| v.eq_ignore_ascii_case(tag_name(tag)))
    {
        TagKind::Standalone
    } else {
        TagKind::Open
    }
}

fn tag_name(tag: &str) -> &str {
    let tag = tag.trim_start_matches('/');
    let end = tag
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(tag.len());
    &tag[..end]
}

/// Split on `<` boundaries. A tag ends at the first `>` outside quotes.
fn tokenize(html: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let bytes = html.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            let mut quote = None;
            let mut j = i + 1;
            while j < bytes.len() {
                match (quote, bytes[j]) {
                    (None, b'"' | b'\'') if !html[i + 1..j].starts_with("!--") => quote = Some(bytes[j]),
                    (Some(q), b) if b == q => quote = None,
                    (None, b'>') => break,
                    _ => {}
                }
                j += 1;
            }
            if j >= bytes.len() {
                tokens.push(Token::Text(&html[i..]));
                break;
            }
            tokens.push(Token::Tag(&html[i + 1..j]));
            i = j + 1;
        } else {
            let end = html[i..].find('<').map_or(bytes.len(), |n| i + n);
            tokens.push(Token::Text(&html[i..end]));
            i = end;
        }
    }
    tokens
}

fn collapse_whitespace(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// Like [`collapse_whitespace`], but a run at either edge of non-blank text
/// stays as one space.
fn squeeze_whitespace(text: &str) -> String {
    let words = collapse_whitespace(text);
    if words.is_empty() {
        return words;
    }
    let lead = if text.starts_with(|c: char| c.is_ascii_whitespace()) { " " } else { "" };
    let tail = if text.ends_with(|c: char| c.is_ascii_whitespace()) { " " } else { "" };
    format!("{lead}{words}{tail}")
}

/// Indent `html` for display in the source view.
pub fn format(html: &str) -> String {
    let tokens = tokenize(html.trim());
    let mut lines: Vec<String> = Vec::new();
    let mut depth: usize = 0;
    let mut i = 0;
    let emit = |lines: &mut Vec<String>, depth: usize, line: &str| {
        lines.push(format!("{}{}", INDENT.repeat(depth), line));
    };

    while i < tokens.len() {
        match tokens[i] {
            Token::Text(text) => {
                let text = squeeze_whitespace(text);
                if let Some(rest) = text.strip_prefix(' ') {
                    if let Some(last) = lines.last_mut()
                        && !last.ends_with(' ')
                    {
                        last.push(' ');
                    }
                    emit(&mut lines, depth, rest);
                } else if !text.is_empty() {
                    emit(&mut lines, depth, &text);
                }
            }
            Token::Tag(tag) => match classify(tag) {
                TagKind::Close => {
                    depth = depth.saturating_sub(1);
                    emit(&mut lines, depth, &format!("<{tag}>"));
                }
                TagKind::Standalone => emit(&mut lines, depth, &format!("<{tag}>")),
                TagKind::Open => {
                    if let Some(joined) = single_line_element(&tokens[i..]) {
                        emit(&mut lines, depth, &joined.line);
                        i += joined.consumed;
                        continue;
                    }
                    emit(&mut lines, depth, &format!("<{tag}>"));
                    depth += 1;
                }
            },
        }
        i += 1;
    }
    lines.join("\n").trim().to_string()
}

struct Joined {
    line: String,
    consumed: usize,
}

/// `<x>text</x>` (or `<x></x>`) at the head of `tokens`, rendered on one line.
fn single_line_element(tokens: &[Token<'_>]) -> Option<Joined> {
    let Token::Tag(open) = tokens.first()? else {
        return None;
    };
    let name = tag_name(open);
    let (text, close_at) = match tokens.get(1)? {
        Token::Text(text) => (squeeze_whitespace(text), 2),
        Token::Tag(_) => (String::new(), 1),
    };
    let Token::Tag(close) = tokens.get(close_at)? else {
        return None;
    };
    if classify(close) != TagKind::Close || !tag_name(close).eq_ignore_ascii_case(name) {
        return None;
    }
    Some(Joined {
        line: format!("<{open}>{text}<{close}>"),
        consumed: close_at + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indent_levels(formatted: &str) -> Vec<usize> {
        formatted
            .lines()
            .map(|l| (l.len() - l.trim_start().len()) / INDENT.len())
            .collect()
    }

    #[test]
    fn test_nested_block_indentation() {
        let out = format("<div><p>hi</p></div>");
        assert_eq!(out.lines().count(), 3);
        assert_eq!(indent_levels(&out), vec![0, 1, 0]);
        assert!(out.contains("hi"));
        insta::assert_snapshot!(out, @r"
        <div>
            <p>hi</p>
        </div>
        ");
    }

    #[test]
    fn test_mixed_inline_content() {
        let out = format("<ul><li>one</li><li>two <b>bold</b>\n  tail</li></ul><p>a<br>b</p>");
        assert_eq!(
            out,
            "<ul>\n    <li>one</li>\n    <li>\n        two \n        <b>bold</b> \n        tail\n    </li>\n</ul>\n\
             <p>\n    a\n    <br>\n    b\n</p>"
        );
    }

    #[test]
    fn test_dropping_layout_restores_markup() {
        let html = "<p>one <b>two</b> three <i> four </i></p>";
        let out = format(html);
        let flat: String = out
            .lines()
            .map(|line| line.trim_start_matches(' '))
            .collect();
        assert_eq!(flat, html);
    }

    #[test]
    fn test_void_and_self_closed_tags_keep_depth() {
        let out = format("<div><img src=\"a.png\"><hr/><!-- note --></div>");
        assert_eq!(indent_levels(&out), vec![0, 1, 1, 1, 0]);
    }

    #[test]
    fn test_quoted_angle_bracket_stays_in_tag() {
        let out = format("<p title=\"a > b\">x</p>");
        assert_eq!(out, "<p title=\"a > b\">x</p>");
    }

    #[test]
    fn test_stray_close_does_not_underflow() {
        assert_eq!(format("</div>x"), "</div>\nx");
    }
}
