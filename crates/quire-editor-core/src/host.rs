//! In-memory implementation of the native formatting primitives.
//!
//! `MemoryHost` gives every dispatcher path a working `execCommand` without a
//! browser. It follows browser behaviour where that behaviour is stable
//! (toggling inline formats, list conversion, link creation) and keeps the
//! output minimal elsewhere. Commands act on the first selected range.

use tracing::{debug, trace};

use crate::dom::range::{delete_contents, insert_node_at, insert_text_at, split_range};
use crate::dom::{Document, DomPosition, DomRange, NodeId, parse};
use crate::platform::{FormattingPlatform, Surface};
use crate::selection::{self, Selection, is_block_tag};
use crate::undo::History;

/// Commands `MemoryHost` understands.
pub const SUPPORTED_COMMANDS: &[&str] = &[
    "bold",
    "italic",
    "underline",
    "strikeThrough",
    "subscript",
    "superscript",
    "removeFormat",
    "createLink",
    "unlink",
    "insertText",
    "insertHTML",
    "insertImage",
    "insertHorizontalRule",
    "insertOrderedList",
    "insertUnorderedList",
    "indent",
    "outdent",
    "foreColor",
    "backColor",
    "formatBlock",
    "undo",
    "redo",
];

/// Elements `removeFormat` unwraps.
const FORMATTING_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "s", "strike", "del", "sub", "sup", "font", "span",
];

/// Tags that end an inline run at the top level.
const NON_INLINE_TAGS: &[&str] = &["ul", "ol", "li", "table", "hr"];

/// Tag written for an inline format, plus the tags that already count as it.
struct InlineFormat {
    tag: &'static str,
    aliases: &'static [&'static str],
}

fn inline_format(command: &str) -> Option<InlineFormat> {
    let (tag, aliases): (&'static str, &'static [&'static str]) = match command {
        "bold" => ("strong", &["strong", "b"]),
        "italic" => ("em", &["em", "i"]),
        "underline" => ("u", &["u"]),
        "strikeThrough" => ("s", &["s", "strike", "del"]),
        "subscript" => ("sub", &["sub"]),
        "superscript" => ("sup", &["sup"]),
        _ => return None,
    };
    Some(InlineFormat { tag, aliases })
}

/// Reference `FormattingPlatform` with snapshot undo history.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    history: History,
}

impl MemoryHost {
    pub fn new(undo_depth: usize) -> Self {
        Self {
            history: History::new(undo_depth),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    fn run(&mut self, surface: &mut Surface<'_>, command: &str, value: Option<&str>) -> bool {
        if let Some(format) = inline_format(command) {
            return toggle_inline(surface, &format);
        }
        let value = value.unwrap_or_default();
        match command {
            "removeFormat" => remove_format(surface),
            "createLink" => !value.is_empty() && create_link(surface, value),
            "unlink" => unlink(surface),
            "insertText" => {
                insert_text(surface, value);
                true
            }
            "insertHTML" => {
                insert_html(surface, value);
                true
            }
            "insertImage" => {
                if value.is_empty() {
                    return false;
                }
                let img = surface.doc.create_element("img");
                surface.doc.set_attr(img, "src", value);
                insert_nodes(surface, vec![img]);
                true
            }
            "insertHorizontalRule" => {
                let hr = surface.doc.create_element("hr");
                insert_nodes(surface, vec![hr]);
                true
            }
            "insertOrderedList" => toggle_list(surface, "ol"),
            "insertUnorderedList" => toggle_list(surface, "ul"),
            "indent" => indent(surface),
            "outdent" => outdent(surface),
            "foreColor" => !value.is_empty() && color_text(surface, "color", value),
            "backColor" => !value.is_empty() && color_text(surface, "background-color", value),
            "formatBlock" => !value.is_empty() && format_block(surface, value),
            _ => false,
        }
    }
}

impl FormattingPlatform for MemoryHost {
    fn exec_command(
        &mut self,
        surface: &mut Surface<'_>,
        command: &str,
        value: Option<&str>,
    ) -> bool {
        match command {
            "undo" | "redo" => {
                let current = surface.doc.inner_html(surface.root);
                let restored = if command == "undo" {
                    self.history.undo(current)
                } else {
                    self.history.redo(current)
                };
                let Some(html) = restored else {
                    return false;
                };
                surface.doc.set_inner_html(surface.root, &html);
                let end = surface.doc.len(surface.root);
                surface.selection.collapse(DomPosition::new(surface.root, end));
                debug!(command, "history step applied");
                true
            }
            _ => {
                if surface.selection.range_count() == 0 {
                    return false;
                }
                let before = surface.doc.inner_html(surface.root);
                let changed = self.run(surface, command, value);
                if changed {
                    self.history.record(before);
                }
                trace!(command, changed, "native command");
                changed
            }
        }
    }

    fn checkpoint(&mut self, surface: &Surface<'_>) {
        self.history.record(surface.doc.inner_html(surface.root));
    }

    fn supports_command(&self, command: &str) -> bool {
        SUPPORTED_COMMANDS.contains(&command)
    }
}

fn first_range(surface: &Surface<'_>) -> Option<DomRange> {
    surface
        .selection
        .first_range()
        .map(|r| r.ordered(surface.doc))
        .filter(|r| surface.doc.is_inclusive_ancestor(surface.root, r.start.node))
}

/// Split the range boundaries and return the non-empty text nodes inside it.
fn selected_text_nodes(doc: &mut Document, root: NodeId, range: DomRange) -> Vec<NodeId> {
    let split = split_range(doc, range);
    doc.descendants(root)
        .into_iter()
        .filter(|&n| doc.text(n).is_some_and(|t| !t.is_empty()) && split.contains_node(doc, n))
        .collect()
}

/// Select from the start of `first` to the end of `last`.
fn select_text_span(doc: &Document, selection: &mut Selection, first: NodeId, last: NodeId) {
    selection.set_range(DomRange::new(
        DomPosition::new(first, 0),
        DomPosition::new(last, doc.len(last)),
    ));
}

fn matches_any(doc: &Document, node: NodeId, tags: &[&str]) -> bool {
    doc.tag(node)
        .is_some_and(|t| tags.iter().any(|a| a.eq_ignore_ascii_case(t)))
}

/// Nearest ancestor of `node` below `root` whose tag is in `tags`.
fn enclosing(doc: &Document, root: NodeId, node: NodeId, tags: &[&str]) -> Option<NodeId> {
    doc.ancestors(node)
        .take_while(|&n| n != root)
        .find(|&n| matches_any(doc, n, tags))
}

/// Split `element` at `pos` (somewhere inside it), cloning every element on
/// the way up. Returns the clone of `element` holding everything after `pos`.
fn split_element_at(doc: &mut Document, element: NodeId, pos: DomPosition) -> NodeId {
    let mut at = crate::dom::range::split_position(doc, pos);
    loop {
        let node = at.node;
        let clone = doc.shallow_clone(node);
        let moving: Vec<NodeId> = doc.children(node)[at.offset.min(doc.len(node))..].to_vec();
        for child in moving {
            doc.append_child(clone, child);
        }
        doc.insert_after(node, clone);
        if node == element {
            return clone;
        }
        at = DomPosition::after(doc, node);
    }
}

/// Detach `node` when nothing visible is left in it.
fn drop_if_empty(doc: &mut Document, node: NodeId) -> bool {
    if doc.has_content(node) {
        false
    } else {
        doc.detach(node);
        true
    }
}

/// Move `text` out of the formatting element `wrapper`, leaving the parts
/// before and after it formatted.
fn isolate_and_unwrap(doc: &mut Document, wrapper: NodeId, text: NodeId) {
    let after = split_element_at(doc, wrapper, DomPosition::after(doc, text));
    let middle = split_element_at(doc, wrapper, DomPosition::before(doc, text));
    drop_if_empty(doc, wrapper);
    drop_if_empty(doc, after);
    doc.unwrap_element(middle);
}

fn toggle_inline(surface: &mut Surface<'_>, format: &InlineFormat) -> bool {
    let Some(range) = first_range(surface) else {
        return false;
    };
    let (doc, root) = (&mut *surface.doc, surface.root);

    if range.is_collapsed() {
        let Some(element) = enclosing(doc, root, range.start.node, format.aliases) else {
            return false;
        };
        let right = split_element_at(doc, element, range.start);
        let parent = doc.parent(right);
        let caret = match (drop_if_empty(doc, element), drop_if_empty(doc, right)) {
            (false, false) | (true, false) => DomPosition::before(doc, right),
            (false, true) => DomPosition::after(doc, element),
            (true, true) => match parent {
                Some(parent) => DomPosition::new(parent, 0),
                None => DomPosition::new(root, 0),
            },
        };
        surface.selection.collapse(caret);
        return true;
    }

    let texts = selected_text_nodes(doc, root, range);
    let (Some(&first), Some(&last)) = (texts.first(), texts.last()) else {
        return false;
    };
    let all_formatted = texts
        .iter()
        .all(|&t| enclosing(doc, root, t, format.aliases).is_some());
    for &text in &texts {
        if all_formatted {
            while let Some(wrapper) = enclosing(doc, root, text, format.aliases) {
                isolate_and_unwrap(doc, wrapper, text);
            }
        } else if enclosing(doc, root, text, format.aliases).is_none() {
            doc.wrap(text, format.tag);
        }
    }
    select_text_span(doc, surface.selection, first, last);
    true
}

fn remove_format(surface: &mut Surface<'_>) -> bool {
    let Some(range) = first_range(surface) else {
        return false;
    };
    if range.is_collapsed() {
        return false;
    }
    let (doc, root) = (&mut *surface.doc, surface.root);
    let texts = selected_text_nodes(doc, root, range);
    let (Some(&first), Some(&last)) = (texts.first(), texts.last()) else {
        return false;
    };
    let mut changed = false;
    for &text in &texts {
        while let Some(wrapper) = enclosing(doc, root, text, FORMATTING_TAGS) {
            isolate_and_unwrap(doc, wrapper, text);
            changed = true;
        }
    }
    select_text_span(doc, surface.selection, first, last);
    changed
}

fn create_link(surface: &mut Surface<'_>, href: &str) -> bool {
    let Some(range) = first_range(surface) else {
        return false;
    };
    if range.is_collapsed() {
        let anchor = surface.doc.create_element("a");
        surface.doc.set_attr(anchor, "href", href);
        let text = surface.doc.create_text(href);
        surface.doc.append_child(anchor, text);
        let after = insert_node_at(surface.doc, range.start, anchor);
        surface.selection.collapse(after);
        return true;
    }
    let (doc, root) = (&mut *surface.doc, surface.root);
    let texts = selected_text_nodes(doc, root, range);
    let (Some(&first), Some(&last)) = (texts.first(), texts.last()) else {
        return false;
    };
    for &text in &texts {
        match enclosing(doc, root, text, &["a"]) {
            Some(existing) => doc.set_attr(existing, "href", href),
            None => {
                let anchor = doc.wrap(text, "a");
                doc.set_attr(anchor, "href", href);
            }
        }
    }
    select_text_span(doc, surface.selection, first, last);
    true
}

fn unlink(surface: &mut Surface<'_>) -> bool {
    let Some(range) = first_range(surface) else {
        return false;
    };
    let (doc, root) = (&mut *surface.doc, surface.root);
    let mut anchors: Vec<NodeId> = enclosing(doc, root, range.start.node, &["a"])
        .into_iter()
        .collect();
    if !range.is_collapsed() {
        for anchor in doc.elements_by_tag(root, "a") {
            if range.intersects_node(doc, anchor) && !anchors.contains(&anchor) {
                anchors.push(anchor);
            }
        }
    }
    for &anchor in &anchors {
        doc.unwrap_element(anchor);
    }
    surface.selection.retain_valid(doc);
    !anchors.is_empty()
}

/// Delete the selection and return the caret left behind.
fn clear_selection(surface: &mut Surface<'_>) -> DomPosition {
    match first_range(surface) {
        Some(range) => delete_contents(surface.doc, range),
        None => DomPosition::new(surface.root, surface.doc.len(surface.root)),
    }
}

fn insert_text(surface: &mut Surface<'_>, text: &str) {
    let at = clear_selection(surface);
    let end = insert_text_at(surface.doc, at, text);
    surface.selection.collapse(end);
}

fn insert_html(surface: &mut Surface<'_>, html: &str) {
    let nodes = parse::parse_fragment(surface.doc, html);
    insert_nodes(surface, nodes);
}

fn insert_nodes(surface: &mut Surface<'_>, nodes: Vec<NodeId>) {
    let mut at = clear_selection(surface);
    for node in nodes {
        at = insert_node_at(surface.doc, at, node);
    }
    surface.selection.collapse(at);
}

/// Top-level child of `root` holding `pos`.
fn top_level_child(doc: &Document, root: NodeId, pos: DomPosition) -> Option<NodeId> {
    if pos.node == root {
        let children = doc.children(root);
        return children
            .get(pos.offset)
            .or_else(|| pos.offset.checked_sub(1).and_then(|i| children.get(i)))
            .copied();
    }
    doc.ancestors(pos.node)
        .take_while(|&n| n != root)
        .last()
        .filter(|&n| doc.parent(n) == Some(root))
}

fn is_inline(doc: &Document, node: NodeId) -> bool {
    match doc.tag(node) {
        Some(tag) => !is_block_tag(tag) && !NON_INLINE_TAGS.contains(&tag),
        None => true,
    }
}

/// Wrap the run of inline top-level nodes around `pos` in a new `tag` element.
fn wrap_inline_run(doc: &mut Document, root: NodeId, pos: DomPosition, tag: &str) -> Option<NodeId> {
    let top = top_level_child(doc, root, pos)?;
    if !is_inline(doc, top) {
        return None;
    }
    let children = doc.children(root).to_vec();
    let index = children.iter().position(|&c| c == top)?;
    let mut start = index;
    while start > 0 && is_inline(doc, children[start - 1]) {
        start -= 1;
    }
    let mut end = index + 1;
    while end < children.len() && is_inline(doc, children[end]) {
        end += 1;
    }
    let wrapper = doc.create_element(tag);
    doc.insert_child(root, start, wrapper);
    for &child in &children[start..end] {
        doc.append_child(wrapper, child);
    }
    Some(wrapper)
}

/// Outermost blocks touched by the selection, or a fresh block around the caret's inline run.
fn target_blocks(surface: &mut Surface<'_>) -> Vec<NodeId> {
    let blocks = selection::block_elements_in_selection(surface.doc, surface.selection, surface.root);
    let outermost: Vec<NodeId> = blocks
        .iter()
        .copied()
        .filter(|&b| {
            surface
                .doc
                .ancestors(b)
                .skip(1)
                .take_while(|&n| n != surface.root)
                .all(|a| !blocks.contains(&a))
        })
        .collect();
    if !outermost.is_empty() {
        return outermost;
    }
    let Some(anchor) = surface.selection.anchor() else {
        return Vec::new();
    };
    wrap_inline_run(surface.doc, surface.root, anchor, "p")
        .into_iter()
        .collect()
}

fn toggle_list(surface: &mut Surface<'_>, list_tag: &str) -> bool {
    let Some(range) = first_range(surface) else {
        return false;
    };
    let (doc, root) = (&mut *surface.doc, surface.root);
    if let Some(item) = enclosing(doc, root, range.start.node, &["li"])
        && let Some(list) = doc.parent(item).filter(|&l| matches_any(doc, l, &["ul", "ol"]))
    {
        if doc.has_tag(list, list_tag) {
            for li in doc.children(list).to_vec() {
                if doc.has_tag(li, "li") {
                    doc.rename_element(li, "p");
                }
            }
            doc.unwrap_element(list);
        } else {
            doc.rename_element(list, list_tag);
        }
        return true;
    }

    let blocks = target_blocks(surface);
    let Some(&first) = blocks.first() else {
        return false;
    };
    let doc = &mut *surface.doc;
    let list = doc.create_element(list_tag);
    doc.insert_before(first, list);
    for block in blocks {
        if let Some(el) = doc.element_mut(block) {
            el.attrs.clear();
        }
        doc.rename_element(block, "li");
        doc.append_child(list, block);
    }
    true
}

fn indent(surface: &mut Surface<'_>) -> bool {
    let blocks = target_blocks(surface);
    let Some(&first) = blocks.first() else {
        return false;
    };
    let doc = &mut *surface.doc;
    let quote = doc.create_element("blockquote");
    doc.insert_before(first, quote);
    for block in blocks {
        doc.append_child(quote, block);
    }
    true
}

fn outdent(surface: &mut Surface<'_>) -> bool {
    let Some(anchor) = surface.selection.anchor() else {
        return false;
    };
    match enclosing(surface.doc, surface.root, anchor.node, &["blockquote"]) {
        Some(quote) => {
            surface.doc.unwrap_element(quote);
            surface.selection.retain_valid(surface.doc);
            true
        }
        None => false,
    }
}

fn color_text(surface: &mut Surface<'_>, property: &str, value: &str) -> bool {
    let Some(range) = first_range(surface) else {
        return false;
    };
    if range.is_collapsed() {
        return false;
    }
    let (doc, root) = (&mut *surface.doc, surface.root);
    let texts = selected_text_nodes(doc, root, range);
    let (Some(&first), Some(&last)) = (texts.first(), texts.last()) else {
        return false;
    };
    for &text in &texts {
        let parent = doc.parent(text);
        let span = match parent {
            Some(p) if doc.has_tag(p, "span") && doc.children(p).len() == 1 => p,
            _ => doc.wrap(text, "span"),
        };
        doc.set_style_property(span, property, value);
    }
    select_text_span(doc, surface.selection, first, last);
    true
}

fn format_block(surface: &mut Surface<'_>, tag: &str) -> bool {
    let tag = tag.trim_matches(|c: char| c == '<' || c == '>').to_ascii_lowercase();
    let block = selection::block_element_of(surface.doc, surface.selection, surface.root);
    if let Some(element) = block.element {
        return surface.doc.rename_element(element, &tag);
    }
    let Some(anchor) = surface.selection.anchor() else {
        return false;
    };
    wrap_inline_run(surface.doc, surface.root, anchor, &tag).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::undo::UndoManager;

    struct Fixture {
        doc: Document,
        selection: Selection,
        host: MemoryHost,
    }

    impl Fixture {
        fn new(html: &str) -> Self {
            let mut doc = Document::default();
            let root = doc.root();
            doc.set_inner_html(root, html);
            Self {
                doc,
                selection: Selection::default(),
                host: MemoryHost::new(20),
            }
        }

        fn text(&self, content: &str) -> NodeId {
            let root = self.doc.root();
            self.doc
                .descendants(root)
                .into_iter()
                .find(|&n| self.doc.text(n) == Some(content))
                .unwrap()
        }

        fn select(&mut self, start: (NodeId, usize), end: (NodeId, usize)) {
            self.selection.set_range(DomRange::new(
                DomPosition::new(start.0, start.1),
                DomPosition::new(end.0, end.1),
            ));
        }

        fn exec(&mut self, command: &str, value: Option<&str>) -> bool {
            let root = self.doc.root();
            let mut surface = Surface {
                doc: &mut self.doc,
                root,
                selection: &mut self.selection,
            };
            self.host.exec_command(&mut surface, command, value)
        }

        fn html(&self) -> String {
            self.doc.inner_html(self.doc.root())
        }
    }

    #[test]
    fn test_bold_wraps_selection() {
        let mut f = Fixture::new("<p>hello world</p>");
        let t = f.text("hello world");
        f.select((t, 0), (t, 5));
        assert!(f.exec("bold", None));
        assert_eq!(f.html(), "<p><strong>hello</strong> world</p>");
    }

    #[test]
    fn test_bold_toggles_off_inside_run() {
        let mut f = Fixture::new("<p><b>abcdef</b></p>");
        let t = f.text("abcdef");
        f.select((t, 2), (t, 4));
        assert!(f.exec("bold", None));
        assert_eq!(f.html(), "<p><b>ab</b>cd<b>ef</b></p>");
    }

    #[test]
    fn test_collapsed_caret_splits_run() {
        let mut f = Fixture::new("<p><strong>abc</strong></p>");
        let t = f.text("abc");
        f.selection.collapse(DomPosition::new(t, 1));
        assert!(f.exec("bold", None));
        assert_eq!(f.html(), "<p><strong>a</strong><strong>bc</strong></p>");
        let p = f.doc.children(f.doc.root())[0];
        assert_eq!(f.selection.anchor(), Some(DomPosition::new(p, 1)));
    }

    #[test]
    fn test_collapsed_caret_at_run_end_leaves_run() {
        let mut f = Fixture::new("<p><em>abc</em>d</p>");
        let t = f.text("abc");
        f.selection.collapse(DomPosition::new(t, 3));
        assert!(f.exec("italic", None));
        assert_eq!(f.html(), "<p><em>abc</em>d</p>");
        let p = f.doc.children(f.doc.root())[0];
        assert_eq!(f.selection.anchor(), Some(DomPosition::new(p, 1)));
    }

    #[test]
    fn test_remove_format_unwraps_nested() {
        let mut f = Fixture::new("<p><b><i>xy</i></b>z</p>");
        let t = f.text("xy");
        let z = f.text("z");
        f.select((t, 0), (z, 1));
        assert!(f.exec("removeFormat", None));
        assert_eq!(f.html(), "<p>xyz</p>");
    }

    #[test]
    fn test_create_link_and_unlink() {
        let mut f = Fixture::new("<p>go here</p>");
        let t = f.text("go here");
        f.select((t, 3), (t, 7));
        assert!(f.exec("createLink", Some("http://x")));
        assert_eq!(f.html(), "<p>go <a href=\"http://x\">here</a></p>");

        let here = f.text("here");
        f.selection.collapse(DomPosition::new(here, 1));
        assert!(f.exec("unlink", None));
        assert_eq!(f.html(), "<p>go here</p>");
    }

    #[test]
    fn test_insert_html_replaces_selection() {
        let mut f = Fixture::new("<p>abc</p>");
        let t = f.text("abc");
        f.select((t, 1), (t, 2));
        assert!(f.exec("insertHTML", Some("<img src=\"x\" alt=\"y\">")));
        assert_eq!(f.html(), "<p>a<img src=\"x\" alt=\"y\">c</p>");
    }

    #[test]
    fn test_unordered_list_toggles() {
        let mut f = Fixture::new("<p>item</p>");
        let t = f.text("item");
        f.selection.collapse(DomPosition::new(t, 2));
        assert!(f.exec("insertUnorderedList", None));
        assert_eq!(f.html(), "<ul><li>item</li></ul>");
        assert!(f.exec("insertOrderedList", None));
        assert_eq!(f.html(), "<ol><li>item</li></ol>");
        assert!(f.exec("insertOrderedList", None));
        assert_eq!(f.html(), "<p>item</p>");
    }

    #[test]
    fn test_list_from_bare_inline_run() {
        let mut f = Fixture::new("one <b>two</b><p>three</p>");
        let t = f.text("two");
        f.selection.collapse(DomPosition::new(t, 0));
        assert!(f.exec("insertUnorderedList", None));
        assert_eq!(f.html(), "<ul><li>one <b>two</b></li></ul><p>three</p>");
    }

    #[test]
    fn test_indent_outdent() {
        let mut f = Fixture::new("<p>a</p>");
        let t = f.text("a");
        f.selection.collapse(DomPosition::new(t, 0));
        assert!(f.exec("indent", None));
        assert_eq!(f.html(), "<blockquote><p>a</p></blockquote>");
        assert!(f.exec("outdent", None));
        assert_eq!(f.html(), "<p>a</p>");
        assert!(!f.exec("outdent", None));
    }

    #[test]
    fn test_fore_color_reuses_single_span() {
        let mut f = Fixture::new("<p><span>ab</span></p>");
        let t = f.text("ab");
        f.select((t, 0), (t, 2));
        assert!(f.exec("foreColor", Some("#ff0000")));
        assert_eq!(f.html(), "<p><span style=\"color: #ff0000;\">ab</span></p>");
    }

    #[test]
    fn test_undo_redo() {
        let mut f = Fixture::new("<p>abc</p>");
        let t = f.text("abc");
        f.select((t, 0), (t, 3));
        f.exec("bold", None);
        assert_eq!(f.html(), "<p><strong>abc</strong></p>");
        assert!(f.exec("undo", None));
        assert_eq!(f.html(), "<p>abc</p>");
        assert!(f.exec("redo", None));
        assert_eq!(f.html(), "<p><strong>abc</strong></p>");
        assert!(!f.exec("redo", None));
    }

    #[test]
    fn test_unknown_command_is_ignored() {
        let mut f = Fixture::new("<p>abc</p>");
        let t = f.text("abc");
        f.selection.collapse(DomPosition::new(t, 0));
        assert!(!f.exec("justifyLeft", None));
        assert!(!f.host.supports_command("justifyLeft"));
        assert!(!f.host.history().can_undo());
    }

    #[test]
    fn test_no_selection_is_noop() {
        let mut f = Fixture::new("<p>abc</p>");
        assert!(!f.exec("bold", None));
        assert_eq!(f.html(), "<p>abc</p>");
    }
}
