//! Selection state and the selection queries block-level commands rely on.
//!
//! A [`Selection`] is an ordered list of ranges; hosts without multi-range
//! support only ever hold one. Every query walks upward no further than the
//! editable root it is given, so content outside the editor never leaks into
//! a command.

use smol_str::SmolStr;
use tracing::warn;

use crate::dom::{Document, DomPosition, DomRange, NodeId};

/// Tags that count as blocks for format-block, alignment and list commands.
pub const BLOCK_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "div", "blockquote", "pre",
];

pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.iter().any(|b| b.eq_ignore_ascii_case(tag))
}

/// The live selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<DomRange>,
    multi_range: bool,
}

impl Selection {
    pub fn new(multi_range: bool) -> Self {
        Self {
            ranges: Vec::new(),
            multi_range,
        }
    }

    pub fn ranges(&self) -> &[DomRange] {
        &self.ranges
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn first_range(&self) -> Option<DomRange> {
        self.ranges.first().copied()
    }

    pub fn supports_multiple_ranges(&self) -> bool {
        self.multi_range
    }

    /// Add a range. Single-range hosts ignore additional ranges.
    pub fn add_range(&mut self, range: DomRange) {
        if self.ranges.is_empty() || self.multi_range {
            self.ranges.push(range);
        }
    }

    pub fn remove_all_ranges(&mut self) {
        self.ranges.clear();
    }

    /// Replace the selection with a single range.
    pub fn set_range(&mut self, range: DomRange) {
        self.ranges.clear();
        self.ranges.push(range);
    }

    pub fn collapse(&mut self, at: DomPosition) {
        self.set_range(DomRange::collapsed(at));
    }

    /// Start of the first range, the point block lookups start from.
    pub fn anchor(&self) -> Option<DomPosition> {
        self.ranges.first().map(|r| r.start)
    }

    pub fn is_collapsed(&self) -> bool {
        self.ranges.iter().all(DomRange::is_collapsed)
    }

    /// Drop ranges whose boundaries no longer point into the document.
    pub fn retain_valid(&mut self, doc: &Document) {
        let before = self.ranges.len();
        self.ranges.retain(|r| r.is_valid(doc));
        if self.ranges.len() != before {
            warn!(dropped = before - self.ranges.len(), "dropped dangling selection ranges");
        }
    }
}

/// Ranges captured by value, in host order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    ranges: Vec<DomRange>,
}

impl SelectionSnapshot {
    pub fn ranges(&self) -> &[DomRange] {
        &self.ranges
    }

    pub fn first_range(&self) -> Option<DomRange> {
        self.ranges.first().copied()
    }
}

/// Capture the selection; `None` when it has no ranges.
pub fn save(selection: &Selection) -> Option<SelectionSnapshot> {
    if selection.ranges.is_empty() {
        return None;
    }
    Some(SelectionSnapshot {
        ranges: selection.ranges.clone(),
    })
}

/// Put a snapshot back, replacing whatever is selected now.
pub fn restore(selection: &mut Selection, snapshot: Option<&SelectionSnapshot>) {
    let Some(snapshot) = snapshot else {
        return;
    };
    selection.remove_all_ranges();
    for range in &snapshot.ranges {
        selection.add_range(*range);
    }
}

/// Result of [`block_element_of`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockElement {
    pub element: Option<NodeId>,
    pub tag_name: SmolStr,
}

/// Nearest block ancestor of the selection anchor, stopping at `root`.
///
/// `root` itself is never reported even when its tag is a block tag.
pub fn block_element_of(doc: &Document, selection: &Selection, root: NodeId) -> BlockElement {
    let Some(anchor) = selection.anchor() else {
        return BlockElement::default();
    };
    if !doc.is_inclusive_ancestor(root, anchor.node) {
        return BlockElement::default();
    }
    doc.ancestors(anchor.node)
        .take_while(|&n| n != root)
        .find_map(|n| {
            let tag = doc.tag(n)?;
            is_block_tag(tag).then(|| BlockElement {
                element: Some(n),
                tag_name: SmolStr::new(tag),
            })
        })
        .unwrap_or_default()
}

/// Block descendants of `root` that intersect any selected range, in document order.
pub fn block_elements_in_selection(doc: &Document, selection: &Selection, root: NodeId) -> Vec<NodeId> {
    let ranges: Vec<DomRange> = selection
        .ranges()
        .iter()
        .filter(|r| doc.is_inclusive_ancestor(root, r.start.node))
        .copied()
        .collect();
    if ranges.is_empty() {
        return Vec::new();
    }
    doc.descendants(root)
        .into_iter()
        .filter(|&n| doc.tag(n).is_some_and(is_block_tag))
        .filter(|&n| ranges.iter().any(|r| r.intersects_node(doc, n)))
        .collect()
}

/// Element with tag `tag` enclosing the selection, or contained in it.
///
/// Ancestors of the first range's common container are searched up to `root`
/// first. If none matches and the range is not collapsed, the first
/// descendant of the common container lying fully inside the range wins.
pub fn find_ancestor_by_tag(
    doc: &Document,
    selection: &Selection,
    root: NodeId,
    tag: &str,
) -> Option<NodeId> {
    let range = selection.first_range()?;
    let common = range.common_ancestor(doc);
    if !doc.is_inclusive_ancestor(root, common) {
        return None;
    }
    let enclosing = doc
        .ancestors(common)
        .take_while(|&n| n != root)
        .find(|&n| doc.has_tag(n, tag));
    if enclosing.is_some() || range.is_collapsed() {
        return enclosing;
    }
    doc.descendants(common)
        .into_iter()
        .find(|&n| doc.has_tag(n, tag) && range.contains_node(doc, n))
}
