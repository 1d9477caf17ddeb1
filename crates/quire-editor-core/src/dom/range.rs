//! Boundary points and ranges over a [`Document`].
//!
//! Offsets follow DOM Range rules: a char offset inside character data, a
//! child index inside an element.

use std::cmp::Ordering;

use super::{Document, NodeId};

/// A boundary point in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomPosition {
    pub node: NodeId,
    pub offset: usize,
}

impl DomPosition {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// Position immediately before `node` in its parent.
    pub fn before(doc: &Document, node: NodeId) -> Self {
        match (doc.parent(node), doc.index_in_parent(node)) {
            (Some(parent), Some(index)) => Self::new(parent, index),
            _ => Self::new(node, 0),
        }
    }

    /// Position immediately after `node` in its parent.
    pub fn after(doc: &Document, node: NodeId) -> Self {
        match (doc.parent(node), doc.index_in_parent(node)) {
            (Some(parent), Some(index)) => Self::new(parent, index + 1),
            _ => Self::new(node, doc.len(node)),
        }
    }

    /// Sort key: child indices from the tree top down to `node`, then the offset.
    fn key(&self, doc: &Document) -> Vec<usize> {
        let mut path: Vec<usize> = doc
            .ancestors(self.node)
            .filter_map(|n| doc.index_in_parent(n))
            .collect();
        path.reverse();
        path.push(self.offset);
        path
    }

    /// Document-order comparison.
    pub fn cmp_in(&self, other: &Self, doc: &Document) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        self.key(doc).cmp(&other.key(doc))
    }

    /// Whether the position still points into the tree rooted at the document root.
    pub fn is_valid(&self, doc: &Document) -> bool {
        doc.is_connected(self.node) && self.offset <= doc.len(self.node)
    }
}

/// A start/end pair of boundary points with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomRange {
    pub start: DomPosition,
    pub end: DomPosition,
}

impl DomRange {
    pub fn new(start: DomPosition, end: DomPosition) -> Self {
        Self { start, end }
    }

    pub fn collapsed(at: DomPosition) -> Self {
        Self { start: at, end: at }
    }

    /// Range spanning all of `node`'s contents.
    pub fn contents_of(doc: &Document, node: NodeId) -> Self {
        Self::new(DomPosition::new(node, 0), DomPosition::new(node, doc.len(node)))
    }

    /// Range spanning `node` itself.
    pub fn around(doc: &Document, node: NodeId) -> Self {
        Self::new(DomPosition::before(doc, node), DomPosition::after(doc, node))
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Swap the boundaries if they are out of document order.
    pub fn ordered(self, doc: &Document) -> Self {
        if self.start.cmp_in(&self.end, doc) == Ordering::Greater {
            Self::new(self.end, self.start)
        } else {
            self
        }
    }

    pub fn is_valid(&self, doc: &Document) -> bool {
        self.start.is_valid(doc) && self.end.is_valid(doc)
    }

    /// Deepest node containing both boundaries.
    pub fn common_ancestor(&self, doc: &Document) -> NodeId {
        let start_chain: Vec<NodeId> = doc.ancestors(self.start.node).collect();
        doc.ancestors(self.end.node)
            .find(|n| start_chain.contains(n))
            .unwrap_or(self.start.node)
    }

    /// DOM `intersectsNode`: some part of `node` lies inside the range.
    pub fn intersects_node(&self, doc: &Document, node: NodeId) -> bool {
        if doc.parent(node).is_none() {
            return true;
        }
        let before = DomPosition::before(doc, node);
        let after = DomPosition::after(doc, node);
        self.start.cmp_in(&after, doc) == Ordering::Less
            && before.cmp_in(&self.end, doc) == Ordering::Less
    }

    /// The whole of `node` lies inside the range.
    pub fn contains_node(&self, doc: &Document, node: NodeId) -> bool {
        if doc.parent(node).is_none() {
            return false;
        }
        let before = DomPosition::before(doc, node);
        let after = DomPosition::after(doc, node);
        self.start.cmp_in(&before, doc) != Ordering::Greater
            && after.cmp_in(&self.end, doc) != Ordering::Greater
    }

    /// Descendants of `scope` fully inside the range, in document order.
    pub fn contained_nodes(&self, doc: &Document, scope: NodeId) -> Vec<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .filter(|&n| self.contains_node(doc, n))
            .collect()
    }

    /// Contained nodes whose parent is not itself contained.
    pub fn top_contained_nodes(&self, doc: &Document, scope: NodeId) -> Vec<NodeId> {
        let contained = self.contained_nodes(doc, scope);
        contained
            .iter()
            .copied()
            .filter(|&n| doc.parent(n).is_none_or(|p| !contained.contains(&p)))
            .collect()
    }
}

/// Turn a position inside a text node into an element-level position,
/// splitting the text node when the offset falls strictly inside it.
pub fn split_position(doc: &mut Document, pos: DomPosition) -> DomPosition {
    if !doc.is_text(pos.node) || doc.parent(pos.node).is_none() {
        return pos;
    }
    let len = doc.len(pos.node);
    if pos.offset == 0 {
        DomPosition::before(doc, pos.node)
    } else if pos.offset >= len {
        DomPosition::after(doc, pos.node)
    } else {
        doc.split_text(pos.node, pos.offset);
        DomPosition::after(doc, pos.node)
    }
}

/// Split both boundaries of `range` down to element level.
pub fn split_range(doc: &mut Document, range: DomRange) -> DomRange {
    let mut end = split_position(doc, range.end);
    let start_parent = doc.parent(range.start.node);
    let start_index = doc.index_in_parent(range.start.node);
    let splits_start = doc.is_text(range.start.node)
        && range.start.offset > 0
        && range.start.offset < doc.len(range.start.node);
    let start = split_position(doc, range.start);
    if splits_start
        && let (Some(parent), Some(index)) = (start_parent, start_index)
        && end.node == parent
        && end.offset > index
    {
        end.offset += 1;
    }
    DomRange::new(start, end)
}

/// Remove everything inside the range; returns the collapsed position left behind.
pub fn delete_contents(doc: &mut Document, range: DomRange) -> DomPosition {
    if range.is_collapsed() {
        return range.start;
    }
    if range.start.node == range.end.node
        && let Some(text) = doc.text(range.start.node)
    {
        let chars: Vec<char> = text.chars().collect();
        let (from, to) = (range.start.offset.min(chars.len()), range.end.offset.min(chars.len()));
        let kept: String = chars[..from].iter().chain(&chars[to..]).collect();
        doc.set_text(range.start.node, kept);
        return range.start;
    }
    let split = split_range(doc, range);
    let scope = split.common_ancestor(doc);
    for node in split.top_contained_nodes(doc, scope) {
        doc.detach(node);
    }
    split.start
}

/// Insert `node` at `pos`; returns the position just after it.
pub fn insert_node_at(doc: &mut Document, pos: DomPosition, node: NodeId) -> DomPosition {
    let at = split_position(doc, pos);
    doc.insert_child(at.node, at.offset, node);
    DomPosition::after(doc, node)
}

/// Insert text at `pos`, merging into an adjacent text node where possible.
/// Returns the position just after the inserted text.
pub fn insert_text_at(doc: &mut Document, pos: DomPosition, text: &str) -> DomPosition {
    let added = text.chars().count();
    if doc.is_text(pos.node) {
        doc.insert_text(pos.node, pos.offset, text);
        return DomPosition::new(pos.node, pos.offset + added);
    }
    if pos.offset > 0
        && let Some(&prev) = doc.children(pos.node).get(pos.offset - 1)
        && doc.is_text(prev)
    {
        let len = doc.len(prev);
        doc.insert_text(prev, len, text);
        return DomPosition::new(prev, len + added);
    }
    let node = doc.create_text(text);
    doc.insert_child(pos.node, pos.offset, node);
    DomPosition::new(node, added)
}
