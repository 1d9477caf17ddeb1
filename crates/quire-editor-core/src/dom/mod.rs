//! Arena-backed document tree for the rendered view.
//!
//! The editor keeps its own small DOM rather than talking to a browser tree
//! directly. Nodes live in a flat arena and are addressed by [`NodeId`];
//! detached nodes stay in the arena (they are simply unreachable from the
//! root), so ids never dangle in the memory-safety sense. Callers that hold
//! ids across mutations should check [`Document::is_connected`].

use smol_str::SmolStr;

pub mod parse;
pub mod range;
mod serialize;
pub mod style;

pub use range::{DomPosition, DomRange};

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single attribute on an element. Values are stored decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: SmolStr,
    pub value: String,
}

/// Element payload: lower-cased tag name plus attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: SmolStr,
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: SmolStr::new(tag.to_ascii_lowercase()),
            attrs: Vec::new(),
        }
    }

    /// Look up an attribute value by (case-insensitive) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable node tree with a single element root (the editable surface).
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("div")
    }
}

impl Document {
    /// Create a document whose root is an empty element with the given tag.
    pub fn new(root_tag: &str) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.push(NodeData::Element(ElementData::new(root_tag)));
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // === Construction ===

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Comment(text.into()))
    }

    /// Copy an element's tag and attributes into a new, childless element.
    ///
    /// Text and comment nodes are copied with their content.
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let data = self.nodes[id.0].data.clone();
        self.push(data)
    }

    // === Inspection ===

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn has_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.text(id).is_some()
    }

    /// Node length in range terms: chars for character data, child count for elements.
    pub fn len(&self, id: NodeId) -> usize {
        match &self.nodes[id.0].data {
            NodeData::Element(_) => self.nodes[id.0].children.len(),
            NodeData::Text(t) | NodeData::Comment(t) => t.chars().count(),
        }
    }

    /// Ancestors of `id`, starting with `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    /// All descendants of `id` in document (pre-)order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether the node is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root, id)
    }

    /// Descendant elements of `scope` with the given tag, in document order.
    pub fn elements_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.has_tag(n, tag))
            .collect()
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match &self.nodes[id.0].data {
            NodeData::Text(t) => t.clone(),
            NodeData::Comment(_) => String::new(),
            NodeData::Element(_) => self
                .descendants(id)
                .into_iter()
                .filter_map(|n| self.text(n))
                .collect(),
        }
    }

    /// True when the subtree renders something: non-empty text or a void element.
    pub fn has_content(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.descendants(id))
            .any(|n| match &self.nodes[n.0].data {
                NodeData::Text(t) => !t.is_empty(),
                NodeData::Element(el) => parse::is_void_element(&el.tag),
                NodeData::Comment(_) => false,
            })
    }

    // === Tree mutation ===

    /// Remove a node from its parent. The node and its subtree stay in the arena.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` at `index` among `parent`'s children (clamped to the end).
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        let (Some(parent), Some(index)) = (self.parent(reference), self.index_in_parent(reference))
        else {
            return;
        };
        self.insert_child(parent, index, node);
    }

    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        let (Some(parent), Some(index)) = (self.parent(reference), self.index_in_parent(reference))
        else {
            return;
        };
        self.insert_child(parent, index + 1, node);
    }

    /// Replace an element with its children. Returns the moved children.
    pub fn unwrap_element(&mut self, id: NodeId) -> Vec<NodeId> {
        let (Some(parent), Some(index)) = (self.parent(id), self.index_in_parent(id)) else {
            return Vec::new();
        };
        let children = self.nodes[id.0].children.clone();
        for (offset, &child) in children.iter().enumerate() {
            self.insert_child(parent, index + offset, child);
        }
        self.detach(id);
        children
    }

    /// Wrap `node` in a new element with the given tag, returning the wrapper.
    pub fn wrap(&mut self, node: NodeId, tag: &str) -> NodeId {
        let wrapper = self.create_element(tag);
        self.insert_before(node, wrapper);
        self.append_child(wrapper, node);
        wrapper
    }

    /// Change an element's tag name in place, keeping attributes and children.
    pub fn rename_element(&mut self, id: NodeId, tag: &str) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                el.tag = SmolStr::new(tag.to_ascii_lowercase());
                true
            }
            None => false,
        }
    }

    /// Split a text node at a char offset; the tail becomes a new following sibling.
    ///
    /// Returns the new node, or `None` if `id` is not a text node or the offset
    /// is out of bounds.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Option<NodeId> {
        let text = self.text(id)?;
        let byte = char_to_byte(text, offset)?;
        let tail = text[byte..].to_string();
        if let NodeData::Text(t) = &mut self.nodes[id.0].data {
            t.truncate(byte);
        }
        let new = self.create_text(tail);
        if self.parent(id).is_some() {
            self.insert_after(id, new);
        }
        Some(new)
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let NodeData::Text(t) = &mut self.nodes[id.0].data {
            *t = text.into();
        }
    }

    /// Insert `text` into a text node at a char offset.
    pub fn insert_text(&mut self, id: NodeId, offset: usize, text: &str) -> bool {
        let NodeData::Text(t) = &mut self.nodes[id.0].data else {
            return false;
        };
        match char_to_byte(t, offset) {
            Some(byte) => {
                t.insert_str(byte, text);
                true
            }
            None => false,
        }
    }

    // === Attributes ===

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        let value = value.into();
        match el.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            Some(attr) => attr.value = value,
            None => el.attrs.push(Attribute {
                name: SmolStr::new(name.to_ascii_lowercase()),
                value,
            }),
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let el = self.element_mut(id)?;
        let index = el.attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(el.attrs.remove(index).value)
    }

    pub fn style_property(&self, id: NodeId, property: &str) -> Option<String> {
        let style = self.attr(id, "style")?;
        style::parse_declarations(style)
            .into_iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v)
    }

    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        let mut decls = self
            .attr(id, "style")
            .map(style::parse_declarations)
            .unwrap_or_default();
        match decls.iter_mut().find(|(p, _)| p.eq_ignore_ascii_case(property)) {
            Some(decl) => decl.1 = value.to_string(),
            None => decls.push((property.to_ascii_lowercase(), value.to_string())),
        }
        self.set_attr(id, "style", style::serialize_declarations(&decls));
    }

    /// Remove one inline style property; drops the `style` attribute once empty.
    pub fn remove_style_property(&mut self, id: NodeId, property: &str) {
        let Some(style) = self.attr(id, "style") else {
            return;
        };
        let mut decls = style::parse_declarations(style);
        let before = decls.len();
        decls.retain(|(p, _)| !p.eq_ignore_ascii_case(property));
        if decls.len() == before {
            return;
        }
        if decls.is_empty() {
            self.remove_attr(id, "style");
        } else {
            self.set_attr(id, "style", style::serialize_declarations(&decls));
        }
    }

    // === Markup ===

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            serialize::write_node(self, child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        serialize::write_node(self, id, &mut out);
        out
    }

    /// Parse `html` and make the result the only children of `id`.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        for child in self.children(id).to_vec() {
            self.detach(child);
        }
        for node in parse::parse_fragment(self, html) {
            self.append_child(id, node);
        }
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Byte index of a char offset; `None` past the end.
pub(crate) fn char_to_byte(text: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    match text.char_indices().nth(offset) {
        Some((byte, _)) => Some(byte),
        None if text.chars().count() == offset => Some(text.len()),
        None => None,
    }
}
