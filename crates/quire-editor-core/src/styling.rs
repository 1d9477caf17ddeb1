//! Structural styling applied to content while it is shown in the rendered view.
//!
//! The first paragraph loses its top margin and block quotes get a left
//! rule. Properties the content already sets are left alone. Leaving the
//! rendered view strips the applied values again so the styling never
//! reaches the source text.

use crate::dom::{Document, NodeId};

const BLOCKQUOTE_STYLE: &[(&str, &str)] = &[
    ("border-left", "2px solid #ccc"),
    ("margin", "0 0 0 0.8ex"),
    ("padding-left", "1ex"),
];

/// (Re)apply structural styling under `root`.
pub fn apply_styling(doc: &mut Document, root: NodeId) {
    if let Some(first) = doc.first_child(root)
        && doc.has_tag(first, "p")
    {
        apply_unless_authored(doc, first, "margin-top", "0");
    }
    for quote in doc.elements_by_tag(root, "blockquote") {
        for (property, value) in BLOCKQUOTE_STYLE {
            apply_unless_authored(doc, quote, property, value);
        }
    }
}

fn apply_unless_authored(doc: &mut Document, id: NodeId, property: &str, value: &str) {
    if doc.style_property(id, property).is_none() {
        doc.set_style_property(id, property, value);
    }
}

/// Remove what [`apply_styling`] added. Only declarations carrying the
/// exact applied values go; anything else was authored.
pub fn remove_styling(doc: &mut Document, root: NodeId) {
    if let Some(first) = doc.first_child(root)
        && doc.has_tag(first, "p")
    {
        remove_if_applied(doc, first, "margin-top", "0");
    }
    for quote in doc.elements_by_tag(root, "blockquote") {
        for (property, value) in BLOCKQUOTE_STYLE {
            remove_if_applied(doc, quote, property, value);
        }
    }
}

fn remove_if_applied(doc: &mut Document, id: NodeId, property: &str, applied: &str) {
    if doc.style_property(id, property).as_deref() == Some(applied) {
        doc.remove_style_property(id, property);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_and_remove_round_trip() {
        let mut doc = Document::default();
        let root = doc.root();
        let html = "<p>a</p><blockquote><p>q</p></blockquote><p style=\"color: red;\">b</p>";
        doc.set_inner_html(root, html);

        apply_styling(&mut doc, root);
        assert_eq!(
            doc.inner_html(root),
            "<p style=\"margin-top: 0;\">a</p>\
             <blockquote style=\"border-left: 2px solid #ccc; margin: 0 0 0 0.8ex; padding-left: 1ex;\"><p>q</p></blockquote>\
             <p style=\"color: red;\">b</p>"
        );

        apply_styling(&mut doc, root);
        remove_styling(&mut doc, root);
        assert_eq!(doc.inner_html(root), html);
    }

    #[test]
    fn test_authored_margins_survive_removal() {
        let mut doc = Document::default();
        let root = doc.root();
        let html = "<p style=\"margin-top: 2em;\">a</p><p style=\"margin-top: 12px;\">b</p>\
                    <blockquote style=\"margin: 1em;\"><p>q</p></blockquote>";
        doc.set_inner_html(root, html);

        remove_styling(&mut doc, root);
        assert_eq!(doc.inner_html(root), html);

        apply_styling(&mut doc, root);
        let quote = doc.elements_by_tag(root, "blockquote")[0];
        assert_eq!(doc.style_property(quote, "margin").as_deref(), Some("1em"));
        assert_eq!(doc.style_property(quote, "padding-left").as_deref(), Some("1ex"));

        remove_styling(&mut doc, root);
        assert_eq!(doc.inner_html(root), html);
    }

    #[test]
    fn test_first_child_not_paragraph() {
        let mut doc = Document::default();
        let root = doc.root();
        doc.set_inner_html(root, "<h1>t</h1><p>a</p>");
        apply_styling(&mut doc, root);
        assert_eq!(doc.inner_html(root), "<h1>t</h1><p>a</p>");
    }
}
