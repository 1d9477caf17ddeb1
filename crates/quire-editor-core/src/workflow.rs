//! Hyperlink and image dialogs.
//!
//! A workflow is two calls with a dialog in between. `begin` captures the
//! selection and prefills the fields; `commit` puts the selection back and
//! applies the result. The editor keeps at most one dialog open.

use std::fmt;

use tracing::{debug, warn};

use crate::config::{ImageDefaults, LinkDefaults};
use crate::dom::{DomPosition, DomRange, NodeId};
use crate::error::WorkflowError;
use crate::events::EditorEvent;
use crate::platform::FormattingPlatform;
use crate::sanitize::encode_entities;
use crate::selection::{self, SelectionSnapshot};
use crate::styling::{apply_styling, remove_styling};
use crate::Editor;

/// Prefix of the temporary `href` used to find links created by a commit.
const LINK_SENTINEL: &str = "quire-link:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    Hyperlink,
    InsertImage,
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hyperlink => "hyperlink",
            Self::InsertImage => "insertimage",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFields {
    pub url: String,
    pub class: String,
    pub target: String,
    /// Mark the link `contenteditable="false"`.
    pub non_editable: bool,
    /// Unlink instead of updating. Only meaningful for an existing link.
    pub remove: bool,
}

impl From<&LinkDefaults> for LinkFields {
    fn from(defaults: &LinkDefaults) -> Self {
        Self {
            url: defaults.url.clone(),
            class: defaults.class.clone(),
            target: defaults.target.clone(),
            non_editable: defaults.non_editable,
            remove: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageFields {
    pub url: String,
    pub alt: String,
}

impl From<&ImageDefaults> for ImageFields {
    fn from(defaults: &ImageDefaults) -> Self {
        Self {
            url: defaults.url.clone(),
            alt: defaults.alt.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogFields {
    Link(LinkFields),
    Image(ImageFields),
}

impl DialogFields {
    pub fn kind(&self) -> WorkflowKind {
        match self {
            Self::Link(_) => WorkflowKind::Hyperlink,
            Self::Image(_) => WorkflowKind::InsertImage,
        }
    }
}

/// What a dialog is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogState {
    pub kind: WorkflowKind,
    pub fields: DialogFields,
    /// The selection is inside an existing link, so "remove" applies.
    pub removable: bool,
}

/// Captured while a dialog is open.
#[derive(Debug, Clone)]
struct BeforeShow {
    kind: WorkflowKind,
    snapshot: SelectionSnapshot,
    link: Option<NodeId>,
}

/// Dialog defaults and the state of the open dialog, if any.
#[derive(Debug, Clone, Default)]
pub struct ModalWorkflowState {
    link_defaults: LinkDefaults,
    image_defaults: ImageDefaults,
    before_show: Option<BeforeShow>,
    sentinel_counter: u64,
}

impl ModalWorkflowState {
    pub fn new(link_defaults: LinkDefaults, image_defaults: ImageDefaults) -> Self {
        Self {
            link_defaults,
            image_defaults,
            before_show: None,
            sentinel_counter: 0,
        }
    }

    /// Kind of the dialog currently open.
    pub fn open(&self) -> Option<WorkflowKind> {
        self.before_show.as_ref().map(|b| b.kind)
    }

    fn next_sentinel(&mut self) -> String {
        self.sentinel_counter += 1;
        format!("{LINK_SENTINEL}{}", self.sentinel_counter)
    }
}

impl<P: FormattingPlatform> Editor<P> {
    /// Capture the selection and prefill a dialog.
    pub fn begin_workflow(&mut self, kind: WorkflowKind) -> Result<DialogState, WorkflowError> {
        let snapshot = selection::save(&self.selection)
            .filter(|s| s.ranges().iter().any(|r| r.is_valid(&self.doc)))
            .filter(|s| {
                s.first_range()
                    .is_some_and(|r| self.doc.is_inclusive_ancestor(self.root, r.start.node))
            });
        let Some(snapshot) = snapshot else {
            let err = WorkflowError::NoSelection { kind };
            warn!(%kind, "workflow needs a selection");
            self.emit(EditorEvent::WorkflowFailed {
                kind,
                message: err.to_string(),
            });
            return Err(err);
        };

        let (fields, link) = match kind {
            WorkflowKind::Hyperlink => {
                let link =
                    selection::find_ancestor_by_tag(&self.doc, &self.selection, self.root, "a");
                let fields = match link {
                    Some(a) => LinkFields {
                        url: self.doc.attr(a, "href").unwrap_or_default().to_owned(),
                        class: self.doc.attr(a, "class").unwrap_or_default().to_owned(),
                        target: self.doc.attr(a, "target").unwrap_or_default().to_owned(),
                        non_editable: self
                            .doc
                            .attr(a, "contenteditable")
                            .is_some_and(|v| v.eq_ignore_ascii_case("false")),
                        remove: false,
                    },
                    None => LinkFields::from(&self.workflow.link_defaults),
                };
                (DialogFields::Link(fields), link)
            }
            WorkflowKind::InsertImage => (
                DialogFields::Image(ImageFields::from(&self.workflow.image_defaults)),
                None,
            ),
        };
        debug!(%kind, existing_link = link.is_some(), "dialog opened");
        self.workflow.before_show = Some(BeforeShow {
            kind,
            snapshot,
            link,
        });
        Ok(DialogState {
            kind,
            fields,
            removable: link.is_some(),
        })
    }

    /// Apply the dialog result and close it.
    pub fn commit_workflow(&mut self, fields: DialogFields) -> Result<(), WorkflowError> {
        let kind = fields.kind();
        let Some(before) = self.workflow.before_show.take() else {
            return Err(WorkflowError::NotStarted { kind });
        };
        if before.kind != kind {
            let expected = before.kind;
            self.workflow.before_show = Some(before);
            return Err(WorkflowError::FieldMismatch { kind: expected });
        }

        selection::restore(&mut self.selection, Some(&before.snapshot));
        self.selection.retain_valid(&self.doc);
        remove_styling(&mut self.doc, self.root);
        let changed = match fields {
            DialogFields::Link(link) => self.commit_link(before.link, link),
            DialogFields::Image(image) => self.commit_image(image),
        };
        apply_styling(&mut self.doc, self.root);
        if changed {
            self.content_edited();
        }
        Ok(())
    }

    /// Close the dialog without touching the content.
    pub fn cancel_workflow(&mut self) {
        if let Some(before) = self.workflow.before_show.take() {
            selection::restore(&mut self.selection, Some(&before.snapshot));
            self.selection.retain_valid(&self.doc);
        }
    }

    pub fn open_workflow(&self) -> Option<WorkflowKind> {
        self.workflow.open()
    }

    fn commit_link(&mut self, existing: Option<NodeId>, fields: LinkFields) -> bool {
        let existing = existing.filter(|&a| self.doc.is_connected(a) && self.doc.has_tag(a, "a"));
        match existing {
            None if fields.url.is_empty() => false,
            None => {
                let sentinel = self.workflow.next_sentinel();
                if !self.exec_native("createLink", Some(&sentinel)) {
                    return false;
                }
                for anchor in self.doc.elements_by_tag(self.root, "a") {
                    if self.doc.attr(anchor, "href") == Some(sentinel.as_str()) {
                        self.write_link_attributes(anchor, &fields);
                    }
                }
                true
            }
            Some(anchor) if fields.remove || fields.url.is_empty() => {
                self.checkpoint();
                self.doc.unwrap_element(anchor);
                self.selection.retain_valid(&self.doc);
                true
            }
            Some(anchor) => {
                self.checkpoint();
                self.write_link_attributes(anchor, &fields);
                true
            }
        }
    }

    fn write_link_attributes(&mut self, anchor: NodeId, fields: &LinkFields) {
        self.doc.set_attr(anchor, "href", fields.url.as_str());
        for (name, value) in [("class", &fields.class), ("target", &fields.target)] {
            if value.is_empty() {
                self.doc.remove_attr(anchor, name);
            } else {
                self.doc.set_attr(anchor, name, value.as_str());
            }
        }
        if fields.non_editable {
            self.doc.set_attr(anchor, "contenteditable", "false");
        } else {
            self.doc.remove_attr(anchor, "contenteditable");
        }
    }

    fn commit_image(&mut self, fields: ImageFields) -> bool {
        if fields.url.is_empty() {
            return false;
        }
        if self.selection.is_collapsed() {
            // Select a placeholder so the image replaces it.
            if !self.exec_native("insertText", Some(" ")) {
                return false;
            }
            if let Some(caret) = self.selection.anchor()
                && self.doc.is_text(caret.node)
                && caret.offset > 0
            {
                self.selection.set_range(DomRange::new(
                    DomPosition::new(caret.node, caret.offset - 1),
                    caret,
                ));
            }
        }
        if fields.alt.is_empty() {
            self.exec_native("insertImage", Some(&fields.url))
        } else {
            let html = format!(
                "<img src=\"{}\" alt=\"{}\">",
                encode_entities(&fields.url),
                encode_entities(&fields.alt)
            );
            self.exec_native("insertHTML", Some(&html))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::events::EventLog;
    use crate::platform::Capabilities;
    use crate::host::MemoryHost;

    fn editor_with(html: &str) -> (Editor, EventLog) {
        let log = EventLog::new();
        let mut editor = Editor::new(
            EditorConfig::default(),
            MemoryHost::default(),
            Capabilities::default().with_events(log.clone()),
        );
        editor.set_value(html);
        (editor, log)
    }

    fn select_text(editor: &mut Editor, content: &str, from: usize, to: usize) {
        let root = editor.root();
        let doc = editor.document();
        let node = doc
            .descendants(root)
            .into_iter()
            .find(|&n| doc.text(n) == Some(content))
            .unwrap();
        editor.selection_mut().set_range(DomRange::new(
            DomPosition::new(node, from),
            DomPosition::new(node, to),
        ));
    }

    #[test]
    fn test_begin_without_selection_fails() {
        let (mut editor, log) = editor_with("<p>a</p>");
        editor.selection_mut().remove_all_ranges();
        let err = editor.begin_workflow(WorkflowKind::Hyperlink).unwrap_err();
        assert_eq!(err, WorkflowError::NoSelection { kind: WorkflowKind::Hyperlink });
        assert_eq!(log.names(), vec!["workflow-failed"]);
        assert_eq!(editor.open_workflow(), None);
    }

    #[test]
    fn test_new_link_gets_all_attributes() {
        let (mut editor, _) = editor_with("<p>see docs</p>");
        select_text(&mut editor, "see docs", 4, 8);
        let dialog = editor.begin_workflow(WorkflowKind::Hyperlink).unwrap();
        assert!(!dialog.removable);
        editor
            .commit_workflow(DialogFields::Link(LinkFields {
                url: "https://example.org".into(),
                class: "ext".into(),
                target: "_blank".into(),
                non_editable: true,
                remove: false,
            }))
            .unwrap();
        assert_eq!(
            editor.value(),
            "<p>see <a href=\"https://example.org\" class=\"ext\" target=\"_blank\" contenteditable=\"false\">docs</a></p>\n"
        );
    }

    #[test]
    fn test_existing_link_prefills_and_updates() {
        let (mut editor, _) = editor_with("<p><a href=\"/old\" class=\"c\">x</a></p>");
        select_text(&mut editor, "x", 0, 1);
        let dialog = editor.begin_workflow(WorkflowKind::Hyperlink).unwrap();
        assert!(dialog.removable);
        let DialogFields::Link(mut fields) = dialog.fields else {
            panic!("expected link fields");
        };
        assert_eq!(fields.url, "/old");
        assert_eq!(fields.class, "c");
        fields.url = "/new".into();
        fields.class.clear();
        editor.commit_workflow(DialogFields::Link(fields)).unwrap();
        assert_eq!(editor.value(), "<p><a href=\"/new\">x</a></p>\n");
    }

    #[test]
    fn test_existing_link_removed() {
        let (mut editor, _) = editor_with("<p>a <a href=\"/x\">b</a></p>");
        select_text(&mut editor, "b", 1, 1);
        editor.begin_workflow(WorkflowKind::Hyperlink).unwrap();
        editor
            .commit_workflow(DialogFields::Link(LinkFields {
                url: "/x".into(),
                remove: true,
                ..Default::default()
            }))
            .unwrap();
        assert_eq!(editor.value(), "<p>a b</p>\n");
    }

    #[test]
    fn test_image_with_alt_replaces_placeholder() {
        let (mut editor, _) = editor_with("<p>ab</p>");
        select_text(&mut editor, "ab", 1, 1);
        editor.begin_workflow(WorkflowKind::InsertImage).unwrap();
        editor
            .commit_workflow(DialogFields::Image(ImageFields {
                url: "/i.png".into(),
                alt: "a \"pic\"".into(),
            }))
            .unwrap();
        assert_eq!(
            editor.value(),
            "<p>a<img src=\"/i.png\" alt=\"a &quot;pic&quot;\">b</p>\n"
        );
    }

    #[test]
    fn test_image_without_url_is_noop() {
        let (mut editor, _) = editor_with("<p>ab</p>");
        select_text(&mut editor, "ab", 1, 1);
        editor.begin_workflow(WorkflowKind::InsertImage).unwrap();
        editor
            .commit_workflow(DialogFields::Image(ImageFields::default()))
            .unwrap();
        assert_eq!(editor.value(), "<p>ab</p>\n");
        assert_eq!(editor.open_workflow(), None);
    }

    #[test]
    fn test_commit_without_begin() {
        let (mut editor, _) = editor_with("<p>ab</p>");
        let err = editor
            .commit_workflow(DialogFields::Image(ImageFields::default()))
            .unwrap_err();
        assert_eq!(err, WorkflowError::NotStarted { kind: WorkflowKind::InsertImage });
    }

    #[test]
    fn test_mismatched_fields_keep_dialog_open() {
        let (mut editor, _) = editor_with("<p>ab</p>");
        select_text(&mut editor, "ab", 0, 2);
        editor.begin_workflow(WorkflowKind::Hyperlink).unwrap();
        let err = editor
            .commit_workflow(DialogFields::Image(ImageFields::default()))
            .unwrap_err();
        assert_eq!(err, WorkflowError::FieldMismatch { kind: WorkflowKind::Hyperlink });
        assert_eq!(editor.open_workflow(), Some(WorkflowKind::Hyperlink));
        editor.cancel_workflow();
        assert_eq!(editor.open_workflow(), None);
    }
}
