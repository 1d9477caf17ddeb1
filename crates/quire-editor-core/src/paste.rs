//! Paste handling.
//!
//! Rich clipboard data is sanitized; plain text is escaped and its line
//! breaks become `<br>`. Before-paste hooks see the final markup and can
//! refuse it.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::Editor;
use crate::dom::DomPosition;
use crate::error::Vetoed;
use crate::events::{EditorEvent, PasteRequest, Veto};
use crate::platform::{ClipboardSource, FormattingPlatform};
use crate::sanitize::{encode_entities, sanitize};
use crate::styling::{apply_styling, remove_styling};
use crate::view::ViewState;

static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Clipboard contents held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    pub html: Option<String>,
    pub text: Option<String>,
    pub legacy: Option<String>,
}

impl MemoryClipboard {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

impl ClipboardSource for MemoryClipboard {
    fn get_data(&self, format: &str) -> Option<String> {
        match format {
            "text/html" => self.html.clone(),
            "text/plain" => self.text.clone(),
            _ => None,
        }
    }

    fn legacy_text(&self) -> Option<String> {
        self.legacy.clone()
    }
}

/// Escape plain text and turn its line breaks into `<br>`.
pub fn plain_text_to_html(text: &str) -> String {
    LINE_BREAK_RE
        .replace_all(&encode_entities(text), "<br>")
        .into_owned()
}

/// Markup a paste of `clipboard` would insert, before any hook runs.
pub fn clipboard_markup(clipboard: &dyn ClipboardSource) -> Option<String> {
    let non_empty = |s: String| (!s.is_empty()).then_some(s);
    if let Some(html) = clipboard.get_data("text/html").and_then(non_empty) {
        trace!(len = html.len(), "pasting rich content");
        return Some(sanitize(&html));
    }
    clipboard
        .get_data("text/plain")
        .and_then(non_empty)
        .or_else(|| clipboard.legacy_text().and_then(non_empty))
        .map(|text| plain_text_to_html(&text))
}

impl<P: FormattingPlatform> Editor<P> {
    /// Paste clipboard contents at the selection.
    ///
    /// Returns the inserted markup, or `None` when there was nothing to paste
    /// or the source view is showing.
    pub fn paste(&mut self, clipboard: &dyn ClipboardSource) -> Result<Option<String>, Vetoed> {
        if self.view == ViewState::Source {
            return Ok(None);
        }
        let Some(markup) = clipboard_markup(clipboard) else {
            return Ok(None);
        };
        let markup = markup.trim().to_owned();
        if markup.is_empty() {
            debug!("paste sanitized to nothing");
            return Ok(None);
        }

        let request = PasteRequest {
            value: markup.clone(),
        };
        if self.before_paste.check(&request) == Veto::Deny {
            self.emit(EditorEvent::PasteRejected { value: markup });
            return Err(Vetoed::Paste);
        }

        self.selection.retain_valid(&self.doc);
        if self.selection.range_count() == 0 {
            let end = self.doc.len(self.root);
            self.selection.collapse(DomPosition::new(self.root, end));
        }
        remove_styling(&mut self.doc, self.root);
        self.exec_native("insertHTML", Some(&markup));
        apply_styling(&mut self.doc, self.root);
        self.emit(EditorEvent::PasteApplied {
            value: markup.clone(),
        });
        self.content_edited();
        Ok(Some(markup))
    }
}
