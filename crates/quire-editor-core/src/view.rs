//! Rendered and source views, and switching between them.
//!
//! Leaving the rendered view strips structural styling and writes the
//! normalized markup into the source buffer. Leaving the source view
//! sanitizes the text and only rewrites the document when the result differs
//! from what is already there, so a round trip without edits keeps node
//! identity and the selection.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use web_time::Instant;

use crate::Editor;
use crate::dom::DomPosition;
use crate::error::Vetoed;
use crate::events::{EditorEvent, SwitchRequest, Veto};
use crate::format;
use crate::platform::FormattingPlatform;
use crate::sanitize::{normalize_for_comparison, sanitize};
use crate::styling::{apply_styling, remove_styling};

/// Which view is visible and authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Editor,
    Source,
}

impl ViewState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Editor => Self::Source,
            Self::Source => Self::Editor,
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Editor => "editor",
            Self::Source => "source",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownView(pub String);

impl fmt::Display for UnknownView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown view `{}`", self.0)
    }
}

impl std::error::Error for UnknownView {}

impl FromStr for ViewState {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "editor" | "wysiwyg" => Ok(Self::Editor),
            "source" | "html" => Ok(Self::Source),
            _ => Err(UnknownView(s.to_owned())),
        }
    }
}

/// Line break plus indentation inserted by the pretty printer.
static PRETTY_INDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*").unwrap());

/// Text of the source view plus its line-number gutter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    pub text: String,
    gutter: Vec<usize>,
    /// Text last written from the document.
    generated: String,
}

impl Default for SourceBuffer {
    fn default() -> Self {
        Self {
            text: String::new(),
            gutter: vec![1],
            generated: String::new(),
        }
    }
}

impl SourceBuffer {
    /// Write text generated from the document.
    pub fn load(&mut self, text: String) -> bool {
        self.generated.clone_from(&text);
        self.set_text(text)
    }

    /// Whether the text is still exactly what [`load`](Self::load) wrote.
    pub fn is_generated(&self) -> bool {
        self.text == self.generated
    }

    /// Replace the text if it differs. Returns whether anything changed.
    pub fn set_text(&mut self, text: String) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text;
        self.resize_gutter();
        true
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count().max(1)
    }

    /// Line numbers, one per line of text.
    pub fn gutter(&self) -> &[usize] {
        &self.gutter
    }

    /// Grow or shrink the gutter to match the text.
    pub fn resize_gutter(&mut self) {
        let lines = self.line_count();
        if self.gutter.len() > lines {
            self.gutter.truncate(lines);
        } else {
            let next = self.gutter.len() + 1;
            self.gutter.extend(next..=lines);
        }
    }
}

impl<P: FormattingPlatform> Editor<P> {
    pub fn source_text(&self) -> &str {
        &self.source.text
    }

    pub fn source(&self) -> &SourceBuffer {
        &self.source
    }

    /// The user edited the source text.
    pub fn set_source_text(&mut self, text: impl Into<String>) {
        if self.source.set_text(text.into()) {
            self.content_edited();
        }
    }

    /// Switch to `target`, asking the before-switch hooks first.
    pub fn switch_view(&mut self, target: ViewState) -> Result<ViewState, Vetoed> {
        let from = self.view;
        if target == from {
            return Ok(target);
        }
        let value = self.value();
        let request = SwitchRequest {
            value: value.clone(),
            from,
            to: target,
        };
        if self.before_switch.check(&request) == Veto::Deny {
            debug!(%from, to = %target, "view switch vetoed");
            self.emit(EditorEvent::ModeRejected { view: from, value });
            return Err(Vetoed::ViewSwitch { from, to: target });
        }

        match target {
            ViewState::Source => self.enter_source(),
            ViewState::Editor => self.enter_editor(),
        }
        self.view = target;
        info!(view = %target, "view switched");
        self.emit(EditorEvent::ModeEntered {
            view: target,
            value: self.value(),
        });
        self.emit(EditorEvent::ViewChanged { view: target });
        self.cleanup_debounce.schedule(Instant::now(), value);
        Ok(target)
    }

    pub fn toggle_view(&mut self) -> Result<ViewState, Vetoed> {
        self.switch_view(self.view.toggled())
    }

    /// Source text for markup, honouring the pretty-print setting.
    pub(crate) fn source_text_for(&self, html: &str) -> String {
        let normalized = normalize_for_comparison(html);
        if self.config.pretty_print_source {
            format::format(&normalized)
        } else {
            normalized
        }
    }

    /// Source text as markup. Pretty-printer line breaks and indentation
    /// are layout only and never become text.
    pub(crate) fn source_markup(&self) -> Cow<'_, str> {
        if self.config.pretty_print_source {
            PRETTY_INDENT_RE.replace_all(&self.source.text, "")
        } else {
            Cow::Borrowed(&self.source.text)
        }
    }

    pub(crate) fn enter_source(&mut self) {
        remove_styling(&mut self.doc, self.root);
        let text = self.source_text_for(&self.doc.inner_html(self.root));
        self.source.load(text);
        self.source.resize_gutter();
        self.caps.chrome.set_toolbar_enabled(false);
        self.caps.chrome.focus(ViewState::Source);
    }

    pub(crate) fn enter_editor(&mut self) {
        if self.source.is_generated() {
            debug!("source unchanged, keeping document");
        } else {
            let cleaned = sanitize(&normalize_for_comparison(&self.source_markup()));
            let cleaned = cleaned.trim();
            let current = normalize_for_comparison(&self.doc.inner_html(self.root));
            if normalize_for_comparison(cleaned) != current {
                debug!("source edits applied to document");
                self.doc.set_inner_html(self.root, cleaned);
                self.selection.collapse(DomPosition::new(self.root, 0));
            }
        }
        apply_styling(&mut self.doc, self.root);
        self.caps.chrome.set_toolbar_enabled(true);
        self.caps.chrome.focus(ViewState::Editor);
    }
}
