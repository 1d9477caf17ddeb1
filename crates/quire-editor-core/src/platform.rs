//! Platform abstraction traits for editor operations.
//!
//! The editor core never talks to a browser directly. Formatting primitives,
//! clipboard access, locale queries, notifications and UI chrome all come in
//! through the narrow traits below, each with a do-nothing `()` impl so hosts
//! only implement what they have.

use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId};
use crate::events::EditorEvent;
use crate::selection::Selection;
use crate::view::ViewState;

/// Writing direction of the surrounding document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// The editable surface a formatting primitive works on.
pub struct Surface<'a> {
    pub doc: &'a mut Document,
    pub root: NodeId,
    pub selection: &'a mut Selection,
}

/// Native text-formatting primitives (the `execCommand` family).
///
/// Implementations act on the surface's current selection. Unknown commands
/// are ignored and report `false`.
pub trait FormattingPlatform {
    /// Run `command` with an optional value. Returns whether the content changed.
    fn exec_command(&mut self, surface: &mut Surface<'_>, command: &str, value: Option<&str>)
    -> bool;

    /// Record an undo point before the caller mutates the surface itself.
    fn checkpoint(&mut self, surface: &Surface<'_>);

    /// Whether `command` is understood at all.
    fn supports_command(&self, command: &str) -> bool;
}

/// Clipboard contents offered to a paste.
pub trait ClipboardSource {
    /// Data for a MIME-like type such as `text/html` or `text/plain`.
    fn get_data(&self, format: &str) -> Option<String>;

    /// Legacy line-delimited plain text, for hosts without typed data.
    fn legacy_text(&self) -> Option<String> {
        None
    }
}

/// Receives editor notifications.
pub trait EventSink {
    fn emit(&mut self, event: &EditorEvent);
}

impl EventSink for () {
    fn emit(&mut self, _event: &EditorEvent) {}
}

/// Answers locale questions the editor cannot decide alone.
pub trait LocaleProvider {
    fn direction(&self) -> Direction;
}

impl LocaleProvider for () {
    fn direction(&self) -> Direction {
        Direction::Ltr
    }
}

impl LocaleProvider for Direction {
    fn direction(&self) -> Direction {
        *self
    }
}

/// Called with the current value after every debounced content change.
pub trait ValidationHook {
    fn validate(&mut self, value: &str);
}

impl ValidationHook for () {
    fn validate(&mut self, _value: &str) {}
}

/// Told whenever the dirty state flips.
pub trait DirtyHook {
    fn dirty_changed(&mut self, dirty: bool);
}

impl DirtyHook for () {
    fn dirty_changed(&mut self, _dirty: bool) {}
}

/// Toolbar and focus handling owned by the embedding UI.
pub trait EditorChrome {
    fn set_toolbar_enabled(&mut self, enabled: bool);

    /// Move keyboard focus to the surface of `view`.
    fn focus(&mut self, view: ViewState);
}

impl EditorChrome for () {
    fn set_toolbar_enabled(&mut self, _enabled: bool) {}

    fn focus(&mut self, _view: ViewState) {}
}

/// The capability set an editor is constructed with.
pub struct Capabilities {
    pub events: Box<dyn EventSink>,
    pub locale: Box<dyn LocaleProvider>,
    pub validation: Box<dyn ValidationHook>,
    pub dirty: Box<dyn DirtyHook>,
    pub chrome: Box<dyn EditorChrome>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            events: Box::new(()),
            locale: Box::new(()),
            validation: Box::new(()),
            dirty: Box::new(()),
            chrome: Box::new(()),
        }
    }
}

impl Capabilities {
    pub fn with_events(mut self, events: impl EventSink + 'static) -> Self {
        self.events = Box::new(events);
        self
    }

    pub fn with_locale(mut self, locale: impl LocaleProvider + 'static) -> Self {
        self.locale = Box::new(locale);
        self
    }

    pub fn with_validation(mut self, validation: impl ValidationHook + 'static) -> Self {
        self.validation = Box::new(validation);
        self
    }

    pub fn with_dirty(mut self, dirty: impl DirtyHook + 'static) -> Self {
        self.dirty = Box::new(dirty);
        self
    }

    pub fn with_chrome(mut self, chrome: impl EditorChrome + 'static) -> Self {
        self.chrome = Box::new(chrome);
        self
    }
}
