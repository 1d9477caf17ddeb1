//! Browser event handling for the editor.
//!
//! Outgoing: editor notifications become `CustomEvent`s on a DOM target.
//! Incoming: keydown events are decoded into the code and modifier state the
//! core's shortcut table matches against.

use js_sys::{Object, Reflect};
use quire_editor_core::{Dispatch, Editor, EditorEvent, EventSink, FormattingPlatform, Modifiers};
use smol_str::SmolStr;
use wasm_bindgen::JsValue;

use crate::platform::platform;

// === Outgoing notifications ===

/// Dispatches every editor event as a `CustomEvent` on `target`.
///
/// The event type is the editor event's kebab-case name; its fields are
/// copied onto `detail` as plain strings.
pub struct DomEventSink {
    target: web_sys::EventTarget,
}

impl DomEventSink {
    pub fn new(target: impl Into<web_sys::EventTarget>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

/// Field/value pairs carried by an event's `detail`.
pub fn event_detail(event: &EditorEvent) -> Vec<(&'static str, String)> {
    match event {
        EditorEvent::ModeEntered { view, value } | EditorEvent::ModeRejected { view, value } => {
            vec![("view", view.to_string()), ("value", value.clone())]
        }
        EditorEvent::ViewChanged { view } => vec![("view", view.to_string())],
        EditorEvent::PasteApplied { value }
        | EditorEvent::PasteRejected { value }
        | EditorEvent::ContentChanged { value } => vec![("value", value.clone())],
        EditorEvent::WorkflowFailed { kind, message } => {
            vec![("kind", kind.to_string()), ("message", message.clone())]
        }
    }
}

impl EventSink for DomEventSink {
    fn emit(&mut self, event: &EditorEvent) {
        let detail = Object::new();
        for (key, value) in event_detail(event) {
            if let Err(e) = Reflect::set(&detail, &JsValue::from_str(key), &JsValue::from_str(&value))
            {
                tracing::warn!("Failed to build event detail: {:?}", e);
            }
        }
        let init = web_sys::CustomEventInit::new();
        init.set_detail(&detail);
        let dom_event = match web_sys::CustomEvent::new_with_event_init_dict(event.name(), &init) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Failed to create {} event: {:?}", event.name(), e);
                return;
            }
        };
        if let Err(e) = self.target.dispatch_event(&dom_event) {
            tracing::warn!("Failed to dispatch {}: {:?}", event.name(), e);
        }
    }
}

// === Incoming keys ===

/// A decoded keydown: physical key code plus held modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub code: SmolStr,
    pub modifiers: Modifiers,
}

/// Codes of keys that only modify other keys.
const MODIFIER_CODES: &[&str] = &[
    "ControlLeft",
    "ControlRight",
    "ShiftLeft",
    "ShiftRight",
    "AltLeft",
    "AltRight",
    "MetaLeft",
    "MetaRight",
    "OSLeft",
    "OSRight",
];

/// Decode raw keydown fields. Composition input and bare modifier presses
/// never trigger shortcuts.
pub fn decode_key(code: &str, modifiers: Modifiers, composing: bool) -> Option<KeyPress> {
    if composing || code.is_empty() || MODIFIER_CODES.contains(&code) {
        return None;
    }
    Some(KeyPress {
        code: SmolStr::new(code),
        modifiers,
    })
}

/// Decode a keydown event.
pub fn key_press(evt: &web_sys::KeyboardEvent) -> Option<KeyPress> {
    let modifiers = Modifiers {
        ctrl: evt.ctrl_key(),
        alt: evt.alt_key(),
        shift: evt.shift_key(),
        meta: evt.meta_key(),
    };
    decode_key(&evt.code(), modifiers, evt.is_composing())
}

/// Route a keydown to the editor's shortcut table.
///
/// The browser default is prevented only when a shortcut matched, so plain
/// typing is untouched.
pub fn handle_keydown<P: FormattingPlatform>(
    evt: &web_sys::KeyboardEvent,
    editor: &mut Editor<P>,
) -> Dispatch {
    let Some(press) = key_press(evt) else {
        return Dispatch::Ignored;
    };
    let result = editor.handle_key(&press.code, press.modifiers);
    if result != Dispatch::Ignored {
        evt.prevent_default();
    }
    result
}

/// Build an editor whose shortcuts follow this browser's platform.
pub fn with_platform_keys<P: FormattingPlatform>(editor: Editor<P>) -> Editor<P> {
    editor.with_mac_keys(platform().uses_command_key())
}
