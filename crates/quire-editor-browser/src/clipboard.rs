//! Browser clipboard implementation.
//!
//! Implements `ClipboardSource` for browser environments using the
//! ClipboardEvent's DataTransfer, with `window.clipboardData` as the legacy
//! plain-text path for engines that never exposed typed data.

use js_sys::{Function, Reflect};
use quire_editor_core::{ClipboardSource, Editor, FormattingPlatform, ViewState};
use wasm_bindgen::{JsCast, JsValue};

/// Browser clipboard context wrapping a ClipboardEvent's DataTransfer.
///
/// Created from a paste event to provide sync clipboard access.
pub struct BrowserClipboard {
    data_transfer: Option<web_sys::DataTransfer>,
}

impl BrowserClipboard {
    /// Create from a ClipboardEvent.
    ///
    /// Call this in your paste event handler.
    pub fn from_event(evt: &web_sys::ClipboardEvent) -> Self {
        Self {
            data_transfer: evt.clipboard_data(),
        }
    }

    /// Create an empty clipboard context (for testing or non-event contexts).
    pub fn empty() -> Self {
        Self {
            data_transfer: None,
        }
    }
}

impl ClipboardSource for BrowserClipboard {
    fn get_data(&self, format: &str) -> Option<String> {
        let dt = self.data_transfer.as_ref()?;
        match dt.get_data(format) {
            Ok(data) => Some(data).filter(|s| !s.is_empty()),
            Err(e) => {
                tracing::debug!("Clipboard read of {format} failed: {:?}", e);
                None
            }
        }
    }

    fn legacy_text(&self) -> Option<String> {
        let window = web_sys::window()?;
        legacy_clipboard_text(window.as_ref())
    }
}

/// Read `clipboardData.getData("Text")` off an object exposing the old
/// IE-style clipboard, if it has one.
pub fn legacy_clipboard_text(target: &JsValue) -> Option<String> {
    let data = Reflect::get(target, &JsValue::from_str("clipboardData")).ok()?;
    if data.is_undefined() || data.is_null() {
        return None;
    }
    let get_data = Reflect::get(&data, &JsValue::from_str("getData"))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    match get_data.call1(&data, &JsValue::from_str("Text")) {
        Ok(text) => text.as_string().filter(|s| !s.is_empty()),
        Err(e) => {
            tracing::warn!("Legacy clipboard read failed: {:?}", e);
            None
        }
    }
}

/// Handle a paste event on the rendered view.
///
/// The browser's own paste is cancelled and the editor inserts the sanitized
/// content instead. In the source view the event is left alone so the text
/// area behaves normally.
pub fn handle_paste<P: FormattingPlatform>(evt: &web_sys::ClipboardEvent, editor: &mut Editor<P>) {
    if editor.view() == ViewState::Source {
        return;
    }
    evt.prevent_default();
    let clipboard = BrowserClipboard::from_event(evt);
    match editor.paste(&clipboard) {
        Ok(Some(markup)) => tracing::debug!("[PASTE] inserted {} bytes", markup.len()),
        Ok(None) => {}
        Err(vetoed) => tracing::debug!("[PASTE] {vetoed}"),
    }
}
