//! Browser layer for the quire editor core.
//!
//! The core owns the document model and every editing algorithm; this crate
//! only adapts browser objects to the core's capability traits. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `clipboard`: `ClipboardSource` over a paste event's `DataTransfer`
//! - `events`: `EventSink` that re-dispatches editor events as DOM events,
//!   and keydown decoding for shortcut lookup
//! - `locale`: writing direction from the host document
//! - `platform`: Browser/OS detection for the macOS shortcut mapping
//!
//! # Re-exports
//!
//! This crate re-exports `quire-editor-core` for convenience, so consumers
//! only need to depend on `quire-editor-browser`.

// Re-export core crate
pub use quire_editor_core;
pub use quire_editor_core::*;

pub mod clipboard;
pub mod events;
pub mod locale;
pub mod platform;

pub use clipboard::{BrowserClipboard, handle_paste};
pub use events::{DomEventSink, KeyPress, handle_keydown, key_press, with_platform_keys};
pub use locale::{DocumentLocale, direction_for_lang};
pub use platform::{Platform, platform};
