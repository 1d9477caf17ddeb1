//! quire-editor-core: rich-text editing logic without browser dependencies.
//!
//! This crate provides:
//! - `dom` - arena document, fragment parser, serializer and ranges
//! - `Selection` - multi-range selection with save/restore and block queries
//! - `sanitize` - paste cleanup for word-processor and generic markup
//! - `format` - indentation formatter for the source view
//! - `CommandDispatcher` - toolbar and shortcut actions
//! - `Editor` - rendered/source views, paste, dialogs, change tracking
//! - `FormattingPlatform` and capability traits, with `MemoryHost` as the
//!   in-memory formatting host

pub mod actions;
pub mod color;
pub mod config;
pub mod debounce;
pub mod dispatch;
pub mod dom;
pub mod editor;
pub mod error;
pub mod events;
pub mod format;
pub mod host;
pub mod paste;
pub mod platform;
pub mod sanitize;
pub mod selection;
pub mod styling;
pub mod undo;
pub mod view;
pub mod workflow;

pub use actions::{ActionKind, ActionTable, EditorAction, KeyCombo, Modifiers};
pub use config::EditorConfig;
pub use debounce::{Debouncer, TimerHandle};
pub use dispatch::{ColorRequest, CommandDispatcher, Dispatch, EditContext};
pub use dom::{Document, DomPosition, DomRange, NodeId};
pub use editor::Editor;
pub use error::{ConfigError, EditorError, Result, Vetoed, WorkflowError};
pub use events::{EditorEvent, EventLog, PasteRequest, SwitchRequest, Veto};
pub use host::MemoryHost;
pub use paste::MemoryClipboard;
pub use platform::{
    Capabilities, ClipboardSource, Direction, DirtyHook, EditorChrome, EventSink,
    FormattingPlatform, LocaleProvider, Surface, ValidationHook,
};
pub use sanitize::{encode_entities, normalize_for_comparison, sanitize};
pub use selection::{Selection, SelectionSnapshot};
pub use smol_str::SmolStr;
pub use undo::{History, UndoManager};
pub use view::{SourceBuffer, ViewState};
pub use workflow::{DialogFields, DialogState, ImageFields, LinkFields, WorkflowKind};
