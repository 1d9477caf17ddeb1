//! The editor: one editable root, its selection, and the views over it.

use std::sync::Arc;

use tracing::{debug, trace};
use web_time::Instant;

use crate::actions::{ActionKind, ActionTable, Modifiers};
use crate::config::EditorConfig;
use crate::debounce::Debouncer;
use crate::dispatch::{ColorRequest, CommandDispatcher, Dispatch, EditContext};
use crate::dom::{Document, DomPosition, NodeId};
use crate::events::{EditorEvent, PasteRequest, SwitchRequest, Veto, VetoHooks};
use crate::host::MemoryHost;
use crate::platform::{Capabilities, Direction, FormattingPlatform, Surface};
use crate::sanitize::normalize_for_comparison;
use crate::selection::{self, Selection, SelectionSnapshot};
use crate::styling::{apply_styling, remove_styling};
use crate::view::{SourceBuffer, ViewState};
use crate::workflow::ModalWorkflowState;

/// A rich-text editor over an in-memory document.
///
/// The rendered view edits `doc` under `root`; the source view edits the
/// text in a [`SourceBuffer`]. Only the visible view is authoritative.
pub struct Editor<P: FormattingPlatform = MemoryHost> {
    pub(crate) config: EditorConfig,
    pub(crate) doc: Document,
    pub(crate) root: NodeId,
    pub(crate) selection: Selection,
    pub(crate) platform: P,
    pub(crate) dispatcher: CommandDispatcher,
    pub(crate) view: ViewState,
    pub(crate) source: SourceBuffer,
    pub(crate) workflow: ModalWorkflowState,
    pub(crate) pending_color: Option<ColorRequest>,
    pub(crate) before_switch: VetoHooks<SwitchRequest>,
    pub(crate) before_paste: VetoHooks<PasteRequest>,
    pub(crate) caps: Capabilities,
    pub(crate) selection_debounce: Debouncer<()>,
    pub(crate) input_debounce: Debouncer<()>,
    /// Carries the value from before a view switch.
    pub(crate) cleanup_debounce: Debouncer<String>,
    pub(crate) last_selection: Option<SelectionSnapshot>,
    original_value: String,
    last_notified: String,
    dirty: bool,
    mac_keys: bool,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("view", &self.view)
            .field("dirty", &self.dirty)
            .field("value", &self.value())
            .finish_non_exhaustive()
    }
}

impl Editor<MemoryHost> {
    /// Editor backed by [`MemoryHost`] with no capabilities.
    pub fn in_memory(config: EditorConfig) -> Self {
        let host = MemoryHost::new(config.undo_depth);
        Self::new(config, host, Capabilities::default())
    }
}

impl<P: FormattingPlatform> Editor<P> {
    pub fn new(config: EditorConfig, platform: P, caps: Capabilities) -> Self {
        let doc = Document::default();
        let root = doc.root();
        let debounce = config.debounce;
        let mut editor = Self {
            dispatcher: CommandDispatcher::new(
                Arc::new(ActionTable::default()),
                &config.paragraph_separator,
                config.color_inputs,
            ),
            selection: Selection::new(config.multi_range_selection),
            workflow: ModalWorkflowState::new(config.link.clone(), config.image.clone()),
            selection_debounce: Debouncer::new(debounce.selection()),
            input_debounce: Debouncer::new(debounce.input()),
            cleanup_debounce: Debouncer::new(debounce.cleanup()),
            view: ViewState::Editor,
            source: SourceBuffer::default(),
            pending_color: None,
            before_switch: VetoHooks::default(),
            before_paste: VetoHooks::default(),
            last_selection: None,
            original_value: String::new(),
            last_notified: String::new(),
            dirty: false,
            mac_keys: false,
            config,
            doc,
            root,
            platform,
            caps,
        };
        if editor.config.initial_view == ViewState::Source {
            editor.enter_source();
            editor.view = ViewState::Source;
        }
        editor
    }

    /// Replace the action table, for hosts with custom toolbars.
    pub fn with_actions(mut self, actions: Arc<ActionTable>) -> Self {
        self.dispatcher.set_actions(actions);
        self
    }

    /// Treat Meta as the primary shortcut modifier.
    pub fn with_mac_keys(mut self, mac: bool) -> Self {
        self.mac_keys = mac;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Last selection captured by the selection-change debounce.
    pub fn last_selection(&self) -> Option<&SelectionSnapshot> {
        self.last_selection.as_ref()
    }

    pub fn direction(&self) -> Direction {
        self.config
            .direction
            .unwrap_or_else(|| self.caps.locale.direction())
    }

    /// Register a hook consulted before every view switch.
    pub fn on_before_switch(&mut self, hook: impl FnMut(&SwitchRequest) -> Veto + 'static) {
        self.before_switch.push(hook);
    }

    /// Register a hook consulted before every paste is inserted.
    pub fn on_before_paste(&mut self, hook: impl FnMut(&PasteRequest) -> Veto + 'static) {
        self.before_paste.push(hook);
    }

    /// Load content into both views. The value becomes the clean baseline.
    pub fn set_value(&mut self, html: &str) {
        self.doc.set_inner_html(self.root, html);
        apply_styling(&mut self.doc, self.root);
        self.selection.collapse(DomPosition::new(self.root, 0));
        self.source.load(self.source_text_for(html));
        let value = self.value();
        self.original_value = value.clone();
        self.last_notified = value;
        self.set_dirty(false);
        self.input_debounce.clear();
        self.cleanup_debounce.clear();
    }

    /// Normalized markup of the visible view.
    pub fn value(&self) -> String {
        match self.view {
            ViewState::Editor => {
                let mut doc = self.doc.clone();
                remove_styling(&mut doc, self.root);
                normalize_for_comparison(&doc.inner_html(self.root))
            }
            ViewState::Source => normalize_for_comparison(&self.source_markup()),
        }
    }

    /// Whether the value differs from the last loaded or saved one.
    pub fn is_dirty(&self) -> bool {
        self.value() != self.original_value
    }

    /// Make the current value the clean baseline.
    pub fn mark_clean(&mut self) {
        self.original_value = self.value();
        self.set_dirty(false);
    }

    /// Run the action bound to `name`.
    pub fn dispatch(&mut self, name: &str, value: Option<&str>) -> Dispatch {
        let Some(action) = self.dispatcher.actions().resolve(name, value) else {
            debug!(name, "unknown action");
            return Dispatch::Ignored;
        };
        match action.kind() {
            ActionKind::ModeSwitch => {
                let target = action
                    .value
                    .as_deref()
                    .and_then(|v| v.parse::<ViewState>().ok())
                    .unwrap_or_else(|| self.view.toggled());
                return match self.switch_view(target) {
                    Ok(view) => Dispatch::ViewSwitched(view),
                    Err(_) => Dispatch::Vetoed,
                };
            }
            _ if self.view == ViewState::Source => {
                trace!(name, "toolbar disabled in source view");
                return Dispatch::Ignored;
            }
            ActionKind::Workflow(kind) => {
                return match self.begin_workflow(kind) {
                    Ok(dialog) => Dispatch::OpenWorkflow(dialog),
                    Err(_) => Dispatch::Ignored,
                };
            }
            _ => {}
        }

        self.selection.retain_valid(&self.doc);
        let direction = self.direction();
        let mut ctx = EditContext {
            doc: &mut self.doc,
            root: self.root,
            selection: &mut self.selection,
            platform: &mut self.platform,
            direction,
        };
        let outcome = self.dispatcher.execute(&mut ctx, &action);
        match &outcome {
            Dispatch::Applied => self.content_edited(),
            Dispatch::PickColor(request) => self.pending_color = Some(request.clone()),
            _ => {}
        }
        outcome
    }

    /// Finish a colour action started by [`Dispatch::PickColor`].
    pub fn apply_color(&mut self, color: &str) -> Dispatch {
        let Some(request) = self.pending_color.take() else {
            return Dispatch::Ignored;
        };
        selection::restore(&mut self.selection, request.snapshot.as_ref());
        self.selection.retain_valid(&self.doc);
        remove_styling(&mut self.doc, self.root);
        let changed = self.exec_native(&request.command, Some(color));
        apply_styling(&mut self.doc, self.root);
        if changed {
            self.content_edited();
            Dispatch::Applied
        } else {
            Dispatch::Ignored
        }
    }

    /// Drop a colour action the user cancelled.
    pub fn cancel_color(&mut self) {
        self.pending_color = None;
    }

    /// Run the action bound to a key press, if any.
    pub fn handle_key(&mut self, code: &str, pressed: Modifiers) -> Dispatch {
        let name = self
            .dispatcher
            .actions()
            .find_by_key(code, pressed, self.mac_keys)
            .map(str::to_owned);
        match name {
            Some(name) => self.dispatch(&name, None),
            None => Dispatch::Ignored,
        }
    }

    /// The host's selection moved.
    pub fn on_selection_change(&mut self) {
        self.selection_debounce.schedule(Instant::now(), ());
    }

    /// The user typed into the visible view.
    pub fn on_input(&mut self) {
        self.content_edited();
    }

    /// Fire every debounced callback whose window has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.selection_debounce.poll(now).is_some() {
            self.capture_selection();
        }
        if self.input_debounce.poll(now).is_some() {
            self.notify_change();
        }
        if let Some(before) = self.cleanup_debounce.poll(now) {
            self.cleanup_after_switch(before);
        }
    }

    /// Fire every pending debounced callback now.
    pub fn flush(&mut self) {
        let far = Instant::now() + self.config.debounce.cleanup().max(self.config.debounce.input());
        self.tick(far + self.config.debounce.selection());
    }

    pub(crate) fn emit(&mut self, event: EditorEvent) {
        trace!(event = event.name(), "emit");
        self.caps.events.emit(&event);
    }

    pub(crate) fn exec_native(&mut self, command: &str, value: Option<&str>) -> bool {
        let mut surface = Surface {
            doc: &mut self.doc,
            root: self.root,
            selection: &mut self.selection,
        };
        self.platform.exec_command(&mut surface, command, value)
    }

    pub(crate) fn checkpoint(&mut self) {
        let surface = Surface {
            doc: &mut self.doc,
            root: self.root,
            selection: &mut self.selection,
        };
        self.platform.checkpoint(&surface);
    }

    /// Content changed; notify once the input window passes.
    pub(crate) fn content_edited(&mut self) {
        self.input_debounce.schedule(Instant::now(), ());
    }

    fn capture_selection(&mut self) {
        if let Some(snapshot) = selection::save(&self.selection)
            && snapshot
                .first_range()
                .is_some_and(|r| self.doc.is_inclusive_ancestor(self.root, r.start.node))
        {
            self.last_selection = Some(snapshot);
        }
    }

    fn cleanup_after_switch(&mut self, before: String) {
        if self.value() != before {
            self.notify_change();
        }
    }

    /// Emit a change notification if the value moved since the last one.
    pub(crate) fn notify_change(&mut self) {
        let value = self.value();
        if value == self.last_notified {
            return;
        }
        self.last_notified = value.clone();
        self.caps.validation.validate(&value);
        let dirty = value != self.original_value;
        self.emit(EditorEvent::ContentChanged { value });
        self.set_dirty(dirty);
    }

    fn set_dirty(&mut self, dirty: bool) {
        if self.dirty != dirty {
            self.dirty = dirty;
            self.caps.dirty.dirty_changed(dirty);
        }
    }
}
