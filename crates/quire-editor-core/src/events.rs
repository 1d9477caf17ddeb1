//! Notifications and vetoable before-hooks.
//!
//! A before-hook sees the pending data and answers [`Veto::Allow`] or
//! [`Veto::Deny`]; the first deny wins and later hooks are not consulted.

use std::cell::RefCell;
use std::rc::Rc;

use crate::platform::EventSink;
use crate::view::ViewState;
use crate::workflow::WorkflowKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Veto {
    Allow,
    Deny,
}

impl From<bool> for Veto {
    fn from(allow: bool) -> Self {
        if allow { Veto::Allow } else { Veto::Deny }
    }
}

type Hook<T> = Box<dyn FnMut(&T) -> Veto>;

/// Ordered list of before-hooks for one kind of pending operation.
pub struct VetoHooks<T> {
    hooks: Vec<Hook<T>>,
}

impl<T> Default for VetoHooks<T> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<T> std::fmt::Debug for VetoHooks<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VetoHooks")
            .field("len", &self.hooks.len())
            .finish()
    }
}

impl<T> VetoHooks<T> {
    pub fn push(&mut self, hook: impl FnMut(&T) -> Veto + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Ask each hook in order, stopping at the first deny.
    pub fn check(&mut self, pending: &T) -> Veto {
        for hook in &mut self.hooks {
            if hook(pending) == Veto::Deny {
                return Veto::Deny;
            }
        }
        Veto::Allow
    }
}

/// Pending view switch handed to before-switch hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchRequest {
    /// Current value of the visible view.
    pub value: String,
    pub from: ViewState,
    pub to: ViewState,
}

/// Pending paste handed to before-paste hooks, already sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteRequest {
    pub value: String,
}

/// Notifications emitted to the [`EventSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    ModeEntered { view: ViewState, value: String },
    ModeRejected { view: ViewState, value: String },
    ViewChanged { view: ViewState },
    PasteApplied { value: String },
    PasteRejected { value: String },
    ContentChanged { value: String },
    WorkflowFailed { kind: WorkflowKind, message: String },
}

impl EditorEvent {
    /// Kebab-case event name, as a DOM host would dispatch it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ModeEntered { .. } => "mode-entered",
            Self::ModeRejected { .. } => "mode-rejected",
            Self::ViewChanged { .. } => "view-changed",
            Self::PasteApplied { .. } => "paste-applied",
            Self::PasteRejected { .. } => "paste-rejected",
            Self::ContentChanged { .. } => "content-changed",
            Self::WorkflowFailed { .. } => "workflow-failed",
        }
    }
}

/// Shared, clonable sink that records every event.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.borrow().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(EditorEvent::name).collect()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<EditorEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &EditorEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_deny_short_circuits() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut hooks: VetoHooks<PasteRequest> = VetoHooks::default();
        for (i, answer) in [Veto::Allow, Veto::Deny, Veto::Allow].into_iter().enumerate() {
            let calls = calls.clone();
            hooks.push(move |_| {
                calls.borrow_mut().push(i);
                answer
            });
        }
        let pending = PasteRequest {
            value: "x".to_string(),
        };
        assert_eq!(hooks.check(&pending), Veto::Deny);
        assert_eq!(*calls.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_empty_hooks_allow() {
        let mut hooks: VetoHooks<SwitchRequest> = VetoHooks::default();
        let pending = SwitchRequest {
            value: String::new(),
            from: ViewState::Editor,
            to: ViewState::Source,
        };
        assert_eq!(hooks.check(&pending), Veto::Allow);
        assert!(hooks.is_empty());
    }

    #[test]
    fn test_event_log_is_shared() {
        let log = EventLog::new();
        let mut sink = log.clone();
        sink.emit(&EditorEvent::ViewChanged {
            view: ViewState::Source,
        });
        assert_eq!(log.names(), vec!["view-changed"]);
        assert_eq!(log.drain().len(), 1);
        assert!(log.events().is_empty());
    }
}
