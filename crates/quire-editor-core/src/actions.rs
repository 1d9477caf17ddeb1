//! Editor actions and keyboard shortcuts.
//!
//! The action table maps toolbar action names to the command they run, an
//! optional default value and an optional shortcut. It is built once and
//! shared; callers copy an entry and override its value per invocation.

use std::collections::BTreeMap;
use std::fmt;

use smol_str::SmolStr;

use crate::workflow::WorkflowKind;

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        alt: false,
        shift: true,
        meta: false,
    };

    /// Fold Cmd into Ctrl on Mac so `ctrlKey` shortcuts answer to either.
    fn for_platform(self, is_mac: bool) -> Self {
        if is_mac {
            Self {
                ctrl: self.ctrl || self.meta,
                meta: false,
                ..self
            }
        } else {
            self
        }
    }
}

/// A key combination for triggering an action, written `code|modifier*`
/// (for example `KeyB|ctrlKey`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: SmolStr,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(code: impl Into<SmolStr>, modifiers: Modifiers) -> Self {
        Self {
            code: code.into(),
            modifiers,
        }
    }

    /// Parse a `keyid` string. Unknown modifier names make the whole id invalid.
    pub fn parse(keyid: &str) -> Option<Self> {
        let mut parts = keyid.split('|');
        let code = parts.next().filter(|c| !c.is_empty())?;
        let mut modifiers = Modifiers::NONE;
        for part in parts {
            match part {
                "ctrlKey" => modifiers.ctrl = true,
                "altKey" => modifiers.alt = true,
                "shiftKey" => modifiers.shift = true,
                "metaKey" => modifiers.meta = true,
                _ => return None,
            }
        }
        Some(Self::new(code, modifiers))
    }

    /// Whether a key event with `code` and `pressed` modifiers triggers this combo.
    pub fn matches(&self, code: &str, pressed: Modifiers, is_mac: bool) -> bool {
        self.code == code && self.modifiers.for_platform(is_mac) == pressed.for_platform(is_mac)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)?;
        for (on, name) in [
            (self.modifiers.ctrl, "ctrlKey"),
            (self.modifiers.alt, "altKey"),
            (self.modifiers.shift, "shiftKey"),
            (self.modifiers.meta, "metaKey"),
        ] {
            if on {
                write!(f, "|{name}")?;
            }
        }
        Ok(())
    }
}

/// One entry of the action table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorAction {
    /// Command run for this action.
    pub action: SmolStr,
    /// Default value; an explicit value at dispatch time replaces it.
    pub value: Option<SmolStr>,
    pub keyid: Option<KeyCombo>,
}

impl EditorAction {
    pub fn new(action: &str) -> Self {
        Self {
            action: SmolStr::new(action),
            value: None,
            keyid: None,
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(SmolStr::new(value));
        self
    }

    /// Attach a shortcut; an unparsable id leaves the action without one.
    pub fn with_keyid(mut self, keyid: &str) -> Self {
        self.keyid = KeyCombo::parse(keyid);
        self
    }

    pub fn kind(&self) -> ActionKind {
        ActionKind::of(&self.action)
    }
}

/// Text alignment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ordered => "ol",
            Self::Unordered => "ul",
        }
    }

    pub fn command(self) -> &'static str {
        match self {
            Self::Ordered => "insertOrderedList",
            Self::Unordered => "insertUnorderedList",
        }
    }
}

/// How the dispatcher handles a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    ModeSwitch,
    FormatBlock,
    Align(Alignment),
    Color,
    List(ListKind),
    Workflow(WorkflowKind),
    Native,
}

impl ActionKind {
    pub fn of(command: &str) -> Self {
        match command {
            "mode" => Self::ModeSwitch,
            "formatBlock" => Self::FormatBlock,
            "justifyLeft" => Self::Align(Alignment::Left),
            "justifyCenter" => Self::Align(Alignment::Center),
            "justifyRight" => Self::Align(Alignment::Right),
            "justifyFull" => Self::Align(Alignment::Justify),
            "foreColor" | "backColor" => Self::Color,
            "insertOrderedList" => Self::List(ListKind::Ordered),
            "insertUnorderedList" => Self::List(ListKind::Unordered),
            "createLink" => Self::Workflow(WorkflowKind::Hyperlink),
            "insertImage" => Self::Workflow(WorkflowKind::InsertImage),
            _ => Self::Native,
        }
    }
}

/// Immutable name → action map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTable {
    entries: BTreeMap<SmolStr, EditorAction>,
}

impl Default for ActionTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        let mut add = |name: &str, action: EditorAction| {
            entries.insert(SmolStr::new(name), action);
        };
        add("bold", EditorAction::new("bold").with_keyid("KeyB|ctrlKey"));
        add("italic", EditorAction::new("italic").with_keyid("KeyI|ctrlKey"));
        add("underline", EditorAction::new("underline").with_keyid("KeyU|ctrlKey"));
        add("strikethrough", EditorAction::new("strikeThrough"));
        add("subscript", EditorAction::new("subscript"));
        add("superscript", EditorAction::new("superscript"));
        add("removeformat", EditorAction::new("removeFormat"));
        add("forecolor", EditorAction::new("foreColor").with_value("#000000"));
        add("backcolor", EditorAction::new("backColor").with_value("#ffffff"));
        add("alignleft", EditorAction::new("justifyLeft"));
        add("aligncenter", EditorAction::new("justifyCenter"));
        add("alignright", EditorAction::new("justifyRight"));
        add("alignjustify", EditorAction::new("justifyFull"));
        add("orderedlist", EditorAction::new("insertOrderedList"));
        add("unorderedlist", EditorAction::new("insertUnorderedList"));
        add("indent", EditorAction::new("indent"));
        add("outdent", EditorAction::new("outdent"));
        add("blockquote", EditorAction::new("formatBlock").with_value("blockquote"));
        for heading in ["h1", "h2", "h3", "h4", "h5", "h6", "p", "pre"] {
            add(heading, EditorAction::new("formatBlock").with_value(heading));
        }
        add("hyperlink", EditorAction::new("createLink"));
        add("unlink", EditorAction::new("unlink"));
        add("insertimage", EditorAction::new("insertImage"));
        add("horizontalrule", EditorAction::new("insertHorizontalRule"));
        add("undo", EditorAction::new("undo").with_keyid("KeyZ|ctrlKey"));
        add("redo", EditorAction::new("redo").with_keyid("KeyY|ctrlKey"));
        add("mode", EditorAction::new("mode"));
        Self { entries }
    }
}

impl ActionTable {
    /// An empty table, for hosts that register every action themselves.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Copy of the table with one entry added or replaced.
    pub fn with_entry(mut self, name: &str, action: EditorAction) -> Self {
        self.entries.insert(SmolStr::new(name), action);
        self
    }

    pub fn get(&self, name: &str) -> Option<&EditorAction> {
        self.entries.get(name)
    }

    /// Copy the entry for `name`, replacing its value with `explicit` when given.
    pub fn resolve(&self, name: &str, explicit: Option<&str>) -> Option<EditorAction> {
        let mut action = self.entries.get(name)?.clone();
        if let Some(value) = explicit {
            action.value = Some(SmolStr::new(value));
        }
        Some(action)
    }

    /// Action name bound to a key event, if any.
    pub fn find_by_key(&self, code: &str, pressed: Modifiers, is_mac: bool) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, action)| {
                action
                    .keyid
                    .as_ref()
                    .is_some_and(|combo| combo.matches(code, pressed, is_mac))
            })
            .map(|(name, _)| name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(SmolStr::as_str)
    }
}
