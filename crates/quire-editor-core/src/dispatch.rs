//! Routes toolbar and keyboard actions to their handlers.
//!
//! Block formatting, alignment and list toggling are rewritten here so their
//! output does not depend on how a host's native command behaves. Everything
//! else goes straight to the [`FormattingPlatform`]. Mode switches and the
//! link/image dialogs are routed by [`crate::Editor`] before they get here.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use smol_str::SmolStr;
use tracing::{debug, instrument};

use crate::actions::{ActionKind, ActionTable, Alignment, EditorAction, ListKind};
use crate::color;
use crate::dom::{Document, DomPosition, DomRange, NodeId};
use crate::platform::{Direction, FormattingPlatform, Surface};
use crate::sanitize::rewrite::strip_tags;
use crate::selection::{self, Selection, SelectionSnapshot};
use crate::styling::{apply_styling, remove_styling};
use crate::view::ViewState;
use crate::workflow::DialogState;

static ANY_LIST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<(?:ul|ol)\b").unwrap());
static UL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<ul\b").unwrap());
static OL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<ol\b").unwrap());

/// Tags that may hold other blocks after a format-block rewrite.
const CONTAINER_BLOCKS: &[&str] = &["blockquote", "div"];

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Unknown action, no selection, or nothing to do.
    Ignored,
    /// The content was changed.
    Applied,
    ViewSwitched(ViewState),
    /// A before-switch hook denied the mode switch.
    Vetoed,
    /// A dialog should be shown with these fields.
    OpenWorkflow(DialogState),
    /// A colour input should be shown; finish with [`crate::Editor::apply_color`].
    PickColor(ColorRequest),
}

/// A colour action waiting for the user's choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRequest {
    /// `foreColor` or `backColor`.
    pub command: SmolStr,
    /// `#rrggbb` the colour input should start at.
    pub seed: String,
    /// Selection at the time the picker opened.
    pub snapshot: Option<SelectionSnapshot>,
}

/// Everything a dispatch needs from the editor, borrowed for one call.
pub struct EditContext<'a> {
    pub doc: &'a mut Document,
    pub root: NodeId,
    pub selection: &'a mut Selection,
    pub platform: &'a mut dyn FormattingPlatform,
    pub direction: Direction,
}

impl EditContext<'_> {
    pub fn surface(&mut self) -> Surface<'_> {
        Surface {
            doc: &mut *self.doc,
            root: self.root,
            selection: &mut *self.selection,
        }
    }

    /// Run a native command against the context's surface.
    pub fn exec(&mut self, command: &str, value: Option<&str>) -> bool {
        let mut surface = Surface {
            doc: &mut *self.doc,
            root: self.root,
            selection: &mut *self.selection,
        };
        self.platform.exec_command(&mut surface, command, value)
    }

    fn checkpoint(&mut self) {
        let surface = Surface {
            doc: &mut *self.doc,
            root: self.root,
            selection: &mut *self.selection,
        };
        self.platform.checkpoint(&surface);
    }
}

#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    actions: Arc<ActionTable>,
    paragraph_separator: SmolStr,
    color_inputs: bool,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(ActionTable::default()), "p", false)
    }
}

impl CommandDispatcher {
    pub fn new(actions: Arc<ActionTable>, paragraph_separator: &str, color_inputs: bool) -> Self {
        Self {
            actions,
            paragraph_separator: SmolStr::new(paragraph_separator.to_ascii_lowercase()),
            color_inputs,
        }
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    pub fn set_actions(&mut self, actions: Arc<ActionTable>) {
        self.actions = actions;
    }

    pub fn paragraph_separator(&self) -> &str {
        &self.paragraph_separator
    }

    /// Look up `name` and apply it to the context.
    pub fn dispatch(&self, ctx: &mut EditContext<'_>, name: &str, value: Option<&str>) -> Dispatch {
        match self.actions.resolve(name, value) {
            Some(action) => self.execute(ctx, &action),
            None => {
                debug!(name, "unknown action");
                Dispatch::Ignored
            }
        }
    }

    /// Apply an already resolved action.
    #[instrument(level = "debug", skip(self, ctx), fields(command = %action.action))]
    pub fn execute(&self, ctx: &mut EditContext<'_>, action: &EditorAction) -> Dispatch {
        if ctx.selection.range_count() == 0 {
            debug!("no selection");
            return Dispatch::Ignored;
        }
        let kind = action.kind();
        match kind {
            ActionKind::ModeSwitch | ActionKind::Workflow(_) => return Dispatch::Ignored,
            ActionKind::Color if self.color_inputs => {
                return Dispatch::PickColor(color_request(ctx, action));
            }
            _ => {}
        }

        let value = action.value.as_deref();
        remove_styling(ctx.doc, ctx.root);
        let outcome = match kind {
            ActionKind::FormatBlock => self.format_block(ctx, value.unwrap_or("p")),
            ActionKind::Align(alignment) => self.align(ctx, alignment),
            ActionKind::List(list) => self.toggle_list(ctx, list),
            _ => applied(ctx.exec(&action.action, value)),
        };
        apply_styling(ctx.doc, ctx.root);
        outcome
    }

    fn format_block(&self, ctx: &mut EditContext<'_>, value: &str) -> Dispatch {
        let mut tag = value
            .trim_matches(|c: char| c == '<' || c == '>')
            .to_ascii_lowercase();
        if tag.is_empty() {
            return Dispatch::Ignored;
        }
        if tag == "blockquote"
            && selection::find_ancestor_by_tag(ctx.doc, ctx.selection, ctx.root, "blockquote")
                .is_some()
        {
            tag = self.paragraph_separator.to_string();
        }

        let blocks = selection::block_elements_in_selection(ctx.doc, ctx.selection, ctx.root);
        if blocks.is_empty() {
            return applied(ctx.exec("formatBlock", Some(&tag)));
        }
        ctx.checkpoint();
        let is_container = CONTAINER_BLOCKS.contains(&tag.as_str());
        for &block in &blocks {
            let holds_selected_block = blocks
                .iter()
                .any(|&other| other != block && ctx.doc.is_inclusive_ancestor(block, other));
            if holds_selected_block && !is_container {
                ctx.doc.unwrap_element(block);
            } else {
                ctx.doc.rename_element(block, &tag);
            }
        }
        ctx.selection.retain_valid(ctx.doc);
        if ctx.selection.range_count() == 0
            && let Some(&first) = blocks.iter().find(|&&b| ctx.doc.is_connected(b))
        {
            ctx.selection.collapse(DomPosition::new(first, 0));
        }
        Dispatch::Applied
    }

    fn align(&self, ctx: &mut EditContext<'_>, alignment: Alignment) -> Dispatch {
        let natural = match ctx.direction {
            Direction::Ltr => Alignment::Left,
            Direction::Rtl => Alignment::Right,
        };
        let mut blocks = selection::block_elements_in_selection(ctx.doc, ctx.selection, ctx.root);
        if blocks.is_empty() {
            if !ctx.exec("formatBlock", Some(&self.paragraph_separator)) {
                return Dispatch::Ignored;
            }
            blocks = selection::block_elements_in_selection(ctx.doc, ctx.selection, ctx.root);
        } else {
            ctx.checkpoint();
        }
        for block in blocks {
            if alignment == natural {
                ctx.doc.remove_style_property(block, "text-align");
            } else {
                ctx.doc.set_style_property(block, "text-align", alignment.css());
            }
        }
        Dispatch::Applied
    }

    fn toggle_list(&self, ctx: &mut EditContext<'_>, kind: ListKind) -> Dispatch {
        let target_re: &Regex = match kind {
            ListKind::Unordered => &UL_RE,
            ListKind::Ordered => &OL_RE,
        };
        let blocks = selection::block_elements_in_selection(ctx.doc, ctx.selection, ctx.root);
        let mut had_target = false;
        let mut rewritten = Vec::new();
        for &block in &blocks {
            let inner = ctx.doc.inner_html(block);
            if !ANY_LIST_RE.is_match(&inner) {
                continue;
            }
            if rewritten.is_empty() {
                ctx.checkpoint();
            }
            had_target |= target_re.is_match(&inner);
            let stripped = strip_tags(&inner, &["ul", "ol", "li"]);
            ctx.doc.set_inner_html(block, &stripped);
            rewritten.push(block);
        }
        if let (Some(&first), Some(&last)) = (rewritten.first(), rewritten.last()) {
            ctx.selection.set_range(DomRange::new(
                DomPosition::new(first, 0),
                DomPosition::new(last, ctx.doc.len(last)),
            ));
        }
        if had_target {
            return Dispatch::Applied;
        }
        let changed = ctx.exec(kind.command(), None);
        applied(changed || !rewritten.is_empty())
    }
}

fn applied(changed: bool) -> Dispatch {
    if changed {
        Dispatch::Applied
    } else {
        Dispatch::Ignored
    }
}

/// Snapshot the selection and find the colour currently in effect.
fn color_request(ctx: &EditContext<'_>, action: &EditorAction) -> ColorRequest {
    let (property, attribute) = match action.action.as_str() {
        "backColor" => ("background-color", None),
        _ => ("color", Some("color")),
    };
    let current = ctx.selection.anchor().and_then(|anchor| {
        ctx.doc
            .ancestors(anchor.node)
            .take_while(|&n| n != ctx.root)
            .find_map(|n| {
                let from_style = ctx.doc.style_property(n, property).or_else(|| {
                    (property == "background-color")
                        .then(|| ctx.doc.style_property(n, "background"))
                        .flatten()
                });
                from_style.or_else(|| {
                    attribute
                        .filter(|_| ctx.doc.has_tag(n, "font"))
                        .and_then(|a| ctx.doc.attr(n, a).map(str::to_owned))
                })
            })
    });
    let seed = current
        .as_deref()
        .and_then(color::to_hex)
        .or_else(|| action.value.as_deref().and_then(color::to_hex))
        .unwrap_or_else(|| "#000000".to_owned());
    ColorRequest {
        command: action.action.clone(),
        seed,
        snapshot: selection::save(ctx.selection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    struct Fixture {
        doc: Document,
        selection: Selection,
        host: MemoryHost,
        direction: Direction,
        dispatcher: CommandDispatcher,
    }

    impl Fixture {
        fn new(html: &str) -> Self {
            let mut doc = Document::default();
            let root = doc.root();
            doc.set_inner_html(root, html);
            Self {
                doc,
                selection: Selection::default(),
                host: MemoryHost::default(),
                direction: Direction::Ltr,
                dispatcher: CommandDispatcher::default(),
            }
        }

        fn caret_in(&mut self, content: &str, offset: usize) {
            let root = self.doc.root();
            let node = self
                .doc
                .descendants(root)
                .into_iter()
                .find(|&n| self.doc.text(n) == Some(content))
                .unwrap();
            self.selection.collapse(DomPosition::new(node, offset));
        }

        fn run(&mut self, name: &str, value: Option<&str>) -> Dispatch {
            let root = self.doc.root();
            let mut ctx = EditContext {
                doc: &mut self.doc,
                root,
                selection: &mut self.selection,
                platform: &mut self.host,
                direction: self.direction,
            };
            self.dispatcher.dispatch(&mut ctx, name, value)
        }

        fn html(&self) -> String {
            self.doc.inner_html(self.doc.root())
        }
    }

    #[test]
    fn test_unknown_action_ignored() {
        let mut f = Fixture::new("<p>a</p>");
        f.caret_in("a", 0);
        assert_eq!(f.run("sparkle", None), Dispatch::Ignored);
    }

    #[test]
    fn test_no_selection_ignored() {
        let mut f = Fixture::new("<p>a</p>");
        assert_eq!(f.run("bold", None), Dispatch::Ignored);
        assert_eq!(f.html(), "<p>a</p>");
    }

    #[test]
    fn test_format_block_renames() {
        let mut f = Fixture::new("<p>title</p><p>body</p>");
        f.caret_in("title", 2);
        assert_eq!(f.run("h2", None), Dispatch::Applied);
        assert_eq!(f.html(), "<h2>title</h2><p>body</p>");
    }

    #[test]
    fn test_blockquote_toggles_back_to_separator() {
        let mut f = Fixture::new("<p>quote</p>");
        f.caret_in("quote", 0);
        assert_eq!(f.run("blockquote", None), Dispatch::Applied);
        assert!(f.html().starts_with("<blockquote"));
        assert_eq!(f.run("blockquote", None), Dispatch::Applied);
        assert_eq!(f.html(), "<p style=\"margin-top: 0;\">quote</p>");
    }

    #[test]
    fn test_blockquote_with_inner_paragraph_unwraps() {
        let mut f = Fixture::new("<blockquote><p>q</p></blockquote>");
        f.caret_in("q", 0);
        assert_eq!(f.run("blockquote", None), Dispatch::Applied);
        assert_eq!(f.html(), "<p style=\"margin-top: 0;\">q</p>");
    }

    #[test]
    fn test_align_natural_side_clears() {
        let mut f = Fixture::new("<p>a</p>");
        f.caret_in("a", 0);
        assert_eq!(f.run("aligncenter", None), Dispatch::Applied);
        assert_eq!(
            f.html(),
            "<p style=\"text-align: center; margin-top: 0;\">a</p>"
        );
        assert_eq!(f.run("alignleft", None), Dispatch::Applied);
        assert_eq!(f.html(), "<p style=\"margin-top: 0;\">a</p>");
    }

    #[test]
    fn test_align_rtl() {
        let mut f = Fixture::new("<div>a</div>");
        f.direction = Direction::Rtl;
        f.caret_in("a", 0);
        f.run("alignleft", None);
        assert_eq!(f.html(), "<div style=\"text-align: left;\">a</div>");
        f.run("alignright", None);
        assert_eq!(f.html(), "<div>a</div>");
    }

    #[test]
    fn test_align_wraps_bare_text() {
        let mut f = Fixture::new("loose");
        f.caret_in("loose", 1);
        assert_eq!(f.run("aligncenter", None), Dispatch::Applied);
        assert_eq!(
            f.html(),
            "<p style=\"text-align: center; margin-top: 0;\">loose</p>"
        );
    }

    #[test]
    fn test_list_inside_block_is_stripped() {
        let mut f = Fixture::new("<div><ul><li>a</li></ul></div>");
        f.caret_in("a", 0);
        assert_eq!(f.run("unorderedlist", None), Dispatch::Applied);
        assert_eq!(f.html(), "<div>a</div>");
    }

    #[test]
    fn test_list_kind_converts() {
        let mut f = Fixture::new("<div><ul><li>a</li></ul></div>");
        f.caret_in("a", 0);
        assert_eq!(f.run("orderedlist", None), Dispatch::Applied);
        assert_eq!(f.html(), "<ol><li>a</li></ol>");
    }

    #[test]
    fn test_unordered_list_twice_is_list_free() {
        let mut f = Fixture::new("<p>item</p>");
        f.caret_in("item", 1);
        f.run("unorderedlist", None);
        assert_eq!(f.html(), "<ul><li>item</li></ul>");
        f.run("unorderedlist", None);
        assert_eq!(f.html(), "<p style=\"margin-top: 0;\">item</p>");
    }

    #[test]
    fn test_color_picker_seeded_from_style() {
        let mut f = Fixture::new("<p><span style=\"color: rgb(255, 0, 0)\">red</span></p>");
        f.dispatcher = CommandDispatcher::new(Arc::new(ActionTable::default()), "p", true);
        f.caret_in("red", 1);
        let Dispatch::PickColor(request) = f.run("forecolor", None) else {
            panic!("expected a colour request");
        };
        assert_eq!(request.command, "foreColor");
        assert_eq!(request.seed, "#ff0000");
        assert!(request.snapshot.is_some());
    }

    #[test]
    fn test_color_picker_falls_back_to_default() {
        let mut f = Fixture::new("<p>plain</p>");
        f.dispatcher = CommandDispatcher::new(Arc::new(ActionTable::default()), "p", true);
        f.caret_in("plain", 0);
        let Dispatch::PickColor(request) = f.run("backcolor", None) else {
            panic!("expected a colour request");
        };
        assert_eq!(request.seed, "#ffffff");
    }

    #[test]
    fn test_native_passthrough() {
        let mut f = Fixture::new("<p>word</p>");
        let root = f.doc.root();
        let text = f.doc.descendants(root)[1];
        f.selection.set_range(DomRange::new(
            DomPosition::new(text, 0),
            DomPosition::new(text, 4),
        ));
        assert_eq!(f.run("italic", None), Dispatch::Applied);
        assert_eq!(f.html(), "<p style=\"margin-top: 0;\"><em>word</em></p>");
    }
}
