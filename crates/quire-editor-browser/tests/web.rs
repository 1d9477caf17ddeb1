//! WASM browser tests for quire-editor-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use quire_editor_browser::clipboard::legacy_clipboard_text;
use quire_editor_browser::events::handle_keydown;
use quire_editor_browser::{BrowserClipboard, DocumentLocale, DomEventSink, KeyPress, key_press};
use quire_editor_core::{
    ActionTable, Capabilities, ClipboardSource, Direction, Dispatch, Editor, EditorAction,
    EditorConfig, LocaleProvider, MemoryHost, Modifiers, ViewState,
};

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn keydown(code: &str, ctrl: bool) -> web_sys::KeyboardEvent {
    let init = web_sys::KeyboardEventInit::new();
    init.set_code(code);
    init.set_ctrl_key(ctrl);
    init.set_cancelable(true);
    web_sys::KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap()
}

// === Keyboard ===

#[wasm_bindgen_test]
fn test_key_press_from_event() {
    assert_eq!(
        key_press(&keydown("KeyB", true)),
        Some(KeyPress {
            code: "KeyB".into(),
            modifiers: Modifiers::CTRL,
        })
    );
    assert_eq!(key_press(&keydown("ControlLeft", true)), None);
}

#[wasm_bindgen_test]
fn test_keydown_runs_shortcut() {
    let actions = ActionTable::default()
        .with_entry("mode", EditorAction::new("mode").with_keyid("KeyH|ctrlKey"));
    let mut editor = Editor::in_memory(EditorConfig::default()).with_actions(Arc::new(actions));
    editor.set_value("<p>a</p>");

    let evt = keydown("KeyH", true);
    assert_eq!(
        handle_keydown(&evt, &mut editor),
        Dispatch::ViewSwitched(ViewState::Source)
    );
    assert!(evt.default_prevented());

    let plain = keydown("KeyA", false);
    assert_eq!(handle_keydown(&plain, &mut editor), Dispatch::Ignored);
    assert!(!plain.default_prevented());
}

// === Clipboard ===

#[wasm_bindgen_test]
fn test_empty_clipboard_yields_nothing() {
    let clipboard = BrowserClipboard::empty();
    assert_eq!(clipboard.get_data("text/html"), None);
    assert_eq!(clipboard.get_data("text/plain"), None);
}

#[wasm_bindgen_test]
fn test_legacy_clipboard_object() {
    let holder = js_sys::Object::new();
    let data = js_sys::Object::new();
    let get_data =
        js_sys::Function::new_with_args("kind", "return kind === 'Text' ? 'a\\nb' : '';");
    js_sys::Reflect::set(&data, &"getData".into(), &get_data).unwrap();
    js_sys::Reflect::set(&holder, &"clipboardData".into(), &data).unwrap();

    assert_eq!(legacy_clipboard_text(&holder), Some("a\nb".to_string()));
    assert_eq!(legacy_clipboard_text(&js_sys::Object::new()), None);
}

// === Locale ===

#[wasm_bindgen_test]
fn test_locale_reads_nearest_dir() {
    let doc = document();
    let outer = doc.create_element("div").unwrap();
    outer.set_attribute("dir", "rtl").unwrap();
    let editor_el = doc.create_element("div").unwrap();
    outer.append_child(&editor_el).unwrap();
    doc.body().unwrap().append_child(&outer).unwrap();

    assert_eq!(DocumentLocale::for_element(editor_el).direction(), Direction::Rtl);
    outer.remove();
}

#[wasm_bindgen_test]
fn test_locale_falls_back_to_lang() {
    let root = document().document_element().unwrap();
    root.remove_attribute("dir").unwrap();
    root.set_attribute("lang", "he").unwrap();
    assert_eq!(DocumentLocale::new().direction(), Direction::Rtl);
    root.set_attribute("lang", "en").unwrap();
    assert_eq!(DocumentLocale::new().direction(), Direction::Ltr);
}

// === Events ===

#[wasm_bindgen_test]
fn test_editor_events_reach_the_dom() {
    let target = document().create_element("div").unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let record = seen.clone();
    let listener = Closure::<dyn FnMut(web_sys::CustomEvent)>::new(move |e: web_sys::CustomEvent| {
        let value = js_sys::Reflect::get(&e.detail(), &"view".into())
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        record.borrow_mut().push((e.type_(), value));
    });
    target
        .add_event_listener_with_callback("view-changed", listener.as_ref().unchecked_ref())
        .unwrap();

    let mut editor = Editor::new(
        EditorConfig::default(),
        MemoryHost::default(),
        Capabilities::default().with_events(DomEventSink::new(target.clone())),
    );
    editor.set_value("<p>a</p>");
    editor.toggle_view().unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![("view-changed".to_string(), "source".to_string())]
    );
    drop(listener);
}
