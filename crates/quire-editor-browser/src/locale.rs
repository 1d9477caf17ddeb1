//! Writing direction from the host document.

use quire_editor_core::{Direction, LocaleProvider};

/// Languages written right to left, by primary subtag.
const RTL_LANGS: &[&str] = &[
    "ar", "arc", "ckb", "dv", "fa", "he", "iw", "ps", "sd", "ug", "ur", "yi",
];

/// Direction implied by a BCP 47 language tag such as `he-IL`.
pub fn direction_for_lang(lang: &str) -> Option<Direction> {
    let primary = lang.trim().split(['-', '_']).next()?.to_ascii_lowercase();
    if primary.is_empty() {
        return None;
    }
    Some(if RTL_LANGS.contains(&primary.as_str()) {
        Direction::Rtl
    } else {
        Direction::Ltr
    })
}

/// Parse a `dir` attribute value. `auto` and junk give `None`.
fn parse_dir(dir: &str) -> Option<Direction> {
    match dir.trim().to_ascii_lowercase().as_str() {
        "rtl" => Some(Direction::Rtl),
        "ltr" => Some(Direction::Ltr),
        _ => None,
    }
}

/// Reads the direction off the page each time it is asked.
///
/// The nearest `dir` attribute around the editor element wins, then the
/// root element's `dir`, then its `lang`.
#[derive(Debug, Clone, Default)]
pub struct DocumentLocale {
    element: Option<web_sys::Element>,
}

impl DocumentLocale {
    /// Ask about the whole document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask about the context of a specific editor element.
    pub fn for_element(element: web_sys::Element) -> Self {
        Self {
            element: Some(element),
        }
    }

    fn lookup(&self) -> Option<Direction> {
        if let Some(el) = &self.element
            && let Ok(Some(holder)) = el.closest("[dir]")
            && let Some(dir) = holder.get_attribute("dir").as_deref().and_then(parse_dir)
        {
            return Some(dir);
        }
        let root = web_sys::window()?.document()?.document_element()?;
        if let Some(dir) = root.get_attribute("dir").as_deref().and_then(parse_dir) {
            return Some(dir);
        }
        root.get_attribute("lang").as_deref().and_then(direction_for_lang)
    }
}

impl LocaleProvider for DocumentLocale {
    fn direction(&self) -> Direction {
        self.lookup().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_tags() {
        assert_eq!(direction_for_lang("he-IL"), Some(Direction::Rtl));
        assert_eq!(direction_for_lang("AR"), Some(Direction::Rtl));
        assert_eq!(direction_for_lang("fa_IR"), Some(Direction::Rtl));
        assert_eq!(direction_for_lang("en-US"), Some(Direction::Ltr));
        assert_eq!(direction_for_lang(""), None);
    }

    #[test]
    fn test_dir_values() {
        assert_eq!(parse_dir(" RTL "), Some(Direction::Rtl));
        assert_eq!(parse_dir("ltr"), Some(Direction::Ltr));
        assert_eq!(parse_dir("auto"), None);
    }
}
