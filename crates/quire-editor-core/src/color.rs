//! Colour value helpers for the colour-picker seed.

use std::sync::LazyLock;

use regex::Regex;

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[\d.]+\s*)?\)$")
        .unwrap()
});

/// Convert `rgb(r, g, b)` / `rgba(r, g, b, a)` to `#rrggbb`. Alpha is dropped.
pub fn rgb_to_hex(css: &str) -> Option<String> {
    let caps = RGB_RE.captures(css.trim())?;
    let channel = |i: usize| caps[i].parse::<u8>().ok();
    Some(format!(
        "#{:02x}{:02x}{:02x}",
        channel(1)?,
        channel(2)?,
        channel(3)?
    ))
}

/// Normalize a CSS colour for a hex colour input.
///
/// `rgb()` forms are converted, `#rgb` is expanded, `#rrggbb` is lower-cased.
/// Named colours and anything else return `None`.
pub fn to_hex(css: &str) -> Option<String> {
    let css = css.trim();
    if let Some(hex) = css.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            6 => Some(format!("#{}", hex.to_ascii_lowercase())),
            3 => Some(
                hex.chars()
                    .flat_map(|c| [c, c])
                    .fold(String::from("#"), |mut s, c| {
                        s.push(c.to_ascii_lowercase());
                        s
                    }),
            ),
            _ => None,
        };
    }
    rgb_to_hex(css)
}
