//! Inline `style` attribute parsing and writing.

/// Split style text into `(property, value)` pairs. Properties are lower-cased;
/// declarations without a colon are dropped.
pub fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            let value = value.trim();
            if prop.is_empty() {
                return None;
            }
            Some((prop.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

/// Write declarations as `prop: value;` joined by single spaces.
pub fn serialize_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(p, v)| format!("{p}: {v};"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declarations() {
        let decls = parse_declarations(" COLOR:red ; ; junk; margin-top : 0");
        assert_eq!(
            decls,
            vec![
                ("color".to_string(), "red".to_string()),
                ("margin-top".to_string(), "0".to_string()),
            ]
        );
        assert_eq!(serialize_declarations(&decls), "color: red; margin-top: 0;");
    }
}
