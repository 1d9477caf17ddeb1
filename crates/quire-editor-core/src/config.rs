//! Editor configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. Files are read as JSON or TOML depending on their extension.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::platform::Direction;
use crate::view::ViewState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// View shown after construction.
    pub initial_view: ViewState,
    /// Run the source formatter when switching to the source view.
    pub pretty_print_source: bool,
    /// Block tag used when a block format is toggled off.
    pub paragraph_separator: String,
    /// Writing direction override; `None` asks the locale provider.
    pub direction: Option<Direction>,
    /// Whether the host selection can hold more than one range.
    pub multi_range_selection: bool,
    /// Colour actions open an external colour input instead of applying their default.
    pub color_inputs: bool,
    /// Maximum number of undo snapshots kept by the in-memory host.
    pub undo_depth: usize,
    pub link: LinkDefaults,
    pub image: ImageDefaults,
    pub debounce: DebounceConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_view: ViewState::Editor,
            pretty_print_source: false,
            paragraph_separator: "p".to_owned(),
            direction: None,
            multi_range_selection: false,
            color_inputs: false,
            undo_depth: 100,
            link: LinkDefaults::default(),
            image: ImageDefaults::default(),
            debounce: DebounceConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Load a config file, picking the format from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = path.extension().and_then(|ext| ext.to_str());
        if !matches!(format, Some("json" | "toml")) {
            return Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match format {
            Some("json") => serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            }),
            _ => toml::from_str(&text).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Values the hyperlink dialog starts with when the selection is not in a link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkDefaults {
    pub url: String,
    pub class: String,
    pub target: String,
    pub non_editable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDefaults {
    pub url: String,
    pub alt: String,
}

/// Debounce windows, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    pub selection_ms: u64,
    pub input_ms: u64,
    pub cleanup_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            selection_ms: 200,
            input_ms: 400,
            cleanup_ms: 410,
        }
    }
}

impl DebounceConfig {
    pub fn selection(&self) -> Duration {
        Duration::from_millis(self.selection_ms)
    }

    pub fn input(&self) -> Duration {
        Duration::from_millis(self.input_ms)
    }

    pub fn cleanup(&self) -> Duration {
        Duration::from_millis(self.cleanup_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EditorConfig = toml::from_str(
            r#"
            initial_view = "source"
            direction = "rtl"

            [debounce]
            input_ms = 50

            [link]
            target = "_blank"
            "#,
        )
        .unwrap();
        assert_eq!(config.initial_view, ViewState::Source);
        assert_eq!(config.direction, Some(Direction::Rtl));
        assert_eq!(config.debounce.input_ms, 50);
        assert_eq!(config.debounce.selection_ms, 200);
        assert_eq!(config.link.target, "_blank");
        assert_eq!(config.paragraph_separator, "p");
    }

    #[test]
    fn test_json_config() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"pretty_print_source": true, "undo_depth": 5}"#).unwrap();
        assert!(config.pretty_print_source);
        assert_eq!(config.undo_depth, 5);
        assert_eq!(config.debounce.cleanup(), Duration::from_millis(410));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = EditorConfig::from_path("editor.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EditorConfig::from_path("/definitely/not/here/editor.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
