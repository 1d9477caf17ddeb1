use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::view::ViewState;
use crate::workflow::WorkflowKind;

/// Top-level error type for quire-editor-core operations
#[derive(Debug, Error, Diagnostic)]
pub enum EditorError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Vetoed(#[from] Vetoed),
}

/// Configuration loading errors
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    #[diagnostic(code(config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}", path.display())]
    #[diagnostic(code(config::json))]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in {}", path.display())]
    #[diagnostic(code(config::toml))]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported config format for {}", path.display())]
    #[diagnostic(
        code(config::format),
        help("use a .json or .toml file")
    )]
    UnsupportedFormat { path: PathBuf },
}

/// Link and image dialog workflow errors
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("cannot open the {kind} dialog without a selection")]
    #[diagnostic(code(workflow::no_selection), help("place the caret in the editor first"))]
    NoSelection { kind: WorkflowKind },

    #[error("no {kind} dialog is open")]
    #[diagnostic(code(workflow::not_started))]
    NotStarted { kind: WorkflowKind },

    #[error("dialog fields do not belong to the {kind} workflow")]
    #[diagnostic(code(workflow::field_mismatch))]
    FieldMismatch { kind: WorkflowKind },
}

/// A before-hook denied a view switch or paste.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum Vetoed {
    #[error("switch from {from} to {to} view was rejected")]
    #[diagnostic(code(veto::view_switch))]
    ViewSwitch { from: ViewState, to: ViewState },

    #[error("paste was rejected")]
    #[diagnostic(code(veto::paste))]
    Paste,
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
