//! Typed errors for each pipeline stage.

use std::path::PathBuf;
use thiserror::Error;

/// Tag markup that is not well-formed nested markup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("unexpected closing tag </{found}> at offset {offset}, expected </{expected}>")]
    MismatchedClose {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("closing tag </{0}> has no matching opening tag")]
    UnopenedClose(String),

    #[error("tag <{0}> is never closed")]
    Unclosed(String),

    #[error("malformed tag at offset {0}")]
    MalformedTag(usize),
}

/// A source file the declaration scanner could not make sense of.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("unbalanced '}}' on line {0}")]
    UnbalancedBrace(usize),

    #[error("unterminated {what} starting on line {line}")]
    Unterminated { what: &'static str, line: usize },

    #[error("{0} scope(s) still open at end of file")]
    UnclosedScope(usize),
}

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("plugin {name} could not be created: {message}")]
    Instantiation { name: String, message: String },

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("{0}")]
    Execution(String),
}

/// Configuration problems. Only `NoInputFolders` and `NoOutputFolder` are
/// fatal for a run; the rest surface while loading the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("select at least one enabled input folder")]
    NoInputFolders,

    #[error("select an output folder")]
    NoOutputFolder,

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
