use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the label model, its configuration and the demo window.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("unknown text alignment `{0}` (expected left, natural, justified, center or right)")]
    UnknownAlignment(String),

    #[error("unknown line break mode `{0}` (expected word, char or clip)")]
    UnknownLineBreak(String),

    #[error("unknown link matcher `{0}` (expected linkify or scheme)")]
    UnknownMatcher(String),

    #[error("no usable font found: {0}")]
    FontLoad(String),

    #[error("link matcher failed: {0}")]
    Matcher(String),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface error: {0}")]
    Surface(String),
}

pub type Result<T> = std::result::Result<T, Error>;
