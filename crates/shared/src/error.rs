use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnknownCommand,
    Validation,
}

/// Error envelope returned to whoever drives the controller through its
/// command channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerError {
    pub code: ErrorCode,
    pub message: String,
}

impl ControllerError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse item catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("item {index} has an empty title")]
    EmptyTitle { index: usize },
    #[error("item {index} ({title}) has invalid color '{color}'")]
    InvalidColor {
        index: usize,
        title: String,
        color: String,
    },
    #[error("item {index} ({title}) has invalid link '{link}': {source}")]
    InvalidLink {
        index: usize,
        title: String,
        link: String,
        source: url::ParseError,
    },
}
