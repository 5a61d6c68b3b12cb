use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Malformed metadata in {field}: {reason}")]
    MalformedMetadata { field: String, reason: String },

    #[error("Application name {0:?} contains no alphanumeric characters")]
    InvalidName(String),

    #[error("Platform {0:?} has no default http port, pass one explicitly with --port")]
    UnsupportedPlatform(String),

    #[error("Destination {0:?} escapes the output directory")]
    PathEscape(PathBuf),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Failed to render template {path}: {reason}")]
    TemplateRender { path: String, reason: String },

    #[error("Failed to write {path:?}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to package chart into {path:?}")]
    Package {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub fn malformed(field: impl Into<String>, reason: impl ToString) -> Self {
        GenerateError::MalformedMetadata {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerateError>;
