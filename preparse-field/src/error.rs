//! Error types for the field adapter.

use preparse_model::ConfigError;
use thiserror::Error;

/// Result type for field operations.
pub type Result<T> = std::result::Result<T, FieldError>;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template parse error in '{name}': {message}")]
    TemplateParse { name: String, message: String },

    #[error("template render error in '{name}': {message}")]
    TemplateRender { name: String, message: String },

    #[error("unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("field type already registered: {0}")]
    FieldTypeAlreadyRegistered(String),

    #[error("invalid field configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
