use thiserror::Error;

/// Errors raised while reading or validating a field configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid field handle '{0}': must start with a letter and contain only letters, digits and underscores")]
    InvalidHandle(String),

    #[error("field '{handle}': textarea rows must be at least 1")]
    TextareaRows { handle: String },

    #[error("field '{handle}': {value} decimal places exceeds the maximum of {max}")]
    DecimalPlaces { handle: String, value: u32, max: u32 },

    #[error("duplicate field handle: {0}")]
    DuplicateHandle(String),

    #[error("malformed field configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}
