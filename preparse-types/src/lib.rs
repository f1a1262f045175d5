//! Core type definitions for the preparse field.
//!
//! This crate defines the small, host-agnostic types every other crate in
//! the workspace depends on:
//! - Element and field identifiers (UUID v7)
//! - [`FieldValue`], the normalized in-memory form of a stored value
//!
//! Field configuration, storage types and rendering live in
//! `preparse-model` and `preparse-field`, not here.

mod ids;
mod value;

pub use ids::{ElementId, FieldId};
pub use value::{FieldValue, STORAGE_DATETIME_FORMAT, is_falsy};

pub type Result<T> = std::result::Result<T, Error>;

/// Failures reading identifiers or values back from storage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid id '{input}': {source}")]
    InvalidId {
        input: String,
        #[source]
        source: uuid::Error,
    },

    #[error("invalid stored datetime: {0}")]
    InvalidDateTime(String),
}
