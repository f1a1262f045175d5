//! Field configuration and element model for the preparse field.
//!
//! Defines the types the field adapter, the parse hooks and the content
//! store share:
//! - [`FieldConfiguration`]: one configured field instance, with defaults and validation
//! - [`StorageType`]: the logical type a value is stored as
//! - [`DisplayMode`] / [`InputDisplay`]: how the value is shown to editors
//! - [`ColumnType`]: the persisted column descriptor
//! - [`Element`]: the content element a field value belongs to
//!
//! These types are plain data. Normalization and rendering live in
//! `preparse-field`.

mod element;
mod error;
mod field;

pub use element::Element;
pub use error::ConfigError;
pub use field::{
    ColumnType, DisplayMode, FieldConfiguration, InputDisplay, StorageType, MAX_DECIMAL_PLACES,
};
