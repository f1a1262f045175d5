//! SQLite persistence for preparse field values.
//!
//! Values live in a single `content` table keyed by element id, with one
//! `field_<handle>` column per configured field. Column types come from the
//! field's [`ColumnType`](preparse_model::ColumnType), so SQLite's type
//! affinity applies the same coercions a host database would.

mod content_store;
mod error;

pub use content_store::{ContentStore, field_column_name};
pub use error::{StorageError, StorageResult};
