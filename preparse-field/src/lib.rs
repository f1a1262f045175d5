//! Preparse field type.
//!
//! A field whose stored value is computed by rendering a template expression
//! against the element being saved, instead of being typed in by an editor.
//!
//! The crate is an adapter between a host's field-plugin interface and a few
//! host collaborators:
//! - [`TypedFieldValue`]: storage-type driven normalization, display and column sizing
//! - [`PreparseField`]: the [`FieldPlugin`] implementation
//! - [`FieldTypeRegistry`]: explicit registration of field types
//! - [`PreparseService`]: the parse-before-save and parse-on-move hooks
//! - [`FieldCatalog`]: TOML-backed field configuration
//!
//! Collaborators ([`TemplateRenderer`], [`DateTimeParser`], [`LocaleFormatter`],
//! [`ColumnSizer`], [`Translator`]) have default implementations here; hosts
//! may replace any of them.

mod catalog;
mod column;
mod datetime;
mod error;
mod host;
mod locale;
mod plugin;
mod registry;
mod render;
mod service;
mod value;

pub use catalog::FieldCatalog;
pub use column::{DefaultColumnSizer, MAX_DECIMAL_PRECISION};
pub use datetime::FlexibleDateTimeParser;
pub use error::{FieldError, Result};
pub use host::{
    ColumnSizer, DateTimeParser, LocaleFormatter, TemplateRenderer, Translator,
    identity_translator,
};
pub use locale::{Locale, ShortFormatter};
pub use plugin::{
    FieldPlugin, HostServices, PreparseField, SettingsContext, TRANSLATION_CATEGORY,
    format_input_id,
};
pub use registry::{FieldFactory, FieldTypeRegistry, PREPARSE_FIELD_TYPE};
pub use render::{INPUT_TEMPLATE, LiquidRenderer, SETTINGS_TEMPLATE};
pub use service::{HookOutcome, HookTrigger, PreparseService};
pub use value::TypedFieldValue;
