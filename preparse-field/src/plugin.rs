//! The field-plugin interface and the preparse field's implementation of it.

use preparse_model::{ColumnType, DisplayMode, Element, FieldConfiguration, StorageType};
use preparse_types::FieldValue;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::host::{TemplateRenderer, Translator, identity_translator};
use crate::locale::Locale;
use crate::render::{INPUT_TEMPLATE, LiquidRenderer, SETTINGS_TEMPLATE};
use crate::value::{TypedFieldValue, scalar_text};

/// Translation category for every message this field emits.
pub const TRANSLATION_CATEGORY: &str = "preparse-field";

const DATE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Everything a field needs from its host, bundled for cheap cloning.
#[derive(Clone)]
pub struct HostServices {
    pub renderer: Arc<dyn TemplateRenderer>,
    pub values: TypedFieldValue,
    pub translator: Translator,
}

impl HostServices {
    pub fn new(renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self {
            renderer,
            values: TypedFieldValue::default(),
            translator: identity_translator(),
        }
    }

    /// Services backed by the built-in Liquid renderer.
    pub fn with_default_renderer() -> Result<Self> {
        Ok(Self::new(Arc::new(LiquidRenderer::new()?)))
    }

    pub fn with_values(mut self, values: TypedFieldValue) -> Self {
        self.values = values;
        self
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn translate(&self, message: &str) -> String {
        (self.translator)(TRANSLATION_CATEGORY, message)
    }
}

/// Host-supplied facts for rendering the settings form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsContext {
    /// True while the configuration has never been saved.
    pub is_new_configuration: bool,
}

/// The capability set a host expects from a field type.
pub trait FieldPlugin: Send + Sync {
    /// Handle of the configured field instance.
    fn handle(&self) -> &str;

    /// Translated name of the field type.
    fn display_name(&self) -> String;

    /// Whether values may appear in element listings.
    fn is_previewable(&self) -> bool {
        false
    }

    fn normalize_value(&self, raw: Value, element: Option<&Element>) -> FieldValue;

    fn serialize_value(&self, value: &FieldValue, element: Option<&Element>) -> Value;

    /// Read-only HTML for listing columns.
    fn table_attribute_html(&self, value: &FieldValue, element: &Element, locale: &Locale) -> String;

    fn input_html(
        &self,
        value: &FieldValue,
        element: Option<&Element>,
        namespace: Option<&str>,
    ) -> Result<String>;

    fn settings_html(&self, context: &SettingsContext) -> Result<String>;

    fn content_column_type(&self) -> ColumnType;
}

/// A field whose value is computed from a template expression.
pub struct PreparseField {
    config: FieldConfiguration,
    services: HostServices,
    column_type: ColumnType,
}

impl PreparseField {
    pub fn new(config: FieldConfiguration, services: HostServices) -> Self {
        let column_type = services
            .values
            .persist_column_type(config.storage_type, config.decimal_places);
        debug!(
            handle = %config.handle,
            storage = %config.storage_type,
            column = %column_type,
            "Preparse field configured"
        );
        Self {
            config,
            services,
            column_type,
        }
    }

    pub fn config(&self) -> &FieldConfiguration {
        &self.config
    }

    fn column_options(&self) -> Vec<Value> {
        StorageType::ALL
            .iter()
            .map(|st| json!({"value": st.as_str(), "label": self.services.translate(st.label())}))
            .collect()
    }

    fn display_options(&self) -> Vec<Value> {
        DisplayMode::ALL
            .iter()
            .map(|mode| json!({"value": mode.as_str(), "label": self.services.translate(mode.label())}))
            .collect()
    }

    fn settings_labels(&self) -> Value {
        let t = |m: &str| self.services.translate(m);
        json!({
            "expression": t("Template expression"),
            "storageType": t("Column type"),
            "existingWarning": t("Changing the column type of an existing field may truncate stored values."),
            "decimalPlaces": t("Decimals"),
            "displayMode": t("Display type"),
            "textareaRows": t("Textarea rows"),
            "parseBeforeSave": t("Parse before element save"),
            "parseOnMove": t("Parse when element is moved"),
            "allowSelect": t("Allow selecting the value"),
        })
    }
}

impl FieldPlugin for PreparseField {
    fn handle(&self) -> &str {
        &self.config.handle
    }

    fn display_name(&self) -> String {
        self.services.translate("Preparse Field")
    }

    fn is_previewable(&self) -> bool {
        true
    }

    fn normalize_value(&self, raw: Value, _element: Option<&Element>) -> FieldValue {
        self.services.values.normalize(raw, self.config.storage_type)
    }

    fn serialize_value(&self, value: &FieldValue, _element: Option<&Element>) -> Value {
        self.services.values.serialize(value, self.config.storage_type)
    }

    fn table_attribute_html(&self, value: &FieldValue, _element: &Element, locale: &Locale) -> String {
        self.services
            .values
            .format_for_display(value, self.config.storage_type, locale)
    }

    fn input_html(
        &self,
        value: &FieldValue,
        element: Option<&Element>,
        namespace: Option<&str>,
    ) -> Result<String> {
        let id = format_input_id(&self.config.handle);
        let namespaced_id = match namespace {
            Some(ns) if !ns.is_empty() => format!("{}-{}", format_input_id(ns), id),
            _ => id.clone(),
        };
        let date_value = value
            .as_datetime()
            .map(|dt| dt.format(DATE_INPUT_FORMAT).to_string())
            .unwrap_or_default();

        let context = json!({
            "name": self.config.handle,
            "value": scalar_text(&value.to_storage()),
            "dateValue": date_value,
            "field": serde_json::to_value(&self.config)?,
            "id": id,
            "namespacedId": namespaced_id,
            "displayType": self.config.effective_display().as_str(),
            "elementId": element.map(|e| e.id.to_string()),
        });
        self.services.renderer.render_template(INPUT_TEMPLATE, &context)
    }

    fn settings_html(&self, context: &SettingsContext) -> Result<String> {
        let context = json!({
            "field": serde_json::to_value(&self.config)?,
            "columns": self.column_options(),
            "displayTypes": self.display_options(),
            "existing": !context.is_new_configuration,
            "labels": self.settings_labels(),
        });
        self.services.renderer.render_template(SETTINGS_TEMPLATE, &context)
    }

    fn content_column_type(&self) -> ColumnType {
        self.column_type
    }
}

/// Turns an input name such as `fields[summary]` into an id (`fields-summary`).
///
/// Runs of non-word characters collapse to one `-`; leading and trailing
/// dashes are dropped.
pub fn format_input_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' {
            id.push(c);
            in_run = false;
        } else if !in_run {
            id.push('-');
            in_run = true;
        }
    }
    id.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_id_collapses_brackets() {
        assert_eq!(format_input_id("summary"), "summary");
        assert_eq!(format_input_id("fields[summary]"), "fields-summary");
        assert_eq!(format_input_id("a[b][c]"), "a-b-c");
        assert_eq!(format_input_id("[matrix] block.1"), "matrix-block-1");
    }
}
