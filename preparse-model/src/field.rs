use preparse_types::FieldId;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::ConfigError;

/// Largest scale a decimal content column accepts.
pub const MAX_DECIMAL_PLACES: u32 = 30;

static HANDLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("handle pattern is valid"));

/// One configured preparse field.
///
/// Every key is optional when deserializing; omitted keys take the same
/// defaults an administrator sees on a fresh settings form. Legacy camelCase
/// keys (`fieldTwig`, `columnType`, `decimals`, `displayType`) are accepted
/// as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfiguration {
    pub handle: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<FieldId>,
    /// Template evaluated against the element by the parse hooks.
    #[serde(alias = "fieldTwig")]
    pub expression: String,
    #[serde(alias = "columnType")]
    pub storage_type: StorageType,
    /// Scale of the column. Only meaningful when `storage_type` is `Decimal`.
    #[serde(alias = "decimals")]
    pub decimal_places: u32,
    #[serde(alias = "displayType")]
    pub display_mode: DisplayMode,
    #[serde(alias = "textareaRows")]
    pub textarea_rows: u32,
    #[serde(alias = "parseBeforeSave")]
    pub parse_before_save: bool,
    #[serde(alias = "parseOnMove")]
    pub parse_on_move: bool,
    #[serde(alias = "allowSelect")]
    pub allow_select: bool,
}

impl Default for FieldConfiguration {
    fn default() -> Self {
        Self {
            handle: String::new(),
            name: String::new(),
            id: None,
            expression: String::new(),
            storage_type: StorageType::default(),
            decimal_places: 0,
            display_mode: DisplayMode::default(),
            textarea_rows: 5,
            parse_before_save: false,
            parse_on_move: false,
            allow_select: false,
        }
    }
}

impl FieldConfiguration {
    /// Creates a configuration with defaults for everything but the handle.
    pub fn new(handle: impl Into<String>) -> Self {
        let handle = handle.into();
        Self {
            name: handle.clone(),
            handle,
            ..Self::default()
        }
    }

    /// Builds a configuration from submitted settings JSON and validates it.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_value(value)?;
        if config.name.is_empty() {
            config.name = config.handle.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = expression.into();
        self
    }

    pub fn with_storage(mut self, storage_type: StorageType) -> Self {
        self.storage_type = storage_type;
        self
    }

    pub fn with_decimal_places(mut self, decimal_places: u32) -> Self {
        self.decimal_places = decimal_places;
        self
    }

    pub fn with_display(mut self, display_mode: DisplayMode) -> Self {
        self.display_mode = display_mode;
        self
    }

    /// Checks the range rules the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !HANDLE_PATTERN.is_match(&self.handle) {
            return Err(ConfigError::InvalidHandle(self.handle.clone()));
        }
        if self.textarea_rows == 0 {
            return Err(ConfigError::TextareaRows {
                handle: self.handle.clone(),
            });
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::DecimalPlaces {
                handle: self.handle.clone(),
                value: self.decimal_places,
                max: MAX_DECIMAL_PLACES,
            });
        }
        Ok(())
    }

    /// True until the host has persisted this configuration and assigned an id.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// The display editors actually get.
    ///
    /// A visible datetime field always renders as a date picker; a hidden
    /// field stays hidden whatever its storage type.
    pub fn effective_display(&self) -> InputDisplay {
        match (self.display_mode, self.storage_type) {
            (DisplayMode::Hidden, _) => InputDisplay::Hidden,
            (_, StorageType::DateTime) => InputDisplay::Date,
            (DisplayMode::TextInput, _) => InputDisplay::TextInput,
            (DisplayMode::Textarea, _) => InputDisplay::Textarea,
        }
    }
}

/// The logical type a field value is stored as.
///
/// The serialized names match the host's schema type names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Text,
    MediumText,
    Integer,
    Decimal,
    Float,
    DateTime,
}

impl StorageType {
    pub const ALL: [StorageType; 6] = [
        Self::Text,
        Self::MediumText,
        Self::Integer,
        Self::Decimal,
        Self::Float,
        Self::DateTime,
    ];

    /// Schema type name, as used in settings forms and stored configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::MediumText => "mediumtext",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::DateTime => "datetime",
        }
    }

    /// Untranslated settings label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text (stores about 64K)",
            Self::MediumText => "Mediumtext (stores about 16MB)",
            Self::Integer => "Number (integer)",
            Self::Decimal => "Number (decimal)",
            Self::Float => "Number (float)",
            Self::DateTime => "Date (datetime)",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an administrator asked the value to be shown on the edit form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Hidden,
    TextInput,
    Textarea,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [Self::Hidden, Self::TextInput, Self::Textarea];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::TextInput => "textinput",
            Self::Textarea => "textarea",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hidden => "Hidden",
            Self::TextInput => "Text input",
            Self::Textarea => "Textarea",
        }
    }
}

/// The display variant passed to the input template.
///
/// Same as [`DisplayMode`] plus the date picker forced for datetime storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputDisplay {
    Hidden,
    TextInput,
    Textarea,
    Date,
}

impl InputDisplay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::TextInput => "textinput",
            Self::Textarea => "textarea",
            Self::Date => "date",
        }
    }
}

/// Column descriptor handed to the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    MediumText,
    Integer,
    Decimal { precision: u32, scale: u32 },
    Float,
    DateTime,
}

impl ColumnType {
    /// SQL type name used in column definitions, e.g. `decimal(21,2)`.
    pub fn sql_type(&self) -> String {
        match self {
            Self::Text => "text".to_string(),
            Self::MediumText => "mediumtext".to_string(),
            Self::Integer => "integer".to_string(),
            Self::Decimal { precision, scale } => format!("decimal({precision},{scale})"),
            Self::Float => "float".to_string(),
            Self::DateTime => "datetime".to_string(),
        }
    }

    /// Scale of a decimal column; `None` for every other column.
    pub fn scale(&self) -> Option<u32> {
        match self {
            Self::Decimal { scale, .. } => Some(*scale),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql_type())
    }
}
