//! Field catalogs loaded from TOML.
//!
//! ```toml
//! [[fields]]
//! handle = "summary"
//! expression = "{{ element.title }} ({{ element.year }})"
//! parse_before_save = true
//! ```

use preparse_model::{ConfigError, FieldConfiguration};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::Result;

/// A validated set of field configurations with unique handles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldCatalog {
    #[serde(default)]
    fields: Vec<FieldConfiguration>,
}

impl FieldCatalog {
    /// Loads a catalog from a file. A missing file yields an empty catalog.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No field catalog found at {:?}, starting empty", path);
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&contents)?;
        info!(fields = catalog.len(), "Loaded field catalog from {:?}", path);
        Ok(catalog)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut catalog: Self = toml::from_str(contents)?;
        let mut seen = HashSet::new();
        for field in &mut catalog.fields {
            if field.name.is_empty() {
                field.name = field.handle.clone();
            }
            field.validate()?;
            if !seen.insert(field.handle.clone()) {
                return Err(ConfigError::DuplicateHandle(field.handle.clone()).into());
            }
        }
        Ok(catalog)
    }

    pub fn get(&self, handle: &str) -> Option<&FieldConfiguration> {
        self.fields.iter().find(|f| f.handle == handle)
    }

    pub fn fields(&self) -> &[FieldConfiguration] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
