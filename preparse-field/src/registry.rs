//! Explicit field-type registration.
//!
//! Hosts construct a registry, register factories by type name, and create
//! field instances from stored configurations. Nothing is discovered
//! implicitly.

use preparse_model::FieldConfiguration;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::{FieldError, Result};
use crate::plugin::{FieldPlugin, HostServices, PreparseField};

/// Type name the preparse field registers under.
pub const PREPARSE_FIELD_TYPE: &str = "preparse";

/// Builds a field instance from its configuration.
pub type FieldFactory =
    Box<dyn Fn(FieldConfiguration, &HostServices) -> Box<dyn FieldPlugin> + Send + Sync>;

fn preparse_factory(config: FieldConfiguration, services: &HostServices) -> Box<dyn FieldPlugin> {
    Box::new(PreparseField::new(config, services.clone()))
}

/// Maps field type names to factories.
pub struct FieldTypeRegistry {
    factories: HashMap<String, FieldFactory>,
    services: HostServices,
}

impl FieldTypeRegistry {
    /// An empty registry.
    pub fn new(services: HostServices) -> Self {
        Self {
            factories: HashMap::new(),
            services,
        }
    }

    /// A registry with the preparse field registered.
    pub fn with_defaults(services: HostServices) -> Self {
        let mut registry = Self::new(services);
        if let Err(e) = registry.register(PREPARSE_FIELD_TYPE, preparse_factory) {
            warn!(error = %e, "Default field type not registered");
        }
        registry
    }

    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn(FieldConfiguration, &HostServices) -> Box<dyn FieldPlugin> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        if self.factories.contains_key(&type_name) {
            return Err(FieldError::FieldTypeAlreadyRegistered(type_name));
        }
        info!(field_type = %type_name, "Field type registered");
        self.factories.insert(type_name, Box::new(factory));
        Ok(())
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Validates `config` and builds a field of the given type.
    pub fn create(
        &self,
        type_name: &str,
        config: FieldConfiguration,
    ) -> Result<Box<dyn FieldPlugin>> {
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| FieldError::UnknownFieldType(type_name.to_string()))?;
        config.validate()?;
        debug!(field_type = %type_name, handle = %config.handle, "Creating field");
        Ok(factory(config, &self.services))
    }
}
