//! Parse hooks: re-evaluate field expressions when an element is saved or moved.

use preparse_model::{Element, FieldConfiguration};
use preparse_types::FieldValue;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::plugin::HostServices;

/// Which host event is running the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookTrigger {
    BeforeSave,
    AfterMove,
}

impl HookTrigger {
    /// Whether a field opted in to this trigger.
    pub fn applies_to(&self, config: &FieldConfiguration) -> bool {
        match self {
            Self::BeforeSave => config.parse_before_save,
            Self::AfterMove => config.parse_on_move,
        }
    }
}

/// What a hook run changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookOutcome {
    /// Handles whose value was recomputed and written to the element.
    pub updated: Vec<String>,
    /// Handles whose expression failed, with the error message.
    pub failed: Vec<(String, String)>,
}

impl HookOutcome {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Evaluates field expressions against elements.
pub struct PreparseService {
    services: HostServices,
}

impl PreparseService {
    pub fn new(services: HostServices) -> Self {
        Self { services }
    }

    /// Runs every field that has `parse_before_save` set.
    pub fn before_save(&self, element: &mut Element, fields: &[FieldConfiguration]) -> HookOutcome {
        self.run(HookTrigger::BeforeSave, element, fields)
    }

    /// Runs every field that has `parse_on_move` set.
    pub fn after_move(&self, element: &mut Element, fields: &[FieldConfiguration]) -> HookOutcome {
        self.run(HookTrigger::AfterMove, element, fields)
    }

    /// Renders one field's expression and normalizes the trimmed output.
    ///
    /// Blank output yields `Null`.
    pub fn evaluate(&self, config: &FieldConfiguration, element: &Element) -> Result<FieldValue> {
        let rendered = self
            .services
            .renderer
            .render_string(&config.expression, &element.template_context())?;
        let trimmed = rendered.trim();
        if trimmed.is_empty() {
            return Ok(FieldValue::Null);
        }
        Ok(self
            .services
            .values
            .normalize(Value::String(trimmed.to_string()), config.storage_type))
    }

    fn run(
        &self,
        trigger: HookTrigger,
        element: &mut Element,
        fields: &[FieldConfiguration],
    ) -> HookOutcome {
        let mut outcome = HookOutcome::default();

        for config in fields.iter().filter(|c| trigger.applies_to(c)) {
            if config.expression.trim().is_empty() {
                continue;
            }
            match self.evaluate(config, element) {
                Ok(value) => {
                    let stored = self.services.values.serialize(&value, config.storage_type);
                    element.set_field(&config.handle, stored);
                    outcome.updated.push(config.handle.clone());
                }
                Err(e) => {
                    warn!(
                        handle = %config.handle,
                        element_id = %element.id,
                        error = %e,
                        "Preparse expression failed; keeping previous value"
                    );
                    outcome.failed.push((config.handle.clone(), e.to_string()));
                }
            }
        }

        debug!(
            ?trigger,
            element_id = %element.id,
            updated = outcome.updated.len(),
            failed = outcome.failed.len(),
            "Preparse hook finished"
        );
        outcome
    }
}
