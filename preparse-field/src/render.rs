//! Liquid-backed [`TemplateRenderer`].

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{FieldError, Result};
use crate::host::TemplateRenderer;

/// Path of the field settings template.
pub const SETTINGS_TEMPLATE: &str = "preparse-field/_components/fields/_settings";
/// Path of the field input template.
pub const INPUT_TEMPLATE: &str = "preparse-field/_components/fields/_input";

const INLINE_TEMPLATE_NAME: &str = "<expression>";

/// Renders named templates and inline expressions with Liquid.
///
/// Named templates are parsed once, when registered. The field's own
/// settings and input templates are registered up front; hosts can override
/// them or add more with [`LiquidRenderer::with_template`].
pub struct LiquidRenderer {
    parser: liquid::Parser,
    templates: HashMap<String, liquid::Template>,
}

impl LiquidRenderer {
    pub fn new() -> Result<Self> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| FieldError::TemplateParse {
                name: "<parser>".to_string(),
                message: e.to_string(),
            })?;

        Self {
            parser,
            templates: HashMap::new(),
        }
        .with_template(SETTINGS_TEMPLATE, include_str!("../templates/_settings.liquid"))?
        .with_template(INPUT_TEMPLATE, include_str!("../templates/_input.liquid"))
    }

    /// Parses and registers (or replaces) a named template.
    pub fn with_template(mut self, path: impl Into<String>, source: &str) -> Result<Self> {
        let path = path.into();
        let template = self.parse(&path, source)?;
        self.templates.insert(path, template);
        Ok(self)
    }

    fn parse(&self, name: &str, source: &str) -> Result<liquid::Template> {
        self.parser
            .parse(source)
            .map_err(|e| FieldError::TemplateParse {
                name: name.to_string(),
                message: e.to_string(),
            })
    }
}

impl TemplateRenderer for LiquidRenderer {
    fn render_template(&self, path: &str, context: &Value) -> Result<String> {
        let template = self
            .templates
            .get(path)
            .ok_or_else(|| FieldError::TemplateNotFound(path.to_string()))?;
        render(path, template, context)
    }

    fn render_string(&self, template: &str, context: &Value) -> Result<String> {
        let parsed = self.parse(INLINE_TEMPLATE_NAME, template)?;
        render(INLINE_TEMPLATE_NAME, &parsed, context)
    }
}

fn render(name: &str, template: &liquid::Template, context: &Value) -> Result<String> {
    let render_error = |e: liquid::Error| FieldError::TemplateRender {
        name: name.to_string(),
        message: e.to_string(),
    };
    let globals = liquid::model::to_object(context).map_err(render_error)?;
    template.render(&globals).map_err(render_error)
}
