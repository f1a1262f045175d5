use preparse_types::ElementId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// A content element as the field sees it.
///
/// `data` holds arbitrary JSON: the element's content attributes plus the
/// stored value of every field, keyed by field handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Structure parent. Changes when the element is moved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
    #[serde(default = "empty_object")]
    pub data: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Element {
    /// Creates an element with a fresh id and no content.
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            element_type: element_type.into(),
            title: None,
            parent_id: None,
            data: empty_object(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Stored value of the field with this handle.
    pub fn field(&self, handle: &str) -> Option<&Value> {
        self.data.get(handle)
    }

    /// Writes a field value, turning `data` into an object if it is not one.
    pub fn set_field(&mut self, handle: &str, value: Value) {
        if !self.data.is_object() {
            self.data = empty_object();
        }
        if let Value::Object(map) = &mut self.data {
            map.insert(handle.to_string(), value);
        }
    }

    /// Variables available to a field expression: `{"element": {...}}`.
    ///
    /// The element object carries `id`, `type`, `title` and `parentId`
    /// alongside every key of `data`. Content keys never shadow those four.
    pub fn template_context(&self) -> Value {
        let mut element = match &self.data {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        element.insert("id".into(), json!(self.id.to_string()));
        element.insert("type".into(), json!(self.element_type));
        element.insert("title".into(), json!(self.title));
        element.insert(
            "parentId".into(),
            json!(self.parent_id.map(|p| p.to_string())),
        );
        json!({ "element": element })
    }
}
