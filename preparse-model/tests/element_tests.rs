use preparse_model::Element;
use preparse_types::ElementId;
use serde_json::json;

fn make_element(data: serde_json::Value) -> Element {
    Element::new("entry").with_title("Hello").with_data(data)
}

// ── Construction & fields ────────────────────────────────────────

#[test]
fn new_element_has_empty_object_data() {
    let e = Element::new("entry");
    assert_eq!(e.element_type, "entry");
    assert_eq!(e.data, json!({}));
    assert!(e.title.is_none());
    assert!(e.parent_id.is_none());
}

#[test]
fn field_reads_by_handle() {
    let e = make_element(json!({"price": 12.5, "summary": "x"}));
    assert_eq!(e.field("price"), Some(&json!(12.5)));
    assert_eq!(e.field("missing"), None);
}

#[test]
fn set_field_inserts_and_overwrites() {
    let mut e = make_element(json!({"summary": "old"}));
    e.set_field("summary", json!("new"));
    e.set_field("count", json!(3));
    assert_eq!(e.data, json!({"summary": "new", "count": 3}));
}

#[test]
fn set_field_replaces_non_object_data() {
    let mut e = make_element(json!("scalar"));
    e.set_field("summary", json!("x"));
    assert_eq!(e.data, json!({"summary": "x"}));
}

// ── Template context ─────────────────────────────────────────────

#[test]
fn template_context_exposes_content_and_identity() {
    let mut e = make_element(json!({"price": 10}));
    let parent = ElementId::new();
    e.parent_id = Some(parent);

    let ctx = e.template_context();
    assert_eq!(ctx["element"]["price"], json!(10));
    assert_eq!(ctx["element"]["title"], json!("Hello"));
    assert_eq!(ctx["element"]["type"], json!("entry"));
    assert_eq!(ctx["element"]["id"], json!(e.id.to_string()));
    assert_eq!(ctx["element"]["parentId"], json!(parent.to_string()));
}

#[test]
fn template_context_identity_wins_over_content_keys() {
    let e = make_element(json!({"title": "from data", "id": "bogus"}));
    let ctx = e.template_context();
    assert_eq!(ctx["element"]["title"], json!("Hello"));
    assert_eq!(ctx["element"]["id"], json!(e.id.to_string()));
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn element_deserializes_without_optional_keys() {
    let id = ElementId::new();
    let e: Element = serde_json::from_value(json!({
        "id": id.to_string(),
        "element_type": "category",
    }))
    .unwrap();
    assert_eq!(e.id, id);
    assert_eq!(e.data, json!({}));
}
