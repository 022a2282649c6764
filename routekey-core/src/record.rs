use serde_json::Value;

/// A decoded log record: the top level is always an object.
pub type Record = serde_json::Map<String, Value>;

/// Any node inside a record.
pub type Node = Value;

/// Render a resolved node the way it appears in a routing key.
///
/// Strings are inserted without quotes and floats in shortest form (`2.0` becomes `2`);
/// every other node uses its compact JSON text.
pub fn render_node(node: &Node) -> String {
    match node {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => node.to_string(),
    }
}
