use serde_json::{Map, Value};

pub const DESCRIPTION_KEY: &str = "description";

/// Returns the raw embedded HTML description of a feature, if any.
///
/// KML conversions emit either a plain string or an object carrying the
/// markup under `@value`; both are accepted. Empty strings count as absent.
pub fn embedded_description(properties: &Map<String, Value>) -> Option<&str> {
    let raw = match properties.get(DESCRIPTION_KEY)? {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("@value")?.as_str()?,
        _ => return None,
    };
    (!raw.trim().is_empty()).then_some(raw)
}

/// Display spelling of an attribute value in a key/value listing.
///
/// Strings are shown verbatim, scalars in their JSON spelling, and nested
/// values as compact JSON.
pub fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text of a scalar attribute suitable for a label, trimmed; `None` if empty.
pub fn attribute_label(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
