use formats::description::attribute_label;
use serde_json::{Map, Value};

/// Attribute keys tried, in order, when a feature needs a human-readable name:
/// name-like fields first, then identifier-like fields.
pub const NAME_PRIORITY_KEYS: [&str; 5] = ["NOMBRE", "Nombre", "name", "ID", "id"];

pub const TOOLTIP_FALLBACK: &str = "Parcela";
pub const TITLE_FALLBACK: &str = "Parcela seleccionada";

/// Ordered fallback chain over feature attributes ending in a placeholder.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeLookup {
    pub keys: &'static [&'static str],
    pub fallback: &'static str,
}

pub const TOOLTIP_LOOKUP: AttributeLookup = AttributeLookup {
    keys: &NAME_PRIORITY_KEYS,
    fallback: TOOLTIP_FALLBACK,
};

pub const TITLE_LOOKUP: AttributeLookup = AttributeLookup {
    keys: &NAME_PRIORITY_KEYS,
    fallback: TITLE_FALLBACK,
};

impl AttributeLookup {
    /// First non-empty attribute among `keys`, if any.
    pub fn find(&self, properties: &Map<String, Value>) -> Option<String> {
        self.keys
            .iter()
            .find_map(|key| properties.get(*key).and_then(attribute_label))
    }

    /// Never fails: falls back to the placeholder.
    pub fn resolve(&self, properties: &Map<String, Value>) -> String {
        self.find(properties)
            .unwrap_or_else(|| self.fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{TITLE_LOOKUP, TOOLTIP_LOOKUP};
    use serde_json::{Map, Value, json};

    fn props(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn name_fields_beat_identifier_fields() {
        let p = props(json!({"id": "x-1", "name": "Yala", "ID": "X1"}));
        assert_eq!(TOOLTIP_LOOKUP.resolve(&p), "Yala");

        let p = props(json!({"NOMBRE": "Calilegua", "Nombre": "otra"}));
        assert_eq!(TOOLTIP_LOOKUP.resolve(&p), "Calilegua");
    }

    #[test]
    fn empty_values_are_skipped() {
        let p = props(json!({"NOMBRE": "  ", "Nombre": null, "ID": 17}));
        assert_eq!(TOOLTIP_LOOKUP.resolve(&p), "17");
    }

    #[test]
    fn falls_back_to_placeholders() {
        let p = props(json!({"area_ha": 10}));
        assert_eq!(TOOLTIP_LOOKUP.resolve(&p), "Parcela");
        assert_eq!(TITLE_LOOKUP.resolve(&p), "Parcela seleccionada");
        assert_eq!(TITLE_LOOKUP.find(&p), None);
    }
}
