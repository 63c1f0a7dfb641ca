use formats::description::{attribute_text, embedded_description};
use formats::geojson::Feature;
use formats::sanitize::sanitize_description_html;
use serde::Serialize;

use crate::layer::LayerKind;

pub const EMPTY_SELECTION_MESSAGE: &str = "Ninguna parcela seleccionada todavía.";
pub const UNKNOWN_GEOMETRY_LABEL: &str = "Desconocido";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRow {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum DetailBody {
    /// Sanitized embedded description markup.
    Html(String),
    /// Every attribute, in document order.
    Attributes(Vec<AttributeRow>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureDetail {
    pub layer: LayerKind,
    pub title: String,
    pub geometry_kind: String,
    pub body: DetailBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailPanel {
    Empty { message: &'static str },
    Feature(FeatureDetail),
}

impl DetailPanel {
    pub fn empty() -> Self {
        DetailPanel::Empty {
            message: EMPTY_SELECTION_MESSAGE,
        }
    }
}

/// Detail panel contents for the current selection.
pub fn present(selected: Option<(LayerKind, &Feature)>) -> DetailPanel {
    match selected {
        None => DetailPanel::empty(),
        Some((layer, feature)) => DetailPanel::Feature(describe(layer, feature)),
    }
}

pub fn describe(layer: LayerKind, feature: &Feature) -> FeatureDetail {
    FeatureDetail {
        layer,
        title: layer.strategy().title(feature),
        geometry_kind: feature
            .geometry_kind()
            .map_or(UNKNOWN_GEOMETRY_LABEL, |k| k.as_str())
            .to_string(),
        body: detail_body(feature),
    }
}

fn detail_body(feature: &Feature) -> DetailBody {
    let html = embedded_description(&feature.properties)
        .map(sanitize_description_html)
        .filter(|s| !s.is_empty());
    if let Some(html) = html {
        return DetailBody::Html(html);
    }
    DetailBody::Attributes(
        feature
            .properties
            .iter()
            .map(|(key, value)| AttributeRow {
                key: key.clone(),
                value: attribute_text(value),
            })
            .collect(),
    )
}
