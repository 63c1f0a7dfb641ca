//! Ecoregion name adapter.
//!
//! The ecoregion dataset comes from a KML export where the name only lives
//! inside an HTML attribute table in `description`. This adapter runs once at
//! ingestion and stores the result in `IngestedAttributes::ecoregion_name`, so
//! styling never parses markup. A source that ships a structured name column
//! is picked up by the attribute lookup and skips the markup path entirely.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::description::{attribute_label, embedded_description};

/// Attribute names checked, in order, before falling back to the description.
/// Matched case-insensitively.
pub const ECOREGION_ATTRIBUTE_KEYS: [&str; 3] = ["ECOREGION", "ECORREGION", "ECO_NAME"];

static RE_TABLE_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<td\b[^>]*>(.*?)</td\s*>").expect("regex pattern is valid")
});

static RE_MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("regex pattern is valid"));

static RE_ECOREGION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bECOREGION\b").expect("regex pattern is valid"));

/// Visible text of a cell: inline tags removed, whitespace trimmed.
fn cell_text(inner: &str) -> String {
    RE_MARKUP_TAG.replace_all(inner, "").trim().to_string()
}

pub fn ecoregion_name_from_attributes(properties: &Map<String, Value>) -> Option<String> {
    ECOREGION_ATTRIBUTE_KEYS.iter().find_map(|wanted| {
        properties
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(wanted))
            .find_map(|(_, value)| attribute_label(value))
    })
}

/// Text of the cell right after the first cell whose text holds the
/// `ECOREGION` token. Only whitespace may separate the two cells.
pub fn ecoregion_name_from_description(html: &str) -> Option<String> {
    let cells: Vec<_> = RE_TABLE_CELL
        .captures_iter(html)
        .filter_map(|caps| Some((caps.get(0)?, caps.get(1)?)))
        .collect();
    let pair = cells.windows(2).find(|pair| {
        let (key_cell, key_inner) = pair[0];
        let (value_cell, _) = pair[1];
        RE_ECOREGION_TOKEN.is_match(&cell_text(key_inner.as_str()))
            && html[key_cell.end()..value_cell.start()].trim().is_empty()
    })?;
    let name = cell_text(pair[1].1.as_str());
    (!name.is_empty()).then_some(name)
}

/// Resolves the ecoregion name of a feature: direct attribute first, then the
/// embedded description table. `None` when neither yields a non-empty name.
pub fn extract_ecoregion_name(properties: &Map<String, Value>) -> Option<String> {
    ecoregion_name_from_attributes(properties)
        .or_else(|| embedded_description(properties).and_then(ecoregion_name_from_description))
}
