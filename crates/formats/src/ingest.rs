use foundation::ids::TokenId;

use crate::ecoregion::extract_ecoregion_name;
use crate::geojson::FeatureCollection;

/// Post-load enrichment applied to a freshly parsed layer document.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ingestion {
    /// Attributes are used as-is.
    Plain,
    /// Resolve and store each feature's ecoregion name.
    EcoregionNames,
    /// Number features `TK-001`, `TK-002`, ... in document order.
    TokenIds,
}

impl Ingestion {
    pub fn apply(self, collection: &mut FeatureCollection) {
        match self {
            Ingestion::Plain => {}
            Ingestion::EcoregionNames => normalize_ecoregion_names(collection),
            Ingestion::TokenIds => assign_token_ids(collection),
        }
    }
}

pub fn assign_token_ids(collection: &mut FeatureCollection) {
    for (index, feature) in collection.features.iter_mut().enumerate() {
        feature.ingested.token_id = Some(TokenId::from_index(index));
    }
}

pub fn normalize_ecoregion_names(collection: &mut FeatureCollection) {
    for feature in &mut collection.features {
        feature.ingested.ecoregion_name = extract_ecoregion_name(&feature.properties);
    }
}
