use formats::ingest::Ingestion;
use serde::{Deserialize, Serialize};

use crate::strategy::{
    CONSERVED_AREAS, ECOREGION_STRATEGY, LayerStrategy, PRIVATE_AREAS, PUBLIC_AREAS,
    TOKENIZABLE_STRATEGY,
};

/// Closed set of feature layers the viewer knows about.
///
/// Ordering contract:
/// - `LayerKind::ALL` is the registry order; controls, loading and rendering
///   all iterate layers in this order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Publica,
    Privada,
    Conservadas,
    Ecoregiones,
    Tokenizables,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDefinition {
    pub kind: LayerKind,
    pub id: &'static str,
    pub label: &'static str,
    /// Path of the GeoJSON document, relative to the data root.
    pub source_path: &'static str,
    pub visible_by_default: bool,
}

pub static LAYER_DEFINITIONS: [LayerDefinition; LayerKind::COUNT] = [
    LayerDefinition {
        kind: LayerKind::Publica,
        id: "publica",
        label: "Áreas de protección pública",
        source_path: "data/neatogeo_ProteccionPublica.geojson",
        visible_by_default: true,
    },
    LayerDefinition {
        kind: LayerKind::Privada,
        id: "privada",
        label: "Áreas de protección privada",
        source_path: "data/neatogeo_ProteccionPrivada.geojson",
        visible_by_default: false,
    },
    LayerDefinition {
        kind: LayerKind::Conservadas,
        id: "conservadas",
        label: "Áreas conservadas",
        source_path: "data/neatogeo_AreasConservadas.geojson",
        visible_by_default: false,
    },
    LayerDefinition {
        kind: LayerKind::Ecoregiones,
        id: "ecoregiones",
        label: "Ecorregiones",
        source_path: "data/neatogeo_Ecoregiones_Argentina.geojson",
        visible_by_default: false,
    },
    LayerDefinition {
        kind: LayerKind::Tokenizables,
        id: "tokenizables",
        label: "Parcelas tokenizables",
        source_path: "data/neatogeo_Tokenizables.geojson",
        visible_by_default: false,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLayer(pub String);

impl std::fmt::Display for UnknownLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown layer: {:?}", self.0)
    }
}

impl std::error::Error for UnknownLayer {}

impl LayerKind {
    pub const COUNT: usize = 5;

    pub const ALL: [LayerKind; LayerKind::COUNT] = [
        LayerKind::Publica,
        LayerKind::Privada,
        LayerKind::Conservadas,
        LayerKind::Ecoregiones,
        LayerKind::Tokenizables,
    ];

    /// Position in `ALL`; dense per-layer tables are indexed with it.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn definition(self) -> &'static LayerDefinition {
        &LAYER_DEFINITIONS[self.index()]
    }

    pub fn id(self) -> &'static str {
        self.definition().id
    }

    pub fn label(self) -> &'static str {
        self.definition().label
    }

    pub fn source_path(self) -> &'static str {
        self.definition().source_path
    }

    pub fn ingestion(self) -> Ingestion {
        match self {
            LayerKind::Ecoregiones => Ingestion::EcoregionNames,
            LayerKind::Tokenizables => Ingestion::TokenIds,
            LayerKind::Publica | LayerKind::Privada | LayerKind::Conservadas => Ingestion::Plain,
        }
    }

    pub fn strategy(self) -> &'static dyn LayerStrategy {
        match self {
            LayerKind::Publica => &PUBLIC_AREAS,
            LayerKind::Privada => &PRIVATE_AREAS,
            LayerKind::Conservadas => &CONSERVED_AREAS,
            LayerKind::Ecoregiones => &ECOREGION_STRATEGY,
            LayerKind::Tokenizables => &TOKENIZABLE_STRATEGY,
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for LayerKind {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| UnknownLayer(s.to_string()))
    }
}
