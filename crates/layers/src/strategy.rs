use formats::geojson::Feature;

use crate::labels::{TITLE_LOOKUP, TOOLTIP_LOOKUP};
use crate::symbology::{BaseStyle, ECOREGION_FALLBACK_COLOR, FeatureStyle, ecoregion_color};

pub const ECOREGION_TITLE: &str = "Ecorregión";

/// Per-layer styling and labeling behavior.
///
/// Every `LayerKind` maps to exactly one strategy (see `LayerKind::strategy`),
/// so adding a layer kind forces a decision here at compile time.
pub trait LayerStrategy: Sync {
    fn base_style(&self) -> BaseStyle;

    fn style(&self, feature: &Feature) -> FeatureStyle {
        self.base_style().for_geometry(feature.geometry_kind())
    }

    /// Hover text; `None` means no tooltip is bound.
    fn tooltip(&self, feature: &Feature) -> Option<String> {
        Some(TOOLTIP_LOOKUP.resolve(&feature.properties))
    }

    fn title(&self, feature: &Feature) -> String {
        TITLE_LOOKUP.resolve(&feature.properties)
    }
}

/// Fixed-style protection/conservation layers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AreaStrategy {
    pub base: BaseStyle,
}

pub static PUBLIC_AREAS: AreaStrategy = AreaStrategy {
    base: BaseStyle::new(0x166534, 0x22c55e, 0.5, 1.5),
};

pub static PRIVATE_AREAS: AreaStrategy = AreaStrategy {
    base: BaseStyle::new(0x7c2d12, 0xf97316, 0.5, 1.5),
};

pub static CONSERVED_AREAS: AreaStrategy = AreaStrategy {
    base: BaseStyle::new(0x1e3a8a, 0x3b82f6, 0.5, 1.5),
};

impl LayerStrategy for AreaStrategy {
    fn base_style(&self) -> BaseStyle {
        self.base
    }
}

/// Ecoregions are colored by name; the name is resolved at ingestion.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EcoregionStrategy;

pub static ECOREGION_STRATEGY: EcoregionStrategy = EcoregionStrategy;

impl LayerStrategy for EcoregionStrategy {
    fn base_style(&self) -> BaseStyle {
        BaseStyle {
            stroke_color: ECOREGION_FALLBACK_COLOR,
            fill_color: ECOREGION_FALLBACK_COLOR,
            fill_opacity: 0.35,
            stroke_weight: 1.0,
        }
    }

    fn style(&self, feature: &Feature) -> FeatureStyle {
        let color = ecoregion_color(feature.ingested.ecoregion_name.as_deref());
        BaseStyle {
            stroke_color: color,
            fill_color: color,
            ..self.base_style()
        }
        .for_geometry(feature.geometry_kind())
    }

    fn tooltip(&self, feature: &Feature) -> Option<String> {
        let name = feature.ingested.ecoregion_name.as_deref()?;
        Some(format!("{ECOREGION_TITLE}: {name}"))
    }

    fn title(&self, _feature: &Feature) -> String {
        ECOREGION_TITLE.to_string()
    }
}

/// Tokenizable parcels are labeled by their `TK-###` id.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TokenizableStrategy {
    pub base: BaseStyle,
}

pub static TOKENIZABLE_STRATEGY: TokenizableStrategy = TokenizableStrategy {
    base: BaseStyle::new(0x92400e, 0xeab308, 0.6, 1.0),
};

impl LayerStrategy for TokenizableStrategy {
    fn base_style(&self) -> BaseStyle {
        self.base
    }

    fn tooltip(&self, feature: &Feature) -> Option<String> {
        Some(self.title(feature))
    }

    fn title(&self, feature: &Feature) -> String {
        match feature.ingested.token_id {
            Some(id) => id.to_string(),
            None => TITLE_LOOKUP.resolve(&feature.properties),
        }
    }
}
