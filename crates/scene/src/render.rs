use formats::geojson::Feature;
use layers::LayerKind;
use layers::raster::TileProvider;
use layers::symbology::FeatureStyle;
use serde::Serialize;

use crate::area_data::AreaData;
use crate::selection::FeatureRef;
use crate::state::ViewState;

/// Margin added around a layer's extent when fitting the map to it.
pub const FIT_BOUNDS_PADDING: f64 = 0.05;

/// What the rendering surface needs for one feature: a style, an optional
/// tooltip, and the reference to dispatch when the shape is activated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureBinding<'a> {
    pub target: FeatureRef,
    pub style: FeatureStyle,
    pub tooltip: Option<String>,
    pub selected: bool,
    #[serde(skip)]
    pub feature: &'a Feature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerRender<'a> {
    pub layer: LayerKind,
    pub label: &'static str,
    /// `[[south, west], [north, east]]`, padded; `None` without coordinates.
    pub fit_bounds: Option<[[f64; 2]; 2]>,
    pub features: Vec<FeatureBinding<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan<'a> {
    pub base_map: &'static TileProvider,
    pub layers: Vec<LayerRender<'a>>,
}

/// Builds the draw list for a snapshot.
///
/// Ordering contract:
/// - Layers appear in registry order; only layers both visible and loaded.
/// - Features keep their collection order.
pub fn render_plan<'a>(state: &ViewState, data: &'a AreaData) -> RenderPlan<'a> {
    let selected = state.selection().target();
    let layers = state
        .visibility()
        .visible_layers()
        .filter_map(|layer| {
            let collection = data.collection(layer)?;
            let strategy = layer.strategy();
            let features = collection
                .features
                .iter()
                .enumerate()
                .map(|(index, feature)| {
                    let target = FeatureRef::new(layer, index);
                    let is_selected = selected == Some(target);
                    let style = strategy.style(feature);
                    FeatureBinding {
                        target,
                        style: if is_selected { style.highlighted() } else { style },
                        tooltip: strategy.tooltip(feature),
                        selected: is_selected,
                        feature,
                    }
                })
                .collect();
            let fit_bounds = collection
                .bounds()
                .filter(|b| b.is_valid())
                .map(|b| {
                    let b = b.pad(FIT_BOUNDS_PADDING);
                    [[b.min[1], b.min[0]], [b.max[1], b.max[0]]]
                });
            Some(LayerRender {
                layer,
                label: layer.label(),
                fit_bounds,
                features,
            })
        })
        .collect();

    RenderPlan {
        base_map: state.base_map().provider(),
        layers,
    }
}
