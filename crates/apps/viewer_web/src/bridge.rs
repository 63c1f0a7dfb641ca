//! JSON-facing views over the session state, kept free of `wasm_bindgen` so
//! they can be tested natively.

use std::sync::Arc;

use layers::LayerKind;
use layers::raster::{BaseMap, TileProvider};
use scene::{
    Action, AreaData, FeatureBinding, RenderPlan, SelectionError, ViewState, ViewStore,
    ViewerConfig,
};
use serde::Serialize;
use serde_json::Value;

/// One row of the layer toggle control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerControl {
    pub id: &'static str,
    pub label: &'static str,
    pub visible: bool,
    pub loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseMapOption {
    #[serde(flatten)]
    pub provider: &'static TileProvider,
    pub active: bool,
}

/// A render-plan feature plus the GeoJSON the map library draws.
#[derive(Debug, Serialize)]
pub struct PlanFeature<'p, 'a> {
    #[serde(flatten)]
    pub binding: &'p FeatureBinding<'a>,
    pub geojson: Value,
}

#[derive(Debug, Serialize)]
pub struct PlanLayer<'p, 'a> {
    pub layer: LayerKind,
    pub label: &'static str,
    pub fit_bounds: Option<[[f64; 2]; 2]>,
    pub features: Vec<PlanFeature<'p, 'a>>,
}

#[derive(Debug, Serialize)]
pub struct PlanView<'p, 'a> {
    pub base_map: &'static TileProvider,
    pub layers: Vec<PlanLayer<'p, 'a>>,
}

pub fn layer_controls(state: &ViewState, data: &AreaData) -> Vec<LayerControl> {
    LayerKind::ALL
        .into_iter()
        .map(|layer| LayerControl {
            id: layer.id(),
            label: layer.label(),
            visible: state.is_visible(layer),
            loaded: data.is_loaded(layer),
        })
        .collect()
}

pub fn base_map_options(state: &ViewState) -> Vec<BaseMapOption> {
    BaseMap::ALL
        .into_iter()
        .map(|base_map| BaseMapOption {
            provider: base_map.provider(),
            active: state.base_map() == base_map,
        })
        .collect()
}

pub fn plan_view<'p, 'a>(plan: &'p RenderPlan<'a>) -> PlanView<'p, 'a> {
    PlanView {
        base_map: plan.base_map,
        layers: plan
            .layers
            .iter()
            .map(|layer| PlanLayer {
                layer: layer.layer,
                label: layer.label,
                fit_bounds: layer.fit_bounds,
                features: layer
                    .features
                    .iter()
                    .map(|binding| PlanFeature {
                        binding,
                        geojson: binding.feature.to_geojson_value(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Browser session: the view store plus the shared loaded collections.
#[derive(Debug)]
pub struct Session {
    pub store: ViewStore,
    pub data: Arc<AreaData>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl Session {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            store: ViewStore::new(config),
            data: Arc::new(AreaData::new()),
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Result<(), SelectionError> {
        self.store.dispatch(action, &self.data).map(|_| ())
    }

    pub fn layer_controls_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&layer_controls(&self.store.snapshot(), &self.data))
    }

    pub fn base_maps_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&base_map_options(&self.store.snapshot()))
    }

    pub fn render_plan_json(&self) -> serde_json::Result<String> {
        let state = self.store.snapshot();
        let plan = scene::render_plan(&state, &self.data);
        serde_json::to_string(&plan_view(&plan))
    }

    pub fn detail_view_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.store.snapshot().detail_panel(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use formats::geojson::FeatureCollection;
    use layers::LayerKind;
    use layers::raster::BaseMap;
    use pretty_assertions::assert_eq;
    use scene::{Action, FeatureRef};
    use serde_json::Value;

    fn session() -> Session {
        let session = Session::default();
        let mut fc = FeatureCollection::from_geojson_str(include_str!(
            "../assets/data/neatogeo_ProteccionPublica.geojson"
        ))
        .expect("parse");
        LayerKind::Publica.ingestion().apply(&mut fc);
        session.data.publish(LayerKind::Publica, fc);
        session
    }

    fn json(s: serde_json::Result<String>) -> Value {
        serde_json::from_str(&s.expect("serialize")).expect("valid json")
    }

    #[test]
    fn layer_controls_list_every_layer() {
        let v = json(session().layer_controls_json());
        let rows = v.as_array().expect("array");
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0]["id"], "publica");
        assert_eq!(rows[0]["visible"], true);
        assert_eq!(rows[0]["loaded"], true);
        assert_eq!(rows[1]["id"], "privada");
        assert_eq!(rows[1]["loaded"], false);
    }

    #[test]
    fn base_maps_mark_the_active_one() {
        let mut s = session();
        s.dispatch(Action::SetBaseMap(BaseMap::CartoDark)).expect("set");
        let v = json(s.base_maps_json());
        let active: Vec<&str> = v
            .as_array()
            .expect("array")
            .iter()
            .filter(|o| o["active"] == true)
            .filter_map(|o| o["id"].as_str())
            .collect();
        assert_eq!(active, vec!["cartoDark"]);
    }

    #[test]
    fn render_plan_carries_geojson_and_target() {
        let v = json(session().render_plan_json());
        let feature = &v["layers"][0]["features"][0];
        assert_eq!(feature["target"]["layer"], "publica");
        assert_eq!(feature["geojson"]["type"], "Feature");
        assert_eq!(feature["geojson"]["geometry"]["type"], "Polygon");
        assert_eq!(feature["tooltip"], "Parque Nacional Calilegua");
    }

    #[test]
    fn detail_view_follows_selection() {
        let mut s = session();
        assert_eq!(json(s.detail_view_json())["state"], "empty");
        s.dispatch(Action::Select(FeatureRef::new(LayerKind::Publica, 0)))
            .expect("select");
        let v = json(s.detail_view_json());
        assert_eq!(v["title"], "Parque Nacional Calilegua");
        assert!(
            s.dispatch(Action::Select(FeatureRef::new(LayerKind::Publica, 9)))
                .is_err()
        );
        assert_eq!(json(s.detail_view_json())["title"], "Parque Nacional Calilegua");
    }
}
