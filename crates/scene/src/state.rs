use std::sync::Arc;

use formats::geojson::Feature;
use layers::LayerKind;
use layers::details::{DetailPanel, present};
use layers::raster::BaseMap;
use tracing::{debug, warn};

use crate::area_data::AreaData;
use crate::config::{SelectionPolicy, ViewerConfig};
use crate::selection::{FeatureRef, Selection, SelectionError, validate_target};
use crate::visibility::LayerVisibility;

/// User actions that change the view.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleLayer(LayerKind),
    SetBaseMap(BaseMap),
    Select(FeatureRef),
    ClearSelection,
}

/// Immutable snapshot of the session's view state.
///
/// Actions never mutate a snapshot; `apply` returns the next one. Consumers
/// (rendering surface, detail panel) read whichever snapshot they were given.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ViewState {
    visibility: LayerVisibility,
    selection: Selection,
    base_map: BaseMap,
    policy: SelectionPolicy,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl ViewState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            visibility: config.initial_visibility(),
            selection: Selection::Empty,
            base_map: config.default_base_map,
            policy: config.selection,
        }
    }

    pub fn visibility(&self) -> &LayerVisibility {
        &self.visibility
    }

    pub fn is_visible(&self, layer: LayerKind) -> bool {
        self.visibility.is_visible(layer)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn base_map(&self) -> BaseMap {
        self.base_map
    }

    /// Next snapshot after `action`.
    ///
    /// - `ToggleLayer` flips the layer and always clears the selection.
    /// - `SetBaseMap` clears the selection when the policy says so.
    /// - `Select` replaces the selection; a target on a hidden or unloaded
    ///   layer, or past the end of the collection, is rejected.
    pub fn apply(&self, action: Action, data: &AreaData) -> Result<Self, SelectionError> {
        let mut next = *self;
        match action {
            Action::ToggleLayer(layer) => {
                next.visibility = self.visibility.toggled(layer);
                next.selection = Selection::Empty;
            }
            Action::SetBaseMap(base_map) => {
                next.base_map = base_map;
                if self.policy.clear_on_base_map_change {
                    next.selection = Selection::Empty;
                }
            }
            Action::Select(target) => {
                let target = validate_target(target, &self.visibility, data)?;
                next.selection = Selection::Holding(target);
            }
            Action::ClearSelection => {
                next.selection = Selection::Empty;
            }
        }
        Ok(next)
    }

    /// The selected feature, if the selection is still renderable.
    ///
    /// Re-checks the selection invariant so a stale reference never reaches
    /// the detail panel.
    pub fn selected_feature<'a>(&self, data: &'a AreaData) -> Option<(LayerKind, &'a Feature)> {
        let target = self.selection.target()?;
        let target = validate_target(target, &self.visibility, data).ok()?;
        Some((target.layer, data.feature(target.layer, target.index)?))
    }

    pub fn detail_panel(&self, data: &AreaData) -> DetailPanel {
        present(self.selected_feature(data))
    }
}

/// Holds the current snapshot and swaps it on every dispatched action.
#[derive(Debug, Clone, Default)]
pub struct ViewStore {
    current: Arc<ViewState>,
}

impl ViewStore {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            current: Arc::new(ViewState::new(config)),
        }
    }

    pub fn snapshot(&self) -> Arc<ViewState> {
        Arc::clone(&self.current)
    }

    /// Applies `action`; on rejection the current snapshot stays in place.
    pub fn dispatch(
        &mut self,
        action: Action,
        data: &AreaData,
    ) -> Result<Arc<ViewState>, SelectionError> {
        match self.current.apply(action, data) {
            Ok(next) => {
                debug!(?action, "view action applied");
                self.current = Arc::new(next);
                Ok(self.snapshot())
            }
            Err(err) => {
                warn!(?action, "view action rejected: {err}");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, ViewState, ViewStore};
    use crate::area_data::AreaData;
    use crate::config::{SelectionPolicy, ViewerConfig};
    use crate::selection::{FeatureRef, Selection, SelectionError};
    use formats::geojson::{Feature, FeatureCollection};
    use layers::LayerKind;
    use layers::details::DetailPanel;
    use layers::raster::BaseMap;
    use serde_json::{Map, Value, json};

    fn feature(props: Value) -> Feature {
        let Value::Object(map) = props else {
            unreachable!()
        };
        Feature::new(map, None)
    }

    fn loaded_data() -> AreaData {
        let data = AreaData::new();
        data.publish(
            LayerKind::Publica,
            FeatureCollection {
                features: vec![
                    feature(json!({"NOMBRE": "Calilegua"})),
                    feature(json!({"NOMBRE": "Baritú"})),
                ],
            },
        );
        data.publish(
            LayerKind::Privada,
            FeatureCollection {
                features: vec![Feature::new(Map::new(), None)],
            },
        );
        data
    }

    fn selected(state: &ViewState, data: &AreaData, target: FeatureRef) -> ViewState {
        state.apply(Action::Select(target), data).expect("select")
    }

    #[test]
    fn toggling_twice_restores_visibility_and_clears_selection() {
        let data = loaded_data();
        let s0 = ViewState::default();
        for layer in LayerKind::ALL {
            let held = selected(&s0, &data, FeatureRef::new(LayerKind::Publica, 0));
            let s1 = held.apply(Action::ToggleLayer(layer), &data).expect("toggle");
            assert!(s1.selection().is_empty());
            let s2 = s1.apply(Action::ToggleLayer(layer), &data).expect("toggle");
            assert!(s2.selection().is_empty());
            assert_eq!(s2.visibility(), s0.visibility());
        }
    }

    #[test]
    fn hiding_the_selected_layer_empties_selection() {
        let data = loaded_data();
        let s = selected(
            &ViewState::default(),
            &data,
            FeatureRef::new(LayerKind::Publica, 1),
        );
        assert!(s.selected_feature(&data).is_some());

        let hidden = s
            .apply(Action::ToggleLayer(LayerKind::Publica), &data)
            .expect("toggle");
        assert!(!hidden.is_visible(LayerKind::Publica));
        assert_eq!(hidden.selection(), Selection::Empty);
        assert_eq!(hidden.detail_panel(&data), DetailPanel::empty());
    }

    #[test]
    fn select_replaces_previous_selection() {
        let data = loaded_data();
        let a = FeatureRef::new(LayerKind::Publica, 0);
        let b = FeatureRef::new(LayerKind::Publica, 1);
        let s = selected(&selected(&ViewState::default(), &data, a), &data, b);
        assert_eq!(s.selection(), Selection::Holding(b));

        let DetailPanel::Feature(detail) = s.detail_panel(&data) else {
            panic!("expected detail");
        };
        assert_eq!(detail.title, "Baritú");
    }

    #[test]
    fn select_on_hidden_or_unloaded_layer_is_rejected() {
        let data = loaded_data();
        let s = ViewState::default();
        assert_eq!(
            s.apply(Action::Select(FeatureRef::new(LayerKind::Privada, 0)), &data),
            Err(SelectionError::LayerHidden(LayerKind::Privada))
        );
        let s = s
            .apply(Action::ToggleLayer(LayerKind::Ecoregiones), &data)
            .expect("toggle");
        assert_eq!(
            s.apply(Action::Select(FeatureRef::new(LayerKind::Ecoregiones, 0)), &data),
            Err(SelectionError::LayerNotLoaded(LayerKind::Ecoregiones))
        );
    }

    #[test]
    fn base_map_change_follows_policy() {
        let data = loaded_data();
        let target = FeatureRef::new(LayerKind::Publica, 0);

        let clearing = selected(&ViewState::default(), &data, target)
            .apply(Action::SetBaseMap(BaseMap::CartoDark), &data)
            .expect("base map");
        assert_eq!(clearing.base_map(), BaseMap::CartoDark);
        assert!(clearing.selection().is_empty());

        let keep = ViewerConfig {
            selection: SelectionPolicy {
                clear_on_base_map_change: false,
            },
            ..ViewerConfig::default()
        };
        let kept = selected(&ViewState::new(&keep), &data, target)
            .apply(Action::SetBaseMap(BaseMap::Osm), &data)
            .expect("base map");
        assert_eq!(kept.selection(), Selection::Holding(target));
    }

    #[test]
    fn clear_selection_empties() {
        let data = loaded_data();
        let s = selected(
            &ViewState::default(),
            &data,
            FeatureRef::new(LayerKind::Publica, 0),
        )
        .apply(Action::ClearSelection, &data)
        .expect("clear");
        assert!(s.selection().is_empty());
    }

    #[test]
    fn store_keeps_snapshot_on_rejection() {
        let data = loaded_data();
        let mut store = ViewStore::new(&ViewerConfig::default());
        let before = store.snapshot();
        assert!(
            store
                .dispatch(Action::Select(FeatureRef::new(LayerKind::Publica, 9)), &data)
                .is_err()
        );
        assert_eq!(*store.snapshot(), *before);

        let after = store
            .dispatch(Action::ToggleLayer(LayerKind::Privada), &data)
            .expect("toggle");
        assert!(after.is_visible(LayerKind::Privada));
        // Earlier snapshots are never mutated.
        assert!(!before.is_visible(LayerKind::Privada));
    }
}
