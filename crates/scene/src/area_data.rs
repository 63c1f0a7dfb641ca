use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use formats::geojson::{Feature, FeatureCollection};
use layers::LayerKind;

/// Per-layer load state as seen by consumers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded { features: usize },
}

/// Progress of the one load attempt each layer gets per session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum LoadAttempt {
    NotAttempted = 0,
    InFlight = 1,
    Failed = 2,
    Loaded = 3,
}

impl LoadAttempt {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => LoadAttempt::InFlight,
            2 => LoadAttempt::Failed,
            3 => LoadAttempt::Loaded,
            _ => LoadAttempt::NotAttempted,
        }
    }
}

/// Loaded layer collections, one write-once slot per registered layer.
///
/// A slot is filled at most once per session; later writes are ignored and
/// the first collection stays. Readers share collections through `Arc`.
/// Alongside each slot sits the layer's attempt state: a layer is fetched at
/// most once, and a failed layer stays unloaded for the session.
#[derive(Debug)]
pub struct AreaData {
    slots: [OnceLock<Arc<FeatureCollection>>; LayerKind::COUNT],
    attempts: [AtomicU8; LayerKind::COUNT],
}

impl Default for AreaData {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| OnceLock::new()),
            attempts: std::array::from_fn(|_| AtomicU8::new(LoadAttempt::NotAttempted as u8)),
        }
    }
}

impl AreaData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `collection` for `layer`.
    ///
    /// Returns `false` (and drops `collection`) if the layer was already loaded.
    pub fn publish(&self, layer: LayerKind, collection: FeatureCollection) -> bool {
        let fresh = self.slots[layer.index()].set(Arc::new(collection)).is_ok();
        self.attempts[layer.index()].store(LoadAttempt::Loaded as u8, Ordering::Release);
        fresh
    }

    /// Claims the layer's single load attempt.
    ///
    /// Succeeds only from `NotAttempted`; otherwise returns the state that
    /// blocked the claim and the caller must not fetch.
    pub fn begin_load(&self, layer: LayerKind) -> Result<(), LoadAttempt> {
        self.attempts[layer.index()]
            .compare_exchange(
                LoadAttempt::NotAttempted as u8,
                LoadAttempt::InFlight as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(LoadAttempt::from_raw)
    }

    /// Records a failed attempt. Has no effect once the layer is loaded.
    pub fn mark_failed(&self, layer: LayerKind) {
        let _ = self.attempts[layer.index()].compare_exchange(
            LoadAttempt::InFlight as u8,
            LoadAttempt::Failed as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub fn attempt(&self, layer: LayerKind) -> LoadAttempt {
        LoadAttempt::from_raw(self.attempts[layer.index()].load(Ordering::Acquire))
    }

    pub fn collection(&self, layer: LayerKind) -> Option<&Arc<FeatureCollection>> {
        self.slots[layer.index()].get()
    }

    pub fn feature(&self, layer: LayerKind, index: usize) -> Option<&Feature> {
        self.collection(layer)?.get(index)
    }

    pub fn is_loaded(&self, layer: LayerKind) -> bool {
        self.collection(layer).is_some()
    }

    pub fn load_state(&self, layer: LayerKind) -> LoadState {
        match self.collection(layer) {
            Some(c) => LoadState::Loaded {
                features: c.len(),
            },
            None => LoadState::NotLoaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AreaData, LoadAttempt, LoadState};
    use formats::geojson::{Feature, FeatureCollection};
    use layers::LayerKind;
    use serde_json::Map;

    fn collection(n: usize) -> FeatureCollection {
        FeatureCollection {
            features: (0..n).map(|_| Feature::new(Map::new(), None)).collect(),
        }
    }

    #[test]
    fn slots_start_empty_and_fill_once() {
        let data = AreaData::new();
        for kind in LayerKind::ALL {
            assert_eq!(data.load_state(kind), LoadState::NotLoaded);
        }

        assert!(data.publish(LayerKind::Privada, collection(2)));
        assert!(!data.publish(LayerKind::Privada, collection(5)));
        assert_eq!(
            data.load_state(LayerKind::Privada),
            LoadState::Loaded { features: 2 }
        );
        assert!(!data.is_loaded(LayerKind::Publica));
    }

    #[test]
    fn feature_lookup_checks_bounds() {
        let data = AreaData::new();
        data.publish(LayerKind::Publica, collection(1));
        assert!(data.feature(LayerKind::Publica, 0).is_some());
        assert!(data.feature(LayerKind::Publica, 1).is_none());
        assert!(data.feature(LayerKind::Privada, 0).is_none());
    }

    #[test]
    fn each_layer_gets_one_attempt() {
        let data = AreaData::new();
        assert_eq!(data.attempt(LayerKind::Privada), LoadAttempt::NotAttempted);
        assert_eq!(data.begin_load(LayerKind::Privada), Ok(()));
        assert_eq!(
            data.begin_load(LayerKind::Privada),
            Err(LoadAttempt::InFlight)
        );

        data.mark_failed(LayerKind::Privada);
        assert_eq!(data.begin_load(LayerKind::Privada), Err(LoadAttempt::Failed));
        assert_eq!(data.load_state(LayerKind::Privada), LoadState::NotLoaded);

        assert_eq!(data.begin_load(LayerKind::Publica), Ok(()));
        data.publish(LayerKind::Publica, collection(1));
        data.mark_failed(LayerKind::Publica);
        assert_eq!(data.attempt(LayerKind::Publica), LoadAttempt::Loaded);
        assert_eq!(data.begin_load(LayerKind::Publica), Err(LoadAttempt::Loaded));
    }
}
