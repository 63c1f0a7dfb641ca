use std::fmt;
use std::sync::Arc;

use formats::geojson::{FeatureCollection, GeoJsonError};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use layers::LayerKind;
use scene::{AreaData, LoadAttempt};
use tracing::{error, info};

use crate::source::{GeometrySource, SourceError};

/// Result of one successful layer load.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub layer: LayerKind,
    pub features: usize,
    /// `false` when the layer was already loaded and nothing was fetched.
    pub fresh: bool,
}

#[derive(Debug)]
pub enum LoadError {
    Source {
        layer: LayerKind,
        source: SourceError,
    },
    Parse {
        layer: LayerKind,
        source: GeoJsonError,
    },
    /// An earlier attempt failed; failed layers are not retried.
    PreviouslyFailed { layer: LayerKind },
    /// Another load of the same layer has not settled yet.
    InFlight { layer: LayerKind },
}

impl LoadError {
    pub fn layer(&self) -> LayerKind {
        match self {
            LoadError::Source { layer, .. }
            | LoadError::Parse { layer, .. }
            | LoadError::PreviouslyFailed { layer }
            | LoadError::InFlight { layer } => *layer,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Source { layer, source } => write!(f, "layer {layer}: {source}"),
            LoadError::Parse { layer, source } => write!(f, "layer {layer}: {source}"),
            LoadError::PreviouslyFailed { layer } => {
                write!(f, "layer {layer}: earlier load failed, not retried")
            }
            LoadError::InFlight { layer } => write!(f, "layer {layer}: load already in progress"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Source { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
            LoadError::PreviouslyFailed { .. } | LoadError::InFlight { .. } => None,
        }
    }
}

/// Fills an `AreaData` from a `GeometrySource`, one layer at a time or all
/// layers concurrently.
///
/// Failures stay local to their layer: the slot remains empty for the session
/// and the error is logged and returned. Nothing is retried.
pub struct AreaDataLoader<S> {
    source: S,
    data: Arc<AreaData>,
}

impl<S: GeometrySource> AreaDataLoader<S> {
    pub fn new(source: S, data: Arc<AreaData>) -> Self {
        Self { source, data }
    }

    pub fn data(&self) -> &Arc<AreaData> {
        &self.data
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Loads `layer` unless it was already attempted this session.
    ///
    /// The document is parsed and run through the layer's ingestion step
    /// (token ids, ecoregion names) before it is published. A loaded layer
    /// answers without fetching; a failed or in-flight one is refused.
    pub async fn load(&self, layer: LayerKind) -> Result<LoadOutcome, LoadError> {
        match self.data.begin_load(layer) {
            Ok(()) => {}
            Err(LoadAttempt::Failed) => return Err(LoadError::PreviouslyFailed { layer }),
            Err(LoadAttempt::InFlight) => return Err(LoadError::InFlight { layer }),
            Err(LoadAttempt::Loaded | LoadAttempt::NotAttempted) => {
                return Ok(LoadOutcome {
                    layer,
                    features: self.data.collection(layer).map_or(0, |c| c.len()),
                    fresh: false,
                });
            }
        }

        let path = layer.source_path();
        let result = self.fetch_collection(layer, path).await;
        match result {
            Ok(collection) => {
                let features = collection.len();
                let fresh = self.data.publish(layer, collection);
                if fresh {
                    info!("loaded layer {layer}: {features} features");
                }
                let features = self.data.collection(layer).map_or(features, |c| c.len());
                Ok(LoadOutcome {
                    layer,
                    features,
                    fresh,
                })
            }
            Err(err) => {
                self.data.mark_failed(layer);
                error!(
                    "layer load failed: {layer} ({}) -> {err}",
                    self.source.describe(path)
                );
                Err(err)
            }
        }
    }

    async fn fetch_collection(
        &self,
        layer: LayerKind,
        path: &str,
    ) -> Result<FeatureCollection, LoadError> {
        let text = self
            .source
            .fetch(path)
            .await
            .map_err(|source| LoadError::Source { layer, source })?;
        let mut collection = FeatureCollection::from_geojson_str(&text)
            .map_err(|source| LoadError::Parse { layer, source })?;
        layer.ingestion().apply(&mut collection);
        Ok(collection)
    }

    /// Loads every registered layer concurrently on the caller's task.
    ///
    /// `on_complete` runs once per layer, in completion order, as soon as that
    /// layer settles; a slow or failing layer never delays the others.
    pub async fn load_all<F>(&self, on_complete: F) -> Vec<Result<LoadOutcome, LoadError>>
    where
        F: FnMut(&Result<LoadOutcome, LoadError>),
    {
        self.load_layers(LayerKind::ALL, on_complete).await
    }

    pub async fn load_layers<I, F>(
        &self,
        layers: I,
        mut on_complete: F,
    ) -> Vec<Result<LoadOutcome, LoadError>>
    where
        I: IntoIterator<Item = LayerKind>,
        F: FnMut(&Result<LoadOutcome, LoadError>),
    {
        let mut pending: FuturesUnordered<_> =
            layers.into_iter().map(|layer| self.load(layer)).collect();
        let mut results = Vec::with_capacity(pending.len());
        while let Some(result) = pending.next().await {
            on_complete(&result);
            results.push(result);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::{AreaDataLoader, LoadError};
    use crate::source::{GeometrySource, SourceError};
    use formats::geojson::FeatureCollection;
    use layers::LayerKind;
    use pretty_assertions::assert_eq;
    use scene::{Action, AreaData, FeatureRef, LoadState, ViewState, render_plan};
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::sync::Arc;

    const PUBLICA: &str =
        include_str!("../../apps/viewer_web/assets/data/neatogeo_ProteccionPublica.geojson");
    const ECOREGIONES: &str =
        include_str!("../../apps/viewer_web/assets/data/neatogeo_Ecoregiones_Argentina.geojson");

    /// Serves fixed documents by path; unknown paths answer HTTP 500.
    #[derive(Default)]
    struct MemorySource {
        docs: HashMap<&'static str, String>,
        slow: Option<&'static str>,
        /// Answer the first fetch with HTTP 503, whatever the path.
        fail_first: bool,
        fetches: Cell<usize>,
    }

    impl MemorySource {
        fn with(mut self, layer: LayerKind, doc: impl Into<String>) -> Self {
            self.docs.insert(layer.source_path(), doc.into());
            self
        }
    }

    impl GeometrySource for MemorySource {
        async fn fetch(&self, path: &str) -> Result<String, SourceError> {
            self.fetches.set(self.fetches.get() + 1);
            if self.fail_first && self.fetches.get() == 1 {
                return Err(SourceError::Status {
                    url: path.to_string(),
                    status: 503,
                });
            }
            if self.slow == Some(path) {
                for _ in 0..8 {
                    tokio::task::yield_now().await;
                }
            }
            self.docs.get(path).cloned().ok_or(SourceError::Status {
                url: path.to_string(),
                status: 500,
            })
        }
    }

    fn tokenizables(n: usize) -> String {
        let features: Vec<String> = (0..n)
            .map(|i| {
                format!(
                    r#"{{"type":"Feature","properties":{{"lote":{i}}},"geometry":{{"type":"Point","coordinates":[-60.{i},-30.0]}}}}"#
                )
            })
            .collect();
        format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        )
    }

    #[tokio::test]
    async fn failed_layer_does_not_affect_others() {
        let source = MemorySource::default().with(LayerKind::Publica, PUBLICA);
        let loader = AreaDataLoader::new(source, Arc::new(AreaData::new()));

        let mut seen = Vec::new();
        let results = loader
            .load_all(|r| seen.push(r.as_ref().map(|o| o.layer).map_err(LoadError::layer)))
            .await;
        assert_eq!(results.len(), LayerKind::COUNT);
        assert_eq!(seen.len(), LayerKind::COUNT);
        assert!(seen.contains(&Ok(LayerKind::Publica)));
        assert!(seen.contains(&Err(LayerKind::Privada)));

        let data = loader.data();
        assert_eq!(data.load_state(LayerKind::Publica), LoadState::Loaded { features: 3 });
        assert_eq!(data.load_state(LayerKind::Privada), LoadState::NotLoaded);

        // Privada can be toggled on, renders nothing, and rejects selections.
        let state = ViewState::default()
            .apply(Action::ToggleLayer(LayerKind::Privada), data)
            .expect("toggle");
        assert!(state.is_visible(LayerKind::Privada));
        let plan = render_plan(&state, data);
        let rendered: Vec<LayerKind> = plan.layers.iter().map(|l| l.layer).collect();
        assert_eq!(rendered, vec![LayerKind::Publica]);
        assert!(
            state
                .apply(Action::Select(FeatureRef::new(LayerKind::Privada, 0)), data)
                .is_err()
        );
        assert!(
            state
                .apply(Action::Select(FeatureRef::new(LayerKind::Publica, 2)), data)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn slow_layer_completes_last_without_blocking_others() {
        let source = MemorySource {
            slow: Some(LayerKind::Publica.source_path()),
            ..MemorySource::default()
        }
        .with(LayerKind::Publica, PUBLICA)
        .with(LayerKind::Ecoregiones, ECOREGIONES);
        let loader = AreaDataLoader::new(source, Arc::new(AreaData::new()));

        let mut order = Vec::new();
        loader
            .load_all(|r| {
                let layer = match r {
                    Ok(o) => o.layer,
                    Err(e) => e.layer(),
                };
                order.push(layer);
            })
            .await;
        assert_eq!(order.last(), Some(&LayerKind::Publica));
        assert!(loader.data().is_loaded(LayerKind::Ecoregiones));
    }

    #[tokio::test]
    async fn tokenizables_are_numbered_at_load_time() {
        let source = MemorySource::default().with(LayerKind::Tokenizables, tokenizables(12));
        let loader = AreaDataLoader::new(source, Arc::new(AreaData::new()));
        let outcome = loader.load(LayerKind::Tokenizables).await.expect("load");
        assert_eq!(outcome.features, 12);
        assert!(outcome.fresh);

        let collection = loader
            .data()
            .collection(LayerKind::Tokenizables)
            .expect("loaded");
        let ids: Vec<String> = collection
            .features
            .iter()
            .map(|f| f.ingested.token_id.expect("token id").to_string())
            .collect();
        let expected: Vec<String> = (1..=12).map(|i| format!("TK-{i:03}")).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn ecoregion_names_are_normalized_at_load_time() {
        let source = MemorySource::default().with(LayerKind::Ecoregiones, ECOREGIONES);
        let loader = AreaDataLoader::new(source, Arc::new(AreaData::new()));
        loader.load(LayerKind::Ecoregiones).await.expect("load");
        let collection = loader
            .data()
            .collection(LayerKind::Ecoregiones)
            .expect("loaded");
        let names: Vec<Option<&str>> = collection
            .features
            .iter()
            .map(|f| f.ingested.ecoregion_name.as_deref())
            .collect();
        assert_eq!(
            names,
            vec![Some("Selva de las Yungas"), Some("Chaco Seco"), None]
        );
    }

    #[tokio::test]
    async fn second_load_is_a_no_op() {
        let source = MemorySource::default().with(LayerKind::Publica, PUBLICA);
        let data = Arc::new(AreaData::new());
        let loader = AreaDataLoader::new(source, Arc::clone(&data));
        assert!(loader.load(LayerKind::Publica).await.expect("first").fresh);
        let again = loader.load(LayerKind::Publica).await.expect("second");
        assert!(!again.fresh);
        assert_eq!(again.features, 3);
        assert_eq!(loader.source().fetches.get(), 1);

        // A collection published by someone else first wins too.
        assert!(!data.publish(LayerKind::Publica, FeatureCollection::default()));
        assert_eq!(data.load_state(LayerKind::Publica), LoadState::Loaded { features: 3 });
    }

    #[tokio::test]
    async fn failed_layer_is_not_retried() {
        let source = MemorySource {
            fail_first: true,
            ..MemorySource::default()
        }
        .with(LayerKind::Privada, PUBLICA);
        let data = Arc::new(AreaData::new());
        let loader = AreaDataLoader::new(source, Arc::clone(&data));

        let first = loader.load(LayerKind::Privada).await.unwrap_err();
        assert!(matches!(first, LoadError::Source { .. }));
        let second = loader.load(LayerKind::Privada).await.unwrap_err();
        assert!(matches!(
            second,
            LoadError::PreviouslyFailed {
                layer: LayerKind::Privada
            }
        ));
        assert_eq!(loader.source().fetches.get(), 1);
        assert_eq!(data.load_state(LayerKind::Privada), LoadState::NotLoaded);

        // A fresh loader over the same session data does not retry either.
        let again = AreaDataLoader::new(
            MemorySource::default().with(LayerKind::Privada, PUBLICA),
            Arc::clone(&data),
        );
        let results = again.load_layers([LayerKind::Privada], |_| {}).await;
        assert!(matches!(
            results[0],
            Err(LoadError::PreviouslyFailed { .. })
        ));
        assert_eq!(again.source().fetches.get(), 0);
        assert!(!data.is_loaded(LayerKind::Privada));
    }

    #[tokio::test]
    async fn overlapping_loads_fetch_once() {
        let source = MemorySource {
            slow: Some(LayerKind::Publica.source_path()),
            ..MemorySource::default()
        }
        .with(LayerKind::Publica, PUBLICA);
        let loader = AreaDataLoader::new(source, Arc::new(AreaData::new()));

        let (first, second) = futures_util::future::join(
            loader.load(LayerKind::Publica),
            loader.load(LayerKind::Publica),
        )
        .await;
        assert!(first.expect("first load").fresh);
        assert!(matches!(second, Err(LoadError::InFlight { .. })));
        assert_eq!(loader.source().fetches.get(), 1);
        assert!(loader.data().is_loaded(LayerKind::Publica));
    }

    #[tokio::test]
    async fn unparseable_document_counts_as_failure() {
        let source = MemorySource::default().with(LayerKind::Conservadas, "<html>502</html>");
        let loader = AreaDataLoader::new(source, Arc::new(AreaData::new()));
        let err = loader.load(LayerKind::Conservadas).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { layer: LayerKind::Conservadas, .. }));
        assert!(err.to_string().starts_with("layer conservadas:"));
        assert!(!loader.data().is_loaded(LayerKind::Conservadas));
    }
}
