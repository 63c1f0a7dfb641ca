//! Shared pieces of the `areas` command-line viewer: data-root handling and
//! plain-text rendering of view state.

use std::path::PathBuf;
use std::str::FromStr;

use layers::LayerKind;
use layers::details::{DetailBody, DetailPanel};
use layers::raster::BaseMap;
use scene::{
    Action, AreaData, FeatureRef, LoadAttempt, LoadState, RenderPlan, SelectionError, ViewState,
};
use streaming::{FilesystemSource, GeometrySource, HttpSource, SourceError};

/// Where layer documents live: a local directory or an `http(s)://` base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRoot {
    Dir(PathBuf),
    Url(String),
}

impl FromStr for DataRoot {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(DataRoot::Url(s.to_string()))
        } else {
            Ok(DataRoot::Dir(PathBuf::from(s)))
        }
    }
}

impl DataRoot {
    pub fn source(&self) -> DataSource {
        match self {
            DataRoot::Dir(dir) => DataSource::Files(FilesystemSource::new(dir.clone())),
            DataRoot::Url(url) => DataSource::Http(HttpSource::new(url.clone())),
        }
    }
}

pub enum DataSource {
    Files(FilesystemSource),
    Http(HttpSource),
}

impl GeometrySource for DataSource {
    async fn fetch(&self, path: &str) -> Result<String, SourceError> {
        match self {
            DataSource::Files(s) => s.fetch(path).await,
            DataSource::Http(s) => s.fetch(path).await,
        }
    }

    fn describe(&self, path: &str) -> String {
        match self {
            DataSource::Files(s) => s.describe(path),
            DataSource::Http(s) => s.describe(path),
        }
    }
}

/// Applies command-line view overrides on top of the configured start state.
///
/// `show`, when non-empty, becomes the exact visible set. Layers are toggled
/// in registry order so the result does not depend on argument order.
pub fn apply_overrides(
    state: ViewState,
    show: &[LayerKind],
    base_map: Option<BaseMap>,
    data: &AreaData,
) -> Result<ViewState, SelectionError> {
    let mut state = state;
    if !show.is_empty() {
        for layer in LayerKind::ALL {
            if state.is_visible(layer) != show.contains(&layer) {
                state = state.apply(Action::ToggleLayer(layer), data)?;
            }
        }
    }
    if let Some(base_map) = base_map {
        state = state.apply(Action::SetBaseMap(base_map), data)?;
    }
    Ok(state)
}

pub fn select(
    state: ViewState,
    layer: LayerKind,
    index: usize,
    data: &AreaData,
) -> Result<ViewState, SelectionError> {
    state.apply(Action::Select(FeatureRef::new(layer, index)), data)
}

/// One line per registered layer: id, visibility, load state, label.
pub fn status_table(state: &ViewState, data: &AreaData) -> String {
    let mut lines: Vec<String> = LayerKind::ALL
        .into_iter()
        .map(|layer| {
            let visible = if state.is_visible(layer) { "on" } else { "off" };
            let loaded = match (data.load_state(layer), data.attempt(layer)) {
                (LoadState::Loaded { features }, _) => format!("{features} features"),
                (LoadState::NotLoaded, LoadAttempt::Failed) => "load failed".to_string(),
                (LoadState::NotLoaded, _) => "not loaded".to_string(),
            };
            format!(
                "{:<13}{:<5}{:<14}{}",
                layer.id(),
                visible,
                loaded,
                layer.label()
            )
        })
        .collect();
    lines.push(format!("base map: {}", state.base_map().provider().label));
    join_lines(lines)
}

pub fn render_summary(plan: &RenderPlan<'_>) -> String {
    let mut lines = vec![format!("base map: {}", plan.base_map.label)];
    if plan.layers.is_empty() {
        lines.push("(nothing to draw)".to_string());
    }
    for layer in &plan.layers {
        lines.push(format!("[{}] {}", layer.layer, layer.label));
        lines.extend(layer.features.iter().map(|binding| {
            let marker = if binding.selected { "*" } else { " " };
            format!(
                "{marker} #{:<3} stroke {} fill {} {}",
                binding.target.index,
                binding.style.stroke_color,
                binding.style.fill_color,
                binding.tooltip.as_deref().unwrap_or("-"),
            )
        }));
    }
    join_lines(lines)
}

pub fn detail_text(panel: &DetailPanel) -> String {
    let lines = match panel {
        DetailPanel::Empty { message } => vec![message.to_string()],
        DetailPanel::Feature(detail) => {
            let mut lines = vec![
                detail.title.clone(),
                format!("layer: {}  geometry: {}", detail.layer, detail.geometry_kind),
            ];
            match &detail.body {
                DetailBody::Html(html) => lines.push(html.clone()),
                DetailBody::Attributes(rows) => lines.extend(
                    rows.iter()
                        .map(|row| format!("{}: {}", row.key, row.value)),
                ),
            }
            lines
        }
    };
    join_lines(lines)
}

/// Newline-terminated text, one entry per line.
fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
