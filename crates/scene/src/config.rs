use std::path::{Path, PathBuf};

use layers::LayerKind;
use layers::raster::BaseMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::visibility::LayerVisibility;

/// How selection reacts to view changes other than layer toggles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionPolicy {
    /// Switching the base map drops the active selection.
    pub clear_on_base_map_change: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            clear_on_base_map_change: true,
        }
    }
}

/// Startup configuration of the viewer session.
///
/// Every field is optional in JSON; missing fields take the registry defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub default_base_map: BaseMap,
    pub initially_visible: Vec<LayerKind>,
    pub selection: SelectionPolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_base_map: BaseMap::default(),
            initially_visible: LayerVisibility::default().visible_layers().collect(),
            selection: SelectionPolicy::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse(e) => write!(f, "invalid viewer config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(payload).map_err(|e| {
            warn!("rejected viewer config: {e}");
            ConfigError::Parse(e)
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    pub fn initial_visibility(&self) -> LayerVisibility {
        LayerVisibility::only(self.initially_visible.iter().copied())
    }
}
