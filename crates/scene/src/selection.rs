use layers::LayerKind;
use serde::{Deserialize, Serialize};

use crate::area_data::AreaData;
use crate::visibility::LayerVisibility;

/// Points at one feature: layer plus 0-based index in its loaded collection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureRef {
    pub layer: LayerKind,
    pub index: usize,
}

impl FeatureRef {
    pub fn new(layer: LayerKind, index: usize) -> Self {
        Self { layer, index }
    }
}

/// Single active selection, no history.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Empty,
    Holding(FeatureRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    LayerHidden(LayerKind),
    LayerNotLoaded(LayerKind),
    FeatureOutOfRange {
        layer: LayerKind,
        index: usize,
        len: usize,
    },
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::LayerHidden(layer) => write!(f, "layer {layer} is hidden"),
            SelectionError::LayerNotLoaded(layer) => write!(f, "layer {layer} is not loaded"),
            SelectionError::FeatureOutOfRange { layer, index, len } => {
                write!(f, "feature {index} out of range for layer {layer} ({len} features)")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

impl Selection {
    pub fn target(&self) -> Option<FeatureRef> {
        match self {
            Selection::Empty => None,
            Selection::Holding(target) => Some(*target),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }
}

/// Checks that `target` may be selected: its layer is visible and loaded and
/// the index falls inside the loaded collection.
pub fn validate_target(
    target: FeatureRef,
    visibility: &LayerVisibility,
    data: &AreaData,
) -> Result<FeatureRef, SelectionError> {
    if !visibility.is_visible(target.layer) {
        return Err(SelectionError::LayerHidden(target.layer));
    }
    let collection = data
        .collection(target.layer)
        .ok_or(SelectionError::LayerNotLoaded(target.layer))?;
    if target.index >= collection.len() {
        return Err(SelectionError::FeatureOutOfRange {
            layer: target.layer,
            index: target.index,
            len: collection.len(),
        });
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::{FeatureRef, Selection, SelectionError, validate_target};
    use crate::area_data::AreaData;
    use crate::visibility::LayerVisibility;
    use formats::geojson::{Feature, FeatureCollection};
    use layers::LayerKind;
    use serde_json::Map;

    fn data_with_public(n: usize) -> AreaData {
        let data = AreaData::new();
        data.publish(
            LayerKind::Publica,
            FeatureCollection {
                features: (0..n).map(|_| Feature::new(Map::new(), None)).collect(),
            },
        );
        data
    }

    #[test]
    fn empty_by_default() {
        assert!(Selection::default().is_empty());
        assert_eq!(Selection::default().target(), None);
    }

    #[test]
    fn validation_rules() {
        let data = data_with_public(2);
        let visible = LayerVisibility::only([LayerKind::Publica, LayerKind::Privada]);

        let ok = FeatureRef::new(LayerKind::Publica, 1);
        assert_eq!(validate_target(ok, &visible, &data), Ok(ok));

        assert_eq!(
            validate_target(ok, &LayerVisibility::only([LayerKind::Privada]), &data),
            Err(SelectionError::LayerHidden(LayerKind::Publica))
        );
        assert_eq!(
            validate_target(FeatureRef::new(LayerKind::Privada, 0), &visible, &data),
            Err(SelectionError::LayerNotLoaded(LayerKind::Privada))
        );
        assert_eq!(
            validate_target(FeatureRef::new(LayerKind::Publica, 2), &visible, &data),
            Err(SelectionError::FeatureOutOfRange {
                layer: LayerKind::Publica,
                index: 2,
                len: 2
            })
        );
    }
}
