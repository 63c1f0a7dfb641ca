use layers::LayerKind;

/// Per-layer visibility flags.
///
/// One entry per registered layer by construction. Visibility is independent
/// of load state: a layer renders only when it is visible and loaded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerVisibility {
    visible: [bool; LayerKind::COUNT],
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            visible: LayerKind::ALL.map(|kind| kind.definition().visible_by_default),
        }
    }
}

impl LayerVisibility {
    /// All layers hidden except the given ones.
    pub fn only(visible: impl IntoIterator<Item = LayerKind>) -> Self {
        let mut out = Self {
            visible: [false; LayerKind::COUNT],
        };
        for kind in visible {
            out.visible[kind.index()] = true;
        }
        out
    }

    pub fn is_visible(&self, layer: LayerKind) -> bool {
        self.visible[layer.index()]
    }

    pub fn toggled(mut self, layer: LayerKind) -> Self {
        self.visible[layer.index()] = !self.visible[layer.index()];
        self
    }

    /// Layers in registry order with their flag.
    pub fn iter(&self) -> impl Iterator<Item = (LayerKind, bool)> + '_ {
        LayerKind::ALL
            .into_iter()
            .map(|kind| (kind, self.is_visible(kind)))
    }

    pub fn visible_layers(&self) -> impl Iterator<Item = LayerKind> + '_ {
        self.iter().filter_map(|(kind, on)| on.then_some(kind))
    }
}
