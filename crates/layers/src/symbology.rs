use foundation::color::Rgb;
use formats::geojson::GeometryKind;
use serde::{Serialize, Serializer};

pub const POINT_MARKER_RADIUS_PX: f32 = 6.0;
pub const POINT_FILL_OPACITY: f32 = 0.9;

/// How the rendering surface draws a feature.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkerKind {
    /// Stroked/filled path (lines and polygons).
    Path,
    /// Circle marker for point geometries.
    Circle { radius: f32 },
}

/// Resolved style for one feature.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct FeatureStyle {
    #[serde(serialize_with = "serialize_rgb")]
    pub stroke_color: Rgb,
    #[serde(serialize_with = "serialize_rgb")]
    pub fill_color: Rgb,
    pub fill_opacity: f32,
    pub stroke_weight: f32,
    pub marker: MarkerKind,
}

pub const SELECTED_STROKE_COLOR: Rgb = Rgb::from_hex(0xef4444);

impl FeatureStyle {
    /// Emphasis for the currently selected feature: red, thicker outline.
    pub fn highlighted(self) -> Self {
        Self {
            stroke_color: SELECTED_STROKE_COLOR,
            stroke_weight: self.stroke_weight.max(1.0) * 2.5,
            fill_opacity: self.fill_opacity.max(0.8),
            ..self
        }
    }
}

/// Fixed per-layer colors and weights, before geometry-specific adjustments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BaseStyle {
    pub stroke_color: Rgb,
    pub fill_color: Rgb,
    pub fill_opacity: f32,
    pub stroke_weight: f32,
}

impl BaseStyle {
    pub const fn new(stroke: u32, fill: u32, fill_opacity: f32, stroke_weight: f32) -> Self {
        Self {
            stroke_color: Rgb::from_hex(stroke),
            fill_color: Rgb::from_hex(fill),
            fill_opacity,
            stroke_weight,
        }
    }

    /// Applies the geometry-dependent marker choice.
    ///
    /// Point-like geometries become circle markers with a denser fill;
    /// a missing geometry is treated as a path.
    pub fn for_geometry(self, kind: Option<GeometryKind>) -> FeatureStyle {
        let point_like = kind.is_some_and(GeometryKind::is_point_like);
        FeatureStyle {
            stroke_color: self.stroke_color,
            fill_color: self.fill_color,
            fill_opacity: if point_like {
                POINT_FILL_OPACITY
            } else {
                self.fill_opacity
            },
            stroke_weight: self.stroke_weight,
            marker: if point_like {
                MarkerKind::Circle {
                    radius: POINT_MARKER_RADIUS_PX,
                }
            } else {
                MarkerKind::Path
            },
        }
    }
}

/// Ordered ecoregion palette. Indexing is part of the color contract:
/// reordering entries recolors every ecoregion.
pub const ECOREGION_PALETTE: [Rgb; 10] = [
    Rgb::from_hex(0x1b9e77),
    Rgb::from_hex(0xd95f02),
    Rgb::from_hex(0x7570b3),
    Rgb::from_hex(0xe7298a),
    Rgb::from_hex(0x66a61e),
    Rgb::from_hex(0xe6ab02),
    Rgb::from_hex(0xa6761d),
    Rgb::from_hex(0x1f78b4),
    Rgb::from_hex(0xb2df8a),
    Rgb::from_hex(0xfb9a99),
];

/// Color for ecoregion features whose name could not be resolved.
pub const ECOREGION_FALLBACK_COLOR: Rgb = Rgb::from_hex(0x9ca3af);

/// Palette slot for an ecoregion name: sum of UTF-16 code units modulo the
/// palette size. Stable across sessions; distinct names may collide.
pub fn ecoregion_palette_index(name: &str) -> usize {
    let sum: u64 = name.encode_utf16().map(u64::from).sum();
    (sum % ECOREGION_PALETTE.len() as u64) as usize
}

pub fn ecoregion_color(name: Option<&str>) -> Rgb {
    name.map_or(ECOREGION_FALLBACK_COLOR, |n| {
        ECOREGION_PALETTE[ecoregion_palette_index(n)]
    })
}

fn serialize_rgb<S: Serializer>(color: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(color)
}
