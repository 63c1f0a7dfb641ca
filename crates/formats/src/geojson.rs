use foundation::bounds::LonLatBounds;
use foundation::ids::TokenId;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
    GeometryCollection(Vec<Geometry>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    /// GeoJSON `type` spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }

    pub fn is_point_like(self) -> bool {
        matches!(self, GeometryKind::Point | GeometryKind::MultiPoint)
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Visits every coordinate in document order.
    pub fn for_each_point(&self, f: &mut impl FnMut(&GeoPoint)) {
        match self {
            Geometry::Point(p) => f(p),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.iter().for_each(f),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                lines.iter().flatten().for_each(f)
            }
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().for_each(f),
            Geometry::GeometryCollection(parts) => {
                for part in parts {
                    part.for_each_point(f);
                }
            }
        }
    }

    pub fn bounds(&self) -> Option<LonLatBounds> {
        let mut out: Option<LonLatBounds> = None;
        self.for_each_point(&mut |p| {
            out = Some(match out {
                Some(mut b) => {
                    b.extend(p.lon_deg, p.lat_deg);
                    b
                }
                None => LonLatBounds::from_point(p.lon_deg, p.lat_deg),
            });
        });
        out
    }
}

/// Values derived from a feature at ingestion time.
///
/// Filled once by `crate::ingest` right after the layer document is parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestedAttributes {
    pub ecoregion_name: Option<String>,
    pub token_id: Option<TokenId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    /// Attributes in document order.
    pub properties: Map<String, Value>,
    /// `None` for GeoJSON `"geometry": null`.
    pub geometry: Option<Geometry>,
    pub ingested: IngestedAttributes,
}

impl Feature {
    pub fn new(properties: Map<String, Value>, geometry: Option<Geometry>) -> Self {
        Self {
            id: None,
            properties,
            geometry,
            ingested: IngestedAttributes::default(),
        }
    }

    pub fn geometry_kind(&self) -> Option<GeometryKind> {
        self.geometry.as_ref().map(Geometry::kind)
    }

    /// Emits the feature as a GeoJSON `Feature` object for the rendering surface.
    pub fn to_geojson_value(&self) -> Value {
        let mut fobj = Map::new();
        fobj.insert("type".to_string(), Value::String("Feature".to_string()));
        if let Some(id) = &self.id {
            fobj.insert("id".to_string(), Value::String(id.clone()));
        }
        fobj.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone()),
        );
        fobj.insert(
            "geometry".to_string(),
            self.geometry
                .as_ref()
                .map_or(Value::Null, geometry_to_geojson_value),
        );
        Value::Object(fobj)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug)]
pub enum GeoJsonError {
    Json(serde_json::Error),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::Json(e) => write!(f, "JSON parse error: {e}"),
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            GeoJsonError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoJsonError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// Union of all feature bounds; `None` when no feature carries coordinates.
    pub fn bounds(&self) -> Option<LonLatBounds> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref().and_then(Geometry::bounds))
            .reduce(LonLatBounds::union)
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload).map_err(GeoJsonError::Json)?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, GeoJsonError> {
        let Value::Object(mut obj) = value else {
            return Err(GeoJsonError::NotAFeatureCollection);
        };
        if obj.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(GeoJsonError::NotAFeatureCollection);
        }
        let Some(Value::Array(features_val)) = obj.remove("features") else {
            return Err(GeoJsonError::NotAFeatureCollection);
        };

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.into_iter().enumerate() {
            let feature = parse_feature(feat_val)
                .map_err(|reason| GeoJsonError::InvalidFeature { index, reason })?;
            features.push(feature);
        }

        Ok(Self { features })
    }
}

fn parse_feature(value: Value) -> Result<Feature, String> {
    let Value::Object(mut feat_obj) = value else {
        return Err("feature must be an object".to_string());
    };

    let feat_type = feat_obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or("feature missing type".to_string())?;
    if feat_type != "Feature" {
        return Err(format!("unexpected feature type: {feat_type}"));
    }

    let id = match feat_obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = match feat_obj.remove("properties") {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => Map::new(),
        Some(_) => return Err("feature properties must be an object or null".to_string()),
    };

    let geometry = match feat_obj.get("geometry") {
        None => return Err("feature missing geometry".to_string()),
        Some(Value::Null) => None,
        Some(geom) => Some(parse_geometry(geom)?),
    };

    Ok(Feature {
        id,
        properties,
        geometry,
        ingested: IngestedAttributes::default(),
    })
}

fn geometry_to_geojson_value(geom: &Geometry) -> Value {
    let mut obj = Map::new();
    obj.insert(
        "type".to_string(),
        Value::String(geom.kind().as_str().to_string()),
    );
    match geom {
        Geometry::Point(p) => {
            obj.insert("coordinates".to_string(), point_coords(p));
        }
        Geometry::MultiPoint(ps) | Geometry::LineString(ps) => {
            obj.insert("coordinates".to_string(), line_coords(ps));
        }
        Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
            let coords = lines.iter().map(|line| line_coords(line)).collect();
            obj.insert("coordinates".to_string(), Value::Array(coords));
        }
        Geometry::MultiPolygon(polys) => {
            let coords = polys
                .iter()
                .map(|poly| Value::Array(poly.iter().map(|ring| line_coords(ring)).collect()))
                .collect();
            obj.insert("coordinates".to_string(), Value::Array(coords));
        }
        Geometry::GeometryCollection(parts) => {
            let geoms = parts.iter().map(geometry_to_geojson_value).collect();
            obj.insert("geometries".to_string(), Value::Array(geoms));
        }
    }
    Value::Object(obj)
}

fn point_coords(p: &GeoPoint) -> Value {
    Value::Array(vec![Value::from(p.lon_deg), Value::from(p.lat_deg)])
}

fn line_coords(ps: &[GeoPoint]) -> Value {
    Value::Array(ps.iter().map(point_coords).collect())
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or("geometry missing type".to_string())?;

    if ty == "GeometryCollection" {
        let parts = obj
            .get("geometries")
            .and_then(Value::as_array)
            .ok_or("GeometryCollection missing geometries".to_string())?;
        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            out.push(parse_geometry(part)?);
        }
        return Ok(Geometry::GeometryCollection(out));
    }

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_lines(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_lines(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    // KML exports often carry a third (altitude) ordinate; it is dropped.
    let lon = arr[0]
        .as_f64()
        .ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("Point lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_lines(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array of rings or lines".to_string())?;
    arr.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_lines).collect()
}
