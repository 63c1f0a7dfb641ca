use serde::{Deserialize, Serialize};

/// Background tile provider choices.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseMap {
    #[default]
    Hot,
    Osm,
    EsriSat,
    EsriTopo,
    CartoLight,
    CartoDark,
}

/// Tile endpoint handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileProvider {
    pub id: &'static str,
    pub label: &'static str,
    pub url_template: &'static str,
    pub attribution: &'static str,
}

static TILE_PROVIDERS: [TileProvider; 6] = [
    TileProvider {
        id: "hot",
        label: "OSM Humanitario",
        url_template: "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png",
        attribution: "&copy; <a href=\"https://www.openstreetmap.org/\">OSM</a> contributors, Tiles &copy; Humanitarian OSM Team",
    },
    TileProvider {
        id: "osm",
        label: "OSM Estándar",
        url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
        attribution: "&copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors",
    },
    TileProvider {
        id: "esriSat",
        label: "Esri Satélite",
        url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
        attribution: "Tiles &copy; Esri &mdash; Source: Esri, NASA, USGS, JPL, and the GIS User Community",
    },
    TileProvider {
        id: "esriTopo",
        label: "Esri Topográfico",
        url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}",
        attribution: "Tiles &copy; Esri &mdash; TomTom, Intermap, increment P Corp., Garmin, FAO, NOAA",
    },
    TileProvider {
        id: "cartoLight",
        label: "Carto Light",
        url_template: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
        attribution: "&copy; <a href=\"https://carto.com/attributions\">CARTO</a> &copy; OpenStreetMap contributors",
    },
    TileProvider {
        id: "cartoDark",
        label: "Carto Dark",
        url_template: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
        attribution: "&copy; <a href=\"https://carto.com/attributions\">CARTO</a> &copy; OpenStreetMap contributors",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBaseMap(pub String);

impl std::fmt::Display for UnknownBaseMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown base map: {:?}", self.0)
    }
}

impl std::error::Error for UnknownBaseMap {}

impl BaseMap {
    pub const ALL: [BaseMap; 6] = [
        BaseMap::Hot,
        BaseMap::Osm,
        BaseMap::EsriSat,
        BaseMap::EsriTopo,
        BaseMap::CartoLight,
        BaseMap::CartoDark,
    ];

    pub fn provider(self) -> &'static TileProvider {
        &TILE_PROVIDERS[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.provider().id
    }
}

impl std::fmt::Display for BaseMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for BaseMap {
    type Err = UnknownBaseMap;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseMap::ALL
            .into_iter()
            .find(|b| b.id() == s)
            .ok_or_else(|| UnknownBaseMap(s.to_string()))
    }
}
