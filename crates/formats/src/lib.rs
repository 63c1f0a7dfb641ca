pub mod description;
pub mod ecoregion;
pub mod geojson;
pub mod ingest;
pub mod sanitize;

pub use description::*;
pub use ecoregion::*;
pub use geojson::*;
pub use ingest::*;
pub use sanitize::*;
