pub mod details;
pub mod labels;
pub mod layer;
pub mod raster;
pub mod strategy;
pub mod symbology;

pub use layer::*;
