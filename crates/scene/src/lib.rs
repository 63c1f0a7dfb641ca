pub mod area_data;
pub mod config;
pub mod render;
pub mod selection;
pub mod state;
pub mod visibility;

pub use area_data::*;
pub use config::*;
pub use render::*;
pub use selection::*;
pub use state::*;
pub use visibility::*;
