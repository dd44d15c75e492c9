pub mod choropleth;
pub mod labels;
pub mod layer;
pub mod symbology;

pub use layer::*;
