pub mod marker;
pub mod polygon;
pub mod visibility;

pub use marker::*;
pub use polygon::*;
pub use visibility::*;
