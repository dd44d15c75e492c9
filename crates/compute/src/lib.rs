pub mod analysis;
pub mod controller;
pub mod detail;
pub mod normalize;

pub use controller::*;
pub use detail::*;
pub use normalize::*;
