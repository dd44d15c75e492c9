pub mod components;
pub mod entity;
pub mod selection;
pub mod world;

pub use world::*;
