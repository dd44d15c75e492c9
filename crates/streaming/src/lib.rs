pub mod config;
pub mod protocol;
pub mod questions;
pub mod request;

pub use config::*;
pub use protocol::*;
pub use questions::*;
pub use request::*;
