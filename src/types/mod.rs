//! Type definitions

pub mod geo;
pub mod messages;
pub mod trip;

pub use geo::*;
pub use messages::*;
pub use trip::*;
