pub mod catalog;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod math;
pub mod operations;
pub mod session;

#[cfg(test)]
mod test_support;

pub use config::{LayoutConfig, PlacementPolicy};
pub use error::{LayoutError, Result};
pub use session::{PlacementReport, PlacementSession};
