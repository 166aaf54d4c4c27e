//! Zonal power-grid model.

/// Per-zone distribution feeders with capacity tracking.
pub mod feeder;
/// Generator fleet and merit-order dispatch.
pub mod network;
/// Time-of-day demand and solar availability profiles.
pub mod profile;

pub use feeder::ZoneFeeder;
pub use network::{DispatchResult, Generator, GeneratorKind, GridModel};
