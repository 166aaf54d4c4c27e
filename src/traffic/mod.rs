//! Synthetic traffic model.
//!
//! Replaces an external microsimulator with a seeded time-of-day volume
//! model and a phase-program signal controller, enough to drive the
//! power coupling and absorb its feedback.

/// Time-of-day vehicle volume model.
pub mod demand;
/// Traffic-signal phase programs and override modes.
pub mod signals;

pub use demand::{DayPeriod, TrafficDemand};
pub use signals::{ColorCounts, SignalController, SignalMode};

/// Per-step traffic state handed to the power coupling.
#[derive(Debug, Clone)]
pub struct TrafficSnapshot {
    /// Citywide vehicle count.
    pub total_vehicles: u32,
    /// Vehicle count per zone, aligned with the scenario zone order.
    pub zone_vehicles: Vec<u32>,
}
