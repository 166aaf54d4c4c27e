//! City-scale traffic / power-grid co-simulation.
//!
//! Traffic state (vehicle volume, signal colors, EV charging, street
//! lighting) drives electrical load on a zonal grid model; grid stress
//! feeds back into traffic control (signal modes, light dimming, charge
//! throttling).

#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// Traffic-to-power load coupling and power-to-traffic feedback.
pub mod coupling;
pub mod io;
/// Zonal grid model: feeders, generators, merit-order dispatch.
pub mod power;
/// Co-simulation engine, step records, KPIs, and outage events.
pub mod sim;
/// Synthetic traffic model: demand profile and signal controller.
pub mod traffic;
