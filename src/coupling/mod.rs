//! The bidirectional traffic/grid coupling.
//!
//! [`demand`] converts traffic state into MW loads; [`feedback`] maps
//! grid stress back into a traffic-side response.

pub mod demand;
pub mod feedback;

pub use demand::{LoadCoupler, PowerDemand};
pub use feedback::{EvChargeLimit, GridCondition, ResponsePolicy, TrafficResponse};
