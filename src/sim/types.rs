//! Core simulation types: configuration and step records.

use std::fmt;

use serde::Serialize;

use crate::coupling::feedback::{EvChargeLimit, GridCondition};
use crate::traffic::signals::SignalMode;

/// Centralized simulation timing configuration.
///
/// All models reference this struct for step timing, eliminating
/// duplicated `dt_hours` computations.
///
/// # Examples
///
/// ```
/// use citygrid_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(24, 1, 42);
/// assert_eq!(cfg.dt_hours, 1.0);
/// assert_eq!(cfg.hour_of_day(30), 6.0);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    /// Number of simulation steps per day.
    pub steps_per_day: usize,
    /// Number of days to simulate.
    pub days: usize,
    /// Duration of one timestep in hours, derived as `24.0 / steps_per_day`.
    pub dt_hours: f32,
    /// Master random seed for reproducibility.
    pub seed: u64,
}

impl SimConfig {
    /// Creates a new simulation configuration.
    ///
    /// # Panics
    ///
    /// Panics if `steps_per_day` or `days` is zero.
    pub fn new(steps_per_day: usize, days: usize, seed: u64) -> Self {
        assert!(steps_per_day > 0, "steps_per_day must be > 0");
        assert!(days > 0, "days must be > 0");
        Self {
            steps_per_day,
            days,
            dt_hours: 24.0 / steps_per_day as f32,
            seed,
        }
    }

    /// Total number of simulation steps across all days.
    pub fn total_steps(&self) -> usize {
        self.steps_per_day * self.days
    }

    /// Fractional hour of day in `[0, 24)` for a timestep.
    pub fn hour_of_day(&self, timestep: usize) -> f32 {
        (timestep % self.steps_per_day) as f32 * self.dt_hours
    }
}

/// Complete record of one co-simulation timestep.
///
/// The `signal_mode`, `street_dimming`, and `ev_limit` fields describe the
/// traffic response *applied* during this step (computed from the previous
/// step's grid evaluation); `condition` is this step's fresh evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    /// Timestep index.
    pub timestep: usize,
    /// Hour of day in `[0, 24)`.
    pub hour: f32,
    /// Citywide vehicle count.
    pub vehicles: u32,
    /// Zone base load after the hourly demand factor (MW).
    pub base_mw: f32,
    /// Traffic-signal load (MW).
    pub signals_mw: f32,
    /// Street-lighting load after adaptive and feedback dimming (MW).
    pub street_lights_mw: f32,
    /// EV charging load after feedback throttling (MW).
    pub ev_mw: f32,
    /// EV charging load that unthrottled stations would have drawn (MW).
    pub ev_potential_mw: f32,
    /// Total grid load: `base + signals + street_lights + ev` (MW).
    pub total_load_mw: f32,
    /// Dispatched generation (MW).
    pub generation_mw: f32,
    /// Unserved load when the fleet is exhausted (MW, >= 0).
    pub shortage_mw: f32,
    /// Fraction of generation from renewable units (0.0 to 1.0).
    pub renewable_share: f32,
    /// Highest feeder loading ratio across zones.
    pub max_loading: f32,
    /// Grid condition evaluated from this step's loading and shortage.
    pub condition: GridCondition,
    /// Signal mode applied during this step.
    pub signal_mode: SignalMode,
    /// Street-light dimming factor applied during this step.
    pub street_dimming: f32,
    /// EV charge limit applied during this step.
    pub ev_limit: EvChargeLimit,
    /// Number of intersections overridden by the applied response.
    pub affected_intersections: usize,
    /// Whether every zone feeder stayed within its effective capacity.
    pub feeders_ok: bool,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>3} ({:>4.1}h) | load={:>7.1} MW  gen={:>7.1} MW  short={:>5.1} MW | \
             tl={:.2}  sl={:.2}  ev={:.2} | veh={:>5} | loading={:.2} {} | mode={} dim={:.1} ev={} ok={}",
            self.timestep,
            self.hour,
            self.total_load_mw,
            self.generation_mw,
            self.shortage_mw,
            self.signals_mw,
            self.street_lights_mw,
            self.ev_mw,
            self.vehicles,
            self.max_loading,
            self.condition,
            self.signal_mode,
            self.street_dimming,
            self.ev_limit,
            self.feeders_ok,
        )
    }
}
