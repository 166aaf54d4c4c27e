//! API response and query types.
//!
//! Field names follow CSV schema v1 conventions for consistency across
//! export formats.

use serde::{Deserialize, Serialize};

use crate::sim::kpi::KpiReport;
use crate::sim::types::{SimConfig, StepResult};

/// Combined state response: config, KPIs, and latest telemetry record.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// Simulation configuration.
    pub config: SimConfig,
    /// Aggregate KPI report.
    pub kpi: KpiReport,
    /// Most recent telemetry record (last timestep), absent for an
    /// empty run.
    pub latest_step: Option<TelemetryRecord>,
}

/// Single telemetry record using CSV schema v1 field names.
///
/// Enum-valued fields (`condition`, `signal_mode`, `ev_limit`) are
/// rendered as their lowercase wire names so the API and the CSV export
/// agree.
#[derive(Debug, Serialize)]
pub struct TelemetryRecord {
    /// Timestep index.
    pub timestep: usize,
    /// Hour of day in `[0, 24)`.
    pub hour: f32,
    /// Citywide vehicle count.
    pub vehicles: u32,
    /// Background load (MW).
    pub base_mw: f32,
    /// Traffic-signal load (MW).
    pub signals_mw: f32,
    /// Street-lighting load (MW).
    pub street_lights_mw: f32,
    /// EV charging load delivered (MW).
    pub ev_mw: f32,
    /// EV charging load without throttling (MW).
    pub ev_potential_mw: f32,
    /// Total grid load (MW).
    pub total_load_mw: f32,
    /// Dispatched generation (MW).
    pub generation_mw: f32,
    /// Unserved load (MW).
    pub shortage_mw: f32,
    /// Renewable fraction of generation.
    pub renewable_share: f32,
    /// Highest feeder loading ratio.
    pub max_loading: f32,
    /// Grid condition name.
    pub condition: String,
    /// Applied signal mode name.
    pub signal_mode: String,
    /// Applied street-light dimming factor.
    pub street_dimming: f32,
    /// Applied EV charge limit name.
    pub ev_limit: String,
    /// Intersections overridden by the applied response.
    pub affected_intersections: usize,
    /// Whether every feeder stayed within effective capacity.
    pub feeders_ok: bool,
}

impl From<&StepResult> for TelemetryRecord {
    fn from(r: &StepResult) -> Self {
        Self {
            timestep: r.timestep,
            hour: r.hour,
            vehicles: r.vehicles,
            base_mw: r.base_mw,
            signals_mw: r.signals_mw,
            street_lights_mw: r.street_lights_mw,
            ev_mw: r.ev_mw,
            ev_potential_mw: r.ev_potential_mw,
            total_load_mw: r.total_load_mw,
            generation_mw: r.generation_mw,
            shortage_mw: r.shortage_mw,
            renewable_share: r.renewable_share,
            max_loading: r.max_loading,
            condition: r.condition.to_string(),
            signal_mode: r.signal_mode.to_string(),
            street_dimming: r.street_dimming,
            ev_limit: r.ev_limit.to_string(),
            affected_intersections: r.affected_intersections,
            feeders_ok: r.feeders_ok,
        }
    }
}

/// Optional range query parameters for the telemetry endpoint.
#[derive(Debug, Deserialize)]
pub struct TelemetryQuery {
    /// Start timestep (inclusive).
    pub from: Option<usize>,
    /// End timestep (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coupling::feedback::{EvChargeLimit, GridCondition};
    use crate::traffic::signals::SignalMode;

    fn make_step_result() -> StepResult {
        StepResult {
            timestep: 5,
            hour: 5.0,
            vehicles: 820,
            base_mw: 348.0,
            signals_mw: 0.13,
            street_lights_mw: 1.49,
            ev_mw: 8.5,
            ev_potential_mw: 27.0,
            total_load_mw: 358.1,
            generation_mw: 358.1,
            shortage_mw: 0.0,
            renewable_share: 0.0,
            max_loading: 0.78,
            condition: GridCondition::Stressed,
            signal_mode: SignalMode::Eco,
            street_dimming: 0.8,
            ev_limit: EvChargeLimit::Level2,
            affected_intersections: 0,
            feeders_ok: true,
        }
    }

    #[test]
    fn telemetry_record_from_step_result_maps_fields() {
        let step = make_step_result();
        let record = TelemetryRecord::from(&step);

        assert_eq!(record.timestep, 5);
        assert_eq!(record.hour, 5.0);
        assert_eq!(record.vehicles, 820);
        assert_eq!(record.total_load_mw, 358.1);
        assert_eq!(record.max_loading, 0.78);
        // wire names match the CSV export
        assert_eq!(record.condition, "stressed");
        assert_eq!(record.signal_mode, "eco");
        assert_eq!(record.ev_limit, "level_2_max");
        assert!(record.feeders_ok);
    }
}
