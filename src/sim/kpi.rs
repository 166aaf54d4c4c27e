//! Post-hoc KPI computation from simulation results.

use std::fmt;

use serde::Serialize;

use crate::coupling::feedback::GridCondition;

use super::types::StepResult;

/// Aggregate key performance indicators for a complete run.
///
/// Computed post-hoc from `Vec<StepResult>` so the report always agrees
/// with the exported step records.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    /// Highest total load seen in any step (MW).
    pub peak_load_mw: f32,
    /// Highest feeder loading ratio seen in any step.
    pub peak_loading: f32,
    /// Steps spent in each grid condition, in severity order.
    pub normal_steps: usize,
    pub stressed_steps: usize,
    pub critical_steps: usize,
    pub blackout_steps: usize,
    /// Energy actually generated over the run (MWh).
    pub energy_served_mwh: f32,
    /// Energy left unserved due to dispatch shortages (MWh).
    pub energy_unserved_mwh: f32,
    /// EV charging energy delivered (MWh).
    pub ev_energy_mwh: f32,
    /// EV charging energy lost to feedback throttling (MWh).
    pub ev_curtailed_mwh: f32,
    /// Mean renewable share of generation across steps.
    pub mean_renewable_share: f32,
    /// Steps in which at least one feeder was overloaded.
    pub feeder_overload_steps: usize,
}

impl KpiReport {
    /// Computes all KPIs from the complete step record vector.
    pub fn from_results(results: &[StepResult], dt_hours: f32) -> Self {
        let mut report = Self {
            peak_load_mw: 0.0,
            peak_loading: 0.0,
            normal_steps: 0,
            stressed_steps: 0,
            critical_steps: 0,
            blackout_steps: 0,
            energy_served_mwh: 0.0,
            energy_unserved_mwh: 0.0,
            ev_energy_mwh: 0.0,
            ev_curtailed_mwh: 0.0,
            mean_renewable_share: 0.0,
            feeder_overload_steps: 0,
        };
        if results.is_empty() {
            return report;
        }

        let mut renewable_sum = 0.0_f32;
        for r in results {
            report.peak_load_mw = report.peak_load_mw.max(r.total_load_mw);
            if r.max_loading.is_finite() {
                report.peak_loading = report.peak_loading.max(r.max_loading);
            }

            match r.condition {
                GridCondition::Normal => report.normal_steps += 1,
                GridCondition::Stressed => report.stressed_steps += 1,
                GridCondition::Critical => report.critical_steps += 1,
                GridCondition::Blackout => report.blackout_steps += 1,
            }

            report.energy_served_mwh += r.generation_mw * dt_hours;
            report.energy_unserved_mwh += r.shortage_mw * dt_hours;
            report.ev_energy_mwh += r.ev_mw * dt_hours;
            report.ev_curtailed_mwh += (r.ev_potential_mw - r.ev_mw).max(0.0) * dt_hours;
            renewable_sum += r.renewable_share;

            if !r.feeders_ok {
                report.feeder_overload_steps += 1;
            }
        }

        report.mean_renewable_share = renewable_sum / results.len() as f32;
        report
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Peak load:            {:.1} MW", self.peak_load_mw)?;
        writeln!(f, "Peak feeder loading:  {:.2}", self.peak_loading)?;
        writeln!(
            f,
            "Conditions:           normal={} stressed={} critical={} blackout={}",
            self.normal_steps, self.stressed_steps, self.critical_steps, self.blackout_steps
        )?;
        writeln!(f, "Energy served:        {:.1} MWh", self.energy_served_mwh)?;
        writeln!(f, "Energy unserved:      {:.1} MWh", self.energy_unserved_mwh)?;
        writeln!(
            f,
            "EV energy:            {:.2} MWh ({:.2} MWh curtailed)",
            self.ev_energy_mwh, self.ev_curtailed_mwh
        )?;
        writeln!(
            f,
            "Mean renewable share: {:.1}%",
            self.mean_renewable_share * 100.0
        )?;
        write!(f, "Feeder overloads:     {} steps", self.feeder_overload_steps)
    }
}
