//! CSV export for simulation step records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::StepResult;

/// Schema v1 column header for CSV telemetry export.
const HEADER: &str = "timestep,hour,vehicles,base_mw,signals_mw,street_lights_mw,\
                      ev_mw,ev_potential_mw,total_load_mw,generation_mw,shortage_mw,\
                      renewable_share,max_loading,condition,signal_mode,street_dimming,\
                      ev_limit,affected_intersections,feeders_ok";

/// Exports simulation results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step using the schema v1
/// column layout. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[StepResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes simulation results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[StepResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        wtr.write_record(&[
            r.timestep.to_string(),
            format!("{:.2}", r.hour),
            r.vehicles.to_string(),
            format!("{:.4}", r.base_mw),
            format!("{:.4}", r.signals_mw),
            format!("{:.4}", r.street_lights_mw),
            format!("{:.4}", r.ev_mw),
            format!("{:.4}", r.ev_potential_mw),
            format!("{:.4}", r.total_load_mw),
            format!("{:.4}", r.generation_mw),
            format!("{:.4}", r.shortage_mw),
            format!("{:.4}", r.renewable_share),
            format!("{:.4}", r.max_loading),
            r.condition.to_string(),
            r.signal_mode.to_string(),
            format!("{:.2}", r.street_dimming),
            r.ev_limit.to_string(),
            r.affected_intersections.to_string(),
            r.feeders_ok.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
