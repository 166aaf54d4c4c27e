/// Step clock for the run loop.
pub mod clock;
pub mod engine;
/// Scripted grid disturbance events.
pub mod event;
pub mod kpi;
pub mod types;
