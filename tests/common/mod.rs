//! Shared test fixtures for integration tests.

use citygrid_sim::config::{GeneratorConfig, ScenarioConfig, ZoneConfig};
use citygrid_sim::sim::engine::Engine;
use citygrid_sim::sim::types::StepResult;

/// Downtown preset with traffic noise removed, for reproducible assertions.
pub fn downtown_quiet() -> ScenarioConfig {
    let mut cfg = ScenarioConfig::downtown();
    cfg.traffic.noise_std = 0.0;
    cfg
}

/// Minimal single-zone scenario with a flexible base load and feeder size.
///
/// One gas unit large enough that dispatch never falls short, a handful of
/// intersections, and no EV charging, so feeder loading is driven almost
/// entirely by `base_load_mw` times the hourly demand factor.
pub fn single_zone(base_load_mw: f32, feeder_capacity_mw: f32) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::downtown();
    cfg.traffic.noise_std = 0.0;
    cfg.traffic.base_vehicles = 1000.0;
    cfg.zones = vec![ZoneConfig {
        name: "Core".to_string(),
        base_load_mw,
        feeder_capacity_mw,
        road_km: 10.0,
        intersections: 5,
        heads_per_intersection: 4,
        traffic_share: 1.0,
        charge_points: 0,
        charger_kind: "ac_level2".to_string(),
    }];
    cfg.generators = vec![GeneratorConfig {
        name: "Plant".to_string(),
        capacity_mw: 10_000.0,
        marginal_cost: 40.0,
        kind: "gas".to_string(),
    }];
    cfg
}

/// Runs a scenario to completion and returns the step records.
pub fn run_scenario(cfg: &ScenarioConfig) -> Vec<StepResult> {
    Engine::from_scenario(cfg).run()
}
