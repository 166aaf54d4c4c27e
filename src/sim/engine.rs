//! Co-simulation engine closing the traffic/grid feedback loop.

use crate::config::ScenarioConfig;
use crate::coupling::demand::{CouplerParams, LoadCoupler, ZoneProfile};
use crate::coupling::feedback::{ResponsePolicy, TrafficResponse};
use crate::power::feeder::ZoneFeeder;
use crate::power::network::{Generator, GridModel};
use crate::traffic::demand::TrafficDemand;
use crate::traffic::signals::SignalController;

use super::clock::Clock;
use super::event::OutageEvent;
use super::types::{SimConfig, StepResult};

/// Simulation engine owning the traffic models, the grid model, and the
/// coupling between them.
///
/// Each step closes the loop with a one-step actuation delay: the traffic
/// response computed from step `t`'s grid evaluation is what the signal
/// controller, street lights, and chargers apply during step `t + 1`.
pub struct Engine {
    config: SimConfig,
    demand: TrafficDemand,
    signals: SignalController,
    coupler: LoadCoupler,
    grid: GridModel,
    policy: ResponsePolicy,
    outage: Option<OutageEvent>,
    /// Response computed last step, applied on the next one.
    pending: TrafficResponse,
}

impl Engine {
    /// Builds an engine from a validated scenario configuration.
    ///
    /// # Panics
    ///
    /// Panics on configurations that [`ScenarioConfig::validate`] rejects
    /// (empty zones, unordered thresholds, out-of-range outage).
    pub fn from_scenario(cfg: &ScenarioConfig) -> Self {
        let sim = SimConfig::new(
            cfg.simulation.steps_per_day,
            cfg.simulation.days,
            cfg.simulation.seed,
        );

        let shares: Vec<f32> = cfg.zones.iter().map(|z| z.traffic_share).collect();
        let demand = TrafficDemand::new(
            cfg.traffic.base_vehicles,
            cfg.traffic.noise_std,
            shares,
            sim.seed,
        );

        let signal_zones: Vec<(usize, usize)> = cfg
            .zones
            .iter()
            .map(|z| (z.intersections, z.heads_per_intersection))
            .collect();
        // distinct stream so signal staggering does not consume traffic noise
        let signals = SignalController::new(&signal_zones, sim.seed.wrapping_add(1));

        let profiles: Vec<ZoneProfile> = cfg
            .zones
            .iter()
            .map(|z| ZoneProfile {
                base_peak_mw: z.base_load_mw,
                road_km: z.road_km,
                charge_points: z.charge_points,
                charger_kind: z.parsed_charger_kind(),
            })
            .collect();
        let coupler = LoadCoupler::new(
            profiles,
            CouplerParams {
                ev_share: cfg.traffic.ev_share,
                green_kw: cfg.signal_power.green_kw,
                yellow_kw: cfg.signal_power.yellow_kw,
                red_kw: cfg.signal_power.red_kw,
                kw_per_km: cfg.lighting.kw_per_km,
                day_kw_per_km: cfg.lighting.day_kw_per_km,
                dawn_hour: cfg.lighting.dawn_hour,
                dusk_hour: cfg.lighting.dusk_hour,
                dc_fast_kw: cfg.charging.dc_fast_kw,
                ac_level2_kw: cfg.charging.ac_level2_kw,
                ac_level1_kw: cfg.charging.ac_level1_kw,
                efficiency: cfg.charging.efficiency,
            },
        );

        let feeders: Vec<ZoneFeeder> = cfg
            .zones
            .iter()
            .map(|z| ZoneFeeder::new(z.name.clone(), z.feeder_capacity_mw))
            .collect();
        let fleet: Vec<Generator> = cfg
            .generators
            .iter()
            .map(|g| Generator::new(g.name.clone(), g.capacity_mw, g.marginal_cost, g.parsed_kind()))
            .collect();
        let grid = GridModel::new(feeders, fleet);

        let policy = ResponsePolicy::new(
            cfg.thresholds.stressed,
            cfg.thresholds.critical,
            cfg.thresholds.blackout,
        );
        let outage = cfg
            .outage
            .as_ref()
            .map(|o| OutageEvent::new(o.zone, o.start_step, o.end_step, o.derate));

        Self {
            config: sim,
            demand,
            signals,
            coupler,
            grid,
            policy,
            outage,
            pending: TrafficResponse::normal(),
        }
    }

    /// Executes one timestep and returns the step record.
    ///
    /// The pipeline: sample traffic, run the signal programs under the
    /// pending response, convert traffic to MW, load and (possibly derate)
    /// the feeders, dispatch the fleet, evaluate the grid condition, and
    /// stage the next response.
    pub fn step(&mut self, t: usize) -> StepResult {
        let hour = self.config.hour_of_day(t);
        let applied = self.pending.clone();

        // 1. Traffic side under the applied response
        let snapshot = self.demand.sample(hour);
        self.signals.step(applied.signal_mode, &applied.affected);
        let zone_colors = self.signals.zone_color_counts(self.coupler.zone_count());

        // 2. Traffic -> power
        let demand = self.coupler.demand(hour, &snapshot, &zone_colors, &applied);

        // 3. Feeder loads and scripted outage
        self.grid.reset_loads();
        for (zone, mw) in demand.zone_mw.iter().enumerate() {
            self.grid.add_zone_load(zone, *mw);
        }
        if let Some(outage) = &self.outage {
            self.grid.feeder_mut(outage.zone).set_derate(outage.derate_at(t));
        }

        // 4. Dispatch and grid evaluation
        let dispatch = self.grid.dispatch(hour);
        let max_loading = self.grid.max_loading();
        let feeders_ok = self.grid.feeders_ok();
        let condition = self.policy.condition(max_loading, dispatch.shortage_mw);

        // 5. Power -> traffic, staged for the next step
        let (green_kw, yellow_kw, red_kw) = self.coupler.signal_color_kw();
        let ranked = self.signals.ranked_by_power(green_kw, yellow_kw, red_kw);
        self.pending = self.policy.response(condition, &ranked);

        StepResult {
            timestep: t,
            hour,
            vehicles: snapshot.total_vehicles,
            base_mw: demand.base_mw,
            signals_mw: demand.signals_mw,
            street_lights_mw: demand.street_lights_mw,
            ev_mw: demand.ev_mw,
            ev_potential_mw: demand.ev_potential_mw,
            total_load_mw: demand.total_mw,
            generation_mw: dispatch.total_mw,
            shortage_mw: dispatch.shortage_mw,
            renewable_share: dispatch.renewable_share,
            max_loading,
            condition,
            signal_mode: applied.signal_mode,
            street_dimming: applied.street_dimming,
            ev_limit: applied.ev_limit,
            affected_intersections: applied.affected.len(),
            feeders_ok,
        }
    }

    /// Executes all timesteps and returns the complete step record vector.
    pub fn run(&mut self) -> Vec<StepResult> {
        let mut clock = Clock::new(self.config.total_steps());
        let mut results = Vec::with_capacity(clock.remaining());
        while let Some(t) = clock.tick() {
            results.push(self.step(t));
        }
        results
    }

    /// Returns a reference to the simulation configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The response staged for the next step.
    pub fn pending_response(&self) -> &TrafficResponse {
        &self.pending
    }
}
