//! Generator fleet and merit-order dispatch approximation.

use super::feeder::ZoneFeeder;
use super::profile::solar_availability;

/// Generator technology, which determines availability and the renewable
/// share accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Dispatchable thermal unit, available around the clock.
    Gas,
    /// Solar unit, capped by [`solar_availability`].
    Solar,
}

/// A single generating unit.
#[derive(Debug, Clone)]
pub struct Generator {
    /// Unit name.
    pub name: String,
    /// Nameplate capacity in MW.
    pub capacity_mw: f32,
    /// Marginal cost in $/MWh, the merit-order sort key.
    pub marginal_cost: f32,
    /// Technology kind.
    pub kind: GeneratorKind,
}

impl Generator {
    /// Creates a new generator.
    ///
    /// # Panics
    ///
    /// Panics if `capacity_mw` is negative.
    pub fn new(
        name: impl Into<String>,
        capacity_mw: f32,
        marginal_cost: f32,
        kind: GeneratorKind,
    ) -> Self {
        assert!(capacity_mw >= 0.0);
        Self {
            name: name.into(),
            capacity_mw,
            marginal_cost,
            kind,
        }
    }

    /// Available output at the given hour, before dispatch.
    pub fn available_mw(&self, hour: f32) -> f32 {
        match self.kind {
            GeneratorKind::Gas => self.capacity_mw,
            GeneratorKind::Solar => self.capacity_mw * solar_availability(hour),
        }
    }
}

/// Outcome of one merit-order dispatch pass.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    /// Per-generator output in MW, aligned with the fleet order.
    pub outputs_mw: Vec<f32>,
    /// Total dispatched generation in MW.
    pub total_mw: f32,
    /// Load left unserved after the fleet is exhausted (MW, >= 0).
    pub shortage_mw: f32,
    /// Fraction of dispatched energy from solar units.
    pub renewable_share: f32,
}

/// Zonal grid model: one feeder per zone plus a shared generator fleet.
///
/// Dispatch is a merit-order approximation: generators serve load in
/// ascending marginal-cost order, each capped by its hourly availability.
/// No network flow is solved; stress is read from per-zone feeder loading.
#[derive(Debug, Clone)]
pub struct GridModel {
    feeders: Vec<ZoneFeeder>,
    fleet: Vec<Generator>,
    /// Fleet indices in ascending marginal-cost order, fixed at build time.
    merit_order: Vec<usize>,
}

impl GridModel {
    /// Creates a grid model from zone feeders and a generator fleet.
    ///
    /// # Panics
    ///
    /// Panics if `feeders` or `fleet` is empty.
    pub fn new(feeders: Vec<ZoneFeeder>, fleet: Vec<Generator>) -> Self {
        assert!(!feeders.is_empty(), "at least one zone feeder required");
        assert!(!fleet.is_empty(), "at least one generator required");

        let mut merit_order: Vec<usize> = (0..fleet.len()).collect();
        merit_order.sort_by(|&a, &b| {
            fleet[a]
                .marginal_cost
                .partial_cmp(&fleet[b].marginal_cost)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Self {
            feeders,
            fleet,
            merit_order,
        }
    }

    /// Clears all feeder loads for the next step.
    pub fn reset_loads(&mut self) {
        for feeder in &mut self.feeders {
            feeder.reset();
        }
    }

    /// Adds a consumption contribution to a zone's feeder.
    pub fn add_zone_load(&mut self, zone: usize, mw: f32) {
        self.feeders[zone].add_mw(mw);
    }

    /// Mutable access to a zone feeder (outage derating).
    pub fn feeder_mut(&mut self, zone: usize) -> &mut ZoneFeeder {
        &mut self.feeders[zone]
    }

    /// Zone feeders in scenario order.
    pub fn feeders(&self) -> &[ZoneFeeder] {
        &self.feeders
    }

    /// Generator fleet in scenario order.
    pub fn fleet(&self) -> &[Generator] {
        &self.fleet
    }

    /// Total load currently on all feeders, in MW.
    pub fn total_load_mw(&self) -> f32 {
        self.feeders.iter().map(ZoneFeeder::net_mw).sum()
    }

    /// Highest loading ratio across all feeders.
    pub fn max_loading(&self) -> f32 {
        self.feeders
            .iter()
            .map(ZoneFeeder::loading)
            .fold(0.0, f32::max)
    }

    /// Returns `true` when every feeder is within effective capacity.
    pub fn feeders_ok(&self) -> bool {
        !self.feeders.iter().any(ZoneFeeder::overloaded)
    }

    /// Serves the accumulated load in ascending marginal-cost order.
    ///
    /// Each unit contributes `min(available, remaining)`; solar units are
    /// capped by the hourly availability profile. Generation never exceeds
    /// load, and any residual becomes `shortage_mw`.
    pub fn dispatch(&self, hour: f32) -> DispatchResult {
        let load = self.total_load_mw();
        let mut outputs_mw = vec![0.0; self.fleet.len()];
        let mut remaining = load;
        let mut total = 0.0;
        let mut solar_total = 0.0;

        for &idx in &self.merit_order {
            if remaining <= 0.0 {
                break;
            }
            let unit = &self.fleet[idx];
            let output = unit.available_mw(hour).min(remaining);
            outputs_mw[idx] = output;
            total += output;
            if unit.kind == GeneratorKind::Solar {
                solar_total += output;
            }
            remaining -= output;
        }

        DispatchResult {
            outputs_mw,
            total_mw: total,
            shortage_mw: remaining.max(0.0),
            renewable_share: if total > 0.0 { solar_total / total } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> GridModel {
        let feeders = vec![
            ZoneFeeder::new("A", 200.0),
            ZoneFeeder::new("B", 150.0),
        ];
        let fleet = vec![
            Generator::new("Peaker", 50.0, 150.0, GeneratorKind::Gas),
            Generator::new("Baseload", 200.0, 50.0, GeneratorKind::Gas),
            Generator::new("Solar", 100.0, 0.0, GeneratorKind::Solar),
        ];
        GridModel::new(feeders, fleet)
    }

    #[test]
    fn merit_order_sorted_by_cost() {
        let grid = small_grid();
        // solar (0) before baseload (50) before peaker (150)
        assert_eq!(grid.merit_order, vec![2, 1, 0]);
    }

    #[test]
    fn solar_dispatched_first_at_noon() {
        let mut grid = small_grid();
        grid.add_zone_load(0, 120.0);
        let result = grid.dispatch(12.0);
        // solar fully available at noon: 100 MW, then baseload for the rest
        assert!((result.outputs_mw[2] - 100.0).abs() < 1e-4);
        assert!((result.outputs_mw[1] - 20.0).abs() < 1e-4);
        assert_eq!(result.outputs_mw[0], 0.0);
        assert!((result.renewable_share - 100.0 / 120.0).abs() < 1e-5);
    }

    #[test]
    fn no_solar_at_night() {
        let mut grid = small_grid();
        grid.add_zone_load(0, 120.0);
        let result = grid.dispatch(2.0);
        assert_eq!(result.outputs_mw[2], 0.0);
        assert!((result.outputs_mw[1] - 120.0).abs() < 1e-4);
        assert_eq!(result.renewable_share, 0.0);
    }

    #[test]
    fn generation_matches_load_when_feasible() {
        let mut grid = small_grid();
        grid.add_zone_load(0, 80.0);
        grid.add_zone_load(1, 60.0);
        let result = grid.dispatch(10.0);
        assert!((result.total_mw - 140.0).abs() < 1e-4);
        assert_eq!(result.shortage_mw, 0.0);
    }

    #[test]
    fn shortage_when_fleet_exhausted_at_night() {
        let mut grid = small_grid();
        // night: only 250 MW of gas available
        grid.add_zone_load(0, 190.0);
        grid.add_zone_load(1, 110.0);
        let result = grid.dispatch(1.0);
        assert!((result.total_mw - 250.0).abs() < 1e-4);
        assert!((result.shortage_mw - 50.0).abs() < 1e-4);
    }

    #[test]
    fn outputs_never_exceed_capacity() {
        let mut grid = small_grid();
        grid.add_zone_load(0, 1000.0);
        let result = grid.dispatch(12.0);
        for (output, unit) in result.outputs_mw.iter().zip(grid.fleet()) {
            assert!(*output <= unit.capacity_mw + 1e-4);
        }
    }

    #[test]
    fn max_loading_and_feeders_ok() {
        let mut grid = small_grid();
        grid.add_zone_load(0, 100.0); // 0.5
        grid.add_zone_load(1, 120.0); // 0.8
        assert!((grid.max_loading() - 0.8).abs() < 1e-6);
        assert!(grid.feeders_ok());

        grid.add_zone_load(1, 40.0); // 160/150 > 1
        assert!(!grid.feeders_ok());
    }

    #[test]
    fn reset_clears_all_feeders() {
        let mut grid = small_grid();
        grid.add_zone_load(0, 10.0);
        grid.add_zone_load(1, 20.0);
        grid.reset_loads();
        assert_eq!(grid.total_load_mw(), 0.0);
    }
}
