//! Traffic-to-power conversion.
//!
//! Turns one step of traffic state (vehicle counts, signal head colors,
//! EV charging activity, street lighting) into per-zone MW loads, with
//! the previous step's [`TrafficResponse`] throttles applied.

use crate::coupling::feedback::{EvChargeLimit, TrafficResponse};
use crate::power::profile::base_load_factor;
use crate::traffic::TrafficSnapshot;
use crate::traffic::demand::DayPeriod;
use crate::traffic::signals::ColorCounts;

/// Charger hardware installed at a zone's charging sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargerKind {
    /// AC Level 2 pedestal chargers.
    AcLevel2,
    /// DC fast-charging stations.
    DcFast,
}

/// Per-zone coupling parameters.
#[derive(Debug, Clone)]
pub struct ZoneProfile {
    /// Peak background (non-traffic) load in MW, scaled by the hourly factor.
    pub base_peak_mw: f32,
    /// Lit road length in km.
    pub road_km: f32,
    /// Number of charging points.
    pub charge_points: u32,
    /// Charger hardware at those points.
    pub charger_kind: ChargerKind,
}

/// Aggregated power demand for one step.
#[derive(Debug, Clone)]
pub struct PowerDemand {
    /// Hourly-factored background load in MW.
    pub base_mw: f32,
    /// Traffic-signal head load in MW.
    pub signals_mw: f32,
    /// Street-lighting load in MW, after dimming.
    pub street_lights_mw: f32,
    /// EV charging load in MW, after throttling.
    pub ev_mw: f32,
    /// EV charging load in MW had no throttle applied.
    pub ev_potential_mw: f32,
    /// Sum of base, signal, street-light and EV loads in MW.
    pub total_mw: f32,
    /// Per-zone totals, aligned with the zone order.
    pub zone_mw: Vec<f32>,
}

/// Converts traffic state into MW loads.
#[derive(Debug, Clone)]
pub struct LoadCoupler {
    zones: Vec<ZoneProfile>,
    /// Fraction of vehicles that are EVs.
    ev_share: f32,
    green_kw: f32,
    yellow_kw: f32,
    red_kw: f32,
    /// Night-time street-light draw per km at full output.
    kw_per_km: f32,
    /// Daytime standby draw per km.
    day_kw_per_km: f32,
    dawn_hour: f32,
    dusk_hour: f32,
    dc_fast_kw: f32,
    ac_level2_kw: f32,
    ac_level1_kw: f32,
    /// Grid-side charging efficiency divisor applied as a multiplier.
    efficiency: f32,
}

/// Parameters for [`LoadCoupler::new`], grouped to keep call sites readable.
#[derive(Debug, Clone)]
pub struct CouplerParams {
    pub ev_share: f32,
    pub green_kw: f32,
    pub yellow_kw: f32,
    pub red_kw: f32,
    pub kw_per_km: f32,
    pub day_kw_per_km: f32,
    pub dawn_hour: f32,
    pub dusk_hour: f32,
    pub dc_fast_kw: f32,
    pub ac_level2_kw: f32,
    pub ac_level1_kw: f32,
    pub efficiency: f32,
}

impl Default for CouplerParams {
    fn default() -> Self {
        Self {
            ev_share: 0.30,
            green_kw: 0.5,
            yellow_kw: 0.4,
            red_kw: 0.3,
            kw_per_km: 15.0,
            day_kw_per_km: 0.5,
            dawn_hour: 6.0,
            dusk_hour: 18.0,
            dc_fast_kw: 150.0,
            ac_level2_kw: 19.2,
            ac_level1_kw: 1.4,
            efficiency: 0.9,
        }
    }
}

impl LoadCoupler {
    /// Creates a coupler for the given zones.
    ///
    /// # Panics
    ///
    /// Panics if `zones` is empty, `ev_share` is outside `[0, 1]`,
    /// `efficiency` is outside `(0, 1]`, or `dawn_hour >= dusk_hour`.
    pub fn new(zones: Vec<ZoneProfile>, params: CouplerParams) -> Self {
        assert!(!zones.is_empty(), "at least one zone required");
        assert!((0.0..=1.0).contains(&params.ev_share));
        assert!(params.efficiency > 0.0 && params.efficiency <= 1.0);
        assert!(params.dawn_hour < params.dusk_hour);
        Self {
            zones,
            ev_share: params.ev_share,
            green_kw: params.green_kw,
            yellow_kw: params.yellow_kw,
            red_kw: params.red_kw,
            kw_per_km: params.kw_per_km,
            day_kw_per_km: params.day_kw_per_km,
            dawn_hour: params.dawn_hour,
            dusk_hour: params.dusk_hour,
            dc_fast_kw: params.dc_fast_kw,
            ac_level2_kw: params.ac_level2_kw,
            ac_level1_kw: params.ac_level1_kw,
            efficiency: params.efficiency,
        }
    }

    /// Number of configured zones.
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Per-color head power in kW, the intersection power-ranking weights.
    pub fn signal_color_kw(&self) -> (f32, f32, f32) {
        (self.green_kw, self.yellow_kw, self.red_kw)
    }

    /// Fraction of vehicles plugged in during the given period.
    fn charging_propensity(period: DayPeriod) -> f32 {
        match period {
            DayPeriod::MorningRush => 0.1,
            DayPeriod::Day => 0.3,
            DayPeriod::EveningRush => 0.4,
            DayPeriod::Night => 0.2,
        }
    }

    fn is_night(&self, hour: f32) -> bool {
        hour < self.dawn_hour || hour >= self.dusk_hour
    }

    /// Adaptive street-light dimming by vehicle density (vehicles per km).
    fn density_dimming(density: f32) -> f32 {
        if density < 5.0 {
            0.3
        } else if density < 20.0 {
            0.6
        } else {
            1.0
        }
    }

    /// Per-charger rate in kW after the response throttle.
    fn charge_rate_kw(&self, kind: ChargerKind, limit: EvChargeLimit) -> f32 {
        let rated = match kind {
            ChargerKind::AcLevel2 => self.ac_level2_kw,
            ChargerKind::DcFast => self.dc_fast_kw,
        };
        match limit {
            EvChargeLimit::Unlimited => rated,
            EvChargeLimit::Level2 => rated.min(self.ac_level2_kw),
            EvChargeLimit::Level1 => rated.min(self.ac_level1_kw),
            EvChargeLimit::Suspended => 0.0,
        }
    }

    /// Computes the step's power demand.
    ///
    /// `zone_colors` is the per-zone signal color census for the states the
    /// controller actually applied this step; `response` is the throttle
    /// package computed from the previous step's grid evaluation.
    pub fn demand(
        &self,
        hour: f32,
        snapshot: &TrafficSnapshot,
        zone_colors: &[ColorCounts],
        response: &TrafficResponse,
    ) -> PowerDemand {
        assert_eq!(zone_colors.len(), self.zones.len());
        assert_eq!(snapshot.zone_vehicles.len(), self.zones.len());

        let period = DayPeriod::at(hour);
        let load_factor = base_load_factor(hour);
        let propensity = Self::charging_propensity(period);
        let night = self.is_night(hour);

        let mut base_mw = 0.0;
        let mut signals_mw = 0.0;
        let mut street_mw = 0.0;
        let mut ev_mw = 0.0;
        let mut ev_potential_mw = 0.0;
        let mut zone_mw = Vec::with_capacity(self.zones.len());

        for (zone_idx, zone) in self.zones.iter().enumerate() {
            let vehicles = snapshot.zone_vehicles[zone_idx] as f32;

            let base = zone.base_peak_mw * load_factor;

            let colors = &zone_colors[zone_idx];
            let signals = (colors.green as f32 * self.green_kw
                + colors.yellow as f32 * self.yellow_kw
                + colors.red as f32 * self.red_kw)
                / 1000.0;

            let street_kw = if night {
                let density = if zone.road_km > 0.0 {
                    vehicles / zone.road_km
                } else {
                    0.0
                };
                self.kw_per_km * zone.road_km * Self::density_dimming(density)
            } else {
                self.day_kw_per_km * zone.road_km
            };
            let street = street_kw * response.street_dimming / 1000.0;

            let evs = vehicles * self.ev_share;
            let occupancy = (evs * propensity).min(zone.charge_points as f32);
            let rated_kw = self.charge_rate_kw(zone.charger_kind, EvChargeLimit::Unlimited);
            let limited_kw = self.charge_rate_kw(zone.charger_kind, response.ev_limit);
            let ev = occupancy * limited_kw * self.efficiency / 1000.0;
            let ev_potential = occupancy * rated_kw * self.efficiency / 1000.0;

            base_mw += base;
            signals_mw += signals;
            street_mw += street;
            ev_mw += ev;
            ev_potential_mw += ev_potential;
            zone_mw.push(base + signals + street + ev);
        }

        PowerDemand {
            base_mw,
            signals_mw,
            street_lights_mw: street_mw,
            ev_mw,
            ev_potential_mw,
            total_mw: base_mw + signals_mw + street_mw + ev_mw,
            zone_mw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_zone(charge_points: u32, kind: ChargerKind) -> LoadCoupler {
        let zones = vec![ZoneProfile {
            base_peak_mw: 100.0,
            road_km: 10.0,
            charge_points,
            charger_kind: kind,
        }];
        LoadCoupler::new(zones, CouplerParams::default())
    }

    fn snapshot(vehicles: u32) -> TrafficSnapshot {
        TrafficSnapshot {
            total_vehicles: vehicles,
            zone_vehicles: vec![vehicles],
        }
    }

    fn colors(green: u32, yellow: u32, red: u32) -> Vec<ColorCounts> {
        vec![ColorCounts { green, yellow, red }]
    }

    #[test]
    fn signal_load_uses_per_color_rates() {
        let coupler = one_zone(0, ChargerKind::AcLevel2);
        let demand = coupler.demand(
            12.0,
            &snapshot(0),
            &colors(10, 2, 8),
            &TrafficResponse::normal(),
        );
        // 10*0.5 + 2*0.4 + 8*0.3 = 8.2 kW
        assert!((demand.signals_mw - 0.0082).abs() < 1e-6);
    }

    #[test]
    fn base_load_follows_hourly_factor() {
        let coupler = one_zone(0, ChargerKind::AcLevel2);
        let noon = coupler.demand(12.0, &snapshot(0), &colors(0, 0, 0), &TrafficResponse::normal());
        let night = coupler.demand(2.0, &snapshot(0), &colors(0, 0, 0), &TrafficResponse::normal());
        assert!((noon.base_mw - 90.0).abs() < 1e-4);
        assert!((night.base_mw - 60.0).abs() < 1e-4);
    }

    #[test]
    fn street_lights_dim_with_low_density() {
        let coupler = one_zone(0, ChargerKind::AcLevel2);
        let resp = TrafficResponse::normal();
        // 2 vehicles on 10 km: density 0.2, dimming 0.3
        let quiet = coupler.demand(23.0, &snapshot(2), &colors(0, 0, 0), &resp);
        assert!((quiet.street_lights_mw - 15.0 * 10.0 * 0.3 / 1000.0).abs() < 1e-6);
        // 100 vehicles: density 10, dimming 0.6
        let mid = coupler.demand(23.0, &snapshot(100), &colors(0, 0, 0), &resp);
        assert!((mid.street_lights_mw - 15.0 * 10.0 * 0.6 / 1000.0).abs() < 1e-6);
        // 300 vehicles: density 30, full output
        let busy = coupler.demand(23.0, &snapshot(300), &colors(0, 0, 0), &resp);
        assert!((busy.street_lights_mw - 15.0 * 10.0 / 1000.0).abs() < 1e-6);
    }

    #[test]
    fn street_lights_standby_during_day() {
        let coupler = one_zone(0, ChargerKind::AcLevel2);
        let demand = coupler.demand(
            12.0,
            &snapshot(500),
            &colors(0, 0, 0),
            &TrafficResponse::normal(),
        );
        assert!((demand.street_lights_mw - 0.5 * 10.0 / 1000.0).abs() < 1e-6);
    }

    #[test]
    fn response_dimming_multiplies_street_load() {
        let coupler = one_zone(0, ChargerKind::AcLevel2);
        let mut resp = TrafficResponse::normal();
        resp.street_dimming = 0.5;
        let demand = coupler.demand(23.0, &snapshot(300), &colors(0, 0, 0), &resp);
        assert!((demand.street_lights_mw - 15.0 * 10.0 * 0.5 / 1000.0).abs() < 1e-6);
    }

    #[test]
    fn ev_load_capped_by_charge_points() {
        let coupler = one_zone(5, ChargerKind::AcLevel2);
        // day: 1000 vehicles, 300 EVs, propensity 0.3 -> 90 would-be chargers
        let demand = coupler.demand(
            12.0,
            &snapshot(1000),
            &colors(0, 0, 0),
            &TrafficResponse::normal(),
        );
        let expected = 5.0 * 19.2 * 0.9 / 1000.0;
        assert!((demand.ev_mw - expected).abs() < 1e-6);
        assert!((demand.ev_potential_mw - expected).abs() < 1e-6);
    }

    #[test]
    fn ev_throttle_caps_dc_fast_rate() {
        let coupler = one_zone(100, ChargerKind::DcFast);
        let mut resp = TrafficResponse::normal();
        resp.ev_limit = EvChargeLimit::Level2;
        let demand = coupler.demand(12.0, &snapshot(1000), &colors(0, 0, 0), &resp);
        // 300 EVs * 0.3 propensity = 90 occupied points at 19.2 kW
        let expected = 90.0 * 19.2 * 0.9 / 1000.0;
        assert!((demand.ev_mw - expected).abs() < 1e-5);
        // potential is the unthrottled DC fast figure
        let potential = 90.0 * 150.0 * 0.9 / 1000.0;
        assert!((demand.ev_potential_mw - potential).abs() < 1e-4);
        assert!(demand.ev_mw < demand.ev_potential_mw);
    }

    #[test]
    fn suspended_charging_and_zero_dimming_zero_out() {
        let coupler = one_zone(50, ChargerKind::DcFast);
        let mut resp = TrafficResponse::normal();
        resp.ev_limit = EvChargeLimit::Suspended;
        resp.street_dimming = 0.0;
        let demand = coupler.demand(22.0, &snapshot(500), &colors(0, 0, 0), &resp);
        assert_eq!(demand.ev_mw, 0.0);
        assert_eq!(demand.street_lights_mw, 0.0);
        assert!(demand.ev_potential_mw > 0.0);
    }

    #[test]
    fn zero_charge_points_contribute_nothing() {
        let coupler = one_zone(0, ChargerKind::DcFast);
        let demand = coupler.demand(
            12.0,
            &snapshot(1000),
            &colors(0, 0, 0),
            &TrafficResponse::normal(),
        );
        assert_eq!(demand.ev_mw, 0.0);
        assert_eq!(demand.ev_potential_mw, 0.0);
    }

    #[test]
    fn totals_add_up() {
        let coupler = one_zone(20, ChargerKind::AcLevel2);
        let demand = coupler.demand(
            18.5,
            &snapshot(800),
            &colors(12, 4, 12),
            &TrafficResponse::normal(),
        );
        let sum = demand.base_mw + demand.signals_mw + demand.street_lights_mw + demand.ev_mw;
        assert!((demand.total_mw - sum).abs() < 1e-5);
        assert!((demand.zone_mw.iter().sum::<f32>() - demand.total_mw).abs() < 1e-5);
    }
}
