//! Time-of-day traffic volume model.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::TrafficSnapshot;

/// Coarse time-of-day period used by the volume and charging profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
    /// 06:00–09:00.
    MorningRush,
    /// 09:00–17:00.
    Day,
    /// 17:00–20:00.
    EveningRush,
    /// 20:00–06:00.
    Night,
}

impl DayPeriod {
    /// Classifies a fractional hour of day in `[0, 24)`.
    pub fn at(hour: f32) -> Self {
        if (6.0..9.0).contains(&hour) {
            Self::MorningRush
        } else if (9.0..17.0).contains(&hour) {
            Self::Day
        } else if (17.0..20.0).contains(&hour) {
            Self::EveningRush
        } else {
            Self::Night
        }
    }

    /// Vehicle volume multiplier relative to midday traffic.
    pub fn traffic_factor(self) -> f32 {
        match self {
            Self::MorningRush | Self::EveningRush => 1.5,
            Self::Day => 1.0,
            Self::Night => 0.2,
        }
    }
}

/// Seeded citywide traffic volume generator.
///
/// Volume follows the rush-hour profile (`DayPeriod::traffic_factor`)
/// scaled by `base_vehicles`, with multiplicative Gaussian noise.
/// Zone counts are a fixed-share split of the citywide total.
#[derive(Debug, Clone)]
pub struct TrafficDemand {
    /// Midday citywide vehicle count.
    pub base_vehicles: f32,
    /// Standard deviation of the multiplicative noise (e.g. 0.05 for ±5%).
    pub noise_std: f32,
    /// Per-zone share of citywide traffic. Must sum to ~1.0.
    shares: Vec<f32>,
    rng: StdRng,
}

impl TrafficDemand {
    /// Creates a new traffic volume generator.
    ///
    /// # Panics
    ///
    /// Panics if `base_vehicles` is negative or `shares` is empty.
    pub fn new(base_vehicles: f32, noise_std: f32, shares: Vec<f32>, seed: u64) -> Self {
        assert!(base_vehicles >= 0.0);
        assert!(!shares.is_empty(), "at least one zone share required");
        Self {
            base_vehicles,
            noise_std: noise_std.max(0.0),
            shares,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Samples the traffic state for one step at the given hour of day.
    pub fn sample(&mut self, hour: f32) -> TrafficSnapshot {
        let factor = DayPeriod::at(hour).traffic_factor();
        let noise = gaussian_noise(&mut self.rng, self.noise_std);
        let total = (self.base_vehicles * factor * (1.0 + noise)).max(0.0);

        let zone_vehicles: Vec<u32> = self
            .shares
            .iter()
            .map(|share| (total * share).round() as u32)
            .collect();
        let total_vehicles = zone_vehicles.iter().sum();

        TrafficSnapshot {
            total_vehicles,
            zone_vehicles,
        }
    }
}

/// Gaussian noise via the Box-Muller transform.
pub(crate) fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}
