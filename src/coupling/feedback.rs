//! Grid-stress evaluation and the traffic-side response.

use std::fmt;

use serde::Serialize;

use crate::traffic::signals::SignalMode;

/// Discrete grid operating condition, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum GridCondition {
    Normal,
    Stressed,
    Critical,
    Blackout,
}

impl fmt::Display for GridCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normal => "normal",
            Self::Stressed => "stressed",
            Self::Critical => "critical",
            Self::Blackout => "blackout",
        };
        write!(f, "{s}")
    }
}

/// EV charging throttle level commanded by the feedback loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EvChargeLimit {
    /// Stations charge at their rated level.
    Unlimited,
    /// Capped at Level 2 AC rates.
    Level2,
    /// Emergency trickle charging only (Level 1 AC).
    Level1,
    /// Charging suspended.
    Suspended,
}

impl fmt::Display for EvChargeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unlimited => "unlimited",
            Self::Level2 => "level_2_max",
            Self::Level1 => "emergency_only",
            Self::Suspended => "suspended",
        };
        write!(f, "{s}")
    }
}

/// Traffic-side demand-response package for one step.
#[derive(Debug, Clone)]
pub struct TrafficResponse {
    /// Commanded signal operating mode.
    pub signal_mode: SignalMode,
    /// Street-light output factor in `[0, 1]`.
    pub street_dimming: f32,
    /// EV charging throttle.
    pub ev_limit: EvChargeLimit,
    /// Intersections overridden in emergency mode (empty otherwise,
    /// all intersections in blackout).
    pub affected: Vec<usize>,
}

impl TrafficResponse {
    /// The no-op response applied before any grid evaluation exists.
    pub fn normal() -> Self {
        Self {
            signal_mode: SignalMode::Normal,
            street_dimming: 1.0,
            ev_limit: EvChargeLimit::Unlimited,
            affected: Vec::new(),
        }
    }
}

/// Threshold policy mapping feeder loading to a condition and response.
#[derive(Debug, Clone)]
pub struct ResponsePolicy {
    /// Loading at or above which the grid counts as stressed.
    pub stressed: f32,
    /// Loading at or above which the grid counts as critical.
    pub critical: f32,
    /// Loading at or above which the grid counts as blacked out.
    pub blackout: f32,
}

impl ResponsePolicy {
    /// Creates a policy from ordered thresholds.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < stressed < critical < blackout`.
    pub fn new(stressed: f32, critical: f32, blackout: f32) -> Self {
        assert!(stressed > 0.0 && stressed < critical && critical < blackout);
        Self {
            stressed,
            critical,
            blackout,
        }
    }

    /// Evaluates the grid condition for one step.
    ///
    /// Conditions are picked from `max_loading` against the thresholds;
    /// an unserved-load shortage escalates to at least `Critical`.
    pub fn condition(&self, max_loading: f32, shortage_mw: f32) -> GridCondition {
        let by_loading = if max_loading < self.stressed {
            GridCondition::Normal
        } else if max_loading < self.critical {
            GridCondition::Stressed
        } else if max_loading < self.blackout {
            GridCondition::Critical
        } else {
            GridCondition::Blackout
        };

        if shortage_mw > 0.0 {
            by_loading.max(GridCondition::Critical)
        } else {
            by_loading
        }
    }

    /// Builds the traffic response for a condition.
    ///
    /// `ranked` lists intersection indices by descending lamp power; in
    /// critical conditions the top 20% (at least one) are overridden, in
    /// blackout all of them.
    pub fn response(&self, condition: GridCondition, ranked: &[usize]) -> TrafficResponse {
        match condition {
            GridCondition::Normal => TrafficResponse::normal(),
            GridCondition::Stressed => TrafficResponse {
                signal_mode: SignalMode::Eco,
                street_dimming: 0.8,
                ev_limit: EvChargeLimit::Level2,
                affected: Vec::new(),
            },
            GridCondition::Critical => {
                let count = (ranked.len() / 5).max(1).min(ranked.len());
                TrafficResponse {
                    signal_mode: SignalMode::Emergency,
                    street_dimming: 0.5,
                    ev_limit: EvChargeLimit::Level1,
                    affected: ranked[..count].to_vec(),
                }
            }
            GridCondition::Blackout => TrafficResponse {
                signal_mode: SignalMode::FlashingRed,
                street_dimming: 0.0,
                ev_limit: EvChargeLimit::Suspended,
                affected: ranked.to_vec(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ResponsePolicy {
        ResponsePolicy::new(0.70, 0.85, 0.95)
    }

    #[test]
    fn condition_bands_are_half_open() {
        let p = policy();
        assert_eq!(p.condition(0.0, 0.0), GridCondition::Normal);
        assert_eq!(p.condition(0.699, 0.0), GridCondition::Normal);
        assert_eq!(p.condition(0.70, 0.0), GridCondition::Stressed);
        assert_eq!(p.condition(0.849, 0.0), GridCondition::Stressed);
        assert_eq!(p.condition(0.85, 0.0), GridCondition::Critical);
        assert_eq!(p.condition(0.949, 0.0), GridCondition::Critical);
        assert_eq!(p.condition(0.95, 0.0), GridCondition::Blackout);
        assert_eq!(p.condition(1.4, 0.0), GridCondition::Blackout);
        assert_eq!(p.condition(f32::INFINITY, 0.0), GridCondition::Blackout);
    }

    #[test]
    fn shortage_escalates_to_critical() {
        let p = policy();
        assert_eq!(p.condition(0.2, 5.0), GridCondition::Critical);
        assert_eq!(p.condition(0.75, 5.0), GridCondition::Critical);
        // blackout is not downgraded
        assert_eq!(p.condition(0.99, 5.0), GridCondition::Blackout);
    }

    #[test]
    #[should_panic]
    fn unordered_thresholds_panic() {
        ResponsePolicy::new(0.9, 0.85, 0.95);
    }

    #[test]
    fn normal_response_is_noop() {
        let r = policy().response(GridCondition::Normal, &[0, 1, 2]);
        assert_eq!(r.signal_mode, SignalMode::Normal);
        assert_eq!(r.street_dimming, 1.0);
        assert_eq!(r.ev_limit, EvChargeLimit::Unlimited);
        assert!(r.affected.is_empty());
    }

    #[test]
    fn stressed_response_throttles_softly() {
        let r = policy().response(GridCondition::Stressed, &[0, 1, 2]);
        assert_eq!(r.signal_mode, SignalMode::Eco);
        assert_eq!(r.street_dimming, 0.8);
        assert_eq!(r.ev_limit, EvChargeLimit::Level2);
        assert!(r.affected.is_empty());
    }

    #[test]
    fn critical_overrides_top_fifth() {
        let ranked: Vec<usize> = (0..10).collect();
        let r = policy().response(GridCondition::Critical, &ranked);
        assert_eq!(r.signal_mode, SignalMode::Emergency);
        assert_eq!(r.affected, vec![0, 1]);
        assert_eq!(r.ev_limit, EvChargeLimit::Level1);
    }

    #[test]
    fn critical_overrides_at_least_one() {
        let r = policy().response(GridCondition::Critical, &[7, 3]);
        assert_eq!(r.affected, vec![7]);
    }

    #[test]
    fn blackout_hits_everything() {
        let ranked: Vec<usize> = (0..6).collect();
        let r = policy().response(GridCondition::Blackout, &ranked);
        assert_eq!(r.signal_mode, SignalMode::FlashingRed);
        assert_eq!(r.street_dimming, 0.0);
        assert_eq!(r.ev_limit, EvChargeLimit::Suspended);
        assert_eq!(r.affected.len(), 6);
    }

    #[test]
    fn condition_severity_ordering() {
        assert!(GridCondition::Normal < GridCondition::Stressed);
        assert!(GridCondition::Stressed < GridCondition::Critical);
        assert!(GridCondition::Critical < GridCondition::Blackout);
    }
}
