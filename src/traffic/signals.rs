//! Traffic-signal phase programs and grid-feedback override modes.
//!
//! Signal states use the SUMO head-string convention: one character per
//! controlled head, `'G'`/`'g'` green, `'y'` yellow, `'r'` red.

use std::fmt;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

/// Signal operating mode commanded by the grid feedback loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalMode {
    /// Programs run unchanged.
    Normal,
    /// Green phases shortened to save controller power.
    Eco,
    /// Affected intersections flash all-yellow; others run normally.
    Emergency,
    /// Every intersection flashes all-red (four-way stop).
    FlashingRed,
}

impl fmt::Display for SignalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normal => "normal",
            Self::Eco => "eco",
            Self::Emergency => "emergency",
            Self::FlashingRed => "flashing_red",
        };
        write!(f, "{s}")
    }
}

/// Head-color tally for a zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCounts {
    pub green: u32,
    pub yellow: u32,
    pub red: u32,
}

impl ColorCounts {
    /// Total heads counted.
    pub fn total(&self) -> u32 {
        self.green + self.yellow + self.red
    }

    fn add_state(&mut self, state: &str) {
        for c in state.chars() {
            match c {
                'G' | 'g' => self.green += 1,
                'y' | 'Y' => self.yellow += 1,
                _ => self.red += 1,
            }
        }
    }
}

/// One phase of a cyclic signal program.
#[derive(Debug, Clone)]
struct Phase {
    state: String,
    duration: u32,
}

#[derive(Debug, Clone)]
struct Intersection {
    zone: usize,
    phases: Vec<Phase>,
    phase_idx: usize,
    ticks: u32,
}

impl Intersection {
    /// Effective duration of the current phase under the given mode.
    /// Eco shortens green phases to 80%, never below one step.
    fn effective_duration(&self, mode: SignalMode) -> u32 {
        let phase = &self.phases[self.phase_idx];
        if mode == SignalMode::Eco && phase.state.contains('G') {
            (((phase.duration as f32) * 0.8) as u32).max(1)
        } else {
            phase.duration
        }
    }

    fn advance(&mut self, mode: SignalMode) {
        self.ticks += 1;
        if self.ticks >= self.effective_duration(mode) {
            self.ticks = 0;
            self.phase_idx = (self.phase_idx + 1) % self.phases.len();
        }
    }
}

/// Builds the default two-direction program for `heads` controlled heads.
///
/// Half the heads serve one axis, half the other; each axis gets a green
/// phase followed by a yellow clearance phase.
fn default_program(heads: usize) -> Vec<Phase> {
    let a = heads.div_ceil(2);
    let b = heads - a;
    let phase = |left: char, right: char, duration: u32| Phase {
        state: format!(
            "{}{}",
            left.to_string().repeat(a),
            right.to_string().repeat(b)
        ),
        duration,
    };
    vec![
        phase('G', 'r', 3),
        phase('y', 'r', 1),
        phase('r', 'G', 3),
        phase('r', 'y', 1),
    ]
}

/// Phase-program controller for every intersection in the scenario.
///
/// Each step, [`SignalController::step`] applies the commanded mode to the
/// current phase states and then advances the phase clocks. Initial phases
/// are staggered per intersection from the seed so the city does not
/// switch in lockstep.
#[derive(Debug, Clone)]
pub struct SignalController {
    intersections: Vec<Intersection>,
    /// Applied state strings from the most recent step.
    states: Vec<String>,
}

impl SignalController {
    /// Creates a controller from `(intersection_count, heads)` pairs, one
    /// per zone in scenario order.
    ///
    /// # Panics
    ///
    /// Panics if any zone declares zero heads per intersection.
    pub fn new(zones: &[(usize, usize)], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut intersections = Vec::new();

        for (zone, &(count, heads)) in zones.iter().enumerate() {
            assert!(heads > 0 || count == 0, "heads_per_intersection must be > 0");
            for _ in 0..count {
                let phases = default_program(heads);
                let phase_idx = rng.random_range(0..phases.len());
                intersections.push(Intersection {
                    zone,
                    phases,
                    phase_idx,
                    ticks: 0,
                });
            }
        }

        let states = intersections
            .iter()
            .map(|i| i.phases[i.phase_idx].state.clone())
            .collect();

        Self {
            intersections,
            states,
        }
    }

    /// Number of intersections under control.
    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    /// Returns `true` when the controller has no intersections.
    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    /// Applies the commanded mode for one step and advances phase clocks.
    ///
    /// `affected` lists intersection indices overridden in emergency mode;
    /// it is ignored for the other modes.
    pub fn step(&mut self, mode: SignalMode, affected: &[usize]) {
        for (idx, intersection) in self.intersections.iter_mut().enumerate() {
            let program_state = &intersection.phases[intersection.phase_idx].state;
            let heads = program_state.len();

            self.states[idx] = match mode {
                SignalMode::FlashingRed => "r".repeat(heads),
                SignalMode::Emergency if affected.contains(&idx) => "y".repeat(heads),
                _ => program_state.clone(),
            };

            intersection.advance(mode);
        }
    }

    /// Applied state strings from the most recent step.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Head-color tallies per zone for the most recent step.
    pub fn zone_color_counts(&self, zone_count: usize) -> Vec<ColorCounts> {
        let mut counts = vec![ColorCounts::default(); zone_count];
        for (intersection, state) in self.intersections.iter().zip(&self.states) {
            counts[intersection.zone].add_state(state);
        }
        counts
    }

    /// Intersection indices sorted by descending lamp power draw.
    ///
    /// Used to pick the highest-consumption intersections for emergency
    /// overrides.
    pub fn ranked_by_power(&self, green_kw: f32, yellow_kw: f32, red_kw: f32) -> Vec<usize> {
        let mut ranked: Vec<(usize, f32)> = self
            .states
            .iter()
            .enumerate()
            .map(|(idx, state)| {
                let mut counts = ColorCounts::default();
                counts.add_state(state);
                let kw = counts.green as f32 * green_kw
                    + counts.yellow as f32 * yellow_kw
                    + counts.red as f32 * red_kw;
                (idx, kw)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.into_iter().map(|(idx, _)| idx).collect()
    }
}
