//! Per-zone distribution feeder model.

/// A distribution feeder serving one zone, aggregating MW contributions
/// and tracking loading against an (optionally derated) capacity.
///
/// All contributions are consumption in MW; generation is handled at the
/// fleet level by [`super::network::GridModel`], not netted per feeder.
#[derive(Debug, Clone)]
pub struct ZoneFeeder {
    name: String,
    capacity_mw: f32,
    /// Residual capacity fraction during a scripted outage (1.0 = healthy).
    derate: f32,
    net_mw: f32,
}

impl ZoneFeeder {
    /// Creates a new feeder with the given rated capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity_mw` is negative.
    pub fn new(name: impl Into<String>, capacity_mw: f32) -> Self {
        assert!(capacity_mw >= 0.0);
        Self {
            name: name.into(),
            capacity_mw,
            derate: 1.0,
            net_mw: 0.0,
        }
    }

    /// Clears accumulated load for the next step.
    pub fn reset(&mut self) {
        self.net_mw = 0.0;
    }

    /// Adds a consumption contribution in MW.
    pub fn add_mw(&mut self, mw: f32) {
        self.net_mw += mw;
    }

    /// Current accumulated load in MW.
    pub fn net_mw(&self) -> f32 {
        self.net_mw
    }

    /// Sets the outage derating factor, clamped to `[0, 1]`.
    pub fn set_derate(&mut self, derate: f32) {
        self.derate = derate.clamp(0.0, 1.0);
    }

    /// Rated capacity times the current derating factor.
    pub fn effective_capacity_mw(&self) -> f32 {
        self.capacity_mw * self.derate
    }

    /// Loading ratio: load over effective capacity.
    ///
    /// A fully derated or zero-capacity feeder carrying load reports
    /// `f32::INFINITY` rather than dividing by zero.
    pub fn loading(&self) -> f32 {
        let cap = self.effective_capacity_mw();
        if cap <= 0.0 {
            if self.net_mw > 0.0 {
                f32::INFINITY
            } else {
                0.0
            }
        } else {
            self.net_mw / cap
        }
    }

    /// Returns `true` when load exceeds effective capacity.
    pub fn overloaded(&self) -> bool {
        self.loading() > 1.0
    }

    /// Feeder name (zone name).
    pub fn name(&self) -> &str {
        &self.name
    }
}
