//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::coupling::demand::ChargerKind;
use crate::power::network::GeneratorKind;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the `downtown` preset. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::from_preset`] for a built-in scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Citywide traffic volume parameters.
    #[serde(default)]
    pub traffic: TrafficConfig,
    /// Per-zone infrastructure, one table per zone.
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneConfig>,
    /// Generator fleet, one table per unit.
    #[serde(default = "default_generators")]
    pub generators: Vec<GeneratorConfig>,
    /// Street-lighting parameters.
    #[serde(default)]
    pub lighting: LightingConfig,
    /// Per-color signal head power.
    #[serde(default)]
    pub signal_power: SignalPowerConfig,
    /// EV charger rates and efficiency.
    #[serde(default)]
    pub charging: ChargingConfig,
    /// Grid-condition loading thresholds.
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    /// Optional scripted feeder outage.
    #[serde(default)]
    pub outage: Option<OutageConfig>,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of timesteps per simulated day (must be > 0).
    pub steps_per_day: usize,
    /// Number of days to simulate (must be > 0).
    pub days: usize,
    /// Master random seed.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps_per_day: 24,
            days: 1,
            seed: 42,
        }
    }
}

/// Citywide traffic volume parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrafficConfig {
    /// Midday citywide vehicle count.
    pub base_vehicles: f32,
    /// Multiplicative Gaussian noise standard deviation.
    pub noise_std: f32,
    /// Fraction of vehicles that are EVs (0.0–1.0).
    pub ev_share: f32,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            base_vehicles: 40_000.0,
            noise_std: 0.05,
            ev_share: 0.30,
        }
    }
}

/// One zone's infrastructure parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneConfig {
    /// Zone name.
    pub name: String,
    /// Peak background load (MW), scaled by the hourly demand factor.
    pub base_load_mw: f32,
    /// Distribution feeder capacity (MW).
    pub feeder_capacity_mw: f32,
    /// Lit road length (km).
    pub road_km: f32,
    /// Signalized intersection count.
    pub intersections: usize,
    /// Controlled heads per intersection.
    pub heads_per_intersection: usize,
    /// Fraction of citywide vehicles in this zone (shares sum to ~1.0).
    pub traffic_share: f32,
    /// Public charging points.
    pub charge_points: u32,
    /// Charger hardware: `"ac_level2"` or `"dc_fast"`.
    pub charger_kind: String,
}

impl ZoneConfig {
    /// Parses the charger kind string; unknown values fall back to AC Level 2
    /// (validation reports them first).
    pub fn parsed_charger_kind(&self) -> ChargerKind {
        match self.charger_kind.as_str() {
            "dc_fast" => ChargerKind::DcFast,
            _ => ChargerKind::AcLevel2,
        }
    }
}

/// One generating unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Unit name.
    pub name: String,
    /// Nameplate capacity (MW).
    pub capacity_mw: f32,
    /// Marginal cost ($/MWh), the merit-order sort key.
    pub marginal_cost: f32,
    /// Technology: `"gas"` or `"solar"`.
    pub kind: String,
}

impl GeneratorConfig {
    /// Parses the kind string; unknown values fall back to gas
    /// (validation reports them first).
    pub fn parsed_kind(&self) -> GeneratorKind {
        match self.kind.as_str() {
            "solar" => GeneratorKind::Solar,
            _ => GeneratorKind::Gas,
        }
    }
}

/// Street-lighting parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightingConfig {
    /// Night-time draw per km at full output (kW).
    pub kw_per_km: f32,
    /// Daytime standby draw per km (kW).
    pub day_kw_per_km: f32,
    /// Hour lights switch off (inclusive bound of daytime).
    pub dawn_hour: f32,
    /// Hour lights switch on.
    pub dusk_hour: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            kw_per_km: 15.0,
            day_kw_per_km: 0.5,
            dawn_hour: 6.0,
            dusk_hour: 18.0,
        }
    }
}

/// Per-color signal head power.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalPowerConfig {
    /// Power per green head (kW).
    pub green_kw: f32,
    /// Power per yellow head (kW).
    pub yellow_kw: f32,
    /// Power per red head (kW).
    pub red_kw: f32,
}

impl Default for SignalPowerConfig {
    fn default() -> Self {
        Self {
            green_kw: 0.5,
            yellow_kw: 0.4,
            red_kw: 0.3,
        }
    }
}

/// EV charger rates and efficiency.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChargingConfig {
    /// DC fast charger rate (kW).
    pub dc_fast_kw: f32,
    /// AC Level 2 rate (kW).
    pub ac_level2_kw: f32,
    /// AC Level 1 emergency rate (kW).
    pub ac_level1_kw: f32,
    /// Grid-side charging efficiency (0.0–1.0).
    pub efficiency: f32,
}

impl Default for ChargingConfig {
    fn default() -> Self {
        Self {
            dc_fast_kw: 150.0,
            ac_level2_kw: 19.2,
            ac_level1_kw: 1.4,
            efficiency: 0.9,
        }
    }
}

/// Grid-condition loading thresholds (must be strictly increasing).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Loading at or above which the grid is stressed.
    pub stressed: f32,
    /// Loading at or above which the grid is critical.
    pub critical: f32,
    /// Loading at or above which the grid is blacked out.
    pub blackout: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            stressed: 0.70,
            critical: 0.85,
            blackout: 0.95,
        }
    }
}

/// Scripted feeder outage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutageConfig {
    /// Index of the affected zone.
    pub zone: usize,
    /// Start timestep (inclusive).
    pub start_step: usize,
    /// End timestep (exclusive).
    pub end_step: usize,
    /// Residual capacity fraction while active (0.0–1.0).
    pub derate: f32,
}

fn default_zones() -> Vec<ZoneConfig> {
    vec![
        ZoneConfig {
            name: "Downtown".to_string(),
            base_load_mw: 220.0,
            feeder_capacity_mw: 300.0,
            road_km: 90.0,
            intersections: 40,
            heads_per_intersection: 4,
            traffic_share: 0.40,
            charge_points: 200,
            charger_kind: "dc_fast".to_string(),
        },
        ZoneConfig {
            name: "Midtown".to_string(),
            base_load_mw: 180.0,
            feeder_capacity_mw: 260.0,
            road_km: 110.0,
            intersections: 35,
            heads_per_intersection: 4,
            traffic_share: 0.30,
            charge_points: 150,
            charger_kind: "ac_level2".to_string(),
        },
        ZoneConfig {
            name: "Harbor".to_string(),
            base_load_mw: 120.0,
            feeder_capacity_mw: 180.0,
            road_km: 70.0,
            intersections: 20,
            heads_per_intersection: 4,
            traffic_share: 0.20,
            charge_points: 80,
            charger_kind: "ac_level2".to_string(),
        },
        ZoneConfig {
            name: "Hills".to_string(),
            base_load_mw: 60.0,
            feeder_capacity_mw: 100.0,
            road_km: 60.0,
            intersections: 10,
            heads_per_intersection: 4,
            traffic_share: 0.10,
            charge_points: 40,
            charger_kind: "ac_level2".to_string(),
        },
    ]
}

fn default_generators() -> Vec<GeneratorConfig> {
    vec![
        GeneratorConfig {
            name: "Harborside CC".to_string(),
            capacity_mw: 400.0,
            marginal_cost: 42.0,
            kind: "gas".to_string(),
        },
        GeneratorConfig {
            name: "Valley Peaker".to_string(),
            capacity_mw: 250.0,
            marginal_cost: 95.0,
            kind: "gas".to_string(),
        },
        GeneratorConfig {
            name: "Mesa Solar".to_string(),
            capacity_mw: 180.0,
            marginal_cost: 0.0,
            kind: "solar".to_string(),
        },
    ]
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"thresholds.stressed"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the `downtown` preset: a four-zone city core with a DC
    /// fast-charging hub, sized so evening peaks brush the stressed band.
    pub fn downtown() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            traffic: TrafficConfig::default(),
            zones: default_zones(),
            generators: default_generators(),
            lighting: LightingConfig::default(),
            signal_power: SignalPowerConfig::default(),
            charging: ChargingConfig::default(),
            thresholds: ThresholdConfig::default(),
            outage: None,
        }
    }

    /// Returns the `boroughs` preset: a large five-borough-flavored system
    /// with a mostly thermal fleet and one small solar farm.
    pub fn boroughs() -> Self {
        Self {
            simulation: SimulationConfig {
                seed: 7,
                ..SimulationConfig::default()
            },
            traffic: TrafficConfig {
                base_vehicles: 120_000.0,
                ..TrafficConfig::default()
            },
            zones: vec![
                ZoneConfig {
                    name: "Manhattan".to_string(),
                    base_load_mw: 1700.0,
                    feeder_capacity_mw: 2400.0,
                    road_km: 250.0,
                    intersections: 120,
                    heads_per_intersection: 4,
                    traffic_share: 0.35,
                    charge_points: 400,
                    charger_kind: "dc_fast".to_string(),
                },
                ZoneConfig {
                    name: "Brooklyn".to_string(),
                    base_load_mw: 950.0,
                    feeder_capacity_mw: 1350.0,
                    road_km: 300.0,
                    intersections: 90,
                    heads_per_intersection: 4,
                    traffic_share: 0.30,
                    charge_points: 250,
                    charger_kind: "ac_level2".to_string(),
                },
                ZoneConfig {
                    name: "Queens".to_string(),
                    base_load_mw: 800.0,
                    feeder_capacity_mw: 1150.0,
                    road_km: 320.0,
                    intersections: 70,
                    heads_per_intersection: 4,
                    traffic_share: 0.20,
                    charge_points: 200,
                    charger_kind: "ac_level2".to_string(),
                },
                ZoneConfig {
                    name: "Bronx".to_string(),
                    base_load_mw: 500.0,
                    feeder_capacity_mw: 750.0,
                    road_km: 180.0,
                    intersections: 50,
                    heads_per_intersection: 4,
                    traffic_share: 0.15,
                    charge_points: 120,
                    charger_kind: "ac_level2".to_string(),
                },
            ],
            generators: vec![
                GeneratorConfig {
                    name: "Ravenswood".to_string(),
                    capacity_mw: 2480.0,
                    marginal_cost: 50.0,
                    kind: "gas".to_string(),
                },
                GeneratorConfig {
                    name: "Astoria".to_string(),
                    capacity_mw: 1310.0,
                    marginal_cost: 55.0,
                    kind: "gas".to_string(),
                },
                GeneratorConfig {
                    name: "Hudson".to_string(),
                    capacity_mw: 420.0,
                    marginal_cost: 60.0,
                    kind: "gas".to_string(),
                },
                GeneratorConfig {
                    name: "Brooklyn Solar".to_string(),
                    capacity_mw: 50.0,
                    marginal_cost: 0.0,
                    kind: "solar".to_string(),
                },
            ],
            lighting: LightingConfig::default(),
            signal_power: SignalPowerConfig::default(),
            charging: ChargingConfig::default(),
            thresholds: ThresholdConfig::default(),
            outage: None,
        }
    }

    /// Returns the `heatwave` preset: the downtown system with elevated
    /// background load and a scripted afternoon feeder outage, driving
    /// the grid through critical into blackout.
    pub fn heatwave() -> Self {
        let mut cfg = Self::downtown();
        cfg.simulation.seed = 99;
        for (zone, base) in cfg.zones.iter_mut().zip([260.0, 210.0, 150.0, 80.0]) {
            zone.base_load_mw = base;
        }
        cfg.outage = Some(OutageConfig {
            zone: 0,
            start_step: 14,
            end_step: 20,
            derate: 0.6,
        });
        cfg
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["downtown", "boroughs", "heatwave"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "downtown" => Ok(Self::downtown()),
            "boroughs" => Ok(Self::boroughs()),
            "heatwave" => Ok(Self::heatwave()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.steps_per_day == 0 {
            errors.push(ConfigError {
                field: "simulation.steps_per_day".into(),
                message: "must be > 0".into(),
            });
        }
        if s.days == 0 {
            errors.push(ConfigError {
                field: "simulation.days".into(),
                message: "must be > 0".into(),
            });
        }

        let t = &self.traffic;
        if t.base_vehicles < 0.0 {
            errors.push(ConfigError {
                field: "traffic.base_vehicles".into(),
                message: "must be >= 0".into(),
            });
        }
        if t.noise_std < 0.0 {
            errors.push(ConfigError {
                field: "traffic.noise_std".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&t.ev_share) {
            errors.push(ConfigError {
                field: "traffic.ev_share".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        if self.zones.is_empty() {
            errors.push(ConfigError {
                field: "zones".into(),
                message: "at least one zone required".into(),
            });
        }
        let mut share_sum = 0.0;
        for (i, zone) in self.zones.iter().enumerate() {
            if zone.feeder_capacity_mw <= 0.0 {
                errors.push(ConfigError {
                    field: format!("zones[{i}].feeder_capacity_mw"),
                    message: "must be > 0".into(),
                });
            }
            if zone.base_load_mw < 0.0 {
                errors.push(ConfigError {
                    field: format!("zones[{i}].base_load_mw"),
                    message: "must be >= 0".into(),
                });
            }
            if zone.road_km < 0.0 {
                errors.push(ConfigError {
                    field: format!("zones[{i}].road_km"),
                    message: "must be >= 0".into(),
                });
            }
            if zone.intersections > 0 && zone.heads_per_intersection == 0 {
                errors.push(ConfigError {
                    field: format!("zones[{i}].heads_per_intersection"),
                    message: "must be > 0 when the zone has intersections".into(),
                });
            }
            if !(0.0..=1.0).contains(&zone.traffic_share) {
                errors.push(ConfigError {
                    field: format!("zones[{i}].traffic_share"),
                    message: "must be in [0.0, 1.0]".into(),
                });
            }
            if zone.charger_kind != "ac_level2" && zone.charger_kind != "dc_fast" {
                errors.push(ConfigError {
                    field: format!("zones[{i}].charger_kind"),
                    message: format!(
                        "must be \"ac_level2\" or \"dc_fast\", got \"{}\"",
                        zone.charger_kind
                    ),
                });
            }
            share_sum += zone.traffic_share;
        }
        if !self.zones.is_empty() && (share_sum - 1.0).abs() > 0.01 {
            errors.push(ConfigError {
                field: "zones".into(),
                message: format!("traffic_share values must sum to ~1.0, got {share_sum:.3}"),
            });
        }

        if self.generators.is_empty() {
            errors.push(ConfigError {
                field: "generators".into(),
                message: "at least one generator required".into(),
            });
        }
        for (i, unit) in self.generators.iter().enumerate() {
            if unit.capacity_mw < 0.0 {
                errors.push(ConfigError {
                    field: format!("generators[{i}].capacity_mw"),
                    message: "must be >= 0".into(),
                });
            }
            if unit.kind != "gas" && unit.kind != "solar" {
                errors.push(ConfigError {
                    field: format!("generators[{i}].kind"),
                    message: format!("must be \"gas\" or \"solar\", got \"{}\"", unit.kind),
                });
            }
        }

        let l = &self.lighting;
        if l.kw_per_km < 0.0 || l.day_kw_per_km < 0.0 {
            errors.push(ConfigError {
                field: "lighting.kw_per_km".into(),
                message: "must be >= 0".into(),
            });
        }
        if l.dawn_hour >= l.dusk_hour {
            errors.push(ConfigError {
                field: "lighting.dawn_hour".into(),
                message: "must be < lighting.dusk_hour".into(),
            });
        }

        let c = &self.charging;
        if c.efficiency <= 0.0 || c.efficiency > 1.0 {
            errors.push(ConfigError {
                field: "charging.efficiency".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }

        let th = &self.thresholds;
        if !(th.stressed > 0.0 && th.stressed < th.critical && th.critical < th.blackout) {
            errors.push(ConfigError {
                field: "thresholds".into(),
                message: "must satisfy 0 < stressed < critical < blackout".into(),
            });
        }

        if let Some(outage) = &self.outage {
            if outage.zone >= self.zones.len() {
                errors.push(ConfigError {
                    field: "outage.zone".into(),
                    message: format!("must index a zone (0..{})", self.zones.len()),
                });
            }
            if outage.start_step >= outage.end_step {
                errors.push(ConfigError {
                    field: "outage.start_step".into(),
                    message: "must be < outage.end_step".into(),
                });
            }
            if !(0.0..=1.0).contains(&outage.derate) {
                errors.push(ConfigError {
                    field: "outage.derate".into(),
                    message: "must be in [0.0, 1.0]".into(),
                });
            }
        }

        errors
    }
}
