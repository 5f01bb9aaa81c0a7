//! Configuration for the color grouping simulation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Color;

/// Configuration for the color grouping simulation.
///
/// Controls the domain geometry, spawn composition, agent dynamics,
/// reward shaping, and both color mutation mechanisms.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    // --- Geometry ---
    /// Half-extent of the square domain centered at the origin.
    pub area_size: f64,

    // --- Population ---
    /// Number of agents spawned per color, in `Red`, `Green`, `Blue` order.
    pub spawn_counts: [u32; 3],

    // --- Dynamics ---
    /// Motion parameters applied to every agent.
    pub motion: MotionConfig,

    // --- Reward shaping ---
    /// Penalty and termination rule for leaving the domain.
    pub boundary: BoundaryPolicy,
    /// Distance bands for same/different color interactions.
    pub proximity: ProximityConfig,
    /// Constant reward added every tick (negative).
    pub time_penalty: f64,

    // --- Color mutation ---
    pub local_majority: LocalMajorityConfig,
    pub global_ratio: GlobalRatioConfig,

    // --- Episodes ---
    /// Episode length after which an agent is truncated.
    pub max_ticks: u32,
    /// Whether an agent regains its spawn color when its episode restarts.
    pub reset_color_on_episode: bool,
    /// Seed for spawn positions and stochastic conversions.
    pub seed: u64,
}

/// Agent motion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Velocity change applied per unit of action.
    pub move_speed: f64,
    /// Integration time step.
    pub delta_t: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            delta_t: 0.02,
        }
    }
}

/// What happens when an agent is outside the domain.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoundaryPolicy {
    /// Ends the agent's episode on exit.
    pub terminate_on_exit: bool,
    /// Reward added on exit (negative).
    pub penalty: f64,
}

impl BoundaryPolicy {
    /// Large penalty and forced episode termination.
    pub fn terminating() -> Self {
        Self {
            terminate_on_exit: true,
            penalty: -1.0,
        }
    }

    /// Small penalty, episode continues.
    pub fn soft() -> Self {
        Self {
            terminate_on_exit: false,
            penalty: -0.01,
        }
    }
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        Self::terminating()
    }
}

/// One distance band of the proximity reward.
///
/// A neighbor strictly closer than `max_distance` contributes
/// `same_color` if it shares the agent's color, `different_color` otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProximityBand {
    pub max_distance: f64,
    pub same_color: f64,
    pub different_color: f64,
}

impl ProximityBand {
    /// Band with symmetric bonus and penalty.
    pub fn symmetric(max_distance: f64, magnitude: f64) -> Self {
        Self {
            max_distance,
            same_color: magnitude,
            different_color: -magnitude,
        }
    }
}

/// Ordered proximity bands; the first band containing a neighbor applies.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProximityConfig {
    pub bands: Vec<ProximityBand>,
}

impl ProximityConfig {
    /// Near band `< 1.0` (±0.05) and mid band `< 2.0` (±0.02).
    pub fn two_band() -> Self {
        Self {
            bands: vec![
                ProximityBand::symmetric(1.0, 0.05),
                ProximityBand::symmetric(2.0, 0.02),
            ],
        }
    }

    /// Single band `< 1.5` (±0.01).
    pub fn single_band() -> Self {
        Self {
            bands: vec![ProximityBand::symmetric(1.5, 0.01)],
        }
    }

    /// Returns the first band whose threshold exceeds `distance`.
    pub fn band_for(&self, distance: f64) -> Option<&ProximityBand> {
        self.bands.iter().find(|b| distance < b.max_distance)
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self::two_band()
    }
}

/// Per-agent conversion to the dominant color of the neighborhood.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LocalMajorityConfig {
    pub enabled: bool,
    /// Neighbors within this distance (inclusive) are counted.
    pub check_range: f64,
    /// Minimum neighbor share of the dominant color.
    pub threshold: f64,
}

impl Default for LocalMajorityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_range: 3.0,
            threshold: 0.6,
        }
    }
}

/// Population-wide stochastic conversion toward an over-represented color.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GlobalRatioConfig {
    pub enabled: bool,
    /// A color whose population share exceeds this triggers a pass.
    pub threshold: f64,
    /// Independent per-agent conversion probability.
    pub convert_prob: f64,
    /// The pass runs on ticks that are multiples of this cadence.
    pub every_ticks: u32,
}

impl Default for GlobalRatioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.40,
            convert_prob: 0.10,
            every_ticks: 1,
        }
    }
}

impl SimConfig {
    /// Total number of agents across all colors.
    pub fn population(&self) -> usize {
        self.spawn_counts.iter().map(|&c| c as usize).sum()
    }

    /// Number of agents spawned with the given color.
    pub fn spawn_count(&self, color: Color) -> u32 {
        self.spawn_counts[color.index()]
    }

    /// Checks every parameter, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.area_size > 0.0) || !self.area_size.is_finite() {
            return Err(ConfigError::NonPositiveAreaSize(self.area_size));
        }
        if self.population() == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if !(self.motion.move_speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(self.motion.move_speed));
        }
        if !(self.motion.delta_t > 0.0) {
            return Err(ConfigError::NonPositiveTimeStep(self.motion.delta_t));
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::ZeroMaxTicks);
        }

        let mut prev = 0.0;
        for (index, band) in self.proximity.bands.iter().enumerate() {
            if !(band.max_distance > prev) {
                return Err(ConfigError::InvalidBand {
                    index,
                    reason: "thresholds must be positive and strictly increasing",
                });
            }
            if !band.same_color.is_finite() || !band.different_color.is_finite() {
                return Err(ConfigError::InvalidBand {
                    index,
                    reason: "magnitudes must be finite",
                });
            }
            prev = band.max_distance;
        }

        if !(self.local_majority.check_range > 0.0) {
            return Err(ConfigError::NonPositiveRange {
                name: "local_majority.check_range",
                value: self.local_majority.check_range,
            });
        }
        check_unit("local_majority.threshold", self.local_majority.threshold, |name, value| {
            ConfigError::ThresholdOutOfRange { name, value }
        })?;
        check_unit("global_ratio.threshold", self.global_ratio.threshold, |name, value| {
            ConfigError::ThresholdOutOfRange { name, value }
        })?;
        check_unit("global_ratio.convert_prob", self.global_ratio.convert_prob, |name, value| {
            ConfigError::ProbabilityOutOfRange { name, value }
        })?;
        if self.global_ratio.every_ticks == 0 {
            return Err(ConfigError::ZeroCadence);
        }
        Ok(())
    }
}

fn check_unit(
    name: &'static str,
    value: f64,
    err: impl FnOnce(&'static str, f64) -> ConfigError,
) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(err(name, value))
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            area_size: 5.0,
            spawn_counts: [3, 3, 3],
            motion: MotionConfig::default(),
            boundary: BoundaryPolicy::default(),
            proximity: ProximityConfig::default(),
            time_penalty: -0.0005,
            local_majority: LocalMajorityConfig::default(),
            global_ratio: GlobalRatioConfig::default(),
            max_ticks: 1000,
            reset_color_on_episode: false,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.population(), 9);
        assert_eq!(cfg.spawn_count(Color::Green), 3);
    }

    #[test]
    fn rejects_non_positive_area() {
        let cfg = SimConfig {
            area_size: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveAreaSize(0.0)));
    }

    #[test]
    fn rejects_nan_area() {
        let cfg = SimConfig {
            area_size: f64::NAN,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositiveAreaSize(_))
        ));
    }

    #[test]
    fn rejects_empty_population() {
        let cfg = SimConfig {
            spawn_counts: [0, 0, 0],
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn rejects_threshold_above_one() {
        let mut cfg = SimConfig::default();
        cfg.local_majority.threshold = 1.2;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ThresholdOutOfRange {
                name: "local_majority.threshold",
                value: 1.2
            })
        );
    }

    #[test]
    fn rejects_negative_probability() {
        let mut cfg = SimConfig::default();
        cfg.global_ratio.convert_prob = -0.1;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ProbabilityOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_unordered_bands() {
        let cfg = SimConfig {
            proximity: ProximityConfig {
                bands: vec![
                    ProximityBand::symmetric(2.0, 0.02),
                    ProximityBand::symmetric(1.0, 0.05),
                ],
            },
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidBand { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_zero_cadence() {
        let mut cfg = SimConfig::default();
        cfg.global_ratio.every_ticks = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCadence));
    }

    #[test]
    fn band_lookup_prefers_nearest_band() {
        let prox = ProximityConfig::two_band();
        assert_eq!(prox.band_for(0.5).map(|b| b.same_color), Some(0.05));
        assert_eq!(prox.band_for(1.0).map(|b| b.same_color), Some(0.02));
        assert_eq!(prox.band_for(1.99).map(|b| b.different_color), Some(-0.02));
        assert!(prox.band_for(2.0).is_none());
    }

    #[test]
    fn boundary_presets() {
        assert!(BoundaryPolicy::terminating().terminate_on_exit);
        assert_eq!(BoundaryPolicy::terminating().penalty, -1.0);
        assert!(!BoundaryPolicy::soft().terminate_on_exit);
        assert_eq!(BoundaryPolicy::soft().penalty, -0.01);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "area_size": 8.0,
            "boundary": { "terminate_on_exit": false, "penalty": -0.01 },
            "global_ratio": { "enabled": false }
        }"#;
        let cfg: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.area_size, 8.0);
        assert_eq!(cfg.boundary, BoundaryPolicy::soft());
        assert!(!cfg.global_ratio.enabled);
        assert_eq!(cfg.global_ratio.threshold, 0.40);
        assert_eq!(cfg.proximity, ProximityConfig::two_band());
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_round_trip_preserves_config() {
        let cfg = SimConfig {
            seed: 17,
            proximity: ProximityConfig::single_band(),
            boundary: BoundaryPolicy::soft(),
            ..SimConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
