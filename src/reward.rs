//! Layered per-agent reward.
//!
//! Combines the boundary penalty, the proximity-color interaction term,
//! and the per-tick time penalty. Reads a snapshot only; never mutates.

use crate::color::ColorState;
use crate::config::SimConfig;
use crate::spatial::SpatialIndex;
use crate::types::AgentId;

/// Reward terms for one agent on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RewardBreakdown {
    pub boundary: f64,
    pub proximity: f64,
    pub time: f64,
    /// The boundary rule asks for the agent's episode to end.
    pub terminate: bool,
}

impl RewardBreakdown {
    /// Sum of all terms.
    pub fn total(&self) -> f64 {
        self.boundary + self.proximity + self.time
    }
}

/// Computes rewards for the simulation.
pub struct RewardComputer;

impl RewardComputer {
    /// Computes the reward of `agent` against the current snapshot.
    ///
    /// # Components
    ///
    /// 1. **Boundary**: `boundary.penalty` when `|x|` or `|z|` exceeds the area
    ///    size. With `terminate_on_exit` the breakdown also asks for the
    ///    episode to end; the other terms are still added.
    /// 2. **Proximity**: for every other agent, the first band whose
    ///    threshold exceeds the distance contributes its same-color or
    ///    different-color value.
    /// 3. **Time**: `time_penalty`, unconditionally.
    pub fn compute(
        agent: AgentId,
        index: &SpatialIndex,
        colors: &ColorState,
        config: &SimConfig,
    ) -> RewardBreakdown {
        let mut out = RewardBreakdown::default();

        // 1. Boundary
        if index.position(agent).is_outside(config.area_size) {
            out.boundary = config.boundary.penalty;
            out.terminate = config.boundary.terminate_on_exit;
        }

        // 2. Proximity
        out.proximity = Self::proximity(agent, index, colors, config);

        // 3. Time
        out.time = config.time_penalty;

        out
    }

    /// Sum of pairwise band contributions against every other agent.
    pub fn proximity(
        agent: AgentId,
        index: &SpatialIndex,
        colors: &ColorState,
        config: &SimConfig,
    ) -> f64 {
        let mine = colors.get(agent);
        index
            .others(agent)
            .filter_map(|n| {
                config.proximity.band_for(n.distance).map(|band| {
                    if colors.get(n.id) == mine {
                        band.same_color
                    } else {
                        band.different_color
                    }
                })
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundaryPolicy, ProximityConfig};
    use crate::types::{Color, Position};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn lone_agent_pays_time_penalty_only() {
        let config = SimConfig::default();
        let index = SpatialIndex::build(vec![Position::new(0.0, 0.0)]);
        let colors = ColorState::new(vec![Color::Red]);
        let r = RewardComputer::compute(0, &index, &colors, &config);
        assert_eq!(r.total(), config.time_penalty);
        assert!(!r.terminate);
    }

    #[test]
    fn boundary_exit_terminates_with_penalty() {
        let config = SimConfig::default();
        let index = SpatialIndex::build(vec![Position::new(config.area_size + 1.0, 0.0)]);
        let colors = ColorState::new(vec![Color::Red]);
        let r = RewardComputer::compute(0, &index, &colors, &config);
        assert!(r.total() <= -1.0);
        assert!(r.terminate);
    }

    #[test]
    fn terminating_exit_still_adds_proximity_and_time() {
        let config = SimConfig::default();
        let index = SpatialIndex::build(vec![Position::new(5.5, 0.0), Position::new(5.5, 0.5)]);
        let colors = ColorState::new(vec![Color::Red, Color::Red]);
        let r = RewardComputer::compute(0, &index, &colors, &config);
        assert!(r.terminate);
        assert_eq!(r.boundary, -1.0);
        assert!(close(r.proximity, 0.05));
        assert_eq!(r.time, config.time_penalty);
        assert!(close(r.total(), -1.0 + 0.05 + config.time_penalty));
    }

    #[test]
    fn soft_boundary_keeps_other_terms() {
        let config = SimConfig {
            boundary: BoundaryPolicy::soft(),
            ..SimConfig::default()
        };
        let index = SpatialIndex::build(vec![Position::new(0.0, -6.0)]);
        let colors = ColorState::new(vec![Color::Blue]);
        let r = RewardComputer::compute(0, &index, &colors, &config);
        assert!(!r.terminate);
        assert!(close(r.total(), -0.01 + config.time_penalty));
    }

    #[test]
    fn near_and_mid_bands() {
        let config = SimConfig::default();
        let index = SpatialIndex::build(vec![
            Position::new(0.0, 0.0),
            Position::new(0.5, 0.0), // near, same
            Position::new(0.0, 1.5), // mid, different
            Position::new(0.0, 2.5), // out of range
        ]);
        let colors = ColorState::new(vec![Color::Red, Color::Red, Color::Green, Color::Green]);
        let p = RewardComputer::proximity(0, &index, &colors, &config);
        assert!(close(p, 0.05 - 0.02));
    }

    #[test]
    fn single_band_variant() {
        let config = SimConfig {
            proximity: ProximityConfig::single_band(),
            ..SimConfig::default()
        };
        let index = SpatialIndex::build(vec![
            Position::new(0.0, 0.0),
            Position::new(1.4, 0.0),
            Position::new(0.0, 0.2),
            Position::new(1.6, 0.0),
        ]);
        let colors = ColorState::new(vec![Color::Blue, Color::Blue, Color::Red, Color::Blue]);
        let p = RewardComputer::proximity(0, &index, &colors, &config);
        assert!(close(p, 0.01 - 0.01));
    }

    #[test]
    fn proximity_sum_is_order_invariant() {
        let config = SimConfig::default();
        let positions = vec![
            Position::new(0.0, 0.0),
            Position::new(0.3, 0.1),
            Position::new(-1.2, 0.4),
            Position::new(0.0, 0.9),
            Position::new(1.1, -1.1),
        ];
        let colors = vec![Color::Red, Color::Green, Color::Red, Color::Blue, Color::Red];

        let forward = RewardComputer::proximity(
            0,
            &SpatialIndex::build(positions.clone()),
            &ColorState::new(colors.clone()),
            &config,
        );

        // same population with the others listed in reverse
        let mut rev_pos = vec![positions[0]];
        rev_pos.extend(positions[1..].iter().rev());
        let mut rev_col = vec![colors[0]];
        rev_col.extend(colors[1..].iter().rev());
        let reversed = RewardComputer::proximity(
            0,
            &SpatialIndex::build(rev_pos),
            &ColorState::new(rev_col),
            &config,
        );

        assert!(close(forward, reversed));
    }
}
