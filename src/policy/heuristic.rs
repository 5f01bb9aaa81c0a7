//! Scripted grouping baseline.
//!
//! Steers toward same-colored neighbors and away from differently colored
//! ones, using only what the observation exposes.

use super::trait_::Policy;
use crate::observation::{Observation, NEIGHBOR_FEATURE_DIM, NEIGHBOR_SLOTS, SELF_FEATURE_DIM};
use crate::types::{Action, Vec2};

/// Heuristic policy for color grouping.
///
/// For each populated neighbor slot the relative offset is weighted by
/// `+1` (same color) or `-1 / (ε + d)` (different color). Agents whose own
/// normalized position leaves `[-edge, edge]` are pulled back toward the
/// origin. The summed direction is normalized and scaled by `gain`.
#[derive(Debug, Clone)]
pub struct GroupingHeuristicPolicy {
    /// Action magnitude.
    pub gain: f64,
    /// Normalized coordinate past which the origin pull kicks in.
    pub edge: f64,
}

impl GroupingHeuristicPolicy {
    pub fn new(gain: f64) -> Self {
        Self { gain, edge: 0.8 }
    }
}

impl Default for GroupingHeuristicPolicy {
    fn default() -> Self {
        Self::new(0.1)
    }
}

/// Index of the hot entry of a one-hot triple, `None` for an empty slot.
fn hot_index(one_hot: &[f64]) -> Option<usize> {
    one_hot.iter().position(|&v| v > 0.5)
}

impl Policy for GroupingHeuristicPolicy {
    fn choose_action(&mut self, obs: &Observation) -> Action {
        let eps = 1e-6;
        let own = Vec2::new(obs[0], obs[1]);
        let own_color = hot_index(&obs[2..SELF_FEATURE_DIM]);

        let mut dir = Vec2::zero();
        for slot in obs[SELF_FEATURE_DIM..]
            .chunks(NEIGHBOR_FEATURE_DIM)
            .take(NEIGHBOR_SLOTS)
        {
            let Some(color) = hot_index(&slot[2..]) else {
                continue; // zero padding
            };
            let offset = Vec2::new(slot[0], slot[1]);
            if Some(color) == own_color {
                dir = dir + offset;
            } else {
                dir = dir - offset * (1.0 / (eps + offset.length()));
            }
        }

        if own.x.abs() > self.edge || own.z.abs() > self.edge {
            dir = dir - own;
        }

        let len = dir.length();
        if len < eps {
            return Action::zero();
        }
        let dir = dir * (self.gain / len);
        Action::new(dir.x, dir.z)
    }

    fn name(&self) -> &str {
        "grouping_heuristic"
    }
}
