//! Fixed-axis policy.
//!
//! Maps two control axes straight onto the action, the way a manual
//! controller drives an agent. The axes are set by the caller.

use super::trait_::Policy;
use crate::observation::Observation;
use crate::types::Action;

/// Replays the current pair of control axes for every agent.
#[derive(Debug, Clone, Default)]
pub struct AxisPolicy {
    horizontal: f64,
    vertical: f64,
}

impl AxisPolicy {
    pub fn new(horizontal: f64, vertical: f64) -> Self {
        let mut policy = Self::default();
        policy.set_axes(horizontal, vertical);
        policy
    }

    /// Updates the axes, clamped to `[-1, 1]`.
    pub fn set_axes(&mut self, horizontal: f64, vertical: f64) {
        self.horizontal = horizontal.clamp(-1.0, 1.0);
        self.vertical = vertical.clamp(-1.0, 1.0);
    }
}

impl Policy for AxisPolicy {
    fn choose_action(&mut self, _observation: &Observation) -> Action {
        Action::new(self.horizontal, self.vertical)
    }

    fn name(&self) -> &str {
        "axis"
    }
}
