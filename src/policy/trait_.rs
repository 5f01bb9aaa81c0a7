//! Policy trait for the simulation.

use crate::observation::Observation;
use crate::types::Action;

/// A policy that maps an observation to a continuous 2D action.
///
/// May be backed by a trained model or a scripted rule; the simulation
/// does not care which.
pub trait Policy: Send {
    /// Chooses the action for one agent.
    fn choose_action(&mut self, observation: &Observation) -> Action;

    /// Chooses one action per agent, in the order of `observations`.
    fn select_actions(&mut self, observations: &[Observation]) -> Vec<Action> {
        observations.iter().map(|o| self.choose_action(o)).collect()
    }

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
