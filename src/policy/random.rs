//! Random policy for testing and baselines.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::trait_::Policy;
use crate::observation::Observation;
use crate::types::Action;

/// Uniformly random actions in `[-1, 1]²`.
///
/// Seeded so that runs driven by it stay reproducible.
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    /// Creates a new random policy with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_action(&mut self, _observation: &Observation) -> Action {
        Action::new(self.rng.gen_range(-1.0..=1.0), self.rng.gen_range(-1.0..=1.0))
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::OBSERVATION_DIM;

    #[test]
    fn random_policy_returns_correct_count() {
        let mut policy = RandomPolicy::new(3);
        let obs = vec![[0.0; OBSERVATION_DIM]; 4];
        assert_eq!(policy.select_actions(&obs).len(), 4);
    }

    #[test]
    fn random_policy_actions_in_range() {
        let mut policy = RandomPolicy::new(3);
        let obs = vec![[0.0; OBSERVATION_DIM]; 100];
        for a in policy.select_actions(&obs) {
            assert!((-1.0..=1.0).contains(&a.move_x));
            assert!((-1.0..=1.0).contains(&a.move_z));
        }
    }

    #[test]
    fn same_seed_same_actions() {
        let obs = vec![[0.0; OBSERVATION_DIM]; 10];
        let a = RandomPolicy::new(11).select_actions(&obs);
        let b = RandomPolicy::new(11).select_actions(&obs);
        assert_eq!(a, b);
    }
}
