//! Neural network policy using tch-rs (PyTorch bindings).
//!
//! Inference only: an MLP maps the observation to a `tanh`-squashed
//! action. Weights come from a trainer elsewhere and are loaded from a
//! `VarStore` file. This module is only available with the `rl-nn` feature.

use std::path::Path;

use tch::{nn, nn::Module, Device, Kind, TchError, Tensor};

use crate::observation::{Observation, OBSERVATION_DIM};
use crate::policy::Policy;
use crate::types::Action;

/// MLP actor: `20 → hidden → hidden → 2` with ReLU and `tanh` output.
pub struct MlpPolicy {
    vs: nn::VarStore,
    net: nn::Sequential,
    device: Device,
}

impl MlpPolicy {
    /// Creates a randomly initialized network.
    pub fn new(hidden: usize, device: Device) -> Self {
        let vs = nn::VarStore::new(device);
        let p = &vs.root();
        let net = nn::seq()
            .add(nn::linear(
                p / "l1",
                OBSERVATION_DIM as i64,
                hidden as i64,
                Default::default(),
            ))
            .add_fn(|x| x.relu())
            .add(nn::linear(
                p / "l2",
                hidden as i64,
                hidden as i64,
                Default::default(),
            ))
            .add_fn(|x| x.relu())
            .add(nn::linear(
                p / "l3",
                hidden as i64,
                Action::DIM as i64,
                Default::default(),
            ))
            .add_fn(|x| x.tanh());

        Self { vs, net, device }
    }

    /// Loads weights saved with `VarStore::save` into a network of the same shape.
    pub fn load(path: impl AsRef<Path>, hidden: usize, device: Device) -> Result<Self, TchError> {
        let mut policy = Self::new(hidden, device);
        policy.vs.load(path)?;
        Ok(policy)
    }

    /// Batched forward pass: `[n, 20] → [n, 2]`.
    pub fn forward(&self, obs: &Tensor) -> Tensor {
        self.net.forward(obs)
    }

    fn to_tensor(&self, observations: &[Observation]) -> Tensor {
        let flat: Vec<f32> = observations
            .iter()
            .flat_map(|o| o.iter().map(|&v| v as f32))
            .collect();
        Tensor::from_slice(&flat)
            .reshape([observations.len() as i64, OBSERVATION_DIM as i64])
            .to_device(self.device)
    }

    pub fn var_store(&self) -> &nn::VarStore {
        &self.vs
    }
}

impl Policy for MlpPolicy {
    fn choose_action(&mut self, observation: &Observation) -> Action {
        self.select_actions(std::slice::from_ref(observation))
            .pop()
            .unwrap_or_default()
    }

    fn select_actions(&mut self, observations: &[Observation]) -> Vec<Action> {
        if observations.is_empty() {
            return vec![];
        }
        let out = tch::no_grad(|| self.forward(&self.to_tensor(observations)))
            .to_device(Device::Cpu)
            .to_kind(Kind::Double)
            .flatten(0, -1);
        let values: Vec<f64> = match Vec::<f64>::try_from(&out) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(%err, "failed to read network output; using zero actions");
                return vec![Action::zero(); observations.len()];
            }
        };
        values
            .chunks(Action::DIM)
            .enumerate()
            .map(|(agent, raw)| Action::from_raw(raw, agent))
            .collect()
    }

    fn name(&self) -> &str {
        "mlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_shape() {
        let policy = MlpPolicy::new(64, Device::Cpu);
        let obs = Tensor::randn([4, OBSERVATION_DIM as i64], (Kind::Float, Device::Cpu));
        assert_eq!(policy.forward(&obs).size(), &[4, 2]);
    }

    #[test]
    fn actions_are_bounded() {
        let mut policy = MlpPolicy::new(32, Device::Cpu);
        let obs = vec![[0.5; OBSERVATION_DIM]; 3];
        let actions = policy.select_actions(&obs);
        assert_eq!(actions.len(), 3);
        for a in actions {
            assert!(a.move_x.abs() <= 1.0 && a.move_z.abs() <= 1.0);
        }
    }

    #[test]
    fn nan_input_yields_zero_actions() {
        let mut policy = MlpPolicy::new(16, Device::Cpu);
        let obs = vec![[f64::NAN; OBSERVATION_DIM]; 2];
        assert_eq!(policy.select_actions(&obs), vec![Action::zero(); 2]);
    }
}
