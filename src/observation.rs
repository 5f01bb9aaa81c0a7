//! Observation encoding for the policy.
//!
//! Builds the fixed-length per-agent vector: own normalized position and
//! color, then the relative position and color of the nearest neighbors.

use crate::color::ColorState;
use crate::spatial::SpatialIndex;
use crate::types::AgentId;

/// Number of nearest neighbors described in an observation.
pub const NEIGHBOR_SLOTS: usize = 3;

/// Features describing the observing agent: `x, z, one_hot(3)`.
pub const SELF_FEATURE_DIM: usize = 5;

/// Features per neighbor slot: `dx, dz, one_hot(3)`.
pub const NEIGHBOR_FEATURE_DIM: usize = 5;

/// Total observation length.
pub const OBSERVATION_DIM: usize = SELF_FEATURE_DIM + NEIGHBOR_SLOTS * NEIGHBOR_FEATURE_DIM;

/// Per-agent observation vector.
pub type Observation = [f64; OBSERVATION_DIM];

/// Builds observation vectors for agents.
pub struct ObservationBuilder;

impl ObservationBuilder {
    /// Builds the observation vector for one agent.
    ///
    /// ```text
    /// [x/area, z/area, red, green, blue] ++ 3 × [dx/area, dz/area, red, green, blue]
    /// ```
    ///
    /// Positions are divided by `area_size` but not clamped, so values past
    /// ±1 signal an agent outside the domain. Missing neighbor slots are
    /// zero-filled.
    pub fn build(
        agent: AgentId,
        index: &SpatialIndex,
        colors: &ColorState,
        area_size: f64,
    ) -> Observation {
        let mut obs = [0.0; OBSERVATION_DIM];
        let me = index.position(agent);

        let (nx, nz) = me.normalized(area_size);
        obs[0] = nx;
        obs[1] = nz;
        obs[2..SELF_FEATURE_DIM].copy_from_slice(&colors.get(agent).one_hot());

        for (slot, neighbor) in index
            .nearest_k(agent, NEIGHBOR_SLOTS)
            .into_iter()
            .enumerate()
        {
            let base = SELF_FEATURE_DIM + slot * NEIGHBOR_FEATURE_DIM;
            let (dx, dz) = (index.position(neighbor.id) - me).normalized(area_size);
            obs[base] = dx;
            obs[base + 1] = dz;
            obs[base + 2..base + NEIGHBOR_FEATURE_DIM]
                .copy_from_slice(&colors.get(neighbor.id).one_hot());
        }

        obs
    }

    /// Builds observations for all agents in id order.
    pub fn build_all(index: &SpatialIndex, colors: &ColorState, area_size: f64) -> Vec<Observation> {
        (0..index.len())
            .map(|i| Self::build(i, index, colors, area_size))
            .collect()
    }
}
