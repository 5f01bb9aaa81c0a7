//! color_grouping - multi-agent color grouping simulation
//!
//! Agents carrying one of three color labels move in a square domain and
//! are rewarded for clustering with same-colored peers. Local majority and
//! global ratio dynamics force color changes over time.
//!
//! The crate exposes a pure, seeded simulation step. Motion integration
//! and action selection plug in through [`MotionIntegrator`] and [`Policy`].

pub mod agent;
pub mod color;
pub mod config;
pub mod error;
pub mod metrics;
pub mod motion;
pub mod mutation;
#[cfg(feature = "rl-nn")]
pub mod network;
pub mod observation;
pub mod policy;
pub mod reward;
pub mod simulation;
pub mod spatial;
pub mod types;

pub use agent::{AgentState, EpisodePhase};
pub use color::{ColorObserver, ColorState};
pub use config::{
    BoundaryPolicy, GlobalRatioConfig, LocalMajorityConfig, MotionConfig, ProximityBand,
    ProximityConfig, SimConfig,
};
pub use error::{ActionError, ConfigError};
pub use metrics::EvaluationMetrics;
pub use motion::{ImpulseIntegrator, MotionIntegrator};
pub use mutation::{ColorMutationEngine, Conversion};
#[cfg(feature = "rl-nn")]
pub use network::MlpPolicy;
pub use observation::{Observation, ObservationBuilder, OBSERVATION_DIM};
pub use policy::{AxisPolicy, GroupingHeuristicPolicy, Policy, RandomPolicy};
pub use reward::{RewardBreakdown, RewardComputer};
pub use simulation::{Simulation, StepResult};
pub use spatial::{Neighbor, SpatialIndex};
pub use types::{Action, AgentId, Color, Position, Vec2, Velocity};

/// Identifier type used for simulation runs.
pub type Id = String;

/// Generates a new unique run identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
