//! Agent state and per-agent episode bookkeeping.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{AgentId, Color, Position, Velocity};

/// Lifecycle of a single agent's episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EpisodePhase {
    /// Placed in the world, no tick taken yet.
    Spawned,
    Running,
    /// Ended early by leaving the domain.
    Terminated,
    /// Ended by reaching the tick limit.
    Truncated,
}

impl EpisodePhase {
    /// Returns true once the episode has ended either way.
    pub fn is_finished(&self) -> bool {
        matches!(self, EpisodePhase::Terminated | EpisodePhase::Truncated)
    }
}

/// State of a single agent.
///
/// The current color lives in [`ColorState`](crate::color::ColorState);
/// the agent only remembers the color it was spawned with.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentState {
    /// Stable identifier (spawn order index).
    pub id: AgentId,
    pub position: Position,
    pub velocity: Velocity,
    /// Color assigned at spawn time.
    pub spawn_color: Color,
    /// Half-extent of the domain this agent lives in.
    pub area_size: f64,
    pub phase: EpisodePhase,
    /// Ticks taken in the current episode.
    pub episode_ticks: u32,
    /// Reward accumulated in the current episode.
    pub episode_reward: f64,
    /// Number of episodes this agent has finished.
    pub episodes_completed: u32,
}

impl AgentState {
    /// Creates a freshly spawned agent at rest.
    pub fn new(id: AgentId, position: Position, spawn_color: Color, area_size: f64) -> Self {
        Self {
            id,
            position,
            velocity: Velocity::zero(),
            spawn_color,
            area_size,
            phase: EpisodePhase::Spawned,
            episode_ticks: 0,
            episode_reward: 0.0,
            episodes_completed: 0,
        }
    }

    /// Starts a new episode at `position` with zero velocity.
    pub fn begin_episode(&mut self, position: Position) {
        self.position = position;
        self.velocity = Velocity::zero();
        self.phase = EpisodePhase::Spawned;
        self.episode_ticks = 0;
        self.episode_reward = 0.0;
    }

    /// Ends the current episode with the given terminal phase.
    pub fn finish_episode(&mut self, phase: EpisodePhase) {
        debug_assert!(phase.is_finished());
        self.phase = phase;
        self.episodes_completed += 1;
    }

    /// Returns true if the agent lies outside its domain.
    pub fn is_out_of_bounds(&self) -> bool {
        self.position.is_outside(self.area_size)
    }
}
