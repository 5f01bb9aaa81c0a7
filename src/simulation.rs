//! Color grouping simulation.
//!
//! Runs the per-tick loop:
//! respawn → act → reward → local conversion → move → tick → global conversion → observe.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::agent::{AgentState, EpisodePhase};
use crate::color::{ColorObserver, ColorState};
use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::motion::{ImpulseIntegrator, MotionIntegrator};
use crate::mutation::{ColorMutationEngine, Conversion};
use crate::observation::{Observation, ObservationBuilder};
use crate::policy::Policy;
use crate::reward::{RewardBreakdown, RewardComputer};
use crate::spatial::SpatialIndex;
use crate::types::{Action, AgentId, Color, Position, Velocity};
use crate::{generate_id, Id};

/// Result of a single simulation tick.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Tick counter after this step.
    pub tick: u64,
    /// Per-agent observations for the next decision.
    pub observations: Vec<Observation>,
    /// Per-agent reward earned this tick.
    pub rewards: Vec<f64>,
    /// Per-agent reward terms.
    pub breakdowns: Vec<RewardBreakdown>,
    /// Agents whose episode ended by leaving the domain this tick.
    pub terminated: Vec<bool>,
    /// Agents whose episode hit the tick limit this tick.
    pub truncated: Vec<bool>,
    /// Labels changed by the local majority pass this tick.
    pub local_conversions: Vec<Conversion>,
    /// Labels changed by the global ratio pass this tick.
    pub global_conversions: Vec<Conversion>,
}

impl StepResult {
    /// Sum of all agents' rewards this tick.
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }

    /// Returns true if any agent's episode ended this tick.
    pub fn any_done(&self) -> bool {
        self.terminated.iter().chain(&self.truncated).any(|&d| d)
    }
}

/// The multi-agent color grouping simulation.
///
/// Owns every agent, their color labels, and the seeded RNG. Peers are
/// only ever referenced by [`AgentId`] through the spatial snapshot.
///
/// # Lifecycle
///
/// 1. Call [`Simulation::new`]; agents spawn color by color at uniform
///    positions.
/// 2. Call [`Simulation::step`] (or [`Simulation::step_with_policy`]) once
///    per tick.
/// 3. Agents whose episode ends are respawned at the end of the tick when
///    `auto_reset` is on; otherwise they stay frozen until
///    [`Simulation::reset`].
pub struct Simulation {
    config: SimConfig,
    run_id: Id,
    agents: Vec<AgentState>,
    colors: ColorState,
    /// Positions as of the start of the next tick.
    index: SpatialIndex,
    integrator: Box<dyn MotionIntegrator>,
    rng: ChaCha8Rng,
    tick: u64,
    auto_reset: bool,
    cumulative_reward: f64,
}

impl Simulation {
    /// Creates a simulation using the default impulse integrator.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let integrator = ImpulseIntegrator::new(config.motion.delta_t);
        Self::with_integrator(config, Box::new(integrator))
    }

    /// Creates a simulation with a custom motion integrator.
    pub fn with_integrator(
        config: SimConfig,
        integrator: Box<dyn MotionIntegrator>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut agents = Vec::with_capacity(config.population());
        let mut labels = Vec::with_capacity(config.population());
        for color in Color::ALL {
            for _ in 0..config.spawn_count(color) {
                let position = sample_position(&mut rng, config.area_size);
                agents.push(AgentState::new(
                    agents.len(),
                    position,
                    color,
                    config.area_size,
                ));
                labels.push(color);
            }
        }

        let index = SpatialIndex::build(agents.iter().map(|a| a.position).collect());
        let run_id = generate_id();
        tracing::info!(
            run = %run_id,
            agents = agents.len(),
            area_size = config.area_size,
            seed = config.seed,
            "simulation created"
        );

        Ok(Self {
            config,
            run_id,
            agents,
            colors: ColorState::new(labels),
            index,
            integrator,
            rng,
            tick: 0,
            auto_reset: true,
            cumulative_reward: 0.0,
        })
    }

    /// Whether finished agents are respawned automatically (default `true`).
    pub fn set_auto_reset(&mut self, auto_reset: bool) {
        self.auto_reset = auto_reset;
    }

    /// Installs the hook notified on every color change.
    pub fn set_color_observer(&mut self, observer: Box<dyn ColorObserver>) {
        self.colors.set_observer(observer);
    }

    /// Restarts every agent's episode and the tick counter.
    ///
    /// Returns the initial observations.
    pub fn reset(&mut self) -> Vec<Observation> {
        self.tick = 0;
        self.cumulative_reward = 0.0;
        for id in 0..self.agents.len() {
            self.respawn(id);
        }
        self.refresh_index();
        tracing::info!(run = %self.run_id, "world reset");
        self.observe()
    }

    /// Observations of every agent against the current state.
    pub fn observe(&self) -> Vec<Observation> {
        ObservationBuilder::build_all(&self.index, &self.colors, self.config.area_size)
    }

    /// Asks `policy` for actions on the current observations, then steps.
    pub fn step_with_policy(&mut self, policy: &mut dyn Policy) -> StepResult {
        let observations = self.observe();
        let actions = policy.select_actions(&observations);
        self.step(&actions)
    }

    /// Executes one tick.
    ///
    /// Rewards, boundary checks and local conversions all read the
    /// positions and colors as they were at the start of the tick; motion
    /// and label changes are applied afterwards.
    ///
    /// Invalid actions are replaced with the zero action; missing actions
    /// count as zero and surplus actions are ignored.
    #[tracing::instrument(skip_all, fields(run = %self.run_id, tick = self.tick))]
    pub fn step(&mut self, actions: &[Action]) -> StepResult {
        let n = self.agents.len();
        if actions.len() != n {
            tracing::warn!(
                expected = n,
                actual = actions.len(),
                "action count mismatch; padding with zero actions"
            );
        }

        let mut rewards = vec![0.0; n];
        let mut breakdowns = vec![RewardBreakdown::default(); n];
        let mut terminated = vec![false; n];
        let mut truncated = vec![false; n];
        let mut moves: Vec<Option<(Position, Velocity)>> = vec![None; n];
        let mut local_participants = Vec::with_capacity(n);

        for (id, agent) in self.agents.iter_mut().enumerate() {
            if agent.phase.is_finished() {
                continue; // frozen until reset
            }
            agent.phase = EpisodePhase::Running;

            let action = actions
                .get(id)
                .copied()
                .unwrap_or_default()
                .sanitize(id);
            moves[id] = Some(self.integrator.integrate(
                agent.position,
                agent.velocity,
                action,
                self.config.motion.move_speed,
            ));

            let reward = RewardComputer::compute(id, &self.index, &self.colors, &self.config);
            rewards[id] = reward.total();
            breakdowns[id] = reward;
            agent.episode_reward += reward.total();
            agent.episode_ticks += 1;

            if reward.terminate {
                terminated[id] = true;
                moves[id] = None;
                continue;
            }
            if agent.episode_ticks >= self.config.max_ticks {
                truncated[id] = true;
            }
            local_participants.push(id);
        }

        let local_conversions = if self.config.local_majority.enabled {
            ColorMutationEngine::apply_local(
                local_participants,
                &self.index,
                &mut self.colors,
                &self.config.local_majority,
            )
        } else {
            Vec::new()
        };

        for (agent, mv) in self.agents.iter_mut().zip(moves) {
            if let Some((position, velocity)) = mv {
                agent.position = position;
                agent.velocity = velocity;
            }
        }

        self.tick += 1;

        let global = &self.config.global_ratio;
        let global_conversions = if global.enabled && self.tick % u64::from(global.every_ticks) == 0
        {
            ColorMutationEngine::apply_global(&mut self.colors, global, &mut self.rng)
        } else {
            Vec::new()
        };

        for id in 0..n {
            let phase = if terminated[id] {
                EpisodePhase::Terminated
            } else if truncated[id] {
                EpisodePhase::Truncated
            } else {
                continue;
            };
            let agent = &mut self.agents[id];
            agent.finish_episode(phase);
            tracing::debug!(
                agent = id,
                ?phase,
                ticks = agent.episode_ticks,
                reward = agent.episode_reward,
                "episode finished"
            );
            if self.auto_reset {
                self.respawn(id);
            }
        }

        self.refresh_index();
        let total: f64 = rewards.iter().sum();
        self.cumulative_reward += total;
        tracing::trace!(
            reward = total,
            local = local_conversions.len(),
            global = global_conversions.len(),
            "tick complete"
        );

        StepResult {
            tick: self.tick,
            observations: self.observe(),
            rewards,
            breakdowns,
            terminated,
            truncated,
            local_conversions,
            global_conversions,
        }
    }

    /// Starts a new episode for one agent.
    fn respawn(&mut self, id: AgentId) {
        let position = sample_position(&mut self.rng, self.config.area_size);
        let agent = &mut self.agents[id];
        agent.begin_episode(position);
        if self.config.reset_color_on_episode {
            self.colors.set(id, agent.spawn_color);
        }
    }

    fn refresh_index(&mut self) {
        self.index.rebuild(self.agents.iter().map(|a| a.position));
    }

    /// Moves an agent, e.g. when an external physics engine owns transforms.
    pub fn set_position(&mut self, id: AgentId, position: Position) {
        self.agents[id].position = position;
        self.refresh_index();
    }

    /// Overrides an agent's velocity.
    pub fn set_velocity(&mut self, id: AgentId, velocity: Velocity) {
        self.agents[id].velocity = velocity;
    }

    /// Changes an agent's color through the single notified path.
    pub fn set_color(&mut self, id: AgentId, color: Color) -> bool {
        self.colors.set(id, color)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn agents(&self) -> &[AgentState] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> &AgentState {
        &self.agents[id]
    }

    pub fn colors(&self) -> &ColorState {
        &self.colors
    }

    pub fn color(&self, id: AgentId) -> Color {
        self.colors.get(id)
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Ticks elapsed since construction or the last reset.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Sum of all agents' rewards since the last reset.
    pub fn cumulative_reward(&self) -> f64 {
        self.cumulative_reward
    }

    pub fn n_agents(&self) -> usize {
        self.agents.len()
    }
}

fn sample_position<R: Rng + ?Sized>(rng: &mut R, area_size: f64) -> Position {
    Position::new(
        rng.gen_range(-area_size..=area_size),
        rng.gen_range(-area_size..=area_size),
    )
}
