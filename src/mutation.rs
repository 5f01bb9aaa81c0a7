//! Forced color conversions.
//!
//! Two independent mechanisms:
//!
//! - **Local majority**: an agent adopts the dominant color among the
//!   agents within `check_range` when that color's share reaches the
//!   threshold. Ties at the maximum go to the first color in
//!   `Red`, `Green`, `Blue` order.
//! - **Global ratio**: when a color's population share exceeds the
//!   threshold, every agent of another color independently converts to it
//!   with probability `convert_prob`.
//!
//! Both change labels only through [`ColorState::set`].

use rand::Rng;

use crate::color::ColorState;
use crate::config::{GlobalRatioConfig, LocalMajorityConfig};
use crate::spatial::SpatialIndex;
use crate::types::{AgentId, Color};

/// A label change applied by a conversion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub agent: AgentId,
    pub from: Color,
    pub to: Color,
}

/// Applies local and global color conversions.
pub struct ColorMutationEngine;

impl ColorMutationEngine {
    /// Decides the majority color for one agent, if any.
    ///
    /// Returns `None` when no neighbor is in range or the top share is
    /// below the threshold. The decision may equal the agent's own color.
    pub fn local_majority(
        agent: AgentId,
        index: &SpatialIndex,
        colors: &ColorState,
        config: &LocalMajorityConfig,
    ) -> Option<Color> {
        let mut counts = [0usize; 3];
        let mut total = 0usize;
        for n in index.within_radius(agent, config.check_range) {
            counts[colors.get(n.id).index()] += 1;
            total += 1;
        }
        if total == 0 {
            return None;
        }

        // strict `>` keeps the earliest color on ties
        let mut best = Color::Red;
        for color in Color::ALL {
            if counts[color.index()] > counts[best.index()] {
                best = color;
            }
        }

        let share = counts[best.index()] as f64 / total as f64;
        (share >= config.threshold).then_some(best)
    }

    /// Runs the local majority pass for the given agents.
    ///
    /// All decisions are taken against the colors as they were before the
    /// pass, then applied together, so the outcome does not depend on the
    /// order of `agents`.
    pub fn apply_local(
        agents: impl IntoIterator<Item = AgentId>,
        index: &SpatialIndex,
        colors: &mut ColorState,
        config: &LocalMajorityConfig,
    ) -> Vec<Conversion> {
        let decisions: Vec<(AgentId, Color)> = agents
            .into_iter()
            .filter_map(|id| Self::local_majority(id, index, colors, config).map(|c| (id, c)))
            .collect();

        let mut applied = Vec::new();
        for (agent, to) in decisions {
            let from = colors.get(agent);
            if colors.set(agent, to) {
                tracing::debug!(agent, %from, %to, "local majority conversion");
                applied.push(Conversion { agent, from, to });
            }
        }
        applied
    }

    /// Colors whose population share strictly exceeds the threshold.
    pub fn dominant_colors(colors: &ColorState, threshold: f64) -> Vec<Color> {
        let shares = colors.shares();
        Color::ALL
            .into_iter()
            .filter(|c| shares[c.index()] > threshold)
            .collect()
    }

    /// Runs the global ratio pass once.
    ///
    /// Shares are measured once at the start of the pass. For each dominant
    /// color, in priority order, every agent not currently of that color
    /// draws once and converts with probability `convert_prob`. An agent
    /// converts at most once per pass: when several colors are dominant,
    /// agents already converted toward an earlier one are not drawn again.
    /// Agents are visited in id order so a seeded RNG reproduces the outcome.
    pub fn apply_global<R: Rng + ?Sized>(
        colors: &mut ColorState,
        config: &GlobalRatioConfig,
        rng: &mut R,
    ) -> Vec<Conversion> {
        let mut applied = Vec::new();
        let mut converted = vec![false; colors.len()];
        for target in Self::dominant_colors(colors, config.threshold) {
            for agent in 0..colors.len() {
                let from = colors.get(agent);
                if from == target || converted[agent] {
                    continue;
                }
                if rng.gen_bool(config.convert_prob) {
                    colors.set(agent, target);
                    converted[agent] = true;
                    tracing::debug!(agent, %from, to = %target, "global ratio conversion");
                    applied.push(Conversion {
                        agent,
                        from,
                        to: target,
                    });
                }
            }
        }
        applied
    }
}
