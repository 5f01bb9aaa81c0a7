//! Neighborhood queries over a per-tick snapshot of agent positions.

use crate::types::{AgentId, Position};

/// A neighbor returned by a [`SpatialIndex`] query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: AgentId,
    pub distance: f64,
}

/// Snapshot of agent positions answering nearest-K and radius queries.
///
/// Built once per tick by brute force (O(N²) over a whole tick), which is
/// fine for populations of tens of agents. Distances are planar only.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    positions: Vec<Position>,
}

impl SpatialIndex {
    /// Builds the index from positions in id order.
    pub fn build(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    /// Replaces the snapshot, reusing the allocation.
    pub fn rebuild(&mut self, positions: impl IntoIterator<Item = Position>) {
        self.positions.clear();
        self.positions.extend(positions);
    }

    /// Position of `id` in the snapshot.
    pub fn position(&self, id: AgentId) -> Position {
        self.positions[id]
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterates over every agent other than `self_id` with its distance.
    pub fn others(&self, self_id: AgentId) -> impl Iterator<Item = Neighbor> + '_ {
        let center = self.positions[self_id];
        self.positions
            .iter()
            .enumerate()
            .filter(move |(id, _)| *id != self_id)
            .map(move |(id, p)| Neighbor {
                id,
                distance: center.distance_to(p),
            })
    }

    /// Up to `k` other agents by ascending distance.
    ///
    /// Equal distances keep insertion order.
    pub fn nearest_k(&self, self_id: AgentId, k: usize) -> Vec<Neighbor> {
        let mut all: Vec<Neighbor> = self.others(self_id).collect();
        // stable sort: ties stay in id order
        all.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        all.truncate(k);
        all
    }

    /// All other agents within distance `radius` (inclusive), in id order.
    pub fn within_radius(&self, self_id: AgentId, radius: f64) -> Vec<Neighbor> {
        self.others(self_id)
            .filter(|n| n.distance <= radius)
            .collect()
    }
}
