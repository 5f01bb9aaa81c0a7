//! Core types for the color grouping simulation.
//!
//! Defines the color labels, planar positions and vectors, agent
//! identifiers, and the continuous action used throughout the engine.

use std::fmt;
use std::ops::{Add, Mul, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// Stable agent identifier: the agent's index in spawn order.
pub type AgentId = usize;

/// Discrete color label carried by every agent.
///
/// The declaration order (`Red`, `Green`, `Blue`) is also the one-hot
/// order and the tie-break priority for majority decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    /// All colors in priority order.
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    /// Returns the index of this color (0=Red, 1=Green, 2=Blue).
    pub fn index(&self) -> usize {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Blue => 2,
        }
    }

    /// One-hot encoding of this color as a 3-element vector.
    pub fn one_hot(&self) -> [f64; 3] {
        let mut v = [0.0; 3];
        v[self.index()] = 1.0;
        v
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Green => write!(f, "green"),
            Color::Blue => write!(f, "blue"),
        }
    }
}

/// A vector in the horizontal plane.
///
/// The second component is named `z` because the vertical axis of the
/// embedding world is unused; all geometry is planar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub z: f64,
}

/// Agent position in the square domain `[-area, area]²`.
pub type Position = Vec2;

/// Agent velocity.
pub type Velocity = Vec2;

impl Vec2 {
    /// Creates a new vector.
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self { x: 0.0, z: 0.0 }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Vec2) -> f64 {
        (*other - *self).length()
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Returns true if either component lies strictly beyond `half_extent`.
    pub fn is_outside(&self, half_extent: f64) -> bool {
        self.x.abs() > half_extent || self.z.abs() > half_extent
    }

    /// Divides both components by `scale` without clamping.
    pub fn normalized(&self, scale: f64) -> (f64, f64) {
        (self.x / scale, self.z / scale)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.z * rhs)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.z)
    }
}

/// Continuous 2D motion command produced by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Action {
    pub move_x: f64,
    pub move_z: f64,
}

impl Action {
    /// Number of continuous action components.
    pub const DIM: usize = 2;

    /// Creates a new action.
    pub fn new(move_x: f64, move_z: f64) -> Self {
        Self { move_x, move_z }
    }

    /// The zero action (no impulse).
    pub fn zero() -> Self {
        Self::default()
    }

    /// Parses a raw action vector, rejecting wrong lengths and non-finite values.
    pub fn try_from_slice(raw: &[f64]) -> Result<Self, ActionError> {
        if raw.len() != Self::DIM {
            return Err(ActionError::WrongLength {
                expected: Self::DIM,
                actual: raw.len(),
            });
        }
        let action = Self::new(raw[0], raw[1]);
        action.check()?;
        Ok(action)
    }

    /// Verifies that both components are finite.
    pub fn check(&self) -> Result<(), ActionError> {
        for (index, value) in [self.move_x, self.move_z].into_iter().enumerate() {
            if !value.is_finite() {
                return Err(ActionError::NonFinite { index, value });
            }
        }
        Ok(())
    }

    /// Returns this action if valid, otherwise the zero action.
    ///
    /// Invalid actions are logged and never abort a tick.
    pub fn sanitize(self, agent: AgentId) -> Self {
        match self.check() {
            Ok(()) => self,
            Err(err) => {
                tracing::warn!(agent, %err, "invalid action replaced with zero action");
                Self::zero()
            }
        }
    }

    /// Parses a raw action vector for `agent`, falling back to the zero
    /// action when it has the wrong length or a non-finite component.
    pub fn from_raw(raw: &[f64], agent: AgentId) -> Self {
        match Self::try_from_slice(raw) {
            Ok(action) => action,
            Err(err) => {
                tracing::warn!(agent, %err, "invalid raw action replaced with zero action");
                Self::zero()
            }
        }
    }

    /// The action as a planar vector.
    pub fn as_vec(&self) -> Vec2 {
        Vec2::new(self.move_x, self.move_z)
    }
}
