//! Motion integration seam.
//!
//! The engine only needs something that turns an action into a new
//! position and velocity; physics engines plug in through
//! [`MotionIntegrator`].

use crate::types::{Action, Position, Velocity};

/// Turns an action into the next position and velocity.
///
/// Implementations must leave the velocity unchanged for a zero action
/// and apply an impulse proportional to `action * speed`.
pub trait MotionIntegrator: Send {
    fn integrate(
        &self,
        position: Position,
        velocity: Velocity,
        action: Action,
        speed: f64,
    ) -> (Position, Velocity);
}

/// Instantaneous velocity change followed by an explicit Euler step.
///
/// No drag, no collisions: `v' = v + a·speed`, `p' = p + v'·Δt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseIntegrator {
    pub delta_t: f64,
}

impl ImpulseIntegrator {
    pub fn new(delta_t: f64) -> Self {
        Self { delta_t }
    }
}

impl MotionIntegrator for ImpulseIntegrator {
    fn integrate(
        &self,
        position: Position,
        velocity: Velocity,
        action: Action,
        speed: f64,
    ) -> (Position, Velocity) {
        let velocity = velocity + action.as_vec() * speed;
        (position + velocity * self.delta_t, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_action_keeps_velocity() {
        let integ = ImpulseIntegrator::new(0.5);
        let (p, v) = integ.integrate(
            Position::new(1.0, 1.0),
            Velocity::new(2.0, 0.0),
            Action::zero(),
            3.0,
        );
        assert_eq!(v, Velocity::new(2.0, 0.0));
        assert_eq!(p, Position::new(2.0, 1.0));
    }

    #[test]
    fn impulse_scales_with_speed() {
        let integ = ImpulseIntegrator::new(1.0);
        let (p, v) = integ.integrate(
            Position::zero(),
            Velocity::zero(),
            Action::new(0.5, -1.0),
            2.0,
        );
        assert_eq!(v, Velocity::new(1.0, -2.0));
        assert_eq!(p, Position::new(1.0, -2.0));
    }
}
