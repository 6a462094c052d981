use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// The instantaneous state of the cart and pendulum.
///
/// The four fields form an ordered vector: cart position and velocity,
/// followed by the pendulum's angle and angular velocity relative to the
/// cart. The angle is not wrapped to [−π, π]; it accumulates without bound
/// as the pendulum spins.
///
/// `State` supports componentwise addition and scalar scaling, which is all
/// [`rkf45`](crate::rkf45) requires of a state type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Cart position (m).
    pub position: f64,
    /// Cart velocity (m/s).
    pub velocity: f64,
    /// Pendulum angle relative to the cart (rad).
    pub pendulum_angle: f64,
    /// Pendulum angular velocity (rad/s).
    pub pendulum_angular_velocity: f64,
}

impl State {
    /// Creates a state from its four components, in vector order.
    #[must_use]
    pub fn new(
        position: f64,
        velocity: f64,
        pendulum_angle: f64,
        pendulum_angular_velocity: f64,
    ) -> Self {
        Self {
            position,
            velocity,
            pendulum_angle,
            pendulum_angular_velocity,
        }
    }
}

/// Componentwise vector addition.
impl Add for State {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            position: self.position + rhs.position,
            velocity: self.velocity + rhs.velocity,
            pendulum_angle: self.pendulum_angle + rhs.pendulum_angle,
            pendulum_angular_velocity: self.pendulum_angular_velocity
                + rhs.pendulum_angular_velocity,
        }
    }
}

/// Scaling by a scalar.
impl Mul<f64> for State {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            position: self.position * rhs,
            velocity: self.velocity * rhs,
            pendulum_angle: self.pendulum_angle * rhs,
            pendulum_angular_velocity: self.pendulum_angular_velocity * rhs,
        }
    }
}
