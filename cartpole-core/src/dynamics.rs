use serde::{Deserialize, Serialize};

use crate::State;

/// Standard gravity (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Friction coefficient used by the equations of motion.
///
/// Note that [`Parameters::viscous_friction`] is carried in the parameter
/// record but is not read by [`pendulum`]; the equations use this fixed
/// coefficient instead. Changing that behavior changes every published
/// trajectory, so the constant stays until the model itself is revised.
const FRICTION: f64 = 0.1;

/// Physical parameters of the cart and pendulum.
///
/// `force` is the control input applied to the cart; the simulation loop
/// overwrites it each tick with the control law's output via
/// [`with_force`](Parameters::with_force). The remaining fields describe the
/// hardware and are normally fixed for the lifetime of a run.
///
/// `wheel_radius` and `viscous_friction` are part of the record but unused
/// by the current equations of motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Force applied to the cart (N).
    pub force: f64,
    /// Pendulum stick length (m). Must be positive.
    pub stick_length: f64,
    /// Mass of the ball at the end of the stick (kg). Must be positive.
    pub ball_mass: f64,
    /// Mass of the drive wheel (kg). Must be positive.
    pub wheel_mass: f64,
    /// Radius of the drive wheel (m).
    pub wheel_radius: f64,
    /// Viscous friction coefficient.
    pub viscous_friction: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            force: 0.0,
            stick_length: 2.0,
            ball_mass: 1.0,
            wheel_mass: 2.0,
            wheel_radius: 1.0,
            viscous_friction: 0.01,
        }
    }
}

impl Parameters {
    /// Sets the stick length in meters.
    #[must_use]
    pub fn stick_length(mut self, stick_length: f64) -> Self {
        self.stick_length = stick_length;
        self
    }

    /// Sets the ball mass in kilograms.
    #[must_use]
    pub fn ball_mass(mut self, ball_mass: f64) -> Self {
        self.ball_mass = ball_mass;
        self
    }

    /// Sets the wheel mass in kilograms.
    #[must_use]
    pub fn wheel_mass(mut self, wheel_mass: f64) -> Self {
        self.wheel_mass = wheel_mass;
        self
    }

    /// Sets the wheel radius in meters.
    #[must_use]
    pub fn wheel_radius(mut self, wheel_radius: f64) -> Self {
        self.wheel_radius = wheel_radius;
        self
    }

    /// Sets the viscous friction coefficient.
    #[must_use]
    pub fn viscous_friction(mut self, viscous_friction: f64) -> Self {
        self.viscous_friction = viscous_friction;
        self
    }

    /// Returns a copy with `force` replaced.
    ///
    /// This is the per-tick merge the simulation loop performs before
    /// handing the parameters to the integrator.
    #[must_use]
    pub fn with_force(mut self, force: f64) -> Self {
        self.force = force;
        self
    }
}

/// Evaluates the cart/pendulum equations of motion.
///
/// Given the current state and parameters, returns the time derivative of
/// the state: the cart's velocity and acceleration, and the pendulum's
/// angular velocity and angular acceleration. The time argument is unused
/// by the equations and exists for integrator-interface symmetry.
///
/// With `F` the applied force, `l` the stick length, `m` the ball mass,
/// `M` the wheel mass, `μ` the fixed friction coefficient, and `(v, a, w)`
/// the velocity, angle, and angular velocity:
///
/// ```text
/// ẍ = (F − μ(M+m)g·v + m·l·w²·sin a − m·g·sin a·cos a) / (2M + m − m·cos²a)
/// ä = (g·sin a − ẍ·cos a) / l
/// ```
///
/// The denominator is bounded below by `2M`, so the function is total for
/// `M > 0` and `l > 0`. Those preconditions are the caller's burden: the
/// function does not validate, and violating them propagates NaN or
/// infinity through the returned derivative rather than reporting an error.
#[must_use]
pub fn pendulum(_t: f64, y: State, params: &Parameters) -> State {
    let State {
        velocity,
        pendulum_angle,
        pendulum_angular_velocity,
        ..
    } = y;
    let Parameters {
        force,
        stick_length,
        ball_mass,
        wheel_mass,
        ..
    } = *params;

    let (sin_a, cos_a) = pendulum_angle.sin_cos();
    let w_sq = pendulum_angular_velocity * pendulum_angular_velocity;

    let x_ddot = (force - FRICTION * (wheel_mass + ball_mass) * GRAVITY * velocity
        + ball_mass * stick_length * w_sq * sin_a
        - ball_mass * GRAVITY * sin_a * cos_a)
        / (2.0 * wheel_mass + ball_mass - ball_mass * cos_a * cos_a);
    let a_ddot = (GRAVITY * sin_a - x_ddot * cos_a) / stick_length;

    State {
        position: velocity,
        velocity: x_ddot,
        pendulum_angle: pendulum_angular_velocity,
        pendulum_angular_velocity: a_ddot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn equilibrium_has_zero_derivative() {
        let dy = pendulum(0.0, State::default(), &Parameters::default());
        assert_eq!(dy, State::default());
    }

    #[test]
    fn force_alone_accelerates_cart_and_tips_pendulum() {
        let params = Parameters::default().with_force(1.0);
        let dy = pendulum(0.0, State::default(), &params);

        // Denominator at a = 0: 2M + m − m·cos²(0) = 2M = 4.
        assert_relative_eq!(dy.velocity, 0.25);
        // ä = −ẍ/l.
        assert_relative_eq!(dy.pendulum_angular_velocity, -0.125);
        assert_eq!(dy.position, 0.0);
        assert_eq!(dy.pendulum_angle, 0.0);
    }

    #[test]
    fn friction_opposes_cart_velocity() {
        let state = State::new(0.0, 1.0, 0.0, 0.0);
        let dy = pendulum(0.0, state, &Parameters::default());

        // ẍ = −μ(M+m)g·v / 2M = −0.1·3·9.81 / 4.
        assert_relative_eq!(dy.velocity, -0.1 * 3.0 * 9.81 / 4.0);
        assert_relative_eq!(dy.pendulum_angular_velocity, -dy.velocity / 2.0);
    }

    #[test]
    fn friction_coefficient_is_fixed() {
        // The viscous_friction field is not consulted by the equations;
        // the trajectory must be identical regardless of its value.
        let state = State::new(0.0, 1.0, 0.3, -0.2);
        let base = pendulum(0.0, state, &Parameters::default());
        let altered = pendulum(0.0, state, &Parameters::default().viscous_friction(123.0));
        assert_eq!(base, altered);
    }

    #[test]
    fn wheel_radius_does_not_enter_the_equations() {
        let state = State::new(0.5, -1.0, 2.0, 0.7);
        let base = pendulum(0.0, state, &Parameters::default());
        let altered = pendulum(0.0, state, &Parameters::default().wheel_radius(42.0));
        assert_eq!(base, altered);
    }

    #[test]
    fn denominator_stays_above_twice_the_wheel_mass() {
        let ball_mass = 1.7;
        let wheel_mass = 0.4;
        for i in 0..360 {
            let a = f64::from(i) * std::f64::consts::TAU / 360.0;
            let denominator = 2.0 * wheel_mass + ball_mass - ball_mass * a.cos() * a.cos();
            assert!(denominator >= 2.0 * wheel_mass);
        }
    }

    #[test]
    fn derivative_is_finite_across_a_full_revolution() {
        let params = Parameters::default()
            .ball_mass(3.0)
            .wheel_mass(0.5)
            .with_force(2.0);
        for i in 0..360 {
            let a = f64::from(i) * std::f64::consts::TAU / 360.0;
            let dy = pendulum(0.0, State::new(0.0, 1.0, a, -1.0), &params);
            assert!(dy.velocity.is_finite());
            assert!(dy.pendulum_angular_velocity.is_finite());
        }
    }

    #[test]
    fn defaults_match_the_reference_hardware() {
        let p = Parameters::default();
        assert_eq!(p.force, 0.0);
        assert_eq!(p.stick_length, 2.0);
        assert_eq!(p.ball_mass, 1.0);
        assert_eq!(p.wheel_mass, 2.0);
        assert_eq!(p.wheel_radius, 1.0);
        assert_eq!(p.viscous_friction, 0.01);
    }

    #[test]
    fn builder_setters_replace_single_fields() {
        let p = Parameters::default().stick_length(1.5).ball_mass(0.2);
        assert_eq!(p.stick_length, 1.5);
        assert_eq!(p.ball_mass, 0.2);
        assert_eq!(p.wheel_mass, 2.0);
    }
}
