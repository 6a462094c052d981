use std::ops::{Add, Mul};

/// Advances `y` by one step of size `h` using the Runge–Kutta–Fehlberg(4,5)
/// stage computation.
///
/// All six classical RKF45 stages are evaluated and combined with the
/// 5th-order weights. The embedded 4th-order estimate is deliberately not
/// computed: this integrator is used at a fixed step chosen by the caller,
/// so there is no error estimation and no adaptive step-size control. The
/// name is retained from the classical method; only its fixed-step half is
/// implemented, and the surrounding real-time loop depends on the step
/// staying fixed.
///
/// `f(t, y, args)` evaluates the state derivative; `args` carries whatever
/// extra context the derivative needs (physical parameters, gains, nothing).
/// The state type only needs componentwise addition and scalar scaling, so
/// the same function integrates the four-component pendulum state, a bare
/// `f64`, or any other vector type with those ops.
///
/// Pure and deterministic: identical inputs produce identical results.
pub fn rkf45<Y, A, F>(f: F, t: f64, y: Y, h: f64, args: &A) -> Y
where
    Y: Add<Output = Y> + Mul<f64, Output = Y> + Copy,
    F: Fn(f64, Y, &A) -> Y,
{
    let k1 = f(t, y, args) * h;
    let k2 = f(t + h / 4.0, y + k1 * (1.0 / 4.0), args) * h;
    let k3 = f(
        t + h * (3.0 / 8.0),
        y + k1 * (3.0 / 32.0) + k2 * (9.0 / 32.0),
        args,
    ) * h;
    let k4 = f(
        t + h * (12.0 / 13.0),
        y + k1 * (1932.0 / 2197.0) + k2 * (-7200.0 / 2197.0) + k3 * (7296.0 / 2197.0),
        args,
    ) * h;
    let k5 = f(
        t + h,
        y + k1 * (439.0 / 216.0) + k2 * -8.0 + k3 * (3680.0 / 513.0) + k4 * (-845.0 / 4104.0),
        args,
    ) * h;
    let k6 = f(
        t + h / 2.0,
        y + k1 * (-8.0 / 27.0)
            + k2 * 2.0
            + k3 * (-3544.0 / 2565.0)
            + k4 * (1859.0 / 4104.0)
            + k5 * (-11.0 / 40.0),
        args,
    ) * h;

    y + k1 * (16.0 / 135.0)
        + k3 * (6656.0 / 12825.0)
        + k4 * (28561.0 / 56430.0)
        + k5 * (-9.0 / 50.0)
        + k6 * (2.0 / 55.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{pendulum, Parameters, State};

    fn decay(_t: f64, y: f64, k: &f64) -> f64 {
        -k * y
    }

    #[test]
    fn one_step_of_linear_decay_matches_the_analytic_solution() {
        let k = 1.3;
        let h = 0.1;
        let y0 = 2.0;

        let y1 = rkf45(decay, 0.0, y0, h, &k);
        let exact = y0 * (-k * h).exp();

        // Local truncation error of the 5th-order combination is O(h⁶).
        assert!((y1 - exact).abs() < h.powi(6));
        assert_relative_eq!(y1, exact, epsilon = 1e-7);
    }

    #[test]
    fn polynomial_derivatives_are_integrated_exactly() {
        // dy/dt = t³ is within the method's order, so one step must match
        // the quadrature h⁴/4 to rounding error. This exercises the stage
        // time offsets as well as the combination weights.
        let y1 = rkf45(|t, _y, _: &()| t * t * t, 0.0, 0.0, 0.8, &());
        assert_relative_eq!(y1, 0.8_f64.powi(4) / 4.0, epsilon = 1e-14);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let params = Parameters::default().with_force(0.7);
        let y = State::new(0.1, -0.2, 0.3, -0.4);

        let a = rkf45(pendulum, 0.0, y, 1.0 / 60.0, &params);
        let b = rkf45(pendulum, 0.0, y, 1.0 / 60.0, &params);

        assert_eq!(a.position.to_bits(), b.position.to_bits());
        assert_eq!(a.velocity.to_bits(), b.velocity.to_bits());
        assert_eq!(a.pendulum_angle.to_bits(), b.pendulum_angle.to_bits());
        assert_eq!(
            a.pendulum_angular_velocity.to_bits(),
            b.pendulum_angular_velocity.to_bits()
        );
    }

    #[test]
    fn equilibrium_state_is_a_fixed_point() {
        // sin(0) = 0 everywhere in the stages, so the upright state with no
        // force must survive any number of steps without drift.
        let params = Parameters::default();
        let mut y = State::default();
        for _ in 0..1000 {
            y = rkf45(pendulum, 0.0, y, 1.0 / 60.0, &params);
        }
        assert_eq!(y, State::default());
    }

    #[test]
    fn small_angle_oscillation_stays_bounded_over_many_steps() {
        // A hanging pendulum displaced slightly should oscillate, not grow,
        // when integrated at the real-time step size.
        let params = Parameters::default();
        let mut y = State::new(0.0, 0.0, std::f64::consts::PI - 0.05, 0.0);
        for _ in 0..600 {
            y = rkf45(pendulum, 0.0, y, 1.0 / 60.0, &params);
            assert!(y.pendulum_angle.is_finite());
        }
        assert!((y.pendulum_angle - std::f64::consts::PI).abs() < 1.0);
    }
}
