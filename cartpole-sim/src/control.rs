use cartpole_core::{Parameters, State};

/// The parameter view handed to a control law each tick.
///
/// This is [`Parameters`] minus `force`: the control law produces the force,
/// so it never observes a stale one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemParameters {
    /// Pendulum stick length (m).
    pub stick_length: f64,
    /// Mass of the ball at the end of the stick (kg).
    pub ball_mass: f64,
    /// Mass of the drive wheel (kg).
    pub wheel_mass: f64,
    /// Radius of the drive wheel (m).
    pub wheel_radius: f64,
    /// Viscous friction coefficient.
    pub viscous_friction: f64,
}

impl From<&Parameters> for SystemParameters {
    fn from(params: &Parameters) -> Self {
        Self {
            stick_length: params.stick_length,
            ball_mass: params.ball_mass,
            wheel_mass: params.wheel_mass,
            wheel_radius: params.wheel_radius,
            viscous_friction: params.viscous_friction,
        }
    }
}

/// A control law maps the observed state to a force on the cart.
///
/// The simulation loop invokes the law exactly once per tick, on the tick
/// thread, before integrating. Implementations must not block; a slow law
/// delays the tick rather than being preempted.
///
/// The loop does not catch panics. A panicking law takes the tick thread
/// down with it and poisons the simulation's shared state, so subsequent
/// calls into [`Simulation`](crate::Simulation) will panic as well.
pub trait ControlLaw: Send {
    /// Returns the force (N) to apply to the cart for this tick.
    fn force(&self, state: &State, params: &SystemParameters) -> f64;
}

/// Any plain closure over state and parameters is a control law.
impl<F> ControlLaw for F
where
    F: Fn(&State, &SystemParameters) -> f64 + Send,
{
    fn force(&self, state: &State, params: &SystemParameters) -> f64 {
        self(state, params)
    }
}
