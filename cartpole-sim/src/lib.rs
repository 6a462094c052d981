//! Real-time orchestration for the cartpole inverted pendulum.
//!
//! This crate drives the pure numerics of `cartpole-core` at a fixed
//! real-time cadence:
//!
//! - [`ControlLaw`] — the caller-supplied mapping from observed state to
//!   the force applied to the cart, invoked once per tick.
//! - [`TickRate`] — the strictly positive tick frequency, which supplies
//!   both the wall-clock period and the fixed integration step.
//! - [`Simulation`] — the tick loop itself, with `start`/`stop`/`toggle`/
//!   `reset` lifecycle, an angle disturbance override, throttled state
//!   publication, and a divergence guard.

mod control;
mod simulation;
mod tick_rate;

pub use control::{ControlLaw, SystemParameters};
pub use simulation::{Simulation, SimulationConfig};
pub use tick_rate::{TickRate, TickRateError};
