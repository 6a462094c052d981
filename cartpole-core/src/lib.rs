//! Core numerics for a wheel-driven inverted pendulum.
//!
//! This crate provides the three pure pieces of the simulation:
//!
//! - [`State`] — the ℝ⁴ state vector of the cart and pendulum.
//! - [`pendulum`] and [`Parameters`] — the continuous-time equations of
//!   motion mapping state and applied force to a state derivative.
//! - [`rkf45`] — a generic single-step Runge–Kutta–Fehlberg(4,5) stage
//!   computation used in fixed-step mode.
//!
//! Everything here is deterministic and side-effect free; real-time
//! orchestration lives in `cartpole-sim`.

mod dynamics;
mod rkf45;
mod state;

pub use dynamics::{pendulum, Parameters, GRAVITY};
pub use rkf45::rkf45;
pub use state::State;
