//! Shared fixtures for cross-crate tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use cartpole_core::State;
use cartpole_sim::{ControlLaw, SystemParameters};

/// A control law that applies a constant force.
pub struct ConstantForce(pub f64);

impl ControlLaw for ConstantForce {
    fn force(&self, _state: &State, _params: &SystemParameters) -> f64 {
        self.0
    }
}

/// A control law that applies no force but counts its invocations, which
/// counts ticks since the loop calls the law exactly once per tick.
pub struct CountingLaw {
    ticks: Arc<AtomicU32>,
}

impl CountingLaw {
    #[must_use]
    pub fn new() -> (Self, Arc<AtomicU32>) {
        let ticks = Arc::new(AtomicU32::new(0));
        (
            Self {
                ticks: Arc::clone(&ticks),
            },
            ticks,
        )
    }
}

impl ControlLaw for CountingLaw {
    fn force(&self, _state: &State, _params: &SystemParameters) -> f64 {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        0.0
    }
}
