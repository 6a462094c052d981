use std::time::Duration;

use thiserror::Error;

/// A strictly positive tick frequency for the real-time loop.
///
/// One `TickRate` supplies both timings the loop needs: the wall-clock
/// [`period`](TickRate::period) slept between ticks and the fixed
/// integration [`step_size`](TickRate::step_size) `h = 1/rate`. The two are
/// expected to agree, and the loop never reconciles the step against
/// measured elapsed time if the cadence drifts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TickRate(f64);

/// Error returned when constructing an invalid [`TickRate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TickRateError {
    #[error("tick rate must be a positive, finite frequency in Hz, got {0}")]
    NotPositive(f64),
}

impl TickRate {
    /// Constructs a `TickRate` from a frequency in Hz.
    ///
    /// # Errors
    ///
    /// Returns [`TickRateError::NotPositive`] if `hz` is zero, negative,
    /// NaN, or infinite.
    pub fn new(hz: f64) -> Result<Self, TickRateError> {
        if hz.is_finite() && hz > 0.0 {
            Ok(Self(hz))
        } else {
            Err(TickRateError::NotPositive(hz))
        }
    }

    /// Returns the frequency in Hz.
    #[must_use]
    pub fn hz(self) -> f64 {
        self.0
    }

    /// Returns the wall-clock duration of one tick.
    #[must_use]
    pub fn period(self) -> Duration {
        Duration::from_secs_f64(1.0 / self.0)
    }

    /// Returns the fixed integration step size in seconds.
    #[must_use]
    pub fn step_size(self) -> f64 {
        1.0 / self.0
    }
}

/// The default cadence is 60 ticks per second.
impl Default for TickRate {
    fn default() -> Self {
        Self(60.0)
    }
}
