//! Reconnect delay policy.

use std::time::Duration;

use rand::Rng;

/// Exponential backoff with randomized jitter.
#[derive(Debug)]
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
    factor: f64,
    current: Duration,
}

impl ExponentialBackoff {
    /// Creates a new `ExponentialBackoff` with the given parameters.
    #[must_use]
    pub const fn new(initial: Duration, max: Duration, factor: f64) -> Self {
        Self {
            initial,
            max,
            factor,
            current: initial,
        }
    }

    /// Compute the next delay (with jitter) and advance the internal state.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn next_delay(&mut self) -> Duration {
        let current_ms = self.current.as_millis().min(u128::from(u64::MAX)) as u64;

        let jitter = rand::thread_rng().gen_range(0.75..=1.25);
        let delay = Duration::from_millis((current_ms as f64 * jitter) as u64);

        let next_ms = (current_ms as f64 * self.factor) as u64;
        self.current = Duration::from_millis(next_ms).min(self.max);

        delay
    }

    /// Back to the initial delay after a successful registration.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}
