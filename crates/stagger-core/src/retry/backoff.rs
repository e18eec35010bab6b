//! Backoff: computes successive retry delays.

use std::iter::FusedIterator;

use chrono::TimeDelta;

use crate::domain::{BackoffConfig, BackoffError, BackoffState};
use crate::ports::{NormalSource, ThreadNormal};

/// Exponential backoff with additive Gaussian jitter and an attempt ceiling.
///
/// The caller owns the retry loop: on each failure it calls
/// [`next_delay`](Self::next_delay), sleeps for the returned delay and tries
/// again, or gives up once [`BackoffError::Exhausted`] is returned.
///
/// For attempt `n` (the number of delays already produced):
///
/// ```text
/// clamped = min(factor^n * min_delay, max_delay)
/// delay   = clamped + sample * jitter_fraction * clamped
/// ```
///
/// Jitter is applied after the clamp and is not bounded, so a delay may
/// exceed `max_delay` or even be negative. This is why the delay is a signed
/// [`TimeDelta`] rather than a `std::time::Duration`.
///
/// `max_attempts + 1` delays are produced (attempts `0..=max_attempts`)
/// before the backoff is exhausted. There is no reset.
///
/// A `Backoff` has a single owner; `next_delay` takes `&mut self` and no
/// internal locking is done.
#[derive(Debug, Clone)]
pub struct Backoff<N = ThreadNormal> {
    config: BackoffConfig,
    min_delay_nanos: f64,
    max_delay_nanos: f64,
    state: BackoffState,
    source: N,
}

impl Backoff<ThreadNormal> {
    /// Creates a backoff drawing jitter from the thread-local RNG.
    ///
    /// Unset (zero) fields of `config` are replaced by their defaults.
    pub fn new(config: BackoffConfig) -> Self {
        Self::with_source(config, ThreadNormal)
    }
}

impl Default for Backoff<ThreadNormal> {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}

impl<N: NormalSource> Backoff<N> {
    /// Creates a backoff drawing jitter samples from `source`.
    pub fn with_source(config: BackoffConfig, source: N) -> Self {
        let config = config.resolved();
        Self {
            min_delay_nanos: config.min_delay.as_nanos() as f64,
            max_delay_nanos: config.max_delay.as_nanos() as f64,
            config,
            state: BackoffState::initial(),
            source,
        }
    }

    /// Returns the next delay and advances the attempt counter.
    ///
    /// # Errors
    /// [`BackoffError::Exhausted`] once `max_attempts + 1` delays have been
    /// produced. Every later call fails the same way.
    pub fn next_delay(&mut self) -> Result<TimeDelta, BackoffError> {
        let BackoffState::Active { attempts } = self.state else {
            return Err(BackoffError::Exhausted {
                max_attempts: self.config.max_attempts,
            });
        };

        let magnitude = self.magnitude_nanos(attempts);
        let jittered = magnitude + self.source.sample() * self.config.jitter_fraction * magnitude;

        self.state = self.state.advance(self.config.max_attempts);

        // `as` truncates toward zero and saturates at the i64 range
        Ok(TimeDelta::nanoseconds(jittered as i64))
    }

    /// Clamped, unjittered delay for `attempts` in nanoseconds.
    fn magnitude_nanos(&self, attempts: u32) -> f64 {
        let raw = self.config.factor.powf(attempts as f64) * self.min_delay_nanos;
        if raw > self.max_delay_nanos {
            self.max_delay_nanos
        } else {
            raw
        }
    }

    pub fn state(&self) -> BackoffState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    /// Number of delays produced so far.
    pub fn attempts(&self) -> u32 {
        match self.state {
            BackoffState::Active { attempts } => attempts,
            BackoffState::Exhausted => self.config.max_attempts.saturating_add(1),
        }
    }

    /// Effective configuration, defaults included.
    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }
}

/// Yields delays until the backoff is exhausted.
impl<N: NormalSource> Iterator for Backoff<N> {
    type Item = TimeDelta;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_delay().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.state {
            BackoffState::Active { attempts } => {
                (self.config.max_attempts - attempts) as usize + 1
            }
            BackoffState::Exhausted => 0,
        };
        (remaining, Some(remaining))
    }
}

impl<N: NormalSource> FusedIterator for Backoff<N> {}
