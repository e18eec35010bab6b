//! Backoff configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_JITTER_FRACTION: f64 = 0.1;
pub const DEFAULT_FACTOR: f64 = 2.0;

/// Configuration for a [`Backoff`](crate::retry::Backoff).
///
/// Every field is optional: a zero value means "unset" and is replaced by
/// the matching `DEFAULT_*` constant when the backoff is constructed.
/// `BackoffConfig::default()` is therefore the all-defaults configuration.
///
/// Values are not validated. A negative `factor` or `jitter_fraction` is
/// passed straight into the delay arithmetic.
///
/// # JSON form
/// ```json
/// { "max_attempts": 3, "min_delay_ns": 1000000000, "max_delay_ns": 10000000000,
///   "jitter_fraction": 0.1, "factor": 2.0 }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Ceiling on the number of attempts; `max_attempts + 1` delays are produced.
    pub max_attempts: u32,

    /// Base delay, returned (before jitter) by the first call.
    #[serde(rename = "min_delay_ns", with = "nanos")]
    pub min_delay: Duration,

    /// Clamp applied to the exponential magnitude before jitter.
    #[serde(rename = "max_delay_ns", with = "nanos")]
    pub max_delay: Duration,

    /// Standard deviation of the jitter, relative to the clamped delay.
    pub jitter_fraction: f64,

    /// Exponential growth multiplier per attempt.
    pub factor: f64,
}

impl BackoffConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_jitter_fraction(mut self, jitter_fraction: f64) -> Self {
        self.jitter_fraction = jitter_fraction;
        self
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Returns a copy with every unset (zero) field replaced by its default.
    pub fn resolved(self) -> Self {
        Self {
            max_attempts: if self.max_attempts == 0 {
                DEFAULT_MAX_ATTEMPTS
            } else {
                self.max_attempts
            },
            min_delay: if self.min_delay.is_zero() {
                DEFAULT_MIN_DELAY
            } else {
                self.min_delay
            },
            max_delay: if self.max_delay.is_zero() {
                DEFAULT_MAX_DELAY
            } else {
                self.max_delay
            },
            jitter_fraction: if self.jitter_fraction == 0.0 {
                DEFAULT_JITTER_FRACTION
            } else {
                self.jitter_fraction
            },
            factor: if self.factor == 0.0 {
                DEFAULT_FACTOR
            } else {
                self.factor
            },
        }
    }
}

/// Serde helper: `Duration` <-> integer nanoseconds.
///
/// Lossless in both directions; values beyond `Duration::MAX` are rejected.
mod nanos {
    use std::time::Duration;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const NANOS_PER_SEC: u128 = 1_000_000_000;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u128(d.as_nanos())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let nanos = u128::deserialize(d)?;
        let secs = u64::try_from(nanos / NANOS_PER_SEC)
            .map_err(|_| D::Error::custom(format!("duration out of range: {nanos}ns")))?;
        Ok(Duration::new(secs, (nanos % NANOS_PER_SEC) as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let cfg = BackoffConfig::default().resolved();
        assert_eq!(cfg.max_attempts, 10);
        assert_eq!(cfg.min_delay, Duration::from_secs(1));
        assert_eq!(cfg.max_delay, Duration::from_secs(300));
        assert_eq!(cfg.jitter_fraction, 0.1);
        assert_eq!(cfg.factor, 2.0);
    }

    #[test]
    fn explicit_values_survive_resolution() {
        let cfg = BackoffConfig::new()
            .with_max_attempts(3)
            .with_min_delay(Duration::from_millis(250))
            .with_max_delay(Duration::from_secs(10))
            .with_jitter_fraction(0.5)
            .with_factor(3.0)
            .resolved();

        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.min_delay, Duration::from_millis(250));
        assert_eq!(cfg.max_delay, Duration::from_secs(10));
        assert_eq!(cfg.jitter_fraction, 0.5);
        assert_eq!(cfg.factor, 3.0);
    }

    // zero is the "unset" marker, so an explicit 0 still picks up the default
    #[rstest]
    #[case::zero(0.0, DEFAULT_JITTER_FRACTION)]
    #[case::negative_zero(-0.0, DEFAULT_JITTER_FRACTION)]
    #[case::negative(-0.2, -0.2)]
    fn jitter_fraction_resolution(#[case] fraction: f64, #[case] expected: f64) {
        let cfg = BackoffConfig::new().with_jitter_fraction(fraction);
        assert_eq!(cfg.resolved().jitter_fraction, expected);
    }

    #[test]
    fn invalid_values_are_passed_through() {
        let cfg = BackoffConfig::new().with_factor(-1.5).resolved();
        assert_eq!(cfg.factor, -1.5);
    }

    #[test]
    fn deserializes_partial_json_with_nanos() {
        let cfg: BackoffConfig =
            serde_json::from_str(r#"{ "max_attempts": 3, "min_delay_ns": 1500000000 }"#).unwrap();
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.min_delay, Duration::from_millis(1500));
        assert!(cfg.max_delay.is_zero());
        assert_eq!(cfg.factor, 0.0);
    }

    #[test]
    fn serializes_durations_as_nanos() {
        let cfg = BackoffConfig::new().with_max_delay(Duration::from_secs(5));
        let value = serde_json::to_value(cfg).unwrap();
        assert_eq!(value["max_delay_ns"], 5_000_000_000u64);
        assert_eq!(value["min_delay_ns"], 0);
    }

    // sub-millisecond の値が 0（= unset）に潰れないこと
    #[rstest]
    #[case::sub_millisecond(Duration::from_micros(500), Duration::from_secs(1))]
    #[case::one_nanosecond(Duration::from_nanos(1), Duration::from_nanos(7))]
    #[case::huge(Duration::from_secs(1), Duration::from_secs(u64::MAX))]
    #[case::max(Duration::from_secs(1), Duration::MAX)]
    fn json_round_trip_is_lossless(#[case] min_delay: Duration, #[case] max_delay: Duration) {
        let cfg = BackoffConfig::new()
            .with_min_delay(min_delay)
            .with_max_delay(max_delay);

        let json = serde_json::to_string(&cfg).unwrap();
        let back: BackoffConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back, cfg);
        assert_eq!(back.resolved().min_delay, min_delay);
        assert_eq!(back.resolved().max_delay, max_delay);
    }

    #[test]
    fn rejects_durations_beyond_range() {
        // (u64::MAX + 1) seconds in nanoseconds
        let json = r#"{ "max_delay_ns": 18446744073709551616000000000 }"#;
        let err = serde_json::from_str::<BackoffConfig>(json).unwrap_err();
        assert!(err.to_string().contains("duration out of range"), "{err}");
    }
}
