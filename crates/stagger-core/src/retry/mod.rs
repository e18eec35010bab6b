//! Retry timing.

pub mod backoff;

pub use self::backoff::Backoff;
