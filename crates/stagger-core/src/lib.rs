//! stagger-core
//!
//! Exponential backoff with Gaussian jitter for retry loops.
//!
//! # モジュール構成
//! - **domain**: BackoffConfig, BackoffState, BackoffError
//! - **ports**: 乱数源の抽象化（NormalSource）
//! - **retry**: Backoff 本体
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use stagger_core::{Backoff, BackoffConfig, FixedNormal};
//!
//! let config = BackoffConfig::new()
//!     .with_max_attempts(2)
//!     .with_max_delay(Duration::from_secs(3));
//! let mut backoff = Backoff::with_source(config, FixedNormal::zero());
//!
//! let delays: Vec<_> = backoff.by_ref().map(|d| d.num_seconds()).collect();
//! assert_eq!(delays, vec![1, 2, 3]);
//! assert!(backoff.next_delay().is_err());
//! ```

pub mod domain;
pub mod ports;
pub mod retry;

pub use domain::{BackoffConfig, BackoffError, BackoffState};
pub use ports::{FixedNormal, NormalSource, SeededNormal, ThreadNormal};
pub use retry::Backoff;
