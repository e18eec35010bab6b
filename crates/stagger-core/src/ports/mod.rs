//! Ports - 抽象化レイヤー
//!
//! Backoff が外部に依存する部分（乱数源）を trait として定義します。

pub mod normal_source;

pub use self::normal_source::{FixedNormal, NormalSource, SeededNormal, ThreadNormal};
