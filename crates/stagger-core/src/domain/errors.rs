//! Errors - エラー型
//!
//! Backoff が返すエラーは `Exhausted` の 1 種類のみ。
//! リトライ・ログ出力は行わず、そのまま呼び出し元に返す。

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BackoffError {
    /// The attempt ceiling has been passed; no further delays are produced.
    #[error("max attempts reached (max_attempts={max_attempts})")]
    Exhausted { max_attempts: u32 },
}
