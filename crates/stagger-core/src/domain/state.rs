//! State - Backoff の状態
//!
//! # 状態遷移
//! - Active { attempts }: attempts <= max_attempts、次の delay を計算できる
//! - Exhausted: attempts > max_attempts、以後は常にエラー
//!
//! Active -> Exhausted の一方向のみ（リセットなし）。

/// BackoffState は Backoff の状態を表現
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffState {
    /// `attempts` delays have been produced so far.
    Active { attempts: u32 },
    Exhausted,
}

impl BackoffState {
    pub fn initial() -> Self {
        Self::Active { attempts: 0 }
    }

    /// State after one more delay has been produced.
    ///
    /// Exhaustion happens strictly after `max_attempts` is exceeded, so an
    /// `Active` sequence spans attempts `0..=max_attempts`.
    pub fn advance(self, max_attempts: u32) -> Self {
        match self {
            Self::Active { attempts } if attempts < max_attempts => Self::Active {
                attempts: attempts + 1,
            },
            _ => Self::Exhausted,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}
