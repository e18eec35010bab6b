//! Caller-side retry loop: run, back off, sleep, repeat.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::TimeDelta;
use stagger_core::{Backoff, NormalSource};
use tokio::time::sleep;
use tracing::{info, warn};

#[async_trait]
pub trait Operation: Send + Sync {
    async fn call(&self) -> Result<(), String>;
}

/// Fails a fixed number of times, then succeeds.
pub struct FlakyOperation {
    remaining_failures: AtomicU32,
}

impl FlakyOperation {
    pub fn new(failures: u32) -> Self {
        Self {
            remaining_failures: AtomicU32::new(failures),
        }
    }
}

#[async_trait]
impl Operation for FlakyOperation {
    async fn call(&self) -> Result<(), String> {
        let left = self.remaining_failures.load(Ordering::Relaxed);
        if left > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(format!("intentional failure (left={left})"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub calls: u32,
    pub delays: Vec<TimeDelta>,
}

/// Converts a backoff delay into a sleep. Negative delays sleep zero.
pub fn sleep_for(delay: TimeDelta, scale: f64) -> Duration {
    let secs = delay.to_std().unwrap_or(Duration::ZERO).as_secs_f64() * scale;
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}

pub async fn run_with_backoff<O, N>(
    op: &O,
    backoff: &mut Backoff<N>,
    scale: f64,
) -> Result<RunReport>
where
    O: Operation + ?Sized,
    N: NormalSource,
{
    let mut report = RunReport {
        calls: 0,
        delays: Vec::new(),
    };

    loop {
        report.calls += 1;
        let err = match op.call().await {
            Ok(()) => {
                info!(calls = report.calls, "operation succeeded");
                return Ok(report);
            }
            Err(e) => e,
        };

        let delay = backoff.next_delay().map_err(|e| {
            warn!(calls = report.calls, error = %err, "giving up");
            anyhow::Error::new(e).context(format!(
                "operation failed after {} calls: {err}",
                report.calls
            ))
        })?;

        let nap = sleep_for(delay, scale);
        info!(
            attempt = backoff.attempts(),
            delay_ms = delay.num_milliseconds(),
            sleep_ms = nap.as_millis() as u64,
            error = %err,
            "operation failed, retrying"
        );
        report.delays.push(delay);
        sleep(nap).await;
    }
}
