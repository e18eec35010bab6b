use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use stagger_core::BackoffConfig;

#[derive(Parser)]
#[command(author, version, about = "Exponential backoff delay calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print every delay until the backoff is exhausted")]
    Schedule(ScheduleArgs),
    #[command(about = "Run a simulated failing operation through a retry loop")]
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub backoff: BackoffArgs,
    #[arg(long, help = "Print the schedule as a JSON array")]
    pub json: bool,
}

#[derive(Args)]
pub struct DemoArgs {
    #[command(flatten)]
    pub backoff: BackoffArgs,
    #[arg(long, default_value_t = 3, help = "Number of times the operation fails")]
    pub failures: u32,
    #[arg(
        long,
        default_value_t = 0.001,
        help = "Multiplier applied to every delay before sleeping"
    )]
    pub scale: f64,
}

/// Backoff settings shared by every subcommand.
///
/// Flags override the values loaded from `--config`.
#[derive(Args, Debug, Default)]
pub struct BackoffArgs {
    #[arg(long, help = "JSON file with backoff settings")]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub max_attempts: Option<u32>,
    #[arg(long)]
    pub min_delay_ms: Option<u64>,
    #[arg(long)]
    pub max_delay_ms: Option<u64>,
    #[arg(long, allow_negative_numbers = true)]
    pub jitter_fraction: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub factor: Option<f64>,
    #[arg(long, help = "Seed the jitter source for a reproducible schedule")]
    pub seed: Option<u64>,
    #[arg(long, conflicts_with = "seed", help = "Disable jitter")]
    pub no_jitter: bool,
}

impl BackoffArgs {
    pub fn apply(&self, mut cfg: BackoffConfig) -> BackoffConfig {
        if let Some(n) = self.max_attempts {
            cfg = cfg.with_max_attempts(n);
        }
        if let Some(ms) = self.min_delay_ms {
            cfg = cfg.with_min_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = self.max_delay_ms {
            cfg = cfg.with_max_delay(Duration::from_millis(ms));
        }
        if let Some(f) = self.jitter_fraction {
            cfg = cfg.with_jitter_fraction(f);
        }
        if let Some(f) = self.factor {
            cfg = cfg.with_factor(f);
        }
        cfg
    }
}
