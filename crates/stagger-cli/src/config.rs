use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use stagger_core::{Backoff, BackoffConfig, FixedNormal, NormalSource, SeededNormal, ThreadNormal};

use crate::args::BackoffArgs;

/// Jitter source picked from the command line.
#[derive(Debug, Clone)]
pub enum JitterSource {
    Thread(ThreadNormal),
    Seeded(SeededNormal),
    Off(FixedNormal),
}

impl NormalSource for JitterSource {
    fn sample(&mut self) -> f64 {
        match self {
            Self::Thread(s) => s.sample(),
            Self::Seeded(s) => s.sample(),
            Self::Off(s) => s.sample(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<BackoffConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse config file {}", path.display()))
}

pub fn build_backoff(args: &BackoffArgs) -> Result<Backoff<JitterSource>> {
    let base = match &args.config {
        Some(path) => load_config(path)?,
        None => BackoffConfig::default(),
    };
    let config = args.apply(base);

    let source = if args.no_jitter {
        JitterSource::Off(FixedNormal::zero())
    } else if let Some(seed) = args.seed {
        JitterSource::Seeded(SeededNormal::new(seed))
    } else {
        JitterSource::Thread(ThreadNormal)
    };

    let backoff = Backoff::with_source(config, source);
    tracing::debug!(config = ?backoff.config(), "backoff configured");
    Ok(backoff)
}
