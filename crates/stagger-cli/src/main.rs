mod args;
mod config;
mod retry_loop;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::args::{Cli, Commands, DemoArgs, ScheduleArgs};
use crate::config::build_backoff;
use crate::retry_loop::{FlakyOperation, run_with_backoff};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "stagger=info".to_string()))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Commands::Schedule(args) => schedule(&args),
        Commands::Demo(args) => demo(&args).await,
    }
}

fn schedule(args: &ScheduleArgs) -> Result<()> {
    let backoff = build_backoff(&args.backoff)?;

    if args.json {
        let millis: Vec<i64> = backoff.map(|d| d.num_milliseconds()).collect();
        println!("{}", serde_json::to_string(&millis)?);
        return Ok(());
    }

    for (attempt, delay) in backoff.enumerate() {
        println!("attempt={attempt} delay_ms={}", delay.num_milliseconds());
    }
    Ok(())
}

async fn demo(args: &DemoArgs) -> Result<()> {
    let mut backoff = build_backoff(&args.backoff)?;
    let op = FlakyOperation::new(args.failures);

    info!(failures = args.failures, scale = args.scale, "starting demo");
    let report = run_with_backoff(&op, &mut backoff, args.scale).await?;

    println!(
        "succeeded: calls={} delays_ms={:?}",
        report.calls,
        report
            .delays
            .iter()
            .map(|d| d.num_milliseconds())
            .collect::<Vec<_>>()
    );
    Ok(())
}
