// src/bin/simulate.rs
//
// Dataset generation harness: rolls the booking environment through N
// one-step episodes under an exploration policy and writes the transitions
// to a fresh observation store (truncating any prior content).

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use fareflow::{
    Config, ObservationLog, Policy, PricingEnv, RandomPolicy, SimulationDriver, ThresholdPolicy,
};

#[derive(Parser, Debug)]
#[command(name = "simulate")]
struct Cli {
    /// Number of episodes (one transition each) to generate.
    #[arg(long, default_value_t = 500)]
    episodes: u64,

    /// Output store path. Defaults to the configured store path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Seed for the environment chain and the random policy.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Exploration policy: "random" (default) or "heuristic".
    #[arg(long, default_value = "random")]
    policy: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = Config::from_env();

    let out = cli.out.unwrap_or_else(|| cfg.store.path.clone());

    let env = PricingEnv::with_seed(cfg.env.clone(), cli.seed);
    let policy: Box<dyn Policy> = match cli.policy.to_lowercase().as_str() {
        "random" => Box::new(RandomPolicy::new(cli.seed)),
        "heuristic" => Box::new(ThresholdPolicy::new()),
        other => anyhow::bail!("unknown policy: {other}"),
    };

    let log = ObservationLog::create(&out)
        .with_context(|| format!("creating observation store {}", out.display()))?;

    let mut driver = SimulationDriver::new(env, policy, log);
    let summary = driver.run(cli.episodes).context("generating dataset")?;

    println!(
        "wrote {} transitions to {} | booked={} | mean_reward={:.2}",
        summary.episodes,
        out.display(),
        summary.booked,
        summary.mean_reward()
    );

    Ok(())
}
