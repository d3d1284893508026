// src/main.rs
//
// Thin serving harness around the fareflow library.
// All of the real logic lives in the lib crate (env, policy, recorder).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use fareflow::{
    build_policy, Config, DecisionService, ObservationLog, PolicyBackend, ServiceMetrics,
};

/// Command-line arguments for the fareflow service binary.
#[derive(Parser, Debug)]
#[command(name = "fareflow")]
struct Cli {
    /// Listen address for the serving surface.
    #[arg(long)]
    listen: Option<String>,

    /// Observation store path (opened in append mode).
    #[arg(long)]
    store: Option<PathBuf>,

    /// Decision backend: "heuristic" or "learned".
    #[arg(long)]
    policy: Option<String>,

    /// Trained q-table artifact (required with --policy learned).
    #[arg(long)]
    model: Option<PathBuf>,
}

/// Build Config from defaults + env overrides, then apply CLI flags.
///
/// This keeps src/config.rs as the single source of truth, while letting
/// research harnesses sweep parameters via environment variables.
fn build_config_from_env_and_args(cli: &Cli) -> anyhow::Result<Config> {
    let mut cfg = Config::from_env();

    if let Some(addr) = &cli.listen {
        cfg.server.listen_addr = addr.clone();
    }
    if let Some(store) = &cli.store {
        cfg.store.path = store.clone();
    }
    if let Some(policy) = &cli.policy {
        cfg.policy.backend = match policy.to_lowercase().as_str() {
            "heuristic" => PolicyBackend::Heuristic,
            "learned" => PolicyBackend::Learned,
            other => anyhow::bail!("unknown policy backend: {other}"),
        };
    }
    if let Some(model) = &cli.model {
        cfg.policy.model_path = Some(model.clone());
    }

    Ok(cfg)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = build_config_from_env_and_args(&cli)?;

    let policy = build_policy(&cfg.policy).context("building decision backend")?;
    let log = ObservationLog::append(&cfg.store.path)
        .with_context(|| format!("opening observation store {}", cfg.store.path.display()))?;
    let metrics = ServiceMetrics::new();

    let service = DecisionService::new(policy, Arc::new(log), metrics);

    eprintln!(
        "fareflow | cfg={} | backend={:?} | store={}",
        cfg.version,
        cfg.policy.backend,
        cfg.store.path.display()
    );

    fareflow::run_server(service, &cfg.server.listen_addr)
        .with_context(|| format!("serving on {}", cfg.server.listen_addr))?;

    Ok(())
}
