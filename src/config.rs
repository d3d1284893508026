// src/config.rs
//
// Central configuration for the fareflow service.
// This is the single source of truth for the booking model constants
// (base price, demand elasticity, drift), the policy backend selection,
// the observation store location, and the serving surface address.
//
// The numeric literals of the reward model are deliberately configuration
// defaults rather than hard invariants, so alternative pricing domains can
// reuse the same environment shape.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Human-readable config / release version.
    pub version: &'static str,
    /// Booking environment constants.
    pub env: EnvConfig,
    /// Decision backend selection.
    pub policy: PolicyConfig,
    /// Observation store location.
    pub store: StoreConfig,
    /// Serving surface config.
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Reference price in USD; `price_norm = 0` maps to this.
    pub base_price: f64,
    /// Price sensitivity k in `exp(-k * (price_after - base_price))`.
    pub demand_elasticity: f64,
    /// Std-dev of the per-step random walk on price_norm and demand.
    pub drift_sigma: f64,
    /// Uniform range price_norm is drawn from on reset.
    pub price_norm_range: (f64, f64),
    /// Uniform range demand_estimate is drawn from on reset.
    pub demand_range: (f64, f64),
    /// Reset draws days_until_departure uniformly from [0, max_days_out).
    pub max_days_out: u32,
    /// Multiplicative price adjustment per action ordinal 0..4.
    pub action_multipliers: [f64; 5],
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            base_price: 1000.0,
            demand_elasticity: 0.001,
            drift_sigma: 0.02,
            price_norm_range: (0.3, 0.9),
            demand_range: (0.1, 0.9),
            max_days_out: 60,
            action_multipliers: [-0.10, -0.05, 0.0, 0.05, 0.10],
        }
    }
}

/// Which decision backend answers `/action`.
///
/// Callers never see the difference; selection is purely configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyBackend {
    /// Threshold heuristic on price_norm.
    Heuristic,
    /// Q-table artifact produced by the out-of-process trainer.
    Learned,
}

#[derive(Debug, Clone)]
pub struct PolicyConfig {
    pub backend: PolicyBackend,
    /// Path to the trained artifact; required for `Learned`.
    pub model_path: Option<PathBuf>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            backend: PolicyBackend::Heuristic,
            model_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Resolved observation store path. Always injected explicitly into the
    /// recorder/driver; never re-resolved from the working directory at
    /// call time.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("observations.jsonl"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "fareflow-0.1.0",
            env: EnvConfig::default(),
            policy: PolicyConfig::default(),
            store: StoreConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Build defaults, then apply environment-variable overrides.
    ///
    /// Environment variables (research knobs):
    /// - FAREFLOW_BASE_PRICE: reference price in USD
    /// - FAREFLOW_DEMAND_ELASTICITY: price sensitivity k
    /// - FAREFLOW_DRIFT_SIGMA: state random-walk std-dev
    /// - FAREFLOW_STORE_PATH: observation store path
    /// - FAREFLOW_POLICY: "heuristic" or "learned"
    /// - FAREFLOW_MODEL_PATH: trained artifact path (learned backend)
    /// - FAREFLOW_LISTEN_ADDR: serving address
    pub fn from_env() -> Self {
        use std::env;

        let mut cfg = Self::default();

        if let Ok(raw) = env::var("FAREFLOW_BASE_PRICE") {
            if let Ok(v) = raw.parse::<f64>() {
                cfg.env.base_price = v;
            }
        }

        if let Ok(raw) = env::var("FAREFLOW_DEMAND_ELASTICITY") {
            if let Ok(v) = raw.parse::<f64>() {
                cfg.env.demand_elasticity = v;
            }
        }

        if let Ok(raw) = env::var("FAREFLOW_DRIFT_SIGMA") {
            if let Ok(v) = raw.parse::<f64>() {
                cfg.env.drift_sigma = v.max(0.0);
            }
        }

        if let Ok(raw) = env::var("FAREFLOW_STORE_PATH") {
            if !raw.trim().is_empty() {
                cfg.store.path = PathBuf::from(raw);
            }
        }

        if let Ok(raw) = env::var("FAREFLOW_POLICY") {
            match raw.to_lowercase().as_str() {
                "learned" => cfg.policy.backend = PolicyBackend::Learned,
                "heuristic" => cfg.policy.backend = PolicyBackend::Heuristic,
                _ => {}
            }
        }

        if let Ok(raw) = env::var("FAREFLOW_MODEL_PATH") {
            if !raw.trim().is_empty() {
                cfg.policy.model_path = Some(PathBuf::from(raw));
            }
        }

        if let Ok(raw) = env::var("FAREFLOW_LISTEN_ADDR") {
            if !raw.trim().is_empty() {
                cfg.server.listen_addr = raw;
            }
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reward_model() {
        let cfg = Config::default();
        assert_eq!(cfg.env.base_price, 1000.0);
        assert_eq!(cfg.env.demand_elasticity, 0.001);
        assert_eq!(cfg.env.drift_sigma, 0.02);
        assert_eq!(cfg.env.price_norm_range, (0.3, 0.9));
        assert_eq!(cfg.env.demand_range, (0.1, 0.9));
        assert_eq!(cfg.env.max_days_out, 60);
        assert_eq!(
            cfg.env.action_multipliers,
            [-0.10, -0.05, 0.0, 0.05, 0.10]
        );
        assert_eq!(cfg.policy.backend, PolicyBackend::Heuristic);
    }
}
