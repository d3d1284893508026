// src/env.rs
//
// Booking simulator: a Gym-style environment for one-shot pricing decisions.
//
// - reset(seed) draws a fresh market state
// - step(action) applies a price adjustment, samples a booking, and
//   returns (next_state, reward, done, info)
//
// Episodes are structurally one step: `done` is true after every step, so
// a recorded transition is a contextual-bandit sample with an immediate
// terminal reward. All transitions are deterministic given a seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::EnvConfig;
use crate::error::PricingError;
use crate::types::{Action, State};

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// The state after the step (the next decision context).
    pub state: State,
    /// Revenue if the booking happened, else 0.
    pub reward: f64,
    /// Always true: one decision per episode.
    pub done: bool,
    /// Additional information about the step.
    pub info: StepInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Whether the (simulated) customer booked at the adjusted price.
    pub booked: bool,
    /// The absolute price after applying the action's multiplier.
    pub price_after: f64,
}

/// Stateful booking-dynamics simulator.
///
/// `step` requires a prior `reset`; calling it on a fresh environment is a
/// programming fault and returns `PricingError::UninitializedState`.
pub struct PricingEnv {
    cfg: EnvConfig,
    rng: ChaCha8Rng,
    state: Option<State>,
    seed: u64,
}

impl PricingEnv {
    /// Create a new environment with a fixed default seed chain.
    pub fn new(cfg: EnvConfig) -> Self {
        Self::with_seed(cfg, 0)
    }

    /// Create a new environment whose unseeded resets derive from `seed`.
    pub fn with_seed(cfg: EnvConfig, seed: u64) -> Self {
        Self {
            cfg,
            rng: ChaCha8Rng::seed_from_u64(seed),
            state: None,
            seed,
        }
    }

    /// Reset the environment and return the initial state.
    ///
    /// With `Some(seed)` the episode is fully deterministic; with `None` the
    /// seed is drawn from the environment's own RNG chain, which is itself
    /// deterministic given the construction seed.
    pub fn reset(&mut self, seed: Option<u64>) -> State {
        let seed = seed.unwrap_or_else(|| self.rng.gen());
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);

        let (p_lo, p_hi) = self.cfg.price_norm_range;
        let (d_lo, d_hi) = self.cfg.demand_range;

        let price_norm = self.rng.gen_range(p_lo..p_hi);
        let demand_estimate = self.rng.gen_range(d_lo..d_hi);
        let days_until_departure = self.rng.gen_range(0..self.cfg.max_days_out) as f64;

        let state = State {
            price_norm,
            demand_estimate,
            days_until_departure,
        };
        self.state = Some(state);
        state
    }

    /// Apply a price adjustment and sample the booking outcome.
    pub fn step(&mut self, action: Action) -> Result<StepOutcome, PricingError> {
        let s = self.state.ok_or(PricingError::UninitializedState)?;

        let multiplier = self.cfg.action_multipliers[action.index()];

        let price = self.cfg.base_price * (1.0 + s.price_norm);
        let price_after = price * (1.0 + multiplier);

        // Booking probability decreases with price, increases with demand.
        let price_factor =
            (-self.cfg.demand_elasticity * (price_after - self.cfg.base_price)).exp();
        let booking_prob = (s.demand_estimate * price_factor).clamp(0.0, 1.0);

        let booked = self.rng.gen::<f64>() < booking_prob;
        let reward = if booked { price_after } else { 0.0 };

        // Next state: small random walk for price_norm and demand,
        // deterministic countdown for days.
        let dp = gaussian(&mut self.rng, self.cfg.drift_sigma);
        let dd = gaussian(&mut self.rng, self.cfg.drift_sigma);
        let next = State {
            price_norm: (s.price_norm + dp).clamp(0.0, 1.0),
            demand_estimate: (s.demand_estimate + dd).clamp(0.0, 1.0),
            days_until_departure: (s.days_until_departure - 1.0).max(0.0),
        };
        self.state = Some(next);

        Ok(StepOutcome {
            state: next,
            reward,
            done: true,
            info: StepInfo {
                booked,
                price_after,
            },
        })
    }

    /// Current state, if a reset has happened.
    pub fn state(&self) -> Option<State> {
        self.state
    }

    /// Seed of the current episode.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &EnvConfig {
        &self.cfg
    }
}

/// Zero-mean gaussian sample via Box-Muller on the seeded RNG.
fn gaussian(rng: &mut ChaCha8Rng, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos() * std_dev
}
