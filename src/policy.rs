// src/policy.rs
//
// Decision backends: map a state vector to a discrete price adjustment.
//
// - Policy trait: the contract shared by heuristic and learned backends
// - ThresholdPolicy: reference heuristic on price_norm (regression-stable)
// - RandomPolicy: uniform exploration policy for dataset generation
// - QTablePolicy: learned backend loading a trainer-produced Q-table
//
// Policies are independent of the environment and validate their own input:
// an empty or non-finite state is rejected with InvalidInput, never mapped
// to a default action.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::error::PricingError;
use crate::types::Action;

/// The outcome of one decision request.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub explanation: String,
}

/// Decision contract satisfied by every backend.
///
/// `decide` is pure per call: the same state yields the same decision for
/// deterministic backends. Which implementation is active is a configuration
/// choice callers never observe.
pub trait Policy: Send + Sync {
    /// Stable backend name for logs and telemetry.
    fn name(&self) -> &str;

    fn decide(&self, state: &[f64]) -> Result<Decision, PricingError>;
}

fn validate_state(state: &[f64]) -> Result<(), PricingError> {
    if state.is_empty() {
        return Err(PricingError::InvalidInput("empty state".to_string()));
    }
    if let Some(v) = state.iter().find(|v| !v.is_finite()) {
        return Err(PricingError::InvalidInput(format!(
            "non-finite state component: {v}"
        )));
    }
    Ok(())
}

/// Reference heuristic: ease the price when it is already high, nudge it up
/// when there is headroom.
///
/// Boundary inclusivity is part of the contract:
/// `price_norm == high` holds, `price_norm == mid` raises.
#[derive(Debug, Clone)]
pub struct ThresholdPolicy {
    /// Above this, reduce the price by 5%.
    pub high: f64,
    /// Above this (and at or below `high`), hold.
    pub mid: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            high: 0.70,
            mid: 0.55,
        }
    }
}

impl ThresholdPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for ThresholdPolicy {
    fn name(&self) -> &str {
        "heuristic-threshold"
    }

    fn decide(&self, state: &[f64]) -> Result<Decision, PricingError> {
        validate_state(state)?;
        let price_norm = state[0];

        let (action, why) = if price_norm > self.high {
            (
                Action::Down5,
                format!("price_norm {price_norm:.3} above {:.2}, easing price", self.high),
            )
        } else if price_norm > self.mid {
            (
                Action::Hold,
                format!(
                    "price_norm {price_norm:.3} in ({:.2}, {:.2}], holding",
                    self.mid, self.high
                ),
            )
        } else {
            (
                Action::Up5,
                format!(
                    "price_norm {price_norm:.3} at or below {:.2}, raising price",
                    self.mid
                ),
            )
        };

        Ok(Decision {
            action,
            explanation: format!("{why} ({})", action.label()),
        })
    }
}

/// Uniform-random policy over all actions, for exploration coverage when
/// generating training datasets.
pub struct RandomPolicy {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random-uniform"
    }

    fn decide(&self, state: &[f64]) -> Result<Decision, PricingError> {
        validate_state(state)?;
        let index = {
            let mut rng = self.rng.lock().expect("random policy rng lock");
            rng.gen_range(0..Action::COUNT)
        };
        let action = Action::ALL[index];
        Ok(Decision {
            action,
            explanation: format!("uniform exploration ({})", action.label()),
        })
    }
}

/// On-disk artifact produced by the out-of-process trainer.
///
/// Q-values are row-major over (price bin, demand bin), one row of
/// `Action::COUNT` values per cell.
#[derive(Debug, Clone, Deserialize)]
struct QTableArtifact {
    policy_id: String,
    price_bins: usize,
    demand_bins: usize,
    q_values: Vec<Vec<f64>>,
}

/// Learned backend: greedy argmax over a discretized Q-table.
pub struct QTablePolicy {
    policy_id: String,
    price_bins: usize,
    demand_bins: usize,
    q_values: Vec<Vec<f64>>,
}

impl QTablePolicy {
    /// Load and validate a trained artifact.
    pub fn load(path: &Path) -> Result<Self, PricingError> {
        let raw = fs::read_to_string(path)?;
        let artifact: QTableArtifact = serde_json::from_str(&raw)
            .map_err(|e| PricingError::InvalidInput(format!("malformed q-table artifact: {e}")))?;

        if artifact.price_bins == 0 || artifact.demand_bins == 0 {
            return Err(PricingError::InvalidInput(
                "q-table artifact has zero bins".to_string(),
            ));
        }
        let expected_rows = artifact.price_bins * artifact.demand_bins;
        if artifact.q_values.len() != expected_rows {
            return Err(PricingError::InvalidInput(format!(
                "q-table artifact has {} rows, expected {expected_rows}",
                artifact.q_values.len()
            )));
        }
        if let Some(row) = artifact.q_values.iter().find(|r| r.len() != Action::COUNT) {
            return Err(PricingError::InvalidInput(format!(
                "q-table row has {} values, expected {}",
                row.len(),
                Action::COUNT
            )));
        }

        Ok(Self {
            policy_id: artifact.policy_id,
            price_bins: artifact.price_bins,
            demand_bins: artifact.demand_bins,
            q_values: artifact.q_values,
        })
    }

    fn bin(value: f64, bins: usize) -> usize {
        let clipped = value.clamp(0.0, 1.0);
        ((clipped * bins as f64) as usize).min(bins - 1)
    }
}

impl Policy for QTablePolicy {
    fn name(&self) -> &str {
        &self.policy_id
    }

    fn decide(&self, state: &[f64]) -> Result<Decision, PricingError> {
        validate_state(state)?;
        let price_norm = state[0];
        // Demand defaults to the table midpoint when the caller sends a
        // price-only state.
        let demand = state.get(1).copied().unwrap_or(0.5);

        let row_index =
            Self::bin(price_norm, self.price_bins) * self.demand_bins + Self::bin(demand, self.demand_bins);
        let row = &self.q_values[row_index];

        let mut best = 0;
        for (i, q) in row.iter().enumerate() {
            if *q > row[best] {
                best = i;
            }
        }
        let action = Action::ALL[best];

        Ok(Decision {
            action,
            explanation: format!(
                "{}: argmax q={:.3} at cell ({}, {}) ({})",
                self.policy_id,
                row[best],
                Self::bin(price_norm, self.price_bins),
                Self::bin(demand, self.demand_bins),
                action.label()
            ),
        })
    }
}

/// Build the configured decision backend as a trait object.
pub fn build_policy(cfg: &crate::config::PolicyConfig) -> Result<Box<dyn Policy>, PricingError> {
    use crate::config::PolicyBackend;

    match cfg.backend {
        PolicyBackend::Heuristic => Ok(Box::new(ThresholdPolicy::new())),
        PolicyBackend::Learned => {
            let path = cfg.model_path.as_deref().ok_or_else(|| {
                PricingError::InvalidInput(
                    "learned policy backend requires a model path".to_string(),
                )
            })?;
            Ok(Box::new(QTablePolicy::load(path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_thresholds() {
        let policy = ThresholdPolicy::new();

        assert_eq!(policy.decide(&[0.8]).unwrap().action, Action::Down5);
        assert_eq!(policy.decide(&[0.6]).unwrap().action, Action::Hold);
        assert_eq!(policy.decide(&[0.3]).unwrap().action, Action::Up5);
    }

    #[test]
    fn heuristic_boundaries_are_exact() {
        let policy = ThresholdPolicy::new();

        // 0.70 is not "above high": hold, not ease.
        assert_eq!(policy.decide(&[0.70]).unwrap().action, Action::Hold);
        // 0.55 is not "above mid": raise, not hold.
        assert_eq!(policy.decide(&[0.55]).unwrap().action, Action::Up5);
    }

    #[test]
    fn heuristic_is_deterministic() {
        let policy = ThresholdPolicy::new();
        let a = policy.decide(&[0.62, 0.4, 30.0]).unwrap();
        let b = policy.decide(&[0.62, 0.4, 30.0]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_state_is_rejected() {
        let policy = ThresholdPolicy::new();
        let err = policy.decide(&[]).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }

    #[test]
    fn non_finite_state_is_rejected() {
        let policy = ThresholdPolicy::new();
        assert!(policy.decide(&[f64::NAN]).is_err());
        assert!(policy.decide(&[0.5, f64::INFINITY]).is_err());
    }

    #[test]
    fn random_policy_covers_action_space() {
        let policy = RandomPolicy::new(42);
        let mut seen = [false; Action::COUNT];
        for _ in 0..200 {
            let d = policy.decide(&[0.5]).unwrap();
            seen[d.action.index()] = true;
        }
        assert!(seen.iter().all(|s| *s), "missing actions: {seen:?}");
    }

    #[test]
    fn random_policy_rejects_empty_state_without_sampling() {
        let policy = RandomPolicy::new(1);
        assert!(policy.decide(&[]).is_err());
    }
}
