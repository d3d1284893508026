// src/driver.rs
//
// Simulation driver: generates a transition dataset by rolling the booking
// environment through N one-step episodes under a chosen policy.
//
// The driver takes exclusive ownership of a store opened in truncate mode,
// which makes the "regenerate dataset" lifecycle structurally distinct from
// live appends: the two can never share an ObservationLog instance.

use crate::env::PricingEnv;
use crate::error::PricingError;
use crate::policy::Policy;
use crate::recorder::ObservationLog;
use crate::types::Transition;

/// Aggregate statistics for one generation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverSummary {
    pub episodes: u64,
    /// Episodes that ended in a booking.
    pub booked: u64,
    /// Sum of rewards (realised revenue) across the run.
    pub total_reward: f64,
}

impl DriverSummary {
    pub fn mean_reward(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_reward / self.episodes as f64
        }
    }
}

pub struct SimulationDriver {
    env: PricingEnv,
    policy: Box<dyn Policy>,
    log: ObservationLog,
}

impl SimulationDriver {
    /// `log` must have been opened with `ObservationLog::create`: the run
    /// replaces any prior store content.
    pub fn new(env: PricingEnv, policy: Box<dyn Policy>, log: ObservationLog) -> Self {
        Self { env, policy, log }
    }

    /// Run `episodes` reset -> decide -> step -> record iterations.
    pub fn run(&mut self, episodes: u64) -> Result<DriverSummary, PricingError> {
        let mut summary = DriverSummary {
            episodes: 0,
            booked: 0,
            total_reward: 0.0,
        };

        for _ in 0..episodes {
            let state = self.env.reset(None);
            let decision = self.policy.decide(&state.to_array())?;
            let outcome = self.env.step(decision.action)?;

            let transition = Transition {
                state,
                action: decision.action,
                reward: outcome.reward,
                next_state: outcome.state,
                done: outcome.done,
            };
            self.log.record(&transition)?;

            summary.episodes += 1;
            if outcome.info.booked {
                summary.booked += 1;
            }
            summary.total_reward += outcome.reward;
        }

        Ok(summary)
    }

    pub fn log(&self) -> &ObservationLog {
        &self.log
    }
}
