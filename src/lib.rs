//! Fareflow core library.
//!
//! This crate exposes the dynamic-pricing decision core: a booking
//! simulator, decision policies, the append-only observation store, and
//! the dataset driver. The binaries (`src/main.rs`, `src/bin/simulate.rs`)
//! are thin harnesses around these components.

pub mod config;
pub mod driver;
pub mod env;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod recorder;
pub mod server;
pub mod types;

// --- Re-exports for ergonomic external use ---------------------------------

pub use config::{Config, EnvConfig, PolicyBackend, PolicyConfig, ServerConfig, StoreConfig};

pub use driver::{DriverSummary, SimulationDriver};

pub use env::{PricingEnv, StepInfo, StepOutcome};

pub use error::PricingError;

pub use metrics::ServiceMetrics;

pub use policy::{build_policy, Decision, Policy, QTablePolicy, RandomPolicy, ThresholdPolicy};

pub use recorder::{read_transitions, ObservationLog};

pub use server::{run_server, ApiResponse, DecisionService};

pub use types::{Action, State, Transition};

// --- End-to-end episode unit tests ------------------------------------------
