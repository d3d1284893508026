// src/metrics.rs
//
// Prometheus counters for the serving surface.

use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct ServiceMetrics {
    registry: Registry,
    decisions_total: IntCounter,
    observations_total: IntCounter,
    invalid_input_total: IntCounter,
    store_errors_total: IntCounter,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let decisions_total =
            IntCounter::with_opts(Opts::new("fareflow_decisions_total", "Decisions served"))
                .expect("decisions counter");
        let observations_total = IntCounter::with_opts(Opts::new(
            "fareflow_observations_total",
            "Transitions recorded",
        ))
        .expect("observations counter");
        let invalid_input_total = IntCounter::with_opts(Opts::new(
            "fareflow_invalid_input_total",
            "Rejected decision requests",
        ))
        .expect("invalid input counter");
        let store_errors_total = IntCounter::with_opts(Opts::new(
            "fareflow_store_errors_total",
            "Observation store append failures",
        ))
        .expect("store errors counter");

        registry
            .register(Box::new(decisions_total.clone()))
            .expect("reg decisions");
        registry
            .register(Box::new(observations_total.clone()))
            .expect("reg observations");
        registry
            .register(Box::new(invalid_input_total.clone()))
            .expect("reg invalid input");
        registry
            .register(Box::new(store_errors_total.clone()))
            .expect("reg store errors");

        Self {
            registry,
            decisions_total,
            observations_total,
            invalid_input_total,
            store_errors_total,
        }
    }

    pub fn inc_decision(&self) {
        self.decisions_total.inc();
    }

    pub fn inc_observation(&self) {
        self.observations_total.inc();
    }

    pub fn inc_invalid_input(&self) {
        self.invalid_input_total.inc();
    }

    pub fn inc_store_error(&self) {
        self.store_errors_total.inc();
    }

    pub fn gather(&self) -> String {
        let mf = self.registry.gather();
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        let _ = encoder.encode(&mf, &mut buf);
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}
