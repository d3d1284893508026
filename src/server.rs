// src/server.rs
//
// Serving surface for decisions and observations.
//
// Routing and response building are a pure function over (method, url,
// body) so the whole surface is testable without sockets; the tiny_http
// accept loop is a thin shell around it.
//
// Routes:
// - POST /observe  append one transition to the observation store
// - POST /action   map a state to a price adjustment
// - POST /train    acknowledge an out-of-process training request
// - GET  /status   liveness + resolved store path
// - GET  /health   liveness probe
// - GET  /metrics  Prometheus text

use std::io;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tiny_http::{Header, Method, Response, Server};

use crate::error::PricingError;
use crate::metrics::ServiceMetrics;
use crate::policy::Policy;
use crate::recorder::ObservationLog;
use crate::types::Transition;

#[derive(Debug, Deserialize)]
struct ActionRequest {
    state: Vec<f64>,
}

/// A fully built response: status code, content type, body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiResponse {
    fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    fn text(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "text/plain; version=0.0.4",
            body,
        }
    }
}

pub struct DecisionService {
    policy: Box<dyn Policy>,
    log: Arc<ObservationLog>,
    metrics: ServiceMetrics,
}

impl DecisionService {
    pub fn new(policy: Box<dyn Policy>, log: Arc<ObservationLog>, metrics: ServiceMetrics) -> Self {
        Self {
            policy,
            log,
            metrics,
        }
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    pub fn store_path(&self) -> String {
        self.log.path().display().to_string()
    }

    /// Dispatch one request. Validation failures map to 400, store I/O
    /// failures to 500; no partial successes.
    pub fn handle(&self, method: &str, url: &str, body: &str) -> ApiResponse {
        match (method, url) {
            ("POST", "/observe") => self.observe(body),
            ("POST", "/action") => self.action(body),
            ("POST", "/train") => ApiResponse::json(
                200,
                json!({
                    "status": "training_triggered",
                    "note": "training runs out of process against the observation store",
                }),
            ),
            ("GET", "/status") => ApiResponse::json(
                200,
                json!({
                    "status": "ok",
                    "policy": self.policy.name(),
                    "store": self.store_path(),
                }),
            ),
            ("GET", "/health") => ApiResponse::text(200, "ok".to_string()),
            ("GET", "/metrics") => ApiResponse::text(200, self.metrics.gather()),
            _ => ApiResponse::json(404, json!({ "error": "not found" })),
        }
    }

    fn observe(&self, body: &str) -> ApiResponse {
        let transition: Transition = match serde_json::from_str(body) {
            Ok(t) => t,
            Err(e) => {
                self.metrics.inc_invalid_input();
                return ApiResponse::json(400, json!({ "error": format!("bad transition: {e}") }));
            }
        };

        match self.log.record(&transition) {
            Ok(()) => {
                self.metrics.inc_observation();
                ApiResponse::json(200, json!({ "status": "ok" }))
            }
            Err(e) => {
                self.metrics.inc_store_error();
                ApiResponse::json(500, json!({ "error": format!("store append failed: {e}") }))
            }
        }
    }

    fn action(&self, body: &str) -> ApiResponse {
        let request: ActionRequest = match serde_json::from_str(body) {
            Ok(r) => r,
            Err(e) => {
                self.metrics.inc_invalid_input();
                return ApiResponse::json(400, json!({ "error": format!("bad request: {e}") }));
            }
        };

        match self.policy.decide(&request.state) {
            Ok(decision) => {
                self.metrics.inc_decision();
                ApiResponse::json(
                    200,
                    json!({
                        "action": u8::from(decision.action),
                        "explanation": decision.explanation,
                    }),
                )
            }
            Err(PricingError::InvalidInput(msg)) => {
                self.metrics.inc_invalid_input();
                ApiResponse::json(400, json!({ "error": msg }))
            }
            Err(e) => ApiResponse::json(500, json!({ "error": e.to_string() })),
        }
    }
}

/// Blocking accept loop. Decision and record calls are O(1) and synchronous;
/// the store's writer lock serializes appends if this is ever driven by
/// multiple threads.
pub fn run_server(service: DecisionService, addr: &str) -> io::Result<()> {
    let server = Server::http(addr)
        .map_err(|e| io::Error::new(io::ErrorKind::AddrInUse, e.to_string()))?;

    eprintln!(
        "fareflow | listening on {addr} | policy={} | store={}",
        service.policy_name(),
        service.store_path()
    );

    for mut request in server.incoming_requests() {
        let mut body = String::new();
        let _ = request.as_reader().read_to_string(&mut body);

        let method = match request.method() {
            Method::Get => "GET",
            Method::Post => "POST",
            _ => "OTHER",
        };
        let api = service.handle(method, request.url(), &body);

        let response = Response::from_string(api.body)
            .with_status_code(api.status)
            .with_header(
                Header::from_bytes(&b"Content-Type"[..], api.content_type.as_bytes()).unwrap(),
            );
        let _ = request.respond(response);
    }

    Ok(())
}
