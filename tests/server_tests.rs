use std::sync::Arc;

use serde_json::{json, Value};

use fareflow::{
    read_transitions, DecisionService, ObservationLog, ServiceMetrics, ThresholdPolicy,
};

fn mk_service(dir: &tempfile::TempDir) -> (DecisionService, std::path::PathBuf) {
    let path = dir.path().join("obs.jsonl");
    let log = ObservationLog::append(&path).unwrap();
    let service = DecisionService::new(
        Box::new(ThresholdPolicy::new()),
        Arc::new(log),
        ServiceMetrics::new(),
    );
    (service, path)
}

fn body_json(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

#[test]
fn action_returns_heuristic_decision() {
    let dir = tempfile::tempdir().unwrap();
    let (service, _) = mk_service(&dir);

    for (price, expected) in [(0.8, 1), (0.6, 2), (0.3, 3)] {
        let req = json!({ "state": [price, 0.5, 30.0] }).to_string();
        let resp = service.handle("POST", "/action", &req);

        assert_eq!(resp.status, 200);
        let body = body_json(&resp.body);
        assert_eq!(body["action"], expected);
        assert!(!body["explanation"].as_str().unwrap().is_empty());
    }
}

#[test]
fn action_rejects_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let (service, _) = mk_service(&dir);

    let resp = service.handle("POST", "/action", r#"{"state":[]}"#);
    assert_eq!(resp.status, 400);
    assert!(body_json(&resp.body)["error"].is_string());
}

#[test]
fn action_rejects_malformed_body() {
    let dir = tempfile::tempdir().unwrap();
    let (service, _) = mk_service(&dir);

    let resp = service.handle("POST", "/action", "not json");
    assert_eq!(resp.status, 400);
}

#[test]
fn observe_appends_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let (service, path) = mk_service(&dir);

    let transition = json!({
        "state": [0.5, 0.4, 30.0],
        "action": 1,
        "reward": 1425.0,
        "next_state": [0.52, 0.41, 29.0],
        "done": true,
    })
    .to_string();

    let resp = service.handle("POST", "/observe", &transition);
    assert_eq!(resp.status, 200);
    assert_eq!(body_json(&resp.body)["status"], "ok");

    let records = read_transitions(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reward, 1425.0);
}

#[test]
fn observe_rejects_bad_transition() {
    let dir = tempfile::tempdir().unwrap();
    let (service, path) = mk_service(&dir);

    // action 7 is out of range
    let bad = json!({
        "state": [0.5, 0.4, 30.0],
        "action": 7,
        "reward": 0.0,
        "next_state": [0.5, 0.4, 29.0],
        "done": true,
    })
    .to_string();

    let resp = service.handle("POST", "/observe", &bad);
    assert_eq!(resp.status, 400);

    // Nothing was written.
    assert_eq!(read_transitions(&path).unwrap().len(), 0);
}

#[test]
fn train_is_acknowledged_without_core_effect() {
    let dir = tempfile::tempdir().unwrap();
    let (service, path) = mk_service(&dir);

    let resp = service.handle("POST", "/train", "");
    assert_eq!(resp.status, 200);
    assert_eq!(body_json(&resp.body)["status"], "training_triggered");
    assert_eq!(read_transitions(&path).unwrap().len(), 0);
}

#[test]
fn status_reports_store_path() {
    let dir = tempfile::tempdir().unwrap();
    let (service, path) = mk_service(&dir);

    let resp = service.handle("GET", "/status", "");
    assert_eq!(resp.status, 200);

    let body = body_json(&resp.body);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], path.display().to_string());
}

#[test]
fn health_and_metrics_respond() {
    let dir = tempfile::tempdir().unwrap();
    let (service, _) = mk_service(&dir);

    let health = service.handle("GET", "/health", "");
    assert_eq!(health.status, 200);
    assert_eq!(health.body, "ok");

    // Serve one decision so the counter is non-zero.
    let req = json!({ "state": [0.8] }).to_string();
    service.handle("POST", "/action", &req);

    let metrics = service.handle("GET", "/metrics", "");
    assert_eq!(metrics.status, 200);
    assert!(metrics.body.contains("fareflow_decisions_total 1"));
}

#[test]
fn unknown_route_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let (service, _) = mk_service(&dir);

    let resp = service.handle("GET", "/nope", "");
    assert_eq!(resp.status, 404);
}
