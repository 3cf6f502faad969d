//! HTTP behavior against an in-process fixture backend.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use std::time::Duration;

use opsdash::actions::{
    generate_traffic, load_test, reset_errors, simulate_work, spawn_action, stress_test, Action,
    Control, FOLLOWUP_REFRESH_DELAY,
};
use opsdash::api::{
    ApiClient, DASHBOARD_DATA, ERROR_STATS, HEALTH, LOAD_TEST, METRICS, RESET_ERRORS,
    SIMULATE_WORK, USERS,
};
use opsdash::error::FetchError;
use opsdash::events::AppEvent;
use opsdash::notify::Severity;
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::{timeout, Instant};

const SNAPSHOT: &str = r#"{
    "system": {
        "cpu_percent": 12.5, "cpu_count": 8, "cpu_freq_current": 2400.0,
        "memory_percent": 41.2, "memory_total_gb": 15.5, "memory_used_gb": 6.38,
        "disk_percent": 63.0, "disk_total_gb": 500.0, "disk_used_gb": 315.0,
        "network_bytes_sent": 1048576, "network_bytes_recv": 5242880,
        "uptime_seconds": 90061.4, "platform": "Linux", "hostname": "fixture", "python_version": "3.12.1"
    },
    "app": {
        "total_users": 3, "total_requests": 120, "memory_usage_mb": 88.25,
        "active_connections": 4, "threads_count": 9, "uptime_seconds": 3661.0, "cpu_percent": 1.5
    },
    "performance": { "load_average": [0.5, 0.4, 0.3] }
}"#;

#[derive(Default)]
struct Fixture {
    hits: Mutex<HashMap<String, usize>>,
    failing: Mutex<Vec<&'static str>>,
    corrupt_snapshot: AtomicBool,
    work_calls: AtomicUsize,
}

impl Fixture {
    fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

async fn handle(State(fx): State<Arc<Fixture>>, req: Request) -> Response {
    let path = req.uri().path().to_string();
    *fx.hits.lock().unwrap().entry(path.clone()).or_default() += 1;
    if fx.failing.lock().unwrap().iter().any(|p| *p == path) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    match path.as_str() {
        DASHBOARD_DATA if fx.corrupt_snapshot.load(Ordering::SeqCst) => {
            ([("content-type", "application/json")], "{\"system\": 1").into_response()
        }
        DASHBOARD_DATA => ([("content-type", "application/json")], SNAPSHOT).into_response(),
        SIMULATE_WORK => {
            fx.work_calls.fetch_add(1, Ordering::SeqCst);
            (
                [("content-type", "application/json")],
                r#"{"message": "Work simulation completed", "processing_time": "0.12s"}"#,
            )
                .into_response()
        }
        LOAD_TEST => (
            [("content-type", "application/json")],
            r#"{"message": "Load test completed", "operations": 18}"#,
        )
            .into_response(),
        ERROR_STATS => (
            [("content-type", "application/json")],
            r#"{"health_check_failures": 0, "total_requests": 7,
                "simulation_status": {"api_errors": {"database_errors": false},
                                      "health_errors": {"slow_responses": false}}}"#,
        )
            .into_response(),
        _ => ([("content-type", "application/json")], "{\"status\": \"ok\"}").into_response(),
    }
}

async fn start_fixture() -> (ApiClient, Arc<Fixture>) {
    let fx = Arc::new(Fixture::default());
    let app = Router::new().fallback(handle).with_state(fx.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let api = ApiClient::new(&format!("http://{addr}"), None).unwrap();
    (api, fx)
}

#[tokio::test]
async fn fetches_and_decodes_snapshot() {
    let (api, fx) = start_fixture().await;
    let snap = api.fetch_snapshot().await.expect("snapshot");
    assert_eq!(snap.system.hostname, "fixture");
    assert_eq!(snap.app.active_connections, 4);
    assert_eq!(fx.hits(DASHBOARD_DATA), 1);
}

#[tokio::test]
async fn server_error_is_an_http_error() {
    let (api, fx) = start_fixture().await;
    fx.failing.lock().unwrap().push(DASHBOARD_DATA);
    match api.fetch_snapshot().await {
        Err(FetchError::Http(status)) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (api, fx) = start_fixture().await;
    fx.corrupt_snapshot.store(true, Ordering::SeqCst);
    assert!(matches!(
        api.fetch_snapshot().await,
        Err(FetchError::Decode(_))
    ));
}

#[tokio::test]
async fn traffic_batch_hits_each_endpoint_per_plan() {
    let (api, fx) = start_fixture().await;
    let summary = generate_traffic(&api, 25).await;
    assert_eq!(fx.hits(HEALTH), 25);
    assert_eq!(fx.hits(METRICS), 5);
    assert_eq!(fx.hits(USERS), 3);
    assert_eq!(summary.total(), 33);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.outcome().severity, Severity::Success);
}

#[tokio::test]
async fn traffic_batch_completes_when_an_endpoint_fails() {
    let (api, fx) = start_fixture().await;
    fx.failing.lock().unwrap().push(USERS);
    let summary = generate_traffic(&api, 25).await;
    assert_eq!(fx.hits(USERS), 3);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.succeeded, 30);
    let outcome = summary.outcome();
    assert_eq!(outcome.severity, Severity::Success);
    assert!(outcome.message.contains("3 failed"), "{}", outcome.message);
}

#[tokio::test]
async fn traffic_against_dead_backend_still_resolves() {
    let api = ApiClient::new("http://127.0.0.1:9", None).unwrap();
    let summary = generate_traffic(&api, 10).await;
    assert_eq!(summary.total(), 13);
    assert_eq!(summary.failed, 13);
}

#[tokio::test]
async fn simulate_work_reports_processing_time() {
    let (api, fx) = start_fixture().await;
    let outcome = simulate_work(&api).await;
    assert_eq!(outcome.severity, Severity::Success);
    assert!(outcome.message.contains("0.12s"), "{}", outcome.message);
    assert_eq!(fx.work_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stress_test_runs_five_requests_and_fails_on_error() {
    let (api, fx) = start_fixture().await;
    let ok = stress_test(&api).await;
    assert_eq!(ok.severity, Severity::Success);
    assert_eq!(fx.hits(SIMULATE_WORK), 5);

    fx.failing.lock().unwrap().push(SIMULATE_WORK);
    let failed = stress_test(&api).await;
    assert_eq!(failed.severity, Severity::Error);
}

#[tokio::test]
async fn spawned_traffic_reports_done_then_requests_refresh() {
    let (api, fx) = start_fixture().await;
    let (tx, mut rx) = unbounded_channel();
    let started = Instant::now();
    spawn_action(
        Control::GenerateTraffic,
        Action::GenerateTraffic { count: 10 },
        api,
        tx,
    );

    let first = timeout(Duration::from_secs(10), rx.recv()).await.unwrap();
    match first {
        Some(AppEvent::ActionDone { control, outcome }) => {
            assert_eq!(control, Control::GenerateTraffic);
            assert_eq!(outcome.severity, Severity::Success);
        }
        other => panic!("expected ActionDone first, got {other:?}"),
    }
    assert_eq!(fx.hits(HEALTH), 10);

    let second = timeout(Duration::from_secs(10), rx.recv()).await.unwrap();
    assert!(
        matches!(second, Some(AppEvent::RefreshRequested)),
        "expected a follow-up refresh, got {second:?}"
    );
    assert!(started.elapsed() >= FOLLOWUP_REFRESH_DELAY);
}

#[tokio::test]
async fn load_test_reports_operation_count() {
    let (api, fx) = start_fixture().await;
    let ok = load_test(&api).await;
    assert_eq!(ok.severity, Severity::Success);
    assert!(ok.message.contains("18 operations"), "{}", ok.message);
    assert_eq!(fx.hits(LOAD_TEST), 1);

    fx.failing.lock().unwrap().push(LOAD_TEST);
    assert_eq!(load_test(&api).await.severity, Severity::Error);
}

#[tokio::test]
async fn reset_errors_posts_then_reads_stats_back() {
    let (api, fx) = start_fixture().await;
    let outcome = reset_errors(&api).await;
    assert_eq!(outcome.severity, Severity::Success);
    assert!(
        outcome.message.contains("0 simulations active"),
        "{}",
        outcome.message
    );
    assert_eq!(fx.hits(RESET_ERRORS), 1);
    assert_eq!(fx.hits(ERROR_STATS), 1);

    // a failed read-back still counts as a reset
    fx.failing.lock().unwrap().push(ERROR_STATS);
    assert_eq!(reset_errors(&api).await.severity, Severity::Success);

    fx.failing.lock().unwrap().push(RESET_ERRORS);
    assert_eq!(reset_errors(&api).await.severity, Severity::Error);
}
