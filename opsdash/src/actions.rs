//! Demo load controls: traffic generation, simulated work, stress, load and memory
//! tests, and resetting the backend's error simulations.
//!
//! Async actions run on spawned tasks and report back through [`AppEvent::ActionDone`].
//! A drop guard sends that event on every unwinding exit path, so the triggering
//! control is re-enabled even if the task is aborted or panics. Release builds
//! abort on panic, which ends the process instead.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use futures::future::{join_all, try_join_all};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, RequestOutcome, HEALTH, METRICS, USERS};
use crate::events::AppEvent;
use crate::notify::Severity;

pub const DEFAULT_TRAFFIC: usize = 25;
pub const HEAVY_TRAFFIC_FACTOR: usize = 4;
pub const STRESS_REQUESTS: usize = 5;
pub const MEMORY_TEST_BYTES: usize = 64 * 1024 * 1024;
pub const MEMORY_TEST_HOLD: Duration = Duration::from_secs(3);
/// Delay before the refresh that follows a traffic batch or an error reset.
pub const FOLLOWUP_REFRESH_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Control {
    GenerateTraffic,
    HeavyTraffic,
    SimulateWork,
    StressTest,
    MemoryTest,
    LoadTest,
    ResetErrors,
    Refresh,
    Clear,
}

impl Control {
    pub const ALL: [Control; 9] = [
        Control::GenerateTraffic,
        Control::HeavyTraffic,
        Control::SimulateWork,
        Control::StressTest,
        Control::MemoryTest,
        Control::LoadTest,
        Control::ResetErrors,
        Control::Refresh,
        Control::Clear,
    ];

    pub fn key(self) -> char {
        match self {
            Control::GenerateTraffic => 't',
            Control::HeavyTraffic => 'T',
            Control::SimulateWork => 'w',
            Control::StressTest => 's',
            Control::MemoryTest => 'm',
            Control::LoadTest => 'l',
            Control::ResetErrors => 'e',
            Control::Refresh => 'r',
            Control::Clear => 'c',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Control::GenerateTraffic => "Generate traffic",
            Control::HeavyTraffic => "Heavy traffic",
            Control::SimulateWork => "Simulate work",
            Control::StressTest => "Stress test",
            Control::MemoryTest => "Memory test",
            Control::LoadTest => "Load test",
            Control::ResetErrors => "Reset errors",
            Control::Refresh => "Refresh",
            Control::Clear => "Clear",
        }
    }

    /// Label while running; `None` for controls that never go busy.
    pub fn busy_label(self) -> Option<&'static str> {
        match self {
            Control::GenerateTraffic | Control::HeavyTraffic => Some("Generating..."),
            Control::SimulateWork => Some("Working..."),
            Control::StressTest => Some("Testing..."),
            Control::MemoryTest => Some("Allocating..."),
            Control::LoadTest => Some("Loading..."),
            Control::ResetErrors => Some("Resetting..."),
            Control::Refresh | Control::Clear => None,
        }
    }

    /// Controls that run on a task and therefore lock themselves while busy.
    pub fn is_async(self) -> bool {
        !matches!(self, Control::Refresh | Control::Clear)
    }
}

/// Busy state per control. A busy control ignores further triggers.
#[derive(Debug, Default)]
pub struct Controls {
    busy: BTreeSet<Control>,
}

impl Controls {
    /// Mark `c` busy. Returns false when it already was, or when `c` runs inline
    /// and so has nothing to lock.
    pub fn try_begin(&mut self, c: Control) -> bool {
        c.is_async() && self.busy.insert(c)
    }

    pub fn finish(&mut self, c: Control) {
        self.busy.remove(&c);
    }

    pub fn is_busy(&self, c: Control) -> bool {
        self.busy.contains(&c)
    }

    pub fn label(&self, c: Control) -> &'static str {
        c.busy_label()
            .filter(|_| self.is_busy(c))
            .unwrap_or(c.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub severity: Severity,
    pub message: String,
}

impl ActionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GenerateTraffic { count: usize },
    SimulateWork,
    StressTest,
    MemoryTest,
    LoadTest,
    ResetErrors,
}

impl Action {
    /// Action behind an async control; `traffic` is the configured batch size.
    pub fn for_control(c: Control, traffic: usize) -> Option<Action> {
        match c {
            Control::GenerateTraffic => Some(Action::GenerateTraffic { count: traffic }),
            Control::HeavyTraffic => Some(Action::GenerateTraffic {
                count: traffic.saturating_mul(HEAVY_TRAFFIC_FACTOR),
            }),
            Control::SimulateWork => Some(Action::SimulateWork),
            Control::StressTest => Some(Action::StressTest),
            Control::MemoryTest => Some(Action::MemoryTest),
            Control::LoadTest => Some(Action::LoadTest),
            Control::ResetErrors => Some(Action::ResetErrors),
            Control::Refresh | Control::Clear => None,
        }
    }
}

struct CompletionGuard {
    tx: UnboundedSender<AppEvent>,
    control: Control,
    outcome: Option<ActionOutcome>,
}

impl CompletionGuard {
    fn new(tx: UnboundedSender<AppEvent>, control: Control) -> Self {
        Self {
            tx,
            control,
            outcome: None,
        }
    }

    fn complete(mut self, outcome: ActionOutcome) {
        self.outcome = Some(outcome);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or_else(|| {
            ActionOutcome::error(format!("{} was interrupted", self.control.label()))
        });
        let _ = self.tx.send(AppEvent::ActionDone {
            control: self.control,
            outcome,
        });
    }
}

/// Run `action` for `control` on a new task.
pub fn spawn_action(
    control: Control,
    action: Action,
    api: ApiClient,
    tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let guard = CompletionGuard::new(tx.clone(), control);
        let outcome = match action {
            Action::GenerateTraffic { count } => {
                let summary = generate_traffic(&api, count).await;
                schedule_refresh(tx, FOLLOWUP_REFRESH_DELAY);
                summary.outcome()
            }
            Action::SimulateWork => simulate_work(&api).await,
            Action::StressTest => stress_test(&api).await,
            Action::MemoryTest => memory_test(MEMORY_TEST_BYTES, MEMORY_TEST_HOLD).await,
            Action::LoadTest => load_test(&api).await,
            Action::ResetErrors => {
                let outcome = reset_errors(&api).await;
                schedule_refresh(tx, FOLLOWUP_REFRESH_DELAY);
                outcome
            }
        };
        guard.complete(outcome);
    })
}

pub fn schedule_refresh(tx: UnboundedSender<AppEvent>, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(AppEvent::RefreshRequested);
    })
}

/// Endpoints hit by a traffic batch of `count` iterations, in issue order.
pub fn traffic_plan(count: usize) -> Vec<&'static str> {
    let mut plan = Vec::with_capacity(count + count / 5 + count / 10 + 2);
    for i in 0..count {
        plan.push(HEALTH);
        if i % 5 == 0 {
            plan.push(METRICS);
        }
        if i % 10 == 0 {
            plan.push(USERS);
        }
    }
    plan
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndpointTally {
    pub issued: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub endpoints: BTreeMap<&'static str, EndpointTally>,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, RequestOutcome)>,
    {
        let mut s = BatchSummary::default();
        for (path, outcome) in outcomes {
            let tally = s.endpoints.entry(path).or_default();
            tally.issued += 1;
            if outcome.is_ok() {
                s.succeeded += 1;
            } else {
                tally.failed += 1;
                s.failed += 1;
            }
        }
        s
    }

    pub fn issued(&self, path: &str) -> usize {
        self.endpoints.get(path).map(|t| t.issued).unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn outcome(&self) -> ActionOutcome {
        if self.failed == 0 {
            ActionOutcome::success(format!("Generated {} requests", self.total()))
        } else {
            // partial failure still counts as a completed batch
            ActionOutcome::success(format!(
                "Generated {} requests ({} failed)",
                self.total(),
                self.failed
            ))
        }
    }
}

/// Fire the whole traffic plan concurrently. Individual failures are tallied, never raised.
pub async fn generate_traffic(api: &ApiClient, count: usize) -> BatchSummary {
    let plan = traffic_plan(count);
    let outcomes = join_all(
        plan.into_iter()
            .map(|path| async move { (path, api.get_best_effort(path).await) }),
    )
    .await;
    let summary = BatchSummary::from_outcomes(outcomes);
    info!(
        total = summary.total(),
        failed = summary.failed,
        "traffic batch finished"
    );
    summary
}

pub async fn simulate_work(api: &ApiClient) -> ActionOutcome {
    match api.simulate_work().await {
        Ok(r) => match r.processing_time {
            Some(t) => ActionOutcome::success(format!("Work completed in {t}")),
            None => ActionOutcome::success(r.message.unwrap_or_else(|| "Work completed".into())),
        },
        Err(e) => {
            warn!(error = %e, "simulate work failed");
            ActionOutcome::error(format!("Simulate work failed: {e}"))
        }
    }
}

/// Five concurrent work requests; one failure fails the test.
pub async fn stress_test(api: &ApiClient) -> ActionOutcome {
    match try_join_all((0..STRESS_REQUESTS).map(|_| api.simulate_work())).await {
        Ok(done) => ActionOutcome::success(format!(
            "Stress test completed: {} concurrent requests",
            done.len()
        )),
        Err(e) => {
            warn!(error = %e, "stress test failed");
            ActionOutcome::error(format!("Stress test failed: {e}"))
        }
    }
}

pub async fn load_test(api: &ApiClient) -> ActionOutcome {
    match api.load_test().await {
        Ok(r) => match r.operations {
            Some(n) => ActionOutcome::success(format!("Load test completed: {n} operations")),
            None => ActionOutcome::success(
                r.message.unwrap_or_else(|| "Load test completed".into()),
            ),
        },
        Err(e) => {
            warn!(error = %e, "load test failed");
            ActionOutcome::error(format!("Load test failed: {e}"))
        }
    }
}

/// Reset the backend's error counters, then read the stats back for the toast.
/// A failed read-back still counts as a successful reset.
pub async fn reset_errors(api: &ApiClient) -> ActionOutcome {
    if let Err(e) = api.reset_errors().await {
        warn!(error = %e, "error reset failed");
        return ActionOutcome::error(format!("Reset errors failed: {e}"));
    }
    match api.error_stats().await {
        Ok(stats) => ActionOutcome::success(format!(
            "Errors reset: {} health-check failures, {} simulations active",
            stats.health_check_failures,
            stats.simulation_status.active().len()
        )),
        Err(e) => {
            debug!(error = %e, "error stats unavailable after reset");
            ActionOutcome::success("Error statistics reset")
        }
    }
}

/// Hold a touched buffer of `bytes` for `hold`, then release it. Purely local.
pub async fn memory_test(bytes: usize, hold: Duration) -> ActionOutcome {
    let buf = vec![1u8; bytes];
    std::hint::black_box(&buf);
    tokio::time::sleep(hold).await;
    drop(buf);
    ActionOutcome::success(format!(
        "Memory test completed: held {:.0} MB for {}s",
        bytes as f64 / (1024.0 * 1024.0),
        hold.as_secs()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn traffic_plan_for_25() {
        let plan = traffic_plan(25);
        let n = |p: &str| plan.iter().filter(|x| **x == p).count();
        assert_eq!(n(HEALTH), 25);
        assert_eq!(n(METRICS), 5);
        assert_eq!(n(USERS), 3);
        assert_eq!(plan.len(), 33);
        // i = 0 issues all three
        assert_eq!(&plan[..3], &[HEALTH, METRICS, USERS]);
    }

    #[test]
    fn traffic_plan_zero_is_empty() {
        assert!(traffic_plan(0).is_empty());
    }

    #[test]
    fn batch_summary_tallies_failures_per_endpoint() {
        let s = BatchSummary::from_outcomes(vec![
            (HEALTH, RequestOutcome::Ok(StatusCode::OK)),
            (HEALTH, RequestOutcome::Failed("boom".into())),
            (METRICS, RequestOutcome::Failed("503".into())),
            (USERS, RequestOutcome::Ok(StatusCode::OK)),
        ]);
        assert_eq!(s.issued(HEALTH), 2);
        assert_eq!(s.endpoints[HEALTH].failed, 1);
        assert_eq!(s.issued(METRICS), 1);
        assert_eq!(s.succeeded, 2);
        assert_eq!(s.failed, 2);
        assert_eq!(s.total(), 4);
        let o = s.outcome();
        assert_eq!(o.severity, Severity::Success);
        assert!(o.message.contains("2 failed"));
    }

    #[test]
    fn busy_control_ignores_second_trigger() {
        let mut c = Controls::default();
        assert!(c.try_begin(Control::StressTest));
        assert!(!c.try_begin(Control::StressTest));
        assert_eq!(c.label(Control::StressTest), "Testing...");
        // other controls stay usable
        assert!(c.try_begin(Control::SimulateWork));
        c.finish(Control::StressTest);
        assert!(!c.is_busy(Control::StressTest));
        assert_eq!(c.label(Control::StressTest), "Stress test");
    }

    #[test]
    fn inline_controls_never_lock() {
        let mut c = Controls::default();
        for ctl in [Control::Refresh, Control::Clear] {
            assert!(!c.try_begin(ctl));
            assert!(!c.is_busy(ctl));
            assert_eq!(c.label(ctl), ctl.label());
        }
        assert!(Control::ALL
            .iter()
            .all(|ctl| ctl.is_async() == ctl.busy_label().is_some()));
    }

    #[test]
    fn heavy_traffic_scales_batch() {
        assert_eq!(
            Action::for_control(Control::HeavyTraffic, 25),
            Some(Action::GenerateTraffic { count: 100 })
        );
        assert_eq!(Action::for_control(Control::Clear, 25), None);
        assert!(Control::ALL
            .iter()
            .all(|c| c.is_async() == Action::for_control(*c, 1).is_some()));
    }

    #[tokio::test]
    async fn guard_reports_even_when_task_panics() {
        let (tx, mut rx) = unbounded_channel();
        let handle = tokio::spawn(async move {
            let _guard = CompletionGuard::new(tx, Control::MemoryTest);
            panic!("allocation exploded");
        });
        assert!(handle.await.is_err());
        match rx.recv().await {
            Some(AppEvent::ActionDone { control, outcome }) => {
                assert_eq!(control, Control::MemoryTest);
                assert_eq!(outcome.severity, Severity::Error);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn guard_reports_completed_outcome() {
        let (tx, mut rx) = unbounded_channel();
        CompletionGuard::new(tx, Control::SimulateWork).complete(ActionOutcome::success("ok"));
        match rx.recv().await {
            Some(AppEvent::ActionDone { outcome, .. }) => {
                assert_eq!(outcome, ActionOutcome::success("ok"))
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn memory_test_holds_then_reports() {
        let o = memory_test(1024, Duration::from_secs(3)).await;
        assert_eq!(o.severity, Severity::Success);
        assert!(o.message.contains("3s"));
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_refresh_arrives_after_delay() {
        let (tx, mut rx) = unbounded_channel();
        schedule_refresh(tx, FOLLOWUP_REFRESH_DELAY);
        assert!(rx.try_recv().is_err());
        let ev = rx.recv().await;
        assert!(matches!(ev, Some(AppEvent::RefreshRequested)));
    }
}
