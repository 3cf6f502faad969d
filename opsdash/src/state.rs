//! Dashboard state owned by the event loop: history, charts, readouts, toasts, controls.

use tracing::{debug, error};

use crate::actions::{ActionOutcome, Control, Controls};
use crate::cards::{Readouts, Slot, Status};
use crate::charts::ChartSet;
use crate::error::FetchError;
use crate::history::{History, TimeRange};
use crate::notify::{Notifications, Severity};
use crate::types::Snapshot;

/// Slots shown by the compact layout.
pub const COMPACT_SLOTS: [Slot; 7] = [
    Slot::StatusBadge,
    Slot::CpuUsage,
    Slot::MemoryUsage,
    Slot::DiskUsage,
    Slot::NetworkUsage,
    Slot::TotalRequests,
    Slot::Hostname,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Full,
    Compact,
}

pub struct DashboardState {
    pub view: View,
    pub history: History,
    pub charts: ChartSet,
    pub readouts: Readouts,
    pub notifications: Notifications,
    pub controls: Controls,
    pub status: Status,
    pub time_range: TimeRange,
    pub last_snapshot: Option<Snapshot>,

    // refresh ordering: latest issued / newest applied
    issued_seq: u64,
    applied_seq: u64,
}

impl DashboardState {
    pub fn new(view: View, time_range: TimeRange) -> Self {
        let mut readouts = match view {
            View::Full => Readouts::full(),
            View::Compact => Readouts::with_slots(&COMPACT_SLOTS),
        };
        readouts.set_status(Status::Connecting);
        Self {
            view,
            history: History::new(time_range.bound()),
            charts: ChartSet::default(),
            readouts,
            notifications: Notifications::default(),
            controls: Controls::default(),
            status: Status::Connecting,
            time_range,
            last_snapshot: None,
            issued_seq: 0,
            applied_seq: 0,
        }
    }

    /// Sequence number for a new refresh request.
    pub fn begin_refresh(&mut self) -> u64 {
        self.issued_seq += 1;
        self.issued_seq
    }

    /// Apply a refresh result. Results older than one already applied are dropped.
    /// Returns whether the result was applied.
    pub fn apply_refresh(&mut self, seq: u64, result: Result<Snapshot, FetchError>) -> bool {
        if seq <= self.applied_seq {
            debug!(seq, applied = self.applied_seq, "discarding stale refresh result");
            return false;
        }
        self.applied_seq = seq;
        match result {
            Ok(snap) => {
                self.readouts.render(&snap);
                self.set_status(Status::Live);
                self.history.record(&snap);
                self.charts.redraw(&self.history);
                self.last_snapshot = Some(snap);
            }
            Err(e) => {
                error!(error = %e, "dashboard refresh failed");
                self.set_status(Status::ConnectionError);
            }
        }
        true
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
        self.readouts.set_status(status);
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.time_range = range;
        self.history.set_bound(range.bound());
        self.charts.redraw(&self.history);
        self.notifications
            .notify(format!("Time range set to {range}"), Severity::Info);
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.charts.clear();
        self.notifications
            .notify("Dashboard data cleared", Severity::Info);
    }

    /// Lock an async control. False when it is already running.
    pub fn begin_action(&mut self, control: Control) -> bool {
        self.controls.try_begin(control)
    }

    pub fn finish_action(&mut self, control: Control, outcome: ActionOutcome) {
        self.controls.finish(control);
        self.notifications.notify(outcome.message, outcome.severity);
    }
}
