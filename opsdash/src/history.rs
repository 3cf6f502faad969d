//! Bounded rolling history of derived chart points.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::types::Snapshot;

pub const DEFAULT_BOUND: usize = 50;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    while dq.len() >= cap.max(1) {
        dq.pop_front();
    }
    dq.push_back(v);
}

/// One chart sample, derived from a snapshot at the moment it was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub timestamp: String,
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub app_memory: f64,
    pub app_cpu: f64,
    pub connections: u32,
    pub network_sent: u64,
    pub network_recv: u64,
}

impl HistoryPoint {
    pub fn from_snapshot(s: &Snapshot, timestamp: String) -> Self {
        Self {
            timestamp,
            cpu: s.system.cpu_percent,
            memory: s.system.memory_percent,
            disk: s.system.disk_percent,
            app_memory: s.app.memory_usage_mb,
            app_cpu: s.app.cpu_percent,
            connections: s.app.active_connections,
            network_sent: s.system.network_bytes_sent,
            network_recv: s.system.network_bytes_recv,
        }
    }
}

/// Chart window selectable from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    OneMinute,
    #[default]
    FiveMinutes,
    FifteenMinutes,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [
        TimeRange::OneMinute,
        TimeRange::FiveMinutes,
        TimeRange::FifteenMinutes,
    ];

    pub fn bound(self) -> usize {
        match self {
            TimeRange::OneMinute => 20,
            TimeRange::FiveMinutes => 50,
            TimeRange::FifteenMinutes => 150,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::OneMinute => "1m",
            TimeRange::FiveMinutes => "5m",
            TimeRange::FifteenMinutes => "15m",
        }
    }

    /// Lenient lookup: unknown values fall back to the default window.
    pub fn bound_for(value: &str) -> usize {
        value
            .parse::<TimeRange>()
            .map(TimeRange::bound)
            .unwrap_or(DEFAULT_BOUND)
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(TimeRange::OneMinute),
            "5m" => Ok(TimeRange::FiveMinutes),
            "15m" => Ok(TimeRange::FifteenMinutes),
            other => Err(format!("unknown time range '{other}' (expected 1m, 5m or 15m)")),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Invariant: points.len() <= bound, oldest first
#[derive(Debug, Clone)]
pub struct History {
    points: VecDeque<HistoryPoint>,
    bound: usize,
}

impl History {
    pub fn new(bound: usize) -> Self {
        let bound = bound.max(1);
        Self {
            points: VecDeque::with_capacity(bound),
            bound,
        }
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    /// Record a snapshot stamped with the local wall-clock time.
    pub fn record(&mut self, s: &Snapshot) {
        let ts = chrono::Local::now().format("%H:%M:%S").to_string();
        self.record_at(s, ts);
    }

    pub fn record_at(&mut self, s: &Snapshot, timestamp: String) {
        push_capped(
            &mut self.points,
            HistoryPoint::from_snapshot(s, timestamp),
            self.bound,
        );
    }

    /// Change the bound. Shrinking keeps the newest entries; growing restores nothing.
    pub fn set_bound(&mut self, bound: usize) {
        self.bound = bound.max(1);
        while self.points.len() > self.bound {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_BOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SystemStats;

    fn snap(cpu: f64) -> Snapshot {
        Snapshot {
            system: SystemStats {
                cpu_percent: cpu,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn fill(h: &mut History, n: usize) {
        for i in 0..n {
            h.record_at(&snap(i as f64), format!("t{i}"));
        }
    }

    fn cpus(h: &History) -> Vec<f64> {
        h.iter().map(|p| p.cpu).collect()
    }

    #[test]
    fn holds_min_of_inserted_and_bound_newest_last() {
        for (n, bound) in [(0, 5), (3, 5), (5, 5), (12, 5), (200, 50)] {
            let mut h = History::new(bound);
            fill(&mut h, n);
            assert_eq!(h.len(), n.min(bound));
            let expected: Vec<f64> = (n.saturating_sub(bound)..n).map(|i| i as f64).collect();
            assert_eq!(cpus(&h), expected, "n={n} bound={bound}");
        }
    }

    #[test]
    fn never_exceeds_bound_while_recording() {
        let mut h = History::new(7);
        for i in 0..30 {
            h.record_at(&snap(i as f64), String::new());
            assert!(h.len() <= 7);
        }
    }

    #[test]
    fn shrinking_truncates_to_newest() {
        let mut h = History::new(50);
        fill(&mut h, 30);
        h.set_bound(20);
        assert_eq!(h.len(), 20);
        assert_eq!(h.iter().next().unwrap().timestamp, "t10");
        assert_eq!(h.latest().unwrap().timestamp, "t29");
    }

    #[test]
    fn growing_does_not_restore_evicted_points() {
        let mut h = History::new(20);
        fill(&mut h, 40);
        h.set_bound(150);
        assert_eq!(h.len(), 20);
        assert_eq!(h.iter().next().unwrap().timestamp, "t20");
        h.record_at(&snap(99.0), "next".into());
        assert_eq!(h.len(), 21);
    }

    #[test]
    fn point_derives_every_field() {
        let mut s = snap(12.5);
        s.system.memory_percent = 40.0;
        s.system.disk_percent = 70.0;
        s.system.network_bytes_sent = 10;
        s.system.network_bytes_recv = 20;
        s.app.memory_usage_mb = 88.0;
        s.app.cpu_percent = 2.5;
        s.app.active_connections = 4;
        let p = HistoryPoint::from_snapshot(&s, "12:00:00".into());
        assert_eq!(
            p,
            HistoryPoint {
                timestamp: "12:00:00".into(),
                cpu: 12.5,
                memory: 40.0,
                disk: 70.0,
                app_memory: 88.0,
                app_cpu: 2.5,
                connections: 4,
                network_sent: 10,
                network_recv: 20,
            }
        );
    }

    #[test]
    fn record_stamps_wall_clock_time() {
        let mut h = History::default();
        h.record(&snap(1.0));
        let ts = &h.latest().unwrap().timestamp;
        assert_eq!(ts.len(), 8);
        assert_eq!(ts.matches(':').count(), 2);
    }

    #[test]
    fn time_range_bounds_and_parsing() {
        assert_eq!("1m".parse::<TimeRange>().unwrap().bound(), 20);
        assert_eq!("5m".parse::<TimeRange>().unwrap().bound(), 50);
        assert_eq!("15m".parse::<TimeRange>().unwrap().bound(), 150);
        assert!("1h".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::bound_for("1h"), 50);
        assert_eq!(TimeRange::bound_for("15m"), 150);
        assert_eq!(TimeRange::default(), TimeRange::FiveMinutes);
    }
}
