//! Chart data models rebuilt from the history buffer on every redraw.

use crate::history::History;

/// Nominal budget for the resource view: three 0..100 scales stacked together.
pub const RESOURCE_BUDGET: f64 = 300.0;

pub const RESOURCE_LABELS: [&str; 4] = ["CPU", "Memory", "Disk", "Available"];

pub fn resource_available(cpu: f64, memory: f64, disk: f64) -> f64 {
    (RESOURCE_BUDGET - (cpu + memory + disk)).max(0.0)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceChart {
    pub labels: Vec<String>,
    pub cpu: Vec<f64>,
    pub memory: Vec<f64>,
    pub disk: Vec<f64>,
    // secondary axis, MB
    pub app_memory: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceChart {
    pub labels: Vec<&'static str>,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppPerformanceChart {
    pub labels: Vec<String>,
    pub app_cpu: Vec<f64>,
    // secondary axis
    pub connections: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkChart {
    pub labels: Vec<String>,
    pub sent: Vec<f64>,
    pub recv: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSet {
    pub performance: PerformanceChart,
    pub resource: ResourceChart,
    pub app: AppPerformanceChart,
    pub network: NetworkChart,
}

impl ChartSet {
    /// Replace every chart's arrays from `history`.
    pub fn redraw(&mut self, history: &History) {
        let labels: Vec<String> = history.iter().map(|p| p.timestamp.clone()).collect();

        self.performance = PerformanceChart {
            labels: labels.clone(),
            cpu: history.iter().map(|p| p.cpu).collect(),
            memory: history.iter().map(|p| p.memory).collect(),
            disk: history.iter().map(|p| p.disk).collect(),
            app_memory: history.iter().map(|p| p.app_memory).collect(),
        };

        self.resource = match history.latest() {
            Some(p) => ResourceChart {
                labels: RESOURCE_LABELS.to_vec(),
                data: vec![
                    p.cpu,
                    p.memory,
                    p.disk,
                    resource_available(p.cpu, p.memory, p.disk),
                ],
            },
            None => ResourceChart::default(),
        };

        self.app = AppPerformanceChart {
            labels: labels.clone(),
            app_cpu: history.iter().map(|p| p.app_cpu).collect(),
            connections: history.iter().map(|p| p.connections as f64).collect(),
        };

        self.network = NetworkChart {
            labels,
            sent: history.iter().map(|p| p.network_sent as f64).collect(),
            recv: history.iter().map(|p| p.network_recv as f64).collect(),
        };
    }

    pub fn clear(&mut self) {
        *self = ChartSet::default();
    }

    pub fn is_empty(&self) -> bool {
        self.performance.labels.is_empty()
            && self.performance.cpu.is_empty()
            && self.performance.memory.is_empty()
            && self.performance.disk.is_empty()
            && self.performance.app_memory.is_empty()
            && self.resource.labels.is_empty()
            && self.resource.data.is_empty()
            && self.app.labels.is_empty()
            && self.app.app_cpu.is_empty()
            && self.app.connections.is_empty()
            && self.network.labels.is_empty()
            && self.network.sent.is_empty()
            && self.network.recv.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppStats, Snapshot, SystemStats};

    fn snap(cpu: f64, memory: f64, disk: f64) -> Snapshot {
        Snapshot {
            system: SystemStats {
                cpu_percent: cpu,
                memory_percent: memory,
                disk_percent: disk,
                network_bytes_sent: 1_000,
                network_bytes_recv: 2_000,
                ..Default::default()
            },
            app: AppStats {
                memory_usage_mb: 64.0,
                cpu_percent: 1.5,
                active_connections: 7,
                ..Default::default()
            },
            performance: None,
            errors: None,
        }
    }

    #[test]
    fn available_is_remainder_of_300_budget() {
        assert_eq!(resource_available(40.0, 30.0, 10.0), 220.0);
        assert_eq!(resource_available(100.0, 100.0, 100.0), 0.0);
        assert_eq!(resource_available(150.0, 100.0, 100.0), 0.0);
    }

    #[test]
    fn redraw_mirrors_history() {
        let mut h = History::new(10);
        h.record_at(&snap(10.0, 20.0, 30.0), "a".into());
        h.record_at(&snap(40.0, 30.0, 10.0), "b".into());
        let mut c = ChartSet::default();
        c.redraw(&h);

        assert_eq!(c.performance.labels, vec!["a", "b"]);
        assert_eq!(c.performance.cpu, vec![10.0, 40.0]);
        assert_eq!(c.performance.app_memory, vec![64.0, 64.0]);
        assert_eq!(c.app.connections, vec![7.0, 7.0]);
        assert_eq!(c.network.recv, vec![2_000.0, 2_000.0]);
        assert_eq!(c.network.labels, c.performance.labels);
        // resource view only looks at the newest point
        assert_eq!(c.resource.labels, RESOURCE_LABELS.to_vec());
        assert_eq!(c.resource.data, vec![40.0, 30.0, 10.0, 220.0]);
    }

    #[test]
    fn redraw_replaces_rather_than_appends() {
        let mut h = History::new(3);
        let mut c = ChartSet::default();
        for i in 0..6 {
            h.record_at(&snap(i as f64, 0.0, 0.0), i.to_string());
            c.redraw(&h);
        }
        assert_eq!(c.performance.labels, vec!["3", "4", "5"]);
        assert_eq!(c.performance.cpu.len(), 3);
    }

    #[test]
    fn clear_empties_every_array() {
        let mut h = History::new(5);
        h.record_at(&snap(1.0, 2.0, 3.0), "a".into());
        let mut c = ChartSet::default();
        c.redraw(&h);
        assert!(!c.is_empty());
        c.clear();
        assert!(c.is_empty());
    }

    #[test]
    fn empty_history_gives_empty_charts() {
        let mut c = ChartSet::default();
        c.redraw(&History::new(5));
        assert!(c.is_empty());
    }
}
