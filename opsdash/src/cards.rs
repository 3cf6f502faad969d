//! Metric card readouts: named display slots filled from a snapshot.
//!
//! A view registers the slots it actually shows; writes to any other slot are
//! dropped, so every view can be fed the same `render` call.

use std::collections::BTreeMap;

use crate::format::{count, format_bytes, format_uptime, gigabytes, percent};
use crate::types::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    StatusBadge,
    CpuUsage,
    CpuDetails,
    MemoryUsage,
    MemoryDetails,
    DiskUsage,
    DiskDetails,
    NetworkUsage,
    NetworkDetails,
    TotalUsers,
    TotalRequests,
    RequestsDetails,
    Hostname,
    Platform,
    PythonVersion,
    SystemUptime,
    AppUptime,
    ResourceCpu,
    ResourceMemory,
    ResourceDisk,
    ErrorSimulations,
}

impl Slot {
    pub const ALL: [Slot; 21] = [
        Slot::StatusBadge,
        Slot::CpuUsage,
        Slot::CpuDetails,
        Slot::MemoryUsage,
        Slot::MemoryDetails,
        Slot::DiskUsage,
        Slot::DiskDetails,
        Slot::NetworkUsage,
        Slot::NetworkDetails,
        Slot::TotalUsers,
        Slot::TotalRequests,
        Slot::RequestsDetails,
        Slot::Hostname,
        Slot::Platform,
        Slot::PythonVersion,
        Slot::SystemUptime,
        Slot::AppUptime,
        Slot::ResourceCpu,
        Slot::ResourceMemory,
        Slot::ResourceDisk,
        Slot::ErrorSimulations,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Slot::StatusBadge => "status-badge",
            Slot::CpuUsage => "cpu-usage",
            Slot::CpuDetails => "cpu-details",
            Slot::MemoryUsage => "memory-usage",
            Slot::MemoryDetails => "memory-details",
            Slot::DiskUsage => "disk-usage",
            Slot::DiskDetails => "disk-details",
            Slot::NetworkUsage => "network-usage",
            Slot::NetworkDetails => "network-details",
            Slot::TotalUsers => "total-users",
            Slot::TotalRequests => "total-requests",
            Slot::RequestsDetails => "requests-details",
            Slot::Hostname => "hostname",
            Slot::Platform => "platform",
            Slot::PythonVersion => "python-version",
            Slot::SystemUptime => "system-uptime",
            Slot::AppUptime => "app-uptime",
            Slot::ResourceCpu => "resource-cpu",
            Slot::ResourceMemory => "resource-memory",
            Slot::ResourceDisk => "resource-disk",
            Slot::ErrorSimulations => "error-simulations",
        }
    }

    pub fn from_id(id: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|s| s.id() == id)
    }
}

/// Connection state shown in the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Connecting,
    Live,
    ConnectionError,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Connecting => "Connecting",
            Status::Live => "Live",
            Status::ConnectionError => "Connection Error",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Readouts {
    slots: BTreeMap<Slot, String>,
}

impl Readouts {
    /// Readouts for a view showing exactly `slots`.
    pub fn with_slots(slots: &[Slot]) -> Self {
        Self {
            slots: slots.iter().map(|s| (*s, String::new())).collect(),
        }
    }

    pub fn full() -> Self {
        Self::with_slots(&Slot::ALL)
    }

    pub fn has(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }

    /// Write `text` into `slot` if this view has it. Returns whether it landed.
    pub fn set(&mut self, slot: Slot, text: impl Into<String>) -> bool {
        match self.slots.get_mut(&slot) {
            Some(v) => {
                *v = text.into();
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, status: Status) {
        self.set(Slot::StatusBadge, status.label());
    }

    pub fn render(&mut self, snap: &Snapshot) {
        let sys = &snap.system;
        let app = &snap.app;

        self.set(Slot::CpuUsage, percent(sys.cpu_percent));
        let mut cpu = format!("{} cores @ {:.0} MHz", sys.cpu_count, sys.cpu_freq_current);
        if sys.cpu_freq_max > 0.0 {
            cpu.push_str(&format!(" (max {:.0})", sys.cpu_freq_max));
        }
        self.set(Slot::CpuDetails, cpu);

        self.set(Slot::MemoryUsage, percent(sys.memory_percent));
        let mut mem = format!(
            "{} / {}",
            gigabytes(sys.memory_used_gb),
            gigabytes(sys.memory_total_gb)
        );
        if sys.memory_available_gb > 0.0 {
            mem.push_str(&format!(" · {} avail", gigabytes(sys.memory_available_gb)));
        }
        self.set(Slot::MemoryDetails, mem);

        self.set(Slot::DiskUsage, percent(sys.disk_percent));
        let mut disk = format!(
            "{} / {}",
            gigabytes(sys.disk_used_gb),
            gigabytes(sys.disk_total_gb)
        );
        if sys.disk_free_gb > 0.0 {
            disk.push_str(&format!(" · {} free", gigabytes(sys.disk_free_gb)));
        }
        self.set(Slot::DiskDetails, disk);
        self.set(
            Slot::NetworkUsage,
            format_bytes(sys.network_bytes_sent.saturating_add(sys.network_bytes_recv)),
        );
        let mut net = format!(
            "↑ {}  ↓ {}",
            format_bytes(sys.network_bytes_sent),
            format_bytes(sys.network_bytes_recv)
        );
        if sys.network_packets_sent > 0 || sys.network_packets_recv > 0 {
            net.push_str(&format!(
                " · {}/{} pkts",
                count(sys.network_packets_sent),
                count(sys.network_packets_recv)
            ));
        }
        self.set(Slot::NetworkDetails, net);
        self.set(Slot::TotalUsers, count(app.total_users));
        self.set(Slot::TotalRequests, count(app.total_requests));
        let mut req = format!(
            "{} threads · {} connections · {:.1} MB",
            app.threads_count, app.active_connections, app.memory_usage_mb
        );
        if let Some(p) = app.memory_usage_percent {
            req.push_str(&format!(" ({p:.1}%)"));
        }
        if let Some(pid) = app.process_id {
            req.push_str(&format!(" · pid {pid}"));
        }
        if let Some(n) = app.open_files {
            req.push_str(&format!(" · {n} open files"));
        }
        if let Some(n) = app.health_check_failures {
            req.push_str(&format!(" · {n} health failures"));
        }
        self.set(Slot::RequestsDetails, req);
        self.set(Slot::Hostname, sys.hostname.clone());
        self.set(Slot::Platform, sys.platform.clone());
        self.set(Slot::PythonVersion, sys.python_version.clone());
        self.set(Slot::SystemUptime, format_uptime(sys.uptime_seconds));
        self.set(Slot::AppUptime, format_uptime(app.uptime_seconds));
        self.set(Slot::ResourceCpu, percent(sys.cpu_percent));
        self.set(Slot::ResourceMemory, percent(sys.memory_percent));
        self.set(Slot::ResourceDisk, percent(sys.disk_percent));

        let active = snap
            .errors
            .as_ref()
            .map(|e| e.active().join(", "))
            .unwrap_or_default();
        self.set(
            Slot::ErrorSimulations,
            if active.is_empty() { "none".to_string() } else { active },
        );
    }
}
