//! Types that mirror the backend's `/api/dashboard-data` JSON schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

// `null` and a missing key both read as 0
fn null_as_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(0.0))
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SystemStats {
    pub cpu_percent: f64,
    pub cpu_count: u32,
    pub cpu_freq_current: f64,
    #[serde(default)]
    pub cpu_freq_max: f64,
    pub memory_percent: f64,
    pub memory_used_gb: f64,
    pub memory_total_gb: f64,
    #[serde(default)]
    pub memory_available_gb: f64,
    pub disk_percent: f64,
    pub disk_used_gb: f64,
    pub disk_total_gb: f64,
    #[serde(default)]
    pub disk_free_gb: f64,
    // cumulative counters since boot; plotted raw
    pub network_bytes_sent: u64,
    pub network_bytes_recv: u64,
    #[serde(default)]
    pub network_packets_sent: u64,
    #[serde(default)]
    pub network_packets_recv: u64,
    pub hostname: String,
    pub platform: String,
    pub python_version: String,
    pub uptime_seconds: f64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppStats {
    pub total_users: u64,
    pub total_requests: u64,
    pub threads_count: u32,
    pub memory_usage_mb: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub cpu_percent: f64,
    pub active_connections: u32,
    pub uptime_seconds: f64,
    #[serde(default)]
    pub process_id: Option<u32>,
    #[serde(default)]
    pub open_files: Option<u32>,
    #[serde(default)]
    pub memory_usage_percent: Option<f64>,
    #[serde(default)]
    pub health_check_failures: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Performance {
    #[serde(default)]
    pub load_average: Vec<f64>,
}

/// Error-simulation switches of the backend, keyed by scenario name.
/// The dashboard payload and `/api/error-stats` name the two maps differently.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ErrorSimulations {
    #[serde(default, alias = "api_errors")]
    pub api_simulation: BTreeMap<String, bool>,
    #[serde(default, alias = "health_errors")]
    pub health_simulation: BTreeMap<String, bool>,
}

impl ErrorSimulations {
    /// Names of the scenarios currently switched on, api first.
    pub fn active(&self) -> Vec<&str> {
        self.api_simulation
            .iter()
            .chain(self.health_simulation.iter())
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub system: SystemStats,
    pub app: AppStats,
    #[serde(default)]
    pub performance: Option<Performance>,
    #[serde(default)]
    pub errors: Option<ErrorSimulations>,
}

/// Reply of `/api/simulate-work`. Only success matters; the rest is cosmetic.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct WorkResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub processing_time: Option<String>,
}

/// Reply of `POST /api/load-test`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoadTestResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub operations: Option<u64>,
}

/// Reply of `/api/error-stats`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ErrorStats {
    #[serde(default)]
    pub health_check_failures: u64,
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub simulation_status: ErrorSimulations,
}
