use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::{format_duration, DurationUnits};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os_name: String,
    pub os_version: String,
    pub os_full_version: String,
    pub runtime_version: String,
    pub boot_elapsed: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            os_name: NOT_AVAILABLE.to_string(),
            os_version: String::new(),
            os_full_version: NOT_AVAILABLE.to_string(),
            runtime_version: NOT_AVAILABLE.to_string(),
            boot_elapsed: NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub cpu_percent: f32,
    pub ram_percent: f64,
    pub ram_used_gb: f64,
    pub ram_total_gb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskEntry {
    pub mount_point: String,
    pub percent: f64,
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
}

/// Host-level data shared by the full snapshot and the `sysinfo` report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemOverview {
    pub system: SystemInfo,
    pub resources: ResourceUsage,
    pub disks: Vec<DiskEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub memory_mb: f64,
    /// Not every platform reports a thread count.
    pub threads: Option<usize>,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum BotStatus {
    Running,
    #[default]
    Unknown,
}

impl BotStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, BotStatus::Running)
    }
}

impl std::fmt::Display for BotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotStatus::Running => write!(f, "Running"),
            BotStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotInfo {
    pub process: Option<ProcessInfo>,
    pub status: BotStatus,
    pub identifier: String,
}

impl BotInfo {
    pub fn pid_label(&self) -> String {
        self.process
            .as_ref()
            .map(|p| p.pid.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn memory_mb(&self) -> f64 {
        self.process.as_ref().map(|p| p.memory_mb).unwrap_or(0.0)
    }

    pub fn threads_label(&self) -> String {
        self.process
            .as_ref()
            .and_then(|p| p.threads)
            .map(|t| t.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn uptime_label(&self, units: &DurationUnits) -> String {
        let secs = self.process.as_ref().map(|p| p.uptime_secs).unwrap_or(0);
        format_duration(secs as i64, units)
    }
}

/// Counters published by an external supervisor process, if the host has one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorStats {
    pub running: bool,
    pub duration_secs: Option<u64>,
    pub total_restarts: u32,
    pub memory_leak_restarts: u32,
    pub crash_count: u32,
    /// Zero disables scheduled restarts.
    pub auto_restart_interval_secs: u64,
}

impl MonitorStats {
    pub fn auto_restart_label(&self) -> String {
        if self.auto_restart_interval_secs > 0 {
            format!("every {} min", self.auto_restart_interval_secs / 60)
        } else {
            "disabled".to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStats {
    pub received_24h: u64,
    pub sent_24h: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCounts {
    pub loaded: usize,
    pub enabled: usize,
}

/// Everything the `status` command shows, collected once per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub taken_at: DateTime<Local>,
    pub overview: SystemOverview,
    pub bot: BotInfo,
    pub monitor: Option<MonitorStats>,
    pub messages: Option<MessageStats>,
    pub plugins: PluginCounts,
}

impl MetricsSnapshot {
    pub fn new(overview: SystemOverview, bot: BotInfo) -> Self {
        Self {
            taken_at: Local::now(),
            overview,
            bot,
            monitor: None,
            messages: None,
            plugins: PluginCounts::default(),
        }
    }

    pub fn with_plugins(mut self, plugins: PluginCounts) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_monitor(mut self, monitor: Option<MonitorStats>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn with_messages(mut self, messages: Option<MessageStats>) -> Self {
        self.messages = messages;
        self
    }

    pub fn monitor_or_default(&self) -> MonitorStats {
        self.monitor.clone().unwrap_or_default()
    }

    pub fn messages_or_default(&self) -> MessageStats {
        self.messages.unwrap_or_default()
    }
}
