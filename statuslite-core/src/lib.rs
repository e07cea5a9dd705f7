#![allow(
    clippy::too_many_arguments,
    clippy::manual_range_contains,
    clippy::derivable_impls
)]

pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod models;
pub mod plugin;
pub mod render;

pub use commands::{
    Command, CommandInfo, CommandOutcome, CommandRouter, HelpCommand, MemoryCommand,
    PermissionGate, StatusCommand, StatusServices, SysInfoCommand,
};
pub use config::{get_config_dir, Locale, StatusLiteConfig};
pub use error::{StatusError, StatusResult};
pub use host::{
    BotIdentity, ChatContext, ChatKind, ChatScope, HostServices, Invocation, MessageStatsSource,
    Messenger, MonitorStatsSource, PermissionChecker, PluginDirectory, PluginEntry,
};
pub use metrics::{
    format_duration, DurationUnits, MemoryHistory, MemoryProbe, MemorySampler,
    MemorySamplerConfig, MemoryTrend, PartitionSource, SystemCollector, TrendBucket,
};
pub use models::{
    BotInfo, BotStatus, DiskEntry, MessageStats, MetricsSnapshot, MonitorStats, PluginCounts,
    ProcessInfo, ResourceUsage, SystemInfo, SystemOverview,
};
pub use plugin::{PermissionNode, Plugin, PluginInfo, StatusLitePlugin, ACCESS_NODE, PLUGIN_NAME};
pub use render::{Dashboard, DashboardRenderer};
