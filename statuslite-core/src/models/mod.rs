mod snapshot;

pub use snapshot::{
    BotInfo, BotStatus, DiskEntry, MessageStats, MetricsSnapshot, MonitorStats, PluginCounts,
    ProcessInfo, ResourceUsage, SystemInfo, SystemOverview, NOT_AVAILABLE,
};
