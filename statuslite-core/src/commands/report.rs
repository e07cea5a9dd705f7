//! Plain-text renditions sent when an image is unavailable or not wanted.

use std::time::Duration;

use crate::metrics::{format_duration, DurationUnits, MemoryTrend, TrendBucket};
use crate::models::{MetricsSnapshot, SystemOverview};

const RULE: &str = "------------------";

pub fn status_report(snapshot: &MetricsSnapshot, units: &DurationUnits) -> String {
    let bot = &snapshot.bot;
    let system = &snapshot.overview.system;
    let resources = &snapshot.overview.resources;

    let lines = [
        "📊 Bot Status Report".to_string(),
        RULE.to_string(),
        format!("🤖 Account: {}", bot.identifier),
        format!("⏱️ Uptime: {}", bot.uptime_label(units)),
        format!("🧠 Memory: {:.1} MB", bot.memory_mb()),
        format!("🧵 Threads: {}", bot.threads_label()),
        RULE.to_string(),
        format!("💻 System: {}", system.os_full_version),
        format!("🦀 Runtime: {}", system.runtime_version),
        format!("⚙️ CPU: {:.1}%", resources.cpu_percent),
        format!(
            "💾 RAM: {}% ({:.1}/{:.1} GB)",
            resources.ram_percent, resources.ram_used_gb, resources.ram_total_gb
        ),
        RULE.to_string(),
        format!(
            "📦 Plugins: {}/{} enabled",
            snapshot.plugins.enabled, snapshot.plugins.loaded
        ),
    ];

    lines.join("\n")
}

/// Lists every disk, unlike the dashboard which caps the rows.
pub fn sysinfo_report(overview: &SystemOverview) -> String {
    let resources = &overview.resources;
    let mut lines = vec![
        "🖥️ System Overview".to_string(),
        format!("OS: {}", overview.system.os_full_version),
        format!("CPU: {:.1}%", resources.cpu_percent),
        format!(
            "RAM: {}% ({:.1}GB used)",
            resources.ram_percent, resources.ram_used_gb
        ),
        format!("Boot: {} ago", overview.system.boot_elapsed),
        String::new(),
        "💾 Disks".to_string(),
    ];

    if overview.disks.is_empty() {
        lines.push("No disk information available".to_string());
    }
    for disk in &overview.disks {
        lines.push(format!(
            "- {}: {}% ({:.1}GB free)",
            disk.mount_point, disk.percent, disk.free_gb
        ));
    }

    lines.join("\n")
}

fn trend_icon(bucket: TrendBucket) -> &'static str {
    match bucket {
        TrendBucket::Collecting => "🔄",
        TrendBucket::Stable => "➡️",
        TrendBucket::SlowIncrease | TrendBucket::MarkedIncrease => "↗️",
        TrendBucket::SlowDecrease | TrendBucket::MarkedDecrease => "↘️",
    }
}

pub fn memory_report(trend: &MemoryTrend, interval: Duration, units: &DurationUnits) -> String {
    let lines = [
        format!("🧠 Memory Analysis (last {} samples)", trend.sample_count),
        RULE.to_string(),
        format!("Current: {:.1} MB", trend.current),
        format!("Average: {:.1} MB", trend.mean),
        format!("Peak: {:.1} MB", trend.max),
        format!("Low: {:.1} MB", trend.min),
        format!("Trend: {} {}", trend_icon(trend.bucket), trend.bucket),
        RULE.to_string(),
        format!(
            "* Sampled automatically every {}",
            format_duration(interval.as_secs() as i64, units)
        ),
    ];

    lines.join("\n")
}

pub fn help_text() -> String {
    [
        "📋 Status Monitor Help",
        RULE,
        "/status  - dashboard image",
        "/sysinfo - system overview as text",
        "/mem     - memory trend analysis",
    ]
    .join("\n")
}
