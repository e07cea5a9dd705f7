use std::collections::HashMap;
use sysinfo::Disks;
use tracing::{debug, trace};

use crate::error::{StatusError, StatusResult};
use crate::models::DiskEntry;

use super::format::{bytes_to_gb, percent_of};

/// Filesystems that only ever back optical media.
const OPTICAL_FILESYSTEMS: &[&str] = &["iso9660", "udf", "cd9660", "cdfs"];
const CDROM_OPTION: &str = "cdrom";

/// A mounted partition as reported by the operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub mount_point: String,
    pub fs_type: String,
    pub options: Vec<String>,
}

impl Partition {
    pub fn new(mount_point: impl Into<String>, fs_type: impl Into<String>) -> Self {
        Self {
            mount_point: mount_point.into(),
            fs_type: fs_type.into(),
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn is_optical(&self) -> bool {
        self.options
            .iter()
            .any(|o| o.to_lowercase().contains(CDROM_OPTION))
    }

    /// Partitions without a filesystem type or on optical media are not reported.
    pub fn is_eligible(&self) -> bool {
        !self.fs_type.is_empty() && !self.is_optical()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

impl DiskUsage {
    pub fn to_entry(&self, mount_point: &str) -> DiskEntry {
        DiskEntry {
            mount_point: mount_point.to_string(),
            percent: percent_of(self.used, self.used + self.free),
            total_gb: bytes_to_gb(self.total),
            used_gb: bytes_to_gb(self.used),
            free_gb: bytes_to_gb(self.free),
        }
    }
}

/// Enumerates partitions and answers capacity queries for them.
pub trait PartitionSource: Send + Sync {
    fn partitions(&self) -> Vec<Partition>;

    fn usage(&self, partition: &Partition) -> StatusResult<DiskUsage>;
}

/// Collects usage for every eligible partition. A failed usage query skips
/// that partition only.
pub fn collect_disk_entries(source: &dyn PartitionSource) -> Vec<DiskEntry> {
    let mut entries = Vec::new();

    for partition in source.partitions() {
        if !partition.is_eligible() {
            trace!(
                mount_point = %partition.mount_point,
                fs_type = %partition.fs_type,
                "Skipping ineligible partition"
            );
            continue;
        }

        match source.usage(&partition) {
            Ok(usage) => entries.push(usage.to_entry(&partition.mount_point)),
            Err(e) => {
                debug!(mount_point = %partition.mount_point, error = %e, "Disk usage query failed");
            }
        }
    }

    entries
}

/// [`PartitionSource`] backed by `sysinfo::Disks`.
pub struct SysinfoPartitions {
    usages: HashMap<String, DiskUsage>,
    partitions: Vec<Partition>,
}

impl SysinfoPartitions {
    pub fn refreshed() -> Self {
        let disks = Disks::new_with_refreshed_list();
        let mount_options = read_mount_options();

        let mut usages = HashMap::new();
        let mut partitions = Vec::new();

        for disk in disks.list() {
            let mount_point = disk.mount_point().to_string_lossy().to_string();
            let fs_type = disk.file_system().to_string_lossy().to_string();

            let mut partition = Partition::new(mount_point.clone(), fs_type.clone());
            if let Some(options) = mount_options.get(&mount_point) {
                partition.options = options.clone();
            }
            if OPTICAL_FILESYSTEMS.contains(&fs_type.to_lowercase().as_str()) {
                partition.options.push(CDROM_OPTION.to_string());
            }

            let total = disk.total_space();
            let free = disk.available_space().min(total);
            usages.insert(
                mount_point,
                DiskUsage {
                    total,
                    used: total - free,
                    free,
                },
            );
            partitions.push(partition);
        }

        Self { usages, partitions }
    }
}

impl PartitionSource for SysinfoPartitions {
    fn partitions(&self) -> Vec<Partition> {
        self.partitions.clone()
    }

    fn usage(&self, partition: &Partition) -> StatusResult<DiskUsage> {
        match self.usages.get(&partition.mount_point) {
            Some(usage) if usage.total > 0 => Ok(*usage),
            Some(_) => Err(StatusError::MetricsCollectionFailed(format!(
                "{} reports zero capacity",
                partition.mount_point
            ))),
            None => Err(StatusError::MetricsCollectionFailed(format!(
                "{} is no longer mounted",
                partition.mount_point
            ))),
        }
    }
}

#[cfg(target_os = "linux")]
fn read_mount_options() -> HashMap<String, Vec<String>> {
    std::fs::read_to_string("/proc/self/mounts")
        .map(|content| parse_mount_table(&content))
        .unwrap_or_default()
}

#[cfg(not(target_os = "linux"))]
fn read_mount_options() -> HashMap<String, Vec<String>> {
    HashMap::new()
}

/// Parses `/proc/mounts` lines: `device mount_point fs_type options dump pass`.
fn parse_mount_table(content: &str) -> HashMap<String, Vec<String>> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let _device = fields.next()?;
            let mount_point = fields.next()?.replace("\\040", " ");
            let _fs_type = fields.next()?;
            let options = fields.next()?.split(',').map(str::to_string).collect();
            Some((mount_point, options))
        })
        .collect()
}
