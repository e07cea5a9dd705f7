mod collector;
mod disks;
mod format;
mod history;
mod sampler;

pub use collector::{full_os_version, runtime_version, SystemCollector};
pub use disks::{collect_disk_entries, DiskUsage, Partition, PartitionSource, SysinfoPartitions};
pub use format::{bytes_to_gb, bytes_to_mb, format_duration, percent_of, DurationUnits};
pub use history::{
    MemoryHistory, MemoryTrend, TrendBucket, DEFAULT_HISTORY_CAPACITY, DEFAULT_TREND_WINDOW,
};
pub use sampler::{MemoryProbe, MemorySampler, MemorySamplerConfig};
