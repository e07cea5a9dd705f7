use chrono::{DateTime, Utc};
use std::sync::Arc;
use sysinfo::{
    CpuRefreshKind, MemoryRefreshKind, Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind,
    System,
};
use tokio::sync::RwLock;
use tracing::{trace, warn};

use crate::error::{StatusError, StatusResult};
use crate::models::{
    DiskEntry, ProcessInfo, ResourceUsage, SystemInfo, SystemOverview, NOT_AVAILABLE,
};

use super::disks::{collect_disk_entries, SysinfoPartitions};
use super::format::{bytes_to_gb, bytes_to_mb, format_duration, percent_of, DurationUnits};

pub struct SystemCollector {
    system: Arc<RwLock<System>>,
    units: DurationUnits,
}

impl SystemCollector {
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        Self {
            system: Arc::new(RwLock::new(system)),
            units: DurationUnits::default(),
        }
    }

    /// Units used for the boot-elapsed label.
    pub fn with_units(mut self, units: DurationUnits) -> Self {
        self.units = units;
        self
    }

    pub fn collect_system(&self) -> SystemInfo {
        let name = System::name().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let release = System::os_version().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let kernel = System::kernel_version().unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let os_full_version = full_os_version(
            &name,
            &release,
            &kernel,
            std::env::consts::ARCH,
            cfg!(target_os = "windows"),
        );

        SystemInfo {
            os_name: name,
            os_version: release,
            os_full_version,
            runtime_version: runtime_version(),
            boot_elapsed: format_duration(System::uptime() as i64, &self.units),
        }
    }

    /// CPU usage is the delta since the previous call on this collector.
    pub async fn collect_resources(&self) -> ResourceUsage {
        let mut system = self.system.write().await;

        system.refresh_cpu_usage();
        system.refresh_memory();

        let used = system.used_memory();
        let total = system.total_memory();

        let usage = ResourceUsage {
            cpu_percent: system.global_cpu_usage(),
            ram_percent: percent_of(used, total),
            ram_used_gb: bytes_to_gb(used),
            ram_total_gb: bytes_to_gb(total),
        };

        trace!(
            cpu_percent = usage.cpu_percent,
            ram_percent = usage.ram_percent,
            "Resource usage collected"
        );

        usage
    }

    pub fn collect_disks(&self) -> Vec<DiskEntry> {
        let source = SysinfoPartitions::refreshed();
        collect_disk_entries(&source)
    }

    pub async fn collect_overview(&self) -> SystemOverview {
        SystemOverview {
            system: self.collect_system(),
            resources: self.collect_resources().await,
            disks: self.collect_disks(),
        }
    }

    /// Details of the current process, `None` when the lookup fails.
    pub async fn collect_process(&self) -> Option<ProcessInfo> {
        match self.current_process().await {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(error = %e, "Could not inspect current process");
                None
            }
        }
    }

    pub async fn resident_memory_mb(&self) -> StatusResult<f64> {
        let pid = current_pid()?;
        let mut system = self.system.write().await;
        refresh_process(&mut system, pid);

        system
            .process(pid)
            .map(|p| bytes_to_mb(p.memory()))
            .ok_or_else(|| StatusError::ProcessNotFound(pid.to_string()))
    }

    async fn current_process(&self) -> StatusResult<ProcessInfo> {
        let pid = current_pid()?;
        let mut system = self.system.write().await;
        refresh_process(&mut system, pid);

        let process = system
            .process(pid)
            .ok_or_else(|| StatusError::ProcessNotFound(pid.to_string()))?;

        let started_at = DateTime::<Utc>::from_timestamp(process.start_time() as i64, 0)
            .unwrap_or_else(Utc::now);

        Ok(ProcessInfo {
            pid: pid.as_u32(),
            memory_mb: bytes_to_mb(process.memory()),
            threads: process.tasks().map(|tasks| tasks.len()),
            started_at,
            uptime_secs: process.run_time(),
        })
    }
}

impl Default for SystemCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SystemCollector {
    fn clone(&self) -> Self {
        Self {
            system: Arc::clone(&self.system),
            units: self.units.clone(),
        }
    }
}

fn current_pid() -> StatusResult<Pid> {
    sysinfo::get_current_pid().map_err(|e| StatusError::ProcessNotFound(e.to_string()))
}

fn refresh_process(system: &mut System, pid: Pid) {
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::everything(),
    );
}

/// Windows reports `"{release} (Build {build})"`, every other platform a
/// `"{name}-{kernel}-{arch}"` descriptor.
pub fn full_os_version(
    name: &str,
    release: &str,
    kernel: &str,
    arch: &str,
    windows: bool,
) -> String {
    if windows {
        format!("{} (Build {})", release, kernel)
    } else {
        format!("{}-{}-{}", name, kernel, arch)
    }
}

pub fn runtime_version() -> String {
    format!(
        "{} ({}-{})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::ARCH,
        std::env::consts::OS
    )
}
