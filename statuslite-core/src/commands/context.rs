use std::sync::Arc;
use tracing::debug;

use crate::config::StatusLiteConfig;
use crate::error::StatusResult;
use crate::host::{HostServices, Invocation};
use crate::metrics::{
    DurationUnits, MemorySampler, MemorySamplerConfig, MemoryTrend, SystemCollector,
    DEFAULT_TREND_WINDOW,
};
use crate::models::{BotInfo, BotStatus, MetricsSnapshot, SystemOverview};
use crate::render::{Dashboard, DashboardRenderer};

/// Everything a command handler needs: the host boundary, the collectors,
/// the shared memory history and the renderer.
#[derive(Clone)]
pub struct StatusServices {
    pub host: HostServices,
    pub collector: SystemCollector,
    pub sampler: Arc<MemorySampler>,
    pub renderer: Arc<dyn DashboardRenderer>,
    pub units: DurationUnits,
    pub trend_window: usize,
}

impl StatusServices {
    pub fn new(host: HostServices, config: &StatusLiteConfig) -> Self {
        let units = config.duration_units();
        let collector = SystemCollector::new().with_units(units.clone());
        let sampler = MemorySampler::new(
            Arc::new(collector.clone()),
            MemorySamplerConfig::from(&config.sampler),
        );
        let renderer = Dashboard::new(&config.render).with_units(units.clone());

        Self {
            host,
            collector,
            sampler: Arc::new(sampler),
            renderer: Arc::new(renderer),
            units,
            trend_window: config.sampler.trend_window,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn DashboardRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_sampler(mut self, sampler: Arc<MemorySampler>) -> Self {
        self.sampler = sampler;
        self
    }

    pub async fn reply(&self, invocation: &Invocation, text: &str) -> StatusResult<()> {
        self.host.messenger.send_text(&invocation.chat, text).await
    }

    pub async fn reply_image(&self, invocation: &Invocation, base64_png: &str) -> StatusResult<()> {
        self.host
            .messenger
            .send_image(&invocation.chat, base64_png)
            .await
    }

    pub async fn overview(&self) -> SystemOverview {
        self.collector.collect_overview().await
    }

    /// Collects the full snapshot shown by `status`.
    pub async fn snapshot(&self) -> MetricsSnapshot {
        let overview = self.overview().await;
        let process = self.collector.collect_process().await;

        let status = if process.is_some() {
            BotStatus::Running
        } else {
            BotStatus::Unknown
        };
        let bot = BotInfo {
            process,
            status,
            identifier: self.host.identity.identifier.clone(),
        };

        let snapshot = MetricsSnapshot::new(overview, bot)
            .with_plugins(self.host.plugin_counts().await)
            .with_monitor(self.host.monitor_stats().await)
            .with_messages(self.host.message_stats().await);

        debug!(
            disks = snapshot.overview.disks.len(),
            plugins = snapshot.plugins.loaded,
            "Status snapshot collected"
        );

        snapshot
    }

    /// Current memory trend, sampling once first if the history is empty.
    pub async fn memory_trend(&self) -> Option<MemoryTrend> {
        self.sampler.ensure_sampled().await;
        let samples = self.sampler.history().samples().await;
        MemoryTrend::analyze(&samples, self.window())
    }

    fn window(&self) -> usize {
        if self.trend_window == 0 {
            DEFAULT_TREND_WINDOW
        } else {
            self.trend_window
        }
    }
}
