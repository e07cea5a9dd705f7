use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{StatusError, StatusResult};

use super::collector::SystemCollector;
use super::history::{MemoryHistory, DEFAULT_HISTORY_CAPACITY};

const DEFAULT_SAMPLE_INTERVAL_SECS: u64 = 60;

/// Reports the resident memory of the monitored process.
#[async_trait]
pub trait MemoryProbe: Send + Sync {
    async fn resident_memory_mb(&self) -> StatusResult<f64>;
}

#[async_trait]
impl MemoryProbe for SystemCollector {
    async fn resident_memory_mb(&self) -> StatusResult<f64> {
        SystemCollector::resident_memory_mb(self).await
    }
}

#[derive(Debug, Clone)]
pub struct MemorySamplerConfig {
    pub interval: Duration,
    pub capacity: usize,
}

impl Default for MemorySamplerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_SAMPLE_INTERVAL_SECS),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MemorySamplerConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl From<&crate::config::SamplerConfig> for MemorySamplerConfig {
    fn from(config: &crate::config::SamplerConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            capacity: config.capacity,
        }
    }
}

/// Appends one resident-memory sample to a [`MemoryHistory`] per interval.
pub struct MemorySampler {
    probe: Arc<dyn MemoryProbe>,
    history: MemoryHistory,
    config: MemorySamplerConfig,
    is_running: Arc<AtomicBool>,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
    task_handle: RwLock<Option<JoinHandle<()>>>,
}

impl MemorySampler {
    pub fn new(probe: Arc<dyn MemoryProbe>, config: MemorySamplerConfig) -> Self {
        let history = MemoryHistory::new(config.capacity);
        Self::with_history(probe, history, config)
    }

    /// Samples into an existing history, e.g. one shared with a command handler.
    pub fn with_history(
        probe: Arc<dyn MemoryProbe>,
        history: MemoryHistory,
        config: MemorySamplerConfig,
    ) -> Self {
        Self {
            probe,
            history,
            config,
            is_running: Arc::new(AtomicBool::new(false)),
            shutdown: Mutex::new(None),
            task_handle: RwLock::new(None),
        }
    }

    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }

    pub fn config(&self) -> &MemorySamplerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Takes one sample. Probe failures are logged and leave the history untouched.
    pub async fn sample_and_append(&self) {
        sample_into(self.probe.as_ref(), &self.history).await;
    }

    /// Samples once if nothing has been recorded yet.
    pub async fn ensure_sampled(&self) {
        if self.history.is_empty().await {
            self.sample_and_append().await;
        }
    }

    /// Spawns the sampling task. Start and stop are serialized on the task
    /// handle lock, so a concurrent `stop` always sees a complete task.
    pub async fn start(&self) {
        let mut task_handle = self.task_handle.write().await;
        if self.is_running.swap(true, Ordering::SeqCst) {
            warn!("Memory sampler is already running");
            return;
        }

        info!(
            interval_secs = self.config.interval.as_secs(),
            capacity = self.history.capacity(),
            "Starting memory sampler"
        );

        let (tx, mut rx) = watch::channel(false);
        if let Ok(mut shutdown) = self.shutdown.lock() {
            *shutdown = Some(tx);
        }

        let probe = Arc::clone(&self.probe);
        let history = self.history.clone();
        let interval = self.config.interval;

        *task_handle = Some(tokio::spawn(async move {
            loop {
                sample_into(probe.as_ref(), &history).await;

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = rx.changed() => break,
                }
            }

            info!("Memory sampler task stopped");
        }));
    }

    pub async fn stop(&self) -> StatusResult<()> {
        let mut task_handle = self.task_handle.write().await;
        if !self.is_running.swap(false, Ordering::SeqCst) {
            return Err(StatusError::SamplerNotRunning);
        }

        info!("Stopping memory sampler...");
        self.signal_shutdown();

        if let Some(handle) = task_handle.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "Error waiting for memory sampler task to stop");
            }
        }

        Ok(())
    }

    fn signal_shutdown(&self) {
        if let Ok(mut shutdown) = self.shutdown.lock() {
            if let Some(tx) = shutdown.take() {
                let _ = tx.send(true);
            }
        }
    }
}

impl Drop for MemorySampler {
    fn drop(&mut self) {
        if self.is_running.swap(false, Ordering::SeqCst) {
            self.signal_shutdown();
        }
    }
}

async fn sample_into(probe: &dyn MemoryProbe, history: &MemoryHistory) {
    match probe.resident_memory_mb().await {
        Ok(mb) => {
            history.push(mb).await;
            debug!(memory_mb = mb, "Memory sample recorded");
        }
        Err(e) => e.log(),
    }
}
