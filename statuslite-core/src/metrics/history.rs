use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const DEFAULT_HISTORY_CAPACITY: usize = 60;
pub const DEFAULT_TREND_WINDOW: usize = 5;

const MARKED_CHANGE_MB: f64 = 10.0;
const SLOW_CHANGE_MB: f64 = 2.0;

/// Bounded FIFO of resident-memory samples in MB, oldest first.
///
/// Cloning shares the same buffer.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    samples: Arc<RwLock<VecDeque<f64>>>,
    capacity: usize,
}

impl MemoryHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn push(&self, mb: f64) {
        let mut samples = self.samples.write().await;
        while samples.len() >= self.capacity {
            samples.pop_front();
        }
        samples.push_back(mb);
    }

    pub async fn samples(&self) -> Vec<f64> {
        self.samples.read().await.iter().copied().collect()
    }

    pub async fn len(&self) -> usize {
        self.samples.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.samples.read().await.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendBucket {
    Collecting,
    Stable,
    SlowIncrease,
    MarkedIncrease,
    SlowDecrease,
    MarkedDecrease,
}

impl TrendBucket {
    /// Classifies the difference between the newest and oldest window means.
    pub fn from_diff(diff: f64) -> Self {
        if diff > MARKED_CHANGE_MB {
            TrendBucket::MarkedIncrease
        } else if diff > SLOW_CHANGE_MB {
            TrendBucket::SlowIncrease
        } else if diff < -MARKED_CHANGE_MB {
            TrendBucket::MarkedDecrease
        } else if diff < -SLOW_CHANGE_MB {
            TrendBucket::SlowDecrease
        } else {
            TrendBucket::Stable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendBucket::Collecting => "collecting data...",
            TrendBucket::Stable => "stable",
            TrendBucket::SlowIncrease => "slow increase",
            TrendBucket::MarkedIncrease => "marked increase (possible leak)",
            TrendBucket::SlowDecrease => "slow decrease",
            TrendBucket::MarkedDecrease => "marked decrease",
        }
    }

    pub fn is_suspicious(&self) -> bool {
        matches!(self, TrendBucket::MarkedIncrease)
    }
}

impl std::fmt::Display for TrendBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryTrend {
    pub current: f64,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub sample_count: usize,
    pub bucket: TrendBucket,
}

impl MemoryTrend {
    /// Summarises a sample series. Returns `None` for an empty series.
    pub fn analyze(samples: &[f64], window: usize) -> Option<Self> {
        let current = *samples.last()?;
        let window = window.max(1);

        let mean = average(samples);
        let max = samples.iter().copied().fold(f64::MIN, f64::max);
        let min = samples.iter().copied().fold(f64::MAX, f64::min);

        let bucket = if samples.len() < window {
            TrendBucket::Collecting
        } else {
            let recent = average(&samples[samples.len() - window..]);
            let earliest = average(&samples[..window]);
            TrendBucket::from_diff(recent - earliest)
        };

        Some(Self {
            current,
            mean,
            max,
            min,
            sample_count: samples.len(),
            bucket,
        })
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
