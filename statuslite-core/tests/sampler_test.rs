use async_trait::async_trait;
use statuslite_core::error::{StatusError, StatusResult};
use statuslite_core::metrics::{
    MemoryHistory, MemoryProbe, MemorySampler, MemorySamplerConfig, MemoryTrend, SystemCollector,
    TrendBucket,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct SteppingProbe {
    calls: AtomicUsize,
    fail_every: Option<usize>,
}

impl SteppingProbe {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_every: None,
        }
    }

    fn failing_every(n: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_every: Some(n),
        }
    }
}

#[async_trait]
impl MemoryProbe for SteppingProbe {
    async fn resident_memory_mb(&self) -> StatusResult<f64> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(every) = self.fail_every {
            if n % every == 0 {
                return Err(StatusError::MetricsCollectionFailed("probe".to_string()));
            }
        }
        Ok(100.0 + n as f64)
    }
}

fn config(interval_secs: u64, capacity: usize) -> MemorySamplerConfig {
    MemorySamplerConfig::default()
        .with_interval(Duration::from_secs(interval_secs))
        .with_capacity(capacity)
}

mod sampler_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_samples_immediately_then_every_interval() {
        let sampler = MemorySampler::new(Arc::new(SteppingProbe::new()), config(60, 60));

        sampler.start().await;
        tokio::time::sleep(Duration::from_secs(150)).await;

        let len = sampler.history().len().await;
        assert!((3..=4).contains(&len), "got {} samples", len);

        sampler.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_sampling() {
        let sampler = MemorySampler::new(Arc::new(SteppingProbe::new()), config(10, 60));

        sampler.start().await;
        tokio::time::sleep(Duration::from_secs(35)).await;
        sampler.stop().await.unwrap();

        let after_stop = sampler.history().len().await;
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(sampler.history().len().await, after_stop);
        assert!(!sampler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_errors_do_not_end_the_loop() {
        let sampler = MemorySampler::new(Arc::new(SteppingProbe::failing_every(2)), config(10, 60));

        sampler.start().await;
        tokio::time::sleep(Duration::from_secs(95)).await;
        sampler.stop().await.unwrap();

        // ten or eleven ticks, every second one failing
        let len = sampler.history().len().await;
        assert!((5..=6).contains(&len), "got {} samples", len);
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_capacity_respected_while_running() {
        let sampler = MemorySampler::new(Arc::new(SteppingProbe::new()), config(1, 5));

        sampler.start().await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        sampler.stop().await.unwrap();

        let samples = sampler.history().samples().await;
        assert_eq!(samples.len(), 5);
        assert!(samples.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let sampler = MemorySampler::new(Arc::new(SteppingProbe::new()), config(60, 60));

        sampler.start().await;
        sampler.stop().await.unwrap();
        sampler.start().await;
        assert!(sampler.is_running());
        sampler.stop().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_start_and_stop_leave_no_task_behind() {
        let sampler = Arc::new(MemorySampler::new(
            Arc::new(SteppingProbe::new()),
            MemorySamplerConfig::default()
                .with_interval(Duration::from_millis(5))
                .with_capacity(10_000),
        ));

        for _ in 0..50 {
            let starter = {
                let sampler = Arc::clone(&sampler);
                tokio::spawn(async move { sampler.start().await })
            };
            let stopper = {
                let sampler = Arc::clone(&sampler);
                tokio::spawn(async move { sampler.stop().await })
            };
            starter.await.unwrap();
            // stop may run first and find nothing to stop
            let _ = stopper.await.unwrap();

            if sampler.is_running() {
                sampler.stop().await.unwrap();
            }
        }

        let settled = sampler.history().len().await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(sampler.history().len().await, settled);
        assert!(!sampler.is_running());
    }

    #[tokio::test]
    async fn test_shared_history_feeds_trend() {
        let history = MemoryHistory::new(10);
        let sampler = MemorySampler::with_history(
            Arc::new(SteppingProbe::new()),
            history.clone(),
            config(60, 10),
        );

        for _ in 0..10 {
            sampler.sample_and_append().await;
        }

        let trend = MemoryTrend::analyze(&history.samples().await, 5).unwrap();
        // 101..=110: window means 103 and 108
        assert_eq!(trend.bucket, TrendBucket::SlowIncrease);
        assert_eq!(trend.current, 110.0);
        assert_eq!(trend.min, 101.0);
    }

    #[tokio::test]
    async fn test_real_collector_probe() {
        let sampler = MemorySampler::new(Arc::new(SystemCollector::new()), config(60, 60));
        sampler.ensure_sampled().await;

        let samples = sampler.history().samples().await;
        assert_eq!(samples.len(), 1);
        assert!(samples[0] > 0.0);
    }
}
