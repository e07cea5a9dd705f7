use anyhow::Result;
use colored::Colorize;
use statuslite_core::{
    ChatContext, Invocation, Plugin, StatusLiteConfig, StatusLitePlugin, TrendBucket,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use super::console_host;

/// Runs the background sampler in the foreground, printing every sample,
/// then prints the memory report once `samples` ticks passed or on Ctrl-C.
pub async fn handle_watch_command(
    config: &StatusLiteConfig,
    samples: usize,
    interval_secs: Option<u64>,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(secs) = interval_secs {
        config.sampler.interval_secs = secs.max(1);
    }
    let interval = config.sample_interval();

    let host = console_host(&config, Path::new("."), true);
    let mut plugin = StatusLitePlugin::new(&config, host)?;
    plugin.init().await?;

    println!(
        "{} every {}s, {} samples (Ctrl-C to stop early)",
        "Watching resident memory".cyan().bold(),
        interval.as_secs(),
        samples
    );
    println!("{}", "═".repeat(40).dimmed());

    let history = plugin.services().sampler.history().clone();
    let mut ticker = tokio::time::interval(interval);
    // the sampler takes its first sample on start; give it a moment
    tokio::time::sleep(Duration::from_millis(200)).await;

    let mut seen = 0;
    while seen < samples {
        tokio::select! {
            _ = ticker.tick() => {
                let current = history.samples().await;
                if let Some(last) = current.last() {
                    seen += 1;
                    println!(
                        "  {:>3}  {:>9.1} MB  {}",
                        seen,
                        last,
                        format!("({} in history)", current.len()).dimmed()
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping sampler");
                break;
            }
        }
    }

    let invocation = Invocation::new("console", ChatContext::private("console"), "mem");
    let outcome = plugin.handle(&invocation).await?;

    if let Some(trend) = plugin.services().memory_trend().await {
        let label = trend.bucket.label();
        let colored_label = match trend.bucket {
            b if b.is_suspicious() => label.red().bold(),
            TrendBucket::Stable => label.green(),
            _ => label.yellow(),
        };
        println!("  {} {}", "Trend:".bold(), colored_label);
    }

    plugin.shutdown().await?;

    if !outcome.success {
        println!("{} {}", "✗".red().bold(), outcome.message.unwrap_or_default());
    }

    Ok(())
}
