use anyhow::{Context, Result};
use colored::Colorize;
use statuslite_core::{BotIdentity, StatusLiteConfig, StatusServices};
use std::path::Path;

use super::console_host;
use crate::config::ensure_dir;

/// Renders the dashboard straight to `out`, bypassing the command router.
pub async fn handle_render_command(config: &StatusLiteConfig, out: &Path) -> Result<()> {
    let parent = out
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_dir(parent)?;

    let host = console_host(config, parent, true).with_identity(BotIdentity::from(&config.bot));
    let services = StatusServices::new(host, config);

    println!("  {} Collecting metrics...", "→".blue());
    let snapshot = services.snapshot().await;

    println!("  {} Rendering dashboard...", "→".blue());
    let renderer = services.renderer.clone();
    let png = tokio::task::spawn_blocking(move || renderer.render(&snapshot))
        .await
        .context("Render task failed")??;

    tokio::fs::write(out, &png)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    println!(
        "{} Dashboard written to {} ({} KB)",
        "✓".green().bold(),
        out.display().to_string().cyan(),
        png.len() / 1024
    );

    Ok(())
}
