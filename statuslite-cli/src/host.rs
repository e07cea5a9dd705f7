use async_trait::async_trait;
use base64::Engine;
use chrono::Local;
use colored::Colorize;
use statuslite_core::config::HostConfig;
use statuslite_core::{
    ChatContext, Messenger, PermissionChecker, PluginDirectory, PluginEntry, StatusError,
    StatusResult,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Prints text replies and writes image replies as PNG files.
pub struct ConsoleMessenger {
    out_dir: PathBuf,
    written: Mutex<Vec<PathBuf>>,
}

impl ConsoleMessenger {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            written: Mutex::new(Vec::new()),
        }
    }

    pub fn written(&self) -> Vec<PathBuf> {
        self.written
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    fn image_path(&self, chat: &ChatContext) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d-%H%M%S%.3f");
        self.out_dir
            .join(format!("status-{}-{}.png", chat.chat_id, stamp))
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send_text(&self, _chat: &ChatContext, text: &str) -> StatusResult<()> {
        println!();
        for line in text.lines() {
            println!("  {} {}", "│".dimmed(), line);
        }
        println!();
        Ok(())
    }

    async fn send_image(&self, chat: &ChatContext, base64_png: &str) -> StatusResult<()> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(base64_png)
            .map_err(|e| StatusError::MessagingFailed(format!("invalid image payload: {}", e)))?;

        let path = self.image_path(chat);
        write_png(&path, &bytes).await?;

        println!(
            "  {} Image written to {} ({} KB)",
            "✓".green(),
            path.display().to_string().cyan(),
            bytes.len() / 1024
        );

        if let Ok(mut written) = self.written.lock() {
            written.push(path);
        }
        Ok(())
    }
}

pub async fn write_png(path: &Path, bytes: &[u8]) -> StatusResult<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| StatusError::MessagingFailed(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), bytes = bytes.len(), "PNG written");
    Ok(())
}

/// Grants or refuses every permission check.
pub struct StaticPermissions {
    allow: bool,
}

impl StaticPermissions {
    pub fn allow_all() -> Self {
        Self { allow: true }
    }

    pub fn deny_all() -> Self {
        Self { allow: false }
    }
}

#[async_trait]
impl PermissionChecker for StaticPermissions {
    async fn has_permission(&self, user_id: &str, plugin: &str, node: &str) -> bool {
        debug!(user_id, plugin, node, allow = self.allow, "Permission check");
        self.allow
    }
}

/// Plugin list taken from the `[host]` section of the configuration.
pub struct ConfigPluginDirectory {
    entries: Vec<PluginEntry>,
}

impl ConfigPluginDirectory {
    pub fn new(config: &HostConfig) -> Self {
        Self {
            entries: config
                .plugins
                .iter()
                .map(|p| PluginEntry::new(p.name.clone(), p.enabled))
                .collect(),
        }
    }
}

#[async_trait]
impl PluginDirectory for ConfigPluginDirectory {
    async fn list_plugins(&self) -> Vec<PluginEntry> {
        self.entries.clone()
    }
}
