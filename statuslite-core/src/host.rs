//! Boundary between the add-on and the chat-bot host.
//!
//! The host owns message delivery, permission storage, the plugin registry
//! and the optional supervisor/statistics feeds. Each is reached through a
//! trait object held in [`HostServices`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::BotConfig;
use crate::error::StatusResult;
use crate::models::{MessageStats, MonitorStats, PluginCounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    Group,
    Private,
}

/// Where a command may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatScope {
    All,
    Group,
    Private,
}

impl ChatScope {
    pub fn allows(&self, kind: ChatKind) -> bool {
        match self {
            ChatScope::All => true,
            ChatScope::Group => kind == ChatKind::Group,
            ChatScope::Private => kind == ChatKind::Private,
        }
    }
}

impl std::fmt::Display for ChatScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatScope::All => write!(f, "all"),
            ChatScope::Group => write!(f, "group"),
            ChatScope::Private => write!(f, "private"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    pub kind: ChatKind,
    pub chat_id: String,
}

impl ChatContext {
    pub fn group(chat_id: impl Into<String>) -> Self {
        Self {
            kind: ChatKind::Group,
            chat_id: chat_id.into(),
        }
    }

    pub fn private(chat_id: impl Into<String>) -> Self {
        Self {
            kind: ChatKind::Private,
            chat_id: chat_id.into(),
        }
    }
}

/// A command as received from a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub user_id: String,
    pub chat: ChatContext,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(user_id: impl Into<String>, chat: ChatContext, command: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            chat,
            command: command.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, chat: &ChatContext, text: &str) -> StatusResult<()>;

    /// Sends a base64-encoded PNG.
    async fn send_image(&self, chat: &ChatContext, base64_png: &str) -> StatusResult<()>;
}

#[async_trait]
pub trait PermissionChecker: Send + Sync {
    async fn has_permission(&self, user_id: &str, plugin: &str, node: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    pub enabled: bool,
}

impl PluginEntry {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }
}

#[async_trait]
pub trait PluginDirectory: Send + Sync {
    async fn list_plugins(&self) -> Vec<PluginEntry>;
}

/// Counters published by an external supervisor, when one is running.
#[async_trait]
pub trait MonitorStatsSource: Send + Sync {
    async fn monitor_stats(&self) -> Option<MonitorStats>;
}

#[async_trait]
pub trait MessageStatsSource: Send + Sync {
    async fn message_stats(&self) -> Option<MessageStats>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotIdentity {
    pub identifier: String,
    pub display_name: String,
}

impl From<&BotConfig> for BotIdentity {
    fn from(config: &BotConfig) -> Self {
        Self {
            identifier: config.identifier.clone(),
            display_name: config.display_name.clone(),
        }
    }
}

impl Default for BotIdentity {
    fn default() -> Self {
        Self::from(&BotConfig::default())
    }
}

pub fn count_plugins(entries: &[PluginEntry]) -> PluginCounts {
    PluginCounts {
        loaded: entries.len(),
        enabled: entries.iter().filter(|e| e.enabled).count(),
    }
}

#[derive(Clone)]
pub struct HostServices {
    pub messenger: Arc<dyn Messenger>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub plugins: Arc<dyn PluginDirectory>,
    pub monitor: Option<Arc<dyn MonitorStatsSource>>,
    pub messages: Option<Arc<dyn MessageStatsSource>>,
    pub identity: BotIdentity,
}

impl HostServices {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        permissions: Arc<dyn PermissionChecker>,
        plugins: Arc<dyn PluginDirectory>,
    ) -> Self {
        Self {
            messenger,
            permissions,
            plugins,
            monitor: None,
            messages: None,
            identity: BotIdentity::default(),
        }
    }

    pub fn with_monitor(mut self, monitor: Arc<dyn MonitorStatsSource>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn with_messages(mut self, messages: Arc<dyn MessageStatsSource>) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn with_identity(mut self, identity: BotIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub async fn plugin_counts(&self) -> PluginCounts {
        count_plugins(&self.plugins.list_plugins().await)
    }

    pub async fn monitor_stats(&self) -> Option<MonitorStats> {
        match &self.monitor {
            Some(source) => source.monitor_stats().await,
            None => None,
        }
    }

    pub async fn message_stats(&self) -> Option<MessageStats> {
        match &self.messages {
            Some(source) => source.message_stats().await,
            None => None,
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("identity", &self.identity)
            .field("monitor", &self.monitor.is_some())
            .field("messages", &self.messages.is_some())
            .finish()
    }
}
