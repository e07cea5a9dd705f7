use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::commands::{
    CommandInfo, CommandOutcome, CommandRouter, HelpCommand, MemoryCommand, StatusCommand,
    StatusServices, SysInfoCommand,
};
use crate::config::StatusLiteConfig;
use crate::error::{StatusError, StatusResult};
use crate::host::{BotIdentity, HostServices, Invocation};
use crate::render::DashboardRenderer;

pub const PLUGIN_NAME: &str = "monitor_status_lite";
pub const ACCESS_NODE: &str = "access";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
}

impl PluginInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            author: String::new(),
            description: String::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionNode {
    pub name: String,
    pub description: String,
}

/// What a host needs to register and drive an add-on.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn info(&self) -> &PluginInfo;

    fn permission_nodes(&self) -> Vec<PermissionNode>;

    fn commands(&self) -> Vec<CommandInfo>;

    async fn init(&mut self) -> StatusResult<()>;

    async fn shutdown(&mut self) -> StatusResult<()>;

    fn is_initialized(&self) -> bool;

    async fn handle(&self, invocation: &Invocation) -> StatusResult<CommandOutcome>;
}

pub struct StatusLitePlugin {
    info: PluginInfo,
    services: StatusServices,
    router: CommandRouter,
    initialized: bool,
}

impl StatusLitePlugin {
    pub fn new(config: &StatusLiteConfig, host: HostServices) -> StatusResult<Self> {
        let host = host.with_identity(BotIdentity::from(&config.bot));
        let services = StatusServices::new(host, config);
        Self::with_services(services)
    }

    pub fn with_services(services: StatusServices) -> StatusResult<Self> {
        let mut router = CommandRouter::new();
        router.register(Arc::new(StatusCommand::new()))?;
        router.register(Arc::new(SysInfoCommand::new()))?;
        router.register(Arc::new(HelpCommand::new()))?;
        router.register(Arc::new(MemoryCommand::new()))?;

        let info = PluginInfo::new(PLUGIN_NAME, env!("CARGO_PKG_VERSION"))
            .with_author("MoFox Studio")
            .with_description(
                "Lightweight bot status reporting: dashboard image, system text, memory trend",
            );

        Ok(Self {
            info,
            services,
            router,
            initialized: false,
        })
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn DashboardRenderer>) -> Self {
        self.services = self.services.with_renderer(renderer);
        self
    }

    pub fn services(&self) -> &StatusServices {
        &self.services
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }
}

#[async_trait]
impl Plugin for StatusLitePlugin {
    fn info(&self) -> &PluginInfo {
        &self.info
    }

    fn permission_nodes(&self) -> Vec<PermissionNode> {
        vec![PermissionNode {
            name: ACCESS_NODE.to_string(),
            description: "Can use /status and the other read-only status commands".to_string(),
        }]
    }

    fn commands(&self) -> Vec<CommandInfo> {
        self.router.infos()
    }

    async fn init(&mut self) -> StatusResult<()> {
        if self.initialized {
            warn!(plugin = PLUGIN_NAME, "Plugin already initialized");
            return Ok(());
        }

        self.services.sampler.start().await;
        self.initialized = true;
        info!(plugin = PLUGIN_NAME, commands = self.router.len(), "Plugin initialized");
        Ok(())
    }

    async fn shutdown(&mut self) -> StatusResult<()> {
        match self.services.sampler.stop().await {
            Ok(()) | Err(StatusError::SamplerNotRunning) => {}
            Err(e) => return Err(e),
        }

        self.initialized = false;
        info!(plugin = PLUGIN_NAME, "Plugin shut down");
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    async fn handle(&self, invocation: &Invocation) -> StatusResult<CommandOutcome> {
        self.router.dispatch(invocation, &self.services).await
    }
}
