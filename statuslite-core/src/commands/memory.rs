use async_trait::async_trait;

use crate::error::StatusResult;
use crate::host::{ChatScope, Invocation};
use crate::plugin::ACCESS_NODE;

use super::report::memory_report;
use super::{Command, CommandInfo, CommandOutcome, PermissionGate, StatusServices};

pub const NO_MEMORY_DATA: &str = "❌ No memory data yet";

pub struct MemoryCommand {
    info: CommandInfo,
}

impl MemoryCommand {
    pub fn new() -> Self {
        Self {
            info: CommandInfo::new("mem", "Show the bot's memory trend")
                .with_aliases(&["内存分析", "memory"])
                .with_scope(ChatScope::All)
                .with_priority(20)
                .with_permission(PermissionGate::new(ACCESS_NODE, "❌ Permission denied")),
        }
    }
}

impl Default for MemoryCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for MemoryCommand {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    async fn execute(
        &self,
        invocation: &Invocation,
        services: &StatusServices,
    ) -> StatusResult<CommandOutcome> {
        let Some(trend) = services.memory_trend().await else {
            services.reply(invocation, NO_MEMORY_DATA).await?;
            return Ok(CommandOutcome::new(true, "no memory data", false));
        };

        let interval = services.sampler.config().interval;
        services
            .reply(invocation, &memory_report(&trend, interval, &services.units))
            .await?;
        Ok(CommandOutcome::new(true, "memory analysis sent", true))
    }
}
