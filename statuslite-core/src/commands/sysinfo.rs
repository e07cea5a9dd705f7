use async_trait::async_trait;

use crate::error::StatusResult;
use crate::host::{ChatScope, Invocation};
use crate::plugin::ACCESS_NODE;

use super::report::sysinfo_report;
use super::{Command, CommandInfo, CommandOutcome, PermissionGate, StatusServices};

pub struct SysInfoCommand {
    info: CommandInfo,
}

impl SysInfoCommand {
    pub fn new() -> Self {
        Self {
            info: CommandInfo::new("sysinfo", "Show system information as text")
                .with_aliases(&["系统信息", "status_text", "状态文"])
                .with_scope(ChatScope::All)
                .with_priority(20)
                .with_permission(PermissionGate::new(
                    ACCESS_NODE,
                    "❌ You are not allowed to view system information",
                )),
        }
    }
}

impl Default for SysInfoCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for SysInfoCommand {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    async fn execute(
        &self,
        invocation: &Invocation,
        services: &StatusServices,
    ) -> StatusResult<CommandOutcome> {
        let overview = services.overview().await;
        services.reply(invocation, &sysinfo_report(&overview)).await?;
        Ok(CommandOutcome::new(true, "system info sent", true))
    }
}
