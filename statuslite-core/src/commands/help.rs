use async_trait::async_trait;

use crate::error::StatusResult;
use crate::host::{ChatScope, Invocation};

use super::report::help_text;
use super::{Command, CommandInfo, CommandOutcome, StatusServices};

pub struct HelpCommand {
    info: CommandInfo,
}

impl HelpCommand {
    pub fn new() -> Self {
        Self {
            info: CommandInfo::new("mhelp", "Show help for the status commands")
                .with_aliases(&["监控帮助"])
                .with_scope(ChatScope::All)
                .with_priority(20),
        }
    }
}

impl Default for HelpCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    async fn execute(
        &self,
        invocation: &Invocation,
        services: &StatusServices,
    ) -> StatusResult<CommandOutcome> {
        services.reply(invocation, &help_text()).await?;
        Ok(CommandOutcome::new(true, "help sent", true))
    }
}
