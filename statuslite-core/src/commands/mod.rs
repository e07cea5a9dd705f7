mod context;
mod help;
mod memory;
pub mod report;
mod router;
mod status;
mod sysinfo;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StatusResult;
use crate::host::{ChatScope, Invocation};

pub use context::StatusServices;
pub use help::HelpCommand;
pub use memory::MemoryCommand;
pub use router::CommandRouter;
pub use status::StatusCommand;
pub use sysinfo::SysInfoCommand;

/// Permission node a command requires, and what to tell users who lack it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGate {
    pub node: String,
    pub deny_message: String,
}

impl PermissionGate {
    pub fn new(node: impl Into<String>, deny_message: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            deny_message: deny_message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
    pub chat_scope: ChatScope,
    pub priority: i32,
    pub permission: Option<PermissionGate>,
}

impl CommandInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            aliases: Vec::new(),
            chat_scope: ChatScope::All,
            priority: 0,
            permission: None,
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_scope(mut self, scope: ChatScope) -> Self {
        self.chat_scope = scope;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_permission(mut self, gate: PermissionGate) -> Self {
        self.permission = Some(gate);
        self
    }

    /// Case-insensitive match on the name or any alias.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.name.to_lowercase() == name || self.aliases.iter().any(|a| a.to_lowercase() == name)
    }
}

/// `success`, an optional log message, and whether the host should record the
/// invocation as a notable interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub notable: bool,
}

impl CommandOutcome {
    pub fn new(success: bool, message: impl Into<String>, notable: bool) -> Self {
        Self {
            success,
            message: Some(message.into()),
            notable,
        }
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self::new(false, message, false)
    }
}

#[async_trait]
pub trait Command: Send + Sync {
    fn info(&self) -> &CommandInfo;

    async fn execute(
        &self,
        invocation: &Invocation,
        services: &StatusServices,
    ) -> StatusResult<CommandOutcome>;
}
