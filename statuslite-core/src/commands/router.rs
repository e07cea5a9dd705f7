use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{StatusError, StatusResult};
use crate::host::Invocation;
use crate::plugin::PLUGIN_NAME;

use super::{Command, CommandInfo, CommandOutcome, StatusServices};

pub type DynCommand = Arc<dyn Command>;

const WRONG_CHAT_MESSAGE: &str = "command not available in this chat";

/// Resolves names and aliases, applies the scope and permission gates, and
/// dispatches to the matching handler.
#[derive(Default)]
pub struct CommandRouter {
    commands: Vec<DynCommand>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: DynCommand) -> StatusResult<()> {
        let info = command.info();
        let names = std::iter::once(&info.name).chain(info.aliases.iter());

        for name in names {
            if self.resolve(name).is_some() {
                return Err(StatusError::Internal(format!(
                    "Command name '{}' is already registered",
                    name
                )));
            }
        }

        info!(command = %info.name, aliases = info.aliases.len(), "Registered command");
        self.commands.push(command);
        self.commands.sort_by_key(|c| c.info().priority);

        Ok(())
    }

    /// Accepts the bare name or the `/`-prefixed form, case-insensitively.
    pub fn resolve(&self, name: &str) -> Option<&DynCommand> {
        let name = name.trim().trim_start_matches('/');
        self.commands.iter().find(|c| c.info().matches(name))
    }

    pub fn infos(&self) -> Vec<CommandInfo> {
        self.commands.iter().map(|c| c.info().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub async fn dispatch(
        &self,
        invocation: &Invocation,
        services: &StatusServices,
    ) -> StatusResult<CommandOutcome> {
        let command = self
            .resolve(&invocation.command)
            .ok_or_else(|| StatusError::CommandNotFound(invocation.command.clone()))?;
        let info = command.info();

        if !info.chat_scope.allows(invocation.chat.kind) {
            debug!(
                command = %info.name,
                scope = %info.chat_scope,
                "Command used outside its chat scope"
            );
            return Ok(CommandOutcome::denied(WRONG_CHAT_MESSAGE));
        }

        if let Some(gate) = &info.permission {
            let allowed = services
                .host
                .permissions
                .has_permission(&invocation.user_id, PLUGIN_NAME, &gate.node)
                .await;

            if !allowed {
                debug!(
                    command = %info.name,
                    user_id = %invocation.user_id,
                    node = %gate.node,
                    "Permission denied"
                );
                services.reply(invocation, &gate.deny_message).await?;
                return Ok(CommandOutcome::denied(gate.deny_message.clone()));
            }
        }

        debug!(command = %info.name, user_id = %invocation.user_id, "Dispatching command");
        command.execute(invocation, services).await
    }
}
