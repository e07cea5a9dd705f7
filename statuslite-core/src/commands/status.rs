use async_trait::async_trait;
use base64::Engine;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::{StatusError, StatusResult};
use crate::host::{ChatScope, Invocation};
use crate::plugin::ACCESS_NODE;

use super::report::status_report;
use super::{Command, CommandInfo, CommandOutcome, PermissionGate, StatusServices};

/// Sends the dashboard image, or the text report when rendering or image
/// delivery fails.
pub struct StatusCommand {
    info: CommandInfo,
}

impl StatusCommand {
    pub fn new() -> Self {
        Self {
            info: CommandInfo::new("status", "Show bot status and system information")
                .with_aliases(&["状态", "about", "关于", "info", "status_image", "状态图"])
                .with_scope(ChatScope::All)
                .with_priority(10)
                .with_permission(PermissionGate::new(
                    ACCESS_NODE,
                    "❌ You are not allowed to view the status",
                )),
        }
    }
}

impl Default for StatusCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for StatusCommand {
    fn info(&self) -> &CommandInfo {
        &self.info
    }

    async fn execute(
        &self,
        invocation: &Invocation,
        services: &StatusServices,
    ) -> StatusResult<CommandOutcome> {
        let snapshot = services.snapshot().await;

        let renderer = Arc::clone(&services.renderer);
        let to_render = snapshot.clone();
        let rendered = tokio::task::spawn_blocking(move || renderer.render(&to_render))
            .await
            .map_err(|e| StatusError::Internal(format!("render task failed: {}", e)))
            .and_then(|result| result);

        let delivered = match rendered {
            Ok(png) => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
                services
                    .reply_image(invocation, &encoded)
                    .await
                    .map(|_| png.len())
            }
            Err(e) => Err(e),
        };

        match delivered {
            Ok(bytes) => {
                info!(bytes, "Status image sent");
                Ok(CommandOutcome::new(true, "status image sent", true))
            }
            Err(e) => {
                if e.is_render_error() {
                    error!(error = %e, code = e.error_code(), "Dashboard rendering failed");
                } else {
                    e.log();
                }
                services
                    .reply(
                        invocation,
                        &format!("❌ Image generation failed: {}\nSending text report...", e),
                    )
                    .await?;
                services
                    .reply(invocation, &status_report(&snapshot, &services.units))
                    .await?;
                Ok(CommandOutcome::new(true, "status text sent", true))
            }
        }
    }
}
