use anyhow::Result;
use colored::Colorize;
use statuslite_core::{
    ChatContext, CommandOutcome, Invocation, Plugin, StatusLiteConfig, StatusLitePlugin,
};
use std::path::PathBuf;
use std::sync::Arc;

use super::console_host_with_messenger;
use crate::config::ensure_dir;
use crate::host::ConsoleMessenger;

pub struct RunOptions {
    pub command: String,
    pub args: Vec<String>,
    pub user: String,
    pub private: bool,
    pub deny: bool,
    pub out_dir: PathBuf,
}

pub async fn handle_run_command(config: &StatusLiteConfig, options: RunOptions) -> Result<()> {
    let out_dir = ensure_dir(&options.out_dir)?;
    let messenger = Arc::new(ConsoleMessenger::new(&out_dir));
    let host = console_host_with_messenger(config, messenger.clone(), !options.deny);
    let plugin = StatusLitePlugin::new(config, host)?;

    let chat = if options.private {
        ChatContext::private(options.user.clone())
    } else {
        ChatContext::group("console")
    };
    let invocation =
        Invocation::new(options.user, chat, options.command).with_args(options.args);

    let outcome = plugin.handle(&invocation).await?;
    print_outcome(&invocation.command, &outcome);

    let images = messenger.written();
    if !images.is_empty() {
        println!("  {} {} image(s) in {}", "→".blue(), images.len(), out_dir.display());
    }

    Ok(())
}

fn print_outcome(command: &str, outcome: &CommandOutcome) {
    let mark = if outcome.success {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    let message = outcome.message.as_deref().unwrap_or("-");

    println!("{} {} {}", mark, command.cyan(), message.dimmed());
    if outcome.notable {
        println!("  {}", "recorded as a bot interaction".dimmed());
    }
}
