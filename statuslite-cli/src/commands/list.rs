use anyhow::Result;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use statuslite_core::{CommandInfo, Plugin, StatusLiteConfig, StatusLitePlugin};
use std::path::Path;

use super::console_host;

pub async fn handle_list_command(config: &StatusLiteConfig, format: &str) -> Result<()> {
    let host = console_host(config, Path::new("."), true);
    let plugin = StatusLitePlugin::new(config, host)?;
    let commands = plugin.commands();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&commands)?);
        return Ok(());
    }

    let info = plugin.info();
    println!(
        "{} {} {}",
        info.name.cyan().bold(),
        format!("v{}", info.version).dimmed(),
        info.description.dimmed()
    );
    println!();
    println!("{}", command_table(&commands));

    Ok(())
}

fn command_table(commands: &[CommandInfo]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Command").fg(Color::White),
            Cell::new("Aliases").fg(Color::White),
            Cell::new("Chats").fg(Color::White),
            Cell::new("Permission").fg(Color::White),
            Cell::new("Description").fg(Color::White),
        ]);

    for command in commands {
        let permission = match &command.permission {
            Some(gate) => Cell::new(&gate.node).fg(Color::Yellow),
            None => Cell::new("open").fg(Color::Green),
        };

        table.add_row(vec![
            Cell::new(&command.name).fg(Color::Cyan),
            Cell::new(command.aliases.join(", ")),
            Cell::new(command.chat_scope.to_string()),
            permission,
            Cell::new(&command.description),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use statuslite_core::{ChatScope, PermissionGate};

    #[test]
    fn test_command_table_rows() {
        let commands = vec![
            CommandInfo::new("status", "Show status").with_aliases(&["状态"]),
            CommandInfo::new("mem", "Memory")
                .with_scope(ChatScope::Private)
                .with_permission(PermissionGate::new("access", "no")),
        ];

        let rendered = command_table(&commands).to_string();
        assert!(rendered.contains("status"));
        assert!(rendered.contains("状态"));
        assert!(rendered.contains("access"));
        assert!(rendered.contains("open"));
    }
}
