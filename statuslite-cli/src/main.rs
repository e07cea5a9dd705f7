use clap::{Parser, Subcommand};
use colored::Colorize;
use statuslite_core::config::LoggingConfig;
use statuslite_core::StatusError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod host;

use commands::{
    handle_list_command, handle_render_command, handle_run_command, handle_watch_command,
    RunOptions,
};
use config::load_config;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Parser)]
#[command(name = "statuslite")]
#[command(author = "MoFox Studio")]
#[command(version = VERSION)]
#[command(about = "statuslite - lightweight bot status reporting from the console")]
#[command(long_about = r#"
statuslite runs the bot status commands (status, sysinfo, mem, mhelp) against
a console host: text replies are printed, the status dashboard is written as
a PNG file.

Use 'statuslite run status' to render the dashboard, 'statuslite watch' to
follow resident memory and 'statuslite commands' to list what is registered.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file to use instead of the default search path"
    )]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Invoke a command as a chat user would")]
    Run {
        #[arg(help = "Command name or alias (status, sysinfo, mem, mhelp)")]
        command: String,

        #[arg(help = "Extra command arguments")]
        args: Vec<String>,

        #[arg(short, long, default_value = "console", help = "Invoking user id")]
        user: String,

        #[arg(short, long, help = "Invoke from a private chat instead of a group")]
        private: bool,

        #[arg(short, long, help = "Refuse every permission check")]
        deny: bool,

        #[arg(short, long, default_value = ".", help = "Directory for image replies")]
        out: PathBuf,
    },

    #[command(about = "Render the status dashboard to a PNG file")]
    Render {
        #[arg(short, long, default_value = "status.png")]
        out: PathBuf,
    },

    #[command(about = "Sample resident memory and report the trend")]
    Watch {
        #[arg(short, long, default_value_t = 10)]
        samples: usize,

        #[arg(short, long, help = "Seconds between samples (overrides the configuration)")]
        interval: Option<u64>,
    },

    #[command(about = "List registered commands")]
    Commands {
        #[arg(short, long, default_value = "text", help = "Output format (text, json)")]
        format: String,
    },

    #[command(about = "Show version information")]
    Version {
        #[arg(short, long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            if let Some(status_err) = e.downcast_ref::<StatusError>() {
                status_err.log();
                if let Some(hint) = status_err.user_suggestion() {
                    eprintln!("  {} {}", "hint:".yellow(), hint);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, logging: &LoggingConfig) {
    let default_level = if verbose { "debug" } else { logging.level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json_format {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Version { detailed } = cli.command {
        return cmd_version(detailed);
    }

    let config = load_config(cli.config.as_deref())?;
    init_logging(cli.verbose, &config.logging);

    match cli.command {
        Commands::Run {
            command,
            args,
            user,
            private,
            deny,
            out,
        } => {
            let options = RunOptions {
                command,
                args,
                user,
                private,
                deny,
                out_dir: out,
            };
            handle_run_command(&config, options).await
        }
        Commands::Render { out } => handle_render_command(&config, &out).await,
        Commands::Watch { samples, interval } => {
            handle_watch_command(&config, samples, interval).await
        }
        Commands::Commands { format } => handle_list_command(&config, &format).await,
        Commands::Version { detailed } => cmd_version(detailed),
    }
}

fn cmd_version(detailed: bool) -> anyhow::Result<()> {
    if detailed {
        println!("{}", "statuslite Version Information".cyan().bold());
        println!("{}", "═".repeat(40).dimmed());
        println!("  {:<15} {}", "Version:".bold(), VERSION);
        println!("  {:<15} {}", "Name:".bold(), NAME);
        println!(
            "  {:<15} {}",
            "Plugin:".bold(),
            statuslite_core::PLUGIN_NAME
        );
        println!();
        println!("  {}", "Commands:".bold());
        println!("    /status   dashboard image");
        println!("    /sysinfo  system text report");
        println!("    /mem      memory trend");
        println!("    /mhelp    help");
        println!();
        println!("  {}", "Build Information:".bold());
        println!("    Rust Edition: 2021");
        #[cfg(debug_assertions)]
        println!("    Build:        Debug");
        #[cfg(not(debug_assertions))]
        println!("    Build:        Release");
    } else {
        println!("statuslite {}", VERSION);
    }

    Ok(())
}
