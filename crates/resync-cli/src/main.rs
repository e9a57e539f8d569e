//! Resync CLI
//!
//! Normalizes IDE resource trees for the native Android toolchain and keeps
//! the external build descriptor in step.

mod cli;
mod commands;
mod consent;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::SyncArgs;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }
    if cli.verbose {
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => execute_command(cmd).await,
        None => {
            println!("{} Resource synchronization CLI", "resync".green().bold());
            println!();
            println!("Run {} for available commands.", "resync --help".cyan());
            Ok(())
        }
    }
}

async fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Check { path } => commands::run_check(&path).map(|_| ()),
        Commands::Plan {
            project,
            tool,
            config,
            json,
        } => commands::run_plan(&project, config.as_deref(), tool, json),
        Commands::Sync {
            selected,
            project,
            tool,
            config,
            yes,
            json,
        } => commands::run_sync(SyncArgs {
            selected,
            project,
            tool,
            config,
            yes,
            json,
        })
        .await
        .map(|_| ()),
    }
}
