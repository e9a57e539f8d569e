//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Resync - Keep IDE resource trees usable by the native Android toolchain
#[derive(Parser, Debug)]
#[command(name = "resync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Tell whether a file or directory would trigger a synchronization
    ///
    /// Examples:
    ///   resync check Resources/layout/Main.axml
    ///   resync check Resources/layout
    Check {
        /// Path to inspect
        path: PathBuf,
    },

    /// Preview the renames and descriptor changes a sync would make
    Plan {
        /// The host project file (e.g. App.csproj)
        project: PathBuf,

        /// Path of the external native IDE
        #[arg(short, long, env = "RESYNC_TOOL_PATH")]
        tool: Option<String>,

        /// Load settings from a TOML or JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Normalize resource names and update the external descriptor
    ///
    /// Asks for confirmation before renaming anything unless --yes is given.
    ///
    /// Examples:
    ///   resync sync Resources/layout/Main.axml --project App.csproj
    ///   resync sync Resources/layout --project App.csproj --yes --json
    Sync {
        /// The resource file or directory that changed
        selected: PathBuf,

        /// The host project file (e.g. App.csproj)
        #[arg(short, long)]
        project: PathBuf,

        /// Path of the external native IDE
        #[arg(short, long, env = "RESYNC_TOOL_PATH")]
        tool: Option<String>,

        /// Load settings from a TOML or JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rename without asking
        #[arg(short, long)]
        yes: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_sync_with_flags() {
        let cli = Cli::parse_from([
            "resync",
            "sync",
            "Resources/layout/Main.axml",
            "--project",
            "App.csproj",
            "--tool",
            "/opt/studio",
            "--yes",
        ]);
        assert_eq!(
            cli.command,
            Some(Commands::Sync {
                selected: PathBuf::from("Resources/layout/Main.axml"),
                project: PathBuf::from("App.csproj"),
                tool: Some("/opt/studio".into()),
                config: None,
                yes: true,
                json: false,
            })
        );
    }

    #[test]
    fn sync_requires_project() {
        let result = Cli::try_parse_from(["resync", "sync", "Main.axml"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["resync", "check", "Main.axml", "-v"]);
        assert!(cli.verbose);
    }
}
