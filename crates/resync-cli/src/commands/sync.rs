//! Sync command implementation

use std::path::PathBuf;

use colored::Colorize;
use resync_core::{
    ResourceEntry, StaticConsent, SyncOrchestrator, SyncOutcome, SyncRequest,
};

use super::{load_config, resolve_path};
use crate::consent::PromptConsent;
use crate::error::Result;

/// Arguments of the sync command.
#[derive(Debug, Clone)]
pub struct SyncArgs {
    pub selected: PathBuf,
    pub project: PathBuf,
    pub tool: Option<String>,
    pub config: Option<PathBuf>,
    pub yes: bool,
    pub json: bool,
}

/// Run the sync command.
pub async fn run_sync(args: SyncArgs) -> Result<SyncOutcome> {
    let config = load_config(args.config.as_deref(), args.tool.clone())?;
    let selected = ResourceEntry::from_path(resolve_path(&args.selected)?)?;
    let request = SyncRequest::new(resolve_path(&args.project)?, selected);

    let orchestrator = if args.yes {
        SyncOrchestrator::new(config, StaticConsent::granted())
    } else {
        SyncOrchestrator::new(config, PromptConsent)
    };
    let outcome = orchestrator.execute(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(outcome)
}

fn print_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Done(result) => {
            println!(
                "{} Renamed {} file(s) and {} director(ies)",
                "OK".green().bold(),
                result.renamed_count,
                result.renamed_directories
            );
            let status = |changed: bool| if changed { "updated".yellow() } else { "unchanged".dimmed() };
            println!("   descriptor:   {}", status(result.descriptor_modified));
            println!("   project file: {}", status(result.project_file_modified));
        }
        SyncOutcome::NotApplicable => {
            println!("{} Nothing to synchronize for this selection.", "--".dimmed());
        }
        SyncOutcome::Cancelled => {
            println!("{} Cancelled, nothing was changed.", "!".yellow().bold());
        }
    }
}
