//! Plan command implementation
//!
//! Previews what sync would change without touching the project.

use std::path::Path;

use colored::Colorize;
use resync_core::{EntryKind, StaticConsent, SyncOrchestrator, SyncPreview};
use serde_json::json;
use similar::{ChangeTag, TextDiff};

use super::{load_config, resolve_path};
use crate::error::Result;

/// Run the plan command.
pub fn run_plan(project: &Path, config: Option<&Path>, tool: Option<String>, json: bool) -> Result<()> {
    let project_file = resolve_path(project)?;
    let orchestrator = SyncOrchestrator::new(load_config(config, tool)?, StaticConsent::denied());

    let Some(preview) = orchestrator.preview(&project_file, None)? else {
        if json {
            println!("{}", json!({ "applicable": false }));
        } else {
            println!(
                "{} {} has no Resources directory, nothing to do.",
                "--".dimmed(),
                project_file
            );
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&preview_json(&preview))?);
    } else {
        print_preview(&preview);
    }
    Ok(())
}

fn preview_json(preview: &SyncPreview) -> serde_json::Value {
    json!({
        "applicable": true,
        "resources_root": preview.resources_root.as_str(),
        "renames": preview.plan.iter()
            .map(|op| json!({
                "from": op.from.as_str(),
                "to": op.to.as_str(),
                "kind": op.kind,
            }))
            .collect::<Vec<_>>(),
        "descriptor": preview.descriptor_path.as_str(),
        "descriptor_changes": preview.descriptor_changes(),
    })
}

fn print_preview(preview: &SyncPreview) {
    if preview.plan.is_empty() && !preview.descriptor_changes() {
        println!(
            "{} No changes needed. {} is in sync.",
            "OK".green().bold(),
            preview.resources_root
        );
        return;
    }

    if !preview.plan.is_empty() {
        println!(
            "{} {} file(s), {} director(ies)",
            "Renames".blue().bold(),
            preview.plan.file_count(),
            preview.plan.directory_count()
        );
        for op in &preview.plan {
            let marker = if op.kind == EntryKind::Directory { "/" } else { "" };
            println!(
                "  {} {}{} -> {}{}",
                "~".yellow(),
                op.from,
                marker,
                op.to.as_str().yellow(),
                marker
            );
        }
        println!();
    }

    if preview.descriptor_changes() {
        println!("{} {}", "Descriptor".blue().bold(), preview.descriptor_path);
        print!(
            "{}",
            descriptor_diff(
                preview.current_descriptor.as_deref().unwrap_or(""),
                &preview.rendered_descriptor
            )
        );
        println!();
    }

    println!("Run {} to apply these changes.", "resync sync".cyan());
}

/// Unified diff of the descriptor, colored per line.
fn descriptor_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut unified = diff.unified_diff();
    unified.context_radius(3);

    let mut out = String::new();
    for hunk in unified.iter_hunks() {
        out.push_str(&format!("{}\n", hunk.header().to_string().cyan()));
        for change in hunk.iter_changes() {
            let (sign, paint): (char, fn(&str) -> colored::ColoredString) = match change.tag() {
                ChangeTag::Delete => ('-', |s| s.red()),
                ChangeTag::Insert => ('+', |s| s.green()),
                ChangeTag::Equal => (' ', |s| s.normal()),
            };
            let line = format!("{sign}{}", change.value());
            out.push_str(&format!("{}\n", paint(line.trim_end_matches('\n'))));
        }
    }
    out
}
