//! SyncOrchestrator: the single entry point of the workflow
//!
//! A run walks through these states:
//!
//! ```text
//! Idle -> Classifying -> [NotApplicable]
//! Classifying -> Planning -> (empty plan) -> Syncing -> [Done]
//! Planning -> (non-empty plan) -> AwaitingConsent -> (denied) -> [Cancelled]
//! AwaitingConsent -> (granted) -> Renaming -> Syncing -> [Done]
//! Renaming | Syncing -> (failure) -> [Failed]
//! ```
//!
//! Nothing on disk changes before consent is granted, or before planning
//! has shown that no rename is needed.

use std::fmt;

use resync_fs::NormalizedPath;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classifier::is_sync_selection;
use crate::consent::ConsentGate;
use crate::constants::{CANONICAL_EXTENSION, LEGACY_EXTENSION};
use crate::descriptor::ProjectDescriptorSync;
use crate::entry::{EntryKind, ResourceEntry};
use crate::error::{Result, SyncError};
use crate::normalizer::{CaseNormalizer, RenamePlan};
use crate::project::ProjectLayout;
use crate::project_file;
use crate::tree::ResourceTreeNode;

/// Caller-owned configuration, passed in rather than read from globals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Path of the external native IDE. Only checked for non-emptiness.
    pub tool_path: String,
}

impl SyncConfig {
    pub fn new(tool_path: impl Into<String>) -> Self {
        Self {
            tool_path: tool_path.into(),
        }
    }
}

/// One synchronization request.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// The caller's current selection; only a single entry is eligible.
    pub selection: Vec<ResourceEntry>,
    /// The host project file the selection belongs to.
    pub project_file: NormalizedPath,
    /// Most recently touched entry. Defaults to the selection when it is a file.
    pub changed_hint: Option<NormalizedPath>,
}

impl SyncRequest {
    pub fn new(project_file: impl Into<NormalizedPath>, selected: ResourceEntry) -> Self {
        Self {
            selection: vec![selected],
            project_file: project_file.into(),
            changed_hint: None,
        }
    }

    pub fn with_changed_hint(mut self, hint: impl Into<NormalizedPath>) -> Self {
        self.changed_hint = Some(hint.into());
        self
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    /// Resource files renamed
    pub renamed_count: usize,
    /// Resource directories renamed
    pub renamed_directories: usize,
    pub descriptor_modified: bool,
    pub project_file_modified: bool,
}

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Done(SyncResult),
    /// The selection or project has nothing to synchronize
    NotApplicable,
    /// Consent was declined; nothing was changed
    Cancelled,
}

impl SyncOutcome {
    /// Terminal state this outcome corresponds to.
    pub fn state(&self) -> SyncState {
        match self {
            Self::Done(_) => SyncState::Done,
            Self::NotApplicable => SyncState::NotApplicable,
            Self::Cancelled => SyncState::Cancelled,
        }
    }

    pub fn result(&self) -> Option<&SyncResult> {
        match self {
            Self::Done(result) => Some(result),
            _ => None,
        }
    }
}

/// States of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Classifying,
    Planning,
    AwaitingConsent,
    Renaming,
    Syncing,
    Done,
    NotApplicable,
    Cancelled,
    Failed,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Classifying => "classifying",
            Self::Planning => "planning",
            Self::AwaitingConsent => "awaiting-consent",
            Self::Renaming => "renaming",
            Self::Syncing => "syncing",
            Self::Done => "done",
            Self::NotApplicable => "not-applicable",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Done | Self::NotApplicable | Self::Cancelled | Self::Failed
        )
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a run would do, computed without side effects.
#[derive(Debug, Clone)]
pub struct SyncPreview {
    pub resources_root: NormalizedPath,
    pub plan: RenamePlan,
    pub descriptor_path: NormalizedPath,
    pub current_descriptor: Option<String>,
    pub rendered_descriptor: String,
}

impl SyncPreview {
    pub fn descriptor_changes(&self) -> bool {
        self.current_descriptor.as_deref() != Some(self.rendered_descriptor.as_str())
    }
}

/// Sequences classification, renaming and descriptor sync.
///
/// Holds no state between runs. Callers must not run two orchestrations on
/// the same project at once.
pub struct SyncOrchestrator {
    config: SyncConfig,
    consent: Box<dyn ConsentGate>,
    normalizer: CaseNormalizer,
}

impl SyncOrchestrator {
    pub fn new(config: SyncConfig, consent: impl ConsentGate + 'static) -> Self {
        Self {
            config,
            consent: Box::new(consent),
            normalizer: CaseNormalizer::new(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run the workflow for one request.
    ///
    /// Must be polled inside a Tokio runtime: the descriptor write runs on the
    /// blocking pool. Dropping the future at the consent prompt leaves the
    /// project untouched; dropping it while the descriptor is written leaves
    /// either the old or the new descriptor, never a torn one.
    ///
    /// # Errors
    ///
    /// See [`SyncError`]. Declined consent and ineligible selections are
    /// outcomes, not errors.
    pub async fn execute(&self, request: &SyncRequest) -> Result<SyncOutcome> {
        enter(SyncState::Idle);
        match self.run(request).await {
            Ok(outcome) => {
                enter(outcome.state());
                Ok(outcome)
            }
            Err(err) => {
                warn!(
                    state = %SyncState::Failed,
                    error = %err,
                    retry_safe = err.is_retry_safe(),
                    "Synchronization failed"
                );
                Err(err)
            }
        }
    }

    async fn run(&self, request: &SyncRequest) -> Result<SyncOutcome> {
        self.check_config()?;

        enter(SyncState::Classifying);
        if !is_sync_selection(&request.selection) {
            debug!(selected = request.selection.len(), "Selection is not a sync candidate");
            return Ok(SyncOutcome::NotApplicable);
        }
        let layout = ProjectLayout::new(request.project_file.clone());
        let Some(resources_root) = layout.find_resources_root()? else {
            info!(project = %layout.project_file(), "Project has no resources directory");
            return Ok(SyncOutcome::NotApplicable);
        };

        enter(SyncState::Planning);
        let plan = self.normalizer.plan(&resources_root)?;

        let mut applied = 0;
        if !plan.is_empty() {
            enter(SyncState::AwaitingConsent);
            let message = consent_message(&resources_root, &plan);
            match self.consent.request_consent(&message).await {
                Ok(true) => {}
                Ok(false) | Err(SyncError::Cancelled) => {
                    info!("Renames declined, nothing was changed");
                    return Ok(SyncOutcome::Cancelled);
                }
                Err(err) => return Err(err),
            }

            enter(SyncState::Renaming);
            applied = self.normalizer.apply(&plan)?;
        }

        enter(SyncState::Syncing);
        let (project_file_modified, descriptor_modified) = self
            .sync_project(request, &layout, &resources_root, &plan)
            .await
            .map_err(|e| e.after_renames(applied))?;

        let result = SyncResult {
            renamed_count: plan.file_count(),
            renamed_directories: plan.directory_count(),
            descriptor_modified,
            project_file_modified,
        };
        info!(
            renamed = result.renamed_count,
            renamed_directories = result.renamed_directories,
            descriptor_modified,
            "Synchronization finished"
        );
        Ok(SyncOutcome::Done(result))
    }

    /// Bring the project file and the descriptor in line with the tree on
    /// disk. Returns whether each of them changed.
    async fn sync_project(
        &self,
        request: &SyncRequest,
        layout: &ProjectLayout,
        resources_root: &NormalizedPath,
        plan: &RenamePlan,
    ) -> Result<(bool, bool)> {
        let tree = scan_resources(layout, &plan.resolve(resources_root))?;
        let project_file_modified = project_file::rewrite_references(layout.project_file(), &tree)?;

        let hint = changed_hint(request, layout, plan, &tree);
        let descriptor = ProjectDescriptorSync::new(self.config.tool_path.clone());
        let descriptor_path = layout.descriptor_path();
        let descriptor_modified = tokio::task::spawn_blocking(move || {
            descriptor.merge(&descriptor_path, &tree, hint.as_ref())
        })
        .await
        .map_err(|e| SyncError::unknown(format!("descriptor task failed: {e}")))??;

        Ok((project_file_modified, descriptor_modified))
    }

    /// Compute what [`execute`](Self::execute) would do for `project_file`,
    /// without asking for consent or touching the disk.
    ///
    /// Returns `None` when the project has no resources directory.
    pub fn preview(
        &self,
        project_file: &NormalizedPath,
        changed_hint: Option<&NormalizedPath>,
    ) -> Result<Option<SyncPreview>> {
        self.check_config()?;

        let layout = ProjectLayout::new(project_file.clone());
        let Some(resources_root) = layout.find_resources_root()? else {
            return Ok(None);
        };
        let plan = self.normalizer.plan(&resources_root)?;

        let current_tree = scan_resources(&layout, &resources_root)?;
        let tree = plan.rename_tree(layout.project_dir(), &current_tree);
        let hint = changed_hint
            .map(|p| plan.resolve(p))
            .and_then(|p| layout.relative(&p))
            .filter(|rel| is_file_in(&tree, rel));

        let descriptor_path = layout.descriptor_path();
        let current_descriptor = if descriptor_path.is_file() {
            Some(
                resync_fs::io::read_text(&descriptor_path)
                    .map_err(|e| SyncError::descriptor(e.to_string()))?,
            )
        } else {
            None
        };
        let rendered_descriptor = ProjectDescriptorSync::new(self.config.tool_path.clone())
            .render(current_descriptor.as_deref(), &tree, hint.as_ref())?;

        Ok(Some(SyncPreview {
            resources_root,
            plan,
            descriptor_path,
            current_descriptor,
            rendered_descriptor,
        }))
    }

    fn check_config(&self) -> Result<()> {
        if self.config.tool_path.trim().is_empty() {
            return Err(SyncError::MissingToolPath);
        }
        Ok(())
    }
}

fn enter(state: SyncState) {
    debug!(state = %state, terminal = state.is_terminal(), "Sync state");
}

fn scan_resources(layout: &ProjectLayout, root: &NormalizedPath) -> Result<ResourceTreeNode> {
    let relative = layout
        .relative(root)
        .ok_or_else(|| SyncError::unknown(format!("{root} is outside {}", layout.project_dir())))?;
    ResourceTreeNode::scan(layout.project_dir(), &relative)
        .map_err(|e| SyncError::descriptor(format!("cannot scan resource tree: {e}")))
}

fn changed_hint(
    request: &SyncRequest,
    layout: &ProjectLayout,
    plan: &RenamePlan,
    tree: &ResourceTreeNode,
) -> Option<NormalizedPath> {
    let source = request.changed_hint.clone().or_else(|| {
        request
            .selection
            .first()
            .filter(|entry| entry.kind == EntryKind::File)
            .map(|entry| entry.path.clone())
    })?;
    let relative = layout.relative(&plan.resolve(&source))?;
    is_file_in(tree, &relative).then_some(relative)
}

fn is_file_in(tree: &ResourceTreeNode, relative: &NormalizedPath) -> bool {
    tree.find(relative)
        .is_some_and(|node| node.kind == EntryKind::File)
}

fn consent_message(resources_root: &NormalizedPath, plan: &RenamePlan) -> String {
    format!(
        "The Android project requires files and directories under '{}' to be lowercase \
         and to use the \".{}\" extension instead of \".{}\". {} file(s) and {} director(ies) \
         will be renamed in your project. Code references such as Resource.Layout.Main may \
         need to become Resource.Layout.main.",
        resources_root,
        CANONICAL_EXTENSION,
        LEGACY_EXTENSION,
        plan.file_count(),
        plan.directory_count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_maps_to_terminal_state() {
        assert_eq!(SyncOutcome::Cancelled.state(), SyncState::Cancelled);
        assert_eq!(SyncOutcome::NotApplicable.state(), SyncState::NotApplicable);
        assert_eq!(
            SyncOutcome::Done(SyncResult::default()).state(),
            SyncState::Done
        );
        assert!(SyncState::Failed.is_terminal());
        assert!(!SyncState::AwaitingConsent.is_terminal());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = SyncOutcome::Done(SyncResult {
            renamed_count: 2,
            renamed_directories: 3,
            descriptor_modified: true,
            project_file_modified: false,
        });
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json["status"], "done");
        assert_eq!(json["renamed_count"], 2);
        assert_eq!(json["renamed_directories"], 3);

        let cancelled = serde_json::to_value(SyncOutcome::Cancelled).unwrap();
        assert_eq!(cancelled, serde_json::json!({ "status": "cancelled" }));
    }

    #[test]
    fn consent_message_names_root_and_counts() {
        let tree = ResourceTreeNode::directory(
            "Resources",
            vec![ResourceTreeNode::file("Resources/Main.axml")],
        );
        let plan = CaseNormalizer::new()
            .plan_tree(&NormalizedPath::new("/p"), &tree)
            .unwrap();

        let message = consent_message(&NormalizedPath::new("/p/Resources"), &plan);
        assert!(message.contains("'/p/Resources'"));
        assert!(message.contains("1 file(s) and 1 director(ies)"));
        assert!(message.contains("Resource.Layout.main"));
    }
}
