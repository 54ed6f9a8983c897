//! Archive, restore, delete and relocate handlers.

use anyhow::{Context, Result};
use std::path::Path;

use super::{Workspace, find_note};
use crate::cli::{ArchiveArgs, RelocateArgs, RestoreArgs, RmArgs};
use crate::infra::{MetadataStore, Preferences, remove_file};
use log::debug;

pub fn handle_archive(args: &ArchiveArgs, workspace: &Workspace) -> Result<()> {
    let mut service = workspace.open_service()?;
    let mut note = find_note(&mut service, &args.name, false)?;
    service
        .archive(&mut note)
        .with_context(|| format!("failed to archive note '{}'", args.name))?;
    Ok(())
}

pub fn handle_restore(args: &RestoreArgs, workspace: &Workspace) -> Result<()> {
    let mut service = workspace.open_service()?;
    let mut note = find_note(&mut service, &args.name, true)?;
    service
        .restore(&mut note)
        .with_context(|| format!("failed to restore note '{}'", args.name))?;
    Ok(())
}

pub fn handle_rm(args: &RmArgs, workspace: &Workspace) -> Result<()> {
    let mut service = workspace.open_service()?;
    let note = find_note(&mut service, &args.name, args.archived)?;
    service
        .delete(note)
        .with_context(|| format!("failed to delete note '{}'", args.name))?;
    Ok(())
}

/// Moves every note to a new directory and records it as the saved notes
/// directory. The metadata follows the notes.
pub fn handle_relocate(args: &RelocateArgs, workspace: &Workspace) -> Result<()> {
    let mut service = workspace.open_quiet_service()?;
    let destination = &args.destination;
    service
        .move_all(destination)
        .with_context(|| format!("failed to move notes to {}", destination.display()))?;

    let target = absolute(service.notes_dir());
    carry_metadata(
        service.metadata(),
        &workspace.metadata.path_for(&target),
        workspace,
    )?;
    let mut preferences = Preferences::load(&workspace.preferences_path)
        .context("failed to load preferences")?;
    preferences.notes_directory = target.to_string_lossy().into_owned();
    preferences
        .save(&workspace.preferences_path)
        .context("failed to save preferences")?;

    println!("Moved notes to {}", target.display());
    Ok(())
}

/// Merges the moved notes' metadata into the file of the new directory and
/// removes the old file. Nothing happens when both directories share a file.
fn carry_metadata(moved: &MetadataStore, target_path: &Path, workspace: &Workspace) -> Result<()> {
    let source_path = moved.path();
    if source_path == target_path {
        return Ok(());
    }

    let mut target = MetadataStore::open(target_path, workspace.defaults.clone())
        .with_context(|| format!("failed to open metadata at {}", target_path.display()))?;
    target.merge_from(moved);
    target
        .save()
        .with_context(|| format!("failed to save metadata at {}", target_path.display()))?;

    if source_path.exists() {
        remove_file(source_path)
            .with_context(|| format!("failed to remove {}", source_path.display()))?;
    }
    debug!(
        "moved metadata from {} to {}",
        source_path.display(),
        target_path.display()
    );
    Ok(())
}

fn absolute(path: &Path) -> std::path::PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
