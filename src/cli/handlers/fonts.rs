//! Font command handler.

use anyhow::{Context, Result};

use super::{Workspace, find_note};
use crate::cli::FontArgs;

pub fn handle_font(args: &FontArgs, workspace: &Workspace) -> Result<()> {
    let mut service = workspace.open_quiet_service()?;

    if args.family.is_none() && args.size.is_none() {
        // Idempotent reconcile so the report covers notes created outside notebox
        service.load().context("failed to load notes")?;
        let family = service
            .font_that_all_notes_use()
            .unwrap_or_else(|| "(mixed)".to_string());
        let size = service
            .font_size_that_all_notes_use()
            .map_or_else(|| "(mixed)".to_string(), |s| s.to_string());
        println!("Font: {family}");
        println!("Size: {size}");
        return Ok(());
    }

    if let Some(name) = &args.note {
        let mut note = find_note(&mut service, name, false)?;
        service
            .set_note_font(&mut note, args.family.as_deref(), args.size)
            .with_context(|| format!("failed to set font of '{name}'"))?;
        println!("Updated font of '{}'", note.name());
        return Ok(());
    }

    let mut notes = service.load().context("failed to load notes")?;
    if let Some(family) = &args.family {
        service
            .set_font_for_all(family, &mut notes)
            .context("failed to set font family")?;
    }
    if let Some(size) = args.size {
        service
            .set_font_size_for_all(size, &mut notes)
            .context("failed to set font size")?;
    }
    println!("Updated font of all notes");
    Ok(())
}
