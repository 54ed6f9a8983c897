//! Handlers for listing, creating, reading, writing and renaming notes.

use anyhow::{Context, Result, bail};

use super::{Workspace, find_note, text_or_stdin, truncate_str};
use crate::cli::output::{NoteListing, Output, OutputFormat};
use crate::cli::{ListArgs, NewArgs, QuickArgs, RenameArgs, ShowArgs, WriteArgs};
use crate::domain::Note;

pub fn handle_list(args: &ListArgs, workspace: &Workspace) -> Result<()> {
    let mut service = workspace.open_quiet_service()?;
    let notes = if args.archived {
        service
            .load_archived()
            .context("failed to load archived notes")?
    } else {
        service.load().context("failed to load notes")?
    };

    match args.format {
        OutputFormat::Human => print_table(&notes, args.archived),
        OutputFormat::Json => {
            let listings: Vec<NoteListing> = notes.iter().map(NoteListing::from).collect();
            let output = Output::new(listings);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_table(notes: &[Note], archived: bool) {
    if notes.is_empty() {
        if archived {
            println!("No archived notes.");
        } else {
            println!("No notes found.");
        }
        return;
    }

    let date_header = if archived { "Archived" } else { "Modified" };
    println!("{:<40}  {:<16}  {:<20}", "Name", date_header, "Font");
    println!("{:<40}  {:<16}  {:<20}", "-".repeat(40), "-".repeat(16), "-".repeat(20));

    for note in notes {
        let when = note
            .metadata()
            .and_then(|m| m.archived)
            .filter(|_| archived)
            .unwrap_or_else(|| note.last_write_time());
        let font = note
            .metadata()
            .map(|m| format!("{} {}", m.font_family, m.font_size))
            .unwrap_or_default();
        println!(
            "{:<40}  {:<16}  {:<20}",
            truncate_str(note.name(), 40),
            when.format("%Y-%m-%d %H:%M").to_string(),
            truncate_str(&font, 20)
        );
    }

    println!();
    println!("{} note(s)", notes.len());
}

pub fn handle_new(args: &NewArgs, workspace: &Workspace) -> Result<()> {
    let mut service = workspace.open_service()?;
    service
        .create(&args.name)
        .with_context(|| format!("failed to create note '{}'", args.name))?;
    Ok(())
}

pub fn handle_quick(args: &QuickArgs, workspace: &Workspace) -> Result<()> {
    let text = text_or_stdin(args.text.as_deref())?;
    let mut service = workspace.open_service()?;
    service
        .create_quick(&text)
        .context("failed to create quick note")?;
    Ok(())
}

pub fn handle_show(args: &ShowArgs, workspace: &Workspace) -> Result<()> {
    let mut service = workspace.open_quiet_service()?;
    let note = if args.archived {
        match service.read_archived(&args.name)? {
            Some(note) => note,
            None => bail!("no archived note named '{}'", args.name),
        }
    } else {
        find_note(&mut service, &args.name, false)?
    };

    let content = note.content();
    if content.is_empty() {
        return Ok(());
    }
    if content.ends_with('\n') {
        print!("{content}");
    } else {
        println!("{content}");
    }
    Ok(())
}

pub fn handle_write(args: &WriteArgs, workspace: &Workspace) -> Result<()> {
    let text = text_or_stdin(args.text.as_deref())?;
    let mut service = workspace.open_quiet_service()?;
    let mut note = find_note(&mut service, &args.name, false)?;

    note.set_content(text);
    service
        .save(&mut note)
        .with_context(|| format!("failed to save note '{}'", note.name()))?;

    println!("Saved '{}'", note.name());
    Ok(())
}

pub fn handle_rename(args: &RenameArgs, workspace: &Workspace) -> Result<()> {
    let mut service = workspace.open_service()?;
    let mut note = find_note(&mut service, &args.old, false)?;
    service
        .update(&mut note, &args.new)
        .with_context(|| format!("failed to rename note '{}'", args.old))?;
    Ok(())
}
