//! Preferences command handler.

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::PrefsArgs;
use crate::cli::output::{Output, OutputFormat};
use crate::infra::Preferences;

pub fn handle_prefs(args: &PrefsArgs, preferences_path: &Path) -> Result<()> {
    let mut preferences = Preferences::load(preferences_path).with_context(|| {
        format!("failed to load preferences from {}", preferences_path.display())
    })?;

    let changed = apply_changes(&mut preferences, args);
    if changed {
        preferences.save(preferences_path).with_context(|| {
            format!("failed to save preferences to {}", preferences_path.display())
        })?;
    }

    match args.format {
        OutputFormat::Human => {
            let dir = if preferences.notes_directory.is_empty() {
                "(not set)"
            } else {
                preferences.notes_directory.as_str()
            };
            println!("Notes directory: {dir}");
            println!("Autosave: {}s", preferences.auto_save_interval);
            let w = preferences.window;
            println!(
                "Window: {}x{} at ({}, {})",
                w.width, w.height, w.position_x, w.position_y
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Output::new(&preferences))?);
        }
    }

    Ok(())
}

/// Applies the requested changes. Returns true if anything was set.
pub(crate) fn apply_changes(preferences: &mut Preferences, args: &PrefsArgs) -> bool {
    let mut changed = false;
    if let Some(dir) = &args.notes_dir {
        preferences.notes_directory = dir.to_string_lossy().into_owned();
        changed = true;
    }
    if let Some(interval) = args.autosave {
        preferences.auto_save_interval = interval;
        changed = true;
    }
    changed
}
