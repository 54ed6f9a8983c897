//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// notebox - plain-text notes with archiving
#[derive(Parser, Debug)]
#[command(name = "notebox", version, about, long_about = None)]
pub struct Cli {
    /// Notes directory (overrides the saved preference)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Directory holding config, preferences and metadata
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List notes
    #[command(name = "ls")]
    List(ListArgs),

    /// Create an empty note
    New(NewArgs),

    /// Create a quick note with an automatic name
    Quick(QuickArgs),

    /// Print a note's content
    Show(ShowArgs),

    /// Replace a note's content
    Write(WriteArgs),

    /// Rename a note
    Rename(RenameArgs),

    /// Move a note into the archive
    Archive(ArchiveArgs),

    /// Move an archived note back
    Restore(RestoreArgs),

    /// Permanently delete a note
    Rm(RmArgs),

    /// Move every note to another directory
    Relocate(RelocateArgs),

    /// Show or change fonts
    Font(FontArgs),

    /// Show or change preferences
    Prefs(PrefsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// List archived notes instead of active ones
    #[arg(short = 'a', long)]
    pub archived: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Name of the note
    pub name: String,
}

/// Arguments for the `quick` command
#[derive(Parser, Debug)]
pub struct QuickArgs {
    /// Note text (read from stdin if omitted)
    pub text: Option<String>,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Name of the note
    pub name: String,

    /// Show an archived note
    #[arg(short = 'a', long)]
    pub archived: bool,
}

/// Arguments for the `write` command
#[derive(Parser, Debug)]
pub struct WriteArgs {
    /// Name of the note
    pub name: String,

    /// New text (read from stdin if omitted)
    pub text: Option<String>,
}

/// Arguments for the `rename` command
#[derive(Parser, Debug)]
pub struct RenameArgs {
    /// Current name
    pub old: String,

    /// New name
    pub new: String,
}

/// Arguments for the `archive` command
#[derive(Parser, Debug)]
pub struct ArchiveArgs {
    /// Name of the note
    pub name: String,
}

/// Arguments for the `restore` command
#[derive(Parser, Debug)]
pub struct RestoreArgs {
    /// Name of the archived note
    pub name: String,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Name of the note
    pub name: String,

    /// Delete an archived note
    #[arg(short = 'a', long)]
    pub archived: bool,
}

/// Arguments for the `relocate` command
#[derive(Parser, Debug)]
pub struct RelocateArgs {
    /// Destination directory
    pub destination: PathBuf,
}

/// Arguments for the `font` command
#[derive(Parser, Debug)]
pub struct FontArgs {
    /// Font family to apply to every note
    #[arg(long)]
    pub family: Option<String>,

    /// Font size to apply to every note
    #[arg(long)]
    pub size: Option<u32>,

    /// Only change this note
    #[arg(short = 'n', long)]
    pub note: Option<String>,
}

/// Arguments for the `prefs` command
#[derive(Parser, Debug)]
pub struct PrefsArgs {
    /// Set the saved notes directory
    #[arg(long)]
    pub notes_dir: Option<PathBuf>,

    /// Set the autosave interval in seconds
    #[arg(long)]
    pub autosave: Option<u16>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["notebox", "ls", "--dir", "/notes", "-vv"]);
        assert_eq!(cli.dir, Some(PathBuf::from("/notes")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::List(_)));
    }

    #[test]
    fn relocate_takes_destination() {
        let cli = Cli::parse_from(["notebox", "relocate", "/elsewhere"]);
        match cli.command {
            Command::Relocate(args) => assert_eq!(args.destination, PathBuf::from("/elsewhere")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
