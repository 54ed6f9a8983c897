//! notebox - plain-text notes with archiving and per-note fonts

pub mod cli;
pub mod domain;
pub mod infra;
pub mod service;
pub mod store;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::LevelFilter;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        Workspace, handle_archive, handle_font, handle_list, handle_new, handle_prefs,
        handle_quick, handle_relocate, handle_rename, handle_restore, handle_rm, handle_show,
        handle_write,
    },
};
use infra::Preferences;

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.state_dir.as_deref())?;
    let state_dir = Config::state_dir(cli.state_dir.as_deref());
    let preferences_path = config.preferences_path(&state_dir);

    match &cli.command {
        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "notebox",
                &mut std::io::stdout(),
            );
            return Ok(());
        }
        Command::Prefs(args) => return handle_prefs(args, &preferences_path),
        _ => {}
    }

    let preferences = Preferences::load(&preferences_path)?;
    let workspace = Workspace {
        notes_dir: Config::notes_dir(cli.dir.as_ref(), &preferences)?,
        metadata: config.metadata_location(&state_dir),
        preferences_path,
        defaults: config.defaults(),
    };
    log::debug!("notes directory: {}", workspace.notes_dir.display());

    match &cli.command {
        Command::List(args) => handle_list(args, &workspace),
        Command::New(args) => handle_new(args, &workspace),
        Command::Quick(args) => handle_quick(args, &workspace),
        Command::Show(args) => handle_show(args, &workspace),
        Command::Write(args) => handle_write(args, &workspace),
        Command::Rename(args) => handle_rename(args, &workspace),
        Command::Archive(args) => handle_archive(args, &workspace),
        Command::Restore(args) => handle_restore(args, &workspace),
        Command::Rm(args) => handle_rm(args, &workspace),
        Command::Relocate(args) => handle_relocate(args, &workspace),
        Command::Font(args) => handle_font(args, &workspace),
        Command::Prefs(_) | Command::Completions(_) => Ok(()),
    }
}

/// Routes `log` output to stderr. `-v` enables info, `-vv` debug; `RUST_LOG`
/// overrides both.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
