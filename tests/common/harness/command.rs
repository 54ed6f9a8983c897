//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility shared by several test binaries
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Fluent wrapper around `assert_cmd::Command` for the `notebox` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct NoteboxCommand {
    args: Vec<String>,
    stdin: Option<String>,
}

impl NoteboxCommand {
    /// Creates a new command for the `notebox` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            stdin: None,
        }
    }

    /// Sets the `--dir` option to specify the notes directory.
    pub fn dir(mut self, path: &Path) -> Self {
        self.args.push("--dir".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Sets the `--state-dir` option to isolate config, preferences and metadata.
    pub fn state_dir(mut self, path: &Path) -> Self {
        self.args.push("--state-dir".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Pipes `input` to the command's stdin.
    pub fn stdin(mut self, input: &str) -> Self {
        self.stdin = Some(input.to_string());
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("notebox").expect("Failed to find notebox binary");
        cmd.args(&self.args);
        cmd.env_remove("RUST_LOG");
        if let Some(input) = self.stdin {
            cmd.write_stdin(input);
        }
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `ls` command.
    pub fn ls(self) -> Self {
        self.args(["ls"])
    }

    /// Configures for the `ls --archived` command.
    pub fn ls_archived(self) -> Self {
        self.args(["ls", "--archived"])
    }

    /// Configures for the `new` command.
    pub fn new_note(self, name: &str) -> Self {
        self.args(["new", name])
    }

    /// Configures for the `show` command.
    pub fn show(self, name: &str) -> Self {
        self.args(["show", name])
    }

    /// Configures for the `write` command with inline text.
    pub fn write(self, name: &str, text: &str) -> Self {
        self.args(["write", name, text])
    }

    /// Configures for the `rename` command.
    pub fn rename(self, old: &str, new: &str) -> Self {
        self.args(["rename", old, new])
    }

    /// Configures for the `archive` command.
    pub fn archive(self, name: &str) -> Self {
        self.args(["archive", name])
    }

    /// Configures for the `restore` command.
    pub fn restore(self, name: &str) -> Self {
        self.args(["restore", name])
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }
}

impl Default for NoteboxCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        NoteboxCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_dir() {
        let temp = TempDir::new().unwrap();
        let cmd = NoteboxCommand::new().dir(temp.path());
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], temp.path().to_string_lossy());
    }

    #[test]
    fn test_command_output_success() {
        let output = NoteboxCommand::new().args(["--help"]).output_success();
        assert!(output.contains("notebox") || output.contains("notes"));
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = NoteboxCommand::new().ls().format_json();
        let args = cmd.get_args();
        assert!(args.contains(&"ls".to_string()));
        assert!(args.contains(&"--format".to_string()));
        assert!(args.contains(&"json".to_string()));
    }
}
