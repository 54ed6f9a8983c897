//! Test harness for CLI integration tests.
//!
//! Provides isolated test environments, on-disk note setup,
//! and CLI assertion helpers using `assert_cmd`.

mod command;
mod env;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::NoteboxCommand;
#[allow(unused_imports)]
pub use env::TestEnv;
