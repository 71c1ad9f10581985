//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction, RunArgs};
pub use commands::{apply_run_overrides, handle_config_action, print_profiles, run_session, CliError};
pub use enums::{Mode, Preset};
