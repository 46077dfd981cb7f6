//! redmine-mcp CLI Library
//!
//! Command-line interface definitions, logging setup, exit codes and the
//! command implementations behind the `redmine-mcp` binary.

/// Command-line interface definitions and argument parsing
pub mod cli;
/// Shell completion generation
pub mod completions;
/// CLI error type carrying exit codes
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// The `tools` command
pub mod list;
/// Log subscriber setup
pub mod logging;
/// The `serve` command
pub mod serve;
