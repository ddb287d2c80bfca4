//! CLI module for the drift detector.
//!
//! This module provides the command-line interface for comparing
//! declared resources with live objects.

mod commands;
mod output;

pub use commands::{Cli, Commands, DiffArgs, LogFormat, OutputFormat};
pub use output::OutputFormatter;
