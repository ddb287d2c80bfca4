//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ColorMode, DiffStrategy, STDIN_PATH};

/// driftcheck - Compare declared resources with their live counterparts.
#[derive(Parser, Debug)]
#[command(name = "driftcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file.
    #[arg(short, long, global = true, env = "DRIFTCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Log format on stderr (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show differences between declared resources and live objects.
    Diff(DiffArgs),

    /// Load the settings and manifests without contacting a live store.
    Validate {
        /// Manifest files or directories, `-` for stdin.
        #[arg(default_value = STDIN_PATH)]
        paths: Vec<PathBuf>,
    },
}

/// Arguments of the `diff` command. Unset flags fall back to the settings.
#[derive(clap::Args, Debug, Default)]
pub struct DiffArgs {
    /// Manifest files or directories, `-` for stdin.
    #[arg(default_value = STDIN_PATH)]
    pub paths: Vec<PathBuf>,

    /// Compare all fields, or only the fields present in the manifests.
    #[arg(long)]
    pub diff_strategy: Option<DiffStrategy>,

    /// Hide secret values in the diff of sensitive kinds.
    #[arg(long)]
    pub omit_secrets: bool,

    /// Do not print anything for unchanged resources.
    #[arg(long)]
    pub omit_same: bool,

    /// Namespace for resources that do not set one.
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// When to color the diff.
    #[arg(long)]
    pub color: Option<ColorMode>,

    /// Base URL of the API server.
    #[arg(long, conflicts_with = "live_from")]
    pub server: Option<String>,

    /// Read live objects from exported manifests instead of a server.
    #[arg(long)]
    pub live_from: Vec<PathBuf>,

    /// Number of resources compared at once.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Print a table of classifications to stderr.
    #[arg(long)]
    pub summary: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// Log format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable log lines.
    #[default]
    Text,
    /// One JSON object per log event.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["driftcheck", "diff", "--server", "https://k8s:6443"])
            .expect("valid arguments");
        let Commands::Diff(args) = cli.command else {
            panic!("expected diff command");
        };
        assert_eq!(args.paths, [PathBuf::from("-")]);
        assert_eq!(args.server.as_deref(), Some("https://k8s:6443"));
        assert!(args.diff_strategy.is_none());
    }

    #[test]
    fn test_diff_flags() {
        let cli = Cli::try_parse_from([
            "driftcheck",
            "--output",
            "json",
            "diff",
            "app/",
            "--diff-strategy",
            "subset",
            "--omit-secrets",
            "--omit-same",
            "-n",
            "prod",
            "--color",
            "never",
            "--live-from",
            "dump.json",
            "--concurrency",
            "4",
        ])
        .expect("valid arguments");

        assert!(matches!(cli.output, OutputFormat::Json));
        let Commands::Diff(args) = cli.command else {
            panic!("expected diff command");
        };
        assert_eq!(args.diff_strategy, Some(DiffStrategy::Subset));
        assert!(args.omit_secrets && args.omit_same);
        assert_eq!(args.namespace.as_deref(), Some("prod"));
        assert_eq!(args.color, Some(ColorMode::Never));
        assert_eq!(args.live_from, [PathBuf::from("dump.json")]);
        assert_eq!(args.concurrency, Some(4));
    }

    #[test]
    fn test_strategy_all_is_accepted() {
        let cli = Cli::try_parse_from(["driftcheck", "diff", "--diff-strategy", "all"])
            .expect("valid arguments");
        let Commands::Diff(args) = cli.command else {
            panic!("expected diff command");
        };
        assert_eq!(args.diff_strategy, Some(DiffStrategy::Full));
    }

    #[test]
    fn test_server_conflicts_with_snapshot() {
        let result = Cli::try_parse_from([
            "driftcheck",
            "diff",
            "--server",
            "https://k8s",
            "--live-from",
            "dump.yaml",
        ]);
        assert!(result.is_err());
    }
}
