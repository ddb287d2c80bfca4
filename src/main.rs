//! driftcheck CLI entrypoint.
//!
//! This is the main entrypoint for the driftcheck command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use driftcheck::cli::{Cli, Commands, DiffArgs, LogFormat, OutputFormatter};
use driftcheck::config::{
    ColorMode, DiffSettings, ManifestLoader, SettingsParser, SettingsValidator,
};
use driftcheck::diff::CompareOptions;
use driftcheck::error::{ConfigError, Result};
use driftcheck::live::{ApiStore, LiveStore, SnapshotStore};
use driftcheck::resource::KindNamer;
use driftcheck::runner::DiffRunner;

use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system on stderr.
fn init_logging(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Main async entry point. Returns the process exit code.
async fn run(cli: Cli) -> Result<u8> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Diff(args) => cmd_diff(cli.config.as_deref(), args, &formatter).await,
        Commands::Validate { paths } => {
            cmd_validate(cli.config.as_deref(), &paths, &formatter)?;
            Ok(0)
        }
    }
}

/// Compare declared resources with the live store.
async fn cmd_diff(
    config_path: Option<&Path>,
    args: DiffArgs,
    formatter: &OutputFormatter,
) -> Result<u8> {
    let mut settings = load_settings(config_path)?;
    apply_cli_overrides(&mut settings, &args);
    validate_settings(&settings)?;

    let color = settings.color.enabled() && !formatter.is_json();
    match settings.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }

    let loader = ManifestLoader::new();
    let resources = loader.load_paths(&args.paths)?;
    let namer = KindNamer::with_overrides(settings.kinds.clone());

    let store = create_store(&settings, &args.live_from, &loader, &namer)?;
    debug!("Using {} live store", store.backend_type());

    let options = CompareOptions::from_settings(&settings, color);
    let runner = DiffRunner::new(store.as_ref(), &namer, &options)
        .with_omit_same(settings.omit_same)
        .with_concurrency(settings.concurrency);

    let stdout = std::io::stdout();
    let report = if formatter.is_json() {
        let report = runner.run(resources, &mut std::io::sink()).await?;
        let mut out = stdout.lock();
        writeln!(out, "{}", formatter.format_report(&report))?;
        report
    } else {
        runner.run(resources, &mut stdout.lock()).await?
    };

    if args.summary {
        eprint!("{}", OutputFormatter::format_summary(&report));
    }

    let outcome = report.outcome();
    info!("Drift check outcome: {outcome:?}");
    Ok(outcome.exit_code())
}

/// Validate settings and manifests.
fn cmd_validate(
    config_path: Option<&Path>,
    paths: &[PathBuf],
    formatter: &OutputFormatter,
) -> Result<()> {
    let settings = load_settings(config_path)?;
    let result = validate_settings(&settings)?;
    let resources = ManifestLoader::new().load_paths(paths)?;

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "{}",
        formatter.format_validation(&settings, &resources, &result)
    )?;
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Loads `.env` and the settings file.
fn load_settings(config_path: Option<&Path>) -> Result<DiffSettings> {
    let base = config_path
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let parser = SettingsParser::new().with_base_path(base);
    parser.load_dotenv()?;
    parser.load(config_path)
}

/// Applies command-line flags on top of file and environment settings.
fn apply_cli_overrides(settings: &mut DiffSettings, args: &DiffArgs) {
    if let Some(strategy) = args.diff_strategy {
        settings.strategy = strategy;
    }
    if let Some(namespace) = &args.namespace {
        settings.default_namespace.clone_from(namespace);
    }
    if let Some(color) = args.color {
        settings.color = color;
    }
    if let Some(server) = &args.server {
        settings.server.url = Some(server.clone());
    }
    if let Some(concurrency) = args.concurrency {
        settings.concurrency = concurrency;
    }
    settings.omit_secrets |= args.omit_secrets;
    settings.omit_same |= args.omit_same;
}

/// Validates settings and logs warnings.
fn validate_settings(settings: &DiffSettings) -> Result<driftcheck::config::ValidationResult> {
    let result = SettingsValidator::new().validate(settings)?;
    for warning in &result.warnings {
        warn!("{warning}");
    }
    Ok(result)
}

/// Creates the live store: a snapshot when `--live-from` is given, the API
/// server otherwise.
fn create_store(
    settings: &DiffSettings,
    live_from: &[PathBuf],
    loader: &ManifestLoader,
    namer: &KindNamer,
) -> Result<Box<dyn LiveStore>> {
    if !live_from.is_empty() {
        let objects = loader.load_paths(live_from)?;
        return Ok(Box::new(SnapshotStore::from_resources(
            objects,
            namer,
            &settings.default_namespace,
        )));
    }

    let Some(url) = &settings.server.url else {
        return Err(ConfigError::NoLiveSource.into());
    };

    info!("Comparing against {url}");
    let store = ApiStore::with_timeout(
        url,
        SettingsParser::get_token(),
        namer.clone(),
        settings.server.timeout_secs,
    )?;
    Ok(Box::new(store))
}
