// crates/idea-center-cli/src/main.rs
// ============================================================================
// Module: Idea Center CLI Entry Point
// Description: Command dispatcher for the Idea Center contract harness.
// Purpose: Resolve configuration, run the step plan, and report results.
// Dependencies: clap, idea-center-harness, serde_jcs, thiserror, tokio, tracing
// ============================================================================

//! ## Overview
//! The `idea-center` binary runs the ordered contract suite against a target
//! Idea Center API and prints one line per step. Configuration merges CLI
//! flags over environment variables over an optional TOML file.
//!
//! Exit codes: `0` every step passed, `1` at least one step failed, `2` the
//! run could not start or its output could not be written. Logs go to stderr;
//! stdout carries only the report.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use idea_center_harness::HarnessConfig;
use idea_center_harness::SuiteReport;
use idea_center_harness::SuiteRunner;
use idea_center_harness::config::ConfigLayer;
use idea_center_harness::config::EnvConfig;
use idea_center_harness::config::load_file_layer;
use idea_center_harness::report::RunArtifacts;
use idea_center_harness::steps::plan;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Log filter applied when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "idea_center=info";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "idea-center", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the ordered contract suite against a target API.
    Run(RunCommand),
    /// Print the ordered step plan without contacting a server.
    Steps,
}

/// Arguments for the `run` command.
#[derive(Args, Debug, Default)]
struct RunCommand {
    /// Config file path (defaults to `IDEA_CENTER_CONFIG` or idea-center.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Base endpoint URL of the API under test.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Pre-issued bearer token; skips the credential exchange.
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,
    /// Login email for the credential exchange.
    #[arg(long, value_name = "EMAIL")]
    email: Option<String>,
    /// Login password for the credential exchange.
    #[arg(long, value_name = "PASSWORD")]
    password: Option<String>,
    /// Report output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Directory that receives summary.json, summary.md, and transcript.json.
    #[arg(long, value_name = "PATH")]
    report_dir: Option<PathBuf>,
}

/// Report output formats.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    /// One line per step plus a summary line.
    #[default]
    Text,
    /// Canonical JSON report.
    Json,
}

/// Process outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    /// Every step passed.
    Passed,
    /// At least one step failed.
    StepFailures,
    /// The run could not start or finish writing output.
    SetupFailure,
}

impl RunStatus {
    /// Classifies a finished report.
    const fn from_report(report: &SuiteReport) -> Self {
        if report.is_success() { Self::Passed } else { Self::StepFailures }
    }

    /// Returns the process exit code.
    const fn code(self) -> u8 {
        match self {
            Self::Passed => 0,
            Self::StepFailures => 1,
            Self::SetupFailure => 2,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        Self::from(status.code())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(status) => status.into(),
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<RunStatus> {
    let cli = Cli::parse();
    init_tracing();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("idea-center {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(RunStatus::Passed);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(RunStatus::Passed);
    };

    match command {
        Commands::Run(command) => command_run(command).await,
        Commands::Steps => command_steps(),
    }
}

/// Installs the stderr log subscriber.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_line(help.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
async fn command_run(command: RunCommand) -> CliResult<RunStatus> {
    let env = EnvConfig::load().map_err(|err| CliError::new(err.to_string()))?;
    let config = resolve_config(&command, env)?;
    info!(base_url = %config.base_url, "starting contract run");
    let report_dir = config.report_dir.clone();

    let run = SuiteRunner::new(config)
        .run()
        .await
        .map_err(|err| CliError::new(format!("run aborted: {err}")))?;

    let rendered = render_report(&run.report, command.format)?;
    write_stdout_bytes(rendered.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;

    if let Some(dir) = report_dir {
        let artifacts = RunArtifacts::new(dir).map_err(|err| CliError::new(err.to_string()))?;
        artifacts
            .write_run(&run.report, &run.transcript)
            .map_err(|err| CliError::new(err.to_string()))?;
        info!(dir = %artifacts.root().display(), "wrote run artifacts");
    }

    Ok(RunStatus::from_report(&run.report))
}

/// Merges CLI, environment, and file layers into a validated config.
fn resolve_config(command: &RunCommand, env: EnvConfig) -> CliResult<HarnessConfig> {
    let config_path = command.config.clone().or(env.config_path);
    let file =
        load_file_layer(config_path.as_deref()).map_err(|err| CliError::new(err.to_string()))?;
    let merged = cli_layer(command).over(env.layer.over(file));
    HarnessConfig::from_layer(merged).map_err(|err| CliError::new(err.to_string()))
}

/// Builds the highest-precedence layer from flags.
fn cli_layer(command: &RunCommand) -> ConfigLayer {
    ConfigLayer {
        base_url: command.base_url.clone(),
        static_token: command.token.clone(),
        email: command.email.clone(),
        password: command.password.clone(),
        report_dir: command.report_dir.clone(),
    }
}

/// Renders the report in the selected format, newline-terminated.
fn render_report(report: &SuiteReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(report.render_text()),
        OutputFormat::Json => {
            let mut json = serde_jcs::to_string(report)
                .map_err(|err| CliError::new(format!("failed to encode report: {err}")))?;
            json.push('\n');
            Ok(json)
        }
    }
}

// ============================================================================
// SECTION: Steps Command
// ============================================================================

/// Executes the `steps` command.
fn command_steps() -> CliResult<RunStatus> {
    for line in plan_lines() {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(RunStatus::Passed)
}

/// Formats the step plan, one line per step.
fn plan_lines() -> Vec<String> {
    plan()
        .into_iter()
        .map(|step| {
            let suffix = if step.requires_idea_id { " (uses listed idea id)" } else { "" };
            format!("{}. {}{suffix}", step.order, step.name)
        })
        .collect()
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)?;
    stdout.flush()
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns the setup-failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    RunStatus::SetupFailure.into()
}
