/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Interactive console session, or a single headless run with exit status
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod cli;
mod tui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use nexus_console::narration::{CommandDevice, NarrationDevice, SilentDevice};
use nexus_console::{ArtifactExporter, ConsoleConfig, Narrator, Orchestrator};
use nexus_console_adapter::NexusClient;

const LOG_FILE_PREFIX: &str = "nexus-console.log";

#[derive(Parser, Debug)]
#[command(name = "nexus-console", version, about = "Operator console for the Nexus code generation backend")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    /// Backend base URL, overrides the config file
    #[arg(long = "backend-url", value_name = "URL")]
    backend_url: Option<String>,
    /// Directory for exported artifacts, overrides the config file
    #[arg(long = "export-dir", value_name = "DIR")]
    export_dir: Option<PathBuf>,
    /// Start with narration off
    #[arg(long = "mute")]
    mute: bool,
    /// Run one task without the TUI and print the agent log
    #[arg(long = "task", value_name = "TEXT")]
    task: Option<String>,
    /// With --task, export the generated code after a successful run
    #[arg(long = "save", requires = "task")]
    save: bool,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    let headless = args.task.is_some() || args.dry_run;
    let _log_guard = init_tracing(&args.log_level, headless)?;

    info!(
        config_path = ?args.config_path,
        dry_run = args.dry_run,
        headless,
        "starting nexus-console"
    );

    let config = load_config(&args)?;
    info!(
        backend = %config.backend.base_url,
        narration = config.narration.enabled,
        "configuration loaded"
    );

    let client = NexusClient::with_config(config.backend.client_config())
        .context("create backend client")?;
    let exporter =
        ArtifactExporter::from_config(&config.export).context("invalid export settings")?;

    if args.dry_run {
        info!(base_url = %client.base_url(), "dry-run requested; configuration validated");
        return Ok(ExitCode::SUCCESS);
    }

    let device: Arc<dyn NarrationDevice> =
        if headless || config.narration.program.trim().is_empty() {
            Arc::new(SilentDevice)
        } else {
            Arc::new(CommandDevice::discover(config.narration.program.clone()).await)
        };
    let narrator = Narrator::new(device, config.narration.clone());
    let mut orchestrator = Orchestrator::new(Arc::new(client), narrator, exporter);

    let code = match args.task.as_deref() {
        Some(task) => {
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());
            let code = cli::run_headless(&mut orchestrator, task, args.save, shutdown).await?;
            ExitCode::from(code)
        }
        None => {
            orchestrator = tui::run_tui(orchestrator).await?;
            ExitCode::SUCCESS
        }
    };

    orchestrator.shutdown();
    info!("nexus-console stopped");
    Ok(code)
}

/// Headless runs log to stderr. The TUI owns the terminal, so it logs to a
/// daily file instead; the returned guard flushes that file on drop.
fn init_tracing(log_level: &str, headless: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow!(err))
            .context("initialize tracing subscriber")?;
        return Ok(None);
    }

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(Some(guard))
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nexus-console")
        .join("logs")
}

fn load_config(args: &Cli) -> Result<ConsoleConfig> {
    let mut config = match &args.config_path {
        Some(path) => read_config(path)?,
        None => ConsoleConfig::default(),
    };

    if let Some(url) = &args.backend_url {
        config.backend.base_url = url.clone();
    }
    if let Some(dir) = &args.export_dir {
        config.export.dir = Some(dir.clone());
    }
    if args.mute {
        config.narration.enabled = false;
    }
    Ok(config)
}

fn read_config(path: &Path) -> Result<ConsoleConfig> {
    ConsoleConfig::from_file(path).context("load config")
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
