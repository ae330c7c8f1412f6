/*
[INPUT]:  One task from the command line, orchestrator, shutdown token
[OUTPUT]: Agent log on stdout, status and export notice on stderr, process exit code
[POS]:    Headless runner - scripted use without the TUI
[UPDATE]: When changing headless output or exit codes
*/

use std::io::Write;

use anyhow::{Context, Result, bail};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use nexus_console::{LifecycleStatus, Orchestrator};

pub const SUCCEEDED: u8 = 0;
pub const FAILED: u8 = 1;
/// Exit code for a run interrupted by a signal.
pub const INTERRUPTED: u8 = 130;

/// Run one task to completion and return the process exit code.

pub async fn run_headless(
    orchestrator: &mut Orchestrator,
    task: &str,
    save: bool,
    shutdown: CancellationToken,
) -> Result<u8> {
    let accepted = tokio::select! {
        accepted = orchestrator.submit(task) => accepted,
        _ = shutdown.cancelled() => {
            warn!("run interrupted before the backend answered");
            return Ok(INTERRUPTED);
        }
    };
    if !accepted {
        bail!("task text must not be empty");
    }

    {
        let mut stdout = std::io::stdout().lock();
        for entry in orchestrator.feed().entries() {
            writeln!(stdout, "{}", entry.text()).context("write agent log")?;
        }
        stdout.flush().context("write agent log")?;
    }

    let status = orchestrator.status();
    eprintln!("SYSTEM STATUS: {status}");

    if save {
        let outcome = orchestrator
            .export_artifact()
            .await
            .context("export artifact")?;
        eprintln!("{outcome}");
    }

    Ok(if status == LifecycleStatus::Succeeded {
        SUCCEEDED
    } else {
        FAILED
    })
}
