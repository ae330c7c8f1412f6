/*
[INPUT]:  Process stdout and panic hook chain
[OUTPUT]: TerminalGuard owning the console's alternate screen for one session
[POS]:    TUI terminal lifecycle guard
[UPDATE]: When changing terminal setup or teardown
*/

use std::io;
use std::sync::Once;

use anyhow::{Context, Result};
use crossterm::ExecutableCommand;
use crossterm::terminal::SetTitle;
use ratatui::DefaultTerminal;
use tracing::warn;

const WINDOW_TITLE: &str = "Nexus Console";

static PANIC_HOOK: Once = Once::new();

/// Alternate screen plus raw mode for the lifetime of the value. The screen is
/// also restored if the UI panics, so the operator's shell stays usable.
pub(super) struct TerminalGuard {
    terminal: DefaultTerminal,
}

impl TerminalGuard {
    pub(super) fn new() -> Result<Self> {
        install_restore_on_panic();
        let terminal = ratatui::try_init().context("initialize terminal")?;
        if let Err(err) = io::stdout().execute(SetTitle(WINDOW_TITLE)) {
            warn!(error = %err, "failed to set terminal title");
        }
        Ok(Self { terminal })
    }

    pub(super) fn draw<F>(&mut self, render: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(render).context("draw frame")?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = ratatui::try_restore() {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}

fn install_restore_on_panic() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = ratatui::try_restore();
            previous(info);
        }));
    });
}
