/*
[INPUT]:  Orchestrator, crossterm input, settled backend results
[OUTPUT]: Ratatui-based TUI run loop
[POS]:    TUI runtime loop
[UPDATE]: When changing the event sources or the redraw cadence
*/

use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use nexus_console::{GenerationResult, Orchestrator};

use super::app::AppState;
use super::events::handle_key_event;
use super::terminal::TerminalGuard;
use super::ui::draw_ui;

const UI_TICK_INTERVAL: Duration = Duration::from_millis(250);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);

pub(super) enum UiEvent {
    Input(CrosstermEvent),
    Settled(GenerationResult),
}

/// Run the console until the operator quits. Returns the orchestrator so the
/// caller can shut narration down after the terminal is restored.
pub async fn run_tui(orchestrator: Orchestrator) -> Result<Orchestrator> {
    let mut terminal = TerminalGuard::new()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let input_shutdown = CancellationToken::new();
    let input_shutdown_clone = input_shutdown.clone();
    let input_tx = event_tx.clone();

    tokio::task::spawn_blocking(move || {
        while !input_shutdown_clone.is_cancelled() {
            if crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                if let Ok(event) = crossterm::event::read() {
                    let _ = input_tx.send(UiEvent::Input(event));
                }
            }
        }
    });

    let mut app = AppState::new(orchestrator, event_tx);
    let mut tick = tokio::time::interval(UI_TICK_INTERVAL);
    let mut should_quit = false;

    info!("console ready");
    while !should_quit {
        tokio::select! {
            _ = tick.tick() => {
                app.ticks = app.ticks.wrapping_add(1);
            }
            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(UiEvent::Input(CrosstermEvent::Key(key))) => {
                        if handle_key_event(&mut app, key).await {
                            should_quit = true;
                        }
                    }
                    Some(UiEvent::Input(_)) => {}
                    Some(UiEvent::Settled(result)) => app.apply_result(result),
                    None => should_quit = true,
                }
            }
        }

        terminal.draw(|frame| draw_ui(frame, &app))?;
    }

    input_shutdown.cancel();
    drop(terminal);
    info!("console closed");
    Ok(app.orchestrator)
}
