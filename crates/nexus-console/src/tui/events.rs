/*
[INPUT]:  Crossterm key events
[OUTPUT]: Operator actions on AppState
[POS]:    TUI key routing
[UPDATE]: When changing hotkeys
*/

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tui_input::backend::crossterm::EventHandler;

use super::app::AppState;

const PAGE: i32 = 10;

/// Handles key events for the TUI.
///
/// Returns `true` if quit is requested, `false` otherwise.
pub(super) async fn handle_key_event(app: &mut AppState, key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') if ctrl => true,
        KeyCode::Char('s') if ctrl => {
            app.export_artifact().await;
            false
        }
        KeyCode::Char('n') if ctrl => {
            app.toggle_narration();
            false
        }
        KeyCode::Enter => {
            app.submit();
            false
        }
        KeyCode::PageDown => {
            app.scroll_artifact(PAGE);
            false
        }
        KeyCode::PageUp => {
            app.scroll_artifact(-PAGE);
            false
        }
        _ => {
            if !app.orchestrator.status().is_running() {
                app.input.handle_event(&Event::Key(key));
            }
            false
        }
    }
}
