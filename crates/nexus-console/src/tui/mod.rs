/*
[INPUT]:  Orchestrator, crossterm input, settled backend results
[OUTPUT]: Ratatui-based operator console
[POS]:    TUI module for nexus-console binary
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
*/

mod app;
mod events;
mod runtime;
mod terminal;
mod ui;

pub use runtime::run_tui;
