/*
[INPUT]:  LogFeed entries
[OUTPUT]: Log panel rendered into Ratatui frame, pinned to the newest line
[POS]:    TUI UI logs panel rendering
[UPDATE]: When changing log colouring or scroll behaviour
*/

use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use nexus_console::LogFeed;

use crate::tui::ui::{border_style, category_style};

/// Index of the first entry shown when `rows` lines fit in the panel.
fn tail_start(len: usize, rows: usize) -> usize {
    len.saturating_sub(rows)
}

pub(in crate::tui) fn draw_logs(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    feed: &LogFeed,
) {
    let available = area.height.saturating_sub(2) as usize;
    let entries = feed.entries();
    let view = &entries[tail_start(entries.len(), available)..];

    let text = view
        .iter()
        .map(|entry| {
            Line::from(Span::styled(
                format!("> {}", entry.text()),
                category_style(entry.category()),
            ))
        })
        .collect::<Vec<_>>();
    let log_widget = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Agent Log"),
    );
    frame.render_widget(log_widget, area);
}
