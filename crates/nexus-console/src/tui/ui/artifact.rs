/*
[INPUT]:  Current artifact and scroll offset
[OUTPUT]: Code panel, or a placeholder before anything is generated
[POS]:    TUI UI artifact panel rendering
[UPDATE]: When changing how generated code is displayed
*/

use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use nexus_console::Artifact;

use crate::tui::ui::border_style;

const PLACEHOLDER: &str = "AWAITING INPUT...";

pub(in crate::tui) fn draw_artifact(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    artifact: &Artifact,
    scroll: u16,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title("Generated Code");

    let widget = if artifact.is_empty() {
        Paragraph::new(PLACEHOLDER)
            .style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
            .alignment(Alignment::Center)
            .block(block)
    } else {
        let lines = artifact.as_str().lines().count();
        let max_scroll = lines.saturating_sub(1).min(u16::MAX as usize) as u16;
        Paragraph::new(artifact.as_str())
            .style(Style::default().fg(Color::White))
            .scroll((scroll.min(max_scroll), 0))
            .block(block)
    };
    frame.render_widget(widget, area);
}
