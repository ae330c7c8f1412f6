/*
[INPUT]:  TUI app state
[OUTPUT]: Full console frame: header, prompt, log feed, artifact, hotkeys
[POS]:    TUI UI module root and shared palette
[UPDATE]: When changing panel layout or colours
*/

mod artifact;
mod layout;
mod logs;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use nexus_console::LogCategory;

use super::app::AppState;
use artifact::draw_artifact;
use layout::{draw_header, draw_prompt};
use logs::draw_logs;

pub(in crate::tui) fn draw_ui(frame: &mut ratatui::Frame, app: &AppState) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(area);

    draw_header(frame, layout[0], app);
    draw_prompt(frame, layout[1], app);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(layout[2]);
    draw_logs(frame, panels[0], app.orchestrator.feed());
    draw_artifact(frame, panels[1], app.orchestrator.artifact(), app.artifact_scroll);

    draw_footer(frame, layout[3], app);
}

fn draw_footer(frame: &mut ratatui::Frame, area: ratatui::layout::Rect, app: &AppState) {
    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let line1 = Line::from(vec![
        Span::styled("[Enter]", key_style),
        Span::raw(" Deploy  "),
        Span::styled("[Ctrl-S]", key_style),
        Span::raw(" Export  "),
        Span::styled("[Ctrl-N]", key_style),
        Span::raw(" Voice  "),
        Span::styled("[PgUp/PgDn]", key_style),
        Span::raw(" Scroll code  "),
        Span::styled("[Esc]", key_style),
        Span::raw(" Quit"),
    ]);
    let line2 = Line::from(Span::raw(format!("Status: {}", app.status_message)));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title("Hotkeys");
    let widget = Paragraph::new(Text::from(vec![line1, line2]))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

pub(in crate::tui) fn border_style() -> Style {
    Style::default().fg(Color::Green)
}

pub(in crate::tui) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub(in crate::tui) fn category_style(category: LogCategory) -> Style {
    match category {
        LogCategory::Error => Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD),
        LogCategory::Highlight => Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD),
        LogCategory::Plain => Style::default().fg(Color::Green),
    }
}
