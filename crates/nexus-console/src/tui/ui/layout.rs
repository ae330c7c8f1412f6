/*
[INPUT]:  Lifecycle status, narration flag, prompt input
[OUTPUT]: Status header and prompt bar
[POS]:    TUI UI top bars
[UPDATE]: When changing the header fields or the prompt behaviour
*/

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use nexus_console::LifecycleStatus;

use crate::tui::app::AppState;
use crate::tui::ui::{border_style, header_style};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

fn status_style(status: LifecycleStatus) -> Style {
    let color = match status {
        LifecycleStatus::Idle => Color::Gray,
        LifecycleStatus::Running => Color::Yellow,
        LifecycleStatus::Succeeded => Color::LightGreen,
        LifecycleStatus::Failed => Color::LightRed,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub(in crate::tui) fn draw_header(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let status = app.orchestrator.status();
    let mut spans = vec![
        Span::styled(" NEXUS CONSOLE ", header_style()),
        Span::raw("  SYSTEM STATUS: "),
        Span::styled(status.to_string(), status_style(status)),
    ];
    if status.is_running() {
        spans.push(Span::raw(format!(" {}", SPINNER[app.ticks % SPINNER.len()])));
    }
    let voice = if app.orchestrator.narration_enabled() {
        "ON"
    } else {
        "OFF"
    };
    spans.push(Span::raw(format!("   VOICE: {voice}")));

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style()),
    );
    frame.render_widget(widget, area);
}

pub(in crate::tui) fn draw_prompt(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let running = app.orchestrator.status().is_running();
    let width = area.width.saturating_sub(2).max(1) as usize;
    let scroll = app.input.visual_scroll(width);

    let (title, style) = if running {
        ("Task (locked while agents run)", Style::default().fg(Color::DarkGray))
    } else {
        ("Task", Style::default().fg(Color::White))
    };
    let widget = Paragraph::new(app.input.value())
        .style(style)
        .scroll((0, scroll as u16))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(title),
        );
    frame.render_widget(widget, area);

    if !running {
        let cursor = app.input.visual_cursor().saturating_sub(scroll) as u16;
        frame.set_cursor_position((area.x + 1 + cursor, area.y + 1));
    }
}
