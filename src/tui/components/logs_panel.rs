// System logs panel
//
// Tail of the in-memory tracing buffer, one line per entry, colored by level.

use crate::logging::LogLevel;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" LOG ")
        .title_style(Style::default().fg(theme.title));
    let inner_height = block.inner(area).height as usize;

    let lines: Vec<Line> = app
        .log_buffer
        .recent(inner_height)
        .into_iter()
        .map(|entry| {
            let level_color = match entry.level {
                LogLevel::Error => theme.log_error,
                LogLevel::Warn => theme.log_warn,
                LogLevel::Info => theme.log_info,
                LogLevel::Debug | LogLevel::Trace => theme.log_debug,
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(theme.log_debug),
                ),
                Span::styled(
                    format!("{:<5} ", entry.level.as_str()),
                    Style::default().fg(level_color),
                ),
                Span::styled(entry.message, Style::default().fg(theme.fg)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
