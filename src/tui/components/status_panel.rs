// Status feed panel
//
// Shows the single most-recent status message (possibly multi-line).
// Lines are colored by their leading tag.

use crate::tui::app::App;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Pick a color from the bracketed tag at the start of a status line
fn line_color(line: &str, theme: &Theme) -> Color {
    if line.starts_with("[ERR]") || line.starts_with("[DENY]") || line.starts_with("[TIMEOUT]") {
        theme.status_err
    } else if line.starts_with("[WARN]") {
        theme.status_warn
    } else if line.starts_with("[OK]") || line.starts_with("[READY]") {
        theme.status_ok
    } else {
        // [SYS], [~], [MANUAL], [MOVE] and anything untagged
        theme.status_info
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let lines: Vec<Line> = app
        .session
        .status()
        .latest()
        .lines()
        .map(|l| Line::styled(l.to_string(), Style::default().fg(line_color(l, theme))))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" STATUS ")
        .title_style(Style::default().fg(theme.title));

    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}
