// Title bar component
//
// App name and version on the left, scan indicator / theme / uptime on the
// right. The scan indicator is the visual half of the session's `scanning`
// flag: an animated spinner while a lookup is in flight, IDLE otherwise.

use crate::config::VERSION;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let scan = if app.session.scanning() {
        Span::styled(
            format!("{} SCANNING", app.spinner()),
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("● IDLE", Style::default().fg(theme.status_ok))
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" GEOPIN v{} ", VERSION),
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(theme.border)),
        scan,
        Span::styled(" │ ", Style::default().fg(theme.border)),
        Span::styled(app.theme_kind.name(), Style::default().fg(theme.fg)),
        Span::styled(" │ ", Style::default().fg(theme.border)),
        Span::styled(app.uptime(), Style::default().fg(theme.fg)),
    ]);

    f.render_widget(Paragraph::new(line), area);
}
