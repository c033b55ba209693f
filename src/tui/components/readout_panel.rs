// Coordinate readout panel
//
// The three display fields: latitude, longitude, accuracy. Values come
// pre-formatted from the session readout (6 decimal places, whole meters)
// or show the placeholder when no target is set.

use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let readout = app.session.readout();

    let field = |label: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(format!(" {:<4}", label), Style::default().fg(theme.title)),
            Span::styled(
                value.to_string(),
                Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let lines = vec![
        field("LAT", readout.lat()),
        field("LNG", readout.lng()),
        field("ACC", readout.acc()),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" TARGET ")
        .title_style(Style::default().fg(theme.title));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
