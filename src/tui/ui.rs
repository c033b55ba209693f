// Screen layout
//
// Title bar on top, key help at the bottom, map panel on the left with the
// target readout / status feed / log tail stacked in a sidebar.

use crate::tui::app::App;
use crate::tui::components::{logs_panel, readout_panel, status_panel, title_bar};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HELP_LINE: &str =
    " l locate │ y copy │ c clear │ b detonate │ click/drag set target │ ↑↓←→ pan │ +/- zoom │ t theme │ q quit";

pub fn draw(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(10),   // body
            Constraint::Length(1), // help
        ])
        .split(f.area());

    title_bar::render(f, rows[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(36)])
        .split(rows[1]);

    // Remember the map's inner rect so mouse events can be hit-tested
    let map_block = Block::default().borders(Borders::ALL);
    app.map_area = map_block.inner(body[0]);
    app.session
        .map()
        .render(f, body[0], &app.theme, &app.explosion);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // readout
            Constraint::Length(6), // status
            Constraint::Min(4),    // logs
        ])
        .split(body[1]);

    readout_panel::render(f, sidebar[0], app);
    status_panel::render(f, sidebar[1], app);
    logs_panel::render(f, sidebar[2], app);

    let help = Paragraph::new(HELP_LINE).style(Style::default().fg(app.theme.border));
    f.render_widget(help, rows[2]);
}
