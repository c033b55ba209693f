// TUI module - Terminal User Interface
//
// Handles terminal initialization and cleanup, the event loop (keyboard,
// mouse, timer ticks, lookup completions) and rendering.

pub mod app;
pub mod components;
pub mod map;
pub mod theme;
pub mod ui;

use crate::config::Config;
use crate::geo::{GeoFix, LookupError};
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop and cleans up when done.
pub async fn run_tui(config: Config, log_buffer: LogBuffer) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Completed geolocation lookups arrive on this channel
    let (fix_tx, mut fix_rx) = mpsc::channel(16);
    let mut app = App::new(&config, log_buffer, fix_tx);

    let result = run_event_loop(&mut terminal, &mut app, &mut fix_rx).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Three event sources, multiplexed with tokio::select!:
/// 1. Keyboard and mouse input
/// 2. Timer ticks (camera animation, spinner, redraw)
/// 3. Completed geolocation lookups
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    fix_rx: &mut mpsc::Receiver<Result<GeoFix, LookupError>>,
) -> Result<()> {
    // 10 FPS is plenty for the fly-to animation and spinner
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard or mouse input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            // Periodic tick
            _ = tick_interval.tick() => {
                app.tick();
            }

            // A lookup finished, success or not
            Some(result) = fix_rx.recv() => {
                app.session.complete_lookup(result);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,

        // Session actions
        KeyCode::Char('l') | KeyCode::Char('L') => app.locate(),
        KeyCode::Char('y') | KeyCode::Char('Y') => app.copy_coordinates(),
        KeyCode::Char('c') | KeyCode::Char('C') => app.clear_target(),

        // Cosmetic detonation: particle burst plus terminal bell
        KeyCode::Char('b') | KeyCode::Char('B') => {
            app.detonate();
            let _ = execute!(io::stdout(), Print('\u{0007}'));
        }

        KeyCode::Char('t') | KeyCode::Char('T') => app.cycle_theme(),

        // Viewport navigation
        KeyCode::Up => app.session.map_mut().viewport.pan(0.0, 0.1),
        KeyCode::Down => app.session.map_mut().viewport.pan(0.0, -0.1),
        KeyCode::Left => app.session.map_mut().viewport.pan(-0.1, 0.0),
        KeyCode::Right => app.session.map_mut().viewport.pan(0.1, 0.0),
        KeyCode::Char('+') | KeyCode::Char('=') => app.session.map_mut().viewport.zoom_in(),
        KeyCode::Char('-') => app.session.map_mut().viewport.zoom_out(),

        _ => {}
    }
}

/// Handle mouse input: left click places a target, pressing on the marker
/// starts a drag, the scroll wheel zooms
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.on_mouse_down(mouse_event.column, mouse_event.row);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.on_mouse_drag(mouse_event.column, mouse_event.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.on_mouse_up();
        }
        MouseEventKind::ScrollUp => app.session.map_mut().viewport.zoom_in(),
        MouseEventKind::ScrollDown => app.session.map_mut().viewport.zoom_out(),
        _ => {}
    }
}
