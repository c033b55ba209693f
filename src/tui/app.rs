// TUI application state
//
// Glues the session to the terminal: owns the session (with its map
// surface), the geolocation provider, the clipboard, the detonation effect
// and the theme. Input handlers in tui::mod call into here.

use crate::clipboard::SystemClipboard;
use crate::config::Config;
use crate::effects::Explosion;
use crate::geo::{GeoFix, GeolocationProvider, IpGeoProvider, LookupError};
use crate::logging::LogBuffer;
use crate::session::map::MapView;
use crate::session::LocationSession;
use crate::tui::map::{MapSurface, Viewport};
use crate::tui::theme::{Theme, ThemeKind};
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main application state for the TUI
pub struct App {
    /// The location session driving the map surface
    pub session: LocationSession<MapSurface>,

    /// Geolocation provider for the locate action
    pub provider: Arc<dyn GeolocationProvider>,

    /// System clipboard sink for the copy action
    pub clipboard: SystemClipboard,

    /// Completed lookups are sent here and drained by the event loop
    pub fix_tx: mpsc::Sender<Result<GeoFix, LookupError>>,

    /// Cosmetic detonation overlay
    pub explosion: Explosion,

    /// Log buffer for the logs panel
    pub log_buffer: LogBuffer,

    pub theme_kind: ThemeKind,
    pub theme: Theme,

    pub should_quit: bool,

    /// When the app started (for uptime display)
    pub start_time: Instant,

    /// Inner rect of the map panel from the last draw; mouse hit testing
    /// needs it to convert cells to coordinates
    pub map_area: Rect,

    /// Marker drag in progress: last coordinates the marker was moved to
    drag: Option<(f64, f64)>,

    spinner_frame: usize,
}

impl App {
    pub fn new(
        config: &Config,
        log_buffer: LogBuffer,
        fix_tx: mpsc::Sender<Result<GeoFix, LookupError>>,
    ) -> Self {
        let viewport = Viewport::new(
            config.viewport.initial_lat,
            config.viewport.initial_lng,
            config.viewport.initial_zoom,
        );
        let theme_kind = ThemeKind::from_name(&config.theme);

        Self {
            session: LocationSession::new(MapSurface::new(viewport)),
            provider: Arc::new(IpGeoProvider::new(config)),
            clipboard: SystemClipboard,
            fix_tx,
            explosion: Explosion::default(),
            log_buffer,
            theme_kind,
            theme: theme_kind.theme(),
            should_quit: false,
            start_time: Instant::now(),
            map_area: Rect::default(),
            drag: None,
            spinner_frame: 0,
        }
    }

    /// Per-frame housekeeping: camera animation and spinner advance
    pub fn tick(&mut self) {
        self.session.map_mut().viewport.tick();
        if self.session.scanning() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    /// Uptime as HH:MM:SS
    pub fn uptime(&self) -> String {
        let seconds = self.start_time.elapsed().as_secs();
        format!(
            "{:02}:{:02}:{:02}",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        )
    }

    // ── User actions ─────────────────────────────────────────────────────

    pub fn locate(&mut self) {
        let provider = self.provider.clone();
        self.session
            .request_location(provider.as_ref(), self.fix_tx.clone());
    }

    pub fn copy_coordinates(&mut self) {
        self.session.copy_current_coordinates(&self.clipboard);
    }

    pub fn clear_target(&mut self) {
        self.session.clear();
    }

    /// Detonate at the marker, or at the viewport center without one
    pub fn detonate(&mut self) {
        let viewport = &self.session.map().viewport;
        let (lat, lng) = self
            .session
            .map()
            .marker()
            .unwrap_or((viewport.center_lat, viewport.center_lng));
        let reach = viewport.lng_span() * 0.15;
        self.explosion.trigger(lng, lat, reach);
    }

    pub fn cycle_theme(&mut self) {
        self.theme_kind = self.theme_kind.next();
        self.theme = self.theme_kind.theme();
        tracing::debug!("Theme switched to {}", self.theme_kind.name());
    }

    // ── Mouse handling ───────────────────────────────────────────────────

    /// Left button pressed: start a marker drag when the press lands on the
    /// marker cell, otherwise treat it as a manual placement click
    pub fn on_mouse_down(&mut self, col: u16, row: u16) {
        let area = self.map_area;
        let viewport = &self.session.map().viewport;

        if let Some((lat, lng)) = self.session.map().marker() {
            if let Some((mcol, mrow)) = viewport.coords_to_cell(area, lat, lng) {
                if col.abs_diff(mcol) <= 1 && row.abs_diff(mrow) <= 1 {
                    self.drag = Some((lat, lng));
                    return;
                }
            }
        }

        if let Some((lat, lng)) = viewport.cell_to_coords(area, col, row) {
            self.session.handle_manual_click(lat, lng);
        }
    }

    /// Drag in progress: move the marker visually, commit on release
    pub fn on_mouse_drag(&mut self, col: u16, row: u16) {
        if self.drag.is_none() {
            return;
        }
        if let Some((lat, lng)) = self.session.map().viewport.cell_to_coords(self.map_area, col, row)
        {
            self.session.map_mut().place_marker(lat, lng);
            self.drag = Some((lat, lng));
        }
    }

    /// Left button released: finish the drag, preserving the accuracy
    /// circle's current radius
    pub fn on_mouse_up(&mut self) {
        if let Some((lat, lng)) = self.drag.take() {
            let radius = self.session.map().accuracy_radius().unwrap_or(0.0);
            self.session.handle_marker_drag_end(lat, lng, radius);
        }
    }
}
