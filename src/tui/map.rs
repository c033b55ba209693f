// Map surface - world map canvas, viewport math and the MapView impl
//
// The viewport tracks a center and a Leaflet-style zoom level and converts
// between terminal cells and geographic coordinates. Zoom z shows a window
// 360 / 2^z degrees wide; latitude span follows from the panel's aspect
// ratio (a terminal cell is roughly twice as tall as it is wide).

use crate::effects::Explosion;
use crate::session::MapView;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{
        canvas::{Canvas, Circle, Map, MapResolution},
        Block, Borders,
    },
    Frame,
};
use std::time::{Duration, Instant};

/// Meters per degree of latitude, for the accuracy circle radius
const METERS_PER_DEGREE: f64 = 111_320.0;

const MIN_ZOOM: f64 = 1.0;
const MAX_ZOOM: f64 = 18.0;

/// In-flight camera transition
struct Fly {
    from: (f64, f64, f64),
    to: (f64, f64, f64),
    started: Instant,
    duration: Duration,
}

/// Pannable/zoomable camera over the world map
pub struct Viewport {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: f64,
    fly: Option<Fly>,
}

impl Viewport {
    pub fn new(center_lat: f64, center_lng: f64, zoom: f64) -> Self {
        Self {
            center_lat,
            center_lng,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            fly: None,
        }
    }

    /// Longitude span of the visible window in degrees
    pub fn lng_span(&self) -> f64 {
        360.0 / 2f64.powf(self.zoom)
    }

    /// Visible window as ((lng_min, lng_max), (lat_min, lat_max)) for a
    /// panel of the given cell dimensions
    pub fn bounds(&self, width: u16, height: u16) -> ((f64, f64), (f64, f64)) {
        let half_lng = self.lng_span() / 2.0;
        // Cells are ~2x taller than wide, so height counts double
        let aspect = (height as f64 * 2.0) / (width.max(1) as f64);
        let half_lat = half_lng * aspect;
        (
            (self.center_lng - half_lng, self.center_lng + half_lng),
            (self.center_lat - half_lat, self.center_lat + half_lat),
        )
    }

    /// Geographic coordinates at the center of a terminal cell, or None
    /// when the cell is outside the panel
    pub fn cell_to_coords(&self, area: Rect, col: u16, row: u16) -> Option<(f64, f64)> {
        if !area.contains(ratatui::layout::Position { x: col, y: row }) {
            return None;
        }
        let ((lng_min, lng_max), (lat_min, lat_max)) = self.bounds(area.width, area.height);
        let fx = (col - area.x) as f64 + 0.5;
        let fy = (row - area.y) as f64 + 0.5;
        let lng = lng_min + (lng_max - lng_min) * fx / area.width.max(1) as f64;
        // Row 0 is the top of the panel, which is the maximum latitude
        let lat = lat_max - (lat_max - lat_min) * fy / area.height.max(1) as f64;
        Some((lat, lng))
    }

    /// Terminal cell containing the given coordinates, or None when the
    /// point is off screen
    pub fn coords_to_cell(&self, area: Rect, lat: f64, lng: f64) -> Option<(u16, u16)> {
        let ((lng_min, lng_max), (lat_min, lat_max)) = self.bounds(area.width, area.height);
        if lng < lng_min || lng > lng_max || lat < lat_min || lat > lat_max {
            return None;
        }
        let fx = (lng - lng_min) / (lng_max - lng_min);
        let fy = (lat_max - lat) / (lat_max - lat_min);
        let col = area.x + ((fx * area.width as f64) as u16).min(area.width.saturating_sub(1));
        let row = area.y + ((fy * area.height as f64) as u16).min(area.height.saturating_sub(1));
        Some((col, row))
    }

    /// Pan by a fraction of the current visible span. Cancels any fly-to.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.fly = None;
        let span = self.lng_span();
        self.center_lng = (self.center_lng + span * dx).clamp(-180.0, 180.0);
        self.center_lat = (self.center_lat + span * dy * 0.5).clamp(-85.0, 85.0);
    }

    pub fn zoom_in(&mut self) {
        self.fly = None;
        self.zoom = (self.zoom + 1.0).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.fly = None;
        self.zoom = (self.zoom - 1.0).max(MIN_ZOOM);
    }

    /// Start an animated transition to the target center and zoom
    pub fn fly_to(&mut self, lat: f64, lng: f64, zoom: f64, duration: Duration) {
        self.fly = Some(Fly {
            from: (self.center_lat, self.center_lng, self.zoom),
            to: (lat, lng, zoom.clamp(MIN_ZOOM, MAX_ZOOM)),
            started: Instant::now(),
            duration,
        });
    }

    /// Advance the fly-to animation; called once per frame tick
    pub fn tick(&mut self) {
        let Some(fly) = &self.fly else {
            return;
        };

        let t = if fly.duration.is_zero() {
            1.0
        } else {
            (fly.started.elapsed().as_secs_f64() / fly.duration.as_secs_f64()).min(1.0)
        };
        // Smoothstep easing
        let s = t * t * (3.0 - 2.0 * t);

        self.center_lat = fly.from.0 + (fly.to.0 - fly.from.0) * s;
        self.center_lng = fly.from.1 + (fly.to.1 - fly.from.1) * s;
        self.zoom = fly.from.2 + (fly.to.2 - fly.from.2) * s;

        if t >= 1.0 {
            self.fly = None;
        }
    }

    /// Whether a fly-to transition is still in progress
    #[allow(dead_code)] // exercised by tests
    pub fn is_flying(&self) -> bool {
        self.fly.is_some()
    }
}

/// The accuracy circle layer
#[derive(Debug, Clone, Copy)]
struct AccuracyCircle {
    lat: f64,
    lng: f64,
    radius_m: f64,
}

/// Terminal map surface: viewport plus the marker/circle/popup layers the
/// session places on it
pub struct MapSurface {
    pub viewport: Viewport,
    marker: Option<(f64, f64)>,
    circle: Option<AccuracyCircle>,
    popup: Option<String>,
}

impl MapSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            marker: None,
            circle: None,
            popup: None,
        }
    }

    pub fn marker(&self) -> Option<(f64, f64)> {
        self.marker
    }

    /// Render the map panel; returns nothing but records into the frame
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, explosion: &Explosion) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(" MAP ")
            .title_style(Style::default().fg(theme.title));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let ((lng_min, lng_max), (lat_min, lat_max)) = self.viewport.bounds(inner.width, inner.height);
        let canvas = Canvas::default()
            .x_bounds([lng_min, lng_max])
            .y_bounds([lat_min, lat_max])
            .paint(|ctx| {
                ctx.draw(&Map {
                    color: theme.map_land,
                    resolution: MapResolution::High,
                });

                if let Some(c) = self.circle {
                    if c.radius_m > 0.0 {
                        ctx.draw(&Circle {
                            x: c.lng,
                            y: c.lat,
                            radius: c.radius_m / METERS_PER_DEGREE,
                            color: theme.accuracy,
                        });
                    }
                }

                ctx.layer();

                if let Some((lat, lng)) = self.marker {
                    ctx.print(
                        lng,
                        lat,
                        Line::styled("◉", Style::default().fg(theme.marker)),
                    );
                    if let Some(popup) = &self.popup {
                        // Popup one text row above the marker
                        let row_deg = (lat_max - lat_min) / inner.height.max(1) as f64;
                        ctx.print(
                            lng,
                            lat + row_deg,
                            Line::styled(popup.clone(), Style::default().fg(theme.popup)),
                        );
                    }
                }

                if !explosion.is_active() {
                    return;
                }
                for spark in explosion.sparks() {
                    let color = if spark.age < 0.5 {
                        theme.spark_hot
                    } else {
                        theme.spark_cool
                    };
                    ctx.print(spark.x, spark.y, Line::styled("✦", Style::default().fg(color)));
                }
            });
        f.render_widget(canvas, inner);
    }
}

impl MapView for MapSurface {
    fn place_marker(&mut self, lat: f64, lng: f64) {
        self.marker = Some((lat, lng));
    }

    fn place_accuracy_circle(&mut self, lat: f64, lng: f64, radius_m: f64) {
        self.circle = Some(AccuracyCircle { lat, lng, radius_m });
    }

    fn accuracy_radius(&self) -> Option<f64> {
        self.circle.map(|c| c.radius_m)
    }

    fn set_popup(&mut self, text: &str) {
        self.popup = Some(text.to_string());
    }

    fn clear_layers(&mut self) {
        self.marker = None;
        self.circle = None;
        self.popup = None;
    }

    fn fly_to(&mut self, lat: f64, lng: f64, zoom: f64, duration: Duration) {
        self.viewport.fly_to(lat, lng, zoom, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_center_and_span() {
        let v = Viewport::new(0.0, 0.0, 2.0);
        let ((lng_min, lng_max), (lat_min, lat_max)) = v.bounds(80, 20);
        // Zoom 2 shows a 90 degree wide window
        assert_eq!(lng_max - lng_min, 90.0);
        assert_eq!((lng_min + lng_max) / 2.0, 0.0);
        // 80x20 panel: aspect (20*2)/80 = 0.5, so 45 degrees tall
        assert_eq!(lat_max - lat_min, 45.0);
        assert_eq!((lat_min + lat_max) / 2.0, 0.0);
    }

    #[test]
    fn test_cell_coords_roundtrip() {
        let v = Viewport::new(40.0, -74.0, 6.0);
        let area = Rect::new(2, 1, 60, 24);
        let (lat, lng) = v.cell_to_coords(area, 30, 12).unwrap();
        let (col, row) = v.coords_to_cell(area, lat, lng).unwrap();
        assert_eq!((col, row), (30, 12));
    }

    #[test]
    fn test_cell_outside_area_is_none() {
        let v = Viewport::new(0.0, 0.0, 2.0);
        let area = Rect::new(0, 0, 10, 10);
        assert!(v.cell_to_coords(area, 50, 50).is_none());
    }

    #[test]
    fn test_offscreen_coords_are_none() {
        let v = Viewport::new(0.0, 0.0, 10.0);
        let area = Rect::new(0, 0, 40, 20);
        // Zoom 10 is a fraction of a degree wide; the antipode is offscreen
        assert!(v.coords_to_cell(area, 0.0, 179.0).is_none());
    }

    #[test]
    fn test_zoom_clamps() {
        let mut v = Viewport::new(0.0, 0.0, 17.5);
        v.zoom_in();
        assert_eq!(v.zoom, 18.0);
        let mut v = Viewport::new(0.0, 0.0, 1.5);
        v.zoom_out();
        assert_eq!(v.zoom, 1.0);
    }

    #[test]
    fn test_fly_to_arrives_at_target() {
        let mut v = Viewport::new(0.0, 0.0, 2.0);
        v.fly_to(40.7128, -74.006, 16.0, Duration::ZERO);
        assert!(v.is_flying());
        v.tick();
        assert!(!v.is_flying());
        assert!((v.center_lat - 40.7128).abs() < 1e-9);
        assert!((v.center_lng - -74.006).abs() < 1e-9);
        assert_eq!(v.zoom, 16.0);
    }

    #[test]
    fn test_pan_cancels_fly() {
        let mut v = Viewport::new(0.0, 0.0, 2.0);
        v.fly_to(10.0, 10.0, 8.0, Duration::from_secs(1));
        v.pan(0.1, 0.0);
        assert!(!v.is_flying());
    }

    #[test]
    fn test_surface_layers() {
        let mut s = MapSurface::new(Viewport::new(0.0, 0.0, 2.0));
        s.place_marker(1.0, 2.0);
        s.place_accuracy_circle(1.0, 2.0, 25.0);
        s.set_popup("TARGET LOCKED");
        assert_eq!(s.marker(), Some((1.0, 2.0)));
        assert_eq!(s.accuracy_radius(), Some(25.0));
        s.clear_layers();
        assert!(s.marker().is_none());
        assert!(s.accuracy_radius().is_none());
    }
}
