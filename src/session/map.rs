// MapView - the seam between the session and the map surface
//
// The session never talks to ratatui directly; it issues these commands and
// the TUI map surface (or a test mock) carries them out. This mirrors how
// the rest of the app keeps rendering concerns out of the state machine.

use std::time::Duration;

/// Commands the session issues to the map surface.
///
/// Marker and accuracy circle are place-or-move: the first call creates the
/// layer, later calls reposition it. `clear_layers` removes both (and the
/// popup) and is safe to call when nothing is placed.
pub trait MapView {
    /// Place the draggable target marker, or move it if already placed
    fn place_marker(&mut self, lat: f64, lng: f64);

    /// Place the accuracy circle (radius in meters), or move/resize it
    fn place_accuracy_circle(&mut self, lat: f64, lng: f64, radius_m: f64);

    /// Radius of the current accuracy circle, if one is placed
    fn accuracy_radius(&self) -> Option<f64>;

    /// Attach popup text to the marker
    fn set_popup(&mut self, text: &str);

    /// Remove marker, accuracy circle and popup
    fn clear_layers(&mut self);

    /// Animate the camera to center on the point at the given zoom
    fn fly_to(&mut self, lat: f64, lng: f64, zoom: f64, duration: Duration);
}
