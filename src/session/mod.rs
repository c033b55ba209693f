// LocationSession - the state machine behind the map
//
// Owns the current target position, the formatted coordinate readout and the
// status feed, and drives the map surface through the MapView trait. User
// actions (locate, map click, marker drag, copy, clear) all funnel through
// here; nothing else mutates the session state.
//
// The geolocation lookup is the only async operation: request_location spawns
// the provider future and the completion comes back through an mpsc channel
// owned by the event loop, which hands it to complete_lookup.

pub mod map;
pub mod position;

pub use map::MapView;
pub use position::{Position, Readout, PLACEHOLDER};

use crate::clipboard::ClipboardSink;
use crate::geo::{GeoFix, GeolocationProvider, LookupError, LookupOptions};
use std::time::Duration;
use tokio::sync::mpsc;

/// Zoom level the camera flies to after a target is set
pub const TARGET_ZOOM: f64 = 16.0;

/// Duration of the fly-to camera transition
pub const FLY_DURATION: Duration = Duration::from_millis(750);

/// Popup text attached to the marker
const MARKER_POPUP: &str = "TARGET LOCKED";

/// Write-only, most-recent-message status feed.
///
/// Every operation fully replaces the content; there is no history. A message
/// may span multiple lines.
#[derive(Debug, Clone)]
pub struct StatusFeed {
    latest: String,
}

impl StatusFeed {
    fn new() -> Self {
        Self {
            latest: "[READY] Press 'l' to start a position scan.".to_string(),
        }
    }

    fn set(&mut self, message: impl Into<String>) {
        self.latest = message.into();
    }

    fn set_lines(&mut self, lines: &[&str]) {
        self.latest = lines.join("\n");
    }

    pub fn latest(&self) -> &str {
        &self.latest
    }
}

/// The position currently tracked, if any. Invariant: `has_location()`
/// is true exactly when a position is present.
#[derive(Debug, Clone, Copy, Default)]
struct SessionState {
    current_position: Option<Position>,
}

/// Session over a map surface `M`.
///
/// Initial state: no position, not scanning, `[READY]` status.
pub struct LocationSession<M: MapView> {
    map: M,
    state: SessionState,
    scanning: bool,
    status: StatusFeed,
    readout: Readout,
}

impl<M: MapView> LocationSession<M> {
    pub fn new(map: M) -> Self {
        Self {
            map,
            state: SessionState::default(),
            scanning: false,
            status: StatusFeed::new(),
            readout: Readout::default(),
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn has_location(&self) -> bool {
        self.state.current_position.is_some()
    }

    pub fn position(&self) -> Option<Position> {
        self.state.current_position
    }

    pub fn scanning(&self) -> bool {
        self.scanning
    }

    pub fn status(&self) -> &StatusFeed {
        &self.status
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    /// Start a one-shot position scan.
    ///
    /// If no provider capability is present this reports the failure and
    /// returns without side effects. Otherwise the lookup future is spawned
    /// and its result arrives later via `complete_lookup`. Overlapping scans
    /// are allowed; results apply in completion order (last resolved wins).
    pub fn request_location<P: GeolocationProvider + ?Sized>(
        &mut self,
        provider: &P,
        results: mpsc::Sender<Result<GeoFix, LookupError>>,
    ) {
        if !provider.is_available() {
            self.status
                .set("[ERR] Geolocation is not available on this system.");
            tracing::warn!("Position scan requested but no provider is available");
            return;
        }

        self.scanning = true;
        self.status.set_lines(&[
            "[SYS] Opening encrypted channel...",
            "[SYS] Loading GEO modules...",
            "[~] Triangulating signal...",
        ]);
        tracing::info!("Position scan started");

        let lookup = provider.request_position(LookupOptions::default());
        tokio::spawn(async move {
            let result = lookup.await;
            // Receiver gone means the app is shutting down
            let _ = results.send(result).await;
        });
    }

    /// Apply a finished lookup. Every completion clears `scanning`, success
    /// or not, so a stale overlapping scan can never leave the flag latched.
    /// Failures touch only the status feed; the tracked position is unchanged.
    pub fn complete_lookup(&mut self, result: Result<GeoFix, LookupError>) {
        self.scanning = false;

        match result {
            Ok(fix) => {
                self.set_target(fix.lat, fix.lng, fix.accuracy);
                let coords = format!(
                    "LAT={:.6} LNG={:.6} ACC={}m",
                    fix.lat,
                    fix.lng,
                    self.readout.acc()
                );
                self.status
                    .set_lines(&["[OK] Coordinates acquired.", coords.as_str()]);
                tracing::info!("Fix acquired at {:.6},{:.6}", fix.lat, fix.lng);
            }
            Err(err) => {
                self.status.set(err.status_message());
                tracing::warn!("Position scan failed: {:?}", err);
            }
        }
    }

    /// Set the tracked position and update every representation of it:
    /// marker, accuracy circle (radius 0 when accuracy is absent), popup,
    /// readout, and an animated camera move to a close zoom.
    ///
    /// Idempotent for identical inputs. Out-of-range coordinates are a
    /// caller contract violation and are not defended here.
    pub fn set_target(&mut self, lat: f64, lng: f64, accuracy: Option<f64>) {
        self.state.current_position = Some(Position::new(lat, lng, accuracy));
        self.readout.set(lat, lng, accuracy);

        self.map.place_marker(lat, lng);
        self.map
            .place_accuracy_circle(lat, lng, accuracy.unwrap_or(0.0));
        self.map.set_popup(MARKER_POPUP);
        self.map.fly_to(lat, lng, TARGET_ZOOM, FLY_DURATION);
    }

    /// A user-chosen map coordinate is exact: accuracy 0
    pub fn handle_manual_click(&mut self, lat: f64, lng: f64) {
        self.set_target(lat, lng, Some(0.0));
        self.status
            .set(format!("[MANUAL] Marker at LAT={:.6} LNG={:.6}", lat, lng));
        tracing::debug!("Manual target at {:.6},{:.6}", lat, lng);
    }

    /// Marker drag finished: keep the accuracy circle the size it was,
    /// unlike a manual click which resets it to exact
    pub fn handle_marker_drag_end(&mut self, lat: f64, lng: f64, current_radius: f64) {
        self.set_target(lat, lng, Some(current_radius));
        self.status
            .set(format!("[MOVE] New target LAT={:.6} LNG={:.6}", lat, lng));
        tracing::debug!("Target moved to {:.6},{:.6}", lat, lng);
    }

    /// Drop the target: remove map layers, reset the readout placeholders
    /// and confirm. Safe to call when nothing is set.
    pub fn clear(&mut self) {
        self.map.clear_layers();
        self.state.current_position = None;
        self.readout.clear();
        self.status.set("[OK] Buffer cleared.");
        tracing::debug!("Target cleared");
    }

    /// Copy "lat, lng" to the clipboard using the displayed (rounded)
    /// values. Warns and performs no clipboard action when nothing is set.
    pub fn copy_current_coordinates<C: ClipboardSink>(&mut self, sink: &C) {
        if !self.has_location() {
            self.status.set("[WARN] No coordinates to copy.");
            return;
        }

        let text = format!("{}, {}", self.readout.lat(), self.readout.lng());
        match sink.write_text(&text) {
            Ok(()) => self.status.set("[OK] Coordinates copied to clipboard."),
            Err(e) => {
                tracing::warn!("Clipboard write failed: {:#}", e);
                self.status.set("[ERR] Could not copy to clipboard.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use futures::future::BoxFuture;
    use std::cell::RefCell;

    /// Map surface mock that records the session's commands
    #[derive(Default)]
    struct MockMap {
        marker: Option<(f64, f64)>,
        circle: Option<(f64, f64, f64)>,
        popup: Option<String>,
        fly_count: usize,
        clear_count: usize,
    }

    impl MapView for MockMap {
        fn place_marker(&mut self, lat: f64, lng: f64) {
            self.marker = Some((lat, lng));
        }

        fn place_accuracy_circle(&mut self, lat: f64, lng: f64, radius_m: f64) {
            self.circle = Some((lat, lng, radius_m));
        }

        fn accuracy_radius(&self) -> Option<f64> {
            self.circle.map(|(_, _, r)| r)
        }

        fn set_popup(&mut self, text: &str) {
            self.popup = Some(text.to_string());
        }

        fn clear_layers(&mut self) {
            self.marker = None;
            self.circle = None;
            self.popup = None;
            self.clear_count += 1;
        }

        fn fly_to(&mut self, _lat: f64, _lng: f64, _zoom: f64, _duration: Duration) {
            self.fly_count += 1;
        }
    }

    struct StubProvider {
        available: bool,
        result: Result<GeoFix, LookupError>,
    }

    impl StubProvider {
        fn resolving(result: Result<GeoFix, LookupError>) -> Self {
            Self {
                available: true,
                result,
            }
        }

        fn unavailable() -> Self {
            Self {
                available: false,
                result: Err(LookupError::Unknown),
            }
        }
    }

    impl GeolocationProvider for StubProvider {
        fn is_available(&self) -> bool {
            self.available
        }

        fn request_position(
            &self,
            _opts: LookupOptions,
        ) -> BoxFuture<'static, Result<GeoFix, LookupError>> {
            let result = self.result;
            Box::pin(async move { result })
        }
    }

    struct MockClipboard {
        fail: bool,
        writes: RefCell<Vec<String>>,
    }

    impl MockClipboard {
        fn working() -> Self {
            Self {
                fail: false,
                writes: RefCell::new(Vec::new()),
            }
        }

        fn broken() -> Self {
            Self {
                fail: true,
                writes: RefCell::new(Vec::new()),
            }
        }
    }

    impl ClipboardSink for MockClipboard {
        fn write_text(&self, text: &str) -> anyhow::Result<()> {
            if self.fail {
                return Err(anyhow!("clipboard denied"));
            }
            self.writes.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn session() -> LocationSession<MockMap> {
        LocationSession::new(MockMap::default())
    }

    #[test]
    fn test_initial_state() {
        let s = session();
        assert!(!s.has_location());
        assert!(!s.scanning());
        assert_eq!(s.readout().lat(), PLACEHOLDER);
        assert!(s.status().latest().starts_with("[READY]"));
    }

    #[test]
    fn test_set_target_formats_readout() {
        let mut s = session();
        s.set_target(40.7128, -74.006, Some(15.4));
        assert_eq!(s.readout().lat(), "40.712800");
        assert_eq!(s.readout().lng(), "-74.006000");
        assert_eq!(s.readout().acc(), "15");
        assert!(s.has_location());
    }

    #[test]
    fn test_set_target_drives_map() {
        let mut s = session();
        s.set_target(10.0, 20.0, Some(30.0));
        assert_eq!(s.map().marker, Some((10.0, 20.0)));
        assert_eq!(s.map().circle, Some((10.0, 20.0, 30.0)));
        assert_eq!(s.map().popup.as_deref(), Some("TARGET LOCKED"));
        assert_eq!(s.map().fly_count, 1);
    }

    #[test]
    fn test_set_target_absent_accuracy() {
        let mut s = session();
        s.set_target(10.0, 20.0, None);
        // Circle radius falls back to 0, readout shows the placeholder
        assert_eq!(s.map().circle, Some((10.0, 20.0, 0.0)));
        assert_eq!(s.readout().acc(), PLACEHOLDER);
    }

    #[test]
    fn test_set_target_idempotent() {
        let mut s = session();
        s.set_target(40.7128, -74.006, Some(15.4));
        s.set_target(40.7128, -74.006, Some(15.4));
        assert_eq!(s.readout().lat(), "40.712800");
        assert_eq!(s.map().marker, Some((40.7128, -74.006)));
        assert_eq!(s.position(), Some(Position::new(40.7128, -74.006, Some(15.4))));
    }

    #[test]
    fn test_clear_after_set_target() {
        let mut s = session();
        s.set_target(40.7128, -74.006, Some(15.4));
        s.clear();
        assert!(!s.has_location());
        assert_eq!(s.readout().lat(), PLACEHOLDER);
        assert_eq!(s.readout().lng(), PLACEHOLDER);
        assert_eq!(s.readout().acc(), PLACEHOLDER);
        assert!(s.map().marker.is_none());
        assert!(s.map().circle.is_none());
        assert_eq!(s.status().latest(), "[OK] Buffer cleared.");
    }

    #[test]
    fn test_clear_is_noop_safe() {
        let mut s = session();
        s.clear();
        s.clear();
        assert!(!s.has_location());
        assert_eq!(s.map().clear_count, 2);
    }

    #[test]
    fn test_manual_click_uses_exact_accuracy() {
        let mut s = session();
        s.handle_manual_click(40.7128, -74.006);
        assert_eq!(s.map().circle, Some((40.7128, -74.006, 0.0)));
        assert_eq!(s.readout().acc(), "0");
        assert_eq!(
            s.status().latest(),
            "[MANUAL] Marker at LAT=40.712800 LNG=-74.006000"
        );
    }

    #[test]
    fn test_drag_end_preserves_circle_radius() {
        let mut s = session();
        s.set_target(0.0, 0.0, Some(50.0));
        let radius = s.map().accuracy_radius().unwrap_or(0.0);
        s.handle_marker_drag_end(10.0, 20.0, radius);
        // Unlike a manual click, the circle keeps its size
        assert_eq!(s.map().circle, Some((10.0, 20.0, 50.0)));
        assert!(s.status().latest().starts_with("[MOVE]"));
    }

    #[test]
    fn test_copy_with_no_position_warns_and_skips_clipboard() {
        let mut s = session();
        let clip = MockClipboard::working();
        s.copy_current_coordinates(&clip);
        assert_eq!(s.status().latest(), "[WARN] No coordinates to copy.");
        assert!(clip.writes.borrow().is_empty());
    }

    #[test]
    fn test_copy_uses_displayed_values() {
        let mut s = session();
        s.set_target(40.7128, -74.006, Some(15.4));
        let clip = MockClipboard::working();
        s.copy_current_coordinates(&clip);
        assert_eq!(clip.writes.borrow().as_slice(), ["40.712800, -74.006000"]);
        assert_eq!(s.status().latest(), "[OK] Coordinates copied to clipboard.");
    }

    #[test]
    fn test_copy_failure_reports_error() {
        let mut s = session();
        s.set_target(1.0, 2.0, Some(0.0));
        let clip = MockClipboard::broken();
        s.copy_current_coordinates(&clip);
        assert_eq!(s.status().latest(), "[ERR] Could not copy to clipboard.");
    }

    #[tokio::test]
    async fn test_request_without_capability_has_no_side_effects() {
        let mut s = session();
        let (tx, mut rx) = mpsc::channel(4);
        s.request_location(&StubProvider::unavailable(), tx);
        assert!(!s.scanning());
        assert!(!s.has_location());
        assert!(s.status().latest().starts_with("[ERR]"));
        // Nothing was spawned, so the channel closes without a result
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_successful_lookup_sets_target_and_clears_scanning() {
        let mut s = session();
        let fix = GeoFix {
            lat: 40.7128,
            lng: -74.006,
            accuracy: Some(15.4),
        };
        let (tx, mut rx) = mpsc::channel(4);
        s.request_location(&StubProvider::resolving(Ok(fix)), tx);
        assert!(s.scanning());
        assert!(s.status().latest().contains("Triangulating"));

        let result = rx.recv().await.expect("lookup result");
        s.complete_lookup(result);

        assert!(!s.scanning());
        assert!(s.has_location());
        assert_eq!(s.readout().lat(), "40.712800");
        assert!(s.status().latest().starts_with("[OK] Coordinates acquired."));
        assert!(s.status().latest().contains("ACC=15m"));
    }

    #[tokio::test]
    async fn test_permission_denied_leaves_state_untouched() {
        let mut s = session();
        s.set_target(1.0, 2.0, Some(3.0));
        let before = s.position();

        let (tx, mut rx) = mpsc::channel(4);
        s.request_location(
            &StubProvider::resolving(Err(LookupError::from_code(1))),
            tx,
        );
        let result = rx.recv().await.expect("lookup result");
        s.complete_lookup(result);

        assert!(!s.scanning());
        assert_eq!(s.position(), before);
        assert!(s.status().latest().starts_with("[DENY]"));
        assert!(s.status().latest().contains("manually"));
    }

    #[test]
    fn test_every_error_kind_clears_scanning() {
        for code in [1u8, 2, 3, 99] {
            let mut s = session();
            s.scanning = true;
            s.complete_lookup(Err(LookupError::from_code(code)));
            assert!(!s.scanning(), "scanning latched for code {}", code);
            assert!(!s.has_location());
        }
    }

    #[tokio::test]
    async fn test_overlapping_lookups_last_resolved_wins() {
        let mut s = session();
        let first = GeoFix {
            lat: 1.0,
            lng: 1.0,
            accuracy: Some(5.0),
        };
        let second = GeoFix {
            lat: 2.0,
            lng: 2.0,
            accuracy: Some(5.0),
        };

        let (tx, mut rx) = mpsc::channel(4);
        s.request_location(&StubProvider::resolving(Ok(first)), tx.clone());
        s.request_location(&StubProvider::resolving(Ok(second)), tx);
        assert!(s.scanning());

        // Spawn scheduling does not guarantee delivery order, so assert
        // against whichever result resolved last
        let a = rx.recv().await.expect("first result");
        let b = rx.recv().await.expect("second result");
        s.complete_lookup(a);
        s.complete_lookup(b);

        assert!(!s.scanning());
        let pos = s.position().expect("position set");
        let winner = b.expect("stub fix");
        assert_eq!((pos.lat, pos.lng), (winner.lat, winner.lng));
    }
}
