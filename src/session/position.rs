// Position types shared by the session and the map surface

use serde::{Deserialize, Serialize};

/// A geographic position held by the session.
///
/// Latitude/longitude are signed degrees; accuracy is a radius in meters
/// around the point, absent when the source could not estimate one
/// (manual placements use 0.0, meaning "exact").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
    pub accuracy: Option<f64>,
}

impl Position {
    pub fn new(lat: f64, lng: f64, accuracy: Option<f64>) -> Self {
        Self { lat, lng, accuracy }
    }
}

/// Placeholder shown in the readout when a field has no value
pub const PLACEHOLDER: &str = "—";

/// The three displayed coordinate fields (lat, lng, accuracy).
///
/// Values are stored pre-formatted: latitude/longitude to 6 decimal places,
/// accuracy rounded to whole meters. The clipboard copy uses these displayed
/// strings, not the raw floats, so what the user copies is what they see.
#[derive(Debug, Clone, Default)]
pub struct Readout {
    lat: Option<String>,
    lng: Option<String>,
    acc: Option<String>,
}

impl Readout {
    /// Format and store a position's fields
    pub fn set(&mut self, lat: f64, lng: f64, accuracy: Option<f64>) {
        self.lat = Some(format!("{:.6}", lat));
        self.lng = Some(format!("{:.6}", lng));
        self.acc = accuracy.map(|a| format!("{}", a.round() as i64));
    }

    /// Reset all three fields to the placeholder
    pub fn clear(&mut self) {
        self.lat = None;
        self.lng = None;
        self.acc = None;
    }

    pub fn lat(&self) -> &str {
        self.lat.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn lng(&self) -> &str {
        self.lng.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn acc(&self) -> &str {
        self.acc.as_deref().unwrap_or(PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_formats_six_decimals() {
        let mut r = Readout::default();
        r.set(40.7128, -74.006, Some(15.4));
        assert_eq!(r.lat(), "40.712800");
        assert_eq!(r.lng(), "-74.006000");
        assert_eq!(r.acc(), "15");
    }

    #[test]
    fn test_readout_rounds_accuracy_to_nearest_meter() {
        let mut r = Readout::default();
        r.set(0.0, 0.0, Some(15.6));
        assert_eq!(r.acc(), "16");
    }

    #[test]
    fn test_readout_absent_accuracy_shows_placeholder() {
        let mut r = Readout::default();
        r.set(1.0, 2.0, None);
        assert_eq!(r.acc(), PLACEHOLDER);
        assert_eq!(r.lat(), "1.000000");
    }

    #[test]
    fn test_readout_clear_restores_placeholders() {
        let mut r = Readout::default();
        r.set(40.7128, -74.006, Some(15.4));
        r.clear();
        assert_eq!(r.lat(), PLACEHOLDER);
        assert_eq!(r.lng(), PLACEHOLDER);
        assert_eq!(r.acc(), PLACEHOLDER);
    }
}
