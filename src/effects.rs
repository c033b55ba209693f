// Cosmetic detonation effect
//
// A short particle burst drawn over the map canvas, plus a terminal bell
// rung by the input handler. Purely visual: it reads nothing from the
// session and the session knows nothing about it.

use std::time::{Duration, Instant};

/// How long the burst stays on screen
const LIFETIME: Duration = Duration::from_millis(1200);

/// Particles per burst
const PARTICLE_COUNT: usize = 24;

/// A spark at render time: map-space position plus normalized age (0..1)
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub age: f64,
}

/// One-shot particle burst. Re-triggering restarts the animation.
#[derive(Default)]
pub struct Explosion {
    center: (f64, f64),
    /// Burst radius in map degrees, sized to the viewport at trigger time
    reach: f64,
    triggered_at: Option<Instant>,
}

impl Explosion {
    /// Start a burst at the given map coordinates. `reach` is the maximum
    /// travel distance in degrees, so the burst scales with the zoom level.
    pub fn trigger(&mut self, x: f64, y: f64, reach: f64) {
        self.center = (x, y);
        self.reach = reach;
        self.triggered_at = Some(Instant::now());
        tracing::debug!("Detonation triggered at {:.3},{:.3}", y, x);
    }

    pub fn is_active(&self) -> bool {
        matches!(self.triggered_at, Some(t) if t.elapsed() < LIFETIME)
    }

    /// Particle positions for the current frame, empty once expired.
    ///
    /// Positions are derived from elapsed time, so no per-tick state is
    /// carried. Angles are spread with the golden ratio and speeds staggered
    /// per particle, which reads as random without pulling in an RNG.
    pub fn sparks(&self) -> Vec<Spark> {
        let Some(triggered_at) = self.triggered_at else {
            return Vec::new();
        };
        let elapsed = triggered_at.elapsed();
        if elapsed >= LIFETIME {
            return Vec::new();
        }

        let age = elapsed.as_secs_f64() / LIFETIME.as_secs_f64();
        // Decelerating outward travel
        let travel = self.reach * (1.0 - (1.0 - age).powi(2));

        (0..PARTICLE_COUNT)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU * 0.618_033_988_75;
                let speed = 0.55 + 0.45 * ((i % 5) as f64 / 4.0);
                Spark {
                    x: self.center.0 + angle.cos() * travel * speed,
                    y: self.center.1 + angle.sin() * travel * speed * 0.5,
                    age,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untriggered_burst_is_inert() {
        let e = Explosion::default();
        assert!(!e.is_active());
        assert!(e.sparks().is_empty());
    }

    #[test]
    fn test_trigger_produces_sparks() {
        let mut e = Explosion::default();
        e.trigger(10.0, 20.0, 5.0);
        assert!(e.is_active());
        let sparks = e.sparks();
        assert_eq!(sparks.len(), PARTICLE_COUNT);
        // Fresh burst: everything still close to the center
        for s in &sparks {
            assert!((s.x - 10.0).abs() <= 5.0);
            assert!((s.y - 20.0).abs() <= 5.0);
            assert!(s.age < 1.0);
        }
    }

    #[test]
    fn test_burst_expires() {
        let mut e = Explosion::default();
        e.trigger(0.0, 0.0, 1.0);
        // Backdate the trigger past the lifetime
        e.triggered_at = Some(Instant::now() - LIFETIME - Duration::from_millis(50));
        assert!(!e.is_active());
        assert!(e.sparks().is_empty());
    }
}
