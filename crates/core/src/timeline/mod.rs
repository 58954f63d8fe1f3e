use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

/// Default yaw speed of the turntable in radians per second.
pub const ROTATION_RATE: f32 = 0.2;

/// Rotation of the model about the vertical axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Accumulated angle in radians. Never wrapped, so it keeps growing with
    /// elapsed time.
    pub angle: f32,
}

impl Orientation {
    /// Angle reduced into `[0, 2π)`.
    pub fn wrapped(&self) -> f32 {
        self.angle.rem_euclid(TAU)
    }
}

/// Orientation of the turntable `elapsed` seconds after the scene started.
pub fn orientation_at(elapsed: f32) -> Orientation {
    orientation_with_rate(elapsed, ROTATION_RATE)
}

/// Like [`orientation_at`] with an explicit rate. Negative or non-finite
/// times count as the start of the scene, matching [`SceneClock::advance`].
pub fn orientation_with_rate(elapsed: f32, rate: f32) -> Orientation {
    let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
    Orientation {
        angle: elapsed * rate,
    }
}

/// Seconds since the scene was mounted.
#[derive(Debug, Default, Clone)]
pub struct SceneClock {
    time_seconds: f32,
}

impl SceneClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.time_seconds = 0.0;
    }

    /// Moves the clock forward. Negative or non-finite deltas are ignored so
    /// the clock never runs backwards.
    pub fn advance(&mut self, delta: f32) {
        if delta.is_finite() && delta > 0.0 {
            self.time_seconds += delta;
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.time_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn five_seconds_is_one_radian() {
        let orientation = orientation_at(5.0);
        assert_relative_eq!(orientation.angle, 1.0, epsilon = 1e-6);
        assert_relative_eq!(orientation.wrapped(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn angle_is_monotonic_in_time() {
        let mut previous = orientation_at(0.0).angle;
        for step in 1..=2_000 {
            let angle = orientation_at(step as f32 * 0.016).angle;
            assert!(angle >= previous);
            previous = angle;
        }
    }

    #[test]
    fn wrapped_angle_stays_within_one_turn() {
        let orientation = orientation_at(100.0);
        assert_relative_eq!(orientation.angle, 20.0, epsilon = 1e-4);
        let wrapped = orientation.wrapped();
        assert!((0.0..TAU).contains(&wrapped));
        assert_relative_eq!(wrapped, 20.0 - 3.0 * TAU, epsilon = 1e-4);
    }

    #[test]
    fn non_finite_time_yields_a_finite_angle() {
        for elapsed in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN, -3.0] {
            let orientation = orientation_with_rate(elapsed, ROTATION_RATE);
            assert_eq!(orientation.angle, 0.0, "{elapsed}");
            assert_eq!(orientation.wrapped(), 0.0);
        }
    }

    #[test]
    fn clock_ignores_backward_steps() {
        let mut clock = SceneClock::new();
        clock.advance(0.5);
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.elapsed(), 0.5);

        clock.reset();
        assert_eq!(clock.elapsed(), 0.0);
    }
}
