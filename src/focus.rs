use std::time::{Duration, Instant};
use super::color::Color;

/// The period of the pulse of the hovered tile highlight
pub const FOCUS_PERIOD: Duration = Duration::from_secs(1);

/// A slow pulse restarted every time the hovered tile changes, used to animate highlights
#[derive(Clone, Copy, Debug)]
pub struct FocusPulse {
    /// When the pulse was restarted
    start: Instant,
}

impl FocusPulse {
    /// Creates a pulse starting now
    ///
    /// # Parameters
    ///
    /// now: The current time
    pub fn new(now: Instant) -> Self {
        Self {
            start: now,
        }
    }

    /// Restarts the pulse from 0
    pub fn reset(&mut self, now: Instant) {
        self.start = now;
    }

    /// Retrieves the pulse value in [0, 1], it is 0 at the start and 1 after one period
    ///
    /// # Parameters
    ///
    /// now: The current time
    ///
    /// period: The time between a low and a high
    pub fn alpha(&self, now: Instant, period: Duration) -> f64 {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        0.5 - 0.5 * (std::f64::consts::PI * elapsed / period.as_secs_f64()).cos()
    }

    /// A gray highlight color pulsing with the default period
    ///
    /// # Parameters
    ///
    /// now: The current time
    ///
    /// gray: The gray level of the color
    ///
    /// alpha: The opacity factor of the tile the highlight is drawn on
    pub fn focus_color(&self, now: Instant, gray: f32, alpha: f64) -> Color {
        let pulse = 128.0 / 255.0 * self.alpha(now, FOCUS_PERIOD);
        Color::new_gray(gray, (pulse * alpha.clamp(0.0, 1.0)) as f32)
    }

    /// Blends between two colors following the pulse
    ///
    /// # Parameters
    ///
    /// now: The current time
    ///
    /// start: The color at the low of the pulse
    ///
    /// end: The color at the high of the pulse
    ///
    /// period: The time between a low and a high
    pub fn mix(&self, now: Instant, start: &Color, end: &Color, period: Duration) -> Color {
        start.mix(end, self.alpha(now, period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_rises_and_falls() {
        let t0 = Instant::now();
        let pulse = FocusPulse::new(t0);

        assert!(pulse.alpha(t0, FOCUS_PERIOD).abs() < 1e-12);
        assert!((pulse.alpha(t0 + Duration::from_millis(500), FOCUS_PERIOD) - 0.5).abs() < 1e-9);
        assert!((pulse.alpha(t0 + FOCUS_PERIOD, FOCUS_PERIOD) - 1.0).abs() < 1e-9);
        assert!(pulse.alpha(t0 + FOCUS_PERIOD * 2, FOCUS_PERIOD) < 1e-9);
    }

    #[test]
    fn focus_color_scales_with_tile_alpha() {
        let t0 = Instant::now();
        let pulse = FocusPulse::new(t0);
        let now = t0 + FOCUS_PERIOD;

        let full = pulse.focus_color(now, 0.5, 1.0);
        let half = pulse.focus_color(now, 0.5, 0.5);
        assert!((full.a - 128.0 / 255.0).abs() < 1e-6);
        assert!((half.a * 2.0 - full.a).abs() < 1e-6);
        assert_eq!(full.r, 0.5);
    }

    #[test]
    fn reset_restarts() {
        let t0 = Instant::now();
        let mut pulse = FocusPulse::new(t0);
        pulse.reset(t0 + FOCUS_PERIOD);

        assert!(pulse.alpha(t0 + FOCUS_PERIOD, FOCUS_PERIOD).abs() < 1e-12);
    }
}
