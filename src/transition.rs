use std::time::{Duration, Instant};

/// A value which can be blended linearly with another value of the same type
pub trait Interpolate: Copy {
    /// Blends self with other, alpha = 0 gives self and alpha = 1 gives other
    ///
    /// # Parameters
    ///
    /// other: The value to blend towards
    ///
    /// alpha: The fraction of other in the result
    fn interpolate(&self, other: &Self, alpha: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(&self, other: &Self, alpha: f64) -> Self {
        self * (1.0 - alpha) + other * alpha
    }
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, alpha: f64) -> Self {
        let alpha = alpha as f32;
        self * (1.0 - alpha) + other * alpha
    }
}

/// The time window of a running transition
#[derive(Clone, Copy, Debug, PartialEq)]
struct Window {
    begin: Instant,
    end: Instant,
}

/// Moves a value linearly in time from a begin value to an end value.
///
/// While active the current value is the linear blend of the begin and end values by
/// the elapsed fraction of the duration. Once the end time is reached the value lands
/// exactly on the end value and the transition stops.
#[derive(Clone, Copy, Debug)]
pub struct Transition<T: Interpolate> {
    /// The time window, None while not active
    window: Option<Window>,
    /// The value a fresh (not retargeted) transition starts from
    start_value: T,
    /// The value the running transition started from
    begin_value: T,
    /// The latest value
    current_value: T,
    /// The value to end at
    end_value: T,
}

/// A transition running from 0 to 1, used as the progress of an animation
pub type LinearTransition = Transition<f64>;

impl Default for LinearTransition {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl<T: Interpolate> Transition<T> {
    /// Creates a new inactive transition
    ///
    /// # Parameters
    ///
    /// start_value: The value to start from, this is also the initial value
    ///
    /// end_value: The value to end at
    pub fn new(start_value: T, end_value: T) -> Self {
        Self {
            window: None,
            start_value,
            begin_value: start_value,
            current_value: start_value,
            end_value,
        }
    }

    /// Checks if the transition is running
    pub fn is_active(&self) -> bool {
        self.window.is_some()
    }

    /// Stops the transition, the current value is kept
    pub fn stop(&mut self) -> &mut Self {
        self.window = None;
        self
    }

    /// Starts the transition. If it is already running it continues from the current
    /// value, otherwise it starts from the start value.
    ///
    /// # Parameters
    ///
    /// now: The current time
    ///
    /// duration: The time it takes to reach the end value
    pub fn start(&mut self, now: Instant, duration: Duration) {
        if self.is_active() {
            self.begin_value = self.current_value;
        } else {
            self.begin_value = self.start_value;
            self.current_value = self.start_value;
        }
        self.window = Some(Window { begin: now, end: now + duration });
    }

    /// Starts moving from the current value towards a new end value
    ///
    /// # Parameters
    ///
    /// now: The current time
    ///
    /// duration: The time it takes to reach the end value
    ///
    /// end_value: The new value to end at
    pub fn retarget(&mut self, now: Instant, duration: Duration, end_value: T) {
        self.begin_value = self.current_value;
        self.end_value = end_value;
        self.window = Some(Window { begin: now, end: now + duration });
    }

    /// Updates the current value, returns true if the transition is still running
    ///
    /// # Parameters
    ///
    /// now: The current time
    pub fn update(&mut self, now: Instant) -> bool {
        let window = match self.window {
            Some(window) => window,
            None => return false,
        };

        if now >= window.end {
            self.current_value = self.end_value;
            self.window = None;
            return false;
        }

        let elapsed = now.saturating_duration_since(window.begin).as_secs_f64();
        let total = (window.end - window.begin).as_secs_f64();
        self.current_value = self.begin_value.interpolate(&self.end_value, elapsed / total);

        true
    }

    /// Retrieves the current value
    pub fn get_value(&self) -> T {
        self.current_value
    }
}

/// Smooths the progress of a linear transition so it starts and stops gently
///
/// # Parameters
///
/// t: The linear progress between 0 and 1
pub fn ease_in_out_sine(t: f64) -> f64 {
    0.5 - 0.5 * (std::f64::consts::PI * t.clamp(0.0, 1.0)).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn lands_on_end_value() {
        let t0 = Instant::now();
        let mut transition = LinearTransition::default();
        transition.start(t0, MS * 100);

        assert!(transition.update(t0 + MS * 50));
        assert!((transition.get_value() - 0.5).abs() < 1e-9);
        assert!(!transition.update(t0 + MS * 100));
        assert_eq!(transition.get_value(), 1.0);
        assert!(!transition.is_active());
        assert!(!transition.update(t0 + MS * 200));
    }

    #[test]
    fn restart_while_running_continues_from_current_value() {
        let t0 = Instant::now();
        let mut transition = LinearTransition::default();
        transition.start(t0, MS * 100);
        transition.update(t0 + MS * 25);
        transition.start(t0 + MS * 25, MS * 100);

        assert!((transition.get_value() - 0.25).abs() < 1e-9);
        transition.update(t0 + MS * 75);
        assert!((transition.get_value() - 0.625).abs() < 1e-9);
    }

    #[test]
    fn stop_then_start_begins_again() {
        let t0 = Instant::now();
        let mut transition = LinearTransition::default();
        transition.start(t0, MS * 100);
        transition.update(t0 + MS * 60);
        transition.stop().start(t0 + MS * 60, MS * 100);

        assert_eq!(transition.get_value(), 0.0);
    }

    #[test]
    fn retarget_reverses_without_jump() {
        let t0 = Instant::now();
        let mut fade = Transition::new(0.0f64, 1.0);
        fade.retarget(t0, MS * 100, 1.0);
        fade.update(t0 + MS * 40);
        let before = fade.get_value();
        fade.retarget(t0 + MS * 40, MS * 100, 0.0);
        fade.update(t0 + MS * 40);

        assert!((fade.get_value() - before).abs() < 1e-9);
        fade.update(t0 + MS * 90);
        assert!(fade.get_value() < before);
    }

    #[test]
    fn zero_duration_finishes_on_first_update() {
        let t0 = Instant::now();
        let mut transition = LinearTransition::default();
        transition.start(t0, Duration::ZERO);

        assert!(!transition.update(t0));
        assert_eq!(transition.get_value(), 1.0);
    }

    #[test]
    fn easing_is_symmetric() {
        assert_eq!(ease_in_out_sine(0.0), 0.0);
        assert!((ease_in_out_sine(1.0) - 1.0).abs() < 1e-12);
        assert!((ease_in_out_sine(0.5) - 0.5).abs() < 1e-12);
        assert!((ease_in_out_sine(0.2) + ease_in_out_sine(0.8) - 1.0).abs() < 1e-12);
    }
}
