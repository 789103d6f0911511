//! Single-property tweens

use std::time::Duration;

use crate::timing::TimingFunction;

/// A property animating from `from` to `to`
///
/// Behaves like one CSS transition: changing the target mid-flight starts a
/// fresh tween from the current interpolated value.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    timing: TimingFunction,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration, timing: TimingFunction) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            timing,
        }
    }

    pub fn from_value(&self) -> f32 {
        self.from
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Linear progress in 0..=1
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Current interpolated value
    pub fn value(&self) -> f32 {
        let eased = self.timing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance the clock. Returns true once the tween has reached its target.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.is_finished()
    }

    /// Restart towards a new target from wherever the tween is now
    pub fn retarget(&mut self, to: f32) {
        self.from = self.value();
        self.to = to;
        self.elapsed = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_tween_interpolates() {
        let mut tween = Tween::new(0.0, 100.0, Duration::from_millis(200), TimingFunction::Linear);
        assert_eq!(tween.value(), 0.0);

        assert!(!tween.advance(Duration::from_millis(50)));
        assert!((tween.value() - 25.0).abs() < 1e-3);

        assert!(tween.advance(Duration::from_millis(500)));
        assert_eq!(tween.value(), 100.0);
        assert_eq!(tween.progress(), 1.0);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let tween = Tween::new(40.0, 0.0, Duration::ZERO, TimingFunction::Ease);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let mut tween = Tween::new(0.0, 100.0, Duration::from_millis(100), TimingFunction::Linear);
        tween.advance(Duration::from_millis(40));
        tween.retarget(0.0);

        assert!((tween.from_value() - 40.0).abs() < 1e-3);
        assert_eq!(tween.target(), 0.0);
        assert!(!tween.is_finished());
    }
}
