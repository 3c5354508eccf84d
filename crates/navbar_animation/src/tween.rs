//! Eased scroll-to animation

use std::time::Duration;

use crate::easing::Easing;

/// Animates a scroll offset from one value to another over a fixed duration
#[derive(Clone, Copy, Debug)]
pub struct ScrollTween {
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl ScrollTween {
    pub fn new(from: f32, to: f32, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            // Zero-length tweens would divide by zero when sampling
            duration: duration.max(Duration::from_millis(1)),
            easing,
        }
    }

    /// Advance by `dt` and return the new value
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    /// Value at the current elapsed time
    pub fn value(&self) -> f32 {
        if self.is_done() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Restart toward a new target from the current value
    pub fn retarget(&mut self, to: f32, duration: Duration) {
        *self = Self::new(self.value(), to, duration, self.easing);
    }
}
