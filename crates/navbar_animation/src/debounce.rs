//! Debounce and cooldown on top of [`TimerScheduler`]

use std::time::Duration;

use crate::scheduler::{TimerId, TimerScheduler};

/// Fires once after a quiet window with no further pokes.
///
/// Every poke cancels the pending timer and schedules a new one, so the
/// payload is only handed back after `window` passes without activity.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pending: Option<TimerId>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Restart the quiet window
    pub fn poke<T>(&mut self, scheduler: &mut TimerScheduler<T>, payload: T) -> TimerId {
        if let Some(id) = self.pending.take() {
            scheduler.cancel(id);
        }
        let id = scheduler.schedule(self.window, payload);
        self.pending = Some(id);
        id
    }

    /// Whether a quiet window is currently running
    pub fn is_pending<T>(&self, scheduler: &TimerScheduler<T>) -> bool {
        self.pending.is_some_and(|id| scheduler.is_pending(id))
    }

    /// Forget the pending timer after its payload fired
    pub fn fired(&mut self) {
        self.pending = None;
    }

    /// Cancel without firing
    pub fn cancel<T>(&mut self, scheduler: &mut TimerScheduler<T>) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel(id);
        }
    }
}

/// Time-boxed lock. While active, further acquisitions are refused rather
/// than queued.
#[derive(Debug, Clone)]
pub struct Cooldown {
    window: Duration,
    active: Option<TimerId>,
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            active: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Take the lock and schedule its release. Returns false if already held.
    pub fn try_acquire<T>(&mut self, scheduler: &mut TimerScheduler<T>, release: T) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(scheduler.schedule(self.window, release));
        true
    }

    /// Clear the lock once the release payload fired
    pub fn release(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_debounce_restarts_window() {
        let mut scheduler = TimerScheduler::new();
        let mut debouncer = Debouncer::new(ms(50));

        debouncer.poke(&mut scheduler, "settled");
        assert!(scheduler.advance(ms(40)).is_empty());

        // Activity inside the window pushes the deadline out
        debouncer.poke(&mut scheduler, "settled");
        assert!(scheduler.advance(ms(40)).is_empty());
        assert!(debouncer.is_pending(&scheduler));

        let fired = scheduler.advance(ms(10));
        assert_eq!(fired.as_slice(), &["settled"]);
        debouncer.fired();
        assert!(!debouncer.is_pending(&scheduler));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_debounce_cancel() {
        let mut scheduler = TimerScheduler::new();
        let mut debouncer = Debouncer::new(ms(50));
        debouncer.poke(&mut scheduler, ());
        debouncer.cancel(&mut scheduler);
        assert!(scheduler.advance(ms(100)).is_empty());
    }

    #[test]
    fn test_cooldown_drops_overlapping_requests() {
        let mut scheduler = TimerScheduler::new();
        let mut cooldown = Cooldown::new(ms(400));

        assert!(cooldown.try_acquire(&mut scheduler, "release"));
        assert!(!cooldown.try_acquire(&mut scheduler, "release"));
        assert_eq!(scheduler.pending_count(), 1);

        let fired = scheduler.advance(ms(400));
        assert_eq!(fired.as_slice(), &["release"]);
        cooldown.release();
        assert!(!cooldown.is_active());
        assert!(cooldown.try_acquire(&mut scheduler, "release"));
    }
}
