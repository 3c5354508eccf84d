//! Timer scheduler
//!
//! Manages one-shot timers against a clock that only moves when the host
//! calls [`TimerScheduler::advance`], once per frame.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::time::Duration;

new_key_type! {
    pub struct TimerId;
}

struct Timer<T> {
    deadline: Duration,
    /// Insertion sequence, breaks ties between equal deadlines
    seq: u64,
    payload: T,
}

/// Schedules payloads to be handed back once their delay has elapsed
pub struct TimerScheduler<T> {
    timers: SlotMap<TimerId, Timer<T>>,
    now: Duration,
    next_seq: u64,
}

impl<T> TimerScheduler<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now: Duration::ZERO,
            next_seq: 0,
        }
    }

    /// Time elapsed since the scheduler was created
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `payload` to fire `delay` from now
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            deadline: self.now + delay,
            seq,
            payload,
        })
    }

    /// Cancel a pending timer, returning its payload
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|timer| timer.payload)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Move the clock forward and return the payloads of every expired timer,
    /// earliest deadline first.
    ///
    /// Timers scheduled while handling the returned payloads start counting
    /// from the new time.
    pub fn advance(&mut self, dt: Duration) -> SmallVec<[T; 4]> {
        self.now += dt;
        let now = self.now;

        let mut expired: SmallVec<[(Duration, u64, TimerId); 4]> = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .map(|(id, timer)| (timer.deadline, timer.seq, id))
            .collect();
        expired.sort_by_key(|&(deadline, seq, _)| (deadline, seq));

        let fired: SmallVec<[T; 4]> = expired
            .into_iter()
            .filter_map(|(_, _, id)| self.timers.remove(id))
            .map(|timer| timer.payload)
            .collect();

        if !fired.is_empty() {
            tracing::trace!("timers fired at {:?}: {}", now, fired.len());
        }
        fired
    }

    /// Earliest pending deadline, if any
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|timer| timer.deadline).min()
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl<T> Default for TimerScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
