//! Frame and timer scheduler
//!
//! A deterministic stand-in for `requestAnimationFrame` and `setTimeout`.
//! The owner drives the clock with [`FrameScheduler::tick`] and delivers the
//! returned ids to whoever requested them.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    pub struct FrameId;
    pub struct TimerId;
}

/// Everything that came due during one tick
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tick {
    /// Frame callbacks requested before this tick, in request order
    pub frames: SmallVec<[FrameId; 4]>,
    /// Expired timers, earliest deadline first
    pub timers: SmallVec<[TimerId; 4]>,
    /// Clock value after the tick
    pub now: Duration,
}

impl Tick {
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() && self.timers.is_empty()
    }
}

/// Virtual-clock scheduler for frames and one-shot timers
pub struct FrameScheduler {
    now: Duration,
    frames: SlotMap<FrameId, ()>,
    queued_frames: Vec<FrameId>,
    timers: SlotMap<TimerId, Duration>,
    frame_count: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            frames: SlotMap::with_key(),
            queued_frames: Vec::new(),
            timers: SlotMap::with_key(),
            frame_count: 0,
        }
    }

    /// Current clock value
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of ticks executed so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Request a callback on the next tick
    pub fn request_frame(&mut self) -> FrameId {
        let id = self.frames.insert(());
        self.queued_frames.push(id);
        id
    }

    pub fn cancel_frame(&mut self, id: FrameId) -> bool {
        if self.frames.remove(id).is_none() {
            return false;
        }
        self.queued_frames.retain(|queued| *queued != id);
        true
    }

    /// Start a one-shot timer firing `delay` from now
    pub fn start_timer(&mut self, delay: Duration) -> TimerId {
        self.timers.insert(self.now + delay)
    }

    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().copied().min()
    }

    /// Whether any frame or timer is outstanding
    pub fn has_pending(&self) -> bool {
        !self.queued_frames.is_empty() || !self.timers.is_empty()
    }

    /// Advance the clock by `dt` and collect everything that came due
    ///
    /// Frames requested while the caller is handling this tick's frames land
    /// on the next tick, which is what makes a double frame request span two
    /// ticks.
    pub fn tick(&mut self, dt: Duration) -> Tick {
        self.now += dt;
        self.frame_count += 1;

        let mut due = Tick {
            now: self.now,
            ..Default::default()
        };

        for id in self.queued_frames.drain(..) {
            if self.frames.remove(id).is_some() {
                due.frames.push(id);
            }
        }

        let now = self.now;
        let mut expired: SmallVec<[(Duration, TimerId); 4]> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, id))
            .collect();
        expired.sort_by_key(|(deadline, _)| *deadline);
        for (_, id) in expired {
            self.timers.remove(id);
            due.timers.push(id);
        }

        if !due.is_empty() {
            tracing::trace!(
                "scheduler tick at {:?}: {} frames, {} timers",
                self.now,
                due.frames.len(),
                due.timers.len()
            );
        }
        due
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_frames_fire_on_next_tick() {
        let mut scheduler = FrameScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();

        let tick = scheduler.tick(FRAME);
        assert_eq!(tick.frames.as_slice(), &[a, b]);
        assert!(scheduler.tick(FRAME).frames.is_empty());
        assert_eq!(scheduler.frame_count(), 2);
    }

    #[test]
    fn test_frame_requested_during_tick_waits_for_next() {
        let mut scheduler = FrameScheduler::new();
        scheduler.request_frame();

        let first = scheduler.tick(FRAME);
        assert_eq!(first.frames.len(), 1);

        // Callback for the first frame asks for another one
        let second_id = scheduler.request_frame();
        let second = scheduler.tick(FRAME);
        assert_eq!(second.frames.as_slice(), &[second_id]);
    }

    #[test]
    fn test_cancelled_frame_never_fires() {
        let mut scheduler = FrameScheduler::new();
        let id = scheduler.request_frame();
        assert!(scheduler.cancel_frame(id));
        assert!(!scheduler.cancel_frame(id));
        assert!(scheduler.tick(FRAME).is_empty());
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let mut scheduler = FrameScheduler::new();
        let late = scheduler.start_timer(Duration::from_millis(40));
        let early = scheduler.start_timer(Duration::from_millis(20));

        assert!(scheduler.tick(Duration::from_millis(10)).timers.is_empty());
        assert_eq!(scheduler.next_deadline(), Some(Duration::from_millis(20)));

        let tick = scheduler.tick(Duration::from_millis(50));
        assert_eq!(tick.timers.as_slice(), &[early, late]);
        assert_eq!(tick.now, Duration::from_millis(60));
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn test_cancel_timer() {
        let mut scheduler = FrameScheduler::new();
        let id = scheduler.start_timer(Duration::from_millis(5));
        assert!(scheduler.is_timer_pending(id));
        assert!(scheduler.cancel_timer(id));
        assert!(!scheduler.is_timer_pending(id));
        assert!(scheduler.tick(Duration::from_millis(10)).timers.is_empty());
    }
}
