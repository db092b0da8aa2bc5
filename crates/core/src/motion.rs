//! Continuous motion: one step immediately, then one step per interval while a
//! directional control is held.
//!
//! [`ContinuousMotion`] is a single-slot holder for the repeating timer's
//! cancellation handle. Starting while a motion is live is a no-op, stopping
//! while idle is a no-op, and dropping the slot cancels whatever it holds.
//! Every motion gets a fresh [`MotionId`] so ticks from a cancelled timer that
//! were already in flight can be recognised and dropped.

use std::time::Duration;

use crate::prefetch::Direction;

/// Interval between repeated steps while a directional control is held.
pub const SCRUB_INTERVAL: Duration = Duration::from_millis(50);

/// Cancellation side of a repeating timer.
pub trait MotionHandle {
    /// Stop the timer. Must be safe to call more than once.
    fn cancel(&self);
}

pub type BoxedMotionHandle = Box<dyn MotionHandle + Send>;

impl MotionHandle for BoxedMotionHandle {
    fn cancel(&self) {
        (**self).cancel();
    }
}

/// Identity of one continuous-motion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MotionId(u64);

struct ActiveMotion<H: MotionHandle> {
    id: MotionId,
    direction: Direction,
    handle: H,
}

pub struct ContinuousMotion<H: MotionHandle = BoxedMotionHandle> {
    active: Option<ActiveMotion<H>>,
    next_id: u64,
}

impl<H: MotionHandle> Default for ContinuousMotion<H> {
    fn default() -> Self {
        Self {
            active: None,
            next_id: 0,
        }
    }
}

impl<H: MotionHandle> ContinuousMotion<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Direction of the live motion, or [`Direction::Static`] when idle.
    pub fn direction(&self) -> Direction {
        self.active
            .as_ref()
            .map_or(Direction::Static, |m| m.direction)
    }

    /// Begin a motion, asking `spawn` for the timer of the new run.
    ///
    /// Returns `None` without calling `spawn` when a motion is already live or
    /// `direction` is [`Direction::Static`].
    pub fn start<F>(&mut self, direction: Direction, spawn: F) -> Option<MotionId>
    where
        F: FnOnce(MotionId) -> H,
    {
        if self.active.is_some() || direction == Direction::Static {
            return None;
        }
        let id = MotionId(self.next_id);
        self.next_id += 1;
        let handle = spawn(id);
        self.active = Some(ActiveMotion {
            id,
            direction,
            handle,
        });
        Some(id)
    }

    /// Cancel the live motion. Returns `false` when nothing was running.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(motion) => {
                motion.handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Direction to step for a tick of `id`, or `None` if `id` is stale.
    pub fn accepts(&self, id: MotionId) -> Option<Direction> {
        self.active
            .as_ref()
            .filter(|m| m.id == id)
            .map(|m| m.direction)
    }
}

impl<H: MotionHandle> Drop for ContinuousMotion<H> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<H: MotionHandle> std::fmt::Debug for ContinuousMotion<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContinuousMotion")
            .field("active", &self.active.as_ref().map(|m| (m.id, m.direction)))
            .field("next_id", &self.next_id)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
