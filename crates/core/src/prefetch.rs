//! Direction-aware image prefetching.
//!
//! [`PrefetchCache`] remembers which frame URLs have already been requested so
//! that scrubbing does not issue duplicate preloads. It is a heuristic: a false
//! hit only skips a redundant fetch and a false miss only costs bandwidth.

use indexmap::IndexSet;

use crate::locator::FrameLocator;
use crate::types::AbsoluteFrame;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Cache size above which the oldest entries are evicted.
pub const CACHE_HIGH_WATER: usize = 100;

/// Cache size after an eviction pass.
pub const CACHE_LOW_WATER: usize = 80;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Motion direction along the absolute frame axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    Backward,
    #[default]
    Static,
    Forward,
}

impl Direction {
    /// Direction implied by a signed frame delta.
    pub fn from_delta(delta: i64) -> Self {
        match delta.signum() {
            1 => Self::Forward,
            -1 => Self::Backward,
            _ => Self::Static,
        }
    }

    /// Single-frame step for this direction.
    pub fn step(self) -> i64 {
        match self {
            Self::Backward => -1,
            Self::Static => 0,
            Self::Forward => 1,
        }
    }
}

/// How many neighbouring frames to warm on each side of the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchWindow {
    pub ahead: u64,
    pub behind: u64,
}

impl PrefetchWindow {
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Self { ahead: 15, behind: 5 },
            Direction::Backward => Self { ahead: 5, behind: 15 },
            Direction::Static => Self { ahead: 10, behind: 10 },
        }
    }
}

// ---------------------------------------------------------------------------
// PrefetchCache
// ---------------------------------------------------------------------------

/// Insertion-ordered set of already-requested image URLs.
#[derive(Debug, Default)]
pub struct PrefetchCache {
    urls: IndexSet<String>,
}

impl PrefetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Whether `url` has not been requested yet.
    pub fn should_fetch(&self, url: &str) -> bool {
        !self.urls.contains(url)
    }

    /// Remember `url`. Returns `false` if it was already recorded.
    pub fn record(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    /// Drop the oldest entries once the cache exceeds [`CACHE_HIGH_WATER`],
    /// leaving [`CACHE_LOW_WATER`] entries. Returns the number removed.
    ///
    /// Eviction follows insertion order, not access order.
    pub fn evict_if_oversized(&mut self) -> usize {
        if self.urls.len() <= CACHE_HIGH_WATER {
            return 0;
        }
        let excess = self.urls.len() - CACHE_LOW_WATER;
        self.urls.drain(..excess);
        tracing::debug!(removed = excess, remaining = self.urls.len(), "Prefetch cache trimmed");
        excess
    }

    pub fn clear(&mut self) {
        self.urls.clear();
    }

    /// Plan the preloads around `center` for the given motion direction.
    ///
    /// Every neighbour in the window (the center excluded) is resolved through
    /// `locator`; frames outside all folders are skipped. URLs not requested
    /// before are recorded and returned, in ascending frame order, for the
    /// caller to issue as best-effort background loads.
    pub fn plan(
        &mut self,
        locator: &FrameLocator,
        center: AbsoluteFrame,
        direction: Direction,
    ) -> Vec<String> {
        let window = PrefetchWindow::for_direction(direction);
        let first = center.saturating_sub(window.behind);
        let last = center.saturating_add(window.ahead);

        let mut batch = Vec::new();
        for frame in first..=last {
            if frame == center {
                continue;
            }
            let Some(url) = locator.locate(frame).and_then(|p| locator.image_url(p)) else {
                continue;
            };
            if self.should_fetch(&url) {
                self.record(url.clone());
                batch.push(url);
            }
        }

        let evicted = self.evict_if_oversized();
        tracing::debug!(
            ?direction,
            ahead = window.ahead,
            behind = window.behind,
            center,
            queued = batch.len(),
            evicted,
            "Planned frame prefetch"
        );
        batch
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
