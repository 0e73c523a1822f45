//! Snapshot-based undo history.
//!
//! Callers push a full clone of the state *before* each mutation; undo pops
//! the newest snapshot and writes it back over the live state. Pushes that
//! arrive inside the coalescing window after the last accepted push are
//! dropped, so a burst of events (a drag, a double-click's clicks) becomes a
//! single undo step. There is no redo: an undone snapshot is gone.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ─── Clocks ──────────────────────────────────────────────────────────────

/// Time source for coalescing. Only differences between readings matter.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time since construction.
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock the host sets explicitly, e.g. from `performance.now()` in a
/// browser where `Instant` is unavailable. Clones share the same reading.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<Duration>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Duration) {
        self.0.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.0.get()
    }
}

// ─── History ─────────────────────────────────────────────────────────────

/// Snapshots allocated up front; deeper histories grow on demand.
const PREALLOCATE_LIMIT: usize = 32;

pub struct UndoHistory<S> {
    entries: VecDeque<S>,
    capacity: usize,
    coalesce_window: Duration,
    last_push: Option<Duration>,
    /// Set while a snapshot is being written back; pushes are ignored.
    restoring: bool,
    clock: Box<dyn Clock>,
}

impl<S: Clone> UndoHistory<S> {
    pub fn new(capacity: usize, coalesce_window: Duration) -> Self {
        Self::with_clock(capacity, coalesce_window, Box::new(MonotonicClock::new()))
    }

    pub fn with_clock(capacity: usize, coalesce_window: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(PREALLOCATE_LIMIT)),
            capacity,
            coalesce_window,
            last_push: None,
            restoring: false,
            clock,
        }
    }

    /// Record `state` as it is right before a mutation.
    ///
    /// Returns `false` when the push was skipped because a restore is in
    /// progress or it fell inside the coalescing window.
    pub fn push(&mut self, state: &S) -> bool {
        if self.restoring {
            return false;
        }

        // A clock reading earlier than the last push (host timestamps
        // rewound) counts as outside the window.
        let now = self.clock.now();
        if let Some(elapsed) = self.last_push.and_then(|last| now.checked_sub(last))
            && elapsed < self.coalesce_window
        {
            log::trace!("history: coalesced push ({elapsed:?} since last)");
            return false;
        }

        self.entries.push_back(state.clone());
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.last_push = Some(now);
        log::trace!("history: {} entries", self.entries.len());
        true
    }

    /// Replace `live` with the newest snapshot. Returns `false` on an empty history.
    pub fn undo(&mut self, live: &mut S) -> bool {
        let Some(snapshot) = self.entries.pop_back() else {
            return false;
        };
        self.restoring = true;
        *live = snapshot;
        self.restoring = false;
        log::debug!("history: undo, {} entries left", self.entries.len());
        true
    }

    /// `true` only while `undo` is writing a snapshot back.
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    /// Whether there is at least one snapshot to undo.
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of snapshots available to undo.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of snapshots kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshots from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &S> {
        self.entries.iter()
    }

    /// Drop every snapshot and forget the coalescing window.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_push = None;
    }
}
