//! Redraw scheduling.
//!
//! Index updates are synchronous, but decoration redraws are throttled with a leading-edge
//! debounce: the first dirtying change after a quiet period is reported immediately and starts a
//! timer; changes arriving while the timer runs are coalesced into one redraw when it expires.
//! Focused and background views have separate timers with different intervals.
//!
//! The scheduler owns no thread or runtime. Hosts call [`RedrawScheduler::poll`] from their event
//! loop (or arm their own timer for [`RedrawScheduler::next_deadline`]) and pass the current
//! time in, which keeps the behaviour deterministic under test.

use std::time::{Duration, Instant};
use tracing::trace;

/// Which kind of view a redraw is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewFocus {
    /// The view with input focus.
    Focused,
    /// Any other visible view of the document.
    Background,
}

/// Minimum spacing between two redraws of the same view kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedrawIntervals {
    /// Spacing for the focused view.
    pub focused: Duration,
    /// Spacing for every other view.
    pub background: Duration,
}

impl Default for RedrawIntervals {
    fn default() -> Self {
        Self {
            focused: Duration::from_millis(20),
            background: Duration::from_millis(200),
        }
    }
}

impl RedrawIntervals {
    fn get(&self, focus: ViewFocus) -> Duration {
        match focus {
            ViewFocus::Focused => self.focused,
            ViewFocus::Background => self.background,
        }
    }
}

/// Handle of a running debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledRedraw {
    focus: ViewFocus,
    deadline: Instant,
}

impl ScheduledRedraw {
    /// View kind the timer belongs to.
    pub fn focus(&self) -> ViewFocus {
        self.focus
    }

    /// When the timer expires.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// A redraw the host should perform now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedrawRequest {
    /// View kind to redraw.
    pub focus: ViewFocus,
    /// The instant the redraw was granted.
    pub at: Instant,
}

#[derive(Debug, Default)]
struct Slot {
    dirty: bool,
    timer: Option<ScheduledRedraw>,
}

/// Leading-edge debounce for decoration redraws.
#[derive(Debug)]
pub struct RedrawScheduler {
    intervals: RedrawIntervals,
    focused: Slot,
    background: Slot,
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new(RedrawIntervals::default())
    }
}

impl RedrawScheduler {
    /// Scheduler with nothing dirty and no running timers.
    pub fn new(intervals: RedrawIntervals) -> Self {
        Self {
            intervals,
            focused: Slot::default(),
            background: Slot::default(),
        }
    }

    /// Configured debounce intervals.
    pub fn intervals(&self) -> RedrawIntervals {
        self.intervals
    }

    fn slot(&self, focus: ViewFocus) -> &Slot {
        match focus {
            ViewFocus::Focused => &self.focused,
            ViewFocus::Background => &self.background,
        }
    }

    fn slot_mut(&mut self, focus: ViewFocus) -> &mut Slot {
        match focus {
            ViewFocus::Focused => &mut self.focused,
            ViewFocus::Background => &mut self.background,
        }
    }

    /// Record that the decorations of every view are out of date.
    pub fn mark_dirty(&mut self) {
        trace!(target: "prettify.redraw", "redraw_mark");
        self.focused.dirty = true;
        self.background.dirty = true;
    }

    /// Check if a redraw for `focus` is owed (fired or not).
    pub fn is_dirty(&self, focus: ViewFocus) -> bool {
        self.slot(focus).dirty
    }

    /// The running timer for `focus`, if any.
    pub fn pending(&self, focus: ViewFocus) -> Option<ScheduledRedraw> {
        self.slot(focus).timer
    }

    /// Decide whether views of kind `focus` should redraw at `now`.
    ///
    /// Fires immediately when dirty and no timer runs. While a timer runs nothing fires; once it
    /// has expired a coalesced redraw fires if anything was marked in the meantime.
    pub fn poll(&mut self, now: Instant, focus: ViewFocus) -> Option<RedrawRequest> {
        let interval = self.intervals.get(focus);
        let slot = self.slot_mut(focus);

        if let Some(timer) = slot.timer {
            if now < timer.deadline {
                return None;
            }
            slot.timer = None;
        }
        if !slot.dirty {
            return None;
        }

        slot.dirty = false;
        slot.timer = Some(ScheduledRedraw {
            focus,
            deadline: now + interval,
        });
        trace!(target: "prettify.redraw", ?focus, "redraw_fire");
        Some(RedrawRequest { focus, at: now })
    }

    /// Earliest instant at which [`poll`](Self::poll) may produce a coalesced redraw.
    pub fn next_deadline(&self) -> Option<Instant> {
        [&self.focused, &self.background]
            .into_iter()
            .filter(|slot| slot.dirty)
            .filter_map(|slot| slot.timer.map(|t| t.deadline))
            .min()
    }

    /// Cancel every running timer and forget pending redraws.
    pub fn cancel_all(&mut self) {
        self.focused = Slot::default();
        self.background = Slot::default();
    }
}
