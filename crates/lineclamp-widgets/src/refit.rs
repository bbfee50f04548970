#![forbid(unsafe_code)]

//! Next-frame refit scheduling.
//!
//! Resize notifications and prop changes arrive in bursts. A refit is
//! expensive (many probe renders), so requests are coalesced: only the
//! latest one survives until the next frame, and a frame fires at most one.
//!
//! # Invariants
//!
//! - **Latest-wins**: a new request replaces any pending one.
//! - **One per frame**: [`RefitTrigger::take_due`] yields at most one request
//!   and leaves nothing pending.
//! - **Deterministic**: identical request sequences yield identical stats.
//!
//! # Example
//! ```
//! use lineclamp_widgets::{RefitReason, RefitTrigger};
//!
//! let mut trigger = RefitTrigger::new();
//! trigger.request(RefitReason::Resized);
//! trigger.request(RefitReason::Resized);
//! trigger.request(RefitReason::RowsChanged);
//!
//! assert_eq!(trigger.take_due(), Some(RefitReason::RowsChanged));
//! assert_eq!(trigger.take_due(), None);
//! assert_eq!(trigger.stats().coalesced, 2);
//! ```

/// Why a refit was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefitReason {
    Mount,
    ContentChanged,
    RowsChanged,
    Resized,
}

impl RefitReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::ContentChanged => "content_changed",
            Self::RowsChanged => "rows_changed",
            Self::Resized => "resized",
        }
    }
}

/// Counters for coalescing decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefitStats {
    /// Requests received.
    pub requested: u64,
    /// Requests replaced by a later one before their frame.
    pub coalesced: u64,
    /// Requests dropped by [`RefitTrigger::cancel`].
    pub cancelled: u64,
    /// Requests handed out by [`RefitTrigger::take_due`].
    pub fired: u64,
}

/// Latest-wins "next frame" trigger.
#[derive(Debug, Clone, Default)]
pub struct RefitTrigger {
    pending: Option<RefitReason>,
    stats: RefitStats,
}

impl RefitTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a refit for the next frame, replacing any pending one.
    pub fn request(&mut self, reason: RefitReason) {
        self.stats.requested += 1;
        if self.pending.replace(reason).is_some() {
            self.stats.coalesced += 1;
        }
    }

    /// The request due this frame, if any.
    pub fn take_due(&mut self) -> Option<RefitReason> {
        let due = self.pending.take();
        if due.is_some() {
            self.stats.fired += 1;
        }
        due
    }

    /// Drop the pending request. Returns what was dropped.
    pub fn cancel(&mut self) -> Option<RefitReason> {
        let dropped = self.pending.take();
        if dropped.is_some() {
            self.stats.cancelled += 1;
        }
        dropped
    }

    #[must_use]
    pub const fn pending(&self) -> Option<RefitReason> {
        self.pending
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn stats(&self) -> RefitStats {
        self.stats
    }
}
