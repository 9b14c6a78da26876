//! Quiet-period coalescing for the search input with suppression of repeated
//! values.

use std::time::{Duration, Instant};

pub const SEARCH_QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct SearchDebounce {
    quiet: Duration,
    pending: Option<(String, Instant)>,
    last_emitted: Option<String>,
}

impl Default for SearchDebounce {
    fn default() -> Self {
        Self::new(SEARCH_QUIET_PERIOD)
    }
}

impl SearchDebounce {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_emitted: None,
        }
    }

    /// Marks `value` as already applied so an identical first input is
    /// dropped.
    pub fn seed(&mut self, value: impl Into<String>) {
        self.last_emitted = Some(value.into());
    }

    /// Replaces any pending value and restarts the quiet window.
    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now + self.quiet));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Releases the pending value once its window has elapsed. A value equal
    /// to the previously released one is consumed without being returned.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self.deadline()?;
        if now < due {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if self.last_emitted.as_deref() == Some(value.as_str()) {
            tracing::trace!(%value, "dropping repeated search value");
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }
}
