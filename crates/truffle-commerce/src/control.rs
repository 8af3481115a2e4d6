//! Re-entrancy guard for quantity steppers.

use std::time::{Duration, Instant};

/// Minimum spacing between accepted triggers.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(200);

/// One increment or decrement control.
///
/// A trigger inside the window after the last accepted one is dropped,
/// not queued.
#[derive(Debug, Clone)]
pub struct QuantityControl {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl Default for QuantityControl {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

impl QuantityControl {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    /// Try to fire at `now`. Returns false if the trigger was dropped.
    pub fn try_trigger_at(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}
