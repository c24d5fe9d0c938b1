//! Coalescing of sprite sheet load completions into re-render signals.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::SpriteSheet;

/// Default quiet period before a burst of load completions triggers a redraw.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Cancellable trailing-edge timer.
///
/// Each [`Debouncer::notify`] restarts the window; [`Debouncer::poll`] fires
/// once the window elapses without further notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Creates an idle debouncer with the provided quiet period.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Quiet period of the debouncer.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Whether a signal is waiting to fire.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Records an event, replacing any pending deadline.
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Drops the pending signal, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            Some(_) | None => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// Tracks which sprite sheets finished loading and when to redraw.
#[derive(Clone, Debug, Default)]
pub struct TextureLoadTracker {
    loaded: Vec<SpriteSheet>,
    debouncer: Debouncer,
}

impl TextureLoadTracker {
    /// Creates a tracker whose redraw signal uses the provided window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            loaded: Vec::new(),
            debouncer: Debouncer::new(window),
        }
    }

    /// Records that `sheet` finished loading at `now`.
    pub fn sheet_loaded(&mut self, sheet: SpriteSheet, now: Instant) {
        if !self.loaded.contains(&sheet) {
            self.loaded.push(sheet);
        }
        debug!(sheet = sheet.name(), "sprite sheet loaded");
        self.debouncer.notify(now);
    }

    /// Whether `sheet` has finished loading.
    #[must_use]
    pub fn is_loaded(&self, sheet: SpriteSheet) -> bool {
        self.loaded.contains(&sheet)
    }

    /// Whether every sheet has finished loading.
    #[must_use]
    pub fn all_loaded(&self) -> bool {
        SpriteSheet::ALL.iter().all(|sheet| self.is_loaded(*sheet))
    }

    /// Returns `true` when a coalesced redraw is due.
    pub fn poll_redraw(&mut self, now: Instant) -> bool {
        self.debouncer.poll(now)
    }

    /// Drops a pending redraw signal.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}
