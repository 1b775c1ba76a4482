//! Drag tracking for animated values.

use std::time::Duration;

use crate::input::swipe_tracker::SwipeTracker;

/// State for a drag-controlled value.
#[derive(Debug)]
pub struct DragGesture {
    /// The offset when the drag started.
    pub start_offset: f64,
    /// The current offset as modified by the drag, after clamping.
    pub current_offset: f64,
    /// Swipe tracker for release velocity.
    pub tracker: SwipeTracker,
    /// Cumulative translation last pushed into the tracker.
    pub last_translation: f64,
    /// Timestamp of the event that started the drag.
    pub start_time: Duration,
}

impl DragGesture {
    /// Creates a new drag starting at the given offset.
    pub fn new(offset: f64, timestamp: Duration) -> Self {
        Self {
            start_offset: offset,
            current_offset: offset,
            tracker: SwipeTracker::new(),
            last_translation: 0.,
            start_time: timestamp,
        }
    }

    /// Feeds a new cumulative translation into the tracker.
    ///
    /// Returns the unclamped offset the translation corresponds to.
    pub fn push_translation(&mut self, translation: f64, timestamp: Duration) -> f64 {
        // A dropped reading is folded into the next accepted one.
        if self.tracker.push(translation - self.last_translation, timestamp) {
            self.last_translation = translation;
        }
        self.start_offset + translation
    }
}
