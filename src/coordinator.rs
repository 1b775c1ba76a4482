//! Collection-wide exclusivity.
//!
//! At most one row of a list may be open or interacting at a time. The coordinator records which
//! row that is. When another row takes over, it queues a request to force the previous holder
//! closed; the list drains the queue right after handling the event that caused it, so no two rows
//! are ever active once an event has been processed.

use std::collections::VecDeque;
use std::fmt::Debug;

use tracing::{debug, trace};

/// Work the coordinator needs the list to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request<K> {
    /// Close this row right away.
    ForceReset(K),
}

#[derive(Debug)]
pub struct Coordinator<K> {
    /// Row currently holding the exclusivity slot.
    current: Option<K>,
    requests: VecDeque<Request<K>>,
}

impl<K: Clone + PartialEq + Debug> Coordinator<K> {
    pub fn new() -> Self {
        Self {
            current: None,
            requests: VecDeque::new(),
        }
    }

    pub fn current(&self) -> Option<&K> {
        self.current.as_ref()
    }

    /// Gives the slot to `row`, forcing the previous holder closed.
    pub fn request_activate(&mut self, row: &K) {
        if self.current.as_ref() == Some(row) {
            return;
        }

        if let Some(previous) = self.current.replace(row.clone()) {
            debug!("{row:?} took over from {previous:?}");
            self.requests.push_back(Request::ForceReset(previous));
        } else {
            trace!("{row:?} activated");
        }
    }

    /// Frees the slot if `row` holds it.
    ///
    /// Returns whether anything changed. Rows closed by a force reset release afterwards too; by
    /// then the slot belongs to someone else and this does nothing.
    pub fn release(&mut self, row: &K) -> bool {
        if self.current.as_ref() != Some(row) {
            return false;
        }

        trace!("{row:?} released");
        self.current = None;
        true
    }

    /// Forces the holder closed unless it is `keep`.
    pub fn close_all_except(&mut self, keep: Option<&K>) {
        let Some(current) = &self.current else {
            return;
        };

        if Some(current) == keep {
            return;
        }

        if let Some(current) = self.current.take() {
            debug!("closing {current:?}");
            self.requests.push_back(Request::ForceReset(current));
        }
    }

    /// Forgets `row` without closing it, e.g. because it was removed.
    pub fn forget(&mut self, row: &K) {
        self.release(row);
        self.requests
            .retain(|Request::ForceReset(pending)| pending != row);
    }

    pub fn pop_request(&mut self) -> Option<Request<K>> {
        self.requests.pop_front()
    }

    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }
}
