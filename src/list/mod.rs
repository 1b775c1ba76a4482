//! Binds rows of a collection to the gesture engine.
//!
//! A [`SwipeList`] owns one [`SwipeRow`] per attached row id together with the list's exclusivity
//! [`Coordinator`]. Input events are routed to rows by id; whatever the rows ask for in return
//! (exclusivity changes, action triggers, haptics) is carried out here before the handler returns.

use std::fmt::Debug;
use std::time::Duration;

use serde::Serialize;
use swipecell_config::Settings;
use tracing::{debug, trace, warn};

use crate::action::{ActionGroup, ButtonFrame, HapticKind, Side};
use crate::animation::Clock;
use crate::coordinator::{Coordinator, Request};
use crate::row::{Effect, Phase, RowGestureState, SwipeRow};

/// Something the host should know about, drained with [`SwipeList::take_events()`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SwipeEvent<K> {
    /// An action fired, either by a tap or by a swipe-out.
    Triggered { row: K, side: Side, index: usize },
    /// Play haptic feedback.
    Haptic { row: K, kind: HapticKind },
    /// The row was closed because another row took over or the list closed it.
    ForceReset { row: K },
}

#[derive(Debug)]
pub struct SwipeList<K, C> {
    /// Rows in attach order.
    rows: Vec<SwipeRow<K, C>>,
    coordinator: Coordinator<K>,
    /// Clock shared by all rows.
    clock: Clock,
    events: Vec<SwipeEvent<K>>,
}

/// Handle to one attached row.
#[derive(Debug)]
pub struct RowBinding<'a, K, C> {
    list: &'a mut SwipeList<K, C>,
    id: K,
}

impl<K: Clone + PartialEq + Debug, C> SwipeList<K, C> {
    pub fn new(clock: Clock) -> Self {
        Self {
            rows: Vec::new(),
            coordinator: Coordinator::new(),
            clock,
            events: Vec::new(),
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Registers a row, or updates the groups and settings of an already attached one.
    ///
    /// Re-attaching keeps the gesture state, so this can be called for every row on every
    /// rebuild of the host list.
    pub fn attach(
        &mut self,
        id: K,
        leading: ActionGroup<C>,
        trailing: ActionGroup<C>,
        settings: Settings,
    ) -> RowBinding<'_, K, C> {
        if let Some(idx) = self.rows.iter().position(|row| *row.id() == id) {
            trace!("updating row {id:?}");
            let effects = self.rows[idx].update_config(leading, trailing, settings);
            self.process_effects(&id, effects);
            self.process_requests();
        } else {
            debug!("attaching row {id:?}");
            let row = SwipeRow::new(id.clone(), leading, trailing, settings, self.clock.clone());
            self.rows.push(row);
        }

        RowBinding { list: self, id }
    }

    pub fn binding(&mut self, id: &K) -> Option<RowBinding<'_, K, C>> {
        self.row(id)?;
        Some(RowBinding {
            list: self,
            id: id.clone(),
        })
    }

    pub fn row(&self, id: &K) -> Option<&SwipeRow<K, C>> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn rows(&self) -> impl Iterator<Item = &SwipeRow<K, C>> + '_ {
        self.rows.iter()
    }

    /// The row that is currently open or being interacted with, if any.
    pub fn interacting_row(&self) -> Option<&K> {
        self.rows
            .iter()
            .find(|row| row.is_active())
            .map(SwipeRow::id)
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn on_drag_change(
        &mut self,
        id: &K,
        translation: f64,
        row_width: f64,
        timestamp: Duration,
    ) {
        self.with_row(id, |row| row.drag_update(translation, row_width, timestamp));
    }

    pub fn on_drag_end(
        &mut self,
        id: &K,
        translation: f64,
        velocity: Option<f64>,
        row_width: f64,
        timestamp: Duration,
    ) {
        self.with_row(id, |row| {
            row.drag_end(translation, velocity, row_width, timestamp)
        });
    }

    pub fn on_drag_cancel(&mut self, id: &K) {
        self.with_row(id, SwipeRow::drag_cancel);
    }

    pub fn tap_action(&mut self, id: &K, side: Side, index: usize) {
        self.with_row(id, |row| row.tap_action(side, index));
    }

    /// Handles a tap on the content of a row, closing whatever is open.
    pub fn tap_content(&mut self, id: &K) {
        self.with_row(id, SwipeRow::tap_content);
        self.close_all_except(Some(id));
    }

    /// Immediately closes a row.
    pub fn reset(&mut self, id: &K) {
        self.with_row(id, SwipeRow::reset);
    }

    /// Closes every row except `keep`, for example when the list starts scrolling.
    pub fn close_all_except(&mut self, keep: Option<&K>) {
        self.coordinator.close_all_except(keep);
        self.process_requests();
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Resets and forgets a row, e.g. because its item was deleted.
    ///
    /// Attaching the same id later starts from a clean state.
    pub fn remove(&mut self, id: &K) {
        let Some(idx) = self.rows.iter().position(|row| row.id() == id) else {
            return;
        };

        debug!("removing row {id:?}");
        let mut row = self.rows.remove(idx);
        row.reset();
        self.coordinator.forget(id);
    }

    /// Removes every row whose id isn't in `ids`.
    pub fn retain(&mut self, ids: &[K]) {
        let removed: Vec<K> = self
            .rows
            .iter()
            .map(SwipeRow::id)
            .filter(|id| !ids.contains(id))
            .cloned()
            .collect();

        for id in &removed {
            self.remove(id);
        }
    }

    /// Completes finished animations.
    ///
    /// Swipe-out actions fire from here, so this should be called once per frame.
    pub fn advance_animations(&mut self) {
        let finished: Vec<(K, Vec<Effect>)> = self
            .rows
            .iter_mut()
            .map(|row| (row.id().clone(), row.advance_animations()))
            .filter(|(_, effects)| !effects.is_empty())
            .collect();

        for (id, effects) in finished {
            self.process_effects(&id, effects);
        }
        self.process_requests();
    }

    pub fn are_animations_ongoing(&self) -> bool {
        self.rows.iter().any(SwipeRow::are_animations_ongoing)
    }

    pub fn take_events(&mut self) -> Vec<SwipeEvent<K>> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Effects
    // =========================================================================

    fn with_row(&mut self, id: &K, f: impl FnOnce(&mut SwipeRow<K, C>) -> Vec<Effect>) {
        let Some(row) = self.rows.iter_mut().find(|row| row.id() == id) else {
            warn!("ignoring event for unknown row {id:?}");
            return;
        };

        let effects = f(row);
        self.process_effects(id, effects);
        self.process_requests();
    }

    fn process_effects(&mut self, id: &K, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Activate => self.coordinator.request_activate(id),
                Effect::Release => {
                    self.coordinator.release(id);
                }
                Effect::Haptic(kind) => self.events.push(SwipeEvent::Haptic {
                    row: id.clone(),
                    kind,
                }),
                Effect::Trigger { side, index } => self.trigger(id, side, index),
            }
        }
    }

    /// Carries out force resets until the coordinator has nothing left.
    fn process_requests(&mut self) {
        while let Some(request) = self.coordinator.pop_request() {
            match request {
                Request::ForceReset(id) => {
                    let Some(row) = self.rows.iter_mut().find(|row| *row.id() == id) else {
                        continue;
                    };

                    debug!("force resetting {id:?}");
                    // A committed swipe-out fires before the reset is reported.
                    let effects = row.collapse();
                    self.process_effects(&id, effects);
                    self.events.push(SwipeEvent::ForceReset { row: id });
                }
            }
        }
    }

    fn trigger(&mut self, id: &K, side: Side, index: usize) {
        let Some(row) = self.rows.iter().find(|row| row.id() == id) else {
            return;
        };

        let Some(item) = row.group(side).items.get(index) else {
            warn!("row {id:?} has no {side:?} action {index}");
            return;
        };

        debug!("triggering {side:?} action {index} of {id:?}");
        item.trigger();
        self.events.push(SwipeEvent::Triggered {
            row: id.clone(),
            side,
            index,
        });
    }

    #[cfg(test)]
    fn verify_invariants(&self) {
        let active: Vec<&K> = self
            .rows
            .iter()
            .filter(|row| row.is_active())
            .map(SwipeRow::id)
            .collect();
        assert!(active.len() <= 1, "more than one active row: {active:?}");

        if let Some(id) = active.first() {
            assert_eq!(
                self.coordinator.current(),
                Some(*id),
                "the active row must hold the exclusivity slot"
            );
        }

        if let Some(current) = self.coordinator.current() {
            assert!(
                self.row(current).is_some(),
                "exclusivity held by a removed row"
            );
        }
        assert!(!self.coordinator.has_requests());

        for (idx, row) in self.rows.iter().enumerate() {
            assert!(
                !self.rows[..idx].iter().any(|other| other.id() == row.id()),
                "row ids must be unique"
            );
            assert_eq!(&self.clock, row.clock());
            row.verify_invariants();
        }
    }
}

impl<K: Clone + PartialEq + Debug, C> RowBinding<'_, K, C> {
    pub fn id(&self) -> &K {
        &self.id
    }

    fn row(&self) -> Option<&SwipeRow<K, C>> {
        self.list.row(&self.id)
    }

    pub fn offset(&self) -> f64 {
        self.row().map_or(0., SwipeRow::offset)
    }

    pub fn phase(&self) -> Phase {
        self.row().map_or(Phase::Idle, SwipeRow::phase)
    }

    pub fn state(&self) -> Option<RowGestureState<K>> {
        self.row().map(SwipeRow::state)
    }

    pub fn buttons(&self) -> Vec<ButtonFrame> {
        self.row().map(SwipeRow::buttons).unwrap_or_default()
    }

    pub fn button_at(&self, x: f64) -> Option<(Side, usize)> {
        self.row()?.button_at(x)
    }

    pub fn on_drag_change(&mut self, translation: f64, row_width: f64, timestamp: Duration) {
        self.list
            .on_drag_change(&self.id, translation, row_width, timestamp);
    }

    pub fn on_drag_end(
        &mut self,
        translation: f64,
        velocity: Option<f64>,
        row_width: f64,
        timestamp: Duration,
    ) {
        self.list
            .on_drag_end(&self.id, translation, velocity, row_width, timestamp);
    }

    pub fn on_drag_cancel(&mut self) {
        self.list.on_drag_cancel(&self.id);
    }

    pub fn tap_action(&mut self, side: Side, index: usize) {
        self.list.tap_action(&self.id, side, index);
    }

    pub fn tap_content(&mut self) {
        self.list.tap_content(&self.id);
    }

    pub fn reset(&mut self) {
        self.list.reset(&self.id);
    }
}

#[cfg(test)]
mod tests;
