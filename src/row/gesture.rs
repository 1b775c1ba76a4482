//! Drag and tap handling for a row.

use std::time::Duration;

use tracing::{debug, trace, warn};

use super::resolve::{max_reveal, resolve, would_swipe_out, Outcome};
use super::{Effect, PendingSwipeOut, Phase, SwipeRow};
use crate::action::{HapticKind, Side};
use crate::animated_value::{AnimatedValue, DragGesture};

impl<K, C> SwipeRow<K, C> {
    // =========================================================================
    // Drag
    // =========================================================================

    /// Updates the drag with the cumulative translation since the pointer went down.
    ///
    /// Movement within the tap slop doesn't start a drag. The update that does start one returns
    /// [`Effect::Activate`].
    pub fn drag_update(
        &mut self,
        translation: f64,
        row_width: f64,
        timestamp: Duration,
    ) -> Vec<Effect> {
        self.set_row_width(row_width);

        if self.ignore_drag {
            return Vec::new();
        }

        let translation = if translation.is_finite() { translation } else { 0. };

        let mut effects = Vec::new();
        if !self.offset.is_gesture() {
            if self.phase == Phase::SwipingOut {
                trace!("ignoring drag during swipe-out");
                return effects;
            }

            if translation.abs() < self.settings.tap_slop {
                self.drag_pending = true;
                return effects;
            }

            let start = self.offset.current();
            debug!("drag started at {start}");
            self.drag_origin = Side::from_offset(self.offset.stationary());
            self.offset = AnimatedValue::Gesture(DragGesture::new(start, timestamp));
            self.phase = Phase::Dragging;
            self.drag_pending = false;
            effects.push(Effect::Activate);
        }

        let leading_max = max_reveal(&self.leading, &self.settings, self.row_width);
        let trailing_max = max_reveal(&self.trailing, &self.settings, self.row_width);

        if let AnimatedValue::Gesture(gesture) = &mut self.offset {
            let offset = gesture.push_translation(translation, timestamp);
            let offset = offset.clamp(-trailing_max, leading_max);
            gesture.current_offset = offset;
            trace!("drag update: translation {translation}, offset {offset}");

            self.active_side = Side::from_offset(offset);
        }

        effects
    }

    /// Ends the drag and resolves where the row goes.
    ///
    /// Without an explicit `velocity` the one measured from the drag updates is used. When the
    /// earlier changes all stayed within the tap slop, the final translation may still start the
    /// drag, so a quick flick resolves like any other release.
    pub fn drag_end(
        &mut self,
        translation: f64,
        velocity: Option<f64>,
        row_width: f64,
        timestamp: Duration,
    ) -> Vec<Effect> {
        if self.ignore_drag {
            self.ignore_drag = false;
            return Vec::new();
        }

        let drag_pending = std::mem::take(&mut self.drag_pending);
        if !self.offset.is_gesture() && !drag_pending {
            debug!("drag end without a drag in progress, closing");
            return self.close();
        }

        // Account for the final movement.
        let mut effects = self.drag_update(translation, row_width, timestamp);
        self.drag_pending = false;

        let AnimatedValue::Gesture(gesture) = &self.offset else {
            debug!("drag ended within the tap slop, closing");
            effects.extend(self.close());
            return effects;
        };

        let offset = gesture.current_offset;
        let velocity = velocity
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| gesture.tracker.velocity());
        trace!(
            "drag lasted {:?}",
            timestamp.saturating_sub(gesture.start_time)
        );

        let outcome = resolve(
            offset,
            velocity,
            &self.leading,
            &self.trailing,
            &self.settings,
        );
        debug!("drag ended at {offset} with velocity {velocity}: {outcome:?}");

        match outcome {
            Outcome::Closed => {
                self.phase = Phase::Settling;
                self.animate_to(0., velocity, self.settings.animations.settle);
            }
            Outcome::Open(side) => {
                let target = side.sign() * self.group(side).width();
                self.phase = Phase::Settling;
                self.active_side = Some(side);
                self.animate_to(target, velocity, self.settings.animations.settle);
            }
            Outcome::SwipeOut { side, index } => {
                let haptic = self
                    .group(side)
                    .items
                    .get(index)
                    .map_or(HapticKind::None, |item| item.haptic);

                let distance = f64::max(self.row_width, offset.abs());
                self.phase = Phase::SwipingOut;
                self.active_side = Some(side);
                self.pending_swipe_out = Some(PendingSwipeOut { side, index });
                self.animate_to(
                    side.sign() * distance,
                    velocity,
                    self.settings.animations.swipe_out,
                );

                if haptic != HapticKind::None {
                    effects.push(Effect::Haptic(haptic));
                }
            }
        }

        effects.extend(self.advance_animations());
        effects
    }

    /// Cancels the drag, returning the row to where it was before it.
    pub fn drag_cancel(&mut self) -> Vec<Effect> {
        self.ignore_drag = false;
        self.drag_pending = false;

        if !self.offset.is_gesture() {
            return Vec::new();
        }

        let target = self
            .drag_origin
            .map_or(0., |side| side.sign() * self.group(side).width());
        debug!("drag cancelled, returning to {target}");

        self.phase = Phase::Settling;
        self.active_side = Side::from_offset(target);
        self.animate_to(target, 0., self.settings.animations.settle);
        self.advance_animations()
    }

    // =========================================================================
    // Taps
    // =========================================================================

    /// Handles a tap on a revealed action button: fires it and closes the row.
    pub fn tap_action(&mut self, side: Side, index: usize) -> Vec<Effect> {
        let revealed = Side::from_offset(self.offset.current()) == Some(side)
            && matches!(self.phase, Phase::Open | Phase::Settling);
        if !revealed {
            warn!("ignoring tap on {side:?} action {index} which isn't revealed");
            return Vec::new();
        }

        let Some(item) = self.group(side).items.get(index) else {
            warn!("ignoring tap on missing {side:?} action {index}");
            return Vec::new();
        };

        let mut effects = Vec::new();
        if self.settings.tap_haptics && item.haptic != HapticKind::None {
            effects.push(Effect::Haptic(item.haptic));
        }

        debug!("tapped {side:?} action {index}");
        effects.push(Effect::Trigger { side, index });
        effects.extend(self.close());
        effects
    }

    /// Handles a tap on the row content.
    pub fn tap_content(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Idle {
            return Vec::new();
        }

        self.close()
    }

    /// Closes the row with an animation, becoming idle right away.
    ///
    /// Rows sliding out towards a committed swipe-out are left alone. A row held at the edge after
    /// its destructive action fired does close, for hosts that declined the deletion.
    fn close(&mut self) -> Vec<Effect> {
        if self.phase == Phase::SwipingOut && self.pending_swipe_out.is_some() {
            return Vec::new();
        }

        if self.offset.is_gesture() {
            self.ignore_drag = true;
        }
        self.drag_pending = false;

        self.phase = Phase::Idle;
        self.active_side = None;
        self.animate_to(0., 0., self.settings.animations.settle);
        vec![Effect::Release]
    }

    /// Whether releasing now would swipe out; renderers switch to the swipe-out content.
    pub fn is_swipe_out_armed(&self) -> bool {
        match self.phase {
            Phase::SwipingOut => true,
            Phase::Dragging => would_swipe_out(
                self.offset.current(),
                &self.leading,
                &self.trailing,
                &self.settings,
            ),
            _ => false,
        }
    }
}
