//! Per-row swipe state machine.
//!
//! A [`SwipeRow`] owns the action groups and the animated content offset of one row. It knows
//! nothing about other rows: whenever it needs the collection-wide exclusivity slot, fires an
//! action or wants haptic feedback it returns an [`Effect`] for the owner to carry out.
//!
//! Phases:
//!
//! ```text
//!            drag            release                animation done
//! Idle ───────────▶ Dragging ───────▶ Settling ─────────────────────▶ Open / Idle
//!                           │
//!                           └───────▶ SwipingOut ──▶ (action fires) ──▶ Settling ──▶ Idle
//!                                                                    └▶ held at the edge when destructive
//! ```

use serde::Serialize;
use swipecell_config::Settings;
use tracing::debug;

use crate::action::{ActionGroup, HapticKind, Side};
use crate::animated_value::AnimatedValue;
use crate::animation::{Animation, Clock};
use crate::utils::{non_negative, sanitize_settings};

use self::resolve::max_reveal;

mod gesture;
pub mod resolve;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    /// Closed and at rest, or collapsing after a forced close.
    Idle,
    /// Following the pointer.
    Dragging,
    /// Animating to the offset a released drag resolved to.
    Settling,
    /// Resting with one action group revealed.
    Open,
    /// Sliding off the row edge before (and, for destructive items, after) the action fires.
    SwipingOut,
}

/// Side effects requested by a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The row started interacting and needs the exclusivity slot.
    Activate,
    /// The row is closed and gives the slot up.
    Release,
    Haptic(HapticKind),
    /// Invoke the action of an item.
    Trigger { side: Side, index: usize },
}

/// Observable state of a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowGestureState<K> {
    pub row_id: K,
    /// Current, possibly animated, offset of the row content.
    pub drag_offset: f64,
    /// Offset the row is heading to.
    pub target_offset: f64,
    pub phase: Phase,
    pub active_side: Option<Side>,
    /// Revealed width while open, 0 otherwise.
    pub open_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSwipeOut {
    side: Side,
    index: usize,
}

#[derive(Debug)]
pub struct SwipeRow<K, C> {
    id: K,
    leading: ActionGroup<C>,
    trailing: ActionGroup<C>,
    settings: Settings,
    clock: Clock,
    /// Horizontal offset of the row content.
    offset: AnimatedValue,
    phase: Phase,
    active_side: Option<Side>,
    /// Swipe-out committed on release, fired once the slide-out animation finishes.
    pending_swipe_out: Option<PendingSwipeOut>,
    /// Side the row rested on, or was heading to, when the current drag started.
    drag_origin: Option<Side>,
    /// Drag changes arrived but all stayed within the tap slop.
    drag_pending: bool,
    /// Set when the row was force-closed mid-drag; the rest of that drag is ignored.
    ignore_drag: bool,
    /// Last row width reported by a drag event.
    row_width: f64,
}

impl<K, C> SwipeRow<K, C> {
    pub fn new(
        id: K,
        mut leading: ActionGroup<C>,
        mut trailing: ActionGroup<C>,
        settings: Settings,
        clock: Clock,
    ) -> Self {
        leading.side = Side::Leading;
        trailing.side = Side::Trailing;

        Self {
            id,
            leading,
            trailing,
            settings: sanitize_settings(settings),
            clock,
            offset: AnimatedValue::new(0.),
            phase: Phase::Idle,
            active_side: None,
            pending_swipe_out: None,
            drag_origin: None,
            drag_pending: false,
            ignore_drag: false,
            row_width: 0.,
        }
    }

    pub fn id(&self) -> &K {
        &self.id
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn group(&self, side: Side) -> &ActionGroup<C> {
        match side {
            Side::Leading => &self.leading,
            Side::Trailing => &self.trailing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current, possibly animated, offset of the row content.
    pub fn offset(&self) -> f64 {
        self.offset.current()
    }

    /// Offset the row is heading to.
    pub fn target_offset(&self) -> f64 {
        self.offset.target()
    }

    pub fn active_side(&self) -> Option<Side> {
        self.active_side
    }

    pub fn open_width(&self) -> f64 {
        if self.phase == Phase::Open {
            self.offset.target().abs()
        } else {
            0.
        }
    }

    pub fn row_width(&self) -> f64 {
        self.row_width
    }

    pub fn set_row_width(&mut self, row_width: f64) {
        self.row_width = non_negative(row_width);
    }

    /// Whether the row counts as open or interacting for exclusivity purposes.
    pub fn is_active(&self) -> bool {
        match self.phase {
            Phase::Idle => false,
            Phase::Dragging | Phase::Open | Phase::SwipingOut => true,
            Phase::Settling => self.offset.target() != 0.,
        }
    }

    pub fn are_animations_ongoing(&self) -> bool {
        self.offset.is_animation_ongoing()
    }

    pub fn state(&self) -> RowGestureState<K>
    where
        K: Clone,
    {
        RowGestureState {
            row_id: self.id.clone(),
            drag_offset: self.offset(),
            target_offset: self.target_offset(),
            phase: self.phase,
            active_side: self.active_side,
            open_width: self.open_width(),
        }
    }

    /// Replaces the groups and settings, keeping the gesture state.
    pub fn update_config(
        &mut self,
        mut leading: ActionGroup<C>,
        mut trailing: ActionGroup<C>,
        settings: Settings,
    ) -> Vec<Effect> {
        leading.side = Side::Leading;
        trailing.side = Side::Trailing;
        self.leading = leading;
        self.trailing = trailing;
        self.settings = sanitize_settings(settings);

        match self.phase {
            Phase::Dragging => {
                let leading_max = max_reveal(&self.leading, &self.settings, self.row_width);
                let trailing_max = max_reveal(&self.trailing, &self.settings, self.row_width);
                if let AnimatedValue::Gesture(gesture) = &mut self.offset {
                    let offset = gesture.current_offset.clamp(-trailing_max, leading_max);
                    gesture.current_offset = offset;
                    self.active_side = Side::from_offset(gesture.current_offset);
                }
                Vec::new()
            }
            // An open row follows its group's new width.
            Phase::Open | Phase::Settling => {
                let target = self.offset.target();
                let Some(side) = Side::from_offset(target) else {
                    return Vec::new();
                };

                let new_target = side.sign() * self.group(side).width();
                if new_target == target {
                    return Vec::new();
                }

                if self.phase == Phase::Settling {
                    self.animate_to(new_target, 0., self.settings.animations.settle);
                    Vec::new()
                } else if new_target != 0. {
                    self.offset = AnimatedValue::Static(new_target);
                    Vec::new()
                } else {
                    debug!("open group became empty, closing");
                    self.reset()
                }
            }
            Phase::Idle | Phase::SwipingOut => Vec::new(),
        }
    }

    /// Immediately closes the row.
    ///
    /// Any committed swipe-out that didn't fire yet is dropped.
    pub fn reset(&mut self) -> Vec<Effect> {
        if self.pending_swipe_out.take().is_some() {
            debug!("dropping pending swipe-out on reset");
        }

        // The rest of an interrupted drag is ignored.
        self.ignore_drag = self.offset.is_gesture();
        self.drag_pending = false;
        self.offset = AnimatedValue::Static(0.);
        self.phase = Phase::Idle;
        self.active_side = None;

        vec![Effect::Release]
    }

    /// Closes the row because another row took over.
    ///
    /// The row becomes idle right away while its content animates back. A swipe-out that was
    /// already committed fires now.
    pub fn collapse(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Some(PendingSwipeOut { side, index }) = self.pending_swipe_out.take() {
            effects.push(Effect::Trigger { side, index });
        }

        if self.offset.is_gesture() {
            self.ignore_drag = true;
        }
        self.drag_pending = false;

        self.phase = Phase::Idle;
        self.active_side = None;
        self.animate_to(0., 0., self.settings.animations.settle);

        effects
    }

    /// Completes finished animations.
    pub fn advance_animations(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        // Loop so that chained animations which are already done, e.g. with animations off,
        // complete within a single call.
        loop {
            let target = match &self.offset {
                AnimatedValue::Animation(anim) if anim.is_done() => anim.to(),
                // A transition that didn't need to move at all.
                AnimatedValue::Static(offset)
                    if self.phase == Phase::Settling
                        || (self.phase == Phase::SwipingOut
                            && self.pending_swipe_out.is_some()) =>
                {
                    *offset
                }
                _ => break,
            };
            self.offset = AnimatedValue::Static(target);

            match self.phase {
                Phase::Settling if target == 0. => {
                    debug!("settled closed");
                    self.phase = Phase::Idle;
                    self.active_side = None;
                    effects.push(Effect::Release);
                }
                Phase::Settling => {
                    debug!("settled open at {target}");
                    self.phase = Phase::Open;
                }
                Phase::SwipingOut => {
                    let Some(PendingSwipeOut { side, index }) = self.pending_swipe_out.take()
                    else {
                        continue;
                    };

                    debug!("swipe-out finished, firing {side:?} action {index}");
                    effects.push(Effect::Trigger { side, index });

                    let destructive = self
                        .group(side)
                        .items
                        .get(index)
                        .is_some_and(|item| item.destructive);
                    if !destructive {
                        self.phase = Phase::Settling;
                        self.animate_to(0., 0., self.settings.animations.settle);
                    }
                }
                Phase::Idle => {
                    self.active_side = None;
                }
                Phase::Dragging | Phase::Open => (),
            }
        }

        effects
    }

    fn animate_to(&mut self, target: f64, velocity: f64, config: swipecell_config::Animation) {
        let from = self.offset.current();
        if from == target {
            self.offset = AnimatedValue::Static(target);
            return;
        }

        let config = swipecell_config::Animation {
            off: config.off || self.settings.animations.off,
            ..config
        };

        // Starting a new animation replaces the running one.
        self.offset = AnimatedValue::Animation(Animation::new(
            self.clock.clone(),
            from,
            target,
            velocity,
            config,
        ));
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        assert_eq!(
            self.phase == Phase::Dragging,
            self.offset.is_gesture(),
            "only dragging rows follow a gesture"
        );

        if self.pending_swipe_out.is_some() {
            assert_eq!(self.phase, Phase::SwipingOut);
        }

        if self.drag_pending {
            assert!(!self.offset.is_gesture());
        }

        if self.phase == Phase::Idle {
            assert_eq!(self.active_side, None);
            assert_eq!(self.offset.target(), 0., "idle rows head to closed");
        }

        if self.phase == Phase::Open {
            let side = self.active_side.expect("open rows have an active side");
            assert!(self.offset.is_static());
            assert_eq!(self.offset(), side.sign() * self.group(side).width());
            assert!(self.open_width() > 0.);
        }

        if let AnimatedValue::Gesture(gesture) = &self.offset {
            let offset = gesture.current_offset;
            assert!(offset <= max_reveal(&self.leading, &self.settings, self.row_width));
            assert!(-offset <= max_reveal(&self.trailing, &self.settings, self.row_width));
        }
    }
}
