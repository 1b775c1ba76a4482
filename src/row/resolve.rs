//! Drag release resolution.
//!
//! Rules, in order of precedence:
//!
//! 1. Swipe-out: the group has an enabled swipe-out item and the drag went past the full group
//!    width plus `swipe_out_trigger_margin`. Only distance counts here, a fling never swipes out.
//! 2. Past half of the group width, or a fling towards the revealed side, opens the row.
//! 3. Anything else closes the row.
//!
//! A fling back towards closed doesn't override the distance rule: a release past half of the
//! group width opens whatever the velocity.
//!
//! A `fling_velocity` of 0 disables flings altogether.

use swipecell_config::Settings;

use crate::action::{ActionGroup, Side};

/// Where a released drag ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Closed,
    Open(Side),
    SwipeOut { side: Side, index: usize },
}

pub fn resolve<C>(
    offset: f64,
    velocity: f64,
    leading: &ActionGroup<C>,
    trailing: &ActionGroup<C>,
    settings: &Settings,
) -> Outcome {
    let Some(side) = Side::from_offset(offset) else {
        return Outcome::Closed;
    };

    let group = match side {
        Side::Leading => leading,
        Side::Trailing => trailing,
    };
    if group.is_empty() {
        return Outcome::Closed;
    }

    let distance = offset.abs();
    let width = group.width();

    if let Some(index) = group.swipe_out_target() {
        if distance >= width + settings.swipe_out_trigger_margin {
            return Outcome::SwipeOut { side, index };
        }
    }

    if width <= 0. {
        return Outcome::Closed;
    }

    let fling = settings.fling_velocity;
    let reveal_velocity = velocity * side.sign();

    if distance >= width / 2. || (fling > 0. && reveal_velocity >= fling) {
        return Outcome::Open(side);
    }

    Outcome::Closed
}

/// How far a drag may reveal `group`.
///
/// Groups that can swipe out may be dragged across the whole row, or at least far enough to reach
/// the swipe-out threshold. Other groups stop at their width plus `add_width_margin`.
pub fn max_reveal<C>(group: &ActionGroup<C>, settings: &Settings, row_width: f64) -> f64 {
    if group.is_empty() {
        return 0.;
    }

    let width = group.width();
    if group.swipe_out_target().is_some() {
        let threshold = width + settings.swipe_out_trigger_margin + settings.add_width_margin;
        f64::max(row_width, threshold)
    } else {
        width + settings.add_width_margin
    }
}

/// Whether releasing at `offset` right now would swipe out.
pub fn would_swipe_out<C>(
    offset: f64,
    leading: &ActionGroup<C>,
    trailing: &ActionGroup<C>,
    settings: &Settings,
) -> bool {
    // Velocity doesn't matter for swipe-outs.
    matches!(
        resolve(offset, 0., leading, trailing, settings),
        Outcome::SwipeOut { .. }
    )
}
