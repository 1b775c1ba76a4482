//! Action buttons revealed by swiping a row.
//!
//! An [`ActionItem`] describes one button and an [`ActionGroup`] is the ordered set of buttons on
//! one side of a row. Both are plain data: the content type `C` is whatever the renderer uses to
//! draw a button, and the engine never looks inside it.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::utils::non_negative;

/// Side of the row an action group is revealed on.
///
/// Dragging the content towards positive offsets reveals the leading group, towards negative
/// offsets the trailing group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Leading,
    Trailing,
}

impl Side {
    /// Side revealed by an offset, if any.
    pub fn from_offset(offset: f64) -> Option<Self> {
        if offset > 0. {
            Some(Side::Leading)
        } else if offset < 0. {
            Some(Side::Trailing)
        } else {
            None
        }
    }

    /// Sign of the offsets revealing this side.
    pub fn sign(self) -> f64 {
        match self {
            Side::Leading => 1.,
            Side::Trailing => -1.,
        }
    }
}

/// Haptic feedback a renderer should play for an action.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HapticKind {
    #[default]
    None,
    Success,
    Warning,
    Error,
}

pub type ActionCallback = Rc<dyn Fn()>;

/// One action button.
pub struct ActionItem<C> {
    /// Button content.
    pub content: C,
    /// Alternate content shown while the item is armed for, or in the middle of, a swipe-out.
    pub swipe_out_content: Option<C>,
    /// Background drawn behind the content.
    pub background: Option<C>,
    /// Declared width in logical pixels.
    pub width: f64,
    /// Whether a full swipe past the group triggers this item.
    pub swipe_out: bool,
    /// Destructive swipe-outs leave the content at the row edge after firing.
    pub destructive: bool,
    pub haptic: HapticKind,
    on_trigger: ActionCallback,
}

impl<C> ActionItem<C> {
    /// Width used when none is specified.
    pub const DEFAULT_WIDTH: f64 = 75.;

    pub fn new(content: C, on_trigger: impl Fn() + 'static) -> Self {
        Self {
            content,
            swipe_out_content: None,
            background: None,
            width: Self::DEFAULT_WIDTH,
            swipe_out: false,
            destructive: false,
            haptic: HapticKind::None,
            on_trigger: Rc::new(on_trigger),
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_background(mut self, background: C) -> Self {
        self.background = Some(background);
        self
    }

    /// Makes this item the group's swipe-out action.
    pub fn swipe_out(mut self, content: Option<C>) -> Self {
        self.swipe_out = true;
        self.swipe_out_content = content;
        self
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    pub fn with_haptic(mut self, haptic: HapticKind) -> Self {
        self.haptic = haptic;
        self
    }

    /// Width clamped to a sane value.
    pub fn width(&self) -> f64 {
        non_negative(self.width)
    }

    pub fn trigger(&self) {
        (self.on_trigger)();
    }
}

impl<C: fmt::Debug> fmt::Debug for ActionItem<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionItem")
            .field("content", &self.content)
            .field("swipe_out_content", &self.swipe_out_content)
            .field("background", &self.background)
            .field("width", &self.width)
            .field("swipe_out", &self.swipe_out)
            .field("destructive", &self.destructive)
            .field("haptic", &self.haptic)
            .finish_non_exhaustive()
    }
}

/// Ordered action buttons on one side of a row.
#[derive(Debug)]
pub struct ActionGroup<C> {
    pub side: Side,
    pub items: Vec<ActionItem<C>>,
    /// Whether a full swipe may trigger the group's swipe-out item.
    pub swipe_out_enabled: bool,
}

impl<C> ActionGroup<C> {
    pub fn new(side: Side, items: Vec<ActionItem<C>>) -> Self {
        Self {
            side,
            items,
            swipe_out_enabled: true,
        }
    }

    pub fn empty(side: Side) -> Self {
        Self::new(side, Vec::new())
    }

    pub fn with_swipe_out_enabled(mut self, enabled: bool) -> Self {
        self.swipe_out_enabled = enabled;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Static reveal width: the sum of all item widths.
    pub fn width(&self) -> f64 {
        self.items.iter().map(ActionItem::width).sum()
    }

    /// Index of the primary swipe-out item.
    ///
    /// Only the first flagged item counts; any later ones behave like ordinary buttons.
    pub fn swipe_out_index(&self) -> Option<usize> {
        self.items.iter().position(|item| item.swipe_out)
    }

    /// Index of the swipe-out item if a full swipe may actually trigger it.
    pub fn swipe_out_target(&self) -> Option<usize> {
        if self.swipe_out_enabled {
            self.swipe_out_index()
        } else {
            None
        }
    }

    /// Lays out the items for a reveal distance.
    ///
    /// Up to the static width every item is scaled proportionally. Past it, the swipe-out item
    /// stretches to cover the extra distance while the others keep their width; without a
    /// swipe-out item the overshoot is shared proportionally. Returned frames start at 0 and
    /// always add up to `distance`.
    pub fn layout(&self, distance: f64) -> Vec<(usize, f64, f64)> {
        let distance = non_negative(distance);
        let total = self.width();

        if self.items.is_empty() || distance == 0. {
            return Vec::new();
        }

        let stretch = self.swipe_out_index().filter(|_| distance > total);
        let width_of_others = stretch.map_or(0., |idx| total - self.items[idx].width());

        let mut x = 0.;
        let mut frames = Vec::with_capacity(self.items.len());
        for (idx, item) in self.items.iter().enumerate() {
            let width = if stretch == Some(idx) {
                f64::max(0., distance - width_of_others)
            } else if stretch.is_some() {
                item.width()
            } else if total > 0. {
                item.width() * distance / total
            } else {
                // All items are zero-width: share the distance evenly.
                distance / self.items.len() as f64
            };

            frames.push((idx, x, width));
            x += width;
        }

        frames
    }
}

/// Placement of one revealed button, in row-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ButtonFrame {
    pub side: Side,
    pub index: usize,
    pub x: f64,
    pub width: f64,
    /// Whether the renderer should draw the item's swipe-out content.
    pub swipe_out_visual: bool,
}
