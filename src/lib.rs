//! Gesture engine for swipeable list rows.
//!
//! Each row of a list can reveal a group of action buttons on either side: drag the content
//! towards positive offsets for the leading group, towards negative offsets for the trailing one.
//! Released drags settle open or closed, and dragging far enough past a group triggers its
//! swipe-out action. At most one row of a list is open at a time.
//!
//! The engine draws nothing. Hosts feed it drag and tap events through a [`SwipeList`], read
//! offsets and button frames back for rendering, call [`SwipeList::advance_animations()`] every
//! frame and drain [`SwipeList::take_events()`] for haptics and triggered actions.
//!
//! ```
//! use std::time::Duration;
//!
//! use swipecell::{ActionGroup, ActionItem, Clock, Settings, Side, SwipeList};
//!
//! let mut list = SwipeList::new(Clock::with_time(Duration::ZERO));
//! let trailing = ActionGroup::new(
//!     Side::Trailing,
//!     vec![ActionItem::new("delete", || println!("deleted")).with_width(80.)],
//! );
//!
//! let mut row = list.attach(1, ActionGroup::empty(Side::Leading), trailing, Settings::default());
//! row.on_drag_change(-60., 320., Duration::ZERO);
//! row.on_drag_end(-60., None, 320., Duration::from_millis(50));
//! assert_eq!(row.state().unwrap().target_offset, -80.);
//! ```

pub mod action;
pub mod animated_value;
pub mod animation;
pub mod coordinator;
pub mod input;
pub mod list;
pub mod row;
pub mod utils;

pub use action::{ActionGroup, ActionItem, ButtonFrame, HapticKind, Side};
pub use animation::Clock;
pub use list::{RowBinding, SwipeEvent, SwipeList};
pub use row::{Phase, RowGestureState, SwipeRow};
pub use swipecell_config::Settings;
