//! Settings for swipeable list rows.
//!
//! Settings are plain values that callers usually construct in code, starting from
//! [`Settings::default()`]. They can also be read from a KDL document:
//!
//! ```kdl
//! add-width-margin 5
//! swipe-out-trigger-margin 40
//! animations {
//!     settle { spring damping-ratio=1.0 stiffness=800 epsilon=0.0001; }
//!     swipe-out { duration-ms 250; curve "ease-out-cubic"; }
//! }
//! ```

use std::path::Path;

use miette::{Context as _, IntoDiagnostic as _};

pub mod animations;
pub mod utils;

pub use animations::{
    Animation, AnimationCurve, AnimationKind, Animations, EasingParams, SpringParams,
};
use animations::AnimationsPart;
pub use utils::FloatOrInt;

/// Default extra distance past the full group width that confirms a swipe-out.
pub const DEFAULT_SWIPE_OUT_TRIGGER_MARGIN: f64 = 40.;

/// Default release velocity, in logical pixels per second, that counts as a fling.
pub const DEFAULT_FLING_VELOCITY: f64 = 600.;

/// Default distance a pointer may travel and still count as a tap.
pub const DEFAULT_TAP_SLOP: f64 = 4.;

/// Per-row behavior settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Extra overshoot allowed past the group width before the drag is clamped.
    pub add_width_margin: f64,
    /// Extra distance past the full group width required to confirm a swipe-out.
    pub swipe_out_trigger_margin: f64,
    /// Release velocity at which a short drag still opens (or, backwards, closes) the row.
    pub fling_velocity: f64,
    /// Movement below this distance doesn't start a drag.
    pub tap_slop: f64,
    /// Whether tapping an action button emits the item's haptic feedback.
    pub tap_haptics: bool,
    pub animations: Animations,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            add_width_margin: 0.,
            swipe_out_trigger_margin: DEFAULT_SWIPE_OUT_TRIGGER_MARGIN,
            fling_velocity: DEFAULT_FLING_VELOCITY,
            tap_slop: DEFAULT_TAP_SLOP,
            tap_haptics: false,
            animations: Animations::default(),
        }
    }
}

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
struct SettingsPart {
    #[knuffel(child, unwrap(argument))]
    add_width_margin: Option<FloatOrInt<0, 65535>>,
    #[knuffel(child, unwrap(argument))]
    swipe_out_trigger_margin: Option<FloatOrInt<0, 65535>>,
    #[knuffel(child, unwrap(argument))]
    fling_velocity: Option<FloatOrInt<0, 1000000>>,
    #[knuffel(child, unwrap(argument))]
    tap_slop: Option<FloatOrInt<0, 65535>>,
    #[knuffel(child)]
    tap_haptics: bool,
    #[knuffel(child, default)]
    animations: AnimationsPart,
}

impl Settings {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let _span = tracing::debug_span!("Settings::load").entered();

        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let settings = Self::parse(
            path.file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("swipecell.kdl"),
            &contents,
        )
        .context("error parsing")?;
        tracing::debug!("loaded settings from {path:?}");
        Ok(settings)
    }

    pub fn parse(filename: &str, text: &str) -> miette::Result<Self> {
        let part = knuffel::parse::<SettingsPart>(filename, text)?;
        let defaults = Self::default();

        Ok(Self {
            add_width_margin: part
                .add_width_margin
                .map_or(defaults.add_width_margin, |x| x.0),
            swipe_out_trigger_margin: part
                .swipe_out_trigger_margin
                .map_or(defaults.swipe_out_trigger_margin, |x| x.0),
            fling_velocity: part
                .fling_velocity
                .map_or(defaults.fling_velocity, |x| x.0),
            tap_slop: part.tap_slop.map_or(defaults.tap_slop, |x| x.0),
            tap_haptics: part.tap_haptics,
            animations: part.animations.resolve()?,
        })
    }
}
