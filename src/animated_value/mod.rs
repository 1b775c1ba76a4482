//! Animated value abstraction for the row offset.
//!
//! The horizontal offset of a row's content is either static, animating toward a target, or
//! controlled by an ongoing drag.

use crate::animation::Animation;

mod gesture;
pub use gesture::DragGesture;

/// A value that can be static, animating, or gesture-controlled.
#[derive(Debug)]
pub enum AnimatedValue {
    /// The value is static.
    Static(f64),
    /// The value is animating toward a target.
    Animation(Animation),
    /// The value is controlled by an ongoing drag.
    Gesture(DragGesture),
}

impl AnimatedValue {
    /// Creates a new static value.
    pub fn new(value: f64) -> Self {
        Self::Static(value)
    }

    /// Returns the current value.
    pub fn current(&self) -> f64 {
        match self {
            AnimatedValue::Static(offset) => *offset,
            AnimatedValue::Animation(anim) => anim.value(),
            AnimatedValue::Gesture(gesture) => gesture.current_offset,
        }
    }

    /// Returns the value the row is heading to.
    pub fn target(&self) -> f64 {
        match self {
            AnimatedValue::Static(offset) => *offset,
            AnimatedValue::Animation(anim) => anim.to(),
            // This can be used for example if a gesture is interrupted.
            AnimatedValue::Gesture(gesture) => gesture.current_offset,
        }
    }

    /// Returns the rest value, ignoring any in-progress animation or gesture.
    pub fn stationary(&self) -> f64 {
        match self {
            AnimatedValue::Static(offset) => *offset,
            // For animations we can return the final value.
            AnimatedValue::Animation(anim) => anim.to(),
            AnimatedValue::Gesture(gesture) => gesture.start_offset,
        }
    }

    /// Returns `true` if the value is static.
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }

    /// Returns `true` if the value is controlled by a gesture.
    pub fn is_gesture(&self) -> bool {
        matches!(self, Self::Gesture(_))
    }

    /// Returns `true` if an animation is currently ongoing.
    pub fn is_animation_ongoing(&self) -> bool {
        matches!(self, Self::Animation(_))
    }
}
