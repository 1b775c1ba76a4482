use swipecell_config::{Animation, AnimationKind, Settings};

/// Clamps a caller-supplied length: negative, infinite and NaN values become 0.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.)
    } else {
        0.
    }
}

/// Returns a copy of the settings with every length clamped to a usable value.
pub fn sanitize_settings(settings: Settings) -> Settings {
    let mut animations = settings.animations;
    animations.settle = sanitize_animation(animations.settle, Animation::default_settle());
    animations.swipe_out = sanitize_animation(animations.swipe_out, Animation::default_swipe_out());

    Settings {
        add_width_margin: non_negative(settings.add_width_margin),
        swipe_out_trigger_margin: non_negative(settings.swipe_out_trigger_margin),
        fling_velocity: non_negative(settings.fling_velocity),
        tap_slop: non_negative(settings.tap_slop),
        animations,
        ..settings
    }
}

/// Replaces a spring that would never come to rest with the default kind.
fn sanitize_animation(animation: Animation, default: Animation) -> Animation {
    let AnimationKind::Spring(params) = animation.kind else {
        return animation;
    };

    let settles = params.damping_ratio.is_finite()
        && params.damping_ratio > 0.
        && params.stiffness > 0
        && params.epsilon.is_finite()
        && params.epsilon > 0.;
    if settles {
        return animation;
    }

    Animation {
        kind: default.kind,
        ..animation
    }
}
