use std::str::FromStr;

use miette::miette;

use crate::FloatOrInt;

/// Animation applied to a single kind of row transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub off: bool,
    pub kind: AnimationKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationKind {
    Easing(EasingParams),
    Spring(SpringParams),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasingParams {
    pub duration_ms: u32,
    pub curve: AnimationCurve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCurve {
    Linear,
    EaseOutQuad,
    EaseOutCubic,
    EaseOutExpo,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub damping_ratio: f64,
    pub stiffness: u32,
    pub epsilon: f64,
}

/// Animations used by a swipeable row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animations {
    /// Disables every animation; rows jump straight to their resolved offset.
    pub off: bool,
    /// Snapping to open or closed after a drag, and collapsing a force-closed row.
    pub settle: Animation,
    /// Sliding the content off the row edge before a swipe-out action fires.
    pub swipe_out: Animation,
}

impl Default for Animations {
    fn default() -> Self {
        Self {
            off: false,
            settle: Animation::default_settle(),
            swipe_out: Animation::default_swipe_out(),
        }
    }
}

impl Animation {
    pub const fn default_settle() -> Self {
        Self {
            off: false,
            kind: AnimationKind::Spring(SpringParams {
                damping_ratio: 1.,
                stiffness: 800,
                epsilon: 0.0001,
            }),
        }
    }

    pub const fn default_swipe_out() -> Self {
        Self {
            off: false,
            kind: AnimationKind::Easing(EasingParams {
                duration_ms: 250,
                curve: AnimationCurve::EaseOutCubic,
            }),
        }
    }
}

impl FromStr for AnimationCurve {
    type Err = miette::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "ease-out-quad" => Ok(Self::EaseOutQuad),
            "ease-out-cubic" => Ok(Self::EaseOutCubic),
            "ease-out-expo" => Ok(Self::EaseOutExpo),
            _ => Err(miette!(
                "unknown curve `{s}`, expected one of linear, ease-out-quad, ease-out-cubic, \
                 ease-out-expo"
            )),
        }
    }
}

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub(crate) struct AnimationsPart {
    #[knuffel(child)]
    pub off: bool,
    #[knuffel(child)]
    pub settle: Option<AnimationPart>,
    #[knuffel(child)]
    pub swipe_out: Option<AnimationPart>,
}

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub(crate) struct AnimationPart {
    #[knuffel(child)]
    pub off: bool,
    #[knuffel(child)]
    pub spring: Option<SpringPart>,
    #[knuffel(child, unwrap(argument))]
    pub duration_ms: Option<u32>,
    #[knuffel(child, unwrap(argument))]
    pub curve: Option<String>,
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub(crate) struct SpringPart {
    #[knuffel(property)]
    pub damping_ratio: FloatOrInt<0, 10>,
    #[knuffel(property)]
    pub stiffness: u32,
    #[knuffel(property)]
    pub epsilon: FloatOrInt<0, 1>,
}

impl AnimationsPart {
    pub(crate) fn resolve(self) -> miette::Result<Animations> {
        let defaults = Animations::default();
        Ok(Animations {
            off: self.off,
            settle: resolve_animation(self.settle, defaults.settle)?,
            swipe_out: resolve_animation(self.swipe_out, defaults.swipe_out)?,
        })
    }
}

fn resolve_animation(part: Option<AnimationPart>, default: Animation) -> miette::Result<Animation> {
    let Some(part) = part else {
        return Ok(default);
    };

    if part.spring.is_some() && (part.duration_ms.is_some() || part.curve.is_some()) {
        return Err(miette!(
            "an animation cannot set both `spring` and easing parameters"
        ));
    }

    let kind = if let Some(spring) = part.spring {
        if spring.epsilon.0 <= 0. {
            return Err(miette!("spring epsilon must be greater than 0"));
        }
        if spring.damping_ratio.0 <= 0. {
            return Err(miette!("spring damping-ratio must be greater than 0"));
        }
        if spring.stiffness == 0 {
            return Err(miette!("spring stiffness must be greater than 0"));
        }

        AnimationKind::Spring(SpringParams {
            damping_ratio: spring.damping_ratio.0,
            stiffness: spring.stiffness,
            epsilon: spring.epsilon.0,
        })
    } else if part.duration_ms.is_some() || part.curve.is_some() {
        // Missing easing fields fall back to the default easing.
        let base = match default.kind {
            AnimationKind::Easing(params) => params,
            AnimationKind::Spring(_) => EasingParams {
                duration_ms: 250,
                curve: AnimationCurve::EaseOutCubic,
            },
        };

        let curve = match part.curve {
            Some(curve) => curve.parse()?,
            None => base.curve,
        };

        AnimationKind::Easing(EasingParams {
            duration_ms: part.duration_ms.unwrap_or(base.duration_ms),
            curve,
        })
    } else {
        default.kind
    };

    Ok(Animation {
        off: part.off,
        kind,
    })
}
