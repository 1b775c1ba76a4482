//! Time-driven animations for row offsets.

use std::time::Duration;

use keyframe::functions::{EaseOutCubic, EaseOutQuad};
use keyframe::EasingFunction;

mod clock;
mod spring;

pub use self::clock::Clock;
pub use self::spring::{Spring, SpringParams};

/// Springs that take longer than this to settle are cut short.
const MAX_SPRING_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Animation {
    from: f64,
    to: f64,
    initial_velocity: f64,
    is_off: bool,
    duration: Duration,
    start_time: Duration,
    clock: Clock,
    kind: Kind,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Easing { curve: Curve },
    Spring(Spring),
}

#[derive(Debug, Clone, Copy)]
pub enum Curve {
    Linear,
    EaseOutQuad,
    EaseOutCubic,
    EaseOutExpo,
}

impl Animation {
    pub fn new(
        clock: Clock,
        from: f64,
        to: f64,
        initial_velocity: f64,
        config: swipecell_config::Animation,
    ) -> Self {
        // Placeholder kind, replaced right below.
        let mut rv = Self::ease(clock, from, to, initial_velocity, 0, Curve::EaseOutCubic);
        if config.off {
            rv.is_off = true;
            return rv;
        }

        rv.replace_config(config);
        rv
    }

    pub fn replace_config(&mut self, config: swipecell_config::Animation) {
        self.is_off = config.off;
        if config.off {
            self.duration = Duration::ZERO;
            return;
        }

        let start_time = self.start_time;

        match config.kind {
            swipecell_config::AnimationKind::Spring(p) => {
                let params = SpringParams::new(p.damping_ratio, f64::from(p.stiffness), p.epsilon);

                let spring = Spring {
                    from: self.from,
                    to: self.to,
                    initial_velocity: self.initial_velocity,
                    params,
                };
                *self = Self::spring(self.clock.clone(), spring);
            }
            swipecell_config::AnimationKind::Easing(p) => {
                *self = Self::ease(
                    self.clock.clone(),
                    self.from,
                    self.to,
                    self.initial_velocity,
                    u64::from(p.duration_ms),
                    Curve::from(p.curve),
                );
            }
        }

        self.start_time = start_time;
    }

    pub fn ease(
        clock: Clock,
        from: f64,
        to: f64,
        initial_velocity: f64,
        duration_ms: u64,
        curve: Curve,
    ) -> Self {
        let start_time = clock.now();

        Self {
            from,
            to,
            initial_velocity,
            is_off: false,
            duration: Duration::from_millis(duration_ms),
            start_time,
            clock,
            kind: Kind::Easing { curve },
        }
    }

    pub fn spring(clock: Clock, spring: Spring) -> Self {
        let start_time = clock.now();
        let duration = spring.duration().min(MAX_SPRING_DURATION);

        Self {
            from: spring.from,
            to: spring.to,
            initial_velocity: spring.initial_velocity,
            is_off: false,
            duration,
            start_time,
            clock,
            kind: Kind::Spring(spring),
        }
    }

    pub fn is_done(&self) -> bool {
        if self.clock.should_complete_instantly() {
            return true;
        }

        self.clock.now() >= self.end_time()
    }

    pub fn value(&self) -> f64 {
        if self.is_done() {
            return self.to;
        }

        let passed = self.clock.now().saturating_sub(self.start_time);

        match self.kind {
            Kind::Easing { curve } => {
                let passed = passed.as_secs_f64();
                let total = self.duration.as_secs_f64();
                let x = (passed / total).clamp(0., 1.);
                curve.y(x) * (self.to - self.from) + self.from
            }
            Kind::Spring(spring) => spring.value_at(passed),
        }
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn end_time(&self) -> Duration {
        self.start_time.saturating_add(self.duration)
    }
}

impl Curve {
    pub fn y(self, x: f64) -> f64 {
        match self {
            Curve::Linear => x,
            Curve::EaseOutQuad => EaseOutQuad.y(x),
            Curve::EaseOutCubic => EaseOutCubic.y(x),
            Curve::EaseOutExpo => 1. - 2f64.powf(-10. * x),
        }
    }
}

impl From<swipecell_config::AnimationCurve> for Curve {
    fn from(value: swipecell_config::AnimationCurve) -> Self {
        match value {
            swipecell_config::AnimationCurve::Linear => Curve::Linear,
            swipecell_config::AnimationCurve::EaseOutQuad => Curve::EaseOutQuad,
            swipecell_config::AnimationCurve::EaseOutCubic => Curve::EaseOutCubic,
            swipecell_config::AnimationCurve::EaseOutExpo => Curve::EaseOutExpo,
        }
    }
}
