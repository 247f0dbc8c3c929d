//! # Layout Animation
//!
//! The coordinator emits a [`LayoutAnimation`] for every change. The host
//! keeps one [`Tween`] per animated height and retargets it from wherever it
//! currently is, so a new animation supersedes an in-flight one instead of
//! waiting for it.
//!
//! Time is always passed in. Nothing here reads a clock.

use std::time::{Duration, Instant};

use crate::Platform;

/// Easing applied to a layout animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCurve {
    /// Matches the system keyboard's own motion (fast start, long settle).
    Keyboard,
    EaseInEaseOut,
}

impl AnimationCurve {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Ios => AnimationCurve::Keyboard,
            Platform::Android => AnimationCurve::EaseInEaseOut,
        }
    }

    /// Map linear progress in [0, 1] to eased progress in [0, 1].
    pub fn ease(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            AnimationCurve::Keyboard => 1.0 - (1.0 - t).powi(3),
            AnimationCurve::EaseInEaseOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutAnimation {
    pub duration: Duration,
    pub curve: AnimationCurve,
}

impl LayoutAnimation {
    pub fn new(duration: Duration, curve: AnimationCurve) -> Self {
        Self { duration, curve }
    }

    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, AnimationCurve::EaseInEaseOut)
    }
}

/// A single animated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    started: Instant,
    animation: LayoutAnimation,
}

impl Tween {
    /// A tween already resting at `value`.
    pub fn at_rest(value: f64, now: Instant) -> Self {
        Self {
            from: value,
            to: value,
            started: now,
            animation: LayoutAnimation::immediate(),
        }
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        let total = self.animation.duration.as_secs_f64();
        if total <= 0.0 {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let progress = self.animation.curve.ease(elapsed / total);
        self.from + (self.to - self.from) * progress
    }

    /// Start moving toward `to` from the current interpolated value.
    pub fn retarget(&mut self, to: f64, animation: LayoutAnimation, now: Instant) {
        self.from = self.value_at(now);
        self.to = to;
        self.started = now;
        self.animation = animation;
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.animation.duration
    }
}
