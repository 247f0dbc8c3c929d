//! # Keyboard Observer
//!
//! The coordinator does not watch the keyboard itself. Something else (the
//! OS, or in a terminal an emulator in the `tui` adapter) reports a
//! [`KeyboardState`] snapshot through the [`KeyboardObserver`] capability.
//!
//! All seven fields are required on every update. Heights are in layout
//! units (terminal rows here); the animation duration is in milliseconds.

use std::fmt;
use std::time::Duration;

/// One snapshot of the system keyboard and the surrounding layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyboardState {
    /// Height available to the container when no keyboard is up.
    pub container_height: f64,
    /// Height available to the container while the keyboard is up.
    pub content_height: f64,
    /// Last reported keyboard height. Zero until the keyboard has been shown once.
    pub keyboard_height: f64,
    pub keyboard_visible: bool,
    pub keyboard_will_show: bool,
    pub keyboard_will_hide: bool,
    /// Duration of the keyboard's own show/hide animation, in milliseconds.
    pub keyboard_animation_duration: f64,
}

impl KeyboardState {
    /// Reject negative or non-finite measurements, and durations too large
    /// for a `Duration`.
    pub fn validate(&self) -> Result<(), InvalidMeasurement> {
        let fields = [
            ("container_height", self.container_height),
            ("content_height", self.content_height),
            ("keyboard_height", self.keyboard_height),
            (
                "keyboard_animation_duration",
                self.keyboard_animation_duration,
            ),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidMeasurement { field, value });
            }
        }
        if Duration::try_from_secs_f64(self.keyboard_animation_duration / 1000.0).is_err() {
            return Err(InvalidMeasurement {
                field: "keyboard_animation_duration",
                value: self.keyboard_animation_duration,
            });
        }
        Ok(())
    }

    /// The animation duration as a `Duration`. Zero if it does not validate.
    pub fn animation_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.keyboard_animation_duration / 1000.0).unwrap_or(Duration::ZERO)
    }
}

/// Source of keyboard snapshots.
pub trait KeyboardObserver {
    fn keyboard_state(&self) -> KeyboardState;
}

impl KeyboardObserver for KeyboardState {
    fn keyboard_state(&self) -> KeyboardState {
        *self
    }
}

/// A measurement the coordinator refused. The previous state is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidMeasurement {
    pub field: &'static str,
    pub value: f64,
}

impl fmt::Display for InvalidMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid measurement: {} = {}", self.field, self.value)
    }
}

impl std::error::Error for InvalidMeasurement {}
