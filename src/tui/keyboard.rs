//! # Terminal Keyboard
//!
//! A terminal has no on-screen keyboard, so this module plays the OS part:
//! focusing the composer slides a keyboard surface up from the bottom of the
//! screen, dismissing it slides it away. It reports what a mobile OS would
//! report, including the will-show / will-hide phases and the animation
//! duration, through [`KeyboardObserver`].
//!
//! ```text
//!   Hidden ──show──▶ Showing ──(duration)──▶ Visible
//!     ▲                 │                       │
//!     │               hide                    hide
//!     │                 ▼                       ▼
//!     └─────────────────────────(duration)── Hiding
//! ```
//!
//! `keyboard_visible` stays true while hiding, like the OS's did-hide event
//! arriving after will-hide.

use std::time::{Duration, Instant};

use log::debug;

use crate::core::keyboard::{KeyboardObserver, KeyboardState};

/// Rows above the messaging container (the status bar).
pub const STATUS_BAR_HEIGHT: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Hidden,
    Showing,
    Visible,
    Hiding,
}

pub struct TerminalKeyboard {
    height: u16,
    animation: Duration,
    phase: Phase,
    phase_started: Instant,
    screen_height: u16,
    /// The OS only reports a height once the keyboard has been shown.
    height_known: bool,
}

impl TerminalKeyboard {
    pub fn new(height: u16, animation: Duration, screen_height: u16, now: Instant) -> Self {
        Self {
            height,
            animation,
            phase: Phase::Hidden,
            phase_started: now,
            screen_height,
            height_known: false,
        }
    }

    /// Returns true if the keyboard started to appear.
    pub fn show(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Hidden => {
                self.height_known = true;
                self.enter(Phase::Showing, now);
                true
            }
            // Still on screen; reverse without a hidden frame in between.
            Phase::Hiding => {
                self.enter(Phase::Visible, now);
                true
            }
            Phase::Showing | Phase::Visible => false,
        }
    }

    /// Returns true if the keyboard started to go away.
    pub fn hide(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Visible => {
                self.enter(Phase::Hiding, now);
                true
            }
            // Never became visible; cancel the show outright.
            Phase::Showing => {
                self.enter(Phase::Hidden, now);
                true
            }
            Phase::Hidden | Phase::Hiding => false,
        }
    }

    /// Advance show/hide phases. Returns true if the phase changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.phase_started) < self.animation {
            return false;
        }
        match self.phase {
            Phase::Showing => {
                self.enter(Phase::Visible, now);
                true
            }
            Phase::Hiding => {
                self.enter(Phase::Hidden, now);
                true
            }
            Phase::Hidden | Phase::Visible => false,
        }
    }

    /// Returns true if the height changed.
    pub fn set_screen_height(&mut self, screen_height: u16) -> bool {
        let changed = self.screen_height != screen_height;
        self.screen_height = screen_height;
        changed
    }

    /// Showing or shown: the composer has focus.
    pub fn is_up(&self) -> bool {
        matches!(self.phase, Phase::Showing | Phase::Visible)
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Showing | Phase::Hiding)
    }

    fn enter(&mut self, phase: Phase, now: Instant) {
        debug!("Terminal keyboard {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_started = now;
    }
}

impl KeyboardObserver for TerminalKeyboard {
    fn keyboard_state(&self) -> KeyboardState {
        let container_height = self.screen_height.saturating_sub(STATUS_BAR_HEIGHT);
        let keyboard_height = if self.height_known { self.height } else { 0 };
        KeyboardState {
            container_height: f64::from(container_height),
            content_height: f64::from(container_height.saturating_sub(self.height)),
            keyboard_height: f64::from(keyboard_height),
            keyboard_visible: matches!(self.phase, Phase::Visible | Phase::Hiding),
            keyboard_will_show: self.phase == Phase::Showing,
            keyboard_will_hide: self.phase == Phase::Hiding,
            keyboard_animation_duration: self.animation.as_secs_f64() * 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANIM: Duration = Duration::from_millis(200);

    fn keyboard(now: Instant) -> TerminalKeyboard {
        TerminalKeyboard::new(8, ANIM, 24, now)
    }

    #[test]
    fn starts_hidden_with_unknown_height() {
        let now = Instant::now();
        let state = keyboard(now).keyboard_state();
        assert!(!state.keyboard_visible);
        assert!(!state.keyboard_will_show);
        assert_eq!(state.keyboard_height, 0.0);
        assert_eq!(state.container_height, 23.0);
        assert_eq!(state.content_height, 15.0);
        assert_eq!(state.keyboard_animation_duration, 200.0);
    }

    #[test]
    fn show_reports_will_show_then_visible() {
        let now = Instant::now();
        let mut kb = keyboard(now);
        assert!(kb.show(now));
        let state = kb.keyboard_state();
        assert!(state.keyboard_will_show);
        assert!(!state.keyboard_visible);
        assert_eq!(state.keyboard_height, 8.0);
        assert!(kb.is_up());

        assert!(!kb.tick(now + Duration::from_millis(100)));
        assert!(kb.tick(now + ANIM));
        let state = kb.keyboard_state();
        assert!(state.keyboard_visible);
        assert!(!state.keyboard_will_show);
        assert!(!kb.is_animating());
    }

    #[test]
    fn hide_keeps_visible_until_done() {
        let now = Instant::now();
        let mut kb = keyboard(now);
        kb.show(now);
        kb.tick(now + ANIM);

        let later = now + ANIM;
        assert!(kb.hide(later));
        let state = kb.keyboard_state();
        assert!(state.keyboard_visible);
        assert!(state.keyboard_will_hide);
        assert!(!kb.is_up());

        assert!(kb.tick(later + ANIM));
        assert!(!kb.keyboard_state().keyboard_visible);
    }

    #[test]
    fn hide_while_showing_cancels() {
        let now = Instant::now();
        let mut kb = keyboard(now);
        kb.show(now);
        assert!(kb.hide(now));
        let state = kb.keyboard_state();
        assert!(!state.keyboard_visible);
        assert!(!state.keyboard_will_show);
        assert!(!state.keyboard_will_hide);
    }

    #[test]
    fn show_while_hiding_snaps_back_to_visible() {
        let now = Instant::now();
        let mut kb = keyboard(now);
        kb.show(now);
        kb.tick(now + ANIM);
        kb.hide(now + ANIM);
        assert!(kb.show(now + ANIM));
        let state = kb.keyboard_state();
        assert!(state.keyboard_visible);
        assert!(!state.keyboard_will_hide);
    }

    #[test]
    fn repeated_show_and_hide_are_noops() {
        let now = Instant::now();
        let mut kb = keyboard(now);
        assert!(!kb.hide(now));
        kb.show(now);
        assert!(!kb.show(now));
    }

    #[test]
    fn screen_resize_changes_container() {
        let now = Instant::now();
        let mut kb = keyboard(now);
        assert!(kb.set_screen_height(40));
        assert!(!kb.set_screen_height(40));
        assert_eq!(kb.keyboard_state().container_height, 39.0);
    }
}
