//! # Input Method Coordinator
//!
//! Decides what occupies the bottom of the screen: nothing, the system
//! keyboard, or the app's custom panel (emoji picker). Three kinds of input
//! arrive independently and are reconciled here:
//!
//! ```text
//!  keyboard observer ──┐
//!  caller intent ──────┼──▶ InputMethodCoordinator ──▶ InputMethod + InputLayout
//!  back navigation ────┘                           └─▶ LayoutAnimation
//! ```
//!
//! ## Transitions
//!
//! | Event                                   | Result                      |
//! |-----------------------------------------|-----------------------------|
//! | keyboard hidden → visible               | `Keyboard`, from any state  |
//! | keyboard visible → hidden, not `Custom` | `None`                      |
//! | keyboard visible → hidden, `Custom`     | stays `Custom`              |
//! | custom panel requested                  | `Custom` (host dismisses kb)|
//! | back while `Custom`                     | `None`, consumed            |
//! | back otherwise                          | unchanged, not consumed     |
//!
//! The coordinator is the only writer of `input_method`. Every accepted
//! change queues a [`LayoutAnimation`] timed to the keyboard's own
//! animation; the host drains it with [`take_layout_animation`].
//!
//! [`take_layout_animation`]: InputMethodCoordinator::take_layout_animation

use std::fmt;

use log::{debug, info, warn};

use crate::Platform;
use crate::core::animation::{AnimationCurve, LayoutAnimation};
use crate::core::back_handler::{BackHandler, ListenerId};
use crate::core::keyboard::{InvalidMeasurement, KeyboardObserver, KeyboardState};

/// Which surface occupies the bottom input region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMethod {
    #[default]
    None,
    Keyboard,
    Custom,
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputMethod::None => "none",
            InputMethod::Keyboard => "keyboard",
            InputMethod::Custom => "custom",
        })
    }
}

/// Outcome of a hardware back event offered to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackPress {
    /// The custom panel was closed. Default back handling must not run.
    Consumed,
    NotConsumed,
}

impl BackPress {
    pub fn is_consumed(self) -> bool {
        self == BackPress::Consumed
    }
}

/// What the host must do after asking for the custom panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardDismissal {
    /// The system keyboard was up; the host has to dismiss it.
    Required,
    NotNeeded,
}

/// Layout-relevant constants that vary by device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorConfig {
    pub platform: Platform,
    /// Device has an intrusive bottom safe area (home indicator).
    pub home_indicator: bool,
    /// Custom panel height when the keyboard height is not known yet.
    pub fallback_custom_height: f64,
    /// Extra top inset for the custom region on home-indicator devices.
    pub home_indicator_inset: f64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            home_indicator: false,
            fallback_custom_height: 10.0,
            home_indicator_inset: 1.0,
        }
    }
}

/// Sizes for the hosting layout, derived from state and measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLayout {
    pub use_content_height: bool,
    pub show_custom_input: bool,
    /// Height of the container holding content and the custom region.
    pub container_height: f64,
    /// Height of the custom input region (zero unless shown).
    pub custom_input_height: f64,
    /// Top inset of the custom input region.
    pub custom_input_top_inset: f64,
}

pub struct InputMethodCoordinator {
    input_method: InputMethod,
    keyboard: KeyboardState,
    config: CoordinatorConfig,
    pending_animation: Option<LayoutAnimation>,
    back_listener: Option<ListenerId>,
}

impl InputMethodCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            input_method: InputMethod::None,
            keyboard: KeyboardState::default(),
            config,
            pending_animation: None,
            back_listener: None,
        }
    }

    pub fn input_method(&self) -> InputMethod {
        self.input_method
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    /// Register the back listener. Call once when the coordinator becomes active.
    pub fn mount(&mut self, back_handler: &mut BackHandler<InputMethodCoordinator>) {
        if self.back_listener.is_some() {
            warn!("Input method coordinator mounted twice; keeping existing back listener");
            return;
        }
        let id = back_handler.add_listener(|coordinator| coordinator.handle_back().is_consumed());
        self.back_listener = Some(id);
        info!("Input method coordinator mounted");
    }

    /// Remove the back listener. Call when the coordinator is torn down.
    pub fn unmount(&mut self, back_handler: &mut BackHandler<InputMethodCoordinator>) {
        if let Some(id) = self.back_listener.take() {
            back_handler.remove_listener(id);
            info!("Input method coordinator unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.back_listener.is_some()
    }

    /// Accept a new keyboard snapshot.
    ///
    /// Invalid measurements are rejected whole: nothing changes and no
    /// animation is queued.
    pub fn on_keyboard_update(&mut self, next: KeyboardState) -> Result<InputMethod, InvalidMeasurement> {
        if let Err(e) = next.validate() {
            warn!("Ignoring keyboard update: {}", e);
            return Err(e);
        }

        let previous = self.keyboard;
        self.keyboard = next;

        if !previous.keyboard_visible && next.keyboard_visible {
            self.set_input_method(InputMethod::Keyboard, "keyboard shown");
        } else if previous.keyboard_visible
            && !next.keyboard_visible
            && self.input_method != InputMethod::Custom
        {
            self.set_input_method(InputMethod::None, "keyboard hidden");
        }

        if previous != next {
            self.queue_animation();
        }
        Ok(self.input_method)
    }

    /// Pull the latest snapshot from an observer.
    pub fn sync(&mut self, observer: &impl KeyboardObserver) -> Result<InputMethod, InvalidMeasurement> {
        self.on_keyboard_update(observer.keyboard_state())
    }

    /// Host-driven change (`onChangeInputMethod`).
    pub fn change_input_method(&mut self, next: InputMethod) {
        self.set_input_method(next, "requested");
    }

    /// Switch to the custom panel. If the keyboard is up the host must
    /// dismiss it; the coordinator only records the new state.
    pub fn request_custom(&mut self) -> KeyboardDismissal {
        let keyboard_up = self.keyboard.keyboard_visible || self.keyboard.keyboard_will_show;
        self.set_input_method(InputMethod::Custom, "custom panel requested");
        if keyboard_up {
            KeyboardDismissal::Required
        } else {
            KeyboardDismissal::NotNeeded
        }
    }

    /// Hardware back. Closes the custom panel if it is open.
    pub fn handle_back(&mut self) -> BackPress {
        if self.input_method == InputMethod::Custom {
            self.set_input_method(InputMethod::None, "back navigation");
            BackPress::Consumed
        } else {
            BackPress::NotConsumed
        }
    }

    pub fn layout(&self) -> InputLayout {
        let kb = &self.keyboard;
        let use_content_height = kb.keyboard_will_show || self.input_method == InputMethod::Keyboard;
        let show_custom_input = self.input_method == InputMethod::Custom && !kb.keyboard_will_show;
        let keyboard_is_hidden = self.input_method == InputMethod::None && !kb.keyboard_will_show;
        let keyboard_is_hiding = self.input_method == InputMethod::Keyboard && kb.keyboard_will_hide;

        let container_height = if use_content_height {
            kb.content_height
        } else {
            kb.container_height
        };

        let custom_input_height = if !show_custom_input {
            0.0
        } else if kb.keyboard_height > 0.0 {
            kb.keyboard_height
        } else {
            self.config.fallback_custom_height
        };

        let custom_input_top_inset =
            if self.config.home_indicator && (keyboard_is_hidden || keyboard_is_hiding) {
                self.config.home_indicator_inset
            } else {
                0.0
            };

        let layout = InputLayout {
            use_content_height,
            show_custom_input,
            container_height,
            custom_input_height,
            custom_input_top_inset,
        };
        debug!("Input layout for {}: {:?}", self.input_method, layout);
        layout
    }

    /// The most recent animation, if any change happened since the last call.
    /// A newer change always replaces an undrained one.
    pub fn take_layout_animation(&mut self) -> Option<LayoutAnimation> {
        self.pending_animation.take()
    }

    fn set_input_method(&mut self, next: InputMethod, cause: &str) {
        if self.input_method == next {
            return;
        }
        info!("Input method {} -> {} ({})", self.input_method, next, cause);
        self.input_method = next;
        self.queue_animation();
    }

    fn queue_animation(&mut self) {
        self.pending_animation = Some(LayoutAnimation::new(
            self.keyboard.animation_duration(),
            AnimationCurve::for_platform(self.config.platform),
        ));
    }
}

impl Drop for InputMethodCoordinator {
    fn drop(&mut self) {
        if let Some(id) = self.back_listener {
            warn!("Input method coordinator dropped while back listener {:?} is still registered", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn coordinator() -> InputMethodCoordinator {
        InputMethodCoordinator::new(CoordinatorConfig::default())
    }

    fn keyboard(visible: bool, will_show: bool, will_hide: bool) -> KeyboardState {
        KeyboardState {
            container_height: 40.0,
            content_height: 30.0,
            keyboard_height: 10.0,
            keyboard_visible: visible,
            keyboard_will_show: will_show,
            keyboard_will_hide: will_hide,
            keyboard_animation_duration: 250.0,
        }
    }

    fn hidden() -> KeyboardState {
        keyboard(false, false, false)
    }

    fn shown() -> KeyboardState {
        keyboard(true, false, false)
    }

    #[test]
    fn starts_with_nothing_shown() {
        let c = coordinator();
        assert_eq!(c.input_method(), InputMethod::None);
        assert!(!c.layout().show_custom_input);
    }

    #[test]
    fn keyboard_shown_wins_from_every_state() {
        for start in [InputMethod::None, InputMethod::Keyboard, InputMethod::Custom] {
            let mut c = coordinator();
            c.on_keyboard_update(hidden()).unwrap();
            c.change_input_method(start);
            c.on_keyboard_update(shown()).unwrap();
            assert_eq!(c.input_method(), InputMethod::Keyboard, "from {start}");
        }
    }

    #[test]
    fn keyboard_hidden_returns_to_none() {
        let mut c = coordinator();
        c.on_keyboard_update(shown()).unwrap();
        c.on_keyboard_update(hidden()).unwrap();
        assert_eq!(c.input_method(), InputMethod::None);
    }

    #[test]
    fn keyboard_hidden_while_custom_stays_custom() {
        let mut c = coordinator();
        c.on_keyboard_update(shown()).unwrap();
        assert_eq!(c.request_custom(), KeyboardDismissal::Required);
        c.on_keyboard_update(hidden()).unwrap();
        assert_eq!(c.input_method(), InputMethod::Custom);
    }

    #[test]
    fn request_custom_without_keyboard_needs_no_dismissal() {
        let mut c = coordinator();
        c.on_keyboard_update(hidden()).unwrap();
        assert_eq!(c.request_custom(), KeyboardDismissal::NotNeeded);
        assert_eq!(c.input_method(), InputMethod::Custom);
    }

    #[test]
    fn back_consumed_only_when_custom() {
        let mut c = coordinator();
        assert_eq!(c.handle_back(), BackPress::NotConsumed);
        assert_eq!(c.input_method(), InputMethod::None);

        c.on_keyboard_update(shown()).unwrap();
        assert_eq!(c.handle_back(), BackPress::NotConsumed);
        assert_eq!(c.input_method(), InputMethod::Keyboard);

        c.request_custom();
        assert_eq!(c.handle_back(), BackPress::Consumed);
        assert_eq!(c.input_method(), InputMethod::None);
    }

    #[test]
    fn invalid_measurement_keeps_previous_state() {
        let mut c = coordinator();
        c.on_keyboard_update(shown()).unwrap();
        c.take_layout_animation();
        let before = *c.keyboard();

        let bad = KeyboardState {
            keyboard_visible: false,
            content_height: -5.0,
            ..shown()
        };
        let err = c.on_keyboard_update(bad).unwrap_err();
        assert_eq!(err.field, "content_height");
        assert_eq!(c.input_method(), InputMethod::Keyboard);
        assert_eq!(*c.keyboard(), before);
        assert!(c.take_layout_animation().is_none());
    }

    #[test]
    fn negative_duration_rejected() {
        let mut c = coordinator();
        let bad = KeyboardState {
            keyboard_animation_duration: -1.0,
            ..shown()
        };
        assert!(c.on_keyboard_update(bad).is_err());
        assert_eq!(c.input_method(), InputMethod::None);
    }

    #[test]
    fn oversized_duration_rejected_without_panicking() {
        let mut c = coordinator();
        let bad = KeyboardState {
            keyboard_animation_duration: 1e30,
            ..shown()
        };
        let err = c.on_keyboard_update(bad).unwrap_err();
        assert_eq!(err.field, "keyboard_animation_duration");
        assert_eq!(c.input_method(), InputMethod::None);
        assert!(c.take_layout_animation().is_none());
    }

    #[test]
    fn layout_uses_content_height_while_keyboard_will_show() {
        let mut c = coordinator();
        c.on_keyboard_update(hidden()).unwrap();
        assert_eq!(c.layout().container_height, 40.0);

        c.on_keyboard_update(keyboard(false, true, false)).unwrap();
        let layout = c.layout();
        assert!(layout.use_content_height);
        assert_eq!(layout.container_height, 30.0);
        assert_eq!(c.input_method(), InputMethod::None);
    }

    #[test]
    fn custom_panel_takes_keyboard_height() {
        let mut c = coordinator();
        c.on_keyboard_update(hidden()).unwrap();
        c.request_custom();
        let layout = c.layout();
        assert!(layout.show_custom_input);
        assert!(!layout.use_content_height);
        assert_eq!(layout.container_height, 40.0);
        assert_eq!(layout.custom_input_height, 10.0);
    }

    #[test]
    fn custom_panel_falls_back_when_keyboard_height_unknown() {
        let mut c = coordinator();
        c.on_keyboard_update(KeyboardState {
            keyboard_height: 0.0,
            ..hidden()
        })
        .unwrap();
        c.request_custom();
        assert_eq!(
            c.layout().custom_input_height,
            CoordinatorConfig::default().fallback_custom_height
        );
    }

    #[test]
    fn custom_panel_hidden_while_keyboard_will_show() {
        let mut c = coordinator();
        c.on_keyboard_update(hidden()).unwrap();
        c.request_custom();
        c.on_keyboard_update(keyboard(false, true, false)).unwrap();
        let layout = c.layout();
        assert_eq!(c.input_method(), InputMethod::Custom);
        assert!(!layout.show_custom_input);
        assert_eq!(layout.custom_input_height, 0.0);
        assert!(layout.use_content_height);
    }

    #[test]
    fn home_indicator_inset_only_when_hidden_or_hiding() {
        let config = CoordinatorConfig {
            home_indicator: true,
            home_indicator_inset: 2.0,
            ..Default::default()
        };
        let mut c = InputMethodCoordinator::new(config);
        c.on_keyboard_update(hidden()).unwrap();
        assert_eq!(c.layout().custom_input_top_inset, 2.0);

        c.on_keyboard_update(shown()).unwrap();
        assert_eq!(c.layout().custom_input_top_inset, 0.0);

        c.on_keyboard_update(keyboard(true, false, true)).unwrap();
        assert_eq!(c.layout().custom_input_top_inset, 2.0);

        c.request_custom();
        assert_eq!(c.layout().custom_input_top_inset, 0.0);
    }

    #[test]
    fn no_inset_without_home_indicator() {
        let mut c = coordinator();
        c.on_keyboard_update(hidden()).unwrap();
        assert_eq!(c.layout().custom_input_top_inset, 0.0);
    }

    #[test]
    fn changes_queue_animation_matching_keyboard_duration() {
        let mut c = coordinator();
        c.on_keyboard_update(shown()).unwrap();
        let anim = c.take_layout_animation().unwrap();
        assert_eq!(anim.duration, Duration::from_millis(250));
        assert_eq!(anim.curve, AnimationCurve::for_platform(Platform::default()));
        assert!(c.take_layout_animation().is_none());

        c.request_custom();
        assert!(c.take_layout_animation().is_some());
    }

    #[test]
    fn android_uses_ease_in_ease_out() {
        let mut c = InputMethodCoordinator::new(CoordinatorConfig {
            platform: Platform::Android,
            ..Default::default()
        });
        c.on_keyboard_update(shown()).unwrap();
        assert_eq!(
            c.take_layout_animation().unwrap().curve,
            AnimationCurve::EaseInEaseOut
        );
    }

    #[test]
    fn unchanged_snapshot_queues_nothing() {
        let mut c = coordinator();
        c.on_keyboard_update(hidden()).unwrap();
        c.take_layout_animation();
        c.on_keyboard_update(hidden()).unwrap();
        assert!(c.take_layout_animation().is_none());
    }

    #[test]
    fn mount_registers_back_listener_and_unmount_removes_it() {
        let mut handler = BackHandler::new();
        let mut c = coordinator();
        c.mount(&mut handler);
        c.mount(&mut handler);
        assert_eq!(handler.listener_count(), 1);

        c.request_custom();
        assert!(handler.dispatch(&mut c));
        assert_eq!(c.input_method(), InputMethod::None);
        assert!(!handler.dispatch(&mut c));

        c.unmount(&mut handler);
        assert!(!c.is_mounted());
        assert_eq!(handler.listener_count(), 0);
    }

    #[derive(Debug, Clone)]
    enum Event {
        Keyboard(KeyboardState),
        RequestCustom,
        Back,
    }

    fn arb_keyboard() -> impl Strategy<Value = KeyboardState> {
        (
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            -5.0f64..50.0,
            prop_oneof![4 => 0.0f64..500.0, 1 => 1e20f64..1e30],
        )
            .prop_map(|(visible, will_show, will_hide, height, duration)| KeyboardState {
                container_height: 40.0,
                content_height: 30.0,
                keyboard_height: height,
                keyboard_visible: visible,
                keyboard_will_show: will_show,
                keyboard_will_hide: will_hide,
                keyboard_animation_duration: duration,
            })
    }

    fn arb_event() -> impl Strategy<Value = Event> {
        prop_oneof![
            3 => arb_keyboard().prop_map(Event::Keyboard),
            1 => Just(Event::RequestCustom),
            1 => Just(Event::Back),
        ]
    }

    proptest! {
        #[test]
        fn transitions_hold_for_any_event_sequence(events in prop::collection::vec(arb_event(), 1..60)) {
            let mut c = coordinator();
            for event in events {
                let before = c.input_method();
                let was_visible = c.keyboard().keyboard_visible;
                match event {
                    Event::Keyboard(next) => {
                        let accepted = c.on_keyboard_update(next).is_ok();
                        if !accepted {
                            prop_assert_eq!(c.input_method(), before);
                        } else if !was_visible && next.keyboard_visible {
                            prop_assert_eq!(c.input_method(), InputMethod::Keyboard);
                        } else if was_visible && !next.keyboard_visible {
                            let expected = if before == InputMethod::Custom {
                                InputMethod::Custom
                            } else {
                                InputMethod::None
                            };
                            prop_assert_eq!(c.input_method(), expected);
                        } else {
                            prop_assert_eq!(c.input_method(), before);
                        }
                    }
                    Event::RequestCustom => {
                        c.request_custom();
                        prop_assert_eq!(c.input_method(), InputMethod::Custom);
                    }
                    Event::Back => {
                        let consumed = c.handle_back().is_consumed();
                        prop_assert_eq!(consumed, before == InputMethod::Custom);
                        if consumed {
                            prop_assert_eq!(c.input_method(), InputMethod::None);
                        } else {
                            prop_assert_eq!(c.input_method(), before);
                        }
                    }
                }

                let layout = c.layout();
                prop_assert!(!(layout.show_custom_input && c.input_method() != InputMethod::Custom));
                prop_assert!(layout.custom_input_height >= 0.0);
                if !layout.show_custom_input {
                    prop_assert_eq!(layout.custom_input_height, 0.0);
                }
            }
        }
    }
}
