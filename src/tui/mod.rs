//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! emulates the system keyboard, and translates terminal events into
//! core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Routing
//!
//! Ctrl+C always quits. While the delete dialog is open it takes all
//! input. Otherwise global shortcuts (Esc, Ctrl+E, Ctrl+P, Ctrl+L, scroll,
//! click) are handled first, then whichever surface owns the bottom of the
//! screen gets the rest:
//!
//! ```text
//! custom input shown  → emoji picker
//! keyboard up         → toolbar composer
//! neither             → message list (typing focuses the composer)
//! ```
//!
//! After every event the keyboard snapshot is pushed to the coordinator and
//! any layout animation it queued retargets the height tweens.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (keyboard sliding, tweens in flight): draws every ~16ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.

mod component;
mod components;
mod event;
pub mod keyboard;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::input_method::{InputLayout, InputMethod};
use crate::core::keyboard::KeyboardObserver;
use crate::core::state::{App, ButtonStyle};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ConfirmDialogState, DialogEvent, EmojiPickerState, LayoutTweens, MessageListState,
    PickerEvent, Toolbar, ToolbarEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::keyboard::{STATUS_BAR_HEIGHT, TerminalKeyboard};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub toolbar: Toolbar,
    pub emoji_picker: EmojiPickerState,
    pub confirm_dialog: ConfirmDialogState,
    pub keyboard: TerminalKeyboard,
    pub tweens: LayoutTweens,
}

impl TuiState {
    pub fn new(config: &ResolvedConfig, screen_height: u16, now: Instant) -> Self {
        Self::for_screen(
            config.keyboard_height,
            config.keyboard_animation_ms,
            screen_height,
            now,
        )
    }

    pub fn for_screen(keyboard_height: u16, animation_ms: u64, screen_height: u16, now: Instant) -> Self {
        let resting = InputLayout {
            use_content_height: false,
            show_custom_input: false,
            container_height: f64::from(screen_height.saturating_sub(STATUS_BAR_HEIGHT)),
            custom_input_height: 0.0,
            custom_input_top_inset: 0.0,
        };
        Self {
            message_list: MessageListState::new(),
            toolbar: Toolbar::new(),
            emoji_picker: EmojiPickerState::new(),
            confirm_dialog: ConfirmDialogState::new(),
            keyboard: TerminalKeyboard::new(
                keyboard_height,
                Duration::from_millis(animation_ms),
                screen_height,
                now,
            ),
            tweens: LayoutTweens::at_rest(&resting, now),
        }
    }

    /// Drain the coordinator's queued animation and retarget the tweens.
    /// With layout animations off, changes snap.
    pub fn sync_layout(&mut self, app: &mut App, now: Instant) {
        let animation = app.coordinator.take_layout_animation();
        let animation = if app.layout_animations { animation } else { None };
        self.tweens.follow(&app.coordinator.layout(), animation, now);
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::from_config(&config);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start = Instant::now();
    let mut tui = TuiState::new(&config, terminal.size()?.height, start);
    sync_keyboard(&mut app, &tui);
    tui.sync_layout(&mut app, start);

    let mut needs_redraw = true; // Force first frame

    loop {
        let now = Instant::now();
        if tui.keyboard.set_screen_height(terminal.size()?.height) {
            sync_keyboard(&mut app, &tui);
            tui.sync_layout(&mut app, now);
            needs_redraw = true;
        }
        if tick(&mut app, &mut tui, now) {
            needs_redraw = true;
        }

        let animating = tui.keyboard.is_animating() || !tui.tweens.is_settled(now);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, now))?;
            needs_redraw = false;
        }

        let timeout = if animating { FRAME_INTERVAL } else { IDLE_POLL };
        let mut next_event = poll_event_timeout(timeout)?;
        if next_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        while let Some(event) = next_event {
            if handle_event(&mut app, &mut tui, event, Instant::now()) {
                should_quit = true;
                break;
            }
            next_event = poll_event_immediate()?;
        }
        if should_quit {
            break;
        }
    }

    app.unmount();
    ratatui::restore();
    info!("Parley exited with {} messages", app.messages.len());
    Ok(())
}

/// Advance the emulated keyboard. Returns true if its phase changed.
pub fn tick(app: &mut App, tui: &mut TuiState, now: Instant) -> bool {
    if !tui.keyboard.tick(now) {
        return false;
    }
    sync_keyboard(app, tui);
    tui.sync_layout(app, now);
    true
}

fn sync_keyboard(app: &mut App, tui: &TuiState) {
    let snapshot = tui.keyboard.keyboard_state();
    if snapshot != *app.coordinator.keyboard() {
        update(app, Action::KeyboardChanged(snapshot));
    }
}

/// Route one event. Returns true if the app should quit.
pub fn handle_event(app: &mut App, tui: &mut TuiState, event: TuiEvent, now: Instant) -> bool {
    let quit = route_event(app, tui, event, now);
    sync_keyboard(app, tui);
    tui.sync_layout(app, now);
    quit
}

fn route_event(app: &mut App, tui: &mut TuiState, event: TuiEvent, now: Instant) -> bool {
    match event {
        TuiEvent::Resize => return false,
        TuiEvent::ForceQuit => return update(app, Action::Quit) == Effect::Quit,
        _ => {}
    }

    // The delete dialog is modal
    if app.pending_delete.is_some() {
        if let Some(DialogEvent::Chose(style)) = tui.confirm_dialog.handle_event(&event) {
            let action = match style {
                ButtonStyle::Destructive => Action::ConfirmDelete,
                ButtonStyle::Cancel => Action::CancelDelete,
            };
            update(app, action);
            tui.confirm_dialog.reset();
        }
        return false;
    }

    match event {
        TuiEvent::Back => return handle_back(app, tui, now),
        TuiEvent::ToggleCustomInput => {
            toggle_custom_input(app, tui, now);
            return false;
        }
        TuiEvent::SendImage => {
            send(app, tui, Action::SendImage);
            return false;
        }
        TuiEvent::SendLocation => {
            send(app, tui, Action::SendLocation);
            return false;
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::MouseClick(..) => {
            list_event(app, tui, &event);
            return false;
        }
        _ => {}
    }

    let typing = matches!(event, TuiEvent::InputChar(_) | TuiEvent::Paste(_));
    if app.coordinator.layout().show_custom_input && !typing {
        if let Some(PickerEvent::Picked(emoji)) = tui.emoji_picker.handle_event(&event) {
            send(app, tui, Action::SendText(emoji.to_string()));
        }
    } else if tui.keyboard.is_up() || typing {
        // Typing anywhere focuses the composer
        tui.keyboard.show(now);
        if let Some(ToolbarEvent::Submit(text)) = tui.toolbar.handle_event(&event) {
            send(app, tui, Action::SendText(text));
        }
    } else {
        list_event(app, tui, &event);
    }
    false
}

/// The OS keyboard takes back first, then the custom panel's listener,
/// then a list selection. If nobody consumes it, the default action exits.
fn handle_back(app: &mut App, tui: &mut TuiState, now: Instant) -> bool {
    if tui.keyboard.hide(now) {
        debug!("Back consumed by keyboard");
        return false;
    }
    if app.coordinator.input_method() != InputMethod::Custom
        && tui.message_list.selected.take().is_some()
    {
        return false;
    }
    matches!(
        update(app, Action::HardwareBack),
        Effect::DefaultBack | Effect::Quit
    )
}

fn toggle_custom_input(app: &mut App, tui: &mut TuiState, now: Instant) {
    if app.coordinator.input_method() == InputMethod::Custom {
        tui.keyboard.show(now);
    } else if update(app, Action::RequestCustomInput) == Effect::DismissKeyboard {
        tui.keyboard.hide(now);
    }
}

fn send(app: &mut App, tui: &mut TuiState, action: Action) {
    let before = app.messages.len();
    update(app, action);
    if app.messages.len() > before {
        tui.message_list.stick_to_bottom = true;
    }
}

fn list_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) {
    if let Some(message) = tui.message_list.handle_event(event, &app.messages) {
        let message = message.clone();
        update(app, Action::PressMessage(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::MessageKind;
    use crate::test_support::test_app_with_messages;

    const SCREEN: u16 = 24;

    /// Zero-length keyboard animation so one tick settles it.
    fn setup() -> (App, TuiState, Instant) {
        let now = Instant::now();
        let mut app = test_app_with_messages();
        let mut tui = TuiState::for_screen(8, 0, SCREEN, now);
        sync_keyboard(&mut app, &tui);
        tui.sync_layout(&mut app, now);
        (app, tui, now)
    }

    fn send_keys(app: &mut App, tui: &mut TuiState, now: Instant, events: Vec<TuiEvent>) -> bool {
        let mut quit = false;
        for event in events {
            quit |= handle_event(app, tui, event, now);
            tick(app, tui, now);
        }
        quit
    }

    #[test]
    fn typing_focuses_composer_and_enter_sends() {
        let (mut app, mut tui, now) = setup();
        send_keys(
            &mut app,
            &mut tui,
            now,
            vec![TuiEvent::InputChar('h'), TuiEvent::InputChar('i')],
        );
        assert!(tui.keyboard.is_up());
        assert_eq!(app.coordinator.input_method(), InputMethod::Keyboard);
        assert_eq!(tui.toolbar.buffer, "hi");

        send_keys(&mut app, &mut tui, now, vec![TuiEvent::Submit]);
        assert_eq!(app.messages.len(), 4);
        assert!(tui.toolbar.buffer.is_empty());
        assert!(tui.keyboard.is_up());
    }

    #[test]
    fn keyboard_shrinks_container() {
        let (mut app, mut tui, now) = setup();
        assert_eq!(tui.tweens.sample(now).container, SCREEN - 1);
        send_keys(&mut app, &mut tui, now, vec![TuiEvent::InputChar('x')]);
        assert_eq!(tui.tweens.sample(now).container, SCREEN - 1 - 8);
    }

    #[test]
    fn toggle_custom_dismisses_keyboard_and_shows_picker() {
        let (mut app, mut tui, now) = setup();
        send_keys(
            &mut app,
            &mut tui,
            now,
            vec![TuiEvent::InputChar('x'), TuiEvent::ToggleCustomInput],
        );
        assert!(!tui.keyboard.is_up());
        assert_eq!(app.coordinator.input_method(), InputMethod::Custom);
        let layout = app.coordinator.layout();
        assert!(layout.show_custom_input);
        assert_eq!(layout.custom_input_height, 8.0);
        assert_eq!(tui.tweens.sample(now).custom_input, 8);
    }

    #[test]
    fn toggle_again_refocuses_composer() {
        let (mut app, mut tui, now) = setup();
        send_keys(
            &mut app,
            &mut tui,
            now,
            vec![TuiEvent::ToggleCustomInput, TuiEvent::ToggleCustomInput],
        );
        assert!(tui.keyboard.is_up());
        assert_eq!(app.coordinator.input_method(), InputMethod::Keyboard);
        assert!(!app.coordinator.layout().show_custom_input);
    }

    #[test]
    fn custom_before_keyboard_uses_fallback_height() {
        let (mut app, mut tui, now) = setup();
        send_keys(&mut app, &mut tui, now, vec![TuiEvent::ToggleCustomInput]);
        assert_eq!(app.coordinator.layout().custom_input_height, 10.0);
    }

    #[test]
    fn picking_emoji_sends_it() {
        let (mut app, mut tui, now) = setup();
        send_keys(
            &mut app,
            &mut tui,
            now,
            vec![TuiEvent::ToggleCustomInput, TuiEvent::CursorRight, TuiEvent::Submit],
        );
        let last = &app.messages.as_slice()[3];
        assert_eq!(last.kind(), MessageKind::Text);
        assert_eq!(
            last.payload(),
            &crate::core::message::Payload::Text(components::emoji_picker::EMOJI[1].to_string())
        );
        assert_eq!(app.coordinator.input_method(), InputMethod::Custom);
    }

    #[test]
    fn back_walks_keyboard_then_custom_then_exits() {
        let (mut app, mut tui, now) = setup();
        send_keys(&mut app, &mut tui, now, vec![TuiEvent::InputChar('x')]);

        // Keyboard takes the first back
        assert!(!send_keys(&mut app, &mut tui, now, vec![TuiEvent::Back]));
        assert!(!tui.keyboard.is_up());
        assert_eq!(app.coordinator.input_method(), InputMethod::None);

        // Custom panel takes the next
        send_keys(&mut app, &mut tui, now, vec![TuiEvent::ToggleCustomInput]);
        assert!(!send_keys(&mut app, &mut tui, now, vec![TuiEvent::Back]));
        assert_eq!(app.coordinator.input_method(), InputMethod::None);

        // Nothing left: default back exits
        assert!(send_keys(&mut app, &mut tui, now, vec![TuiEvent::Back]));
    }

    #[test]
    fn back_closes_custom_panel_before_clearing_selection() {
        let (mut app, mut tui, now) = setup();
        send_keys(&mut app, &mut tui, now, vec![TuiEvent::ToggleCustomInput]);
        let selected = app.messages.as_slice()[1].id();
        tui.message_list.selected = Some(selected);

        assert!(!send_keys(&mut app, &mut tui, now, vec![TuiEvent::Back]));
        assert_eq!(app.coordinator.input_method(), InputMethod::None);
        assert_eq!(tui.message_list.selected, Some(selected));

        assert!(!send_keys(&mut app, &mut tui, now, vec![TuiEvent::Back]));
        assert_eq!(tui.message_list.selected, None);
        assert!(send_keys(&mut app, &mut tui, now, vec![TuiEvent::Back]));
    }

    #[test]
    fn select_press_and_confirm_delete() {
        let (mut app, mut tui, now) = setup();
        let text_id = app.messages.as_slice()[1].id();
        send_keys(
            &mut app,
            &mut tui,
            now,
            vec![TuiEvent::CursorUp, TuiEvent::CursorUp, TuiEvent::Submit],
        );
        assert_eq!(app.pending_delete.map(|p| p.message_id), Some(text_id));

        // Dialog swallows everything but its own keys
        send_keys(&mut app, &mut tui, now, vec![TuiEvent::InputChar('z')]);
        assert!(!tui.keyboard.is_up());

        send_keys(
            &mut app,
            &mut tui,
            now,
            vec![TuiEvent::CursorRight, TuiEvent::Submit],
        );
        assert!(app.pending_delete.is_none());
        assert_eq!(app.messages.len(), 2);
        assert!(app.messages.get(text_id).is_none());
    }

    #[test]
    fn back_in_dialog_cancels() {
        let (mut app, mut tui, now) = setup();
        send_keys(
            &mut app,
            &mut tui,
            now,
            vec![TuiEvent::CursorUp, TuiEvent::CursorUp, TuiEvent::Submit, TuiEvent::Back],
        );
        assert!(app.pending_delete.is_none());
        assert_eq!(app.messages.len(), 3);
    }

    #[test]
    fn pressing_location_does_not_prompt() {
        let (mut app, mut tui, now) = setup();
        send_keys(&mut app, &mut tui, now, vec![TuiEvent::CursorUp, TuiEvent::Submit]);
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn shortcuts_send_image_and_location() {
        let (mut app, mut tui, now) = setup();
        send_keys(
            &mut app,
            &mut tui,
            now,
            vec![TuiEvent::SendImage, TuiEvent::SendLocation],
        );
        let kinds: Vec<_> = app.messages.iter().skip(3).map(|m| m.kind()).collect();
        assert_eq!(kinds, vec![MessageKind::Image, MessageKind::Location]);
        assert!(tui.message_list.stick_to_bottom);
    }

    #[test]
    fn keyboard_animation_drives_tweens() {
        let now = Instant::now();
        let mut app = test_app_with_messages();
        let mut tui = TuiState::for_screen(8, 200, SCREEN, now);
        sync_keyboard(&mut app, &tui);
        tui.sync_layout(&mut app, now);

        handle_event(&mut app, &mut tui, TuiEvent::InputChar('x'), now);
        // will-show: content height is used before the keyboard is visible
        assert!(app.coordinator.layout().use_content_height);
        assert_eq!(app.coordinator.input_method(), InputMethod::None);
        assert!(!tui.tweens.is_settled(now + Duration::from_millis(100)));

        let done = now + Duration::from_millis(200);
        assert!(tick(&mut app, &mut tui, done));
        assert_eq!(app.coordinator.input_method(), InputMethod::Keyboard);
        assert_eq!(tui.tweens.sample(done).container, SCREEN - 1 - 8);
    }

    #[test]
    fn disabled_animations_snap() {
        let now = Instant::now();
        let mut app = test_app_with_messages();
        app.layout_animations = false;
        let mut tui = TuiState::for_screen(8, 200, SCREEN, now);
        sync_keyboard(&mut app, &tui);
        tui.sync_layout(&mut app, now);

        handle_event(&mut app, &mut tui, TuiEvent::InputChar('x'), now);
        assert!(tui.tweens.is_settled(now));
        assert_eq!(tui.tweens.sample(now).container, SCREEN - 1 - 8);
    }

    #[test]
    fn force_quit_always_quits() {
        let (mut app, mut tui, now) = setup();
        send_keys(&mut app, &mut tui, now, vec![TuiEvent::CursorUp, TuiEvent::CursorUp, TuiEvent::Submit]);
        assert!(handle_event(&mut app, &mut tui, TuiEvent::ForceQuit, now));
    }
}
