//! # Actions
//!
//! Everything that can happen in Parley becomes an `Action`.
//! The keyboard slides up? That's `Action::KeyboardChanged(snapshot)`.
//! User taps a message? That's `Action::PressMessage(message)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` for the adapter to carry out. No I/O
//! happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, error, info, warn};

use crate::core::input_method::{InputMethod, KeyboardDismissal};
use crate::core::keyboard::KeyboardState;
use crate::core::message::{Message, MessageError, MessageKind};
use crate::core::state::{App, DeletePrompt};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// New snapshot from the keyboard observer.
    KeyboardChanged(KeyboardState),
    /// Host-driven input method change (`onChangeInputMethod`).
    ChangeInputMethod(InputMethod),
    /// User asked for the custom panel (emoji picker).
    RequestCustomInput,
    /// Hardware back, after the OS keyboard had its chance.
    HardwareBack,
    /// A message row was tapped.
    PressMessage(Message),
    ConfirmDelete,
    CancelDelete,
    SendText(String),
    SendImage,
    SendLocation,
    Quit,
}

/// Side effect the adapter must perform after `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Hide the system keyboard.
    DismissKeyboard,
    /// Back was not consumed; run the platform default.
    DefaultBack,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::KeyboardChanged(snapshot) => {
            if let Err(e) = app.coordinator.on_keyboard_update(snapshot) {
                warn!("Keyboard update rejected, keeping previous layout: {}", e);
            }
            Effect::None
        }
        Action::ChangeInputMethod(next) => {
            app.coordinator.change_input_method(next);
            Effect::None
        }
        Action::RequestCustomInput => match app.coordinator.request_custom() {
            KeyboardDismissal::Required => Effect::DismissKeyboard,
            KeyboardDismissal::NotNeeded => Effect::None,
        },
        Action::HardwareBack => {
            if app.back_handler.dispatch(&mut app.coordinator) {
                Effect::None
            } else {
                debug!("Back not consumed, falling through to default");
                Effect::DefaultBack
            }
        }
        Action::PressMessage(message) => {
            handle_press_message(app, &message);
            Effect::None
        }
        Action::ConfirmDelete => {
            if let Some(prompt) = app.pending_delete.take() {
                match app.messages.remove(prompt.message_id) {
                    Some(_) => {
                        info!("Deleted message {}", prompt.message_id);
                        app.status_message = String::from("Message deleted");
                    }
                    None => debug!("Message {} already gone", prompt.message_id),
                }
            }
            Effect::None
        }
        Action::CancelDelete => {
            app.pending_delete = None;
            Effect::None
        }
        Action::SendText(text) => {
            append(app, Message::new_text(text));
            Effect::None
        }
        Action::SendImage => {
            let image = Message::new_image(app.image_uri.clone());
            append(app, image);
            Effect::None
        }
        Action::SendLocation => {
            let location = Message::new_location(app.location);
            append(app, Ok(location));
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn handle_press_message(app: &mut App, message: &Message) {
    match message.kind() {
        MessageKind::Text => {
            app.pending_delete = Some(DeletePrompt {
                message_id: message.id(),
            });
        }
        MessageKind::Image | MessageKind::Location => {
            debug!("Press on {} message {} ignored", message.kind(), message.id());
        }
    }
}

fn append(app: &mut App, message: Result<Message, MessageError>) {
    match message.and_then(|m| app.messages.push(m)) {
        Ok(()) => app.status_message.clear(),
        Err(e) => {
            error!("Message not sent: {}", e);
            app.status_message = format!("Not sent: {e}");
        }
    }
}
