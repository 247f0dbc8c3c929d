//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::input_method::CoordinatorConfig;
use crate::core::keyboard::KeyboardState;
use crate::core::message::{Coordinate, Message};
use crate::core::state::App;

pub fn test_location() -> Coordinate {
    Coordinate::new(37.78825, -122.4324).expect("valid test coordinate")
}

/// Creates an empty test App with default coordinator settings.
pub fn test_app() -> App {
    App::new(
        CoordinatorConfig::default(),
        "https://unsplash.it/300/300".to_string(),
        test_location(),
    )
}

/// The welcome conversation: image, text, location.
pub fn sample_messages() -> Vec<Message> {
    vec![
        Message::new_image("https://unsplash.it/300/300").expect("valid image"),
        Message::new_text("Hello World").expect("valid text"),
        Message::new_location(test_location()),
    ]
}

pub fn test_app_with_messages() -> App {
    let mut app = test_app();
    for message in sample_messages() {
        app.messages.push(message).expect("unique ids");
    }
    app
}

pub fn keyboard_hidden() -> KeyboardState {
    KeyboardState {
        container_height: 23.0,
        content_height: 15.0,
        keyboard_height: 8.0,
        keyboard_visible: false,
        keyboard_will_show: false,
        keyboard_will_hide: false,
        keyboard_animation_duration: 250.0,
    }
}

pub fn keyboard_shown() -> KeyboardState {
    KeyboardState {
        keyboard_visible: true,
        ..keyboard_hidden()
    }
}
