//! # Application State
//!
//! Core business state for Parley. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── messages: MessageLog                  // the conversation, id-unique
//! ├── coordinator: InputMethodCoordinator   // what owns the bottom region
//! ├── back_handler: BackHandler             // process-wide back listeners
//! ├── pending_delete: Option<DeletePrompt>  // open confirmation modal
//! ├── status_message: String                // status bar text
//! ├── image_uri / location                  // toolbar payloads
//! └── layout_animations: bool               // process-wide animation toggle
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use log::info;

use crate::core::back_handler::BackHandler;
use crate::core::config::ResolvedConfig;
use crate::core::conversation::MessageLog;
use crate::core::input_method::{CoordinatorConfig, InputMethodCoordinator};
use crate::core::message::{Coordinate, MessageId};

pub const DELETE_PROMPT_TITLE: &str = "Delete message?";
pub const DELETE_PROMPT_BODY: &str = "Are you sure you want to permanently delete this message?";

/// How a confirmation button should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Cancel,
    Destructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptButton {
    pub label: &'static str,
    pub style: ButtonStyle,
}

/// Modal asking whether to delete a text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletePrompt {
    pub message_id: MessageId,
}

impl DeletePrompt {
    pub const BUTTONS: [PromptButton; 2] = [
        PromptButton {
            label: "Cancel",
            style: ButtonStyle::Cancel,
        },
        PromptButton {
            label: "Delete",
            style: ButtonStyle::Destructive,
        },
    ];

    pub fn title(&self) -> &'static str {
        DELETE_PROMPT_TITLE
    }

    pub fn body(&self) -> &'static str {
        DELETE_PROMPT_BODY
    }
}

pub struct App {
    pub messages: MessageLog,
    pub coordinator: InputMethodCoordinator,
    pub back_handler: BackHandler<InputMethodCoordinator>,
    pub pending_delete: Option<DeletePrompt>,
    pub status_message: String,
    pub image_uri: String,
    pub location: Coordinate,
    /// When false, layout changes snap instead of animating.
    pub layout_animations: bool,
}

impl App {
    /// Build the app and mount the coordinator (registers its back listener).
    pub fn new(coordinator_config: CoordinatorConfig, image_uri: String, location: Coordinate) -> Self {
        let mut app = Self {
            messages: MessageLog::new(),
            coordinator: InputMethodCoordinator::new(coordinator_config),
            back_handler: BackHandler::new(),
            pending_delete: None,
            status_message: String::from("Welcome to Parley!"),
            image_uri,
            location,
            layout_animations: true,
        };
        app.coordinator.mount(&mut app.back_handler);
        app
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(
            config.coordinator_config(),
            config.image_uri.clone(),
            config.location,
        );
        app.layout_animations = config.layout_animations;
        for message in config.seed_messages.iter().cloned() {
            if let Err(e) = app.messages.push(message) {
                log::error!("Dropping seed message: {}", e);
            }
        }
        info!(
            "App initialized with {} messages on {:?}",
            app.messages.len(),
            config.platform
        );
        app
    }

    /// Tear down: deregisters the coordinator's back listener.
    pub fn unmount(&mut self) {
        self.coordinator.unmount(&mut self.back_handler);
    }
}
