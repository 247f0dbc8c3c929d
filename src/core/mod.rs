//! # Core Application Logic
//!
//! This module contains Parley's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Message model        │
//!                    │  • Input coordinator    │
//!                    │  • State + Action       │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: `Message` and its text/image/location payloads
//! - [`conversation`]: `MessageLog`, the ordered id-unique collection
//! - [`keyboard`]: `KeyboardState` snapshots and the `KeyboardObserver` capability
//! - [`input_method`]: the `InputMethodCoordinator` state machine
//! - [`back_handler`]: process-wide back navigation listeners
//! - [`animation`]: layout animation curves and tweens
//! - [`state`]: the `App` struct holding all application state
//! - [`action`]: the `Action` enum and `update()` reducer
//! - [`config`]: layered TOML configuration

pub mod action;
pub mod animation;
pub mod back_handler;
pub mod config;
pub mod conversation;
pub mod input_method;
pub mod keyboard;
pub mod message;
pub mod state;
