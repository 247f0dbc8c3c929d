//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `StatusBar`: top line with input method and status
//! - `MessageRow`: one message, dispatched per payload variant
//! - `MessagingContainer`: sizes content and the custom input slot
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it each
//! frame:
//! - `MessageListState` / `MessageList`: scrollable conversation, emits the
//!   pressed message
//! - `Toolbar`: one-line composer
//! - `EmojiPickerState` / `EmojiPicker`: the custom input panel
//! - `ConfirmDialogState` / `ConfirmDialog`: delete confirmation modal
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs                  (this file)
//! ├── status.rs               (status bar)
//! ├── message.rs              (per-variant message rows)
//! ├── message_list.rs         (scrollable list with layout cache)
//! ├── messaging_container.rs  (animated heights, editor slot)
//! ├── toolbar.rs              (composer)
//! ├── emoji_picker.rs         (custom input panel)
//! └── confirm_dialog.rs       (delete modal)
//! ```

mod status;
pub use status::StatusBar;

pub mod confirm_dialog;
pub mod emoji_picker;
pub mod message;
pub mod message_list;
pub mod messaging_container;
pub mod toolbar;

pub use confirm_dialog::{ConfirmDialog, ConfirmDialogState, DialogEvent};
pub use emoji_picker::{EmojiPicker, EmojiPickerState, PickerEvent};
pub use message_list::{MessageList, MessageListState};
pub use messaging_container::{LayoutTweens, MessagingContainer};
pub use toolbar::{TOOLBAR_HEIGHT, Toolbar, ToolbarEvent};
