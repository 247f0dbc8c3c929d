//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Display one `MessageRow` per message, in log order (newest at the bottom)
//! - Manage scrolling and stick-to-bottom
//! - Keyboard selection and mouse hit testing
//! - Emit the pressed message (`onSelect`) without touching the log
//! - Cache row heights, keyed by message id
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and `&'a MessageLog` (props).
//! Messages are immutable once created, so a row's height only depends on its
//! id and the list width; removing a message only invalidates rows after it.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::conversation::MessageLog;
use crate::core::message::{Message, MessageId};
use crate::tui::component::Component;
use crate::tui::components::message::MessageRow;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Selected row, by id so it survives removals above it
    pub selected: Option<MessageId>,
    /// Screen area of the last render (for hit testing and scroll clamping)
    pub viewport: Rect,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            selected: None,
            viewport: Rect::default(),
        }
    }

    fn max_scroll(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport.height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll so the selected row is fully visible. Rows taller than the
    /// viewport are aligned by their top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected.and_then(|id| self.layout.index_of(id)) else {
            return;
        };
        let (item_top, item_bottom) = self.layout.span(idx);
        let offset_y = self.scroll_state.offset().y;
        let viewport_height = self.viewport.height;

        if item_top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y + viewport_height {
            let new_y = item_bottom.saturating_sub(viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            self.stick_to_bottom = new_y >= self.max_scroll();
        }
    }

    /// Move the selection one row up; from no selection, pick the newest.
    pub fn select_previous(&mut self, messages: &MessageLog) {
        let next = match self.selected.and_then(|id| messages.position(id)) {
            Some(0) => 0,
            Some(i) => i - 1,
            None => messages.len().saturating_sub(1),
        };
        self.selected = messages.as_slice().get(next).map(Message::id);
        self.scroll_to_selected();
    }

    /// Move the selection one row down; past the newest row, deselect.
    pub fn select_next(&mut self, messages: &MessageLog) {
        self.selected = self
            .selected
            .and_then(|id| messages.position(id))
            .and_then(|i| messages.as_slice().get(i + 1))
            .map(Message::id);
        if self.selected.is_some() {
            self.scroll_to_selected();
        } else {
            self.repin_if_at_bottom();
        }
    }

    /// Drop a selection whose message no longer exists.
    pub fn prune_selection(&mut self, messages: &MessageLog) {
        if let Some(id) = self.selected
            && messages.get(id).is_none()
        {
            self.selected = None;
        }
    }

    /// Message under the given screen cell, if any.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<MessageId> {
        if !self.viewport.contains(Position { x: column, y: row }) {
            return None;
        }
        let content_y = row - self.viewport.y + self.scroll_state.offset().y;
        self.layout.row_at(content_y)
    }

    /// Route a terminal event. Returns the pressed message (`onSelect`).
    /// The log itself is never modified here.
    pub fn handle_event<'m>(&mut self, event: &TuiEvent, messages: &'m MessageLog) -> Option<&'m Message> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::CursorUp => {
                self.select_previous(messages);
                None
            }
            TuiEvent::CursorDown => {
                self.select_next(messages);
                None
            }
            TuiEvent::Submit => self.selected.and_then(|id| messages.get(id)),
            TuiEvent::MouseClick(column, row) => {
                let id = self.hit_test(*column, *row)?;
                self.selected = Some(id);
                messages.get(id)
            }
            _ => None,
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a MessageLog,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, messages: &'a MessageLog) -> Self {
        Self { state, messages }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Update layout cache
        self.state.layout.sync(self.messages, content_width);
        self.state.prune_selection(self.messages);

        // 2. Pin to bottom or clamp, before picking visible rows
        self.state.viewport = area;
        if self.state.stick_to_bottom {
            let max_y = self.state.max_scroll();
            self.state.scroll_state.set_offset(Position { x: 0, y: max_y });
        } else {
            self.state.clamp_scroll();
        }

        let total_height = self.state.layout.total_height();
        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible rows into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible_range {
            let message = &self.messages.as_slice()[i];
            let (top, bottom) = self.state.layout.span(i);
            let row_rect = Rect::new(0, top, content_width, bottom - top);
            let is_selected = self.state.selected == Some(message.id());
            scroll_view.render_widget(MessageRow::new(message, is_selected), row_rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Cached row heights.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    keys: Vec<MessageId>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            keys: Vec::new(),
            content_width: 0,
        }
    }

    /// Leading rows whose cached heights still apply: the common id prefix,
    /// or nothing if the width changed.
    pub fn reusable_count(&self, messages: &MessageLog, content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        self.keys
            .iter()
            .zip(messages.iter())
            .take_while(|(key, message)| **key == message.id())
            .count()
    }

    pub fn sync(&mut self, messages: &MessageLog, content_width: u16) {
        let reusable = self.reusable_count(messages, content_width);
        self.heights.truncate(reusable);
        self.keys.truncate(reusable);

        for message in messages.iter().skip(reusable) {
            self.heights
                .push(MessageRow::calculate_height(message, content_width));
            self.keys.push(message.id());
        }
        self.content_width = content_width;
        self.rebuild_prefix_heights();
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn index_of(&self, id: MessageId) -> Option<usize> {
        self.keys.iter().position(|key| *key == id)
    }

    /// Top (inclusive) and bottom (exclusive) content rows of item `idx`.
    pub fn span(&self, idx: usize) -> (u16, u16) {
        let top = if idx == 0 {
            0
        } else {
            self.prefix_heights[idx - 1]
        };
        (top, self.prefix_heights[idx])
    }

    /// Which item covers content row `y`.
    pub fn row_at(&self, y: u16) -> Option<MessageId> {
        let idx = self.prefix_heights.partition_point(|&end| end <= y);
        self.keys.get(idx).copied()
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
