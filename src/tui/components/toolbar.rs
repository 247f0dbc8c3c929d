//! # Toolbar Component
//!
//! One-line composer under the message list. Typing focuses it (the terminal
//! keyboard slides up); Enter sends. Image and location shortcuts are routed
//! by the parent since they work without focus.
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `focused` is a prop: the
//! composer has focus exactly while the terminal keyboard is up.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border rows above and below the line.
pub const TOOLBAR_HEIGHT: u16 = 3;
const HORIZONTAL_OVERHEAD: u16 = 2;

const HINTS: &str = " Enter send · ^P image · ^L location · ^E emoji ";

/// High-level events emitted by the Toolbar
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarEvent {
    Submit(String),
    ContentChanged,
}

pub struct Toolbar {
    pub buffer: String,
    /// Byte offset into `buffer`, always on a char boundary
    cursor: usize,
    pub focused: bool,
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolbar {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            focused: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Byte offset where the visible window starts so the cursor stays in view.
    fn scroll_start(&self, inner_width: usize) -> usize {
        let mut start = self.cursor;
        let mut used = 1; // the cursor cell itself
        for (i, c) in self.buffer[..self.cursor].char_indices().rev() {
            let w = c.width().unwrap_or(0);
            if used + w > inner_width {
                break;
            }
            used += w;
            start = i;
        }
        start
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl Component for Toolbar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        let start = self.scroll_start(inner_width);

        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Message ")
            .title_bottom(Line::raw(HINTS).right_aligned());

        let visible = &self.buffer[start..];
        let line = if visible.is_empty() && !self.focused {
            Line::styled("Type to write a message", Style::default().fg(Color::DarkGray))
        } else {
            Line::raw(visible)
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if self.focused && area.height >= TOOLBAR_HEIGHT {
            let offset = self.buffer[start..self.cursor].width() as u16;
            frame.set_cursor_position((area.x + 1 + offset, area.y + 1));
        }
    }
}

impl EventHandler for Toolbar {
    type Event = ToolbarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert(c.encode_utf8(&mut tmp));
                Some(ToolbarEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single line: newlines become spaces
                let flat: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                self.insert(&flat);
                Some(ToolbarEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    Some(ToolbarEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(self.cursor..next);
                    Some(ToolbarEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                ToolbarEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                ToolbarEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                ToolbarEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                ToolbarEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    None
                } else {
                    self.cursor = 0;
                    Some(ToolbarEvent::Submit(std::mem::take(&mut self.buffer)))
                }
            }
            _ => None,
        }
    }
}
