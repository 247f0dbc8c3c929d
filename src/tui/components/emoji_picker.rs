//! # EmojiPicker Component
//!
//! The custom input panel. It is drawn only through the messaging
//! container's editor slot, so it never appears at the same time as the
//! keyboard.
//!
//! Arrow keys move through a grid; Enter picks. The grid reflows to the
//! panel width, so the column count from the last render is kept for
//! vertical movement.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const EMOJI: &[&str] = &[
    "😀", "😂", "😊", "😍", "😎", "🤔", "😴", "😭", "😡", "👍", "👎", "👏", "🙏", "💪", "👋",
    "🎉", "💖", "🔥", "⭐", "✨", "☕", "🍕", "🍺", "🎂", "⚽", "🎵", "📷", "🚀", "🌈", "🐶",
    "🐱", "🌹",
];

/// Columns per grid cell: emoji (2) + gap.
const CELL_WIDTH: u16 = 4;

#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    Picked(&'static str),
}

pub struct EmojiPickerState {
    pub selected: usize,
    columns: usize,
}

impl Default for EmojiPickerState {
    fn default() -> Self {
        Self::new()
    }
}

impl EmojiPickerState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            columns: 1,
        }
    }

    pub fn selected_emoji(&self) -> &'static str {
        EMOJI[self.selected]
    }

    fn move_by(&mut self, delta: isize) -> bool {
        let next = self.selected as isize + delta;
        if next < 0 || next >= EMOJI.len() as isize {
            return false;
        }
        self.selected = next as usize;
        true
    }
}

impl EventHandler for EmojiPickerState {
    type Event = PickerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let columns = self.columns.max(1) as isize;
        match event {
            TuiEvent::CursorLeft => {
                self.move_by(-1);
                None
            }
            TuiEvent::CursorRight | TuiEvent::Tab => {
                self.move_by(1);
                None
            }
            TuiEvent::CursorUp => {
                self.move_by(-columns);
                None
            }
            TuiEvent::CursorDown => {
                self.move_by(columns);
                None
            }
            TuiEvent::Submit => Some(PickerEvent::Picked(self.selected_emoji())),
            _ => None,
        }
    }
}

/// Transient wrapper rendered through the editor slot.
pub struct EmojiPicker<'a> {
    pub state: &'a mut EmojiPickerState,
}

impl<'a> EmojiPicker<'a> {
    pub fn new(state: &'a mut EmojiPickerState) -> Self {
        Self { state }
    }
}

impl<'a> Component for EmojiPicker<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Emoji ")
            .title_bottom(Line::raw(" ←↑↓→ choose · Enter send · ^E keyboard ").right_aligned());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width < CELL_WIDTH || inner.height == 0 {
            return;
        }

        let columns = (inner.width / CELL_WIDTH) as usize;
        self.state.columns = columns;

        // Scroll whole rows so the selection stays visible
        let selected_row = self.state.selected / columns;
        let visible_rows = inner.height as usize;
        let first_row = (selected_row + 1).saturating_sub(visible_rows);

        let lines: Vec<Line> = EMOJI
            .chunks(columns)
            .enumerate()
            .skip(first_row)
            .take(visible_rows)
            .map(|(row, chunk)| {
                let spans = chunk.iter().enumerate().flat_map(|(col, emoji)| {
                    let index = row * columns + col;
                    let style = if index == self.state.selected {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    let pad = (CELL_WIDTH as usize).saturating_sub(emoji.width() + 1);
                    [
                        Span::raw(" "),
                        Span::styled(*emoji, style),
                        Span::raw(" ".repeat(pad)),
                    ]
                });
                Line::from(spans.collect::<Vec<_>>())
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
