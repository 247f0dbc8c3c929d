//! # StatusBar Component
//!
//! Top line showing the app name, what currently owns the input region, and
//! the latest status message.
//!
//! Purely presentational: all three props come from core state.
//!
//! ```text
//! Parley | 3 messages | input: keyboard | Message deleted
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::input_method::InputMethod;
use crate::tui::component::Component;

pub struct StatusBar<'a> {
    pub input_method: InputMethod,
    pub message_count: usize,
    pub status_message: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(input_method: InputMethod, message_count: usize, status_message: &'a str) -> Self {
        Self {
            input_method,
            message_count,
            status_message,
        }
    }

    fn text(&self) -> String {
        let noun = if self.message_count == 1 { "message" } else { "messages" };
        let base = format!(
            "Parley | {} {} | input: {}",
            self.message_count, noun, self.input_method
        );
        if self.status_message.is_empty() {
            base
        } else {
            format!("{base} | {}", self.status_message)
        }
    }
}

impl<'a> Component for StatusBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ));
        frame.render_widget(line, area);
    }
}
