//! # ConfirmDialog Component
//!
//! Centered modal for the delete confirmation. Drawn over everything else
//! while `App::pending_delete` is set; it takes all input until answered.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ConfirmDialogState` lives in `TuiState`
//! - `ConfirmDialog` is created each frame with the prompt and borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::state::{ButtonStyle, DeletePrompt};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    Chose(ButtonStyle),
}

/// Focused button index into `DeletePrompt::BUTTONS`.
pub struct ConfirmDialogState {
    pub focused: usize,
}

impl Default for ConfirmDialogState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmDialogState {
    /// Focus starts on Cancel.
    pub fn new() -> Self {
        Self { focused: 0 }
    }

    pub fn reset(&mut self) {
        self.focused = 0;
    }

    fn button_count() -> usize {
        DeletePrompt::BUTTONS.len()
    }
}

impl EventHandler for ConfirmDialogState {
    type Event = DialogEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorLeft => {
                self.focused = self.focused.saturating_sub(1);
                None
            }
            TuiEvent::CursorRight => {
                self.focused = (self.focused + 1).min(Self::button_count() - 1);
                None
            }
            TuiEvent::Tab => {
                self.focused = (self.focused + 1) % Self::button_count();
                None
            }
            TuiEvent::Submit => DeletePrompt::BUTTONS
                .get(self.focused)
                .map(|button| DialogEvent::Chose(button.style)),
            // Back dismisses like the cancel button
            TuiEvent::Back => Some(DialogEvent::Chose(ButtonStyle::Cancel)),
            _ => None,
        }
    }
}

pub struct ConfirmDialog<'a> {
    pub prompt: &'a DeletePrompt,
    pub state: &'a ConfirmDialogState,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(prompt: &'a DeletePrompt, state: &'a ConfirmDialogState) -> Self {
        Self { prompt, state }
    }

    fn button_spans(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        for (i, button) in DeletePrompt::BUTTONS.iter().enumerate() {
            let mut style = match button.style {
                ButtonStyle::Cancel => Style::default(),
                ButtonStyle::Destructive => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            };
            if i == self.state.focused {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(format!(" {} ", button.label), style));
        }
        spans
    }
}

impl<'a> Component for ConfirmDialog<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        frame.render_widget(Clear, overlay);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red))
            .title(Line::styled(
                format!(" {} ", self.prompt.title()),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [body_area, buttons_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        frame.render_widget(
            Paragraph::new(self.prompt.body()).wrap(Wrap { trim: true }),
            body_area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(self.button_spans())).alignment(Alignment::Right),
            buttons_area,
        );
    }
}

/// Fixed-size rect centered in `outer`, shrunk to fit.
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(outer.height)),
        Constraint::Fill(1),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(outer.width)),
        Constraint::Fill(1),
    ])
    .areas(center_v);
    center
}
