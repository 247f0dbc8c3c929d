use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    ConfirmDialog, EmojiPicker, MessageList, MessagingContainer, StatusBar, TOOLBAR_HEIGHT,
};
use crate::tui::keyboard::STATUS_BAR_HEIGHT;

const KEY_ROWS: [&str; 3] = [
    "q w e r t y u i o p",
    " a s d f g h j k l ",
    "  z x c v b n m ⌫  ",
];

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, now: Instant) {
    use Constraint::{Length, Min};
    let [status_area, body] = Layout::vertical([Length(STATUS_BAR_HEIGHT), Min(0)]).areas(frame.area());

    StatusBar::new(
        app.coordinator.input_method(),
        app.messages.len(),
        &app.status_message,
    )
    .render(frame, status_area);

    let heights = tui.tweens.sample(now);
    let layout = app.coordinator.layout();
    tui.toolbar.focused = tui.keyboard.is_up();

    let message_list = &mut tui.message_list;
    let toolbar = &mut tui.toolbar;
    let emoji_picker = &mut tui.emoji_picker;
    let mut container = MessagingContainer::new(
        layout,
        heights,
        |frame, area| {
            let [list_area, toolbar_area] = Layout::vertical([Min(0), Length(TOOLBAR_HEIGHT)]).areas(area);
            MessageList::new(message_list, &app.messages).render(frame, list_area);
            toolbar.render(frame, toolbar_area);
        },
        |frame, area| {
            EmojiPicker::new(emoji_picker).render(frame, area);
        },
    );
    container.render(frame, body);

    // Whatever the container leaves free is where the keyboard slides in
    let container_height = heights.container.min(body.height);
    let keyboard_area = Rect {
        y: body.y + container_height,
        height: body.height - container_height,
        ..body
    };
    if keyboard_area.height > 0 && (tui.keyboard.is_up() || tui.keyboard.is_animating()) {
        draw_keyboard_surface(frame, keyboard_area);
    }

    if let Some(prompt) = &app.pending_delete {
        ConfirmDialog::new(prompt, &tui.confirm_dialog).render(frame, frame.area());
    }
}

fn draw_keyboard_surface(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Line::raw(" keyboard · Esc to dismiss ").centered());
    let lines: Vec<Line> = KEY_ROWS
        .iter()
        .map(|row| Line::styled(*row, Style::default().add_modifier(Modifier::DIM)))
        .collect();
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .style(Style::default().bg(Color::Black)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::keyboard::KeyboardObserver;
    use crate::test_support::test_app_with_messages;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    const WIDTH: u16 = 60;
    const HEIGHT: u16 = 40;

    fn draw(app: &App, tui: &mut TuiState, now: Instant) -> String {
        let backend = TestBackend::new(WIDTH, HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, now)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn setup() -> (App, TuiState, Instant) {
        let now = Instant::now();
        let mut app = test_app_with_messages();
        let mut tui = TuiState::for_screen(8, 0, HEIGHT, now);
        update(&mut app, Action::KeyboardChanged(tui.keyboard.keyboard_state()));
        tui.sync_layout(&mut app, now);
        (app, tui, now)
    }

    #[test]
    fn draws_status_conversation_and_toolbar() {
        let (app, mut tui, now) = setup();
        let text = draw(&app, &mut tui, now);
        assert!(text.contains("Parley"));
        assert!(text.contains("Hello World"));
        assert!(text.contains("Message"));
        assert!(!text.contains("Emoji"));
        assert!(!text.contains("keyboard ·"));
    }

    #[test]
    fn custom_input_draws_picker_not_keyboard() {
        let (mut app, mut tui, now) = setup();
        update(&mut app, Action::RequestCustomInput);
        tui.sync_layout(&mut app, now);
        let text = draw(&app, &mut tui, now);
        assert!(text.contains("Emoji"));
        assert!(!text.contains("keyboard ·"));
    }

    #[test]
    fn keyboard_draws_surface_not_picker() {
        let (mut app, mut tui, now) = setup();
        tui.keyboard.show(now);
        tui.keyboard.tick(now);
        update(&mut app, Action::KeyboardChanged(tui.keyboard.keyboard_state()));
        tui.sync_layout(&mut app, now);
        let text = draw(&app, &mut tui, now);
        assert!(text.contains("keyboard ·"));
        assert!(!text.contains("Emoji"));
    }

    #[test]
    fn pending_delete_draws_dialog() {
        let (mut app, mut tui, now) = setup();
        let text_message = app.messages.as_slice()[1].clone();
        update(&mut app, Action::PressMessage(text_message));
        let text = draw(&app, &mut tui, now);
        assert!(text.contains("Delete message?"));
    }
}
