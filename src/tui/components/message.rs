//! # Message Rows
//!
//! One row per message, dispatched by payload variant:
//!
//! ```text
//!                     ╭──────────────╮
//!                     │ Hello World  │   text  → TextBubble
//!                     ╰──────────────╯
//!               ╭ image ─────────────╮
//!               │        ▣           │   image → ImageThumbnail (fixed size)
//!               ╰ https://unspla… ───╯
//!     ╭ location ──────────────────╮
//!     │  ⣀⡠⠤ map ⠒⠉ ●              │     location → LocationPreview (fixed size)
//!     ╰ 37.7882, -122.4324 ────────╯
//! ```
//!
//! Each variant widget only receives its own payload fields, so a text row
//! has no way to reach an image uri. Adding a payload variant fails to
//! compile until `MessageRow` handles it.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Map, MapResolution};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{Coordinate, Message, Payload};

pub const BUBBLE_COLOR: Color = Color::Rgb(16, 135, 255);

/// Columns kept free left of every row.
const ROW_MARGIN_LEFT: u16 = 6;
const ROW_MARGIN_RIGHT: u16 = 1;
/// Blank line under each row.
const ROW_MARGIN_BOTTOM: u16 = 1;

const CONTENT_PAD_H: u16 = 1;
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
const VERTICAL_OVERHEAD: u16 = 2;

pub const IMAGE_SIZE: (u16, u16) = (24, 8);
pub const MAP_SIZE: (u16, u16) = (36, 12);

/// Degrees of longitude shown across the map preview.
const MAP_SPAN_LON: f64 = 60.0;
const MAP_SPAN_LAT: f64 = 30.0;

/// A single conversation row: margins plus the variant body, right-aligned.
#[derive(Clone, Copy)]
pub struct MessageRow<'a> {
    pub message: &'a Message,
    pub is_selected: bool,
}

impl<'a> MessageRow<'a> {
    pub fn new(message: &'a Message, is_selected: bool) -> Self {
        Self {
            message,
            is_selected,
        }
    }

    /// Rows needed for this message at the given list width, bottom margin
    /// included. Must agree with what `render` draws.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let (_, body_height) = Self::body_size(message, width);
        body_height.saturating_add(ROW_MARGIN_BOTTOM)
    }

    fn available_width(width: u16) -> u16 {
        width.saturating_sub(ROW_MARGIN_LEFT + ROW_MARGIN_RIGHT)
    }

    fn body_size(message: &Message, width: u16) -> (u16, u16) {
        let available = Self::available_width(width);
        match message.payload() {
            Payload::Text(content) => TextBubble::size(content, available),
            Payload::Image { .. } => (IMAGE_SIZE.0.min(available), IMAGE_SIZE.1),
            Payload::Location(_) => (MAP_SIZE.0.min(available), MAP_SIZE.1),
        }
    }
}

impl<'a> Widget for MessageRow<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (body_width, body_height) = Self::body_size(self.message, area.width);
        if body_width == 0 || body_height == 0 {
            return;
        }
        let right_edge = area.right().saturating_sub(ROW_MARGIN_RIGHT);
        let body = Rect::new(
            right_edge.saturating_sub(body_width),
            area.y,
            body_width,
            body_height.min(area.height),
        );

        match self.message.payload() {
            Payload::Text(content) => TextBubble {
                content,
                is_selected: self.is_selected,
            }
            .render(body, buf),
            Payload::Image { uri } => ImageThumbnail {
                uri,
                is_selected: self.is_selected,
            }
            .render(body, buf),
            Payload::Location(coordinate) => LocationPreview {
                coordinate: *coordinate,
                is_selected: self.is_selected,
            }
            .render(body, buf),
        }
    }
}

fn frame_style(is_selected: bool) -> Style {
    if is_selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(BUBBLE_COLOR)
    }
}

fn wrap_options(width: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(width)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Blue rounded bubble with white text.
pub struct TextBubble<'a> {
    pub content: &'a str,
    pub is_selected: bool,
}

impl<'a> TextBubble<'a> {
    /// Bubble width shrinks to the longest wrapped line.
    fn size(content: &str, available: u16) -> (u16, u16) {
        let text_width = available.saturating_sub(HORIZONTAL_OVERHEAD);
        if text_width == 0 {
            return (available, 1);
        }
        let lines = textwrap::wrap(content, wrap_options(text_width as usize));
        let longest = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        let longest = u16::try_from(longest).unwrap_or(u16::MAX);
        let line_count = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let height = line_count.max(1).saturating_add(VERTICAL_OVERHEAD);
        let width = longest.max(1).saturating_add(HORIZONTAL_OVERHEAD).min(available);
        (width, height)
    }
}

impl<'a> Widget for TextBubble<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(frame_style(self.is_selected))
            .style(Style::default().bg(BUBBLE_COLOR).fg(Color::White))
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 {
            return;
        }
        // Pre-wrapped so the drawn lines match calculate_height exactly
        let lines: Vec<Line> = textwrap::wrap(self.content, wrap_options(inner.width as usize))
            .into_iter()
            .map(|l| Line::raw(l.into_owned()))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

/// Fixed-size thumbnail. The terminal cannot fetch pixels, so the uri is
/// shown as the caption.
pub struct ImageThumbnail<'a> {
    pub uri: &'a str,
    pub is_selected: bool,
}

impl<'a> Widget for ImageThumbnail<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let caption_width = area.width.saturating_sub(4) as usize;
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(frame_style(self.is_selected))
            .title(" image ")
            .title_bottom(Line::raw(truncate(self.uri, caption_width)));
        let inner = block.inner(area);
        block.render(area, buf);

        let top = inner.height.saturating_sub(1) / 2;
        let mut lines = vec![Line::raw(""); top as usize];
        lines.push(Line::raw("▣"));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .render(inner, buf);
    }
}

/// Fixed-size world map centered on the coordinate, with a pin.
pub struct LocationPreview {
    pub coordinate: Coordinate,
    pub is_selected: bool,
}

impl LocationPreview {
    fn bounds(center: f64, span: f64, limit: f64) -> [f64; 2] {
        let half = span / 2.0;
        let lo = (center - half).clamp(-limit, limit - span);
        [lo, lo + span]
    }
}

impl Widget for LocationPreview {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lat = self.coordinate.latitude();
        let lon = self.coordinate.longitude();
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(frame_style(self.is_selected))
            .title(" location ")
            .title_bottom(Line::raw(format!(" {} ", self.coordinate)));

        Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds(Self::bounds(lon, MAP_SPAN_LON, 180.0))
            .y_bounds(Self::bounds(lat, MAP_SPAN_LAT, 90.0))
            .paint(|ctx| {
                ctx.draw(&Map {
                    resolution: MapResolution::Low,
                    color: Color::Green,
                });
                ctx.layer();
                ctx.print(lon, lat, Line::styled("●", Style::default().fg(Color::Red)));
            })
            .render(area, buf);
    }
}

/// Cut `text` to `max` columns, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    if max > 0 {
        out.push('…');
    }
    out
}
