//! # MessagingContainer Component
//!
//! Hosts the conversation and the custom input region, sized by the input
//! method coordinator:
//!
//! ```text
//! ┌ container (container_height) ──────┐
//! │ content: message list + toolbar    │
//! │                                    │
//! ├ top inset (home indicator) ────────┤
//! │ editor slot (custom_input_height)  │  ← render_input_method_editor
//! └────────────────────────────────────┘
//!   terminal keyboard / empty space
//! ```
//!
//! The three heights animate through [`LayoutTweens`]. The editor closure is
//! only invoked while the coordinator says the custom input is shown, so the
//! picker and the keyboard are never on screen together.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;

use crate::core::animation::{LayoutAnimation, Tween};
use crate::core::input_method::InputLayout;
use crate::tui::component::Component;

/// Heights in whole rows, sampled from the tweens for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Heights {
    pub container: u16,
    pub custom_input: u16,
    pub top_inset: u16,
}

/// One tween per animated height.
pub struct LayoutTweens {
    container: Tween,
    custom_input: Tween,
    top_inset: Tween,
}

impl LayoutTweens {
    pub fn at_rest(layout: &InputLayout, now: Instant) -> Self {
        Self {
            container: Tween::at_rest(layout.container_height, now),
            custom_input: Tween::at_rest(layout.custom_input_height, now),
            top_inset: Tween::at_rest(layout.custom_input_top_inset, now),
        }
    }

    /// Move every tween whose target changed toward the new layout. Without
    /// an animation the change is applied immediately.
    pub fn follow(&mut self, layout: &InputLayout, animation: Option<LayoutAnimation>, now: Instant) {
        let animation = animation.unwrap_or_else(LayoutAnimation::immediate);
        for (tween, target) in [
            (&mut self.container, layout.container_height),
            (&mut self.custom_input, layout.custom_input_height),
            (&mut self.top_inset, layout.custom_input_top_inset),
        ] {
            if tween.target() != target {
                tween.retarget(target, animation, now);
            }
        }
    }

    pub fn sample(&self, now: Instant) -> Heights {
        Heights {
            container: to_rows(self.container.value_at(now)),
            custom_input: to_rows(self.custom_input.value_at(now)),
            top_inset: to_rows(self.top_inset.value_at(now)),
        }
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        self.container.is_settled(now)
            && self.custom_input.is_settled(now)
            && self.top_inset.is_settled(now)
    }
}

fn to_rows(value: f64) -> u16 {
    value.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Screen areas of the container for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub container: Rect,
    pub content: Rect,
    pub editor: Rect,
}

impl Regions {
    /// Carve `area` (everything under the status bar) by the sampled heights.
    pub fn split(area: Rect, heights: Heights) -> Self {
        let container_height = heights.container.min(area.height);
        let container = Rect {
            height: container_height,
            ..area
        };
        let editor_height = heights.custom_input.min(container_height);
        let reserved = editor_height
            .saturating_add(heights.top_inset)
            .min(container_height);
        let content = Rect {
            height: container_height - reserved,
            ..container
        };
        let editor = Rect {
            y: container.bottom() - editor_height,
            height: editor_height,
            ..container
        };
        Self {
            container,
            content,
            editor,
        }
    }
}

pub struct MessagingContainer<C, E>
where
    C: FnMut(&mut Frame, Rect),
    E: FnMut(&mut Frame, Rect),
{
    pub layout: InputLayout,
    pub heights: Heights,
    render_content: C,
    render_input_method_editor: E,
}

impl<C, E> MessagingContainer<C, E>
where
    C: FnMut(&mut Frame, Rect),
    E: FnMut(&mut Frame, Rect),
{
    pub fn new(layout: InputLayout, heights: Heights, render_content: C, render_input_method_editor: E) -> Self {
        Self {
            layout,
            heights,
            render_content,
            render_input_method_editor,
        }
    }
}

impl<C, E> Component for MessagingContainer<C, E>
where
    C: FnMut(&mut Frame, Rect),
    E: FnMut(&mut Frame, Rect),
{
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let regions = Regions::split(area, self.heights);
        (self.render_content)(frame, regions.content);
        if self.layout.show_custom_input && regions.editor.height > 0 {
            (self.render_input_method_editor)(frame, regions.editor);
        }
    }
}
