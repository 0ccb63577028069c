use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod popover;

pub use popover::{PanelAction, PanelProps, PopoverPanel, render_popover};

pub use crate::component_context::RenderContext;

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &RenderContext);
}
