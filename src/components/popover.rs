//! Terminal rendering of the overlay surface: the dimmed backdrop and the
//! floating panel with its buttons.

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::{Component, RenderContext};
use crate::geometry;
use crate::host::Stacking;
use crate::keybindings::{Action, KeyBindings};
use crate::overlay::OverlaySurface;
use crate::scene::{ElementId, Scene};
use crate::theme;
use crate::ui::{UiFrame, rect_contains, safe_set_string};

const MIN_INNER_WIDTH: u16 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Prev,
    Next,
    Close,
}

impl PanelAction {
    fn label(&self, last_step: bool) -> &'static str {
        match self {
            PanelAction::Prev => "[ Back ]",
            PanelAction::Next if last_step => "[ Done ]",
            PanelAction::Next => "[ Next ]",
            PanelAction::Close => "[ Close ]",
        }
    }
}

/// Presentation attributes passed straight through to the panel's block.
#[derive(Debug, Clone)]
pub struct PanelProps {
    pub style: Style,
    pub border_style: Style,
    pub borders: Borders,
    pub title_alignment: Alignment,
    pub max_width: u16,
}

impl Default for PanelProps {
    fn default() -> Self {
        Self {
            style: Style::default().fg(theme::panel_fg()).bg(theme::panel_bg()),
            border_style: Style::default().fg(theme::panel_border()),
            borders: Borders::ALL,
            title_alignment: Alignment::Left,
            max_width: 48,
        }
    }
}

#[derive(Debug)]
struct PanelButton {
    action: PanelAction,
    element: ElementId,
    rect: Option<Rect>,
}

/// The floating panel. Registers itself and its focusable buttons in the
/// scene so the overlay surface can measure it and trap focus inside it.
#[derive(Debug)]
pub struct PopoverPanel {
    scene: Scene,
    element: ElementId,
    buttons: Vec<PanelButton>,
    title: String,
    body: String,
    footer: Option<String>,
    last_step: bool,
    props: PanelProps,
    displayed: Option<(u16, u16)>,
}

impl PopoverPanel {
    pub fn new(scene: &Scene, props: PanelProps) -> Self {
        let element = scene.add_element(geometry::Rect::default());
        let buttons = [PanelAction::Prev, PanelAction::Next, PanelAction::Close]
            .into_iter()
            .map(|action| {
                let width = action.label(false).len() as f64;
                PanelButton {
                    action,
                    element: scene.add_child(element, geometry::Rect::sized(width, 1.0), true),
                    rect: None,
                }
            })
            .collect();
        let mut panel = Self {
            scene: scene.clone(),
            element,
            buttons,
            title: String::new(),
            body: String::new(),
            footer: None,
            last_step: false,
            props,
            displayed: None,
        };
        panel.remeasure();
        panel
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn button(&self, action: PanelAction) -> Option<ElementId> {
        self.buttons
            .iter()
            .find(|b| b.action == action)
            .map(|b| b.element)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the panel content and resize the panel element to fit.
    pub fn set_content(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        footer: Option<String>,
        last_step: bool,
    ) {
        self.title = title.into();
        self.body = body.into();
        self.footer = footer;
        self.last_step = last_step;
        self.remeasure();
    }

    fn buttons_width(&self) -> u16 {
        let labels: usize = self
            .buttons
            .iter()
            .map(|b| b.action.label(self.last_step).len() + 1)
            .sum();
        labels.saturating_sub(1) as u16
    }

    fn inner_width(&self) -> u16 {
        let cap = self.props.max_width.saturating_sub(4).max(MIN_INNER_WIDTH);
        let body = self
            .body
            .lines()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0) as u16;
        let title = self.title.chars().count() as u16 + 2;
        body.max(title)
            .max(self.buttons_width())
            .max(MIN_INNER_WIDTH)
            .min(cap)
    }

    fn remeasure(&mut self) {
        let inner = self.inner_width();
        let body_rows = wrap_lines(&self.body, inner as usize).len() as u16;
        // borders + padding around the body, a spacer row and the button row
        let width = inner + 4;
        let height = body_rows + 4;
        self.scene.set_layout(
            self.element,
            geometry::Rect::sized(width as f64, height as f64),
        );
    }

    /// Map a click on a rendered button, or the activate key while a button
    /// holds focus, to its action.
    pub fn handle_panel_event(
        &self,
        event: &Event,
        bindings: &KeyBindings,
    ) -> Option<PanelAction> {
        match event {
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) => self
                .buttons
                .iter()
                .find(|b| b.rect.is_some_and(|r| rect_contains(r, mouse.column, mouse.row)))
                .map(|b| b.action),
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !bindings.matches(Action::Activate, key) {
                    return None;
                }
                let focused = self.scene.focused()?;
                self.buttons
                    .iter()
                    .find(|b| b.element == focused)
                    .map(|b| b.action)
            }
            _ => None,
        }
    }

    /// Where to paint this frame. Snaps on the first paint and while
    /// transitions are off; otherwise glides halfway toward `goal`.
    fn next_origin(&mut self, goal: (u16, u16), transition: bool) -> (u16, u16) {
        let origin = match self.displayed {
            Some(from) if transition => (approach(from.0, goal.0), approach(from.1, goal.1)),
            _ => goal,
        };
        self.displayed = Some(origin);
        origin
    }
}

impl Component for PopoverPanel {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &RenderContext) {
        for button in &mut self.buttons {
            button.rect = None;
        }
        let (x, y) = self.next_origin((area.x, area.y), ctx.transition());
        let area = Rect { x, y, ..area };
        if area.width < 3 || area.height < 3 {
            return;
        }
        frame.render_widget(Clear, area);
        let mut block = Block::default()
            .borders(self.props.borders)
            .border_style(self.props.border_style)
            .style(self.props.style)
            .title(format!(" {} ", self.title))
            .title_alignment(self.props.title_alignment);
        if let Some(footer) = &self.footer {
            block = block.title_bottom(format!(" {footer} "));
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let content = Rect {
            x: inner.x.saturating_add(1),
            y: inner.y,
            width: inner.width.saturating_sub(2),
            height: inner.height,
        };
        if content.width == 0 || content.height < 2 {
            return;
        }
        let lines: Vec<Line> = wrap_lines(&self.body, content.width as usize)
            .into_iter()
            .map(Line::from)
            .collect();
        let body = Rect {
            height: content.height.saturating_sub(2),
            ..content
        };
        frame.render_widget(Paragraph::new(lines).style(self.props.style), body);

        let button_y = content.y.saturating_add(content.height.saturating_sub(1));
        let mut x = content
            .x
            .saturating_add(content.width.saturating_sub(self.buttons_width()));
        let last_step = self.last_step;
        let buffer = frame.buffer_mut();
        for button in &mut self.buttons {
            let label = button.action.label(last_step);
            let style = if ctx.is_focused(button.element) {
                theme::button_focused()
            } else {
                theme::button()
            };
            safe_set_string(buffer, content, x, button_y, label, style);
            button.rect = Some(Rect {
                x,
                y: button_y,
                width: label.len() as u16,
                height: 1,
            });
            x = x.saturating_add(label.len() as u16 + 1);
        }
    }
}

/// Draw the backdrop and the panel for `surface`. Nothing is drawn while the
/// surface is closed or before its first offset has been applied.
pub fn render_popover(
    frame: &mut UiFrame<'_>,
    scene: &Scene,
    surface: &OverlaySurface<Scene>,
    panel: &mut PopoverPanel,
) {
    if !surface.is_open() {
        panel.displayed = None;
        return;
    }
    if surface.show_backdrop() {
        // Elevated targets paint above the backdrop.
        let keep: Vec<Rect> = surface
            .target()
            .filter(|t| scene.stack_order(*t).is_some())
            .and_then(|t| scene.cell_rect(t))
            .into_iter()
            .collect();
        frame.dim_except(theme::backdrop(), &keep);
    }
    if surface.offset().is_none() {
        return;
    }
    let Some(rect) = scene.cell_rect(panel.element) else {
        return;
    };
    let ctx = RenderContext::new(scene.focused())
        .with_transition(scene.transition_enabled(panel.element));
    panel.render(frame, rect, &ctx);
}

fn approach(from: u16, to: u16) -> u16 {
    if from < to {
        from + (to - from).div_ceil(2)
    } else {
        from - (from - to).div_ceil(2)
    }
}

/// Greedy word wrap. Words longer than `width` are split.
pub(crate) fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.lines() {
        let mut line = String::new();
        for word in raw.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                }
                out.push(word.drain(..width).collect());
            }
            let word: String = word.into_iter().collect();
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        out.push(line);
    }
    out
}
