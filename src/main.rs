use std::time::Duration;

use clap::Parser;
use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
use indoc::indoc;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use tracing::{debug, info};

use term_popover::{OverlayError, Result};
use term_popover::components::{PanelAction, PanelProps, PopoverPanel, render_popover};
use term_popover::config::{Cli, Config};
use term_popover::drivers::OutputDriver;
use term_popover::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_popover::event_loop::ControlFlow;
use term_popover::geometry::{self, PreferredPosition, Spacing, Viewport};
use term_popover::keybindings::{Action, KeyBindings};
use term_popover::overlay::{OverlaySurface, SurfaceInput};
use term_popover::runner::{OverlayApp, run_app};
use term_popover::scene::{ElementId, Scene};
use term_popover::theme;
use term_popover::tour::{Tour, TourStep};
use term_popover::tracing_sub;
use term_popover::ui::{UiFrame, rect_contains};

const SIDEBAR_ITEMS: u16 = 40;
const SIDEBAR_WIDTH: u16 = 24;
const START_LABEL: &str = "[ Tour ]";

// Cells, not pixels: the default 10-unit gap would swallow a small terminal.
const COMPACT: Spacing = Spacing {
    gap: 1.0,
    margin: 1.0,
};

fn main() -> Result<()> {
    let config = Config::try_from(Cli::parse()).map_err(OverlayError::Config)?;
    tracing_sub::init_default(config.log_file.as_deref(), config.log_level)?;
    info!(position = %config.position, backdrop = config.show_backdrop, "starting demo");

    let (cols, rows) = crossterm::terminal::size()?;
    let mut app = DemoApp::new(&config, Rect::new(0, 0, cols, rows));
    let mut output = ConsoleOutputDriver::new()?;
    let mut input = ConsoleInputDriver::new();
    output.enter()?;
    let result = run_app(&mut output, &mut input, &mut app, config.tick);
    output.exit()?;
    result.map_err(OverlayError::from)
}

#[derive(Debug, Clone, Copy)]
struct Targets {
    start: ElementId,
    sidebar: ElementId,
    search: ElementId,
    chart: ElementId,
    status: ElementId,
}

#[derive(Debug, Clone, Copy, Default)]
struct DemoLayout {
    header: Rect,
    start: Rect,
    sidebar: Rect,
    search: Rect,
    chart: Rect,
    status: Rect,
}

impl DemoLayout {
    fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(rows[1]);
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(body[1]);
        let header = rows[0];
        let start_width = START_LABEL.len() as u16;
        let start = Rect {
            x: header.right().saturating_sub(start_width + 1),
            width: start_width.min(header.width),
            ..header
        };
        let search_width = main[0].width.min(32);
        let search = Rect {
            x: main[0].right().saturating_sub(search_width),
            width: search_width,
            ..main[0]
        };
        let chart = centered(main[1], 40, 9);
        Self {
            header,
            start,
            sidebar: body[0],
            search,
            chart,
            status: rows[2],
        }
    }

    fn target_rect(&self, targets: &Targets, id: ElementId) -> Option<Rect> {
        [
            (targets.start, self.start),
            (targets.sidebar, self.sidebar),
            (targets.search, self.search),
            (targets.chart, self.chart),
            (targets.status, self.status),
        ]
        .into_iter()
        .find(|(t, _)| *t == id)
        .map(|(_, rect)| rect)
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn build_tour(targets: &Targets, first: PreferredPosition) -> Tour<ElementId> {
    let start = PreferredPosition::ALL
        .iter()
        .position(|p| *p == first)
        .unwrap_or_default();
    let side = |i: usize| PreferredPosition::ALL[(start + i) % PreferredPosition::ALL.len()];
    Tour::new(vec![
        TourStep::new(
            targets.start,
            "Welcome",
            indoc! {"
                This short tour points at each part of the screen.
                Tab and BackTab move between the buttons below;
                Enter presses the focused one."},
        )
        .position(side(0)),
        TourStep::new(
            targets.sidebar,
            "Sidebar",
            indoc! {"
                The sidebar scrolls with the arrow keys or the mouse wheel.
                Try it now: scrolling is locked while the tour is open."},
        )
        .position(side(1)),
        TourStep::new(
            targets.search,
            "Search",
            indoc! {"
                Panels are clamped to stay inside the terminal, so this one
                slides back into view when its preferred side runs out of room."},
        )
        .position(side(2)),
        TourStep::new(
            targets.status,
            "Status bar",
            indoc! {"
                Key hints live down here. Resize the terminal and the panel
                follows its target."},
        )
        .position(side(3)),
        TourStep::new(
            targets.chart,
            "That's it",
            indoc! {"
                This last step ignores its target and sits in the middle of
                the screen. Click anywhere outside the panel to dismiss it."},
        )
        .position(PreferredPosition::WindowCenter),
    ])
}

struct DemoApp {
    scene: Scene,
    targets: Targets,
    layout: DemoLayout,
    bindings: KeyBindings,
    tour: Tour<ElementId>,
    panel: PopoverPanel,
    surface: OverlaySurface<Scene>,
    shown_step: Option<usize>,
    notice: Option<String>,
}

impl DemoApp {
    fn new(config: &Config, area: Rect) -> Self {
        let scene = Scene::new(Viewport::from(area));
        let targets = Targets {
            start: scene.add_element(geometry::Rect::default()),
            sidebar: scene.add_element(geometry::Rect::default()),
            search: scene.add_element(geometry::Rect::default()),
            chart: scene.add_element(geometry::Rect::default()),
            status: scene.add_element(geometry::Rect::default()),
        };
        let mut tour = build_tour(&targets, config.position);
        tour.set_show_backdrop(config.show_backdrop);
        let panel = PopoverPanel::new(&scene, PanelProps::default());
        let surface = OverlaySurface::with_spacing(&scene, panel.element(), COMPACT);
        let mut app = Self {
            scene,
            targets,
            layout: DemoLayout::default(),
            bindings: KeyBindings::default(),
            tour,
            panel,
            surface,
            shown_step: None,
            notice: None,
        };
        app.relayout(area);
        app
    }

    fn relayout(&mut self, area: Rect) {
        self.layout = DemoLayout::new(area);
        self.scene.set_viewport(Viewport::from(area));
        let t = self.targets;
        for id in [t.start, t.sidebar, t.search, t.chart, t.status] {
            if let Some(rect) = self.layout.target_rect(&t, id) {
                self.scene.set_layout(id, geometry::Rect::from(rect));
            }
        }
        self.surface.reposition();
    }

    fn start_tour(&mut self) {
        if !self.tour.is_open() {
            self.tour.start();
        }
    }

    fn apply_action(&mut self, action: Action) -> ControlFlow {
        match action {
            Action::Quit => return ControlFlow::Quit,
            Action::StartTour => self.start_tour(),
            Action::NextStep => self.tour.next(),
            Action::PrevStep => self.tour.prev(),
            Action::CloseTour => self.tour.close(),
            Action::FocusNext => {
                self.surface.handle_input(SurfaceInput::FocusNext);
            }
            Action::FocusPrev => {
                self.surface.handle_input(SurfaceInput::FocusPrev);
            }
            Action::Activate => {
                if !self.tour.is_open() {
                    self.start_tour();
                }
            }
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
        }
        ControlFlow::Continue
    }

    fn apply_panel_action(&mut self, action: PanelAction) {
        debug!(?action, "panel button");
        match action {
            PanelAction::Prev => self.tour.prev(),
            PanelAction::Next => self.tour.next(),
            PanelAction::Close => self.tour.close(),
        }
    }

    fn scroll(&mut self, delta: i32) {
        let visible = self.layout.sidebar.height.saturating_sub(2);
        let max = SIDEBAR_ITEMS.saturating_sub(visible);
        if delta > 0 && self.scene.scroll_offset() >= max {
            return;
        }
        if !self.scene.scroll_by(delta) && self.surface.is_open() {
            self.notice = Some("scrolling is locked while the tour is open".to_string());
        }
    }

    fn handle_click(&mut self, event: &Event, column: u16, row: u16) {
        if !self.surface.is_open() {
            if rect_contains(self.layout.start, column, row) {
                self.start_tour();
            }
            return;
        }
        if let Some(action) = self.panel.handle_panel_event(event, &self.bindings) {
            self.apply_panel_action(action);
            return;
        }
        self.surface.handle_input(SurfaceInput::Click {
            left: column as f64,
            top: row as f64,
        });
    }

    /// Push tour state into the panel and the surface.
    fn sync_tour(&mut self) {
        self.tour.poll_dismissal();
        let index = self.tour.index();
        let content_changed = index != self.shown_step;
        if content_changed {
            if let (Some(i), Some(step)) = (index, self.tour.current()) {
                let footer = format!("{}/{}", i + 1, self.tour.steps().len());
                self.panel.set_content(
                    step.title.clone(),
                    step.body.clone(),
                    Some(footer),
                    self.tour.is_last(),
                );
            }
            self.shown_step = index;
            self.notice = None;
        }
        let activation = self.tour.activation();
        self.surface.sync(activation.context().as_ref());
        if content_changed {
            self.surface.reposition();
        }
    }

    fn draw_screen(&self, frame: &mut UiFrame<'_>) {
        let layout = &self.layout;
        let current = self.surface.target();
        let border = |id: ElementId| {
            let color = if current == Some(id) {
                theme::target_highlight()
            } else {
                theme::target_border()
            };
            Style::default().fg(color)
        };

        frame.render_widget(
            Paragraph::new(" term-popover").style(theme::status_bar()),
            layout.header,
        );
        let start_style = if current == Some(self.targets.start) {
            theme::button_focused()
        } else {
            theme::button()
        };
        frame.render_widget(Paragraph::new(START_LABEL).style(start_style), layout.start);

        let items: Vec<Line> = (1..=SIDEBAR_ITEMS)
            .map(|i| Line::from(format!(" Item {i:02}")))
            .collect();
        frame.render_widget(
            Paragraph::new(items)
                .scroll((self.scene.scroll_offset(), 0))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border(self.targets.sidebar))
                        .title(" Sidebar "),
                ),
            layout.sidebar,
        );
        frame.render_widget(
            Paragraph::new(" Search...")
                .style(Style::default().fg(theme::panel_muted()))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border(self.targets.search)),
                ),
            layout.search,
        );
        let bars: Vec<Line> = [3usize, 6, 4, 7, 5, 2, 6]
            .iter()
            .map(|n| Line::from(format!(" {}", "#".repeat(n * 4))))
            .collect();
        frame.render_widget(
            Paragraph::new(bars).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border(self.targets.chart))
                    .title(" Chart "),
            ),
            layout.chart,
        );
        frame.render_widget(
            Paragraph::new(self.status_text()).style(theme::status_bar()),
            layout.status,
        );
    }

    fn status_text(&self) -> String {
        if let Some(notice) = &self.notice {
            return format!(" {notice}");
        }
        let hint = |action: Action| {
            self.bindings
                .first_combo(action)
                .map(|c| format!("{c} {}", action.to_string().to_lowercase()))
        };
        let actions: &[Action] = if self.tour.is_open() {
            &[
                Action::FocusNext,
                Action::NextStep,
                Action::PrevStep,
                Action::CloseTour,
            ]
        } else {
            &[Action::StartTour, Action::ScrollDown, Action::Quit]
        };
        let hints: Vec<String> = actions.iter().copied().filter_map(hint).collect();
        format!(" {}", hints.join("  |  "))
    }
}

impl OverlayApp for DemoApp {
    fn handle_event(&mut self, event: &Event) -> ControlFlow {
        let flow = match event {
            Event::Resize(cols, rows) => {
                self.relayout(Rect::new(0, 0, *cols, *rows));
                ControlFlow::Continue
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if self.surface.is_open()
                    && let Some(action) = self.panel.handle_panel_event(event, &self.bindings)
                {
                    self.apply_panel_action(action);
                    ControlFlow::Continue
                } else if let Some(action) = self.bindings.action_for_key(key) {
                    self.apply_action(action)
                } else {
                    ControlFlow::Continue
                }
            }
            Event::Mouse(mouse) => {
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.handle_click(event, mouse.column, mouse.row)
                    }
                    MouseEventKind::ScrollUp => self.scroll(-1),
                    MouseEventKind::ScrollDown => self.scroll(1),
                    _ => {}
                }
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        };
        self.sync_tour();
        flow
    }

    fn tick(&mut self, elapsed: Duration) -> ControlFlow {
        self.scene.drive(&mut self.surface, elapsed);
        ControlFlow::Continue
    }

    fn draw(&mut self, mut frame: UiFrame<'_>) {
        self.draw_screen(&mut frame);
        render_popover(&mut frame, &self.scene, &self.surface, &mut self.panel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use term_popover::overlay::Phase;

    fn app() -> DemoApp {
        DemoApp::new(&Config::default(), Rect::new(0, 0, 100, 30))
    }

    fn press(app: &mut DemoApp, code: KeyCode) -> ControlFlow {
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn click(app: &mut DemoApp, column: u16, row: u16) {
        app.handle_event(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    #[test]
    fn tour_opens_positions_and_walks_steps() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.surface.phase(), Phase::Opening);
        assert_eq!(app.surface.target(), Some(app.targets.start));
        app.tick(Duration::from_millis(16));
        assert_eq!(app.surface.phase(), Phase::Positioned);
        app.tick(Duration::from_millis(16));
        assert!(app.surface.is_positioned());

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.surface.target(), Some(app.targets.sidebar));
        assert_eq!(app.panel.title(), "Sidebar");
    }

    #[test]
    fn scrolling_is_locked_only_while_the_tour_runs() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        assert_eq!(app.scene.scroll_offset(), 1);
        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.scene.scroll_offset(), 1);
        assert!(app.notice.is_some());
        press(&mut app, KeyCode::Esc);
        assert!(!app.surface.is_open());
        press(&mut app, KeyCode::Down);
        assert_eq!(app.scene.scroll_offset(), 2);
    }

    #[test]
    fn clicking_outside_the_panel_ends_the_tour() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        app.tick(Duration::from_millis(16));
        click(&mut app, 99, 29);
        assert!(!app.tour.is_open());
        assert!(!app.surface.is_open());
    }

    #[test]
    fn enter_on_focused_button_advances() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        // First focusable button is Back; Tab moves to Next.
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.scene.focused(), app.panel.button(PanelAction::Next));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tour.index(), Some(1));
    }

    #[test]
    fn ctrl_q_quits() {
        let mut app = app();
        let flow = app.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(flow, ControlFlow::Quit);
    }
}
