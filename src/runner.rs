use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::ui::UiFrame;

/// An application hosting popovers on top of its own widgets.
///
/// `tick` receives the wall time since the previous tick so it can advance
/// the scene clock before drawing; pending popover frames and the positioned
/// timer are applied there, never from inside `handle_event`.
pub trait OverlayApp {
    fn handle_event(&mut self, event: &Event) -> ControlFlow;
    fn tick(&mut self, elapsed: Duration) -> ControlFlow;
    fn draw(&mut self, frame: UiFrame<'_>);
}

pub fn run_app<O, D, A>(
    output: &mut O,
    driver: &mut D,
    app: &mut A,
    poll_interval: Duration,
) -> io::Result<()>
where
    O: OutputDriver,
    D: InputDriver,
    A: OverlayApp,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;
    let mut last_tick = Instant::now();

    let result = event_loop.run(|_, event| match event {
        Some(evt) => Ok(app.handle_event(&evt)),
        None => {
            let now = Instant::now();
            let elapsed = now.saturating_duration_since(last_tick);
            last_tick = now;
            let flow = app.tick(elapsed);
            if flow == ControlFlow::Continue {
                output.draw(|frame| app.draw(frame))?;
            }
            Ok(flow)
        }
    });
    event_loop.driver().set_mouse_capture(false)?;
    result
}
