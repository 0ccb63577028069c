//! In-memory substrate backing the terminal renderer.
//!
//! A `Scene` is a retained model of everything the overlay core asks a host
//! about: element boxes, parent links, focus, stacking order, the root scroll
//! container and pending frame/timer requests. Applications register their
//! layout here every frame; the renderer reads translations and stacking
//! order back out. Timers run on a virtual clock that the event loop advances,
//! so tests drive time explicitly.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::geometry::{Offset, Rect, Viewport};
use crate::host::{
    Focus, Measure, Overflow, Paint, Schedule, Scroll, Stacking, Substrate, TimerId,
};
use crate::overlay::OverlaySurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

#[derive(Debug, Clone)]
struct Node {
    parent: Option<ElementId>,
    layout: Rect,
    attached: bool,
    focusable: bool,
    stack_order: Option<i32>,
    translation: Option<Offset>,
    transition: bool,
}

#[derive(Debug, Default)]
struct SceneState {
    viewport: Viewport,
    nodes: BTreeMap<ElementId, Node>,
    next_id: u32,
    focused: Option<ElementId>,
    overflow: Overflow,
    scroll_offset: u16,
    frame_requested: bool,
    clock: Duration,
    next_timer: u64,
    timers: BTreeMap<TimerId, Duration>,
}

impl SceneState {
    fn is_within(&self, container: ElementId, mut element: ElementId) -> bool {
        loop {
            if element == container {
                return true;
            }
            match self.nodes.get(&element).and_then(|n| n.parent) {
                Some(parent) => element = parent,
                None => return false,
            }
        }
    }
}

/// Shared handle onto a scene. Clones observe and mutate the same state.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    inner: Rc<RefCell<SceneState>>,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        let scene = Self::default();
        scene.set_viewport(viewport);
        scene
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.inner.borrow_mut().viewport = viewport;
    }

    pub fn add_element(&self, layout: Rect) -> ElementId {
        self.insert(None, layout, false)
    }

    pub fn add_child(&self, parent: ElementId, layout: Rect, focusable: bool) -> ElementId {
        self.insert(Some(parent), layout, focusable)
    }

    fn insert(&self, parent: Option<ElementId>, layout: Rect, focusable: bool) -> ElementId {
        let mut state = self.inner.borrow_mut();
        let id = ElementId(state.next_id);
        state.next_id += 1;
        state.nodes.insert(
            id,
            Node {
                parent,
                layout,
                attached: true,
                focusable,
                stack_order: None,
                translation: None,
                transition: false,
            },
        );
        id
    }

    pub fn set_layout(&self, id: ElementId, layout: Rect) {
        if let Some(node) = self.inner.borrow_mut().nodes.get_mut(&id) {
            node.layout = layout;
        }
    }

    /// Detached elements stay registered but can no longer be measured.
    pub fn set_attached(&self, id: ElementId, attached: bool) {
        if let Some(node) = self.inner.borrow_mut().nodes.get_mut(&id) {
            node.attached = attached;
        }
    }

    pub fn set_focusable(&self, id: ElementId, focusable: bool) {
        if let Some(node) = self.inner.borrow_mut().nodes.get_mut(&id) {
            node.focusable = focusable;
        }
    }

    pub fn translation(&self, id: ElementId) -> Option<Offset> {
        self.inner
            .borrow()
            .nodes
            .get(&id)
            .and_then(|n| n.translation)
    }

    pub fn transition_enabled(&self, id: ElementId) -> bool {
        self.inner
            .borrow()
            .nodes
            .get(&id)
            .is_some_and(|n| n.transition)
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.inner.borrow().focused
    }

    /// Scroll the root container. Refused while overflow is hidden.
    pub fn scroll_by(&self, delta: i32) -> bool {
        let mut state = self.inner.borrow_mut();
        if state.overflow == Overflow::Hidden {
            trace!(delta, "scroll suppressed by root overflow");
            return false;
        }
        let next = (state.scroll_offset as i32 + delta).clamp(0, u16::MAX as i32) as u16;
        let moved = next != state.scroll_offset;
        state.scroll_offset = next;
        moved
    }

    pub fn scroll_offset(&self) -> u16 {
        self.inner.borrow().scroll_offset
    }

    /// Consume a pending frame request.
    pub fn take_frame_request(&self) -> bool {
        std::mem::take(&mut self.inner.borrow_mut().frame_requested)
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Advance the virtual clock and return the timers that came due, oldest
    /// deadline first.
    pub fn advance(&self, elapsed: Duration) -> Vec<TimerId> {
        let mut state = self.inner.borrow_mut();
        state.clock += elapsed;
        let now = state.clock;
        let mut due: Vec<(Duration, TimerId)> = state
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort();
        for (_, id) in &due {
            state.timers.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Run everything that came due for `surface`: fired timers first, then
    /// the frame callback if one was requested.
    pub fn drive(&self, surface: &mut OverlaySurface<Scene>, elapsed: Duration) {
        for id in self.advance(elapsed) {
            surface.on_timer(id);
        }
        if self.take_frame_request() {
            surface.on_frame();
        }
    }

    /// Cell rectangle of an element as it should be painted.
    pub fn cell_rect(&self, id: ElementId) -> Option<ratatui::layout::Rect> {
        let rect = self.bounding_rect(id)?;
        let (x, y) = Offset::new(rect.top, rect.left).to_cells();
        Some(ratatui::layout::Rect {
            x,
            y,
            width: rect.width.max(0.0).round() as u16,
            height: rect.height.max(0.0).round() as u16,
        })
    }
}

impl Substrate for Scene {
    type Element = ElementId;
}

impl Measure for Scene {
    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        let state = self.inner.borrow();
        let node = state.nodes.get(&element).filter(|n| n.attached)?;
        let mut rect = node.layout;
        if let Some(offset) = node.translation {
            rect.top += offset.top;
            rect.left += offset.left;
        }
        Some(rect)
    }

    fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }
}

impl Schedule for Scene {
    fn request_frame(&self) {
        self.inner.borrow_mut().frame_requested = true;
    }

    fn set_timeout(&self, delay: Duration) -> TimerId {
        let mut state = self.inner.borrow_mut();
        let id = TimerId(state.next_timer);
        state.next_timer += 1;
        let deadline = state.clock + delay;
        state.timers.insert(id, deadline);
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.inner.borrow_mut().timers.remove(&id);
    }
}

impl Paint for Scene {
    fn set_translation(&self, element: ElementId, offset: Offset) {
        if let Some(node) = self.inner.borrow_mut().nodes.get_mut(&element) {
            node.translation = Some(offset);
        }
    }

    fn set_transition(&self, element: ElementId, enabled: bool) {
        if let Some(node) = self.inner.borrow_mut().nodes.get_mut(&element) {
            node.transition = enabled;
        }
    }
}

impl Stacking for Scene {
    fn stack_order(&self, element: ElementId) -> Option<i32> {
        self.inner
            .borrow()
            .nodes
            .get(&element)
            .and_then(|n| n.stack_order)
    }

    fn set_stack_order(&self, element: ElementId, order: Option<i32>) {
        if let Some(node) = self.inner.borrow_mut().nodes.get_mut(&element) {
            node.stack_order = order;
        }
    }
}

impl Focus for Scene {
    fn active_element(&self) -> Option<ElementId> {
        self.inner.borrow().focused
    }

    fn focus(&self, element: ElementId) {
        let mut state = self.inner.borrow_mut();
        if state.nodes.contains_key(&element) {
            state.focused = Some(element);
        }
    }

    fn blur(&self) {
        self.inner.borrow_mut().focused = None;
    }

    fn focusable_within(&self, container: ElementId) -> Vec<ElementId> {
        let state = self.inner.borrow();
        state
            .nodes
            .iter()
            .filter(|(id, node)| {
                **id != container
                    && node.focusable
                    && node.attached
                    && state.is_within(container, **id)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn contains(&self, container: ElementId, element: ElementId) -> bool {
        self.inner.borrow().is_within(container, element)
    }
}

impl Scroll for Scene {
    fn root_overflow(&self) -> Overflow {
        self.inner.borrow().overflow
    }

    fn set_root_overflow(&self, overflow: Overflow) {
        self.inner.borrow_mut().overflow = overflow;
    }
}
