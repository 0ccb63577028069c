//! Shared component rendering context
//!
//! `RenderContext` carries the scene state a component needs while rendering
//! or handling events, so the `Component` trait stays stable and components do
//! not grow ad-hoc boolean parameters.

use crate::scene::ElementId;

/// - `focused`: the element currently holding keyboard focus, if any.
/// - `transition`: whether moves of this component may be animated.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext {
    focused: Option<ElementId>,
    transition: bool,
}

impl RenderContext {
    pub const fn new(focused: Option<ElementId>) -> Self {
        Self {
            focused,
            transition: false,
        }
    }

    pub fn is_focused(&self, id: ElementId) -> bool {
        self.focused == Some(id)
    }

    pub const fn transition(&self) -> bool {
        self.transition
    }

    pub const fn with_transition(mut self, transition: bool) -> Self {
        self.transition = transition;
        self
    }
}
