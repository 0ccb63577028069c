//! Activation parameters and the read view handed to the overlay surface.

use std::fmt;
use std::rc::Rc;

use crate::error::{OverlayError, Result};
use crate::geometry::PreferredPosition;

/// Invoked when the user clicks outside the floating panel.
pub type DismissHandler = Rc<dyn Fn()>;

/// One open (or closed) overlay instance, owned by whoever opens it.
#[derive(Clone)]
pub struct Activation<E> {
    open: bool,
    target: Option<E>,
    preferred_position: PreferredPosition,
    on_dismiss: Option<DismissHandler>,
    show_backdrop: bool,
}

impl<E: Copy> Activation<E> {
    pub fn new(open: bool) -> Self {
        Self {
            open,
            target: None,
            preferred_position: PreferredPosition::default(),
            on_dismiss: None,
            show_backdrop: true,
        }
    }

    pub fn closed() -> Self {
        Self::new(false)
    }

    pub fn target(mut self, target: E) -> Self {
        self.target = Some(target);
        self
    }

    pub fn preferred_position(mut self, position: PreferredPosition) -> Self {
        self.preferred_position = position;
        self
    }

    pub fn on_click_outside(mut self, handler: impl Fn() + 'static) -> Self {
        self.on_dismiss = Some(Rc::new(handler));
        self
    }

    pub fn show_overlay(mut self, show: bool) -> Self {
        self.show_backdrop = show;
        self
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn set_target(&mut self, target: Option<E>) {
        self.target = target;
    }

    pub fn set_preferred_position(&mut self, position: PreferredPosition) {
        self.preferred_position = position;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Borrow this activation as overlay state. `None` while closed: nothing
    /// is rendered or exposed for a closed activation.
    pub fn context(&self) -> Option<OverlayContext<'_, E>> {
        self.open.then_some(OverlayContext { activation: self })
    }
}

impl<E: Copy> Default for Activation<E> {
    fn default() -> Self {
        Self::closed()
    }
}

impl<E: fmt::Debug> fmt::Debug for Activation<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("open", &self.open)
            .field("target", &self.target)
            .field("preferred_position", &self.preferred_position)
            .field("on_dismiss", &self.on_dismiss.is_some())
            .field("show_backdrop", &self.show_backdrop)
            .finish()
    }
}

/// Read view over an open [`Activation`]. It never owns the activation.
#[derive(Debug, Clone, Copy)]
pub struct OverlayContext<'a, E> {
    activation: &'a Activation<E>,
}

impl<'a, E: Copy> OverlayContext<'a, E> {
    pub fn open(&self) -> bool {
        self.activation.open
    }

    pub fn target(&self) -> Option<E> {
        self.activation.target
    }

    pub fn preferred_position(&self) -> PreferredPosition {
        self.activation.preferred_position
    }

    pub fn show_backdrop(&self) -> bool {
        self.activation.show_backdrop
    }

    pub fn on_dismiss(&self) -> Option<&'a DismissHandler> {
        self.activation.on_dismiss.as_ref()
    }
}

/// Unwrap overlay state where the caller requires an open activation.
pub fn require<'c, 'a, E>(
    context: Option<&'c OverlayContext<'a, E>>,
) -> Result<&'c OverlayContext<'a, E>> {
    context.ok_or(OverlayError::NoActiveActivation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn closed_activation_exposes_nothing() {
        let activation = Activation::<u8>::new(false).target(1);
        assert!(activation.context().is_none());
        assert!(matches!(
            require(activation.context().as_ref()),
            Err(OverlayError::NoActiveActivation)
        ));
    }

    #[test]
    fn defaults_are_bottom_center_with_backdrop() {
        let activation = Activation::<u8>::new(true);
        let ctx = activation.context().expect("open");
        assert_eq!(ctx.preferred_position(), PreferredPosition::BottomCenter);
        assert!(ctx.show_backdrop());
        assert!(ctx.target().is_none());
        assert!(ctx.on_dismiss().is_none());
    }

    #[test]
    fn context_reads_through_to_the_activation() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let activation = Activation::new(true)
            .target(7u8)
            .preferred_position(PreferredPosition::LeftCenter)
            .show_overlay(false)
            .on_click_outside(move || counter.set(counter.get() + 1));
        let ctx = activation.context().expect("open");
        let ctx = require(Some(&ctx)).expect("required");
        assert_eq!(ctx.target(), Some(7));
        assert_eq!(ctx.preferred_position(), PreferredPosition::LeftCenter);
        assert!(!ctx.show_backdrop());
        (ctx.on_dismiss().expect("handler"))();
        assert_eq!(hits.get(), 1);
    }
}
