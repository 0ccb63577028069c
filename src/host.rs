//! Capabilities the overlay core needs from a rendering substrate.
//!
//! Each concern is its own trait so guards only ask for what they touch: the
//! scroll lock needs [`Scroll`], the focus trap needs [`Focus`], and so on.
//! [`Host`] is the umbrella every full substrate implements.
//!
//! Implementations are cheap cloneable handles onto shared, single-threaded
//! state (think `Rc<RefCell<_>>`). Methods take `&self` so that scoped guards
//! can keep a handle and revert their side effect from `Drop`.

use std::fmt::Debug;
use std::time::Duration;

use crate::geometry::{Offset, Rect, Viewport};

/// Handle to a scheduled delayed callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Scroll behaviour of the root scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Auto,
    Scroll,
    Visible,
    Hidden,
}

/// Remembers what an element's stacking order was before [`Stacking::elevate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "dropping a StackToken leaves the element elevated"]
pub struct StackToken<E> {
    element: E,
    previous: Option<i32>,
}

impl<E: Copy> StackToken<E> {
    pub fn element(&self) -> E {
        self.element
    }

    pub fn previous(&self) -> Option<i32> {
        self.previous
    }
}

pub trait Substrate: Clone {
    type Element: Copy + Eq + Debug;
}

pub trait Measure: Substrate {
    /// Current bounding box, or `None` when the element is detached or not
    /// mounted yet.
    fn bounding_rect(&self, element: Self::Element) -> Option<Rect>;

    fn viewport(&self) -> Viewport;
}

pub trait Schedule: Substrate {
    /// Ask for one callback before the next paint.
    fn request_frame(&self);

    fn set_timeout(&self, delay: Duration) -> TimerId;

    /// Clearing an unknown or already fired timer is a no-op.
    fn clear_timeout(&self, id: TimerId);
}

pub trait Paint: Substrate {
    fn set_translation(&self, element: Self::Element, offset: Offset);

    fn set_transition(&self, element: Self::Element, enabled: bool);
}

pub trait Stacking: Substrate {
    fn stack_order(&self, element: Self::Element) -> Option<i32>;

    fn set_stack_order(&self, element: Self::Element, order: Option<i32>);

    fn elevate(&self, element: Self::Element, order: i32) -> StackToken<Self::Element> {
        let previous = self.stack_order(element);
        self.set_stack_order(element, Some(order));
        StackToken { element, previous }
    }

    fn restore(&self, token: StackToken<Self::Element>) {
        self.set_stack_order(token.element, token.previous);
    }
}

pub trait Focus: Substrate {
    fn active_element(&self) -> Option<Self::Element>;

    fn focus(&self, element: Self::Element);

    fn blur(&self);

    /// Focusable descendants of `container`, in traversal order.
    fn focusable_within(&self, container: Self::Element) -> Vec<Self::Element>;

    /// Whether `element` is `container` or one of its descendants.
    fn contains(&self, container: Self::Element, element: Self::Element) -> bool;
}

pub trait Scroll: Substrate {
    fn root_overflow(&self) -> Overflow;

    fn set_root_overflow(&self, overflow: Overflow);
}

pub trait Host: Measure + Schedule + Paint + Stacking + Focus + Scroll {}

impl<T> Host for T where T: Measure + Schedule + Paint + Stacking + Focus + Scroll {}
