//! Guided tours: an ordered list of popover steps shown one at a time.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::geometry::PreferredPosition;
use crate::overlay::Activation;

#[derive(Debug, Clone, PartialEq)]
pub struct TourStep<E> {
    pub target: E,
    pub title: String,
    pub body: String,
    pub preferred_position: PreferredPosition,
}

impl<E> TourStep<E> {
    pub fn new(target: E, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            target,
            title: title.into(),
            body: body.into(),
            preferred_position: PreferredPosition::default(),
        }
    }

    pub fn position(mut self, position: PreferredPosition) -> Self {
        self.preferred_position = position;
        self
    }
}

#[derive(Debug)]
pub struct Tour<E> {
    steps: Vec<TourStep<E>>,
    current: Option<usize>,
    show_backdrop: bool,
    dismiss_requested: Rc<Cell<bool>>,
}

impl<E: Copy> Tour<E> {
    pub fn new(steps: Vec<TourStep<E>>) -> Self {
        Self {
            steps,
            current: None,
            show_backdrop: true,
            dismiss_requested: Rc::new(Cell::new(false)),
        }
    }

    pub fn set_show_backdrop(&mut self, show: bool) {
        self.show_backdrop = show;
    }

    pub fn steps(&self) -> &[TourStep<E>] {
        &self.steps
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&TourStep<E>> {
        self.current.and_then(|i| self.steps.get(i))
    }

    pub fn is_last(&self) -> bool {
        self.current
            .is_some_and(|i| i + 1 == self.steps.len())
    }

    /// Open at the first step. An empty tour stays closed.
    pub fn start(&mut self) -> bool {
        self.dismiss_requested.set(false);
        self.current = (!self.steps.is_empty()).then_some(0);
        debug!(steps = self.steps.len(), open = self.is_open(), "tour started");
        self.is_open()
    }

    /// Advance one step; advancing past the last step closes the tour.
    pub fn next(&mut self) {
        let Some(i) = self.current else {
            return;
        };
        if i + 1 < self.steps.len() {
            self.current = Some(i + 1);
        } else {
            self.close();
        }
    }

    /// Go back one step, staying on the first.
    pub fn prev(&mut self) {
        if let Some(i) = self.current {
            self.current = Some(i.saturating_sub(1));
        }
    }

    pub fn close(&mut self) {
        if self.current.take().is_some() {
            debug!("tour closed");
        }
    }

    /// Close the tour if a click outside the panel asked for it since the
    /// last call. Returns whether it did.
    pub fn poll_dismissal(&mut self) -> bool {
        if !self.dismiss_requested.replace(false) {
            return false;
        }
        self.close();
        true
    }

    /// Activation for the current step; closed when the tour is not running.
    pub fn activation(&self) -> Activation<E> {
        let Some(step) = self.current() else {
            return Activation::closed();
        };
        let dismiss = self.dismiss_requested.clone();
        Activation::new(true)
            .target(step.target)
            .preferred_position(step.preferred_position)
            .show_overlay(self.show_backdrop)
            .on_click_outside(move || dismiss.set(true))
    }
}
