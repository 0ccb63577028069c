//! Scoped side effects owned by one placement of the overlay.

use std::time::Duration;

use tracing::trace;

use crate::host::{Schedule, StackToken, Stacking, TimerId};

/// Raises an element's stacking order until dropped.
pub struct Elevation<H: Stacking> {
    host: H,
    token: Option<StackToken<H::Element>>,
}

impl<H: Stacking> Elevation<H> {
    pub fn acquire(host: &H, element: H::Element, order: i32) -> Self {
        let token = host.elevate(element, order);
        trace!(?element, order, previous = ?token.previous(), "elevated target");
        Self {
            host: host.clone(),
            token: Some(token),
        }
    }

    pub fn element(&self) -> Option<H::Element> {
        self.token.as_ref().map(|t| t.element())
    }
}

impl<H: Stacking> Drop for Elevation<H> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            trace!(element = ?token.element(), "restored target stacking order");
            self.host.restore(token);
        }
    }
}

/// A delayed callback that is cancelled when dropped before it fires.
pub struct Timer<H: Schedule> {
    host: H,
    id: TimerId,
    fired: bool,
}

impl<H: Schedule> Timer<H> {
    pub fn schedule(host: &H, delay: Duration) -> Self {
        let id = host.set_timeout(delay);
        Self {
            host: host.clone(),
            id,
            fired: false,
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn fired(&self) -> bool {
        self.fired
    }

    pub fn mark_fired(&mut self) {
        self.fired = true;
    }
}

impl<H: Schedule> Drop for Timer<H> {
    fn drop(&mut self) {
        if !self.fired {
            self.host.clear_timeout(self.id);
        }
    }
}
