use tracing::{debug, trace};

use crate::host::Focus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    Forward,
    Backward,
}

/// Keeps keyboard focus cycling among a container's focusable descendants.
///
/// Holding the trap is what makes it active. Dropping it stops trapping and,
/// when focus is still inside the container, hands focus back to whatever held
/// it before activation.
pub struct FocusTrap<H: Focus> {
    host: H,
    container: H::Element,
    previous: Option<H::Element>,
}

impl<H: Focus> FocusTrap<H> {
    /// Returns `None` when `enabled` is false. A container without focusable
    /// descendants still yields a trap; it is simply inert.
    pub fn activate(host: &H, container: H::Element, enabled: bool) -> Option<Self> {
        if !enabled {
            return None;
        }
        let previous = host.active_element();
        match host.focusable_within(container).first() {
            Some(first) => host.focus(*first),
            None => debug!(?container, "focus trap has no focusable descendants"),
        }
        Some(Self {
            host: host.clone(),
            container,
            previous,
        })
    }

    pub fn contains_focus(&self) -> bool {
        self.host
            .active_element()
            .is_some_and(|active| self.host.contains(self.container, active))
    }

    /// Move focus one step in `direction`, wrapping at either end. Focus that
    /// sits outside the container is pulled back to the first (forward) or last
    /// (backward) descendant. Returns false when there is nothing to focus.
    pub fn cycle(&self, direction: FocusDirection) -> bool {
        let items = self.host.focusable_within(self.container);
        if items.is_empty() {
            return false;
        }
        let len = items.len();
        let current = self
            .host
            .active_element()
            .and_then(|active| items.iter().position(|e| *e == active));
        let next = match (direction, current) {
            (FocusDirection::Forward, Some(i)) => (i + 1) % len,
            (FocusDirection::Forward, None) => 0,
            (FocusDirection::Backward, Some(i)) => (i + len - 1) % len,
            (FocusDirection::Backward, None) => len - 1,
        };
        trace!(?direction, from = ?current, to = next, "focus trap cycled");
        self.host.focus(items[next]);
        true
    }
}

impl<H: Focus> Drop for FocusTrap<H> {
    fn drop(&mut self) {
        if !self.contains_focus() {
            return;
        }
        match self.previous {
            Some(previous) => self.host.focus(previous),
            None => self.host.blur(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Viewport};
    use crate::scene::{ElementId, Scene};

    fn panel_with_buttons(count: usize) -> (Scene, ElementId, Vec<ElementId>) {
        let scene = Scene::new(Viewport::new(80.0, 24.0));
        let panel = scene.add_element(Rect::sized(20.0, 5.0));
        let buttons = (0..count)
            .map(|_| scene.add_child(panel, Rect::sized(4.0, 1.0), true))
            .collect();
        (scene, panel, buttons)
    }

    #[test]
    fn disabled_trap_is_not_created() {
        let (scene, panel, _) = panel_with_buttons(2);
        assert!(FocusTrap::activate(&scene, panel, false).is_none());
        assert_eq!(scene.focused(), None);
    }

    #[test]
    fn forward_wraps_from_last_to_first_and_backward_from_first_to_last() {
        let (scene, panel, buttons) = panel_with_buttons(3);
        let trap = FocusTrap::activate(&scene, panel, true).expect("enabled");
        assert_eq!(scene.focused(), Some(buttons[0]));
        assert!(trap.cycle(FocusDirection::Forward));
        assert!(trap.cycle(FocusDirection::Forward));
        assert_eq!(scene.focused(), Some(buttons[2]));
        assert!(trap.cycle(FocusDirection::Forward));
        assert_eq!(scene.focused(), Some(buttons[0]));
        assert!(trap.cycle(FocusDirection::Backward));
        assert_eq!(scene.focused(), Some(buttons[2]));
    }

    #[test]
    fn focus_outside_is_pulled_back_in() {
        let (scene, panel, buttons) = panel_with_buttons(2);
        let outside = scene.add_element(Rect::sized(1.0, 1.0));
        let trap = FocusTrap::activate(&scene, panel, true).expect("enabled");
        scene.focus(outside);
        assert!(trap.cycle(FocusDirection::Backward));
        assert_eq!(scene.focused(), Some(buttons[1]));
    }

    #[test]
    fn empty_container_is_inert() {
        let (scene, panel, _) = panel_with_buttons(0);
        let trap = FocusTrap::activate(&scene, panel, true).expect("enabled");
        assert!(!trap.cycle(FocusDirection::Forward));
        assert_eq!(scene.focused(), None);
    }

    #[test]
    fn release_restores_previous_focus_only_when_inside() {
        let (scene, panel, _) = panel_with_buttons(2);
        let trigger = scene.add_element(Rect::sized(1.0, 1.0));
        scene.focus(trigger);
        let trap = FocusTrap::activate(&scene, panel, true).expect("enabled");
        assert!(trap.contains_focus());
        drop(trap);
        assert_eq!(scene.focused(), Some(trigger));

        let other = scene.add_element(Rect::sized(1.0, 1.0));
        let trap = FocusTrap::activate(&scene, panel, true).expect("enabled");
        scene.focus(other);
        drop(trap);
        assert_eq!(scene.focused(), Some(other));
    }
}
