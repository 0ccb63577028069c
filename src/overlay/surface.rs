//! The overlay surface: places one floating panel next to one target and owns
//! every side effect of the activation while it is open.
//!
//! Lifecycle is `Closed -> Opening -> Positioned -> Closed`. Entering `Opening`
//! acquires the scroll lock and focus trap. Each placement (first open, or a
//! change of target, position or backdrop) elevates the target and schedules
//! the positioned timer; both are released before the next placement and on
//! close. Dropping the surface closes it.

use tracing::{debug, trace};

use super::focus_trap::{FocusDirection, FocusTrap};
use super::guards::{Elevation, Timer};
use super::scroll_lock::ScrollLock;
use super::state::{DismissHandler, OverlayContext};
use crate::constants::{ELEVATED_STACK_ORDER, POSITIONED_DELAY};
use crate::geometry::{Offset, PreferredPosition, Spacing, compute_offset_with};
use crate::host::{Host, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Positioned,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceInput {
    FocusNext,
    FocusPrev,
    /// Pointer press in viewport coordinates.
    Click { left: f64, top: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement<E> {
    target: E,
    position: PreferredPosition,
    show_backdrop: bool,
}

/// Side effects held from `Opening` until close.
struct OpenEffects<H: Host> {
    trap: Option<FocusTrap<H>>,
    _scroll: Option<ScrollLock<H>>,
}

/// Side effects held for a single placement.
struct PlacementEffects<H: Host> {
    _elevation: Option<Elevation<H>>,
    timer: Timer<H>,
}

pub struct OverlaySurface<H: Host> {
    host: H,
    panel: H::Element,
    spacing: Spacing,
    phase: Phase,
    positioned: bool,
    placement: Option<Placement<H::Element>>,
    on_dismiss: Option<DismissHandler>,
    show_backdrop: bool,
    pending: Option<Offset>,
    applied: Option<Offset>,
    // Field order is drop order: placement effects are released before the
    // focus trap and scroll lock.
    placement_effects: Option<PlacementEffects<H>>,
    open_effects: Option<OpenEffects<H>>,
}

impl<H: Host> OverlaySurface<H> {
    pub fn new(host: &H, panel: H::Element) -> Self {
        Self::with_spacing(host, panel, Spacing::default())
    }

    pub fn with_spacing(host: &H, panel: H::Element, spacing: Spacing) -> Self {
        Self {
            host: host.clone(),
            panel,
            spacing,
            phase: Phase::Closed,
            positioned: false,
            placement: None,
            on_dismiss: None,
            show_backdrop: false,
            pending: None,
            applied: None,
            placement_effects: None,
            open_effects: None,
        }
    }

    pub fn panel(&self) -> H::Element {
        self.panel
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    /// Latched shortly after the first placement; gates the panel transition.
    pub fn is_positioned(&self) -> bool {
        self.positioned
    }

    pub fn target(&self) -> Option<H::Element> {
        self.placement.map(|p| p.target)
    }

    pub fn show_backdrop(&self) -> bool {
        self.show_backdrop
    }

    /// Last offset written onto the panel.
    pub fn offset(&self) -> Option<Offset> {
        self.applied
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn focus_trapped(&self) -> bool {
        self.open_effects
            .as_ref()
            .is_some_and(|effects| effects.trap.is_some())
    }

    /// Bring the surface in line with the current overlay state.
    ///
    /// `None` (or a closed activation) tears everything down. An open
    /// activation without a target waits; nothing is acquired until a target
    /// arrives. Losing the target after opening keeps the focus trap, the
    /// scroll lock and the last offset, and only releases the placement.
    /// Any change of target, position or backdrop re-runs placement from
    /// fresh rectangles.
    pub fn sync(&mut self, context: Option<&OverlayContext<'_, H::Element>>) {
        let Some(context) = context.filter(|c| c.open()) else {
            self.close();
            return;
        };
        let Some(target) = context.target() else {
            if self.phase == Phase::Closed {
                debug!("overlay open without a target; waiting");
                return;
            }
            self.on_dismiss = context.on_dismiss().cloned();
            self.show_backdrop = context.show_backdrop();
            if self.placement.take().is_some() {
                debug!(panel = ?self.panel, "overlay target gone; holding last position");
            }
            self.placement_effects = None;
            self.pending = None;
            return;
        };
        self.on_dismiss = context.on_dismiss().cloned();
        self.show_backdrop = context.show_backdrop();
        let placement = Placement {
            target,
            position: context.preferred_position(),
            show_backdrop: context.show_backdrop(),
        };
        if self.phase == Phase::Closed {
            self.enter_opening();
        }
        if self.placement != Some(placement) {
            self.place(placement);
        }
    }

    fn enter_opening(&mut self) {
        debug!(panel = ?self.panel, "overlay opening");
        self.phase = Phase::Opening;
        self.positioned = false;
        self.applied = None;
        let scroll = ScrollLock::lock(&self.host, true);
        let trap = FocusTrap::activate(&self.host, self.panel, true);
        self.open_effects = Some(OpenEffects {
            trap,
            _scroll: scroll,
        });
    }

    fn place(&mut self, placement: Placement<H::Element>) {
        // Release the previous placement's elevation and timer first so the
        // target override is never held twice.
        self.placement_effects = None;
        self.placement = Some(placement);
        trace!(target = ?placement.target, position = %placement.position, "placing overlay");
        self.reposition();
        let elevation = placement
            .show_backdrop
            .then(|| Elevation::acquire(&self.host, placement.target, ELEVATED_STACK_ORDER));
        self.placement_effects = Some(PlacementEffects {
            _elevation: elevation,
            timer: Timer::schedule(&self.host, POSITIONED_DELAY),
        });
    }

    /// Recompute the offset from freshly read rectangles and request a frame
    /// to apply it. Returns false, leaving the panel where it was, when either
    /// element cannot be measured.
    pub fn reposition(&mut self) -> bool {
        let Some(placement) = self.placement else {
            return false;
        };
        let Some(target_rect) = self.host.bounding_rect(placement.target) else {
            debug!(target = ?placement.target, "target not measurable; keeping last position");
            return false;
        };
        let Some(panel_rect) = self.host.bounding_rect(self.panel) else {
            debug!(panel = ?self.panel, "panel not measurable; keeping last position");
            return false;
        };
        let offset = compute_offset_with(
            target_rect,
            panel_rect,
            placement.position,
            self.host.viewport(),
            self.spacing,
        );
        self.pending = Some(offset);
        self.host.request_frame();
        true
    }

    /// Frame callback: write the pending offset onto the panel.
    pub fn on_frame(&mut self) {
        if self.phase == Phase::Closed {
            self.pending = None;
            return;
        }
        let Some(offset) = self.pending.take() else {
            return;
        };
        self.host.set_translation(self.panel, offset);
        self.applied = Some(offset);
        if self.phase == Phase::Opening {
            debug!(top = offset.top, left = offset.left, "overlay positioned");
            self.phase = Phase::Positioned;
        }
    }

    /// Timer callback. Returns whether `id` belonged to this surface.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        let Some(effects) = self.placement_effects.as_mut() else {
            return false;
        };
        if effects.timer.id() != id || effects.timer.fired() {
            return false;
        }
        effects.timer.mark_fired();
        if !self.positioned {
            self.positioned = true;
            self.host.set_transition(self.panel, true);
        }
        true
    }

    /// Route input to the backdrop or the focus trap. Returns whether the
    /// surface consumed it.
    pub fn handle_input(&mut self, input: SurfaceInput) -> bool {
        if self.phase == Phase::Closed {
            return false;
        }
        match input {
            SurfaceInput::FocusNext => self.cycle_focus(FocusDirection::Forward),
            SurfaceInput::FocusPrev => self.cycle_focus(FocusDirection::Backward),
            SurfaceInput::Click { left, top } => {
                let inside = self
                    .host
                    .bounding_rect(self.panel)
                    .is_some_and(|rect| rect.contains(left, top));
                if inside {
                    return false;
                }
                // The backdrop stays mounted even when it is not shown.
                if let Some(dismiss) = self.on_dismiss.clone() {
                    debug!("backdrop clicked; dismissing overlay");
                    dismiss();
                }
                true
            }
        }
    }

    fn cycle_focus(&mut self, direction: FocusDirection) -> bool {
        self.open_effects
            .as_ref()
            .and_then(|effects| effects.trap.as_ref())
            .is_some_and(|trap| trap.cycle(direction))
    }

    /// Release every side effect and return to `Closed`. Idempotent.
    pub fn close(&mut self) {
        if self.phase == Phase::Closed && self.open_effects.is_none() {
            return;
        }
        debug!(panel = ?self.panel, "overlay closing");
        self.placement_effects = None;
        self.open_effects = None;
        self.placement = None;
        self.on_dismiss = None;
        self.show_backdrop = false;
        self.pending = None;
        self.applied = None;
        self.positioned = false;
        self.host.set_transition(self.panel, false);
        self.phase = Phase::Closed;
    }
}

impl<H: Host> Drop for OverlaySurface<H> {
    fn drop(&mut self) {
        self.close();
    }
}
