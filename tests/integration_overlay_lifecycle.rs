use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use term_popover::constants::{ELEVATED_STACK_ORDER, POSITIONED_DELAY};
use term_popover::geometry::{Offset, PreferredPosition, Rect, Viewport};
use term_popover::host::{Focus, Overflow, Scroll, Stacking};
use term_popover::overlay::{Activation, OverlaySurface, Phase, SurfaceInput, require};
use term_popover::scene::{ElementId, Scene};
use term_popover::OverlayError;

struct Fixture {
    scene: Scene,
    target: ElementId,
    panel: ElementId,
    buttons: [ElementId; 3],
    outside: ElementId,
}

fn fixture() -> Fixture {
    let scene = Scene::new(Viewport::new(1000.0, 800.0));
    let target = scene.add_element(Rect::new(100.0, 100.0, 50.0, 20.0));
    let outside = scene.add_element(Rect::new(500.0, 500.0, 10.0, 10.0));
    scene.set_focusable(outside, true);
    let panel = scene.add_element(Rect::sized(200.0, 100.0));
    let buttons = [
        scene.add_child(panel, Rect::sized(10.0, 1.0), true),
        scene.add_child(panel, Rect::sized(10.0, 1.0), true),
        scene.add_child(panel, Rect::sized(10.0, 1.0), true),
    ];
    Fixture {
        scene,
        target,
        panel,
        buttons,
        outside,
    }
}

#[test]
fn closed_activation_exposes_no_context_and_mounts_nothing() {
    let f = fixture();
    let activation = Activation::<ElementId>::new(false).target(f.target);
    assert!(activation.context().is_none());
    assert!(matches!(
        require(activation.context().as_ref()),
        Err(OverlayError::NoActiveActivation)
    ));

    let mut surface = OverlaySurface::new(&f.scene, f.panel);
    surface.sync(activation.context().as_ref());
    assert_eq!(surface.phase(), Phase::Closed);
    assert!(!f.scene.take_frame_request());
    assert_eq!(f.scene.pending_timers(), 0);
}

#[test]
fn opening_applies_the_offset_within_one_frame() {
    let f = fixture();
    let mut surface = OverlaySurface::new(&f.scene, f.panel);
    let activation = Activation::new(true)
        .target(f.target)
        .preferred_position(PreferredPosition::BottomCenter);
    surface.sync(activation.context().as_ref());
    assert_eq!(surface.phase(), Phase::Opening);

    f.scene.drive(&mut surface, Duration::ZERO);
    assert_eq!(surface.phase(), Phase::Positioned);
    assert_eq!(f.scene.translation(f.panel), Some(Offset::new(130.0, 25.0)));
    assert!(!surface.is_positioned());

    f.scene.drive(&mut surface, POSITIONED_DELAY);
    assert!(surface.is_positioned());
    assert!(f.scene.transition_enabled(f.panel));
}

#[test]
fn closing_restores_stacking_scroll_and_focus() {
    let f = fixture();
    f.scene.set_stack_order(f.target, Some(3));
    f.scene.set_root_overflow(Overflow::Scroll);
    f.scene.focus(f.outside);

    let mut surface = OverlaySurface::new(&f.scene, f.panel);
    let mut activation = Activation::new(true).target(f.target);
    surface.sync(activation.context().as_ref());
    f.scene.drive(&mut surface, Duration::ZERO);

    assert_eq!(f.scene.stack_order(f.target), Some(ELEVATED_STACK_ORDER));
    assert_eq!(f.scene.root_overflow(), Overflow::Hidden);
    assert_eq!(f.scene.focused(), Some(f.buttons[0]));
    assert!(!f.scene.scroll_by(1));

    activation.set_open(false);
    surface.sync(activation.context().as_ref());
    assert_eq!(surface.phase(), Phase::Closed);
    assert_eq!(f.scene.stack_order(f.target), Some(3));
    assert_eq!(f.scene.root_overflow(), Overflow::Scroll);
    assert_eq!(f.scene.focused(), Some(f.outside));
    assert_eq!(f.scene.pending_timers(), 0);

    // The cancelled positioning timer never reaches the surface.
    f.scene.drive(&mut surface, POSITIONED_DELAY * 2);
    assert!(!surface.is_positioned());
}

#[test]
fn dropping_the_surface_runs_the_same_cleanup() {
    let f = fixture();
    {
        let mut surface = OverlaySurface::new(&f.scene, f.panel);
        let activation = Activation::new(true).target(f.target);
        surface.sync(activation.context().as_ref());
        assert_eq!(f.scene.root_overflow(), Overflow::Hidden);
    }
    assert_eq!(f.scene.stack_order(f.target), None);
    assert_eq!(f.scene.root_overflow(), Overflow::Auto);
    assert_eq!(f.scene.pending_timers(), 0);
}

#[test]
fn focus_wraps_inside_the_panel() {
    let f = fixture();
    let mut surface = OverlaySurface::new(&f.scene, f.panel);
    let activation = Activation::new(true).target(f.target);
    surface.sync(activation.context().as_ref());

    f.scene.focus(f.buttons[2]);
    assert!(surface.handle_input(SurfaceInput::FocusNext));
    assert_eq!(f.scene.focused(), Some(f.buttons[0]));
    assert!(surface.handle_input(SurfaceInput::FocusPrev));
    assert_eq!(f.scene.focused(), Some(f.buttons[2]));
}

#[test]
fn click_outside_calls_the_dismiss_handler() {
    let f = fixture();
    let dismissed = Rc::new(Cell::new(0));
    let seen = dismissed.clone();
    let activation = Activation::new(true)
        .target(f.target)
        .on_click_outside(move || seen.set(seen.get() + 1));
    let mut surface = OverlaySurface::new(&f.scene, f.panel);
    surface.sync(activation.context().as_ref());
    f.scene.drive(&mut surface, Duration::ZERO);

    // Inside the panel at (top 130, left 25).
    assert!(!surface.handle_input(SurfaceInput::Click {
        left: 80.0,
        top: 140.0
    }));
    assert_eq!(dismissed.get(), 0);

    assert!(surface.handle_input(SurfaceInput::Click {
        left: 900.0,
        top: 700.0
    }));
    assert_eq!(dismissed.get(), 1);
}

#[test]
fn detached_target_keeps_the_last_position() {
    let f = fixture();
    let mut surface = OverlaySurface::new(&f.scene, f.panel);
    let activation = Activation::new(true).target(f.target);
    surface.sync(activation.context().as_ref());
    f.scene.drive(&mut surface, Duration::ZERO);
    let placed = f.scene.translation(f.panel);

    f.scene.set_attached(f.target, false);
    assert!(!surface.reposition());
    f.scene.drive(&mut surface, Duration::ZERO);
    assert_eq!(f.scene.translation(f.panel), placed);
    assert_eq!(surface.phase(), Phase::Positioned);
}

#[test]
fn moving_to_a_new_target_releases_the_old_elevation() {
    let f = fixture();
    let mut surface = OverlaySurface::new(&f.scene, f.panel);
    let mut activation = Activation::new(true).target(f.target);
    surface.sync(activation.context().as_ref());
    assert_eq!(f.scene.stack_order(f.target), Some(ELEVATED_STACK_ORDER));

    activation.set_target(Some(f.outside));
    surface.sync(activation.context().as_ref());
    assert_eq!(f.scene.stack_order(f.target), None);
    assert_eq!(f.scene.stack_order(f.outside), Some(ELEVATED_STACK_ORDER));
    assert_eq!(f.scene.pending_timers(), 1);
}

#[test]
fn without_backdrop_the_target_is_not_elevated() {
    let f = fixture();
    let mut surface = OverlaySurface::new(&f.scene, f.panel);
    let activation = Activation::new(true).target(f.target).show_overlay(false);
    surface.sync(activation.context().as_ref());
    assert!(!surface.show_backdrop());
    assert_eq!(f.scene.stack_order(f.target), None);
}

#[test]
fn target_going_away_while_open_keeps_the_overlay_up() {
    let f = fixture();
    let mut surface = OverlaySurface::new(&f.scene, f.panel);
    let mut activation = Activation::new(true).target(f.target);
    surface.sync(activation.context().as_ref());
    f.scene.drive(&mut surface, Duration::ZERO);
    let placed = f.scene.translation(f.panel);

    activation.set_target(None);
    surface.sync(activation.context().as_ref());
    f.scene.drive(&mut surface, POSITIONED_DELAY);
    assert!(surface.is_open());
    assert_eq!(f.scene.root_overflow(), Overflow::Hidden);
    assert_eq!(f.scene.focused(), Some(f.buttons[0]));
    assert_eq!(f.scene.translation(f.panel), placed);
    assert_eq!(f.scene.stack_order(f.target), None);

    activation.set_open(false);
    surface.sync(activation.context().as_ref());
    assert_eq!(surface.phase(), Phase::Closed);
    assert_eq!(f.scene.root_overflow(), Overflow::Auto);
}
